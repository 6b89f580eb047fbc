use anyhow::Context;

const DEV_JWT_SECRET: &str = "taskforge-dev-secret-do-not-use-in-production";

/// Runtime configuration, collected from the environment once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:taskforge.db?mode=rwc".to_string());

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().context("PORT must be a valid port number")?,
            Err(_) => 3000,
        };

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using an insecure development secret");
            DEV_JWT_SECRET.to_string()
        });

        Ok(Self {
            database_url,
            port,
            jwt_secret,
        })
    }
}
