use uuid::Uuid;

use crate::auth::{hash_password, verify_password, JwtKeys};
use crate::error::{AppError, Result};
use crate::models::{AuthResponse, LoginUser, RegisterUser, UserResponse};
use crate::repo::UserRepository;

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    jwt: JwtKeys,
}

impl AuthService {
    pub fn new(users: UserRepository, jwt: JwtKeys) -> Self {
        Self { users, jwt }
    }

    pub async fn register(&self, input: &RegisterUser) -> Result<AuthResponse> {
        if self.users.email_exists(&input.email).await? {
            return Err(AppError::BadRequest("Email already in use".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let user = self
            .users
            .create(Uuid::new_v4(), &input.email, &password_hash, &input.name)
            .await?;

        let token = self.jwt.issue(user.id, &user.email)?;

        Ok(AuthResponse {
            id: user.id,
            email: user.email,
            name: user.name,
            token,
        })
    }

    pub async fn login(&self, input: &LoginUser) -> Result<AuthResponse> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or_else(invalid_credentials)?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(invalid_credentials());
        }

        let token = self.jwt.issue(user.id, &user.email)?;

        Ok(AuthResponse {
            id: user.id,
            email: user.email,
            name: user.name,
            token,
        })
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<UserResponse> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }
}

// Unknown email and wrong password must be indistinguishable to the caller.
fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid email or password".to_string())
}
