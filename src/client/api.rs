use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::models::{
    AuthResponse, CreateTag, CreateTask, DeletedTag, DeletedTask, TagResponse, TaskFilter,
    TaskListResponse, TaskResponse, UpdateTag, UpdateTask, UserResponse,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with an error envelope; the display text is the
    /// server's message.
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("malformed response from server")]
    Malformed,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    data: Option<T>,
    message: Option<String>,
}

/// Typed wrapper over the REST API. Holds the bearer token once
/// register/login has succeeded and attaches it to every request.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn logout(&mut self) {
        self.token = None;
    }

    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthResponse, ClientError> {
        let request = self
            .http
            .post(self.url("/api/auth/register"))
            .json(&json!({ "email": email, "password": password, "name": name }));

        let result: AuthResponse = self.send(request).await?;
        self.token = Some(result.token.clone());
        Ok(result)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let request = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }));

        let result: AuthResponse = self.send(request).await?;
        self.token = Some(result.token.clone());
        Ok(result)
    }

    pub async fn me(&self) -> Result<UserResponse, ClientError> {
        self.send(self.http.get(self.url("/api/auth/me"))).await
    }

    pub async fn list_tasks(&self, filter: &TaskFilter) -> Result<TaskListResponse, ClientError> {
        let request = self
            .http
            .get(self.url("/api/tasks"))
            .query(&task_query(filter));

        self.send(request).await
    }

    pub async fn get_task(&self, id: Uuid) -> Result<TaskResponse, ClientError> {
        self.send(self.http.get(self.url(&format!("/api/tasks/{}", id))))
            .await
    }

    pub async fn create_task(&self, input: &CreateTask) -> Result<TaskResponse, ClientError> {
        self.send(self.http.post(self.url("/api/tasks")).json(input))
            .await
    }

    pub async fn update_task(
        &self,
        id: Uuid,
        patch: &UpdateTask,
    ) -> Result<TaskResponse, ClientError> {
        self.send(
            self.http
                .put(self.url(&format!("/api/tasks/{}", id)))
                .json(patch),
        )
        .await
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<DeletedTask, ClientError> {
        self.send(self.http.delete(self.url(&format!("/api/tasks/{}", id))))
            .await
    }

    pub async fn toggle_task(&self, id: Uuid) -> Result<TaskResponse, ClientError> {
        self.send(self.http.patch(self.url(&format!("/api/tasks/{}/toggle", id))))
            .await
    }

    pub async fn list_tags(&self) -> Result<Vec<TagResponse>, ClientError> {
        self.send(self.http.get(self.url("/api/tags"))).await
    }

    pub async fn create_tag(&self, input: &CreateTag) -> Result<TagResponse, ClientError> {
        self.send(self.http.post(self.url("/api/tags")).json(input))
            .await
    }

    pub async fn update_tag(
        &self,
        id: Uuid,
        patch: &UpdateTag,
    ) -> Result<TagResponse, ClientError> {
        self.send(
            self.http
                .put(self.url(&format!("/api/tags/{}", id)))
                .json(patch),
        )
        .await
    }

    pub async fn delete_tag(&self, id: Uuid) -> Result<DeletedTag, ClientError> {
        self.send(self.http.delete(self.url(&format!("/api/tags/{}", id))))
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let envelope: Envelope<T> = response.json().await.map_err(|_| ClientError::Malformed)?;

        if status.is_success() && envelope.status == "success" {
            envelope.data.ok_or(ClientError::Malformed)
        } else {
            Err(ClientError::Api {
                status,
                message: envelope
                    .message
                    .unwrap_or_else(|| "Unexpected server response".to_string()),
            })
        }
    }
}

fn task_query(filter: &TaskFilter) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("status", filter.status.to_string()),
        ("sortBy", filter.sort_by.to_string()),
        ("sortOrder", filter.sort_order.to_string()),
    ];

    if let Some(search) = &filter.search {
        params.push(("search", search.clone()));
    }
    if let Some(tag_ids) = &filter.tag_ids {
        if !tag_ids.is_empty() {
            let joined = tag_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(",");
            params.push(("tagIds", joined));
        }
    }

    params
}
