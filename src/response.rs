use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Success envelope wrapping every 2xx payload as
/// `{"status": "success", "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiSuccess<T> {
    status: &'static str,
    data: T,
}

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
