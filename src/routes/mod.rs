pub mod docs;
pub mod health;
pub mod lab;

use crate::error::AppError;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::{Serialize, de::DeserializeOwned};
use utoipa::ToSchema;

pub use docs::create_docs_routes;
pub use health::create_health_routes;
pub use lab::create_lab_routes;

/// Success envelope shared by every lab endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
        }
    }
}

/// Error envelope returned for every failed request
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Human readable error message
    pub message: String,
    /// HTTP status code
    #[serde(rename = "statusCode")]
    #[schema(example = 400)]
    pub status_code: u16,
}

/// Query string extractor whose rejection is rendered as [`ApiErrorResponse`]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| ApiQuery(value))
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
    }
}
