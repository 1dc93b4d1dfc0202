use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

use crate::gateway::GatewayError;
use crate::repo::RepoError;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{0}")] BadRequest(String),
    #[error("unauthorized")] Unauthorized,
    #[error("forbidden")] Forbidden,
    #[error("not found")] NotFound,
    #[error("conflict")] Conflict,
    #[error("slug '{slug}' is already in use")] DuplicateSlug { slug: String, suggestions: Vec<String> },
    #[error("internal error")] Internal,
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound => ApiError::NotFound,
            RepoError::Conflict => ApiError::Conflict,
            RepoError::Protected => ApiError::Forbidden,
            RepoError::Internal(msg) => {
                log::error!("store error: {msg}");
                ApiError::Internal
            }
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::NotFound => ApiError::NotFound,
            GatewayError::DuplicateSlug { slug, suggestions } => ApiError::DuplicateSlug { slug, suggestions },
            GatewayError::Validation(msg) => ApiError::BadRequest(msg),
            GatewayError::Serialization(msg) => {
                log::error!("page serialization failed: {msg}");
                ApiError::Internal
            }
            GatewayError::Repo(e) => e.into(),
        }
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        use actix_web::http::StatusCode;
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict | ApiError::DuplicateSlug { .. } => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let suggestions = match self {
            ApiError::DuplicateSlug { suggestions, .. } => Some(suggestions.clone()),
            _ => None,
        };
        HttpResponse::build(status).json(ApiErrorBody { error: self.to_string(), suggestions })
    }
}
