//! HTTP-facing error taxonomy.
//!
//! Every handler returns `Result<HttpResponse, ApiError>`. The response body is
//! always `{ "message": ... }`; internal detail carried by `Unexpected` is logged
//! and never serialized.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::auth::password::HashError;
use crate::auth::token::TokenError;
use crate::db::StoreError;
use crate::validation::ValidationError;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const DUPLICATE_EMAIL: &str = "User already exists with this email";
pub const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Unauthenticated(&'static str),
    #[error("{}", INVALID_CREDENTIALS)]
    InvalidCredentials,
    #[error("{}", DUPLICATE_EMAIL)]
    DuplicateEmail,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{}", INTERNAL_ERROR)]
    Unexpected(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => ApiError::DuplicateEmail,
            other => ApiError::Unexpected(other.to_string()),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid | TokenError::Expired => {
                ApiError::Unauthenticated("Invalid or expired token")
            }
            TokenError::Encode(detail) => ApiError::Unexpected(detail),
        }
    }
}

impl From<HashError> for ApiError {
    fn from(err: HashError) -> Self {
        ApiError::Unexpected(err.to_string())
    }
}

impl From<actix_web::error::BlockingError> for ApiError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        ApiError::Unexpected(err.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::DuplicateEmail => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Unexpected(detail) = self {
            log::error!("[API] Unexpected error: {}", detail);
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": self.to_string()
        }))
    }
}
