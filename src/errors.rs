use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Uniform error body: `{"type": ..., "message": ...}`
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbError(#[from] DbErr),

    #[error("Token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("{resource} with id {id} not found")]
    EntityNotFound { resource: &'static str, id: i64 },

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Internal server error")]
    Internal,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DbError(_) | AppError::Jwt(_) | AppError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::EntityNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }
        let body = ErrorResponse {
            kind: self.kind(),
            message: self.to_string(),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::DbError(_) => "DataAccessException",
            AppError::Jwt(_) | AppError::Internal => "InternalServerError",
            AppError::EntityNotFound { .. } => "EntityNotFoundException",
            AppError::InvalidInput(_) => "IllegalArgumentException",
            AppError::Unauthorized(_) => "BadCredentialsException",
            AppError::Forbidden(_) => "AccessDeniedException",
        }
    }

    pub fn access_denied() -> Self {
        AppError::Forbidden("Access is denied".to_string())
    }
}
