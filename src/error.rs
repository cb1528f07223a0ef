use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Persistence failure: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Reorder stopped after {applied} of {total} updates: {message}")]
    PartialReorder {
        applied: usize,
        total: usize,
        message: String,
    },

    #[error("Unsupported component: {0}")]
    UnsupportedComponent(String),

    #[error("Invalid component config: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl AppError {
    /// Constraint failures are the caller's fault, not the store's.
    fn constraint_violation(&self) -> Option<(StatusCode, &'static str)> {
        let AppError::Database(sqlx::Error::Database(e)) = self else {
            return None;
        };
        if e.is_unique_violation() {
            Some((StatusCode::CONFLICT, "A record with this path already exists"))
        } else if e.is_foreign_key_violation() {
            Some((StatusCode::BAD_REQUEST, "Referenced page or component type does not exist"))
        } else {
            None
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let error_message = match self {
            AppError::Database(ref e) => match self.constraint_violation() {
                Some((_, message)) => message.to_string(),
                None => {
                    tracing::error!("Database error: {:?}", e);
                    "Persistence failure".to_string()
                }
            },
            AppError::Serialization(ref e) => {
                tracing::error!("Serialization error: {:?}", e);
                "Stored data could not be decoded".to_string()
            }
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {:?}", e);
                e.clone()
            }
            AppError::PartialReorder { .. } => {
                tracing::warn!("{}", self);
                self.to_string()
            }
            AppError::NotFound(ref e)
            | AppError::Validation(ref e) => e.clone(),
            AppError::UnsupportedComponent(_) | AppError::InvalidConfig(_) => self.to_string(),
        };

        HttpResponse::build(self.status_code())
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(ErrorResponse {
                detail: error_message,
            })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => self
                .constraint_violation()
                .map(|(status, _)| status)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PartialReorder { .. } => StatusCode::CONFLICT,
            AppError::UnsupportedComponent(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
