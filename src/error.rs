use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use thiserror::Error;

/// Error type for cafe store and page operations
#[derive(Error, Debug)]
pub enum CafeError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Cafe {0} not found")]
    NotFound(i64),

    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CafeError>;

impl ResponseError for CafeError {
    fn status_code(&self) -> StatusCode {
        match self {
            CafeError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            CafeError::NotFound(_) => crate::web::handlers::pages::not_found_response(),
            other => {
                error!("Request failed: {}", other);
                HttpResponse::InternalServerError()
                    .content_type("text/plain; charset=utf-8")
                    .body("Internal server error")
            }
        }
    }
}
