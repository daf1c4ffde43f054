//! Error type shared by the ingest pipeline, the store and the HTTP handlers.
//!
//! Handlers follow a single pattern: an inner `async fn` returns
//! `Result<_, AppError>`, and the actix `process` wrapper turns the error into
//! a JSON response with [`AppError::respond`]. Client mistakes (401/400/413)
//! carry a message the caller can act on. Server failures (500) log the full
//! internal error and return only a fixed summary of the failure class, so
//! SQLite or calamine messages never reach the client.

use actix_multipart::MultipartError;
use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::responses::ErrorBody;
use log::{error, warn};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid Excel data format: {0}")]
    InvalidFormat(String),

    #[error("File exceeds the {0} byte upload limit")]
    PayloadTooLarge(usize),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Kept as text: `MultipartError` can hold a non-`Send` `actix_web::Error`,
    /// and `AppError` crosses `web::block`.
    #[error("Multipart error: {0}")]
    Multipart(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Multipart(err.to_string())
    }
}

impl From<BlockingError> for AppError {
    fn from(err: BlockingError) -> Self {
        AppError::Internal(format!("blocking task failed: {}", err))
    }
}

impl AppError {
    /// The `details` text that is safe to show a client.
    fn public_details(&self) -> Option<String> {
        match self {
            AppError::Unauthorized | AppError::BadRequest(_) | AppError::PayloadTooLarge(_) => None,
            AppError::InvalidFormat(msg) => Some(msg.clone()),
            AppError::Multipart(_) => Some("The request body is not a valid multipart form".into()),
            AppError::Spreadsheet(_) => Some("The spreadsheet could not be read".into()),
            AppError::Database(_) => Some("A storage error occurred".into()),
            AppError::Io(_) => Some("A filesystem error occurred".into()),
            AppError::Config(_) | AppError::Internal(_) => {
                Some("An internal error occurred".into())
            }
        }
    }

    /// Logs the error and builds the JSON response for it.
    ///
    /// `context` is the summary placed in `error` for server-side failures,
    /// e.g. `"Failed to fetch cafes"`. Client errors use their own message.
    pub fn respond(&self, context: &str) -> HttpResponse {
        let status = self.status_code();
        let summary = match self {
            AppError::Unauthorized | AppError::BadRequest(_) | AppError::PayloadTooLarge(_) => {
                self.to_string()
            }
            AppError::InvalidFormat(_) => "Invalid Excel data format".to_string(),
            AppError::Multipart(_) => "Malformed upload".to_string(),
            _ => context.to_string(),
        };

        if status.is_server_error() {
            error!("{}: {}", context, self);
        } else {
            warn!("{}: {}", context, self);
        }

        HttpResponse::build(status).json(ErrorBody {
            error: summary,
            details: self.public_details(),
        })
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::InvalidFormat(_) | AppError::Multipart(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Spreadsheet(_)
            | AppError::Database(_)
            | AppError::Io(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        self.respond("Internal server error")
    }
}
