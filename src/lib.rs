//! Spendtrack is a small expense tracker with receipt scanning.
//!
//! The library is split into three parts:
//! - a ledger of income and expense transactions grouped by category, with
//!   aggregate reports (balance, yearly totals, per-category breakdown and a
//!   zero-filled monthly series) in [reports],
//! - a receipt [ingest]ion pipeline that stages an uploaded document, sends
//!   it to an external document-understanding service and turns the response
//!   into an unsaved candidate transaction for the user to review,
//! - a JSON REST API over both in [routes].
//!
//! Durable storage is behind the store traits in [stores], the remote
//! extraction service is behind the [extraction::ExtractionClient] trait, so
//! both can be substituted in tests.

#![warn(missing_docs)]

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tokio::signal;

mod app_state;
mod db;

pub mod extraction;
pub mod ingest;
pub mod models;
pub mod reports;
pub mod routes;
pub mod stores;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use routes::build_router;

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, used to shut the server down gracefully.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The multipart form did not contain a file.
    #[error("no file was uploaded")]
    NoFileUploaded,

    /// An empty string was used to create a category name.
    #[error("an empty string is not a valid category name")]
    EmptyCategoryName,

    /// A negative amount was used to create a transaction.
    ///
    /// Amounts are stored as non-negative magnitudes; the direction of the
    /// money flow is carried by the transaction type.
    #[error("transaction amounts must not be negative, got {0}")]
    NegativeAmount(f64),

    /// The category ID used to create a transaction did not match a valid
    /// category.
    #[error("the category ID does not refer to a valid category")]
    InvalidCategory,

    /// A year outside the supported calendar range was used for a report.
    #[error("{0} is not a valid calendar year")]
    InvalidYear(i32),

    /// The requested resource was not found.
    ///
    /// The client should check that the parameters (e.g., ID) are correct
    /// and that the resource has been created.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The multipart form could not be parsed.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// Writing or reading the request-scoped staging file failed.
    #[error("temporary storage failed: {0}")]
    TempStorage(String),

    /// The call to the external document-understanding service failed.
    ///
    /// Covers network failures, timeouts, non-success status codes and
    /// malformed transport payloads. The raw response *content* being
    /// low quality is not an error; see [crate::ingest].
    #[error("the extraction service failed: {0}")]
    ExtractionService(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == 787 =>
            {
                Error::InvalidCategory
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The coarse classification of an [Error], used to pick the HTTP status
/// code and the machine-readable `error` field of the JSON error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request was malformed (missing file, empty name, bad amount).
    Validation,
    /// A referenced resource does not exist.
    NotFound,
    /// The remote extraction service could not produce a response.
    ExtractionService,
    /// Local temporary storage failed.
    Resource,
    /// Anything else; details are logged, not shown to the client.
    Internal,
}

impl ErrorKind {
    /// The machine-readable label used in JSON error bodies.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::ExtractionService => "extraction_service",
            ErrorKind::Resource => "resource",
            ErrorKind::Internal => "internal",
        }
    }
}

impl Error {
    /// Classify the error for reporting to clients.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NoFileUploaded
            | Error::EmptyCategoryName
            | Error::NegativeAmount(_)
            | Error::InvalidCategory
            | Error::InvalidYear(_)
            | Error::MultipartError(_) => ErrorKind::Validation,
            Error::NotFound => ErrorKind::NotFound,
            Error::ExtractionService(_) => ErrorKind::ExtractionService,
            Error::TempStorage(_) => ErrorKind::Resource,
            Error::DatabaseLockError | Error::SqlError(_) => ErrorKind::Internal,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let kind = self.kind();

        let (status, message) = match kind {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, self.to_string()),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ErrorKind::ExtractionService => (StatusCode::BAD_GATEWAY, self.to_string()),
            ErrorKind::Resource => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            // Internal errors are not intended to be shown to the client.
            ErrorKind::Internal => {
                tracing::error!("An unexpected error occurred: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "an unexpected error occurred".to_owned(),
                )
            }
        };

        (
            status,
            Json(json!({ "error": kind.label(), "message": message })),
        )
            .into_response()
    }
}
