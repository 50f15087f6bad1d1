//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. `AppError` is the only place
//! where failures become HTTP responses: each response is a JSON object with a
//! `message` field, and store failures are captured to Sentry before the
//! response is built.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;

/// Message for any missing or malformed required field.
pub const MISSING_FIELDS: &str = "Faltan datos obligatorios.";

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// A store operation failed. `context` is the message shown to the client.
    #[error("{context} ({source})")]
    Database {
        context: &'static str,
        #[source]
        source: RepositoryError,
    },

    /// The owner or marker does not exist.
    #[error("Not found: {0}")]
    NotFound(&'static str),

    /// Required input is missing or malformed.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Wrap a store error with the client-facing message for the operation.
    ///
    /// ```rust,ignore
    /// store.find_by_email(&email).await.map_err(AppError::database("Error al obtener el mapa del usuario."))?;
    /// ```
    pub fn database(context: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |source| Self::Database { context, source }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if let Self::Database { context, source } = &self {
            let event_id = sentry::capture_error(source);
            tracing::error!(
                error = %source,
                context,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose store error details to clients
        let message = match self {
            Self::Database { context, .. } | Self::NotFound(context) => context.to_owned(),
            Self::BadRequest(message) => message,
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
