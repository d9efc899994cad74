use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::validation::ValidationErrors;

pub const PROSPECT_NOT_FOUND_MESSAGE: &str = "Prospect Pessoa Física não encontrado.";
pub const CPF_CONFLICT_MESSAGE: &str = "Conflito: CPF já está em uso!";
pub const QUEUE_EMPTY_MESSAGE: &str = "A fila de atendimento de prospects está vazia!";

/// Application-specific error types.
///
/// The service layer only returns kinds; user-facing text and status codes
/// are decided in [`IntoResponse`].
#[derive(Debug)]
pub enum AppError {
    /// Request body failed field validation.
    Validation(ValidationErrors),
    /// Request could not be parsed (malformed JSON, bad path parameter).
    BadRequest(String),
    /// No prospect with the given id.
    ProspectNotFound(i64),
    /// A prospect with the informed CPF already exists.
    CpfConflict,
    /// The service queue has nothing to hand out.
    QueueEmpty,
    /// The store refused a write because the CPF is already taken.
    UniqueViolation(String),
    /// Database-related errors.
    DatabaseError(sqlx::Error),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(errors) => write!(f, "Validation failed: {:?}", errors),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::ProspectNotFound(id) => write!(f, "Prospect {} not found", id),
            AppError::CpfConflict => write!(f, "CPF already in use"),
            AppError::QueueEmpty => write!(f, "Service queue is empty"),
            AppError::UniqueViolation(cpf) => write!(f, "Unique violation on cpf {}", cpf),
            AppError::DatabaseError(e) => write!(f, "Database error: {}", e),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Maps each error variant to a status code and body.
    ///
    /// Domain failures answer with plain text, validation with a field map,
    /// and everything unexpected with a generic JSON error after logging.
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(errors) => {
                tracing::debug!("Validation failed: {:?}", errors);
                return (StatusCode::BAD_REQUEST, Json(errors)).into_response();
            }
            AppError::ProspectNotFound(_) => {
                return (StatusCode::NOT_FOUND, PROSPECT_NOT_FOUND_MESSAGE).into_response();
            }
            AppError::CpfConflict => {
                return (StatusCode::CONFLICT, CPF_CONFLICT_MESSAGE).into_response();
            }
            AppError::QueueEmpty => {
                return (StatusCode::NOT_FOUND, QUEUE_EMPTY_MESSAGE).into_response();
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::UniqueViolation(cpf) => {
                tracing::error!("Unique constraint violated for cpf {}", cpf);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::DatabaseError(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::WithContext { source, context } => {
                tracing::error!("Error with context: {} -> {}", context, source);
                return source.into_response();
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err)
    }
}

/// A CPF without digits is reported against the `cpf` field.
impl From<crate::cpf::InvalidInput> for AppError {
    fn from(err: crate::cpf::InvalidInput) -> Self {
        let mut errors = ValidationErrors::new();
        errors.insert("cpf".to_string(), err.to_string());
        AppError::Validation(errors)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}

impl<T> ResultExt<T> for Result<T, sqlx::Error> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(AppError::from).context(context)
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(AppError::from).with_context(f)
    }
}
