use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

/// Error taxonomy for all link operations.
///
/// `DuplicateCode` is an internal signal: the service recovers it inside the
/// allocation retry loop, so it must never reach a caller. If it does escape,
/// it is reported as a generic server error.
#[derive(Debug)]
pub enum AppError {
    InvalidUrl { message: String, details: Value },
    NotFound { message: String, details: Value },
    DuplicateCode { message: String, details: Value },
    CapacityExhausted { message: String, details: Value },
    RepositoryUnavailable { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn invalid_url(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidUrl { message: message.into(), details }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound { message: message.into(), details }
    }

    pub fn duplicate_code(message: impl Into<String>, details: Value) -> Self {
        Self::DuplicateCode { message: message.into(), details }
    }

    pub fn capacity_exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::CapacityExhausted { message: message.into(), details }
    }

    pub fn repository_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::RepositoryUnavailable { message: message.into(), details }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal { message: message.into(), details }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::RepositoryUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::DuplicateCode { .. } | Self::CapacityExhausted { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether the failure is the server's fault rather than the client's.
    fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, message) = match self {
            Self::InvalidUrl { message, .. } => ("invalid url", message),
            Self::NotFound { message, .. } => ("not found", message),
            Self::DuplicateCode { message, .. } => ("duplicate code", message),
            Self::CapacityExhausted { message, .. } => ("capacity exhausted", message),
            Self::RepositoryUnavailable { message, .. } => ("repository unavailable", message),
            Self::Internal { message, .. } => ("internal error", message),
        };
        write!(f, "{kind}: {message}")
    }
}

/// JSON envelope: `{"error": {"code", "message", "details"}}`.
#[derive(Serialize)]
struct ErrorEnvelope {
    error: ErrorPayload,
}

#[derive(Serialize)]
struct ErrorPayload {
    code: &'static str,
    message: String,
    details: Value,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let status = self.status();

        let payload = match self {
            Self::InvalidUrl { message, details } => ErrorPayload {
                code: "invalid_url",
                message,
                details,
            },
            Self::NotFound { message, details } => ErrorPayload {
                code: "not_found",
                message,
                details,
            },
            Self::CapacityExhausted { message, details } => ErrorPayload {
                code: "capacity_exhausted",
                message,
                details,
            },
            Self::RepositoryUnavailable { message, details } => ErrorPayload {
                code: "repository_unavailable",
                message,
                details,
            },
            // An internal failure, or a DuplicateCode the retry loop should
            // have absorbed, carries no diagnostic detail to the client.
            Self::DuplicateCode { .. } | Self::Internal { .. } => ErrorPayload {
                code: "internal_error",
                message: "Internal server error".into(),
                details: json!({}),
            },
        };

        (status, Json(ErrorEnvelope { error: payload })).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::invalid_url(
            "Request validation failed",
            serde_json::to_value(&errors).unwrap_or_else(|_| json!({})),
        )
    }
}

/// Classifies a database failure into the application taxonomy.
///
/// A unique-constraint violation is the repository losing a code-allocation
/// race and becomes `DuplicateCode`; pool and connection failures become
/// `RepositoryUnavailable`; anything else is an internal error.
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return AppError::duplicate_code(
            "Unique constraint violation",
            json!({ "constraint": db.constraint() }),
        );
    }

    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            AppError::repository_unavailable("Database unavailable", json!({}))
        }
        _ => AppError::internal("Database error", json!({})),
    }
}
