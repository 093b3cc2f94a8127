//! Error handling for the HTTP layer.
//!
//! Handlers return [`AppResult`]; every failure funnels through [`AppError`],
//! which renders the `{"error", "code"}` envelope the frontend keys on.
//! Domain errors arrive as [`CoreError`]; database errors are classified by
//! constraint so that, e.g., a duplicate username surfaces as a 409 instead
//! of a generic 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use estoca_core::error::CoreError;
use serde::Serialize;

/// Error variants produced by handlers and middleware.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request-level validation failure: a bad field value, an unknown enum
    /// literal, a malformed CSV header.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A denial from the plan limit gate. Carries the gate's reason, which
    /// names the plan and quota ("Gratuito plan allows at most 50 products").
    #[error("plan limit: {0}")]
    PlanLimit(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

/// Convenience alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Wire shape of every error response.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl AppError {
    /// HTTP status, machine-readable code, and client-facing message.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => core_parts(core),
            AppError::Database(err) => db_parts(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::PlanLimit(reason) => (StatusCode::FORBIDDEN, "PLAN_LIMIT", reason.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "internal error");
                internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = self.parts();
        (status, Json(ErrorBody { error, code })).into_response()
    }
}

fn core_parts(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "internal domain error");
            internal()
        }
    }
}

/// Map database failures onto the API surface.
///
/// Constraint names are part of the schema's contract with this function:
/// every unique constraint is named `uq_*` (usernames, category names per
/// company, plan names, the notification dedup index), so a 23505 on one of
/// them is always a client-visible duplicate. Foreign-key and CHECK
/// violations reach here only through client input (a stale `category_id`,
/// an out-of-range settings value) and map to 400.
fn db_parts(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    if matches!(err, sqlx::Error::RowNotFound) {
        return (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "resource not found".to_string(),
        );
    }

    if let sqlx::Error::Database(db) = err {
        match db.code().as_deref() {
            // unique_violation
            Some("23505") if db.constraint().is_some_and(|c| c.starts_with("uq_")) => {
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!(
                        "duplicate value violates {}",
                        db.constraint().unwrap_or("a unique constraint")
                    ),
                );
            }
            // foreign_key_violation
            Some("23503") => {
                return (
                    StatusCode::BAD_REQUEST,
                    "BAD_REQUEST",
                    "referenced resource does not exist".to_string(),
                );
            }
            // check_violation
            Some("23514") => {
                return (
                    StatusCode::BAD_REQUEST,
                    "BAD_REQUEST",
                    "value out of range".to_string(),
                );
            }
            _ => {}
        }
    }

    tracing::error!(error = %err, "database error");
    internal()
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "an internal error occurred".to_string(),
    )
}
