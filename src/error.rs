use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::db::ConnectionError;
use crate::flash;
use crate::validate::FieldError;

/// Message shown to the user when an internal failure must not leak detail.
pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// Top-level handler error. Not-found conditions redirect with a notice;
/// everything else is logged server-side and surfaced only as the generic
/// message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(message) => {
                redirect_with_flash(StatusCode::SEE_OTHER, flash::Level::Error, &message)
            }
            Self::Connection(err) => {
                error!(error = %err, "database unavailable");
                redirect_with_flash(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    flash::Level::Error,
                    GENERIC_MESSAGE,
                )
            }
            Self::Database(err) => {
                error!(error = %err, "database operation failed");
                redirect_with_flash(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    flash::Level::Error,
                    GENERIC_MESSAGE,
                )
            }
            Self::Internal(err) => {
                error!(error = %err, "unhandled error");
                redirect_with_flash(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    flash::Level::Error,
                    GENERIC_MESSAGE,
                )
            }
        }
    }
}

fn redirect_with_flash(status: StatusCode, level: flash::Level, message: &str) -> Response {
    (
        status,
        [
            (header::LOCATION, "/vehicles".to_string()),
            (header::SET_COOKIE, flash::cookie(level, message).to_string()),
        ],
    )
        .into_response()
}

/// True when the error is a violated unique constraint (SQLSTATE 23505),
/// the race-window backstop behind the friendlier pre-checks.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}

#[derive(Debug, Serialize)]
struct FormErrorBody<'a, T: Serialize> {
    errors: &'a [FieldError],
    values: &'a T,
}

/// Re-presents a rejected form: the violated rules plus the submitted
/// values, so nothing the user typed is lost.
pub fn form_rejection<T: Serialize>(
    status: StatusCode,
    errors: &[FieldError],
    values: &T,
) -> Response {
    (status, Json(FormErrorBody { errors, values })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{LOCATION, SET_COOKIE};

    #[test]
    fn not_found_redirects_to_the_vehicle_list() {
        let response = AppError::NotFound("Vehicle not found.".into()).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/vehicles");
        let cookie = response.headers()[SET_COOKIE].to_str().expect("ascii");
        assert!(cookie.contains("Vehicle not found."));
    }

    #[test]
    fn database_errors_never_leak_driver_detail() {
        let response = AppError::Database(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[LOCATION], "/vehicles");
        let cookie = response.headers()[SET_COOKIE].to_str().expect("ascii");
        assert!(cookie.contains(GENERIC_MESSAGE));
        assert!(!cookie.contains("pool"));
    }

    #[test]
    fn form_rejection_echoes_submitted_values() {
        let errors = vec![FieldError::new("brand", "Brand is required.")];
        let values = serde_json::json!({ "brand": "", "model": "Corolla" });
        let response = form_rejection(StatusCode::UNPROCESSABLE_ENTITY, &errors, &values);
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
