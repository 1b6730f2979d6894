//! Error types for the course API

use std::sync::OnceLock;

use axum::{
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use tracing::error;

static EXPOSE_DETAIL: OnceLock<bool> = OnceLock::new();

/// Include internal error detail in 5xx bodies. Set once at startup.
pub fn expose_detail(enabled: bool) {
  let _ = EXPOSE_DETAIL.set(enabled);
}

#[derive(Debug, thiserror::Error)]
pub enum Auth {
  #[error("Authentication required")]
  MissingToken,
  #[error("Invalid token, please sign in again")]
  InvalidToken,
  #[error("Token expired, please sign in again")]
  TokenExpired,
  #[error("Invalid email or password")]
  InvalidCredentials,
  #[error("Current password is incorrect")]
  WrongPassword,
  #[error("Account is suspended, contact an administrator")]
  Inactive,
  #[error("Reset code is invalid or expired")]
  InvalidResetCode,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("Database error: {0}")]
  Database(DbErr),

  #[error("Duplicate data")]
  Duplicate,

  #[error("Database disconnected")]
  Disconnected,

  #[error("{0}")]
  Validation(String),

  #[error(transparent)]
  Auth(#[from] Auth),

  #[error("{0}")]
  Forbidden(&'static str),

  #[error("{0} not found")]
  NotFound(&'static str),

  #[error("{0}")]
  Conflict(&'static str),

  #[error("Internal error: {0}")]
  Internal(String),
}

impl Error {
  pub fn validation(message: impl Into<String>) -> Self {
    Self::Validation(message.into())
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Error::Validation(_) => StatusCode::BAD_REQUEST,
      Error::Auth(Auth::Inactive) => StatusCode::FORBIDDEN,
      Error::Auth(Auth::InvalidResetCode) => StatusCode::BAD_REQUEST,
      Error::Auth(_) => StatusCode::UNAUTHORIZED,
      Error::Forbidden(_) => StatusCode::FORBIDDEN,
      Error::NotFound(_) => StatusCode::NOT_FOUND,
      Error::Conflict(_) | Error::Duplicate => StatusCode::CONFLICT,
      Error::Database(_) | Error::Disconnected | Error::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }
}

impl From<DbErr> for Error {
  fn from(err: DbErr) -> Self {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
      return Error::Duplicate;
    }
    match err {
      DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => Error::Disconnected,
      err => Error::Database(err),
    }
  }
}

impl From<JsonRejection> for Error {
  fn from(rejection: JsonRejection) -> Self {
    Error::Validation(rejection.body_text())
  }
}

impl From<PathRejection> for Error {
  fn from(rejection: PathRejection) -> Self {
    Error::Validation(rejection.body_text())
  }
}

impl From<QueryRejection> for Error {
  fn from(rejection: QueryRejection) -> Self {
    Error::Validation(rejection.body_text())
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();

    let body = if status.is_server_error() {
      error!("Request failed: {self}");
      let message = match self {
        Error::Disconnected => "Database disconnected",
        _ => "Internal server error",
      };
      let mut body = json::json!({ "success": false, "message": message });
      if EXPOSE_DETAIL.get().copied().unwrap_or(false) {
        body["detail"] = json::Value::String(self.to_string());
      }
      body
    } else {
      json::json!({ "success": false, "message": self.to_string() })
    };

    (status, axum::Json(body)).into_response()
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_status_mapping() {
    assert_eq!(Error::validation("x").status(), StatusCode::BAD_REQUEST);
    assert_eq!(
      Error::Auth(Auth::TokenExpired).status(),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(Error::Auth(Auth::Inactive).status(), StatusCode::FORBIDDEN);
    assert_eq!(Error::Forbidden("no").status(), StatusCode::FORBIDDEN);
    assert_eq!(Error::NotFound("Course").status(), StatusCode::NOT_FOUND);
    assert_eq!(Error::Duplicate.status(), StatusCode::CONFLICT);
    assert_eq!(
      Error::Disconnected.status(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_connection_errors_are_classified() {
    let err = Error::from(DbErr::Conn(sea_orm::RuntimeErr::Internal(
      "gone".into(),
    )));
    assert!(matches!(err, Error::Disconnected));

    let err = Error::from(DbErr::RecordNotFound("x".into()));
    assert!(matches!(err, Error::Database(_)));
  }
}
