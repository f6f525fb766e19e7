//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use work_release_core::{DomainError, ErrorKind};

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// A request the engine rejected. Carries the domain kind and message.
  #[error("{1}")]
  Domain(ErrorKind, String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Sort a store error into a domain rejection or an infrastructure
  /// failure.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + DomainError + Send + Sync + 'static,
  {
    if let Some(domain) = err.domain() {
      return Self::Domain(domain.kind(), domain.to_string());
    }
    Self::Store(Box::new(err))
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Domain(kind, _) => match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::InvalidTransition
        | ErrorKind::Conflict
        | ErrorKind::AssignmentNotActive => StatusCode::CONFLICT,
        ErrorKind::IneligibleEmployer | ErrorKind::IneligibleSubject => {
          StatusCode::UNPROCESSABLE_ENTITY
        }
        ErrorKind::Directory => StatusCode::BAD_GATEWAY,
      },
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn kind(&self) -> String {
    match self {
      ApiError::Domain(kind, _) => kind.to_string(),
      ApiError::BadRequest(_) => "bad_request".into(),
      ApiError::Store(_) => "storage".into(),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    let body = json!({ "error": self.to_string(), "kind": self.kind() });
    (status, Json(body)).into_response()
  }
}
