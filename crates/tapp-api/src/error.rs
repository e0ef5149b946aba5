//! Handler errors and their JSON rendering.
//!
//! Every failure answers with `{"error": "<message>"}`. Unknown positions are
//! 404s, unparseable parameters are 400s, and record source failures are
//! logged and surface as 500s.

use std::fmt::Display;

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  /// The record source failed to fetch or commit.
  #[error("{0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
  error: &'a str,
}

impl ApiError {
  pub fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(err))
  }

  /// A query parameter segment that did not parse.
  pub fn invalid_param(field: &str, value: &str, reason: impl Display) -> Self {
    Self::BadRequest(format!("{field}: invalid value {value:?}: {reason}"))
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<tapp_core::Error> for ApiError {
  fn from(err: tapp_core::Error) -> Self {
    let message = err.to_string();
    match err {
      tapp_core::Error::UnknownPosition(_) => Self::NotFound(message),
      _ => Self::BadRequest(message),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = self.to_string();
    if status.is_server_error() {
      tracing::error!(error = %message, "store request failed");
    } else {
      tracing::debug!(%status, error = %message, "rejected request");
    }
    (status, Json(ErrorBody { error: &message })).into_response()
  }
}
