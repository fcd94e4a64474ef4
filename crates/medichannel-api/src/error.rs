//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body carries an `error` message. Domain errors also carry the
//! `notice` a client should display and, for failed access checks, the
//! `redirect` path it should navigate to.

use axum::{
  Json,
  extract::rejection::{JsonRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use medichannel_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] CoreError),

  #[error("bad request: {0}")]
  BadRequest(String),
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::Core(e) => match e {
        CoreError::Unauthenticated => StatusCode::UNAUTHORIZED,
        CoreError::Forbidden(_) | CoreError::MissingCapability(_) => StatusCode::FORBIDDEN,
        CoreError::InvalidRole(_) | CoreError::EmptyMessage => StatusCode::BAD_REQUEST,
        CoreError::UnknownActor(_)
        | CoreError::NoSuchConversation(_)
        | CoreError::NoConversationSelected => StatusCode::NOT_FOUND,
        CoreError::SelfReassignment => StatusCode::CONFLICT,
        CoreError::RemoteFetchFailure(_) | CoreError::RemoteWriteFailure(_) => {
          StatusCode::INTERNAL_SERVER_ERROR
        }
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = match &self {
      ApiError::BadRequest(m) => json!({ "error": m }),
      ApiError::Core(e) => json!({
        "error":    e.to_string(),
        "notice":   e.notice(),
        "redirect": e.redirect().map(|r| r.path()),
      }),
    };
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    (status, Json(body)).into_response()
  }
}
