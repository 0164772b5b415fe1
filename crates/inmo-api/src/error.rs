//! Response types: every body is an [`Envelope`].

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use inmo_core::{
  action::Action,
  envelope::Envelope,
  executor::{Failure, FailureKind, MSG_INTERNAL, Outcome},
  policy::Operation,
};
use serde::Serialize;
use thiserror::Error;

/// HTTP status for a failure kind.
pub fn status_of(kind: FailureKind) -> StatusCode {
  match kind {
    FailureKind::Validation => StatusCode::BAD_REQUEST,
    FailureKind::Authorization => StatusCode::FORBIDDEN,
    FailureKind::NotFound => StatusCode::NOT_FOUND,
    FailureKind::Conflict => StatusCode::CONFLICT,
    FailureKind::Store => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

/// The response to a gated operation.
pub struct Reply {
  status:   StatusCode,
  envelope: Envelope,
}

impl Reply {
  pub fn new(action: Action, outcome: Outcome) -> Self {
    let status = match &outcome {
      Ok(_) if action.operation() == Operation::Create => StatusCode::CREATED,
      Ok(_) => StatusCode::OK,
      Err(failure) => status_of(failure.kind),
    };
    Self { status, envelope: Envelope::from(outcome) }
  }

  /// A failure raised before the executor ran (e.g. an unparseable body).
  pub fn failure(failure: Failure) -> Self {
    Self {
      status:   status_of(failure.kind),
      envelope: Envelope::from(Err(failure) as Outcome),
    }
  }
}

impl IntoResponse for Reply {
  fn into_response(self) -> Response { (self.status, Json(self.envelope)).into_response() }
}

/// An error returned by a public (ungated) read handler or an extractor.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(&'static str),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("payload too large: {0}")]
  TooLarge(&'static str),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
    Self::Store(Box::new(err))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.to_owned()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::TooLarge(m) => (StatusCode::PAYLOAD_TOO_LARGE, m.to_owned()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "public read failed");
        (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL.to_owned())
      }
    };
    (status, Json(Envelope::<()>::err(message))).into_response()
  }
}

/// A successful public read.
pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> { Json(Envelope::ok(data)) }
