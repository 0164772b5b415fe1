//! Request extractors whose rejections are envelopes.
//!
//! axum's stock `Query` and `Bytes` reject with a plain-text body; these
//! wrappers delegate to them and turn the rejection into an [`ApiError`].

use axum::{
  extract::{FromRequest, FromRequestParts, Query, Request},
  http::{StatusCode, request::Parts},
};
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::ApiError;

pub const MSG_INVALID_QUERY: &str = "Parámetros de consulta inválidos";
pub const MSG_TOO_LARGE: &str = "La solicitud supera el tamaño permitido";
pub const MSG_UNREADABLE_BODY: &str = "No se pudo leer el cuerpo de la solicitud";

/// Typed query string.
#[derive(Debug, Clone, Default)]
pub struct Params<T>(pub T);

impl<T, S> FromRequestParts<S> for Params<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    match Query::<T>::from_request_parts(parts, state).await {
      Ok(Query(value)) => Ok(Params(value)),
      Err(rejection) => {
        tracing::debug!(error = %rejection.body_text(), "rejected query string");
        Err(ApiError::BadRequest(MSG_INVALID_QUERY.to_owned()))
      }
    }
  }
}

/// Raw request body, bounded by the route's `DefaultBodyLimit`.
#[derive(Debug, Clone, Default)]
pub struct Body(pub Bytes);

impl<S> FromRequest<S> for Body
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    match Bytes::from_request(req, state).await {
      Ok(bytes) => Ok(Body(bytes)),
      Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
        Err(ApiError::TooLarge(MSG_TOO_LARGE))
      }
      Err(rejection) => {
        tracing::debug!(error = %rejection.body_text(), "unreadable request body");
        Err(ApiError::BadRequest(MSG_UNREADABLE_BODY.to_owned()))
      }
    }
  }
}
