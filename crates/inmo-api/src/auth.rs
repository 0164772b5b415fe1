//! Session token extraction.

use std::convert::Infallible;

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};

/// The opaque session token from `Authorization: Bearer <token>`, if any.
///
/// Never rejects: a missing or malformed header yields `SessionToken(None)`,
/// which the executor resolves to an anonymous actor.
#[derive(Debug, Clone, Default)]
pub struct SessionToken(pub Option<String>);

impl SessionToken {
  pub fn as_deref(&self) -> Option<&str> { self.0.as_deref() }
}

pub fn bearer(headers: &HeaderMap) -> Option<String> {
  let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
  let (scheme, token) = value.split_once(' ')?;
  let token = token.trim();
  (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_owned())
}

impl<S> FromRequestParts<S> for SessionToken
where
  S: Send + Sync,
{
  type Rejection = Infallible;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    Ok(SessionToken(bearer(&parts.headers)))
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    h
  }

  #[test]
  fn parses_bearer_tokens() {
    assert_eq!(bearer(&headers("Bearer abc123")).as_deref(), Some("abc123"));
    assert_eq!(bearer(&headers("bearer  abc123 ")).as_deref(), Some("abc123"));
  }

  #[test]
  fn ignores_other_schemes_and_empty_tokens() {
    assert_eq!(bearer(&headers("Basic dXNlcjpwYXNz")), None);
    assert_eq!(bearer(&headers("Bearer ")), None);
    assert_eq!(bearer(&HeaderMap::new()), None);
  }
}
