//! Handlers for listing images.
//!
//! Uploads send the raw file as the request body with its `Content-Type`;
//! the alt text travels in the query string:
//!
//! ```text
//! POST /properties/{id}/images?alt=Living
//! Content-Type: image/jpeg
//! ```

use axum::{
  Json,
  extract::{Path, State},
  http::{HeaderMap, header},
};
use inmo_core::{
  action::{Action, Payload},
  envelope::Envelope,
  image::{Image, Upload},
  objects::ObjectStorage,
  policy::Resource,
  validate::MSG_INVALID_ID,
};
use serde::Deserialize;

use crate::{
  AppState, Backend, Reply, SessionToken,
  error::{ApiError, ok},
  extract::{Body, Params},
  parse_id,
};

/// `GET /properties/{id}/images`. Empty-handed for inactive listings.
pub async fn list_public<S, O>(
  State(state): State<AppState<S, O>>,
  Path(id): Path<String>,
) -> Result<Json<Envelope<Vec<Image>>>, ApiError>
where
  S: Backend,
  O: ObjectStorage + 'static,
{
  let id = parse_id(&id).ok_or_else(|| ApiError::BadRequest(MSG_INVALID_ID.to_owned()))?;
  let property = state
    .store
    .get_property(id)
    .await
    .map_err(ApiError::store)?
    .filter(|p| p.active)
    .ok_or(ApiError::NotFound(Resource::Property.not_found_message()))?;
  Ok(ok(property.images))
}

#[derive(Debug, Deserialize, Default)]
pub struct UploadParams {
  pub alt: Option<String>,
}

/// `POST /properties/{id}/images[?alt=..]`
pub async fn upload<S, O>(
  State(state): State<AppState<S, O>>,
  token: SessionToken,
  Path(id): Path<String>,
  Params(params): Params<UploadParams>,
  headers: HeaderMap,
  Body(body): Body,
) -> Reply
where
  S: Backend,
  O: ObjectStorage + 'static,
{
  let content_type = headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .unwrap_or_default()
    .to_owned();

  let upload = Upload {
    content_type,
    bytes: body,
    alt: params.alt.filter(|a| !a.trim().is_empty()),
  };
  state
    .run(Action::UploadImage, Payload::Upload(upload), &token, parse_id(&id))
    .await
}

/// `DELETE /images/{id}`
pub async fn remove<S, O>(
  State(state): State<AppState<S, O>>,
  token: SessionToken,
  Path(id): Path<String>,
) -> Reply
where
  S: Backend,
  O: ObjectStorage + 'static,
{
  state
    .run(Action::DeleteImage, Payload::empty(), &token, parse_id(&id))
    .await
}
