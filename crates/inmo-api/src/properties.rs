//! Handlers for `/properties` endpoints.
//!
//! Reads are public and never reveal inactive listings. Every write goes
//! through the executor.

use axum::{
  Json,
  extract::{Path, State},
};
use inmo_core::{
  MAX_LIMIT,
  action::{Action, Payload},
  envelope::Envelope,
  objects::ObjectStorage,
  policy::Resource,
  property::{Property, PropertyKind, PropertyOperation, PropertyQuery, PropertySort},
  validate::MSG_INVALID_ID,
};
use serde::Deserialize;

use crate::{
  AppState, Backend, Reply, SessionToken,
  error::{ApiError, ok},
  extract::{Body, Params},
  parse_id,
};

// ─── Public reads ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
  pub operation:   Option<PropertyOperation>,
  #[serde(rename = "type")]
  pub kind:        Option<PropertyKind>,
  pub city:        Option<String>,
  pub featured:    Option<bool>,
  pub min_price:   Option<f64>,
  pub max_price:   Option<f64>,
  pub min_rooms:   Option<u32>,
  /// Free-text filter over title and address.
  pub q:           Option<String>,
  pub sort:        Option<PropertySort>,
  pub limit:       Option<usize>,
  pub offset:      Option<usize>,
}

impl ListingParams {
  fn into_query(self) -> PropertyQuery {
    PropertyQuery {
      operation:     self.operation,
      kind:          self.kind,
      city:          self.city.filter(|c| !c.trim().is_empty()),
      agent_id:      None,
      featured:      self.featured,
      active:        Some(true),
      min_price_usd: self.min_price,
      max_price_usd: self.max_price,
      min_rooms:     self.min_rooms,
      text:          self.q.filter(|q| !q.trim().is_empty()),
      sort:          self.sort.unwrap_or_default(),
      limit:         self.limit.map(|l| l.clamp(1, MAX_LIMIT)),
      offset:        self.offset,
    }
  }
}

/// `GET /properties[?operation=..][&type=..][&city=..][&featured=..][&minPrice=..][&maxPrice=..][&minRooms=..][&q=..][&sort=..][&limit=..][&offset=..]`
pub async fn list_public<S, O>(
  State(state): State<AppState<S, O>>,
  Params(params): Params<ListingParams>,
) -> Result<Json<Envelope<Vec<Property>>>, ApiError>
where
  S: Backend,
  O: ObjectStorage + 'static,
{
  let query = params.into_query();
  let properties = state
    .store
    .list_properties(&query)
    .await
    .map_err(ApiError::store)?;
  Ok(ok(properties))
}

/// `GET /properties/{id}`. Inactive listings read as missing.
pub async fn get_public<S, O>(
  State(state): State<AppState<S, O>>,
  Path(id): Path<String>,
) -> Result<Json<Envelope<Property>>, ApiError>
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
  Ok(ok(property))
}

// ─── Gated writes ────────────────────────────────────────────────────────────

/// `POST /properties`
pub async fn create<S, O>(
  State(state): State<AppState<S, O>>,
  token: SessionToken,
  Body(body): Body,
) -> Reply
where
  S: Backend,
  O: ObjectStorage + 'static,
{
  state.run_json(Action::CreateProperty, &body, &token, None).await
}

/// `PATCH /properties/{id}`. Only the fields present in the body change;
/// `null` clears an optional field.
pub async fn update<S, O>(
  State(state): State<AppState<S, O>>,
  token: SessionToken,
  Path(id): Path<String>,
  Body(body): Body,
) -> Reply
where
  S: Backend,
  O: ObjectStorage + 'static,
{
  state
    .run_json(Action::UpdateProperty, &body, &token, parse_id(&id))
    .await
}

/// `DELETE /properties/{id}`
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
    .run(Action::DeleteProperty, Payload::empty(), &token, parse_id(&id))
    .await
}

/// `POST /properties/{id}/featured`, body `{"current": bool}`.
pub async fn toggle_featured<S, O>(
  State(state): State<AppState<S, O>>,
  token: SessionToken,
  Path(id): Path<String>,
  Body(body): Body,
) -> Reply
where
  S: Backend,
  O: ObjectStorage + 'static,
{
  state
    .run_json(Action::ToggleFeatured, &body, &token, parse_id(&id))
    .await
}

/// `POST /properties/{id}/active`, body `{"current": bool}`.
pub async fn toggle_active<S, O>(
  State(state): State<AppState<S, O>>,
  token: SessionToken,
  Path(id): Path<String>,
  Body(body): Body,
) -> Reply
where
  S: Backend,
  O: ObjectStorage + 'static,
{
  state
    .run_json(Action::ToggleActive, &body, &token, parse_id(&id))
    .await
}
