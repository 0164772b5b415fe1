//! Handlers for `/agents` endpoints. The roster is public; changes are
//! admin-only.

use axum::{
  Json,
  extract::{Path, State},
};
use inmo_core::{
  action::{Action, Payload},
  agent::Agent,
  envelope::Envelope,
  objects::ObjectStorage,
};

use crate::{
  AppState, Backend, Reply, SessionToken,
  error::{ApiError, ok},
  extract::Body,
  parse_id,
};

/// `GET /agents`
pub async fn list_public<S, O>(
  State(state): State<AppState<S, O>>,
) -> Result<Json<Envelope<Vec<Agent>>>, ApiError>
where
  S: Backend,
  O: ObjectStorage + 'static,
{
  let agents = state.store.list_agents().await.map_err(ApiError::store)?;
  Ok(ok(agents))
}

/// `POST /agents`
pub async fn create<S, O>(
  State(state): State<AppState<S, O>>,
  token: SessionToken,
  Body(body): Body,
) -> Reply
where
  S: Backend,
  O: ObjectStorage + 'static,
{
  state.run_json(Action::CreateAgent, &body, &token, None).await
}

/// `PATCH /agents/{id}`
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
    .run_json(Action::UpdateAgent, &body, &token, parse_id(&id))
    .await
}

/// `DELETE /agents/{id}`. Listings of the agent stay, unassigned.
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
    .run(Action::DeleteAgent, Payload::empty(), &token, parse_id(&id))
    .await
}
