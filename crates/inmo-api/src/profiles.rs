//! Handlers for `/profiles` endpoints. Admin-only.

use std::collections::HashMap;

use axum::extract::{Path, State};
use inmo_core::{
  action::{Action, Payload},
  objects::ObjectStorage,
};
use serde_json::Value;

use crate::{
  AppState, Backend, Reply, SessionToken,
  extract::{Body, Params},
  json_payload, query_payload,
};

/// `GET /profiles[?role=..][&limit=..][&offset=..]`
pub async fn list<S, O>(
  State(state): State<AppState<S, O>>,
  token: SessionToken,
  Params(params): Params<HashMap<String, String>>,
) -> Reply
where
  S: Backend,
  O: ObjectStorage + 'static,
{
  state
    .run(Action::ListProfiles, query_payload(params), &token, None)
    .await
}

/// `PUT /profiles/{user_id}/role`, body `{"role": "admin"|"agent"|"user"}`.
pub async fn set_role<S, O>(
  State(state): State<AppState<S, O>>,
  token: SessionToken,
  Path(user_id): Path<String>,
  Body(body): Body,
) -> Reply
where
  S: Backend,
  O: ObjectStorage + 'static,
{
  let payload = match json_payload(&body) {
    Ok(Payload::Json(Value::Object(mut fields))) => {
      fields.insert("userId".into(), Value::String(user_id));
      Payload::Json(Value::Object(fields))
    }
    Ok(other) => other,
    Err(failure) => return Reply::failure(failure),
  };
  state.run(Action::SetProfileRole, payload, &token, None).await
}
