//! `POST /rpc/{action}`: every JSON action under its wire name.
//!
//! The body is the action's payload. Actions that address a row take its id
//! from the body's `id` field, which is removed before validation:
//!
//! ```text
//! POST /rpc/togglePropertyFeatured
//! {"id": "6f1c…", "current": false}
//! ```
//!
//! Uploads need a raw file and are only served by
//! `POST /properties/{id}/images`.

use axum::{
  extract::{Path, State},
  response::{IntoResponse, Response},
};
use inmo_core::{
  action::{Action, Payload},
  objects::ObjectStorage,
};
use serde_json::Value;

use crate::{
  AppState, Backend, Reply, SessionToken, error::ApiError, extract::Body, json_payload, parse_id,
};

const MSG_UNKNOWN_ACTION: &str = "Acción desconocida";

pub async fn dispatch<S, O>(
  State(state): State<AppState<S, O>>,
  token: SessionToken,
  Path(name): Path<String>,
  Body(body): Body,
) -> Response
where
  S: Backend,
  O: ObjectStorage + 'static,
{
  let Ok(action) = name.parse::<Action>() else {
    tracing::debug!(action = %name, "unknown rpc action");
    return ApiError::NotFound(MSG_UNKNOWN_ACTION).into_response();
  };

  let mut payload = match json_payload(&body) {
    Ok(payload) => payload,
    Err(failure) => return Reply::failure(failure).into_response(),
  };

  let mut id = None;
  if action.takes_id() {
    if let Payload::Json(Value::Object(fields)) = &mut payload {
      id = fields
        .remove("id")
        .and_then(|v| v.as_str().and_then(parse_id));
    }
  }

  state.run(action, payload, &token, id).await.into_response()
}
