//! Handlers for `/leads` endpoints.
//!
//! | Method   | Path               | Action         |
//! |----------|--------------------|----------------|
//! | `POST`   | `/leads`           | `createLead`   |
//! | `GET`    | `/leads`           | `listLeads`    |
//! | `PATCH`  | `/leads/{id}/read` | `markLeadRead` |
//! | `DELETE` | `/leads/{id}`      | `deleteLead`   |

use std::collections::HashMap;

use axum::extract::{Path, State};
use inmo_core::{
  action::{Action, Payload},
  objects::ObjectStorage,
};

use crate::{
  AppState, Backend, Reply, SessionToken,
  extract::{Body, Params},
  parse_id, query_payload,
};

/// `POST /leads`. Open to anonymous visitors.
pub async fn create<S, O>(
  State(state): State<AppState<S, O>>,
  token: SessionToken,
  Body(body): Body,
) -> Reply
where
  S: Backend,
  O: ObjectStorage + 'static,
{
  state.run_json(Action::CreateLead, &body, &token, None).await
}

/// `GET /leads[?kind=..][&isRead=..][&propertyId=..][&limit=..][&offset=..]`
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
    .run(Action::ListLeads, query_payload(params), &token, None)
    .await
}

/// `PATCH /leads/{id}/read`, body `{"isRead": bool}` (defaults to `true`).
pub async fn mark_read<S, O>(
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
    .run_json(Action::MarkLeadRead, &body, &token, parse_id(&id))
    .await
}

/// `DELETE /leads/{id}`
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
    .run(Action::DeleteLead, Payload::empty(), &token, parse_id(&id))
    .await
}
