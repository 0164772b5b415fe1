//! `GET /views/stale`: the public views invalidated since they were last
//! rendered, for the rendering tier to poll.

use axum::{Json, extract::State};
use inmo_core::{envelope::Envelope, objects::ObjectStorage};

use crate::{AppState, Backend, error::ok};

pub async fn stale<S, O>(State(state): State<AppState<S, O>>) -> Json<Envelope<Vec<String>>>
where
  S: Backend,
  O: ObjectStorage + 'static,
{
  ok(state.views.snapshot())
}
