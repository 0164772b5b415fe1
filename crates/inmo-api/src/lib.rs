//! JSON HTTP API for the Inmo marketplace.
//!
//! Every mutation and gated read goes through the core
//! [`Executor`](inmo_core::executor::Executor); public listing reads go
//! straight to the store and only ever see active properties. Static files
//! and process setup belong to the caller.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", inmo_api::api_router(state))
//! ```

pub mod agents;
pub mod auth;
pub mod error;
pub mod extract;
pub mod images;
pub mod leads;
pub mod profiles;
pub mod properties;
pub mod rpc;
pub mod views;

use std::{collections::HashMap, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{delete, get, patch, post, put},
};
use bytes::Bytes;
use inmo_core::{
  action::{Action, Payload},
  cache::StaleViews,
  executor::{Executor, Failure},
  image::MAX_IMAGE_BYTES,
  objects::ObjectStorage,
  session::SessionProvider,
  store::ResourceStore,
  validate::{FieldError, MSG_NOT_OBJECT},
};
use serde_json::Value;
use uuid::Uuid;

pub use auth::SessionToken;
pub use error::{ApiError, Reply};

// ─── Application state ───────────────────────────────────────────────────────

/// A storage backend that also answers session lookups, as the SQLite store
/// does.
pub trait Backend: ResourceStore + SessionProvider + 'static {}

impl<T> Backend for T where T: ResourceStore + SessionProvider + 'static {}

/// Shared state threaded through all axum handlers.
pub struct AppState<S, O> {
  pub executor: Executor<S, S, O>,
  pub store:    Arc<S>,
  pub views:    StaleViews,
}

impl<S, O> Clone for AppState<S, O> {
  fn clone(&self) -> Self {
    Self {
      executor: self.executor.clone(),
      store:    Arc::clone(&self.store),
      views:    self.views.clone(),
    }
  }
}

impl<S, O> AppState<S, O>
where
  S: Backend,
  O: ObjectStorage + 'static,
{
  /// Wire an executor whose invalidations land in a fresh [`StaleViews`].
  pub fn new(store: Arc<S>, objects: Arc<O>) -> Self {
    let views = StaleViews::new();
    let executor = Executor::new(
      Arc::clone(&store),
      Arc::clone(&store),
      objects,
      Arc::new(views.clone()),
    );
    Self { executor, store, views }
  }

  /// Run one gated action and shape the response.
  pub(crate) async fn run(
    &self,
    action: Action,
    payload: Payload,
    token: &SessionToken,
    id: Option<Uuid>,
  ) -> Reply {
    let outcome = self
      .executor
      .execute(action, payload, token.as_deref(), id)
      .await;
    Reply::new(action, outcome)
  }

  /// [`run`](Self::run) with a raw JSON body.
  pub(crate) async fn run_json(
    &self,
    action: Action,
    body: &Bytes,
    token: &SessionToken,
    id: Option<Uuid>,
  ) -> Reply {
    match json_payload(body) {
      Ok(payload) => self.run(action, payload, token, id).await,
      Err(failure) => Reply::failure(failure),
    }
  }
}

// ─── Request helpers ─────────────────────────────────────────────────────────

/// Parse a path id. An unparseable id is treated as absent so the validator
/// reports it on field `id`.
pub(crate) fn parse_id(raw: &str) -> Option<Uuid> { Uuid::parse_str(raw).ok() }

/// An empty body is an empty object; anything else must be valid JSON.
pub(crate) fn json_payload(body: &Bytes) -> Result<Payload, Failure> {
  if body.iter().all(u8::is_ascii_whitespace) {
    return Ok(Payload::empty());
  }
  serde_json::from_slice(body)
    .map(Payload::Json)
    .map_err(|_| Failure::validation(vec![FieldError::new("", MSG_NOT_OBJECT)]))
}

/// Turn query-string pairs into a JSON object, typing booleans and
/// non-negative integers so they meet the same schemas as JSON bodies.
pub(crate) fn query_payload(params: HashMap<String, String>) -> Payload {
  let object = params
    .into_iter()
    .map(|(key, raw)| {
      let value = match raw.as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        s => s
          .parse::<u64>()
          .map(Value::from)
          .unwrap_or_else(|_| Value::String(raw.clone())),
      };
      (key, value)
    })
    .collect();
  Payload::Json(Value::Object(object))
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, O>(state: AppState<S, O>) -> Router<()>
where
  S: Backend,
  O: ObjectStorage + 'static,
{
  Router::new()
    // Leads
    .route("/leads", get(leads::list::<S, O>).post(leads::create::<S, O>))
    .route("/leads/{id}", delete(leads::remove::<S, O>))
    .route("/leads/{id}/read", patch(leads::mark_read::<S, O>))
    // Properties
    .route(
      "/properties",
      get(properties::list_public::<S, O>).post(properties::create::<S, O>),
    )
    .route(
      "/properties/{id}",
      get(properties::get_public::<S, O>)
        .patch(properties::update::<S, O>)
        .delete(properties::remove::<S, O>),
    )
    .route("/properties/{id}/featured", post(properties::toggle_featured::<S, O>))
    .route("/properties/{id}/active", post(properties::toggle_active::<S, O>))
    // Images
    .route(
      "/properties/{id}/images",
      get(images::list_public::<S, O>)
        .post(images::upload::<S, O>)
        .layer(DefaultBodyLimit::max(2 * MAX_IMAGE_BYTES)),
    )
    .route("/images/{id}", delete(images::remove::<S, O>))
    // Agents
    .route("/agents", get(agents::list_public::<S, O>).post(agents::create::<S, O>))
    .route(
      "/agents/{id}",
      patch(agents::update::<S, O>).delete(agents::remove::<S, O>),
    )
    // Profiles
    .route("/profiles", get(profiles::list::<S, O>))
    .route("/profiles/{user_id}/role", put(profiles::set_role::<S, O>))
    // Rendering tier
    .route("/views/stale", get(views::stale::<S, O>))
    // Generic RPC entry point
    .route("/rpc/{action}", post(rpc::dispatch::<S, O>))
    .with_state(state)
}
