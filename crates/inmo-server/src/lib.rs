//! Process wiring for the Inmo marketplace: configuration, on-disk object
//! storage and the top-level router.

pub mod config;
pub mod objects;

use std::path::{Path, PathBuf};

use axum::Router;
use inmo_api::{AppState, Backend};
use inmo_core::objects::ObjectStorage;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub use config::ServerConfig;
pub use objects::LocalObjects;

/// The API under `/api` and stored files under `/media`.
pub fn app<S, O>(state: AppState<S, O>, media_dir: &Path) -> Router
where
  S: Backend,
  O: ObjectStorage + 'static,
{
  Router::new()
    .nest("/api", inmo_api::api_router(state))
    .nest_service("/media", ServeDir::new(media_dir))
    .layer(TraceLayer::new_for_http())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
