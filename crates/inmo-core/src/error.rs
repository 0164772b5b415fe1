//! Error types for `inmo-core`.
//!
//! [`Error`] is the classification every repository backend folds its own
//! failures into. The executor maps each variant to a distinct outward
//! failure kind.

use thiserror::Error;

use crate::policy::Resource;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{resource} not found: {id}")]
  NotFound { resource: Resource, id: String },

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store unavailable: {0}")]
  Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn not_found(resource: Resource, id: impl ToString) -> Self {
    Self::NotFound { resource, id: id.to_string() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
