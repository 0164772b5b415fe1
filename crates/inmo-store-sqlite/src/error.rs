//! Error type for `inmo-store-sqlite`.

use inmo_core::policy::Resource;
use thiserror::Error;

/// Message shown to callers when an agent email is already taken.
pub const MSG_DUPLICATE_EMAIL: &str = "Ya existe un agente con ese email";

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored enum column holds a value the domain does not know.
  #[error("decode error: {0}")]
  Decode(String),

  #[error("{resource} not found: {id}")]
  NotFound { resource: Resource, id: uuid::Uuid },

  #[error("agent email already in use: {0}")]
  DuplicateEmail(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for inmo_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::NotFound { resource, id } => inmo_core::Error::not_found(resource, id),
      Error::DuplicateEmail(_) => inmo_core::Error::Conflict(MSG_DUPLICATE_EMAIL.to_owned()),
      other => inmo_core::Error::Unavailable(Box::new(other)),
    }
  }
}

/// Whether `err` is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(failure, _))
      if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}
