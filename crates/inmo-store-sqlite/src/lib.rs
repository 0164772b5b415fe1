//! SQLite backend for the Inmo marketplace.
//!
//! Implements both [`inmo_core::store::ResourceStore`] and
//! [`inmo_core::session::SessionProvider`] over one database file. All access
//! goes through [`tokio_rusqlite`], so statements run on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod session;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
