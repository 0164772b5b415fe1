//! Core types and the authorization-gated mutation pipeline for the Inmo
//! property marketplace.
//!
//! The crate has no HTTP or database dependencies.
//! Storage, sessions and object storage are reached through the traits in
//! [`store`], [`session`] and [`objects`]; the [`executor`] sequences them.

pub mod action;
pub mod actor;
pub mod agent;
pub mod cache;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod image;
pub mod lead;
pub mod objects;
pub mod policy;
pub mod profile;
pub mod property;
pub mod session;
pub mod store;
pub mod validate;

pub use error::{Error, Result};

/// Default page size for list operations.
pub const DEFAULT_LIMIT: usize = 20;
/// Upper bound on any requested page size.
pub const MAX_LIMIT: usize = 100;
