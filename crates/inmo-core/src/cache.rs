//! Cache invalidation of public views after successful mutations.
//!
//! Invalidation is fire-and-forget: the executor logs a failing
//! [`Invalidator`] and keeps the mutation's success.

use std::{
  collections::BTreeSet,
  fmt,
  sync::{Arc, Mutex},
};

use thiserror::Error;
use uuid::Uuid;

use crate::policy::Resource;

/// A named public view whose rendered form may be cached downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
  AdminDashboard,
  PublicListing,
  PropertyDetail(Uuid),
}

impl fmt::Display for View {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      View::AdminDashboard => f.write_str("admin-dashboard"),
      View::PublicListing => f.write_str("public-listing"),
      View::PropertyDetail(id) => write!(f, "property-detail/{id}"),
    }
  }
}

/// Static mapping from a mutated resource to the views it affects.
///
/// `property` is the listing touched by a property or image mutation.
pub fn views_for(resource: Resource, property: Option<Uuid>) -> Vec<View> {
  match resource {
    Resource::Property | Resource::Image => {
      let mut views = vec![View::AdminDashboard, View::PublicListing];
      views.extend(property.map(View::PropertyDetail));
      views
    }
    Resource::Lead | Resource::Agent | Resource::Profile => vec![View::AdminDashboard],
  }
}

#[derive(Debug, Error)]
#[error("cache invalidation failed: {0}")]
pub struct InvalidateError(pub String);

/// Receiver of invalidation events. Must be idempotent: invalidating an
/// already-stale view is a no-op.
pub trait Invalidator: Send + Sync {
  fn invalidate(&self, views: &[View]) -> Result<(), InvalidateError>;
}

/// In-memory stale set, polled by the rendering tier.
///
/// Clones share the same set.
#[derive(Debug, Clone, Default)]
pub struct StaleViews {
  inner: Arc<Mutex<BTreeSet<String>>>,
}

impl StaleViews {
  pub fn new() -> Self { Self::default() }

  /// Names of every view currently marked stale, sorted.
  pub fn snapshot(&self) -> Vec<String> {
    match self.inner.lock() {
      Ok(set) => set.iter().cloned().collect(),
      Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
    }
  }

  pub fn is_stale(&self, view: &View) -> bool {
    self.snapshot().contains(&view.to_string())
  }

  /// Mark `view` fresh again after it has been re-rendered.
  pub fn mark_fresh(&self, view: &View) {
    if let Ok(mut set) = self.inner.lock() {
      set.remove(&view.to_string());
    }
  }
}

impl Invalidator for StaleViews {
  fn invalidate(&self, views: &[View]) -> Result<(), InvalidateError> {
    let mut set = self
      .inner
      .lock()
      .map_err(|_| InvalidateError("stale view set poisoned".into()))?;
    set.extend(views.iter().map(View::to_string));
    Ok(())
  }
}
