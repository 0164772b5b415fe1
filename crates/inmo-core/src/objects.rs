//! Object storage for uploaded files.

use std::{
  collections::BTreeMap,
  future::Future,
  sync::{Arc, Mutex},
};

use bytes::Bytes;
use thiserror::Error;

/// Where uploaded image files live. Keys are opaque to the storage; see
/// [`crate::image::storage_key`].
pub trait ObjectStorage: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Store `bytes` under `key` and return the public URL.
  fn put<'a>(
    &'a self,
    key: &'a str,
    content_type: &'a str,
    bytes: Bytes,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;

  /// Remove the object under `key`. Removing a missing object succeeds.
  fn remove<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

#[derive(Debug, Error)]
#[error("object storage error: {0}")]
pub struct ObjectError(pub String);

/// In-memory object storage. Clones share the same objects.
///
/// URLs are `<base_url>/<key>`. A storage built with
/// [`MemoryObjects::failing`] rejects every write.
#[derive(Debug, Clone, Default)]
pub struct MemoryObjects {
  base_url: String,
  objects:  Arc<Mutex<BTreeMap<String, Bytes>>>,
  failing:  bool,
}

impl MemoryObjects {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self { base_url: base_url.into(), ..Self::default() }
  }

  pub fn failing() -> Self { Self { failing: true, ..Self::default() } }

  pub fn get(&self, key: &str) -> Option<Bytes> {
    self.objects.lock().ok()?.get(key).cloned()
  }

  pub fn keys(&self) -> Vec<String> {
    match self.objects.lock() {
      Ok(map) => map.keys().cloned().collect(),
      Err(poisoned) => poisoned.into_inner().keys().cloned().collect(),
    }
  }
}

impl ObjectStorage for MemoryObjects {
  type Error = ObjectError;

  async fn put(&self, key: &str, _content_type: &str, bytes: Bytes) -> Result<String, ObjectError> {
    if self.failing {
      return Err(ObjectError("writes disabled".into()));
    }
    self
      .objects
      .lock()
      .map_err(|_| ObjectError("object map poisoned".into()))?
      .insert(key.to_owned(), bytes);
    Ok(format!("{}/{key}", self.base_url.trim_end_matches('/')))
  }

  async fn remove(&self, key: &str) -> Result<(), ObjectError> {
    self
      .objects
      .lock()
      .map_err(|_| ObjectError("object map poisoned".into()))?
      .remove(key);
    Ok(())
  }
}
