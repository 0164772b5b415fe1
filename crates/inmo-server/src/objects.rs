//! Object storage on the local filesystem, served back under
//! `media_base_url`.

use std::{
  io,
  path::{Component, Path, PathBuf},
};

use bytes::Bytes;
use inmo_core::objects::ObjectStorage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocalObjectsError {
  #[error("io error: {0}")]
  Io(#[from] io::Error),

  #[error("invalid object key: {0:?}")]
  InvalidKey(String),
}

#[derive(Debug, Clone)]
pub struct LocalObjects {
  root:     PathBuf,
  base_url: String,
}

impl LocalObjects {
  pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
    Self { root: root.into(), base_url: base_url.into() }
  }

  /// Keys are relative paths made of plain components only.
  fn path_for(&self, key: &str) -> Result<PathBuf, LocalObjectsError> {
    let relative = Path::new(key);
    let plain = relative
      .components()
      .all(|c| matches!(c, Component::Normal(_)));
    if key.is_empty() || !plain {
      return Err(LocalObjectsError::InvalidKey(key.to_owned()));
    }
    Ok(self.root.join(relative))
  }
}

impl ObjectStorage for LocalObjects {
  type Error = LocalObjectsError;

  async fn put(&self, key: &str, _content_type: &str, bytes: Bytes) -> Result<String, Self::Error> {
    let path = self.path_for(key)?;
    if let Some(parent) = path.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, &bytes).await?;
    tracing::debug!(key, size = bytes.len(), "object stored");
    Ok(format!("{}/{key}", self.base_url.trim_end_matches('/')))
  }

  async fn remove(&self, key: &str) -> Result<(), Self::Error> {
    let path = self.path_for(key)?;
    match tokio::fs::remove_file(&path).await {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn storage() -> (LocalObjects, PathBuf) {
    let root = std::env::temp_dir().join(format!("inmo-objects-{}", uuid::Uuid::new_v4()));
    (LocalObjects::new(&root, "https://cdn.inmo.example/"), root)
  }

  #[tokio::test]
  async fn put_writes_file_and_returns_url() {
    let (objects, root) = storage();
    let url = objects
      .put("properties/p1/a.png", "image/png", Bytes::from_static(b"png"))
      .await
      .unwrap();

    assert_eq!(url, "https://cdn.inmo.example/properties/p1/a.png");
    assert_eq!(std::fs::read(root.join("properties/p1/a.png")).unwrap(), b"png");

    objects.remove("properties/p1/a.png").await.unwrap();
    assert!(!root.join("properties/p1/a.png").exists());
    std::fs::remove_dir_all(root).ok();
  }

  #[tokio::test]
  async fn removing_missing_object_succeeds() {
    let (objects, _root) = storage();
    objects.remove("properties/p1/gone.png").await.unwrap();
  }

  #[tokio::test]
  async fn escaping_keys_are_rejected() {
    let (objects, _root) = storage();
    for key in ["../etc/passwd", "/abs.png", ""] {
      let err = objects
        .put(key, "image/png", Bytes::from_static(b"x"))
        .await
        .unwrap_err();
      assert!(matches!(err, LocalObjectsError::InvalidKey(_)), "{key}");
    }
  }
}
