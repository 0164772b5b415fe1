//! Listing images. An image belongs to exactly one property and is removed
//! with it.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Largest accepted upload, in bytes.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
  pub id:          Uuid,
  pub property_id: Uuid,
  pub url:         String,
  pub alt:         Option<String>,
  /// Object-storage key; needed to remove the stored file.
  #[serde(skip_serializing, default)]
  pub storage_key: String,
  pub created_at:  DateTime<Utc>,
}

/// Record written after the file has been stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
  pub property_id: Uuid,
  pub url:         String,
  pub alt:         Option<String>,
  pub storage_key: String,
}

/// Raw file upload as received from the caller.
#[derive(Debug, Clone)]
pub struct Upload {
  pub content_type: String,
  pub bytes:        Bytes,
  pub alt:          Option<String>,
}

/// Object-storage key for a new upload: `properties/<property>/<uuid>.<ext>`.
///
/// The extension is the lowercased media subtype when it is plain ASCII
/// alphanumeric, `bin` otherwise.
pub fn storage_key(property_id: Uuid, content_type: &str) -> String {
  format!(
    "properties/{property_id}/{}.{}",
    Uuid::new_v4(),
    extension(content_type)
  )
}

fn extension(content_type: &str) -> String {
  let content_type = content_type.trim().to_ascii_lowercase();
  let sub = content_type
    .strip_prefix("image/")
    .and_then(|sub| sub.split(['+', ';']).next())
    .map(str::trim)
    .unwrap_or_default();
  match sub {
    "jpeg" => "jpg".to_owned(),
    s if !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric()) => {
      s.to_owned()
    }
    _ => "bin".to_owned(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn storage_key_uses_subtype_extension() {
    let pid = Uuid::new_v4();
    let key = storage_key(pid, "image/jpeg");
    assert!(key.starts_with(&format!("properties/{pid}/")));
    assert!(key.ends_with(".jpg"));
    assert!(storage_key(pid, "image/svg+xml").ends_with(".svg"));
    assert!(storage_key(pid, "image/webp; q=1").ends_with(".webp"));
  }

  #[test]
  fn storage_key_ignores_subtype_case() {
    let key = storage_key(Uuid::new_v4(), "IMAGE/PNG");
    assert!(key.ends_with(".png"), "{key}");
  }

  #[test]
  fn storage_key_never_escapes_property_prefix() {
    let pid = Uuid::new_v4();
    for content_type in ["image/../../x", "image/png/nested", "image/a\\b"] {
      let key = storage_key(pid, content_type);
      let file = key
        .strip_prefix(&format!("properties/{pid}/"))
        .expect("prefix");
      assert!(!file.contains('/'), "{content_type} -> {key}");
      assert!(!key.contains(".."), "{content_type} -> {key}");
      assert!(key.ends_with(".bin"), "{content_type} -> {key}");
    }
  }
}
