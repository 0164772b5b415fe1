//! Profiles: the authorization source of truth, one per identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actor::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
  pub user_id:    Uuid,
  pub role:       Role,
  pub created_at: DateTime<Utc>,
}

/// Parameters for [`ResourceStore::list_profiles`](crate::store::ResourceStore::list_profiles).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileQuery {
  pub role:   Option<Role>,
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}
