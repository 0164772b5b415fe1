//! The calling actor: identity plus role, resolved once per request.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Closed set of roles the authorization gate understands.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  Admin,
  Agent,
  User,
  Anonymous,
}

/// An authenticated identity as reported by the session provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
  pub user_id: Uuid,
  pub email:   String,
}

/// The resolved caller of an operation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
  pub id:    Option<Uuid>,
  pub email: Option<String>,
  pub role:  Role,
}

impl Actor {
  pub fn anonymous() -> Self {
    Self { id: None, email: None, role: Role::Anonymous }
  }

  pub fn from_identity(identity: Identity, role: Role) -> Self {
    Self {
      id: Some(identity.user_id),
      email: Some(identity.email),
      role,
    }
  }

  pub fn is_anonymous(&self) -> bool { self.role == Role::Anonymous }
}
