//! Agent records. An agent is linked to an actor identity through `user_id`
//! and owns the properties that reference it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
  pub id:         Uuid,
  pub name:       String,
  /// Unique across agents.
  pub email:      String,
  pub phone:      Option<String>,
  pub user_id:    Uuid,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAgent {
  pub name:    String,
  pub email:   String,
  pub phone:   Option<String>,
  pub user_id: Uuid,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentPatch {
  pub name:    Option<String>,
  pub email:   Option<String>,
  pub phone:   Option<Option<String>>,
  pub user_id: Option<Uuid>,
}

impl AgentPatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  pub fn apply(self, agent: &mut Agent) {
    if let Some(v) = self.name { agent.name = v; }
    if let Some(v) = self.email { agent.email = v; }
    if let Some(v) = self.phone { agent.phone = v; }
    if let Some(v) = self.user_id { agent.user_id = v; }
  }
}
