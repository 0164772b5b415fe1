//! Leads: contact and appraisal requests left by site visitors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeadKind {
  /// Inquiry about a listing or the agency.
  Contacto,
  /// Request for a property appraisal.
  Tasacion,
}

/// A stored lead. At least one of `phone` / `email` is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
  pub id:          Uuid,
  pub kind:        LeadKind,
  pub property_id: Option<Uuid>,
  pub name:        String,
  pub phone:       Option<String>,
  pub email:       Option<String>,
  pub message:     String,
  pub is_read:     bool,
  pub created_at:  DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
  pub kind:        LeadKind,
  pub property_id: Option<Uuid>,
  pub name:        String,
  pub phone:       Option<String>,
  pub email:       Option<String>,
  pub message:     String,
}

/// Parameters for [`ResourceStore::list_leads`](crate::store::ResourceStore::list_leads).
/// Results are ordered newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadQuery {
  pub kind:        Option<LeadKind>,
  pub is_read:     Option<bool>,
  pub property_id: Option<Uuid>,
  pub limit:       Option<usize>,
  pub offset:      Option<usize>,
}
