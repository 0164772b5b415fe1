//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings with fixed microsecond precision, so text
//! order equals time order. UUIDs are hyphenated lowercase strings. Enums use
//! their `strum` string forms.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use inmo_core::{
  agent::Agent,
  image::Image,
  lead::Lead,
  profile::Profile,
  property::{Coordinates, Property},
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

/// Current time at the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn decode_enum<T: FromStr>(column: &str, s: &str) -> Result<T> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown {column}: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const PROPERTY_COLUMNS: &str = "property_id, title, description, operation, kind,
  price_usd, price_ars, address, city, province, lat, lng, rooms, bathrooms,
  area_covered, area_total, featured, active, agent_id, created_at, updated_at";

/// Raw values read directly from a `properties` row, plus its images.
pub struct RawProperty {
  pub property_id:  String,
  pub title:        String,
  pub description:  Option<String>,
  pub operation:    String,
  pub kind:         String,
  pub price_usd:    Option<f64>,
  pub price_ars:    Option<f64>,
  pub address:      Option<String>,
  pub city:         String,
  pub province:     String,
  pub lat:          Option<f64>,
  pub lng:          Option<f64>,
  pub rooms:        Option<u32>,
  pub bathrooms:    Option<u32>,
  pub area_covered: Option<f64>,
  pub area_total:   Option<f64>,
  pub featured:     bool,
  pub active:       bool,
  pub agent_id:     Option<String>,
  pub created_at:   String,
  pub updated_at:   String,
  pub images:       Vec<RawImage>,
}

impl RawProperty {
  /// Map a row selected with [`PROPERTY_COLUMNS`]. Images are attached
  /// separately.
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      property_id:  row.get(0)?,
      title:        row.get(1)?,
      description:  row.get(2)?,
      operation:    row.get(3)?,
      kind:         row.get(4)?,
      price_usd:    row.get(5)?,
      price_ars:    row.get(6)?,
      address:      row.get(7)?,
      city:         row.get(8)?,
      province:     row.get(9)?,
      lat:          row.get(10)?,
      lng:          row.get(11)?,
      rooms:        row.get(12)?,
      bathrooms:    row.get(13)?,
      area_covered: row.get(14)?,
      area_total:   row.get(15)?,
      featured:     row.get(16)?,
      active:       row.get(17)?,
      agent_id:     row.get(18)?,
      created_at:   row.get(19)?,
      updated_at:   row.get(20)?,
      images:       Vec::new(),
    })
  }

  pub fn into_property(self) -> Result<Property> {
    let coordinates = match (self.lat, self.lng) {
      (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
      _ => None,
    };
    Ok(Property {
      id: decode_uuid(&self.property_id)?,
      title: self.title,
      description: self.description,
      operation: decode_enum("operation", &self.operation)?,
      kind: decode_enum("property type", &self.kind)?,
      price_usd: self.price_usd,
      price_ars: self.price_ars,
      address: self.address,
      city: self.city,
      province: self.province,
      coordinates,
      rooms: self.rooms,
      bathrooms: self.bathrooms,
      area_covered: self.area_covered,
      area_total: self.area_total,
      featured: self.featured,
      active: self.active,
      agent_id: decode_opt_uuid(self.agent_id)?,
      images: self
        .images
        .into_iter()
        .map(RawImage::into_image)
        .collect::<Result<_>>()?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

pub const IMAGE_COLUMNS: &str = "image_id, property_id, url, alt, storage_key, created_at";

pub struct RawImage {
  pub image_id:    String,
  pub property_id: String,
  pub url:         String,
  pub alt:         Option<String>,
  pub storage_key: String,
  pub created_at:  String,
}

impl RawImage {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      image_id:    row.get(0)?,
      property_id: row.get(1)?,
      url:         row.get(2)?,
      alt:         row.get(3)?,
      storage_key: row.get(4)?,
      created_at:  row.get(5)?,
    })
  }

  pub fn into_image(self) -> Result<Image> {
    Ok(Image {
      id:          decode_uuid(&self.image_id)?,
      property_id: decode_uuid(&self.property_id)?,
      url:         self.url,
      alt:         self.alt,
      storage_key: self.storage_key,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub const LEAD_COLUMNS: &str =
  "lead_id, kind, property_id, name, phone, email, message, is_read, created_at";

pub struct RawLead {
  pub lead_id:     String,
  pub kind:        String,
  pub property_id: Option<String>,
  pub name:        String,
  pub phone:       Option<String>,
  pub email:       Option<String>,
  pub message:     String,
  pub is_read:     bool,
  pub created_at:  String,
}

impl RawLead {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      lead_id:     row.get(0)?,
      kind:        row.get(1)?,
      property_id: row.get(2)?,
      name:        row.get(3)?,
      phone:       row.get(4)?,
      email:       row.get(5)?,
      message:     row.get(6)?,
      is_read:     row.get(7)?,
      created_at:  row.get(8)?,
    })
  }

  pub fn into_lead(self) -> Result<Lead> {
    Ok(Lead {
      id:          decode_uuid(&self.lead_id)?,
      kind:        decode_enum("lead kind", &self.kind)?,
      property_id: decode_opt_uuid(self.property_id)?,
      name:        self.name,
      phone:       self.phone,
      email:       self.email,
      message:     self.message,
      is_read:     self.is_read,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub const AGENT_COLUMNS: &str = "agent_id, name, email, phone, user_id, created_at";

pub struct RawAgent {
  pub agent_id:   String,
  pub name:       String,
  pub email:      String,
  pub phone:      Option<String>,
  pub user_id:    String,
  pub created_at: String,
}

impl RawAgent {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      agent_id:   row.get(0)?,
      name:       row.get(1)?,
      email:      row.get(2)?,
      phone:      row.get(3)?,
      user_id:    row.get(4)?,
      created_at: row.get(5)?,
    })
  }

  pub fn into_agent(self) -> Result<Agent> {
    Ok(Agent {
      id:         decode_uuid(&self.agent_id)?,
      name:       self.name,
      email:      self.email,
      phone:      self.phone,
      user_id:    decode_uuid(&self.user_id)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const PROFILE_COLUMNS: &str = "user_id, role, created_at";

pub struct RawProfile {
  pub user_id:    String,
  pub role:       String,
  pub created_at: String,
}

impl RawProfile {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      role:       row.get(1)?,
      created_at: row.get(2)?,
    })
  }

  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      user_id:    decode_uuid(&self.user_id)?,
      role:       decode_enum("role", &self.role)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timestamps_sort_as_text() {
    let a = decode_dt("2026-01-02T03:04:05.000001Z").unwrap();
    let b = decode_dt("2026-01-02T03:04:05.100000Z").unwrap();
    assert!(encode_dt(a) < encode_dt(b));
    assert_eq!(encode_dt(a), "2026-01-02T03:04:05.000001Z");
  }

  #[test]
  fn now_round_trips_exactly() {
    let t = now();
    assert_eq!(decode_dt(&encode_dt(t)).unwrap(), t);
  }

  #[test]
  fn unknown_enum_value_is_a_decode_error() {
    let err = decode_enum::<inmo_core::actor::Role>("role", "owner").unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
  }
}
