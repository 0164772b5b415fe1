//! Property listings, the central resource of the marketplace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::image::Image;

/// Province assigned when a listing does not name one.
pub const DEFAULT_PROVINCE: &str = "Catamarca";

// ─── Enumerations ────────────────────────────────────────────────────────────

/// Commercial operation a listing is offered under.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PropertyOperation {
  Venta,
  Alquiler,
  Temporal,
}

/// Building type of a listing.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PropertyKind {
  Casa,
  Departamento,
  Ph,
  Lote,
  Local,
}

/// The two boolean flags that only change through a toggle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PropertyFlag {
  Featured,
  Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
  pub lat: f64,
  pub lng: f64,
}

// ─── Entity ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
  pub id:           Uuid,
  pub title:        String,
  pub description:  Option<String>,
  pub operation:    PropertyOperation,
  #[serde(rename = "type")]
  pub kind:         PropertyKind,
  pub price_usd:    Option<f64>,
  pub price_ars:    Option<f64>,
  pub address:      Option<String>,
  pub city:         String,
  pub province:     String,
  pub coordinates:  Option<Coordinates>,
  pub rooms:        Option<u32>,
  pub bathrooms:    Option<u32>,
  pub area_covered: Option<f64>,
  pub area_total:   Option<f64>,
  pub featured:     bool,
  pub active:       bool,
  pub agent_id:     Option<Uuid>,
  pub images:       Vec<Image>,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

impl Property {
  pub fn flag(&self, flag: PropertyFlag) -> bool {
    match flag {
      PropertyFlag::Featured => self.featured,
      PropertyFlag::Active => self.active,
    }
  }
}

/// Validated input for creating a listing.
///
/// New listings start not featured and active; both flags change only
/// through the toggle operations.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProperty {
  pub title:        String,
  pub description:  Option<String>,
  pub operation:    PropertyOperation,
  pub kind:         PropertyKind,
  pub price_usd:    Option<f64>,
  pub price_ars:    Option<f64>,
  pub address:      Option<String>,
  pub city:         String,
  pub province:     String,
  pub coordinates:  Option<Coordinates>,
  pub rooms:        Option<u32>,
  pub bathrooms:    Option<u32>,
  pub area_covered: Option<f64>,
  pub area_total:   Option<f64>,
  pub agent_id:     Option<Uuid>,
}

impl NewProperty {
  /// Build the persisted entity. Used by storage backends so defaults live
  /// in one place.
  pub fn into_property(self, id: Uuid, now: DateTime<Utc>) -> Property {
    Property {
      id,
      title: self.title,
      description: self.description,
      operation: self.operation,
      kind: self.kind,
      price_usd: self.price_usd,
      price_ars: self.price_ars,
      address: self.address,
      city: self.city,
      province: self.province,
      coordinates: self.coordinates,
      rooms: self.rooms,
      bathrooms: self.bathrooms,
      area_covered: self.area_covered,
      area_total: self.area_total,
      featured: false,
      active: true,
      agent_id: self.agent_id,
      images: Vec::new(),
      created_at: now,
      updated_at: now,
    }
  }
}

/// Partial update. `None` leaves a field untouched; for nullable fields
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyPatch {
  pub title:        Option<String>,
  pub description:  Option<Option<String>>,
  pub operation:    Option<PropertyOperation>,
  pub kind:         Option<PropertyKind>,
  pub price_usd:    Option<Option<f64>>,
  pub price_ars:    Option<Option<f64>>,
  pub address:      Option<Option<String>>,
  pub city:         Option<String>,
  pub province:     Option<String>,
  pub coordinates:  Option<Option<Coordinates>>,
  pub rooms:        Option<Option<u32>>,
  pub bathrooms:    Option<Option<u32>>,
  pub area_covered: Option<Option<f64>>,
  pub area_total:   Option<Option<f64>>,
  pub agent_id:     Option<Option<Uuid>>,
}

impl PropertyPatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  pub fn apply(self, p: &mut Property) {
    if let Some(v) = self.title { p.title = v; }
    if let Some(v) = self.description { p.description = v; }
    if let Some(v) = self.operation { p.operation = v; }
    if let Some(v) = self.kind { p.kind = v; }
    if let Some(v) = self.price_usd { p.price_usd = v; }
    if let Some(v) = self.price_ars { p.price_ars = v; }
    if let Some(v) = self.address { p.address = v; }
    if let Some(v) = self.city { p.city = v; }
    if let Some(v) = self.province { p.province = v; }
    if let Some(v) = self.coordinates { p.coordinates = v; }
    if let Some(v) = self.rooms { p.rooms = v; }
    if let Some(v) = self.bathrooms { p.bathrooms = v; }
    if let Some(v) = self.area_covered { p.area_covered = v; }
    if let Some(v) = self.area_total { p.area_total = v; }
    if let Some(v) = self.agent_id { p.agent_id = v; }
  }
}

// ─── Query type ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertySort {
  #[default]
  Newest,
  Oldest,
  PriceAsc,
  PriceDesc,
}

/// Parameters for [`ResourceStore::list_properties`](crate::store::ResourceStore::list_properties).
#[derive(Debug, Clone, Default)]
pub struct PropertyQuery {
  pub operation:     Option<PropertyOperation>,
  pub kind:          Option<PropertyKind>,
  pub city:          Option<String>,
  pub agent_id:      Option<Uuid>,
  pub featured:      Option<bool>,
  pub active:        Option<bool>,
  pub min_price_usd: Option<f64>,
  pub max_price_usd: Option<f64>,
  pub min_rooms:     Option<u32>,
  /// Case-insensitive substring filter over title and address.
  pub text:          Option<String>,
  pub sort:          PropertySort,
  pub limit:         Option<usize>,
  pub offset:        Option<usize>,
}
