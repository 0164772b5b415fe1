//! Input validation.
//!
//! Every schema is a pure function from an untrusted JSON payload to a typed
//! value or the complete list of field errors. Checks never stop at the
//! first violation so a client can show every problem at once.
//!
//! Optional text fields treat an empty string like an absent field, which is
//! what HTML forms send for untouched inputs.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
  DEFAULT_LIMIT, MAX_LIMIT,
  actor::Role,
  agent::{AgentPatch, NewAgent},
  image::{MAX_IMAGE_BYTES, Upload},
  lead::{LeadQuery, NewLead},
  profile::ProfileQuery,
  property::{Coordinates, DEFAULT_PROVINCE, NewProperty, PropertyPatch},
};

/// One violated constraint. `field` is empty for cross-field constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
  pub field:   String,
  pub message: String,
}

impl FieldError {
  pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self { field: field.into(), message: message.into() }
  }
}

pub type Validated<T> = Result<T, Vec<FieldError>>;

// ─── Messages ────────────────────────────────────────────────────────────────

pub const MSG_NOT_OBJECT: &str = "Se esperaba un objeto JSON";
pub const MSG_PHONE_OR_EMAIL: &str = "Debes proporcionar al menos un teléfono o email";
pub const MSG_NO_CHANGES: &str = "No se enviaron cambios";
pub const MSG_INVALID_ID: &str = "ID inválido";
pub const MSG_FILE_REQUIRED: &str = "Se requiere un archivo";

const MSG_LEAD_KIND: &str = "Tipo de consulta inválido";
const MSG_LEAD_NAME: &str = "El nombre debe tener al menos 2 caracteres";
const MSG_LEAD_MESSAGE: &str = "El mensaje debe tener al menos 10 caracteres";
const MSG_EMAIL: &str = "Email inválido";
const MSG_PHONE: &str = "El teléfono debe tener al menos 6 caracteres";
const MSG_PROPERTY_ID: &str = "ID de propiedad inválido";
const MSG_AGENT_ID: &str = "ID de agente inválido";
const MSG_USER_ID: &str = "ID de usuario inválido";
const MSG_BOOL: &str = "Debe ser verdadero o falso";
const MSG_TITLE: &str = "El título debe tener al menos 3 caracteres";
const MSG_DESCRIPTION: &str = "Descripción inválida";
const MSG_OPERATION: &str = "Operación inválida";
const MSG_PROPERTY_KIND: &str = "Tipo de propiedad inválido";
const MSG_PRICE: &str = "El precio debe ser un número positivo";
const MSG_ADDRESS: &str = "Dirección inválida";
const MSG_CITY: &str = "La ciudad debe tener al menos 2 caracteres";
const MSG_PROVINCE: &str = "La provincia debe tener al menos 2 caracteres";
const MSG_COORDINATES: &str = "Coordenadas inválidas";
const MSG_COUNT: &str = "Debe ser un número entero no negativo";
const MSG_AREA: &str = "La superficie debe ser un número positivo";
const MSG_AGENT_NAME: &str = "El nombre debe tener al menos 2 caracteres";
const MSG_ROLE: &str = "Rol inválido";
const MSG_LIMIT: &str = "El límite debe estar entre 1 y 100";
const MSG_OFFSET: &str = "El desplazamiento debe ser un número entero no negativo";
const MSG_IMAGE_TYPE: &str = "El archivo debe ser una imagen";
const MSG_IMAGE_EMPTY: &str = "El archivo está vacío";
const MSG_IMAGE_SIZE: &str = "La imagen supera el tamaño máximo de 5 MB";
const MSG_ALT: &str = "Texto alternativo inválido";

// ─── Field walker ────────────────────────────────────────────────────────────

/// Reads fields out of a JSON object while accumulating errors.
///
/// [`Fields::nullable`] implements partial-update semantics: absent →
/// `None` (leave untouched), `null` → `Some(None)` (clear), value →
/// `Some(Some(v))`.
struct Fields<'a> {
  map:    Option<&'a Map<String, Value>>,
  errors: Vec<FieldError>,
}

impl<'a> Fields<'a> {
  fn new(raw: &'a Value) -> Self {
    match raw.as_object() {
      Some(map) => Self { map: Some(map), errors: Vec::new() },
      None => Self {
        map:    None,
        errors: vec![FieldError::new("", MSG_NOT_OBJECT)],
      },
    }
  }

  fn fail(&mut self, field: &str, message: &str) {
    self.errors.push(FieldError::new(field, message));
  }

  fn check(&mut self, ok: bool, field: &str, message: &str) {
    if !ok {
      self.fail(field, message);
    }
  }

  fn raw(&self, field: &str) -> Option<&'a Value> {
    self.map.and_then(|m| m.get(field))
  }

  fn is_blank(v: &Value) -> bool {
    v.as_str().is_some_and(|s| s.trim().is_empty())
  }

  /// Present, non-null, and (for strings) not blank.
  fn present(&self, field: &str) -> Option<&'a Value> {
    self
      .raw(field)
      .filter(|v| !v.is_null() && !Self::is_blank(v))
  }

  fn parse<T>(&mut self, field: &str, message: &str, v: &Value, f: impl Fn(&Value) -> Option<T>) -> Option<T> {
    let parsed = f(v);
    if parsed.is_none() {
      self.fail(field, message);
    }
    parsed
  }

  fn optional<T>(&mut self, field: &str, message: &str, f: impl Fn(&Value) -> Option<T>) -> Option<T> {
    let v = self.present(field)?;
    self.parse(field, message, v, f)
  }

  fn required<T>(&mut self, field: &str, message: &str, f: impl Fn(&Value) -> Option<T>) -> Option<T> {
    match self.present(field) {
      Some(v) => self.parse(field, message, v, f),
      None => {
        self.fail(field, message);
        None
      }
    }
  }

  fn nullable<T>(&mut self, field: &str, message: &str, f: impl Fn(&Value) -> Option<T>) -> Option<Option<T>> {
    let v = self.raw(field)?;
    if v.is_null() || Self::is_blank(v) {
      return Some(None);
    }
    self.parse(field, message, v, f).map(Some)
  }

  /// Present in a patch; `null` is rejected because the field is required.
  fn patched<T>(&mut self, field: &str, message: &str, f: impl Fn(&Value) -> Option<T>) -> Option<T> {
    let v = self.raw(field)?;
    self.parse(field, message, v, f)
  }

  fn into_errors(self) -> Vec<FieldError> { self.errors }
}

// ─── Primitive parsers ───────────────────────────────────────────────────────

fn text(min: usize) -> impl Fn(&Value) -> Option<String> {
  move |v| {
    let s = v.as_str()?.trim();
    (s.chars().count() >= min).then(|| s.to_owned())
  }
}

fn email(v: &Value) -> Option<String> {
  let s = v.as_str()?.trim();
  let (local, domain) = s.split_once('@')?;
  let valid = !local.is_empty()
    && !domain.contains('@')
    && domain.contains('.')
    && !domain.starts_with('.')
    && !domain.ends_with('.')
    && !s.chars().any(char::is_whitespace);
  valid.then(|| s.to_owned())
}

fn choice<T: DeserializeOwned>(v: &Value) -> Option<T> {
  serde_json::from_value(v.clone()).ok()
}

fn parse_uuid(v: &Value) -> Option<Uuid> { Uuid::parse_str(v.as_str()?.trim()).ok() }

fn positive(v: &Value) -> Option<f64> {
  v.as_f64().filter(|n| n.is_finite() && *n > 0.0)
}

fn count(v: &Value) -> Option<u32> { v.as_u64().and_then(|n| u32::try_from(n).ok()) }

fn flag(v: &Value) -> Option<bool> { v.as_bool() }

fn coordinates(v: &Value) -> Option<Coordinates> {
  let lat = v.get("lat")?.as_f64()?;
  let lng = v.get("lng")?.as_f64()?;
  ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng))
    .then_some(Coordinates { lat, lng })
}

fn limit(v: &Value) -> Option<usize> {
  v.as_u64()
    .and_then(|n| usize::try_from(n).ok())
    .filter(|n| (1..=MAX_LIMIT).contains(n))
}

fn offset(v: &Value) -> Option<usize> { v.as_u64().and_then(|n| usize::try_from(n).ok()) }

/// Roles that may be assigned to a profile. `anonymous` is not a profile
/// role.
fn assignable_role(v: &Value) -> Option<Role> {
  choice::<Role>(v).filter(|r| *r != Role::Anonymous)
}

/// Schema for actions whose only input is the resource id. An absent body
/// (`null`) or an object of any shape is accepted.
pub fn no_body(raw: &Value) -> Validated<()> {
  if raw.is_object() || raw.is_null() {
    Ok(())
  } else {
    Err(vec![FieldError::new("", MSG_NOT_OBJECT)])
  }
}

// ─── Leads ───────────────────────────────────────────────────────────────────

pub fn lead_create(raw: &Value) -> Validated<NewLead> {
  let mut f = Fields::new(raw);
  let kind = f.required("kind", MSG_LEAD_KIND, choice);
  let property_id = f.optional("propertyId", MSG_PROPERTY_ID, parse_uuid);
  let name = f.required("name", MSG_LEAD_NAME, text(2));
  let phone = f.optional("phone", MSG_PHONE, text(6));
  let email = f.optional("email", MSG_EMAIL, email);
  let message = f.required("message", MSG_LEAD_MESSAGE, text(10));

  let contact_given = f.present("phone").is_some() || f.present("email").is_some();
  f.check(contact_given, "", MSG_PHONE_OR_EMAIL);

  let errors = f.into_errors();
  match (kind, name, message) {
    (Some(kind), Some(name), Some(message)) if errors.is_empty() => Ok(NewLead {
      kind,
      property_id,
      name,
      phone,
      email,
      message,
    }),
    _ => Err(errors),
  }
}

/// `{"isRead": bool}`; an absent flag means "mark as read".
pub fn lead_read_flag(raw: &Value) -> Validated<bool> {
  let mut f = Fields::new(raw);
  let is_read = f.optional("isRead", MSG_BOOL, flag).unwrap_or(true);
  let errors = f.into_errors();
  if errors.is_empty() { Ok(is_read) } else { Err(errors) }
}

pub fn lead_query(raw: &Value) -> Validated<LeadQuery> {
  let mut f = Fields::new(raw);
  let kind = f.optional("kind", MSG_LEAD_KIND, choice);
  let is_read = f.optional("isRead", MSG_BOOL, flag);
  let property_id = f.optional("propertyId", MSG_PROPERTY_ID, parse_uuid);
  let limit = f.optional("limit", MSG_LIMIT, limit);
  let offset = f.optional("offset", MSG_OFFSET, offset);
  let errors = f.into_errors();
  if !errors.is_empty() {
    return Err(errors);
  }
  Ok(LeadQuery {
    kind,
    is_read,
    property_id,
    limit: Some(limit.unwrap_or(DEFAULT_LIMIT)),
    offset,
  })
}

// ─── Properties ──────────────────────────────────────────────────────────────

pub fn property_create(raw: &Value) -> Validated<NewProperty> {
  let mut f = Fields::new(raw);
  let title = f.required("title", MSG_TITLE, text(3));
  let description = f.optional("description", MSG_DESCRIPTION, text(1));
  let operation = f.required("operation", MSG_OPERATION, choice);
  let kind = f.required("type", MSG_PROPERTY_KIND, choice);
  let price_usd = f.optional("priceUsd", MSG_PRICE, positive);
  let price_ars = f.optional("priceArs", MSG_PRICE, positive);
  let address = f.optional("address", MSG_ADDRESS, text(1));
  let city = f.required("city", MSG_CITY, text(2));
  let province = f.optional("province", MSG_PROVINCE, text(2));
  let coordinates = f.optional("coordinates", MSG_COORDINATES, coordinates);
  let rooms = f.optional("rooms", MSG_COUNT, count);
  let bathrooms = f.optional("bathrooms", MSG_COUNT, count);
  let area_covered = f.optional("areaCovered", MSG_AREA, positive);
  let area_total = f.optional("areaTotal", MSG_AREA, positive);
  let agent_id = f.optional("agentId", MSG_AGENT_ID, parse_uuid);

  let errors = f.into_errors();
  match (title, operation, kind, city) {
    (Some(title), Some(operation), Some(kind), Some(city)) if errors.is_empty() => {
      Ok(NewProperty {
        title,
        description,
        operation,
        kind,
        price_usd,
        price_ars,
        address,
        city,
        province: province.unwrap_or_else(|| DEFAULT_PROVINCE.to_owned()),
        coordinates,
        rooms,
        bathrooms,
        area_covered,
        area_total,
        agent_id,
      })
    }
    _ => Err(errors),
  }
}

pub fn property_patch(raw: &Value) -> Validated<PropertyPatch> {
  let mut f = Fields::new(raw);
  let patch = PropertyPatch {
    title:        f.patched("title", MSG_TITLE, text(3)),
    description:  f.nullable("description", MSG_DESCRIPTION, text(1)),
    operation:    f.patched("operation", MSG_OPERATION, choice),
    kind:         f.patched("type", MSG_PROPERTY_KIND, choice),
    price_usd:    f.nullable("priceUsd", MSG_PRICE, positive),
    price_ars:    f.nullable("priceArs", MSG_PRICE, positive),
    address:      f.nullable("address", MSG_ADDRESS, text(1)),
    city:         f.patched("city", MSG_CITY, text(2)),
    province:     f.patched("province", MSG_PROVINCE, text(2)),
    coordinates:  f.nullable("coordinates", MSG_COORDINATES, coordinates),
    rooms:        f.nullable("rooms", MSG_COUNT, count),
    bathrooms:    f.nullable("bathrooms", MSG_COUNT, count),
    area_covered: f.nullable("areaCovered", MSG_AREA, positive),
    area_total:   f.nullable("areaTotal", MSG_AREA, positive),
    agent_id:     f.nullable("agentId", MSG_AGENT_ID, parse_uuid),
  };

  let mut errors = f.into_errors();
  if errors.is_empty() && patch.is_empty() {
    errors.push(FieldError::new("", MSG_NO_CHANGES));
  }
  if errors.is_empty() { Ok(patch) } else { Err(errors) }
}

/// `{"current": bool}`, the flag value the caller last saw.
pub fn flag_current(raw: &Value) -> Validated<bool> {
  let mut f = Fields::new(raw);
  let current = f.required("current", MSG_BOOL, flag);
  let errors = f.into_errors();
  match current {
    Some(current) if errors.is_empty() => Ok(current),
    _ => Err(errors),
  }
}

pub fn image_upload(upload: &Upload) -> Validated<()> {
  let mut errors = Vec::new();
  let content_type = upload.content_type.trim().to_ascii_lowercase();
  if !content_type.starts_with("image/") {
    errors.push(FieldError::new("file", MSG_IMAGE_TYPE));
  }
  if upload.bytes.is_empty() {
    errors.push(FieldError::new("file", MSG_IMAGE_EMPTY));
  } else if upload.bytes.len() > MAX_IMAGE_BYTES {
    errors.push(FieldError::new("file", MSG_IMAGE_SIZE));
  }
  if upload.alt.as_deref().is_some_and(|alt| alt.chars().count() > 300) {
    errors.push(FieldError::new("alt", MSG_ALT));
  }
  if errors.is_empty() { Ok(()) } else { Err(errors) }
}

// ─── Agents ──────────────────────────────────────────────────────────────────

pub fn agent_create(raw: &Value) -> Validated<NewAgent> {
  let mut f = Fields::new(raw);
  let name = f.required("name", MSG_AGENT_NAME, text(2));
  let email = f.required("email", MSG_EMAIL, email);
  let phone = f.optional("phone", MSG_PHONE, text(6));
  let user_id = f.required("userId", MSG_USER_ID, parse_uuid);

  let errors = f.into_errors();
  match (name, email, user_id) {
    (Some(name), Some(email), Some(user_id)) if errors.is_empty() => {
      Ok(NewAgent { name, email, phone, user_id })
    }
    _ => Err(errors),
  }
}

pub fn agent_patch(raw: &Value) -> Validated<AgentPatch> {
  let mut f = Fields::new(raw);
  let patch = AgentPatch {
    name:    f.patched("name", MSG_AGENT_NAME, text(2)),
    email:   f.patched("email", MSG_EMAIL, email),
    phone:   f.nullable("phone", MSG_PHONE, text(6)),
    user_id: f.patched("userId", MSG_USER_ID, parse_uuid),
  };

  let mut errors = f.into_errors();
  if errors.is_empty() && patch.is_empty() {
    errors.push(FieldError::new("", MSG_NO_CHANGES));
  }
  if errors.is_empty() { Ok(patch) } else { Err(errors) }
}

// ─── Profiles ────────────────────────────────────────────────────────────────

/// `{"userId": uuid, "role": "admin"|"agent"|"user"}`
pub fn profile_role(raw: &Value) -> Validated<(Uuid, Role)> {
  let mut f = Fields::new(raw);
  let user_id = f.required("userId", MSG_USER_ID, parse_uuid);
  let role = f.required("role", MSG_ROLE, assignable_role);
  let errors = f.into_errors();
  match (user_id, role) {
    (Some(user_id), Some(role)) if errors.is_empty() => Ok((user_id, role)),
    _ => Err(errors),
  }
}

pub fn profile_query(raw: &Value) -> Validated<ProfileQuery> {
  let mut f = Fields::new(raw);
  let role = f.optional("role", MSG_ROLE, choice);
  let limit = f.optional("limit", MSG_LIMIT, limit);
  let offset = f.optional("offset", MSG_OFFSET, offset);
  let errors = f.into_errors();
  if !errors.is_empty() {
    return Err(errors);
  }
  Ok(ProfileQuery {
    role,
    limit: Some(limit.unwrap_or(DEFAULT_LIMIT)),
    offset,
  })
}

#[cfg(test)]
mod tests {
  use bytes::Bytes;
  use serde_json::json;

  use super::*;
  use crate::{
    lead::LeadKind,
    property::{PropertyKind, PropertyOperation},
  };

  fn fields(errors: &[FieldError]) -> Vec<&str> {
    errors.iter().map(|e| e.field.as_str()).collect()
  }

  // ── Leads ───────────────────────────────────────────────────────────────

  #[test]
  fn valid_contact_lead() {
    let lead = lead_create(&json!({
      "kind": "contacto",
      "name": "Ana Lopez",
      "email": "ana@example.com",
      "message": "Quiero info sobre la propiedad",
    }))
    .unwrap();
    assert_eq!(lead.kind, LeadKind::Contacto);
    assert_eq!(lead.name, "Ana Lopez");
    assert_eq!(lead.email.as_deref(), Some("ana@example.com"));
    assert_eq!(lead.phone, None);
    assert_eq!(lead.property_id, None);
  }

  #[test]
  fn lead_errors_are_all_reported_at_once() {
    let errors = lead_create(&json!({
      "kind": "tasacion",
      "name": "A",
      "message": "short",
    }))
    .unwrap_err();
    assert_eq!(fields(&errors), vec!["name", "message", ""]);
    assert_eq!(errors[2].message, MSG_PHONE_OR_EMAIL);
  }

  #[test]
  fn lead_requires_phone_or_email_even_when_otherwise_valid() {
    let errors = lead_create(&json!({
      "kind": "contacto",
      "name": "Ana Lopez",
      "phone": "",
      "message": "Quiero info sobre la propiedad",
    }))
    .unwrap_err();
    assert_eq!(errors, vec![FieldError::new("", MSG_PHONE_OR_EMAIL)]);
  }

  #[test]
  fn lead_with_phone_only_is_valid() {
    let lead = lead_create(&json!({
      "kind": "tasacion",
      "name": "Beto",
      "phone": "383 4123456",
      "message": "Necesito tasar un terreno",
    }))
    .unwrap();
    assert_eq!(lead.phone.as_deref(), Some("383 4123456"));
  }

  #[test]
  fn malformed_lead_fields_are_rejected() {
    let errors = lead_create(&json!({
      "kind": "queja",
      "name": "Ana Lopez",
      "email": "not-an-email",
      "propertyId": "123",
      "message": "Quiero info sobre la propiedad",
    }))
    .unwrap_err();
    assert_eq!(fields(&errors), vec!["kind", "propertyId", "email"]);
  }

  #[test]
  fn non_object_payload_is_a_single_error() {
    let errors = lead_create(&json!(["kind"])).unwrap_err();
    assert_eq!(errors[0], FieldError::new("", MSG_NOT_OBJECT));
  }

  // ── Properties ──────────────────────────────────────────────────────────

  #[test]
  fn property_create_applies_defaults() {
    let p = property_create(&json!({
      "title": "Departamento céntrico",
      "operation": "alquiler",
      "type": "departamento",
      "city": "San Fernando del Valle de Catamarca",
      "priceArs": 350000,
      "rooms": 2,
    }))
    .unwrap();
    assert_eq!(p.operation, PropertyOperation::Alquiler);
    assert_eq!(p.kind, PropertyKind::Departamento);
    assert_eq!(p.province, DEFAULT_PROVINCE);
    assert_eq!(p.price_ars, Some(350000.0));
    assert_eq!(p.rooms, Some(2));
    assert_eq!(p.price_usd, None);
  }

  #[test]
  fn property_create_reports_every_violation() {
    let errors = property_create(&json!({
      "title": "ab",
      "operation": "permuta",
      "priceUsd": -5,
      "coordinates": { "lat": 120.0, "lng": 0.0 },
      "rooms": 2.5,
    }))
    .unwrap_err();
    assert_eq!(
      fields(&errors),
      vec!["title", "operation", "type", "priceUsd", "city", "coordinates", "rooms"]
    );
  }

  #[test]
  fn property_patch_distinguishes_absent_null_and_value() {
    let patch = property_patch(&json!({
      "title": "Nuevo título",
      "priceUsd": null,
      "areaTotal": 450,
    }))
    .unwrap();
    assert_eq!(patch.title.as_deref(), Some("Nuevo título"));
    assert_eq!(patch.price_usd, Some(None));
    assert_eq!(patch.area_total, Some(Some(450.0)));
    assert_eq!(patch.city, None);
  }

  #[test]
  fn property_patch_fully_constrains_present_fields() {
    let errors = property_patch(&json!({ "city": null, "type": "castillo" })).unwrap_err();
    assert_eq!(fields(&errors), vec!["type", "city"]);
  }

  #[test]
  fn empty_patch_is_rejected() {
    let errors = property_patch(&json!({})).unwrap_err();
    assert_eq!(errors, vec![FieldError::new("", MSG_NO_CHANGES)]);
  }

  #[test]
  fn flag_requires_boolean_current() {
    assert_eq!(flag_current(&json!({ "current": true })), Ok(true));
    assert_eq!(fields(&flag_current(&json!({ "current": "yes" })).unwrap_err()), vec!["current"]);
  }

  #[test]
  fn image_upload_checks_mime_and_size() {
    let ok = Upload {
      content_type: "image/png".into(),
      bytes:        Bytes::from_static(b"\x89PNG"),
      alt:          None,
    };
    assert!(image_upload(&ok).is_ok());

    let pdf = Upload { content_type: "application/pdf".into(), ..ok.clone() };
    assert_eq!(image_upload(&pdf).unwrap_err()[0].message, MSG_IMAGE_TYPE);

    let empty = Upload { bytes: Bytes::new(), ..ok.clone() };
    assert_eq!(image_upload(&empty).unwrap_err()[0].message, MSG_IMAGE_EMPTY);

    let huge = Upload { bytes: Bytes::from(vec![0u8; MAX_IMAGE_BYTES + 1]), ..ok };
    assert_eq!(image_upload(&huge).unwrap_err()[0].message, MSG_IMAGE_SIZE);
  }

  // ── Agents & profiles ───────────────────────────────────────────────────

  #[test]
  fn agent_create_requires_identity_link() {
    let errors = agent_create(&json!({
      "name": "Carla Díaz",
      "email": "carla@inmo.example",
    }))
    .unwrap_err();
    assert_eq!(fields(&errors), vec!["userId"]);
  }

  #[test]
  fn profile_role_rejects_anonymous() {
    let errors = profile_role(&json!({
      "userId": Uuid::new_v4().to_string(),
      "role": "anonymous",
    }))
    .unwrap_err();
    assert_eq!(fields(&errors), vec!["role"]);
  }

  #[test]
  fn profile_query_bounds_limit() {
    let q = profile_query(&json!({ "role": "agent" })).unwrap();
    assert_eq!(q.role, Some(Role::Agent));
    assert_eq!(q.limit, Some(DEFAULT_LIMIT));

    let errors = profile_query(&json!({ "limit": 1000 })).unwrap_err();
    assert_eq!(fields(&errors), vec!["limit"]);
  }
}
