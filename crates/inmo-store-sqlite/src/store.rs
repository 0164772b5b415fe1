//! [`SqliteStore`]: the SQLite implementation of [`ResourceStore`].

use std::path::Path;

use rusqlite::{Connection, OptionalExtension as _, params, params_from_iter, types::Value};
use uuid::Uuid;

use inmo_core::{
  DEFAULT_LIMIT, MAX_LIMIT,
  actor::Role,
  agent::{Agent, AgentPatch, NewAgent},
  image::{Image, NewImage},
  lead::{Lead, LeadQuery, NewLead},
  policy::Resource,
  profile::{Profile, ProfileQuery},
  property::{NewProperty, Property, PropertyFlag, PropertyPatch, PropertyQuery, PropertySort},
  store::ResourceStore,
};

use crate::{
  Error, Result,
  encode::{
    AGENT_COLUMNS, IMAGE_COLUMNS, LEAD_COLUMNS, PROFILE_COLUMNS, PROPERTY_COLUMNS, RawAgent,
    RawImage, RawLead, RawProfile, RawProperty, encode_dt, encode_uuid, now,
  },
  error::is_unique_violation,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A marketplace store backed by a single SQLite file.
///
/// Clones share the inner connection.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row helpers (run on the database thread) ────────────────────────────────

fn exists(conn: &Connection, table: &str, key: &str, id: &str) -> rusqlite::Result<bool> {
  let sql = format!("SELECT 1 FROM {table} WHERE {key} = ?1");
  Ok(conn.query_row(&sql, [id], |_| Ok(())).optional()?.is_some())
}

fn select_images(conn: &Connection, property_id: &str) -> rusqlite::Result<Vec<RawImage>> {
  let sql = format!(
    "SELECT {IMAGE_COLUMNS} FROM images WHERE property_id = ?1 ORDER BY created_at, rowid"
  );
  let mut stmt = conn.prepare_cached(&sql)?;
  let rows = stmt
    .query_map([property_id], RawImage::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn select_property(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawProperty>> {
  let sql = format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE property_id = ?1");
  let Some(mut raw) = conn.query_row(&sql, [id], RawProperty::from_row).optional()? else {
    return Ok(None);
  };
  raw.images = select_images(conn, id)?;
  Ok(Some(raw))
}

fn select_one<T>(
  conn: &Connection,
  columns: &str,
  table: &str,
  key: &str,
  id: &str,
  map: fn(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
) -> rusqlite::Result<Option<T>> {
  let sql = format!("SELECT {columns} FROM {table} WHERE {key} = ?1");
  conn.query_row(&sql, [id], map).optional()
}

/// Column values of `p` in [`PROPERTY_COLUMNS`] order.
fn property_values(p: &Property) -> Vec<Value> {
  vec![
    Value::from(encode_uuid(p.id)),
    Value::from(p.title.clone()),
    Value::from(p.description.clone()),
    Value::from(p.operation.to_string()),
    Value::from(p.kind.to_string()),
    Value::from(p.price_usd),
    Value::from(p.price_ars),
    Value::from(p.address.clone()),
    Value::from(p.city.clone()),
    Value::from(p.province.clone()),
    Value::from(p.coordinates.map(|c| c.lat)),
    Value::from(p.coordinates.map(|c| c.lng)),
    Value::from(p.rooms),
    Value::from(p.bathrooms),
    Value::from(p.area_covered),
    Value::from(p.area_total),
    Value::from(p.featured),
    Value::from(p.active),
    Value::from(p.agent_id.map(encode_uuid)),
    Value::from(encode_dt(p.created_at)),
    Value::from(encode_dt(p.updated_at)),
  ]
}

/// `(LIMIT, OFFSET)` bind values. Offsets past `i64::MAX` saturate.
pub(crate) fn page(limit: Option<usize>, offset: Option<usize>) -> (i64, i64) {
  let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
  let offset = i64::try_from(offset.unwrap_or(0)).unwrap_or(i64::MAX);
  (limit as i64, offset)
}

fn where_clause(conds: &[&str]) -> String {
  if conds.is_empty() {
    String::new()
  } else {
    format!("WHERE {}", conds.join(" AND "))
  }
}

impl SqliteStore {
  /// Write every column of an existing property row.
  async fn write_property(&self, property: &Property) -> Result<()> {
    let values = property_values(property);
    let id = property.id;
    let agent_id = property.agent_id;

    self
      .conn
      .call(move |conn| {
        if let Some(agent_id) = agent_id {
          if !exists(conn, "agents", "agent_id", &encode_uuid(agent_id))? {
            return Ok(Err(Error::NotFound { resource: Resource::Agent, id: agent_id }));
          }
        }
        let changed = conn.execute(
          "UPDATE properties SET
             title = ?2, description = ?3, operation = ?4, kind = ?5,
             price_usd = ?6, price_ars = ?7, address = ?8, city = ?9,
             province = ?10, lat = ?11, lng = ?12, rooms = ?13, bathrooms = ?14,
             area_covered = ?15, area_total = ?16, featured = ?17, active = ?18,
             agent_id = ?19, created_at = ?20, updated_at = ?21
           WHERE property_id = ?1",
          params_from_iter(values),
        )?;
        if changed == 0 {
          return Ok(Err(Error::NotFound { resource: Resource::Property, id }));
        }
        Ok(Ok(()))
      })
      .await?
  }
}

// ─── ResourceStore impl ──────────────────────────────────────────────────────

impl ResourceStore for SqliteStore {
  type Error = Error;

  // ── Properties ────────────────────────────────────────────────────────────

  async fn create_property(&self, input: NewProperty) -> Result<Property> {
    let property = input.into_property(Uuid::new_v4(), now());
    let values = property_values(&property);
    let agent_id = property.agent_id;

    self
      .conn
      .call(move |conn| {
        if let Some(agent_id) = agent_id {
          if !exists(conn, "agents", "agent_id", &encode_uuid(agent_id))? {
            return Ok(Err(Error::NotFound { resource: Resource::Agent, id: agent_id }));
          }
        }
        let sql = format!(
          "INSERT INTO properties ({PROPERTY_COLUMNS}) VALUES (
             ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11,
             ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21
           )"
        );
        conn.execute(&sql, params_from_iter(values))?;
        Ok(Ok(()))
      })
      .await??;

    tracing::debug!(property = %property.id, "property created");
    Ok(property)
  }

  async fn get_property(&self, id: Uuid) -> Result<Option<Property>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(select_property(conn, &id_str)?))
      .await?;
    raw.map(RawProperty::into_property).transpose()
  }

  async fn update_property(&self, id: Uuid, patch: PropertyPatch) -> Result<Property> {
    let mut property = self
      .get_property(id)
      .await?
      .ok_or(Error::NotFound { resource: Resource::Property, id })?;

    patch.apply(&mut property);
    property.updated_at = now();
    self.write_property(&property).await?;
    Ok(property)
  }

  async fn set_property_flag(
    &self,
    id: Uuid,
    flag: PropertyFlag,
    value: bool,
  ) -> Result<Property> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(now());

    let raw = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "UPDATE properties SET {flag} = ?2, updated_at = ?3 WHERE property_id = ?1"
        );
        conn.execute(&sql, params![id_str, value, at_str])?;
        Ok(select_property(conn, &id_str)?)
      })
      .await?
      .ok_or(Error::NotFound { resource: Resource::Property, id })?;

    raw.into_property()
  }

  async fn delete_property(&self, id: Uuid) -> Result<Property> {
    let id_str = encode_uuid(id);

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw = select_property(&tx, &id_str)?;
        if raw.is_some() {
          // Images cascade; leads are detached.
          tx.execute("DELETE FROM properties WHERE property_id = ?1", [&id_str])?;
        }
        tx.commit()?;
        Ok(raw)
      })
      .await?
      .ok_or(Error::NotFound { resource: Resource::Property, id })?;

    raw.into_property()
  }

  async fn list_properties(&self, query: &PropertyQuery) -> Result<Vec<Property>> {
    let mut conds: Vec<&'static str> = vec![];
    let mut values: Vec<Value> = vec![];

    if let Some(op) = query.operation {
      conds.push("operation = ?");
      values.push(Value::from(op.to_string()));
    }
    if let Some(kind) = query.kind {
      conds.push("kind = ?");
      values.push(Value::from(kind.to_string()));
    }
    if let Some(city) = &query.city {
      conds.push("city = ? COLLATE NOCASE");
      values.push(Value::from(city.clone()));
    }
    if let Some(agent_id) = query.agent_id {
      conds.push("agent_id = ?");
      values.push(Value::from(encode_uuid(agent_id)));
    }
    if let Some(featured) = query.featured {
      conds.push("featured = ?");
      values.push(Value::from(featured));
    }
    if let Some(active) = query.active {
      conds.push("active = ?");
      values.push(Value::from(active));
    }
    if let Some(min) = query.min_price_usd {
      conds.push("price_usd >= ?");
      values.push(Value::from(min));
    }
    if let Some(max) = query.max_price_usd {
      conds.push("price_usd <= ?");
      values.push(Value::from(max));
    }
    if let Some(rooms) = query.min_rooms {
      conds.push("rooms >= ?");
      values.push(Value::from(rooms));
    }
    if let Some(text) = query.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
      conds.push("(title LIKE ? OR address LIKE ?)");
      let pattern = format!("%{text}%");
      values.push(Value::from(pattern.clone()));
      values.push(Value::from(pattern));
    }

    let order = match query.sort {
      PropertySort::Newest => "created_at DESC, rowid DESC",
      PropertySort::Oldest => "created_at ASC, rowid ASC",
      PropertySort::PriceAsc => "price_usd IS NULL, price_usd ASC, created_at DESC",
      PropertySort::PriceDesc => "price_usd IS NULL, price_usd DESC, created_at DESC",
    };
    let (limit, offset) = page(query.limit, query.offset);
    values.push(Value::from(limit));
    values.push(Value::from(offset));

    let sql = format!(
      "SELECT {PROPERTY_COLUMNS} FROM properties {} ORDER BY {order} LIMIT ? OFFSET ?",
      where_clause(&conds)
    );

    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt
          .query_map(params_from_iter(values), RawProperty::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        for raw in &mut rows {
          raw.images = select_images(conn, &raw.property_id)?;
        }
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProperty::into_property).collect()
  }

  async fn owner_email(&self, property_id: Uuid) -> Result<Option<String>> {
    let id_str = encode_uuid(property_id);

    self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT a.email
               FROM properties p
               LEFT JOIN agents a ON a.agent_id = p.agent_id
               WHERE p.property_id = ?1",
              [&id_str],
              |row| row.get::<_, Option<String>>(0),
            )
            .optional()?,
        )
      })
      .await?
      .ok_or(Error::NotFound { resource: Resource::Property, id: property_id })
  }

  // ── Images ────────────────────────────────────────────────────────────────

  async fn create_image(&self, input: NewImage) -> Result<Image> {
    let image = Image {
      id:          Uuid::new_v4(),
      property_id: input.property_id,
      url:         input.url,
      alt:         input.alt,
      storage_key: input.storage_key,
      created_at:  now(),
    };

    let id_str       = encode_uuid(image.id);
    let property_str = encode_uuid(image.property_id);
    let url          = image.url.clone();
    let alt          = image.alt.clone();
    let key          = image.storage_key.clone();
    let at_str       = encode_dt(image.created_at);
    let property_id  = image.property_id;

    self
      .conn
      .call(move |conn| {
        if !exists(conn, "properties", "property_id", &property_str)? {
          return Ok(Err(Error::NotFound { resource: Resource::Property, id: property_id }));
        }
        conn.execute(
          "INSERT INTO images (image_id, property_id, url, alt, storage_key, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          params![id_str, property_str, url, alt, key, at_str],
        )?;
        Ok(Ok(()))
      })
      .await??;

    Ok(image)
  }

  async fn get_image(&self, id: Uuid) -> Result<Option<Image>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| {
        Ok(select_one(conn, IMAGE_COLUMNS, "images", "image_id", &id_str, RawImage::from_row)?)
      })
      .await?;
    raw.map(RawImage::into_image).transpose()
  }

  async fn delete_image(&self, id: Uuid) -> Result<Image> {
    let id_str = encode_uuid(id);

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw =
          select_one(&tx, IMAGE_COLUMNS, "images", "image_id", &id_str, RawImage::from_row)?;
        if raw.is_some() {
          tx.execute("DELETE FROM images WHERE image_id = ?1", [&id_str])?;
        }
        tx.commit()?;
        Ok(raw)
      })
      .await?
      .ok_or(Error::NotFound { resource: Resource::Image, id })?;

    raw.into_image()
  }

  async fn list_images(&self, property_id: Uuid) -> Result<Vec<Image>> {
    let id_str = encode_uuid(property_id);
    let raws = self
      .conn
      .call(move |conn| Ok(select_images(conn, &id_str)?))
      .await?;
    raws.into_iter().map(RawImage::into_image).collect()
  }

  // ── Leads ─────────────────────────────────────────────────────────────────

  async fn create_lead(&self, input: NewLead) -> Result<Lead> {
    let lead = Lead {
      id:          Uuid::new_v4(),
      kind:        input.kind,
      property_id: input.property_id,
      name:        input.name,
      phone:       input.phone,
      email:       input.email,
      message:     input.message,
      is_read:     false,
      created_at:  now(),
    };

    let id_str       = encode_uuid(lead.id);
    let kind_str     = lead.kind.to_string();
    let property_id  = lead.property_id;
    let property_str = property_id.map(encode_uuid);
    let name         = lead.name.clone();
    let phone        = lead.phone.clone();
    let email        = lead.email.clone();
    let message      = lead.message.clone();
    let at_str       = encode_dt(lead.created_at);

    self
      .conn
      .call(move |conn| {
        if let (Some(id), Some(id_str)) = (property_id, property_str.as_deref()) {
          if !exists(conn, "properties", "property_id", id_str)? {
            return Ok(Err(Error::NotFound { resource: Resource::Property, id }));
          }
        }
        conn.execute(
          "INSERT INTO leads (
             lead_id, kind, property_id, name, phone, email, message, is_read, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8)",
          params![id_str, kind_str, property_str, name, phone, email, message, at_str],
        )?;
        Ok(Ok(()))
      })
      .await??;

    tracing::debug!(lead = %lead.id, kind = %lead.kind, "lead recorded");
    Ok(lead)
  }

  async fn get_lead(&self, id: Uuid) -> Result<Option<Lead>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| {
        Ok(select_one(conn, LEAD_COLUMNS, "leads", "lead_id", &id_str, RawLead::from_row)?)
      })
      .await?;
    raw.map(RawLead::into_lead).transpose()
  }

  async fn set_lead_read(&self, id: Uuid, is_read: bool) -> Result<Lead> {
    let id_str = encode_uuid(id);

    let raw = self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE leads SET is_read = ?2 WHERE lead_id = ?1",
          params![id_str, is_read],
        )?;
        Ok(select_one(conn, LEAD_COLUMNS, "leads", "lead_id", &id_str, RawLead::from_row)?)
      })
      .await?
      .ok_or(Error::NotFound { resource: Resource::Lead, id })?;

    raw.into_lead()
  }

  async fn delete_lead(&self, id: Uuid) -> Result<Lead> {
    let id_str = encode_uuid(id);

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw = select_one(&tx, LEAD_COLUMNS, "leads", "lead_id", &id_str, RawLead::from_row)?;
        if raw.is_some() {
          tx.execute("DELETE FROM leads WHERE lead_id = ?1", [&id_str])?;
        }
        tx.commit()?;
        Ok(raw)
      })
      .await?
      .ok_or(Error::NotFound { resource: Resource::Lead, id })?;

    raw.into_lead()
  }

  async fn list_leads(&self, query: &LeadQuery) -> Result<Vec<Lead>> {
    let mut conds: Vec<&'static str> = vec![];
    let mut values: Vec<Value> = vec![];

    if let Some(kind) = query.kind {
      conds.push("kind = ?");
      values.push(Value::from(kind.to_string()));
    }
    if let Some(is_read) = query.is_read {
      conds.push("is_read = ?");
      values.push(Value::from(is_read));
    }
    if let Some(property_id) = query.property_id {
      conds.push("property_id = ?");
      values.push(Value::from(encode_uuid(property_id)));
    }
    let (limit, offset) = page(query.limit, query.offset);
    values.push(Value::from(limit));
    values.push(Value::from(offset));

    let sql = format!(
      "SELECT {LEAD_COLUMNS} FROM leads {}
       ORDER BY created_at DESC, rowid DESC LIMIT ? OFFSET ?",
      where_clause(&conds)
    );

    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params_from_iter(values), RawLead::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLead::into_lead).collect()
  }

  // ── Agents ────────────────────────────────────────────────────────────────

  async fn create_agent(&self, input: NewAgent) -> Result<Agent> {
    let agent = Agent {
      id:         Uuid::new_v4(),
      name:       input.name,
      email:      input.email,
      phone:      input.phone,
      user_id:    input.user_id,
      created_at: now(),
    };

    let id_str   = encode_uuid(agent.id);
    let name     = agent.name.clone();
    let email    = agent.email.clone();
    let phone    = agent.phone.clone();
    let user_str = encode_uuid(agent.user_id);
    let at_str   = encode_dt(agent.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO agents (agent_id, name, email, phone, user_id, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          params![id_str, name, email, phone, user_str, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| {
        if is_unique_violation(&e) {
          Error::DuplicateEmail(agent.email.clone())
        } else {
          Error::Database(e)
        }
      })?;

    Ok(agent)
  }

  async fn get_agent(&self, id: Uuid) -> Result<Option<Agent>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| {
        Ok(select_one(conn, AGENT_COLUMNS, "agents", "agent_id", &id_str, RawAgent::from_row)?)
      })
      .await?;
    raw.map(RawAgent::into_agent).transpose()
  }

  async fn find_agent_by_email(&self, email: &str) -> Result<Option<Agent>> {
    let email = email.to_owned();
    let raw = self
      .conn
      .call(move |conn| {
        Ok(select_one(conn, AGENT_COLUMNS, "agents", "email", &email, RawAgent::from_row)?)
      })
      .await?;
    raw.map(RawAgent::into_agent).transpose()
  }

  async fn update_agent(&self, id: Uuid, patch: AgentPatch) -> Result<Agent> {
    let mut agent = self
      .get_agent(id)
      .await?
      .ok_or(Error::NotFound { resource: Resource::Agent, id })?;
    patch.apply(&mut agent);

    let id_str   = encode_uuid(agent.id);
    let name     = agent.name.clone();
    let email    = agent.email.clone();
    let phone    = agent.phone.clone();
    let user_str = encode_uuid(agent.user_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE agents SET name = ?2, email = ?3, phone = ?4, user_id = ?5
           WHERE agent_id = ?1",
          params![id_str, name, email, phone, user_str],
        )?)
      })
      .await
      .map_err(|e| {
        if is_unique_violation(&e) {
          Error::DuplicateEmail(agent.email.clone())
        } else {
          Error::Database(e)
        }
      })?;

    if changed == 0 {
      return Err(Error::NotFound { resource: Resource::Agent, id });
    }
    Ok(agent)
  }

  async fn delete_agent(&self, id: Uuid) -> Result<Agent> {
    let id_str = encode_uuid(id);

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw =
          select_one(&tx, AGENT_COLUMNS, "agents", "agent_id", &id_str, RawAgent::from_row)?;
        if raw.is_some() {
          // Owned properties are detached, not deleted.
          tx.execute("DELETE FROM agents WHERE agent_id = ?1", [&id_str])?;
        }
        tx.commit()?;
        Ok(raw)
      })
      .await?
      .ok_or(Error::NotFound { resource: Resource::Agent, id })?;

    raw.into_agent()
  }

  async fn list_agents(&self) -> Result<Vec<Agent>> {
    let raws = self
      .conn
      .call(|conn| {
        let sql = format!("SELECT {AGENT_COLUMNS} FROM agents ORDER BY name COLLATE NOCASE");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawAgent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAgent::into_agent).collect()
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn create_profile(&self, user_id: Uuid, role: Role) -> Result<Profile> {
    let user_str = encode_uuid(user_id);
    let role_str = role.to_string();
    let at_str   = encode_dt(now());

    let raw = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (user_id, role, created_at) VALUES (?1, ?2, ?3)
           ON CONFLICT (user_id) DO UPDATE SET role = excluded.role",
          params![user_str, role_str, at_str],
        )?;
        Ok(select_one(
          conn,
          PROFILE_COLUMNS,
          "profiles",
          "user_id",
          &user_str,
          RawProfile::from_row,
        )?)
      })
      .await?
      .ok_or(Error::NotFound { resource: Resource::Profile, id: user_id })?;

    raw.into_profile()
  }

  async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
    let user_str = encode_uuid(user_id);
    let raw = self
      .conn
      .call(move |conn| {
        Ok(select_one(
          conn,
          PROFILE_COLUMNS,
          "profiles",
          "user_id",
          &user_str,
          RawProfile::from_row,
        )?)
      })
      .await?;
    raw.map(RawProfile::into_profile).transpose()
  }

  async fn set_profile_role(&self, user_id: Uuid, role: Role) -> Result<Profile> {
    let user_str = encode_uuid(user_id);
    let role_str = role.to_string();

    let raw = self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE profiles SET role = ?2 WHERE user_id = ?1",
          params![user_str, role_str],
        )?;
        Ok(select_one(
          conn,
          PROFILE_COLUMNS,
          "profiles",
          "user_id",
          &user_str,
          RawProfile::from_row,
        )?)
      })
      .await?
      .ok_or(Error::NotFound { resource: Resource::Profile, id: user_id })?;

    tracing::info!(user = %user_id, %role, "profile role changed");
    raw.into_profile()
  }

  async fn list_profiles(&self, query: &ProfileQuery) -> Result<Vec<Profile>> {
    let mut conds: Vec<&'static str> = vec![];
    let mut values: Vec<Value> = vec![];

    if let Some(role) = query.role {
      conds.push("role = ?");
      values.push(Value::from(role.to_string()));
    }
    let (limit, offset) = page(query.limit, query.offset);
    values.push(Value::from(limit));
    values.push(Value::from(offset));

    let sql = format!(
      "SELECT {PROFILE_COLUMNS} FROM profiles {}
       ORDER BY created_at DESC, rowid DESC LIMIT ? OFFSET ?",
      where_clause(&conds)
    );

    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params_from_iter(values), RawProfile::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProfile::into_profile).collect()
  }
}
