//! End-to-end executor scenarios over the SQLite store.

use std::sync::Arc;

use chrono::Duration;
use inmo_core::{
  Error,
  action::{Action, Payload},
  actor::Role,
  agent::{Agent, AgentPatch, NewAgent},
  cache::{InvalidateError, Invalidator, StaleViews, View},
  executor::{Executor, FailureKind},
  image::{Image, NewImage, Upload},
  lead::{Lead, LeadQuery, NewLead},
  objects::MemoryObjects,
  policy::DenyReason,
  profile::{Profile, ProfileQuery},
  property::{NewProperty, Property, PropertyFlag, PropertyPatch, PropertyQuery},
  store::ResourceStore,
};
use inmo_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use uuid::Uuid;

type Exec = Executor<SqliteStore, SqliteStore, MemoryObjects>;

struct Harness {
  exec:    Exec,
  store:   Arc<SqliteStore>,
  objects: Arc<MemoryObjects>,
  views:   StaleViews,
}

async fn harness_with(objects: MemoryObjects) -> Harness {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let objects = Arc::new(objects);
  let views = StaleViews::new();
  let exec = Executor::new(
    Arc::clone(&store),
    Arc::clone(&store),
    Arc::clone(&objects),
    Arc::new(views.clone()),
  );
  Harness { exec, store, objects, views }
}

async fn harness() -> Harness { harness_with(MemoryObjects::new("http://media.test")).await }

async fn login(store: &SqliteStore, email: &str, role: Role) -> String {
  let identity = store.register_identity(email).await.unwrap();
  store.create_profile(identity.user_id, role).await.unwrap();
  store
    .issue_session(identity.user_id, Duration::hours(1))
    .await
    .unwrap()
}

fn json(value: Value) -> Payload { Payload::Json(value) }

fn listing() -> Value {
  json!({
    "title": "Departamento céntrico",
    "operation": "alquiler",
    "type": "departamento",
    "city": "San Fernando del Valle de Catamarca",
    "priceArs": 350000,
    "rooms": 2,
  })
}

fn png() -> Payload {
  Payload::Upload(Upload {
    content_type: "image/png".into(),
    bytes:        vec![0x89, b'P', b'N', b'G'].into(),
    alt:          None,
  })
}

fn id_of(data: &Value) -> Uuid { data["id"].as_str().unwrap().parse().unwrap() }

async fn agent_record(store: &SqliteStore, email: &str) -> Uuid {
  store
    .create_agent(NewAgent {
      name:    "Carla Díaz".into(),
      email:   email.into(),
      phone:   None,
      user_id: Uuid::new_v4(),
    })
    .await
    .unwrap()
    .id
}

// ── Anonymous callers ────────────────────────────────────────────────────────

#[tokio::test]
async fn anonymous_caller_may_only_create_leads() {
  let h = harness().await;
  let id = Uuid::new_v4();

  let lead = h
    .exec
    .execute(
      Action::CreateLead,
      json(json!({
        "kind": "contacto",
        "name": "Ana Lopez",
        "email": "ana@example.com",
        "message": "Quiero info sobre la propiedad",
      })),
      None,
      None,
    )
    .await
    .unwrap();
  assert_eq!(lead["isRead"], false);

  let attempts: Vec<(Action, Payload, Option<Uuid>)> = vec![
    (Action::ListLeads, Payload::empty(), None),
    (Action::MarkLeadRead, json(json!({ "isRead": true })), Some(id)),
    (Action::DeleteLead, Payload::empty(), Some(id)),
    (Action::CreateProperty, json(listing()), None),
    (Action::UpdateProperty, json(json!({ "title": "Nuevo título" })), Some(id)),
    (Action::DeleteProperty, Payload::empty(), Some(id)),
    (Action::ToggleFeatured, json(json!({ "current": false })), Some(id)),
    (Action::ToggleActive, json(json!({ "current": true })), Some(id)),
    (Action::UploadImage, png(), Some(id)),
    (Action::DeleteImage, Payload::empty(), Some(id)),
    (
      Action::CreateAgent,
      json(json!({ "name": "Carla", "email": "c@x.io", "userId": id })),
      None,
    ),
    (Action::UpdateAgent, json(json!({ "name": "Carla" })), Some(id)),
    (Action::DeleteAgent, Payload::empty(), Some(id)),
    (Action::SetProfileRole, json(json!({ "userId": id, "role": "admin" })), None),
    (Action::ListProfiles, Payload::empty(), None),
  ];

  for (action, payload, target) in attempts {
    let failure = h.exec.execute(action, payload, None, target).await.unwrap_err();
    assert_eq!(failure.kind, FailureKind::Authorization, "{action}");
    assert_eq!(failure.reason, Some(DenyReason::Unauthenticated), "{action}");
    assert_eq!(failure.message, "No autorizado", "{action}");
  }
}

#[tokio::test]
async fn unknown_and_expired_sessions_are_anonymous() {
  let h = harness().await;
  let identity = h.store.register_identity("root@inmo.example").await.unwrap();
  h.store.create_profile(identity.user_id, Role::Admin).await.unwrap();
  let expired = h
    .store
    .issue_session(identity.user_id, Duration::seconds(-1))
    .await
    .unwrap();

  for token in ["no-such-token", expired.as_str()] {
    let failure = h
      .exec
      .execute(Action::CreateProperty, json(listing()), Some(token), None)
      .await
      .unwrap_err();
    assert_eq!(failure.reason, Some(DenyReason::Unauthenticated));
  }
}

#[tokio::test]
async fn invalid_input_is_rejected_before_authorization() {
  let h = harness().await;
  let failure = h
    .exec
    .execute(Action::CreateProperty, json(json!({ "title": "ab" })), None, None)
    .await
    .unwrap_err();

  assert_eq!(failure.kind, FailureKind::Validation);
  assert_eq!(failure.message, "Datos inválidos");
  assert!(failure.details.iter().any(|d| d.field == "title"));
}

// ── Roles and ownership ──────────────────────────────────────────────────────

#[tokio::test]
async fn identity_without_profile_acts_as_plain_user() {
  let h = harness().await;
  let identity = h.store.register_identity("visitor@example.com").await.unwrap();
  let token = h
    .store
    .issue_session(identity.user_id, Duration::hours(1))
    .await
    .unwrap();

  let failure = h
    .exec
    .execute(Action::CreateProperty, json(listing()), Some(&token), None)
    .await
    .unwrap_err();
  assert_eq!(failure.reason, Some(DenyReason::InsufficientRole));
  assert_eq!(failure.message, "No tienes permisos para realizar esta acción");
}

#[tokio::test]
async fn agent_cannot_touch_a_listing_owned_by_another_agent() {
  let h = harness().await;
  let admin = login(&h.store, "root@inmo.example", Role::Admin).await;
  let intruder = login(&h.store, "other@inmo.example", Role::Agent).await;
  let owner = agent_record(&h.store, "carla@inmo.example").await;

  let mut body = listing();
  body["agentId"] = json!(owner);
  let created = h
    .exec
    .execute(Action::CreateProperty, json(body), Some(&admin), None)
    .await
    .unwrap();
  let id = id_of(&created);

  let update = h
    .exec
    .execute(
      Action::UpdateProperty,
      json(json!({ "title": "Precio rebajado" })),
      Some(&intruder),
      Some(id),
    )
    .await
    .unwrap_err();
  assert_eq!(update.reason, Some(DenyReason::NotOwner));
  assert_eq!(update.message, "Solo puedes editar tus propias propiedades");

  let delete = h
    .exec
    .execute(Action::DeleteProperty, Payload::empty(), Some(&intruder), Some(id))
    .await
    .unwrap_err();
  assert_eq!(delete.reason, Some(DenyReason::NotOwner));
  assert_eq!(delete.message, "Solo puedes eliminar tus propias propiedades");

  assert!(h.store.get_property(id).await.unwrap().is_some());
}

#[tokio::test]
async fn agent_listing_is_linked_and_editable_by_its_owner() {
  let h = harness().await;
  let token = login(&h.store, "carla@inmo.example", Role::Agent).await;
  let agent_id = agent_record(&h.store, "carla@inmo.example").await;

  let created = h
    .exec
    .execute(Action::CreateProperty, json(listing()), Some(&token), None)
    .await
    .unwrap();
  assert_eq!(created["agentId"], json!(agent_id));
  let id = id_of(&created);

  let updated = h
    .exec
    .execute(
      Action::UpdateProperty,
      json(json!({ "title": "Departamento con balcón", "rooms": null })),
      Some(&token),
      Some(id),
    )
    .await
    .unwrap();
  assert_eq!(updated["title"], "Departamento con balcón");
  assert_eq!(updated["rooms"], Value::Null);

  let uploaded = h
    .exec
    .execute(Action::UploadImage, png(), Some(&token), Some(id))
    .await
    .unwrap();
  assert_eq!(uploaded["propertyId"], json!(id));
}

#[tokio::test]
async fn only_admins_toggle_featured() {
  let h = harness().await;
  let token = login(&h.store, "carla@inmo.example", Role::Agent).await;
  agent_record(&h.store, "carla@inmo.example").await;
  let created = h
    .exec
    .execute(Action::CreateProperty, json(listing()), Some(&token), None)
    .await
    .unwrap();

  let failure = h
    .exec
    .execute(
      Action::ToggleFeatured,
      json(json!({ "current": false })),
      Some(&token),
      Some(id_of(&created)),
    )
    .await
    .unwrap_err();
  assert_eq!(failure.kind, FailureKind::Authorization);
}

// ── Mutations ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn created_listing_reads_back_with_defaults() {
  let h = harness().await;
  let admin = login(&h.store, "root@inmo.example", Role::Admin).await;
  let created = h
    .exec
    .execute(Action::CreateProperty, json(listing()), Some(&admin), None)
    .await
    .unwrap();

  let stored = h.store.get_property(id_of(&created)).await.unwrap().unwrap();
  assert_eq!(stored.title, "Departamento céntrico");
  assert_eq!(stored.province, "Catamarca");
  assert_eq!(stored.price_ars, Some(350000.0));
  assert!(stored.active);
  assert!(!stored.featured);
}

#[tokio::test]
async fn toggling_featured_twice_restores_the_flag() {
  let h = harness().await;
  let admin = login(&h.store, "root@inmo.example", Role::Admin).await;
  let created = h
    .exec
    .execute(Action::CreateProperty, json(listing()), Some(&admin), None)
    .await
    .unwrap();
  let id = id_of(&created);

  let mut current = created["featured"].as_bool().unwrap();
  for _ in 0..2 {
    let toggled = h
      .exec
      .execute(
        Action::ToggleFeatured,
        json(json!({ "current": current })),
        Some(&admin),
        Some(id),
      )
      .await
      .unwrap();
    assert_eq!(toggled["featured"], !current);
    current = !current;
  }
  assert!(!h.store.get_property(id).await.unwrap().unwrap().featured);
}

#[tokio::test]
async fn deleting_an_agent_detaches_its_listings() {
  let h = harness().await;
  let admin = login(&h.store, "root@inmo.example", Role::Admin).await;
  let agent_id = agent_record(&h.store, "carla@inmo.example").await;

  let mut body = listing();
  body["agentId"] = json!(agent_id);
  let created = h
    .exec
    .execute(Action::CreateProperty, json(body), Some(&admin), None)
    .await
    .unwrap();

  h.exec
    .execute(Action::DeleteAgent, Payload::empty(), Some(&admin), Some(agent_id))
    .await
    .unwrap();

  let stored = h.store.get_property(id_of(&created)).await.unwrap().unwrap();
  assert_eq!(stored.agent_id, None);
}

#[tokio::test]
async fn deleting_a_listing_removes_its_files() {
  let h = harness().await;
  let admin = login(&h.store, "root@inmo.example", Role::Admin).await;
  let created = h
    .exec
    .execute(Action::CreateProperty, json(listing()), Some(&admin), None)
    .await
    .unwrap();
  let id = id_of(&created);

  for _ in 0..2 {
    h.exec
      .execute(Action::UploadImage, png(), Some(&admin), Some(id))
      .await
      .unwrap();
  }
  assert_eq!(h.objects.keys().len(), 2);

  let deleted = h
    .exec
    .execute(Action::DeleteProperty, Payload::empty(), Some(&admin), Some(id))
    .await
    .unwrap();
  assert_eq!(deleted["images"].as_array().unwrap().len(), 2);
  assert!(h.objects.keys().is_empty());
  assert!(h.store.get_property(id).await.unwrap().is_none());
}

#[tokio::test]
async fn setting_role_of_missing_profile_is_not_found() {
  let h = harness().await;
  let admin = login(&h.store, "root@inmo.example", Role::Admin).await;
  let failure = h
    .exec
    .execute(
      Action::SetProfileRole,
      json(json!({ "userId": Uuid::new_v4(), "role": "agent" })),
      Some(&admin),
      None,
    )
    .await
    .unwrap_err();

  assert_eq!(failure.kind, FailureKind::NotFound);
  assert_eq!(failure.message, "Usuario no encontrado");
}

#[tokio::test]
async fn upload_to_missing_listing_stores_nothing() {
  let h = harness().await;
  let admin = login(&h.store, "root@inmo.example", Role::Admin).await;
  let failure = h
    .exec
    .execute(Action::UploadImage, png(), Some(&admin), Some(Uuid::new_v4()))
    .await
    .unwrap_err();

  assert_eq!(failure.kind, FailureKind::NotFound);
  assert!(h.objects.keys().is_empty());
}

#[tokio::test]
async fn failed_object_write_leaves_no_image_record() {
  let h = harness_with(MemoryObjects::failing()).await;
  let admin = login(&h.store, "root@inmo.example", Role::Admin).await;
  let created = h
    .exec
    .execute(Action::CreateProperty, json(listing()), Some(&admin), None)
    .await
    .unwrap();
  let id = id_of(&created);

  let failure = h
    .exec
    .execute(Action::UploadImage, png(), Some(&admin), Some(id))
    .await
    .unwrap_err();
  assert_eq!(failure.kind, FailureKind::Store);
  assert_eq!(failure.message, "Error interno del servidor");
  assert!(h.store.list_images(id).await.unwrap().is_empty());
}

/// SQLite store whose image-record writes always fail.
struct NoImageRecords(Arc<SqliteStore>);

impl ResourceStore for NoImageRecords {
  type Error = Error;

  async fn create_property(&self, input: NewProperty) -> Result<Property, Error> {
    Ok(self.0.create_property(input).await?)
  }

  async fn get_property(&self, id: Uuid) -> Result<Option<Property>, Error> {
    Ok(self.0.get_property(id).await?)
  }

  async fn update_property(&self, id: Uuid, patch: PropertyPatch) -> Result<Property, Error> {
    Ok(self.0.update_property(id, patch).await?)
  }

  async fn set_property_flag(
    &self,
    id: Uuid,
    flag: PropertyFlag,
    value: bool,
  ) -> Result<Property, Error> {
    Ok(self.0.set_property_flag(id, flag, value).await?)
  }

  async fn delete_property(&self, id: Uuid) -> Result<Property, Error> {
    Ok(self.0.delete_property(id).await?)
  }

  async fn list_properties(&self, query: &PropertyQuery) -> Result<Vec<Property>, Error> {
    Ok(self.0.list_properties(query).await?)
  }

  async fn owner_email(&self, property_id: Uuid) -> Result<Option<String>, Error> {
    Ok(self.0.owner_email(property_id).await?)
  }

  async fn create_image(&self, _input: NewImage) -> Result<Image, Error> {
    Err(Error::Unavailable("disk I/O error".into()))
  }

  async fn get_image(&self, id: Uuid) -> Result<Option<Image>, Error> {
    Ok(self.0.get_image(id).await?)
  }

  async fn delete_image(&self, id: Uuid) -> Result<Image, Error> {
    Ok(self.0.delete_image(id).await?)
  }

  async fn list_images(&self, property_id: Uuid) -> Result<Vec<Image>, Error> {
    Ok(self.0.list_images(property_id).await?)
  }

  async fn create_lead(&self, input: NewLead) -> Result<Lead, Error> {
    Ok(self.0.create_lead(input).await?)
  }

  async fn get_lead(&self, id: Uuid) -> Result<Option<Lead>, Error> {
    Ok(self.0.get_lead(id).await?)
  }

  async fn set_lead_read(&self, id: Uuid, is_read: bool) -> Result<Lead, Error> {
    Ok(self.0.set_lead_read(id, is_read).await?)
  }

  async fn delete_lead(&self, id: Uuid) -> Result<Lead, Error> {
    Ok(self.0.delete_lead(id).await?)
  }

  async fn list_leads(&self, query: &LeadQuery) -> Result<Vec<Lead>, Error> {
    Ok(self.0.list_leads(query).await?)
  }

  async fn create_agent(&self, input: NewAgent) -> Result<Agent, Error> {
    Ok(self.0.create_agent(input).await?)
  }

  async fn get_agent(&self, id: Uuid) -> Result<Option<Agent>, Error> {
    Ok(self.0.get_agent(id).await?)
  }

  async fn find_agent_by_email(&self, email: &str) -> Result<Option<Agent>, Error> {
    Ok(self.0.find_agent_by_email(email).await?)
  }

  async fn update_agent(&self, id: Uuid, patch: AgentPatch) -> Result<Agent, Error> {
    Ok(self.0.update_agent(id, patch).await?)
  }

  async fn delete_agent(&self, id: Uuid) -> Result<Agent, Error> {
    Ok(self.0.delete_agent(id).await?)
  }

  async fn list_agents(&self) -> Result<Vec<Agent>, Error> { Ok(self.0.list_agents().await?) }

  async fn create_profile(&self, user_id: Uuid, role: Role) -> Result<Profile, Error> {
    Ok(self.0.create_profile(user_id, role).await?)
  }

  async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, Error> {
    Ok(self.0.get_profile(user_id).await?)
  }

  async fn set_profile_role(&self, user_id: Uuid, role: Role) -> Result<Profile, Error> {
    Ok(self.0.set_profile_role(user_id, role).await?)
  }

  async fn list_profiles(&self, query: &ProfileQuery) -> Result<Vec<Profile>, Error> {
    Ok(self.0.list_profiles(query).await?)
  }
}

#[tokio::test]
async fn failed_image_record_removes_the_stored_file() {
  let sqlite = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let objects = Arc::new(MemoryObjects::new("http://media.test"));
  let exec = Executor::new(
    Arc::new(NoImageRecords(Arc::clone(&sqlite))),
    Arc::clone(&sqlite),
    Arc::clone(&objects),
    Arc::new(StaleViews::new()),
  );
  let admin = login(&sqlite, "root@inmo.example", Role::Admin).await;
  let created = exec
    .execute(Action::CreateProperty, json(listing()), Some(&admin), None)
    .await
    .unwrap();
  let id = id_of(&created);

  let failure = exec
    .execute(Action::UploadImage, png(), Some(&admin), Some(id))
    .await
    .unwrap_err();
  assert_eq!(failure.kind, FailureKind::Store);
  assert!(objects.keys().is_empty());
  assert!(sqlite.list_images(id).await.unwrap().is_empty());
}

// ── Cache invalidation ───────────────────────────────────────────────────────

#[tokio::test]
async fn successful_mutations_invalidate_their_views() {
  let h = harness().await;
  let admin = login(&h.store, "root@inmo.example", Role::Admin).await;
  let created = h
    .exec
    .execute(Action::CreateProperty, json(listing()), Some(&admin), None)
    .await
    .unwrap();
  let id = id_of(&created);

  assert!(h.views.is_stale(&View::AdminDashboard));
  assert!(h.views.is_stale(&View::PublicListing));
  assert!(h.views.is_stale(&View::PropertyDetail(id)));
}

#[tokio::test]
async fn denied_mutations_invalidate_nothing() {
  let h = harness().await;
  h.exec
    .execute(Action::CreateProperty, json(listing()), None, None)
    .await
    .unwrap_err();
  assert!(h.views.snapshot().is_empty());
}

struct BrokenCache;

impl Invalidator for BrokenCache {
  fn invalidate(&self, _views: &[View]) -> Result<(), InvalidateError> {
    Err(InvalidateError("renderer offline".into()))
  }
}

#[tokio::test]
async fn failing_invalidation_keeps_the_mutation() {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let exec = Executor::new(
    Arc::clone(&store),
    Arc::clone(&store),
    Arc::new(MemoryObjects::default()),
    Arc::new(BrokenCache),
  );

  let lead = exec
    .execute(
      Action::CreateLead,
      json(json!({
        "kind": "tasacion",
        "name": "Beto",
        "phone": "383 4123456",
        "message": "Necesito tasar un terreno",
      })),
      None,
      None,
    )
    .await
    .unwrap();
  assert!(store.get_lead(id_of(&lead)).await.unwrap().is_some());
}
