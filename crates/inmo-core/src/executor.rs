//! The Mutation Executor.
//!
//! Every gated operation runs the same short-circuiting sequence:
//!
//! 1. validate the payload (no storage access on failure);
//! 2. resolve the calling actor;
//! 3. for agents, read the ownership datum the gate needs;
//! 4. authorize;
//! 5. apply through the repository;
//! 6. invalidate affected views, logging rather than failing;
//! 7. return the serialized entity.
//!
//! The executor is the only place lower-layer errors become a [`Failure`].
//! Steps 3 and 5 are separate repository calls and are not transactional.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use strum::Display;
use uuid::Uuid;

use crate::{
  action::{Action, Command, Payload},
  actor::{Actor, Role},
  cache::{Invalidator, View, views_for},
  error::{Error, Result},
  image::{Image, NewImage, Upload, storage_key},
  objects::ObjectStorage,
  policy::{Decision, Denial, DenyReason, Resource, Target, authorize},
  property::PropertyFlag,
  session::{SessionProvider, resolve_actor},
  store::ResourceStore,
  validate::FieldError,
};

pub const MSG_INVALID_INPUT: &str = "Datos inválidos";
pub const MSG_INTERNAL: &str = "Error interno del servidor";

// ─── Failures ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
  Validation,
  Authorization,
  NotFound,
  Conflict,
  Store,
}

/// A normalized failure, ready to be wrapped in an
/// [`Envelope`](crate::envelope::Envelope).
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
  pub kind:    FailureKind,
  pub message: String,
  pub details: Vec<FieldError>,
  /// Machine reason for authorization failures.
  pub reason:  Option<DenyReason>,
}

impl Failure {
  pub fn validation(details: Vec<FieldError>) -> Self {
    Self {
      kind: FailureKind::Validation,
      message: MSG_INVALID_INPUT.to_owned(),
      details,
      reason: None,
    }
  }

  pub fn denied(denial: Denial) -> Self {
    Self {
      kind:    FailureKind::Authorization,
      message: denial.message.to_owned(),
      details: Vec::new(),
      reason:  Some(denial.reason),
    }
  }

  fn simple(kind: FailureKind, message: impl Into<String>) -> Self {
    Self { kind, message: message.into(), details: Vec::new(), reason: None }
  }
}

impl From<Error> for Failure {
  fn from(err: Error) -> Self {
    match err {
      Error::NotFound { resource, .. } => {
        Self::simple(FailureKind::NotFound, resource.not_found_message())
      }
      Error::Conflict(message) => Self::simple(FailureKind::Conflict, message),
      Error::Unavailable(source) => {
        tracing::error!(error = %source, "store unavailable");
        Self::simple(FailureKind::Store, MSG_INTERNAL)
      }
    }
  }
}

/// `Ok` carries the serialized entity (or page of entities).
pub type Outcome = std::result::Result<Value, Failure>;

// ─── Executor ────────────────────────────────────────────────────────────────

fn classify<E: Into<Error>>(err: E) -> Error { err.into() }

fn unavailable<E: std::error::Error + Send + Sync + 'static>(err: E) -> Error {
  Error::Unavailable(Box::new(err))
}

fn reply<T: Serialize>(value: &T, views: Vec<View>) -> Result<(Value, Vec<View>)> {
  let data = serde_json::to_value(value).map_err(unavailable)?;
  Ok((data, views))
}

/// Orchestrates one gated operation per call. Holds no per-request state,
/// so a single instance serves concurrent requests.
pub struct Executor<S, P, O> {
  store:    Arc<S>,
  sessions: Arc<P>,
  objects:  Arc<O>,
  cache:    Arc<dyn Invalidator>,
}

impl<S, P, O> Clone for Executor<S, P, O> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      sessions: Arc::clone(&self.sessions),
      objects:  Arc::clone(&self.objects),
      cache:    Arc::clone(&self.cache),
    }
  }
}

impl<S, P, O> Executor<S, P, O>
where
  S: ResourceStore,
  P: SessionProvider,
  O: ObjectStorage,
{
  pub fn new(
    store: Arc<S>,
    sessions: Arc<P>,
    objects: Arc<O>,
    cache: Arc<dyn Invalidator>,
  ) -> Self {
    Self { store, sessions, objects, cache }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  /// Run `action` on behalf of the holder of `session`.
  ///
  /// `id` addresses the target row for update, delete, toggle and upload
  /// actions.
  pub async fn execute(
    &self,
    action: Action,
    payload: Payload,
    session: Option<&str>,
    id: Option<Uuid>,
  ) -> Outcome {
    let command = action.validate(payload, id).map_err(|details| {
      tracing::debug!(%action, errors = details.len(), "rejected invalid input");
      Failure::validation(details)
    })?;

    let actor = resolve_actor(&*self.sessions, &*self.store, session).await?;

    let target = match actor.role {
      Role::Agent => self.target(&command).await?,
      _ => Target::Unspecified,
    };

    if let Decision::Deny(denial) =
      authorize(&actor, action.operation(), action.resource(), &target)
    {
      tracing::info!(
        %action,
        role = %actor.role,
        reason = %denial.reason,
        "operation denied"
      );
      return Err(Failure::denied(denial));
    }

    let (data, views) = self.apply(&actor, command).await?;

    if !views.is_empty() {
      if let Err(e) = self.cache.invalidate(&views) {
        tracing::warn!(%action, error = %e, "cache invalidation failed");
      }
    }

    tracing::info!(%action, role = %actor.role, "operation applied");
    Ok(data)
  }

  /// The ownership datum for commands the policy checks against a property.
  async fn target(&self, command: &Command) -> Result<Target> {
    let property_id = match command {
      Command::UpdateProperty { id, .. }
      | Command::DeleteProperty(id)
      | Command::ToggleFlag { id, flag: PropertyFlag::Active, .. } => *id,
      Command::UploadImage { property_id, .. } => *property_id,
      Command::DeleteImage(id) => {
        self
          .store
          .get_image(*id)
          .await
          .map_err(classify)?
          .ok_or_else(|| Error::not_found(Resource::Image, id))?
          .property_id
      }
      _ => return Ok(Target::Unspecified),
    };

    let owner_email = self
      .store
      .owner_email(property_id)
      .await
      .map_err(classify)?;
    Ok(Target::Owned { owner_email })
  }

  async fn apply(&self, actor: &Actor, command: Command) -> Result<(Value, Vec<View>)> {
    let store = &*self.store;
    match command {
      // ── Leads ───────────────────────────────────────────────────────────
      Command::CreateLead(input) => {
        let lead = store.create_lead(input).await.map_err(classify)?;
        reply(&lead, views_for(Resource::Lead, None))
      }
      Command::MarkLeadRead { id, is_read } => {
        let lead = store.set_lead_read(id, is_read).await.map_err(classify)?;
        reply(&lead, views_for(Resource::Lead, None))
      }
      Command::DeleteLead(id) => {
        let lead = store.delete_lead(id).await.map_err(classify)?;
        reply(&lead, views_for(Resource::Lead, None))
      }
      Command::ListLeads(query) => {
        let leads = store.list_leads(&query).await.map_err(classify)?;
        reply(&leads, Vec::new())
      }

      // ── Properties ──────────────────────────────────────────────────────
      Command::CreateProperty(mut input) => {
        let link_agent = input.agent_id.is_none() && actor.role == Role::Agent;
        if let (true, Some(email)) = (link_agent, actor.email.as_deref()) {
          input.agent_id = store
            .find_agent_by_email(email)
            .await
            .map_err(classify)?
            .map(|agent| agent.id);
        }
        let property = store.create_property(input).await.map_err(classify)?;
        reply(&property, views_for(Resource::Property, Some(property.id)))
      }
      Command::UpdateProperty { id, patch } => {
        let property = store.update_property(id, patch).await.map_err(classify)?;
        reply(&property, views_for(Resource::Property, Some(id)))
      }
      Command::DeleteProperty(id) => {
        let property = store.delete_property(id).await.map_err(classify)?;
        for image in &property.images {
          self.discard(&image.storage_key).await;
        }
        reply(&property, views_for(Resource::Property, Some(id)))
      }
      Command::ToggleFlag { id, flag, current } => {
        let property = store
          .set_property_flag(id, flag, !current)
          .await
          .map_err(classify)?;
        reply(&property, views_for(Resource::Property, Some(id)))
      }

      // ── Images ──────────────────────────────────────────────────────────
      Command::UploadImage { property_id, upload } => {
        let image = self.upload(property_id, upload).await?;
        reply(&image, views_for(Resource::Image, Some(property_id)))
      }
      Command::DeleteImage(id) => {
        let image = store.delete_image(id).await.map_err(classify)?;
        self.discard(&image.storage_key).await;
        reply(&image, views_for(Resource::Image, Some(image.property_id)))
      }

      // ── Agents ──────────────────────────────────────────────────────────
      Command::CreateAgent(input) => {
        let agent = store.create_agent(input).await.map_err(classify)?;
        reply(&agent, views_for(Resource::Agent, None))
      }
      Command::UpdateAgent { id, patch } => {
        let agent = store.update_agent(id, patch).await.map_err(classify)?;
        reply(&agent, views_for(Resource::Agent, None))
      }
      Command::DeleteAgent(id) => {
        let agent = store.delete_agent(id).await.map_err(classify)?;
        reply(&agent, views_for(Resource::Agent, None))
      }

      // ── Profiles ────────────────────────────────────────────────────────
      Command::SetProfileRole { user_id, role } => {
        let profile = store.set_profile_role(user_id, role).await.map_err(classify)?;
        reply(&profile, views_for(Resource::Profile, None))
      }
      Command::ListProfiles(query) => {
        let profiles = store.list_profiles(&query).await.map_err(classify)?;
        reply(&profiles, Vec::new())
      }
    }
  }

  /// Store the file, then record it. A failed record write removes the
  /// stored object again.
  async fn upload(&self, property_id: Uuid, upload: Upload) -> Result<Image> {
    let Upload { content_type, bytes, alt } = upload;

    if self
      .store
      .get_property(property_id)
      .await
      .map_err(classify)?
      .is_none()
    {
      return Err(Error::not_found(Resource::Property, property_id));
    }

    let key = storage_key(property_id, &content_type);
    let url = self
      .objects
      .put(&key, &content_type, bytes)
      .await
      .map_err(unavailable)?;

    let record = NewImage {
      property_id,
      url,
      alt,
      storage_key: key.clone(),
    };
    match self.store.create_image(record).await {
      Ok(image) => Ok(image),
      Err(e) => {
        self.discard(&key).await;
        Err(classify(e))
      }
    }
  }

  /// Best-effort removal of a stored object.
  async fn discard(&self, key: &str) {
    if key.is_empty() {
      return;
    }
    if let Err(e) = self.objects.remove(key).await {
      tracing::warn!(key, error = %e, "failed to remove stored object");
    }
  }
}
