//! The `ResourceStore` trait: the repository over every resource
//! collection.
//!
//! The trait is implemented by storage backends (e.g. `inmo-store-sqlite`).
//! Higher layers depend on this abstraction, not on any concrete backend.
//! Every call is request-scoped; there is no ambient transaction.

use std::future::Future;

use uuid::Uuid;

use crate::{
  actor::Role,
  agent::{Agent, AgentPatch, NewAgent},
  image::{Image, NewImage},
  lead::{Lead, LeadQuery, NewLead},
  profile::{Profile, ProfileQuery},
  property::{NewProperty, Property, PropertyFlag, PropertyPatch, PropertyQuery},
};

/// Abstraction over a marketplace storage backend.
///
/// Backend errors must classify into [`crate::Error`] (`NotFound`,
/// `Conflict`, `Unavailable`) so the executor can report them distinctly.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ResourceStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Properties ────────────────────────────────────────────────────────

  fn create_property(
    &self,
    input: NewProperty,
  ) -> impl Future<Output = Result<Property, Self::Error>> + Send + '_;

  /// Retrieve a property with its images. Returns `None` if not found.
  fn get_property(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Property>, Self::Error>> + Send + '_;

  /// Apply a partial update. Fails with not-found if `id` has no row.
  fn update_property(
    &self,
    id: Uuid,
    patch: PropertyPatch,
  ) -> impl Future<Output = Result<Property, Self::Error>> + Send + '_;

  /// Write one boolean flag.
  fn set_property_flag(
    &self,
    id: Uuid,
    flag: PropertyFlag,
    value: bool,
  ) -> impl Future<Output = Result<Property, Self::Error>> + Send + '_;

  /// Delete a property, cascading to its images and detaching its leads.
  /// Returns the removed row, images included, so stored files can be
  /// cleaned up.
  fn delete_property(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Property, Self::Error>> + Send + '_;

  fn list_properties<'a>(
    &'a self,
    query: &'a PropertyQuery,
  ) -> impl Future<Output = Result<Vec<Property>, Self::Error>> + Send + 'a;

  /// Email of the agent owning `property_id` (`None` when unassigned).
  /// Fails with not-found if the property does not exist.
  fn owner_email(
    &self,
    property_id: Uuid,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  // ── Images ────────────────────────────────────────────────────────────

  /// Fails with not-found if the parent property does not exist.
  fn create_image(
    &self,
    input: NewImage,
  ) -> impl Future<Output = Result<Image, Self::Error>> + Send + '_;

  fn get_image(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Image>, Self::Error>> + Send + '_;

  fn delete_image(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Image, Self::Error>> + Send + '_;

  fn list_images(
    &self,
    property_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Image>, Self::Error>> + Send + '_;

  // ── Leads ─────────────────────────────────────────────────────────────

  /// Fails with not-found if `input.property_id` references no property.
  fn create_lead(
    &self,
    input: NewLead,
  ) -> impl Future<Output = Result<Lead, Self::Error>> + Send + '_;

  fn get_lead(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Lead>, Self::Error>> + Send + '_;

  fn set_lead_read(
    &self,
    id: Uuid,
    is_read: bool,
  ) -> impl Future<Output = Result<Lead, Self::Error>> + Send + '_;

  fn delete_lead(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Lead, Self::Error>> + Send + '_;

  fn list_leads<'a>(
    &'a self,
    query: &'a LeadQuery,
  ) -> impl Future<Output = Result<Vec<Lead>, Self::Error>> + Send + 'a;

  // ── Agents ────────────────────────────────────────────────────────────

  /// Fails with conflict if the email is already taken.
  fn create_agent(
    &self,
    input: NewAgent,
  ) -> impl Future<Output = Result<Agent, Self::Error>> + Send + '_;

  fn get_agent(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Agent>, Self::Error>> + Send + '_;

  fn find_agent_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Agent>, Self::Error>> + Send + 'a;

  /// Fails with conflict if a changed email is already taken.
  fn update_agent(
    &self,
    id: Uuid,
    patch: AgentPatch,
  ) -> impl Future<Output = Result<Agent, Self::Error>> + Send + '_;

  /// Delete an agent, detaching (not deleting) its properties.
  fn delete_agent(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Agent, Self::Error>> + Send + '_;

  fn list_agents(
    &self,
  ) -> impl Future<Output = Result<Vec<Agent>, Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Create the profile for `user_id`, or overwrite its role if present.
  fn create_profile(
    &self,
    user_id: Uuid,
    role: Role,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  fn get_profile(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Fails with not-found if no profile exists for `user_id`.
  fn set_profile_role(
    &self,
    user_id: Uuid,
    role: Role,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  fn list_profiles<'a>(
    &'a self,
    query: &'a ProfileQuery,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + 'a;
}
