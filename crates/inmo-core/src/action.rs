//! The closed catalogue of gated operations.
//!
//! An [`Action`] names what the caller asked for; validating its raw
//! [`Payload`] produces a typed [`Command`] the executor can apply.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::{
  actor::Role,
  agent::{AgentPatch, NewAgent},
  image::Upload,
  lead::{LeadQuery, NewLead},
  policy::{Operation, Resource},
  profile::ProfileQuery,
  property::{NewProperty, PropertyFlag, PropertyPatch},
  validate::{self, FieldError, MSG_FILE_REQUIRED, MSG_INVALID_ID, MSG_NOT_OBJECT, Validated},
};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Action {
  CreateLead,
  MarkLeadRead,
  DeleteLead,
  ListLeads,
  CreateProperty,
  UpdateProperty,
  DeleteProperty,
  #[serde(rename = "togglePropertyFeatured")]
  #[strum(serialize = "togglePropertyFeatured")]
  ToggleFeatured,
  #[serde(rename = "togglePropertyActive")]
  #[strum(serialize = "togglePropertyActive")]
  ToggleActive,
  #[serde(rename = "uploadPropertyImage")]
  #[strum(serialize = "uploadPropertyImage")]
  UploadImage,
  #[serde(rename = "deletePropertyImage")]
  #[strum(serialize = "deletePropertyImage")]
  DeleteImage,
  CreateAgent,
  UpdateAgent,
  DeleteAgent,
  SetProfileRole,
  ListProfiles,
}

impl Action {
  pub fn resource(self) -> Resource {
    match self {
      Action::CreateLead | Action::MarkLeadRead | Action::DeleteLead | Action::ListLeads => {
        Resource::Lead
      }
      Action::CreateProperty
      | Action::UpdateProperty
      | Action::DeleteProperty
      | Action::ToggleFeatured
      | Action::ToggleActive => Resource::Property,
      Action::UploadImage | Action::DeleteImage => Resource::Image,
      Action::CreateAgent | Action::UpdateAgent | Action::DeleteAgent => Resource::Agent,
      Action::SetProfileRole | Action::ListProfiles => Resource::Profile,
    }
  }

  pub fn operation(self) -> Operation {
    match self {
      Action::CreateLead
      | Action::CreateProperty
      | Action::UploadImage
      | Action::CreateAgent => Operation::Create,
      Action::ListLeads | Action::ListProfiles => Operation::Read,
      Action::MarkLeadRead
      | Action::UpdateProperty
      | Action::ToggleActive
      | Action::UpdateAgent
      | Action::SetProfileRole => Operation::Update,
      Action::DeleteLead | Action::DeleteProperty | Action::DeleteImage | Action::DeleteAgent => {
        Operation::Delete
      }
      Action::ToggleFeatured => Operation::ToggleFeature,
    }
  }

  /// Whether this action addresses an existing row through a resource id.
  pub fn takes_id(self) -> bool {
    matches!(
      self,
      Action::MarkLeadRead
        | Action::DeleteLead
        | Action::UpdateProperty
        | Action::DeleteProperty
        | Action::ToggleFeatured
        | Action::ToggleActive
        | Action::UploadImage
        | Action::DeleteImage
        | Action::UpdateAgent
        | Action::DeleteAgent
    )
  }

  /// Run the input schema for this action.
  ///
  /// `id` is the addressed row (the parent property for uploads). A missing
  /// id is reported on field `id` alongside any payload errors.
  pub fn validate(self, payload: Payload, id: Option<Uuid>) -> Validated<Command> {
    let mut errors = Vec::new();
    if self.takes_id() && id.is_none() {
      errors.push(FieldError::new("id", MSG_INVALID_ID));
    }
    // A nil id never escapes: its absence is already recorded above.
    let id = id.unwrap_or_default();

    let command = match payload {
      Payload::Upload(upload) => self.validate_upload(upload, id),
      Payload::Json(raw) => self.validate_json(&raw, id),
    };

    match command {
      Ok(command) if errors.is_empty() => Ok(command),
      Ok(_) => Err(errors),
      Err(more) => {
        errors.extend(more);
        Err(errors)
      }
    }
  }

  fn validate_upload(self, upload: Upload, property_id: Uuid) -> Validated<Command> {
    match self {
      Action::UploadImage => validate::image_upload(&upload)
        .map(|()| Command::UploadImage { property_id, upload }),
      _ => Err(vec![FieldError::new("", MSG_NOT_OBJECT)]),
    }
  }

  fn validate_json(self, raw: &Value, id: Uuid) -> Validated<Command> {
    match self {
      Action::CreateLead => validate::lead_create(raw).map(Command::CreateLead),
      Action::MarkLeadRead => validate::lead_read_flag(raw)
        .map(|is_read| Command::MarkLeadRead { id, is_read }),
      Action::DeleteLead => validate::no_body(raw).map(|()| Command::DeleteLead(id)),
      Action::ListLeads => validate::lead_query(raw).map(Command::ListLeads),

      Action::CreateProperty => validate::property_create(raw).map(Command::CreateProperty),
      Action::UpdateProperty => validate::property_patch(raw)
        .map(|patch| Command::UpdateProperty { id, patch }),
      Action::DeleteProperty => validate::no_body(raw).map(|()| Command::DeleteProperty(id)),
      Action::ToggleFeatured => validate::flag_current(raw).map(|current| Command::ToggleFlag {
        id,
        flag: PropertyFlag::Featured,
        current,
      }),
      Action::ToggleActive => validate::flag_current(raw).map(|current| Command::ToggleFlag {
        id,
        flag: PropertyFlag::Active,
        current,
      }),

      Action::UploadImage => Err(vec![FieldError::new("file", MSG_FILE_REQUIRED)]),
      Action::DeleteImage => validate::no_body(raw).map(|()| Command::DeleteImage(id)),

      Action::CreateAgent => validate::agent_create(raw).map(Command::CreateAgent),
      Action::UpdateAgent => validate::agent_patch(raw)
        .map(|patch| Command::UpdateAgent { id, patch }),
      Action::DeleteAgent => validate::no_body(raw).map(|()| Command::DeleteAgent(id)),

      Action::SetProfileRole => validate::profile_role(raw)
        .map(|(user_id, role)| Command::SetProfileRole { user_id, role }),
      Action::ListProfiles => validate::profile_query(raw).map(Command::ListProfiles),
    }
  }
}

/// Raw, untrusted input for an action.
#[derive(Debug, Clone)]
pub enum Payload {
  Json(Value),
  Upload(Upload),
}

impl Payload {
  /// An empty JSON object, for actions whose only input is the id.
  pub fn empty() -> Self { Payload::Json(Value::Object(Default::default())) }
}

/// A validated, typed request ready to be authorized and applied.
#[derive(Debug, Clone)]
pub enum Command {
  CreateLead(NewLead),
  MarkLeadRead { id: Uuid, is_read: bool },
  DeleteLead(Uuid),
  ListLeads(LeadQuery),
  CreateProperty(NewProperty),
  UpdateProperty { id: Uuid, patch: PropertyPatch },
  DeleteProperty(Uuid),
  ToggleFlag { id: Uuid, flag: PropertyFlag, current: bool },
  UploadImage { property_id: Uuid, upload: Upload },
  DeleteImage(Uuid),
  CreateAgent(NewAgent),
  UpdateAgent { id: Uuid, patch: AgentPatch },
  DeleteAgent(Uuid),
  SetProfileRole { user_id: Uuid, role: Role },
  ListProfiles(ProfileQuery),
}
