//! The authorization gate.
//!
//! [`authorize`] is a pure function over an ordered, fixed policy table. The
//! first rule whose role, resource and operation all match decides. The only
//! data fact a rule may need, the email of the agent owning a property, is
//! supplied by the caller as a [`Target`].

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::actor::{Actor, Role};

// ─── Vocabulary ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
  Create,
  Read,
  Update,
  Delete,
  ToggleFeature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Resource {
  Property,
  Lead,
  Agent,
  Profile,
  Image,
}

impl Resource {
  /// User-facing message for a missing row of this resource.
  pub fn not_found_message(self) -> &'static str {
    match self {
      Resource::Property => "Propiedad no encontrada",
      Resource::Lead => "Consulta no encontrada",
      Resource::Agent => "Agente no encontrado",
      Resource::Profile => "Usuario no encontrado",
      Resource::Image => "Imagen no encontrada",
    }
  }
}

/// Ownership datum fed to the gate for rules that need it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Target {
  /// No ownership information was looked up.
  #[default]
  Unspecified,
  /// The resource belongs to a property whose agent has this email, or to
  /// no agent at all.
  Owned { owner_email: Option<String> },
}

// ─── Decisions ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
  #[strum(serialize = "not owner")]
  NotOwner,
  #[strum(serialize = "insufficient role")]
  InsufficientRole,
  #[strum(serialize = "unauthenticated")]
  Unauthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
  pub reason:  DenyReason,
  /// Human-readable explanation suitable for showing to the caller.
  pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
  Allow,
  Deny(Denial),
}

impl Decision {
  pub fn is_allowed(&self) -> bool { matches!(self, Self::Allow) }

  fn deny(reason: DenyReason, operation: Operation) -> Self {
    let message = match (reason, operation) {
      (DenyReason::NotOwner, Operation::Delete) => {
        "Solo puedes eliminar tus propias propiedades"
      }
      (DenyReason::NotOwner, _) => "Solo puedes editar tus propias propiedades",
      (DenyReason::InsufficientRole, _) => {
        "No tienes permisos para realizar esta acción"
      }
      (DenyReason::Unauthenticated, _) => "No autorizado",
    };
    Self::Deny(Denial { reason, message })
  }
}

// ─── Policy table ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Effect {
  Allow,
  /// Allow iff the target's owner email equals the actor's email.
  AllowOwner,
  Deny(DenyReason),
}

/// `None` in a selector matches every value.
#[derive(Debug)]
struct Rule {
  roles:      Option<&'static [Role]>,
  resources:  Option<&'static [Resource]>,
  operations: Option<&'static [Operation]>,
  effect:     Effect,
}

impl Rule {
  fn matches(&self, role: Role, resource: Resource, operation: Operation) -> bool {
    self.roles.is_none_or(|r| r.contains(&role))
      && self.resources.is_none_or(|r| r.contains(&resource))
      && self.operations.is_none_or(|o| o.contains(&operation))
  }
}

const POLICY: &[Rule] = &[
  // Admins may do anything.
  Rule {
    roles:      Some(&[Role::Admin]),
    resources:  None,
    operations: None,
    effect:     Effect::Allow,
  },
  // Agents edit and delete only the properties they own.
  Rule {
    roles:      Some(&[Role::Agent]),
    resources:  Some(&[Resource::Property]),
    operations: Some(&[Operation::Update, Operation::Delete]),
    effect:     Effect::AllowOwner,
  },
  // Gallery management follows the parent property's ownership.
  Rule {
    roles:      Some(&[Role::Agent]),
    resources:  Some(&[Resource::Image]),
    operations: Some(&[Operation::Create, Operation::Delete]),
    effect:     Effect::AllowOwner,
  },
  Rule {
    roles:      Some(&[Role::Agent]),
    resources:  Some(&[Resource::Property]),
    operations: Some(&[Operation::Create]),
    effect:     Effect::Allow,
  },
  // Lead creation must work for unauthenticated visitors.
  Rule {
    roles:      None,
    resources:  Some(&[Resource::Lead]),
    operations: Some(&[Operation::Create]),
    effect:     Effect::Allow,
  },
  // Agents work the lead inbox.
  Rule {
    roles:      Some(&[Role::Agent]),
    resources:  Some(&[Resource::Lead]),
    operations: Some(&[Operation::Read, Operation::Update, Operation::Delete]),
    effect:     Effect::Allow,
  },
  // Agent and profile records are admin-only.
  Rule {
    roles:      Some(&[Role::Agent, Role::User]),
    resources:  Some(&[Resource::Agent, Resource::Profile]),
    operations: None,
    effect:     Effect::Deny(DenyReason::InsufficientRole),
  },
];

/// Decide whether `actor` may perform `operation` on `resource`.
///
/// Never fails: absence of permission is an ordinary [`Decision::Deny`].
pub fn authorize(
  actor: &Actor,
  operation: Operation,
  resource: Resource,
  target: &Target,
) -> Decision {
  let rule = POLICY
    .iter()
    .find(|rule| rule.matches(actor.role, resource, operation));

  match rule.map(|r| r.effect) {
    Some(Effect::Allow) => Decision::Allow,
    Some(Effect::AllowOwner) => match (target, actor.email.as_deref()) {
      (Target::Owned { owner_email: Some(owner) }, Some(email)) if owner == email => {
        Decision::Allow
      }
      _ => Decision::deny(DenyReason::NotOwner, operation),
    },
    Some(Effect::Deny(reason)) => Decision::deny(reason, operation),
    None if actor.is_anonymous() => {
      Decision::deny(DenyReason::Unauthenticated, operation)
    }
    None => Decision::deny(DenyReason::InsufficientRole, operation),
  }
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;
  use crate::actor::Identity;

  const ALL_OPERATIONS: [Operation; 5] = [
    Operation::Create,
    Operation::Read,
    Operation::Update,
    Operation::Delete,
    Operation::ToggleFeature,
  ];

  const ALL_RESOURCES: [Resource; 5] = [
    Resource::Property,
    Resource::Lead,
    Resource::Agent,
    Resource::Profile,
    Resource::Image,
  ];

  fn actor(role: Role, email: &str) -> Actor {
    Actor::from_identity(
      Identity { user_id: Uuid::new_v4(), email: email.into() },
      role,
    )
  }

  fn owned_by(email: &str) -> Target {
    Target::Owned { owner_email: Some(email.into()) }
  }

  fn reason(d: Decision) -> Option<DenyReason> {
    match d {
      Decision::Allow => None,
      Decision::Deny(denial) => Some(denial.reason),
    }
  }

  #[test]
  fn admin_is_allowed_everything() {
    let admin = actor(Role::Admin, "root@example.com");
    for resource in ALL_RESOURCES {
      for op in ALL_OPERATIONS {
        assert!(
          authorize(&admin, op, resource, &Target::Unspecified).is_allowed(),
          "{op} on {resource}"
        );
      }
    }
  }

  #[test]
  fn anonymous_may_only_create_leads() {
    let anon = Actor::anonymous();
    for resource in ALL_RESOURCES {
      for op in ALL_OPERATIONS {
        let decision = authorize(&anon, op, resource, &Target::Unspecified);
        if resource == Resource::Lead && op == Operation::Create {
          assert!(decision.is_allowed());
        } else {
          assert_eq!(reason(decision), Some(DenyReason::Unauthenticated));
        }
      }
    }
  }

  #[test]
  fn agent_owner_may_update_and_delete() {
    let agent = actor(Role::Agent, "ana@example.com");
    let target = owned_by("ana@example.com");
    for op in [Operation::Update, Operation::Delete] {
      assert!(authorize(&agent, op, Resource::Property, &target).is_allowed());
    }
  }

  #[test]
  fn agent_non_owner_is_denied_with_operation_specific_message() {
    let agent = actor(Role::Agent, "ana@example.com");
    let target = owned_by("beto@example.com");

    let Decision::Deny(denial) =
      authorize(&agent, Operation::Delete, Resource::Property, &target)
    else {
      panic!("expected deny");
    };
    assert_eq!(denial.reason, DenyReason::NotOwner);
    assert_eq!(denial.reason.to_string(), "not owner");
    assert_eq!(denial.message, "Solo puedes eliminar tus propias propiedades");

    let Decision::Deny(denial) =
      authorize(&agent, Operation::Update, Resource::Property, &target)
    else {
      panic!("expected deny");
    };
    assert_eq!(denial.message, "Solo puedes editar tus propias propiedades");
  }

  #[test]
  fn unassigned_or_unknown_ownership_denies_agents() {
    let agent = actor(Role::Agent, "ana@example.com");
    let unassigned = Target::Owned { owner_email: None };
    assert_eq!(
      reason(authorize(&agent, Operation::Update, Resource::Property, &unassigned)),
      Some(DenyReason::NotOwner)
    );
    assert_eq!(
      reason(authorize(
        &agent,
        Operation::Delete,
        Resource::Property,
        &Target::Unspecified
      )),
      Some(DenyReason::NotOwner)
    );
  }

  #[test]
  fn ownership_compares_emails_exactly() {
    let agent = actor(Role::Agent, "Ana@Example.com");
    let target = owned_by("ana@example.com");
    assert!(!authorize(&agent, Operation::Update, Resource::Property, &target).is_allowed());
  }

  #[test]
  fn agent_may_create_properties_and_manage_own_gallery() {
    let agent = actor(Role::Agent, "ana@example.com");
    assert!(
      authorize(&agent, Operation::Create, Resource::Property, &Target::Unspecified)
        .is_allowed()
    );
    assert!(
      authorize(&agent, Operation::Create, Resource::Image, &owned_by("ana@example.com"))
        .is_allowed()
    );
    assert_eq!(
      reason(authorize(
        &agent,
        Operation::Create,
        Resource::Image,
        &owned_by("otro@example.com")
      )),
      Some(DenyReason::NotOwner)
    );
  }

  #[test]
  fn agent_may_not_toggle_featured() {
    let agent = actor(Role::Agent, "ana@example.com");
    assert_eq!(
      reason(authorize(
        &agent,
        Operation::ToggleFeature,
        Resource::Property,
        &owned_by("ana@example.com")
      )),
      Some(DenyReason::InsufficientRole)
    );
  }

  #[test]
  fn agent_works_leads() {
    let agent = actor(Role::Agent, "ana@example.com");
    for op in [Operation::Create, Operation::Read, Operation::Update, Operation::Delete] {
      assert!(authorize(&agent, op, Resource::Lead, &Target::Unspecified).is_allowed());
    }
  }

  #[test]
  fn agent_and_profile_records_are_admin_only() {
    for role in [Role::Agent, Role::User] {
      let caller = actor(role, "someone@example.com");
      for resource in [Resource::Agent, Resource::Profile] {
        for op in ALL_OPERATIONS {
          assert_eq!(
            reason(authorize(&caller, op, resource, &Target::Unspecified)),
            Some(DenyReason::InsufficientRole)
          );
        }
      }
    }
  }

  #[test]
  fn users_may_only_create_leads() {
    let user = actor(Role::User, "visitante@example.com");
    assert!(authorize(&user, Operation::Create, Resource::Lead, &Target::Unspecified).is_allowed());
    assert_eq!(
      reason(authorize(&user, Operation::Delete, Resource::Lead, &Target::Unspecified)),
      Some(DenyReason::InsufficientRole)
    );
    assert_eq!(
      reason(authorize(
        &user,
        Operation::Update,
        Resource::Property,
        &owned_by("visitante@example.com")
      )),
      Some(DenyReason::InsufficientRole)
    );
  }
}
