//! Actor resolution from an opaque session token.

use std::future::Future;

use crate::{
  actor::{Actor, Identity, Role},
  store::ResourceStore,
};

/// The external authentication provider, reduced to the one question this
/// subsystem asks of it.
pub trait SessionProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The identity behind `token`, or `None` for an unknown or expired
  /// session.
  fn identity<'a>(
    &'a self,
    token: &'a str,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + 'a;
}

/// Resolve the calling actor.
///
/// A missing, unknown or expired session, and a failing provider, all
/// resolve to an anonymous actor; the gate is the single place that rejects
/// anonymous access. An identity without a profile row gets [`Role::User`].
/// Only a failure reading the profile is reported.
pub async fn resolve_actor<P, S>(
  sessions: &P,
  store: &S,
  token: Option<&str>,
) -> crate::Result<Actor>
where
  P: SessionProvider,
  S: ResourceStore,
{
  let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
    return Ok(Actor::anonymous());
  };

  let identity = match sessions.identity(token).await {
    Ok(Some(identity)) => identity,
    Ok(None) => return Ok(Actor::anonymous()),
    Err(e) => {
      tracing::warn!(error = %e, "session provider failed; treating caller as anonymous");
      return Ok(Actor::anonymous());
    }
  };

  let role = store
    .get_profile(identity.user_id)
    .await
    .map_err(Into::<crate::Error>::into)?
    .map(|profile| profile.role)
    .unwrap_or(Role::User);

  Ok(Actor::from_identity(identity, role))
}
