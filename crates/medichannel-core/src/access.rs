//! The access guard for the management view.
//!
//! Only actors holding the manager role are admitted. Admission yields an
//! [`Admitted`] token; the roster and reassignment operations require it, so
//! they cannot be reached without passing the guard first.

use crate::{
  Error, Result,
  actor::ActorId,
  role::Role,
  store::RoleStore,
};

/// Proof that an actor passed [`admit_manager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admitted {
  actor: ActorId,
}

impl Admitted {
  pub fn actor(&self) -> &ActorId { &self.actor }
}

/// Check that `actor` holds the manager role.
///
/// - No actor: [`Error::Unauthenticated`] (client redirects to sign-in).
/// - No manager assignment, or the lookup itself fails:
///   [`Error::Forbidden`] (client shows a denial and goes home).
pub async fn admit_manager<S>(store: &S, actor: Option<&ActorId>) -> Result<Admitted>
where
  S: RoleStore,
{
  let Some(actor) = actor else {
    tracing::warn!("management access attempted without a session");
    return Err(Error::Unauthenticated);
  };

  match store.has_role(actor, Role::Manager).await {
    Ok(true) => Ok(Admitted { actor: actor.clone() }),
    Ok(false) => {
      tracing::warn!(actor = %actor, "management access denied: not a manager");
      Err(Error::Forbidden(actor.clone()))
    }
    Err(e) => {
      tracing::error!(actor = %actor, error = %e, "role lookup failed; denying access");
      Err(Error::Forbidden(actor.clone()))
    }
  }
}
