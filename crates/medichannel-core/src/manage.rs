//! Role management: the flow behind the user-management view.
//!
//! Entering the view runs the access guard and then exactly one roster load.
//! Reassigning a role replaces the target's assignments in a single store
//! transaction and reloads the whole roster.

use std::sync::Arc;

use serde::Serialize;

use crate::{
  Error, Result,
  access::{Admitted, admit_manager},
  actor::ActorId,
  notice::Notice,
  role::{Role, RoleAssignment},
  roster::{RosterEntry, load_roster},
  store::RoleStore,
};

/// The state handed to an admitted manager on entry.
#[derive(Debug, Clone)]
pub struct Entered {
  pub admitted: Admitted,
  pub roster:   Vec<RosterEntry>,
}

/// Outcome of a successful reassignment.
#[derive(Debug, Clone, Serialize)]
pub struct Reassigned {
  pub assignment: RoleAssignment,
  /// Confirmation first; a load-failure notice follows if the reload failed.
  pub notices:    Vec<Notice>,
  pub roster:     Vec<RosterEntry>,
}

/// Drives the management view against a [`RoleStore`].
///
/// Cloning is cheap: the store is reference-counted.
pub struct RoleManager<S> {
  store: Arc<S>,
}

impl<S> Clone for RoleManager<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: RoleStore> RoleManager<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }

  /// Run the access guard for `actor`.
  pub async fn admit(&self, actor: Option<&ActorId>) -> Result<Admitted> {
    admit_manager(self.store.as_ref(), actor).await
  }

  /// Guard, then load the roster once.
  pub async fn enter(&self, actor: Option<&ActorId>) -> Result<Entered> {
    let admitted = self.admit(actor).await?;
    let roster = self.roster(&admitted).await?;
    Ok(Entered { admitted, roster })
  }

  /// Full re-fetch of the roster.
  pub async fn roster(&self, admitted: &Admitted) -> Result<Vec<RosterEntry>> {
    load_roster(self.store.as_ref(), admitted).await
  }

  /// Give `target` exactly one assignment, `role`.
  ///
  /// The store swaps the assignments atomically, so a failure leaves the
  /// target's previous role intact.
  pub async fn reassign(
    &self,
    admitted: &Admitted,
    target: &ActorId,
    role: Role,
  ) -> Result<Reassigned> {
    if target == admitted.actor() {
      return Err(Error::SelfReassignment);
    }

    // A failed lookup is reported as a failed update.
    let exists = self
      .store
      .get_profile(target)
      .await
      .map_err(|e| {
        tracing::error!(target = %target, error = %e, "reassignment target lookup failed");
        Error::write(e)
      })?
      .is_some();
    if !exists {
      return Err(Error::UnknownActor(target.clone()));
    }

    let assignment = self
      .store
      .replace_role(target, role)
      .await
      .map_err(|e| {
        tracing::error!(target = %target, %role, error = %e, "role reassignment failed");
        Error::write(e)
      })?;

    tracing::info!(
      by = %admitted.actor(),
      target = %target,
      %role,
      "role reassigned"
    );

    let mut notices = vec![Notice::role_updated()];
    let roster = match self.roster(admitted).await {
      Ok(roster) => roster,
      Err(e) => {
        tracing::error!(error = %e, "roster reload after reassignment failed");
        notices.push(e.notice());
        Vec::new()
      }
    };

    Ok(Reassigned { assignment, notices, roster })
  }
}
