//! The roster: every actor paired with their role assignments.
//!
//! The roster is never stored. It is rebuilt from the full profile and
//! assignment collections on every load.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  access::Admitted,
  actor::{ActorId, Profile},
  notice::Notice,
  role::{Role, RoleAssignment},
  store::RoleStore,
};

// ─── Entries ─────────────────────────────────────────────────────────────────

/// A profile with its assignments, in store order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
  pub profile: Profile,
  pub roles:   Vec<RoleAssignment>,
}

impl RosterEntry {
  /// The first assignment wins; no assignment means patient.
  pub fn current_role(&self) -> Role {
    self.roles.first().map(|a| a.role).unwrap_or_default()
  }

  /// Flatten into the row shape the management view renders.
  pub fn row(&self, viewer: &ActorId) -> RosterRow {
    RosterRow {
      actor_id:     self.profile.actor_id.clone(),
      full_name:    self.profile.full_name.clone(),
      avatar_url:   self.profile.avatar_url.clone(),
      created_at:   self.profile.created_at,
      roles:        self.roles.clone(),
      current_role: self.current_role(),
      is_self:      &self.profile.actor_id == viewer,
    }
  }
}

/// Render-ready roster line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow {
  pub actor_id:     ActorId,
  pub full_name:    String,
  pub avatar_url:   Option<String>,
  pub created_at:   DateTime<Utc>,
  pub roles:        Vec<RoleAssignment>,
  pub current_role: Role,
  /// Set on the viewer's own row; clients hide the role selector there.
  pub is_self:      bool,
}

// ─── Merge ───────────────────────────────────────────────────────────────────

/// Attach each profile's assignments, keeping profile order and the store
/// order of assignments within each profile.
///
/// Assignments whose actor has no profile are dropped.
pub fn merge(profiles: Vec<Profile>, roles: Vec<RoleAssignment>) -> Vec<RosterEntry> {
  let mut by_actor: HashMap<ActorId, Vec<RoleAssignment>> = HashMap::new();
  for assignment in roles {
    by_actor
      .entry(assignment.actor_id.clone())
      .or_default()
      .push(assignment);
  }

  profiles
    .into_iter()
    .map(|profile| {
      let roles = by_actor.remove(&profile.actor_id).unwrap_or_default();
      RosterEntry { profile, roles }
    })
    .collect()
}

// ─── Load ────────────────────────────────────────────────────────────────────

/// Fetch both collections in full and merge them.
///
/// Requires an [`Admitted`] token from the access guard.
pub async fn load_roster<S>(store: &S, _admitted: &Admitted) -> Result<Vec<RosterEntry>>
where
  S: RoleStore,
{
  let profiles = store.list_profiles().await.map_err(Error::fetch)?;
  let roles = store.list_roles().await.map_err(Error::fetch)?;
  Ok(merge(profiles, roles))
}

// ─── State ───────────────────────────────────────────────────────────────────

/// Identifies one in-flight load; see [`RosterState::begin_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Client-side roster state.
///
/// Only the most recent load may write the entries. A completion carrying an
/// older ticket arrived late and is discarded.
#[derive(Debug, Default)]
pub struct RosterState {
  entries:    Vec<RosterEntry>,
  loading:    bool,
  generation: u64,
  notice:     Option<Notice>,
}

impl RosterState {
  pub fn entries(&self) -> &[RosterEntry] { &self.entries }

  pub fn is_loading(&self) -> bool { self.loading }

  pub fn notice(&self) -> Option<&Notice> { self.notice.as_ref() }

  pub fn begin_load(&mut self) -> LoadTicket {
    self.generation += 1;
    self.loading = true;
    LoadTicket(self.generation)
  }

  /// Apply the outcome of a load. Returns `false` if the ticket was stale
  /// and nothing changed.
  pub fn finish_load(
    &mut self,
    ticket: LoadTicket,
    outcome: Result<Vec<RosterEntry>>,
  ) -> bool {
    if ticket.0 != self.generation {
      tracing::debug!(ticket = ticket.0, current = self.generation, "dropping stale roster load");
      return false;
    }

    match outcome {
      Ok(entries) => {
        self.entries = entries;
        self.notice = None;
      }
      Err(e) => {
        tracing::error!(error = %e, "roster load failed");
        self.entries.clear();
        self.notice = Some(e.notice());
      }
    }
    self.loading = false;
    true
  }
}
