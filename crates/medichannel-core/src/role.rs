//! Roles, role assignments and the capabilities each role unlocks.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::actor::ActorId;

// ─── Role ────────────────────────────────────────────────────────────────────

/// The closed set of permission levels.
///
/// [`Role::Patient`] is the default: an actor with no assignment is treated
/// as a patient.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  #[default]
  Patient,
  Attendant,
  Manager,
}

impl Role {
  /// Human-readable label shown next to the role badge.
  pub fn label(self) -> &'static str {
    match self {
      Self::Patient => "Patient",
      Self::Attendant => "Attendant",
      Self::Manager => "Manager",
    }
  }

  /// One-line summary of what the role may do.
  pub fn summary(self) -> &'static str {
    match self {
      Self::Manager => {
        "Full access to the system, including user management and metrics"
      }
      Self::Attendant => "Can reply to messages and view the attendance history",
      Self::Patient => "Can send messages and view their own history",
    }
  }

  pub fn capabilities(self) -> &'static [Capability] {
    use Capability::*;
    match self {
      Self::Manager => &[
        ManageUsers,
        ViewMetrics,
        ConfigureChannels,
        ReplyToConversations,
        ViewAllHistory,
        SendMessages,
        ViewOwnHistory,
      ],
      Self::Attendant => &[ReplyToConversations, ViewAllHistory],
      Self::Patient => &[SendMessages, ViewOwnHistory],
    }
  }

  pub fn can(self, capability: Capability) -> bool {
    self.capabilities().contains(&capability)
  }
}

// ─── Capability ──────────────────────────────────────────────────────────────

/// A single thing a role is allowed to see or do in the console.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Capability {
  ManageUsers,
  ViewMetrics,
  ConfigureChannels,
  ReplyToConversations,
  ViewAllHistory,
  SendMessages,
  ViewOwnHistory,
}

// ─── RoleAssignment ──────────────────────────────────────────────────────────

/// A record binding an actor to a role.
///
/// Assignments are never updated in place; reassignment replaces them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
  pub assignment_id: Uuid,
  pub actor_id:      ActorId,
  pub role:          Role,
}

impl RoleAssignment {
  pub fn new(actor_id: ActorId, role: Role) -> Self {
    Self { assignment_id: Uuid::new_v4(), actor_id, role }
  }
}
