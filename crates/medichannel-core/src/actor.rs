//! Actors: anyone who signs in to the console (patient, attendant, manager).
//!
//! Profiles are created by the identity flow at signup and are read-only for
//! everything else in the system.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque actor identifier, issued at signup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  /// Mint a fresh identifier for a new signup.
  pub fn generate() -> Self { Self(Uuid::new_v4().hyphenated().to_string()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ActorId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for ActorId {
  fn from(s: &str) -> Self { Self::new(s) }
}

/// Public profile of an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub actor_id:   ActorId,
  pub full_name:  String,
  pub avatar_url: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl Profile {
  /// Upper-cased first letter of the display name, used as an avatar
  /// placeholder when no avatar is set.
  pub fn initial(&self) -> Option<char> {
    self.full_name.chars().next().and_then(|c| c.to_uppercase().next())
  }
}

/// Input to [`crate::store::IdentityStore::sign_up`].
///
/// The password arrives here already hashed; no plaintext crosses the store
/// boundary.
#[derive(Debug, Clone)]
pub struct NewActor {
  pub username:      String,
  pub password_hash: String,
  pub full_name:     String,
  pub avatar_url:    Option<String>,
}

/// Login credentials bound to an actor.
#[derive(Debug, Clone)]
pub struct Credential {
  pub actor_id:      ActorId,
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// A signed-in session. Only the digest of the bearer token is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  pub token_digest: String,
  pub actor_id:     ActorId,
  pub created_at:   DateTime<Utc>,
}
