//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`)
//! so that lexical order matches chronological order. UUIDs are stored as
//! hyphenated lowercase strings.

use std::str::FromStr as _;

use chrono::{DateTime, SecondsFormat, Utc};
use medichannel_core::{
  actor::{ActorId, Credential, Profile, Session},
  role::{Role, RoleAssignment},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Role ─────────────────────────────────────────────────────────────────────

pub fn encode_role(r: Role) -> &'static str { r.into() }

pub fn decode_role(s: &str) -> Result<Role> {
  Role::from_str(s).map_err(|_| Error::UnknownRole(s.to_owned()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `profiles` row.
pub struct RawProfile {
  pub actor_id:   String,
  pub full_name:  String,
  pub avatar_url: Option<String>,
  pub created_at: String,
}

impl RawProfile {
  pub const COLUMNS: &'static str = "actor_id, full_name, avatar_url, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      actor_id:   row.get(0)?,
      full_name:  row.get(1)?,
      avatar_url: row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      actor_id:   ActorId::new(self.actor_id),
      full_name:  self.full_name,
      avatar_url: self.avatar_url,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `user_roles` row.
pub struct RawAssignment {
  pub assignment_id: String,
  pub actor_id:      String,
  pub role:          String,
}

impl RawAssignment {
  pub const COLUMNS: &'static str = "assignment_id, actor_id, role";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      assignment_id: row.get(0)?,
      actor_id:      row.get(1)?,
      role:          row.get(2)?,
    })
  }

  pub fn into_assignment(self) -> Result<RoleAssignment> {
    Ok(RoleAssignment {
      assignment_id: decode_uuid(&self.assignment_id)?,
      actor_id:      ActorId::new(self.actor_id),
      role:          decode_role(&self.role)?,
    })
  }
}

/// Raw strings read directly from a `credentials` row.
pub struct RawCredential {
  pub actor_id:      String,
  pub username:      String,
  pub password_hash: String,
}

impl RawCredential {
  pub fn into_credential(self) -> Credential {
    Credential {
      actor_id:      ActorId::new(self.actor_id),
      username:      self.username,
      password_hash: self.password_hash,
    }
  }
}

/// Raw strings read directly from a `sessions` row.
pub struct RawSession {
  pub token_digest: String,
  pub actor_id:     String,
  pub created_at:   String,
}

impl RawSession {
  pub fn into_session(self) -> Result<Session> {
    Ok(Session {
      token_digest: self.token_digest,
      actor_id:     ActorId::new(self.actor_id),
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}
