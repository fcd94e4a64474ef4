//! [`SqliteStore`]: the SQLite implementation of [`RoleStore`] and
//! [`IdentityStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use medichannel_core::{
  actor::{ActorId, Credential, NewActor, Profile, Session},
  role::{Role, RoleAssignment},
  store::{IdentityStore, RoleStore},
};

use crate::{
  encode::{
    RawAssignment, RawCredential, RawProfile, RawSession, encode_dt, encode_role,
    encode_uuid,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A MediChannel store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a fully-built [`Profile`] with no credential.
  ///
  /// Used for importing actors from another identity system.
  pub async fn insert_profile(&self, profile: &Profile) -> Result<()> {
    let actor_id   = profile.actor_id.as_str().to_owned();
    let full_name  = profile.full_name.clone();
    let avatar_url = profile.avatar_url.clone();
    let created_at = encode_dt(profile.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (actor_id, full_name, avatar_url, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![actor_id, full_name, avatar_url, created_at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  #[cfg(test)]
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── RoleStore impl ──────────────────────────────────────────────────────────

impl RoleStore for SqliteStore {
  type Error = Error;

  // ── Lookups ───────────────────────────────────────────────────────────────

  async fn has_role(&self, actor: &ActorId, role: Role) -> Result<bool> {
    let actor_str = actor.as_str().to_owned();
    let role_str  = encode_role(role);

    let found = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT 1 FROM user_roles WHERE actor_id = ?1 AND role = ?2 LIMIT 1",
            rusqlite::params![actor_str, role_str],
            |_| Ok(()),
          )
          .optional()?
          .is_some())
      })
      .await?;
    Ok(found)
  }

  async fn get_profile(&self, actor: &ActorId) -> Result<Option<Profile>> {
    let actor_str = actor.as_str().to_owned();

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {} FROM profiles WHERE actor_id = ?1", RawProfile::COLUMNS),
            rusqlite::params![actor_str],
            RawProfile::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn list_profiles(&self) -> Result<Vec<Profile>> {
    let raws: Vec<RawProfile> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM profiles ORDER BY created_at DESC",
          RawProfile::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawProfile::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProfile::into_profile).collect()
  }

  async fn list_roles(&self) -> Result<Vec<RoleAssignment>> {
    let raws: Vec<RawAssignment> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM user_roles ORDER BY rowid",
          RawAssignment::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawAssignment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAssignment::into_assignment).collect()
  }

  async fn roles_for(&self, actor: &ActorId) -> Result<Vec<RoleAssignment>> {
    let actor_str = actor.as_str().to_owned();

    let raws: Vec<RawAssignment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM user_roles WHERE actor_id = ?1 ORDER BY rowid",
          RawAssignment::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![actor_str], RawAssignment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAssignment::into_assignment).collect()
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn delete_roles(&self, actor: &ActorId) -> Result<usize> {
    let actor_str = actor.as_str().to_owned();

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM user_roles WHERE actor_id = ?1",
          rusqlite::params![actor_str],
        )?)
      })
      .await?;
    Ok(removed)
  }

  async fn insert_role(&self, actor: &ActorId, role: Role) -> Result<RoleAssignment> {
    let assignment = RoleAssignment::new(actor.clone(), role);

    let id_str    = encode_uuid(assignment.assignment_id);
    let actor_str = actor.as_str().to_owned();
    let role_str  = encode_role(role);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO user_roles (assignment_id, actor_id, role) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, actor_str, role_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(assignment)
  }

  async fn replace_role(&self, actor: &ActorId, role: Role) -> Result<RoleAssignment> {
    let assignment = RoleAssignment::new(actor.clone(), role);

    let id_str    = encode_uuid(assignment.assignment_id);
    let actor_str = actor.as_str().to_owned();
    let role_str  = encode_role(role);

    let removed = self
      .conn
      .call(move |conn| {
        // Dropping `tx` without commit rolls both statements back.
        let tx = conn.transaction()?;
        let removed = tx.execute(
          "DELETE FROM user_roles WHERE actor_id = ?1",
          rusqlite::params![actor_str],
        )?;
        tx.execute(
          "INSERT INTO user_roles (assignment_id, actor_id, role) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, actor_str, role_str],
        )?;
        tx.commit()?;
        Ok(removed)
      })
      .await?;

    tracing::debug!(actor = %actor, %role, removed, "replaced role assignments");
    Ok(assignment)
  }
}

// ─── IdentityStore impl ──────────────────────────────────────────────────────

impl IdentityStore for SqliteStore {
  async fn sign_up(&self, input: NewActor) -> Result<Option<Profile>> {
    let profile = Profile {
      actor_id:   ActorId::generate(),
      full_name:  input.full_name,
      avatar_url: input.avatar_url,
      created_at: Utc::now(),
    };

    let actor_str     = profile.actor_id.as_str().to_owned();
    let full_name     = profile.full_name.clone();
    let avatar_url    = profile.avatar_url.clone();
    let created_str   = encode_dt(profile.created_at);
    let username      = input.username.clone();
    let password_hash = input.password_hash;

    let created = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let taken = tx
          .query_row(
            "SELECT 1 FROM credentials WHERE username = ?1",
            rusqlite::params![username],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(false);
        }
        tx.execute(
          "INSERT INTO profiles (actor_id, full_name, avatar_url, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![actor_str, full_name, avatar_url, created_str],
        )?;
        tx.execute(
          "INSERT INTO credentials (actor_id, username, password_hash)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![actor_str, username, password_hash],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(created.then_some(profile))
  }

  async fn credential(&self, username: &str) -> Result<Option<Credential>> {
    let username = username.to_owned();

    let raw: Option<RawCredential> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT actor_id, username, password_hash FROM credentials WHERE username = ?1",
            rusqlite::params![username],
            |row| {
              Ok(RawCredential {
                actor_id:      row.get(0)?,
                username:      row.get(1)?,
                password_hash: row.get(2)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    Ok(raw.map(RawCredential::into_credential))
  }

  async fn create_session(&self, token_digest: String, actor: ActorId) -> Result<Session> {
    let session = Session { token_digest, actor_id: actor, created_at: Utc::now() };

    let digest    = session.token_digest.clone();
    let actor_str = session.actor_id.as_str().to_owned();
    let at_str    = encode_dt(session.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_digest, actor_id, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![digest, actor_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(session)
  }

  async fn get_session(&self, token_digest: &str) -> Result<Option<Session>> {
    let digest = token_digest.to_owned();

    let raw: Option<RawSession> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT token_digest, actor_id, created_at FROM sessions WHERE token_digest = ?1",
            rusqlite::params![digest],
            |row| {
              Ok(RawSession {
                token_digest: row.get(0)?,
                actor_id:     row.get(1)?,
                created_at:   row.get(2)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSession::into_session).transpose()
  }

  async fn delete_session(&self, token_digest: &str) -> Result<bool> {
    let digest = token_digest.to_owned();

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM sessions WHERE token_digest = ?1",
          rusqlite::params![digest],
        )?)
      })
      .await?;
    Ok(removed > 0)
  }
}
