//! In-memory store used by the unit tests in this crate.

use std::sync::{
  Mutex,
  atomic::{AtomicBool, AtomicUsize, Ordering},
};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
  actor::{ActorId, Credential, NewActor, Profile, Session},
  role::{Role, RoleAssignment},
  store::{IdentityStore, RoleStore},
};

#[derive(Debug, Error)]
pub enum MemoryError {
  #[error("injected read failure")]
  Read,
  #[error("injected insert failure")]
  Insert,
}

#[derive(Default)]
struct Tables {
  profiles:    Vec<Profile>,
  roles:       Vec<RoleAssignment>,
  credentials: Vec<Credential>,
  sessions:    Vec<Session>,
}

#[derive(Default)]
pub struct MemoryStore {
  tables:        Mutex<Tables>,
  fail_reads:    AtomicBool,
  fail_inserts:  AtomicBool,
  profile_loads: AtomicUsize,
}

impl MemoryStore {
  /// Add a profile created `secs` seconds after the epoch.
  pub fn add_profile(&self, name: &str, secs: i64) -> ActorId {
    let actor_id = ActorId::generate();
    self.tables.lock().unwrap().profiles.push(Profile {
      actor_id:   actor_id.clone(),
      full_name:  name.to_owned(),
      avatar_url: None,
      created_at: DateTime::<Utc>::from_timestamp(secs, 0).unwrap(),
    });
    actor_id
  }

  pub fn grant(&self, actor: &ActorId, role: Role) {
    self
      .tables
      .lock()
      .unwrap()
      .roles
      .push(RoleAssignment::new(actor.clone(), role));
  }

  /// Profiles newest first, as `list_profiles` returns them.
  pub fn profiles(&self) -> Vec<Profile> {
    let mut profiles = self.tables.lock().unwrap().profiles.clone();
    profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    profiles
  }

  pub fn fail_reads(&self, on: bool) { self.fail_reads.store(on, Ordering::SeqCst) }

  pub fn fail_inserts(&self, on: bool) { self.fail_inserts.store(on, Ordering::SeqCst) }

  /// How many times `list_profiles` has been called.
  pub fn profile_loads(&self) -> usize { self.profile_loads.load(Ordering::SeqCst) }

  fn check_read(&self) -> Result<(), MemoryError> {
    if self.fail_reads.load(Ordering::SeqCst) {
      Err(MemoryError::Read)
    } else {
      Ok(())
    }
  }

  fn check_insert(&self) -> Result<(), MemoryError> {
    if self.fail_inserts.load(Ordering::SeqCst) {
      Err(MemoryError::Insert)
    } else {
      Ok(())
    }
  }
}

impl RoleStore for MemoryStore {
  type Error = MemoryError;

  async fn has_role(&self, actor: &ActorId, role: Role) -> Result<bool, MemoryError> {
    self.check_read()?;
    let tables = self.tables.lock().unwrap();
    Ok(tables.roles.iter().any(|a| &a.actor_id == actor && a.role == role))
  }

  async fn get_profile(&self, actor: &ActorId) -> Result<Option<Profile>, MemoryError> {
    self.check_read()?;
    let tables = self.tables.lock().unwrap();
    Ok(tables.profiles.iter().find(|p| &p.actor_id == actor).cloned())
  }

  async fn list_profiles(&self) -> Result<Vec<Profile>, MemoryError> {
    self.profile_loads.fetch_add(1, Ordering::SeqCst);
    self.check_read()?;
    Ok(self.profiles())
  }

  async fn list_roles(&self) -> Result<Vec<RoleAssignment>, MemoryError> {
    self.check_read()?;
    Ok(self.tables.lock().unwrap().roles.clone())
  }

  async fn roles_for(&self, actor: &ActorId) -> Result<Vec<RoleAssignment>, MemoryError> {
    self.check_read()?;
    let tables = self.tables.lock().unwrap();
    Ok(tables.roles.iter().filter(|a| &a.actor_id == actor).cloned().collect())
  }

  async fn delete_roles(&self, actor: &ActorId) -> Result<usize, MemoryError> {
    let mut tables = self.tables.lock().unwrap();
    let before = tables.roles.len();
    tables.roles.retain(|a| &a.actor_id != actor);
    Ok(before - tables.roles.len())
  }

  async fn insert_role(&self, actor: &ActorId, role: Role) -> Result<RoleAssignment, MemoryError> {
    self.check_insert()?;
    let assignment = RoleAssignment::new(actor.clone(), role);
    self.tables.lock().unwrap().roles.push(assignment.clone());
    Ok(assignment)
  }

  async fn replace_role(&self, actor: &ActorId, role: Role) -> Result<RoleAssignment, MemoryError> {
    let mut tables = self.tables.lock().unwrap();
    let snapshot = tables.roles.clone();
    tables.roles.retain(|a| &a.actor_id != actor);
    if let Err(e) = self.check_insert() {
      tables.roles = snapshot;
      return Err(e);
    }
    let assignment = RoleAssignment::new(actor.clone(), role);
    tables.roles.push(assignment.clone());
    Ok(assignment)
  }
}

impl IdentityStore for MemoryStore {
  async fn sign_up(&self, input: NewActor) -> Result<Option<Profile>, MemoryError> {
    let mut tables = self.tables.lock().unwrap();
    if tables.credentials.iter().any(|c| c.username == input.username) {
      return Ok(None);
    }
    let profile = Profile {
      actor_id:   ActorId::generate(),
      full_name:  input.full_name,
      avatar_url: input.avatar_url,
      created_at: Utc::now(),
    };
    tables.credentials.push(Credential {
      actor_id:      profile.actor_id.clone(),
      username:      input.username,
      password_hash: input.password_hash,
    });
    tables.profiles.push(profile.clone());
    Ok(Some(profile))
  }

  async fn credential(&self, username: &str) -> Result<Option<Credential>, MemoryError> {
    let tables = self.tables.lock().unwrap();
    Ok(tables.credentials.iter().find(|c| c.username == username).cloned())
  }

  async fn create_session(
    &self,
    token_digest: String,
    actor: ActorId,
  ) -> Result<Session, MemoryError> {
    let session = Session { token_digest, actor_id: actor, created_at: Utc::now() };
    self.tables.lock().unwrap().sessions.push(session.clone());
    Ok(session)
  }

  async fn get_session(&self, token_digest: &str) -> Result<Option<Session>, MemoryError> {
    let tables = self.tables.lock().unwrap();
    Ok(tables.sessions.iter().find(|s| s.token_digest == token_digest).cloned())
  }

  async fn delete_session(&self, token_digest: &str) -> Result<bool, MemoryError> {
    let mut tables = self.tables.lock().unwrap();
    let before = tables.sessions.len();
    tables.sessions.retain(|s| s.token_digest != token_digest);
    Ok(tables.sessions.len() != before)
  }
}
