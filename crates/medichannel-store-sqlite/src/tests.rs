//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, Utc};
use medichannel_core::{
  actor::{ActorId, NewActor, Profile},
  role::Role,
  store::{IdentityStore, RoleStore},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn profile(s: &SqliteStore, id: &str, name: &str, secs: i64) -> ActorId {
  let p = Profile {
    actor_id:   ActorId::new(id),
    full_name:  name.into(),
    avatar_url: None,
    created_at: DateTime::<Utc>::from_timestamp(secs, 0).unwrap(),
  };
  s.insert_profile(&p).await.unwrap();
  p.actor_id
}

fn new_actor(username: &str) -> NewActor {
  NewActor {
    username:      username.into(),
    password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
    full_name:     "Maria Silva".into(),
    avatar_url:    Some("https://example.com/maria.png".into()),
  }
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn profiles_list_newest_first() {
  let s = store().await;
  let p1 = profile(&s, "p1", "Older", 1_000).await;
  let p2 = profile(&s, "p2", "Newer", 2_000).await;
  let p0 = profile(&s, "p0", "Oldest", 10).await;

  let ids: Vec<_> = s
    .list_profiles()
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.actor_id)
    .collect();
  assert_eq!(ids, vec![p2, p1, p0]);
}

#[tokio::test]
async fn get_profile_missing_returns_none() {
  let s = store().await;
  assert!(s.get_profile(&ActorId::new("nope")).await.unwrap().is_none());
}

#[tokio::test]
async fn profile_roundtrip_keeps_fields() {
  let s = store().await;
  let id = profile(&s, "u1", "Maria", 1_700_000_000).await;
  let p = s.get_profile(&id).await.unwrap().unwrap();
  assert_eq!(p.full_name, "Maria");
  assert_eq!(p.created_at.timestamp(), 1_700_000_000);
  assert!(p.avatar_url.is_none());
}

// ─── Roles ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn has_role_matches_actor_and_role() {
  let s = store().await;
  let a = profile(&s, "a", "A", 1).await;
  let b = profile(&s, "b", "B", 2).await;
  s.insert_role(&a, Role::Manager).await.unwrap();

  assert!(s.has_role(&a, Role::Manager).await.unwrap());
  assert!(!s.has_role(&a, Role::Attendant).await.unwrap());
  assert!(!s.has_role(&b, Role::Manager).await.unwrap());
}

#[tokio::test]
async fn every_role_is_accepted_by_the_schema() {
  let s = store().await;
  for (i, role) in [Role::Patient, Role::Attendant, Role::Manager].into_iter().enumerate() {
    let a = profile(&s, &format!("actor-{i}"), "A", i as i64).await;
    s.insert_role(&a, role).await.unwrap();
    assert!(s.has_role(&a, role).await.unwrap());
    assert_eq!(s.roles_for(&a).await.unwrap()[0].role, role);
  }
}

#[tokio::test]
async fn roles_come_back_in_insertion_order() {
  let s = store().await;
  let a = profile(&s, "a", "A", 1).await;
  let b = profile(&s, "b", "B", 2).await;
  let first = s.insert_role(&a, Role::Attendant).await.unwrap();
  let other = s.insert_role(&b, Role::Patient).await.unwrap();
  let second = s.insert_role(&a, Role::Manager).await.unwrap();

  assert_eq!(s.list_roles().await.unwrap(), vec![first.clone(), other, second.clone()]);
  assert_eq!(s.roles_for(&a).await.unwrap(), vec![first, second]);
}

#[tokio::test]
async fn delete_roles_is_idempotent() {
  let s = store().await;
  let a = profile(&s, "a", "A", 1).await;
  s.insert_role(&a, Role::Attendant).await.unwrap();
  s.insert_role(&a, Role::Manager).await.unwrap();

  assert_eq!(s.delete_roles(&a).await.unwrap(), 2);
  assert_eq!(s.delete_roles(&a).await.unwrap(), 0);
  assert!(s.roles_for(&a).await.unwrap().is_empty());
}

#[tokio::test]
async fn insert_for_unknown_actor_fails() {
  let s = store().await;
  let err = s.insert_role(&ActorId::new("ghost"), Role::Manager).await;
  assert!(matches!(err, Err(Error::Database(_))));
}

#[tokio::test]
async fn replace_role_leaves_exactly_one_assignment() {
  let s = store().await;
  let a = profile(&s, "a", "A", 1).await;
  s.insert_role(&a, Role::Attendant).await.unwrap();
  s.insert_role(&a, Role::Patient).await.unwrap();

  let assignment = s.replace_role(&a, Role::Manager).await.unwrap();

  let roles = s.roles_for(&a).await.unwrap();
  assert_eq!(roles, vec![assignment]);
  assert_eq!(roles[0].role, Role::Manager);
}

#[tokio::test]
async fn replace_role_rolls_back_when_insert_fails() {
  let s = store().await;
  let a = profile(&s, "a", "A", 1).await;
  let original = s.insert_role(&a, Role::Attendant).await.unwrap();

  s.execute_batch(
    "CREATE TRIGGER reject_inserts BEFORE INSERT ON user_roles
     BEGIN SELECT RAISE(ABORT, 'insert rejected'); END;",
  )
  .await
  .unwrap();

  let err = s.replace_role(&a, Role::Manager).await;
  assert!(matches!(err, Err(Error::Database(_))));
  assert_eq!(s.roles_for(&a).await.unwrap(), vec![original]);
}

// ─── Identity ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sign_up_creates_profile_and_credential() {
  let s = store().await;
  let profile = s.sign_up(new_actor("maria")).await.unwrap().unwrap();

  let fetched = s.get_profile(&profile.actor_id).await.unwrap().unwrap();
  assert_eq!(fetched.full_name, "Maria Silva");
  assert_eq!(fetched.avatar_url.as_deref(), Some("https://example.com/maria.png"));

  let cred = s.credential("maria").await.unwrap().unwrap();
  assert_eq!(cred.actor_id, profile.actor_id);
  assert!(cred.password_hash.starts_with("$argon2id$"));

  // New actors have no role until one is assigned.
  assert!(s.roles_for(&profile.actor_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
  let s = store().await;
  s.sign_up(new_actor("maria")).await.unwrap();
  assert!(s.sign_up(new_actor("maria")).await.unwrap().is_none());
  assert_eq!(s.list_profiles().await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_credential_returns_none() {
  let s = store().await;
  assert!(s.credential("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn sessions_roundtrip_and_sign_out() {
  let s = store().await;
  let profile = s.sign_up(new_actor("maria")).await.unwrap().unwrap();

  s.create_session("digest-1".into(), profile.actor_id.clone())
    .await
    .unwrap();
  let session = s.get_session("digest-1").await.unwrap().unwrap();
  assert_eq!(session.actor_id, profile.actor_id);

  assert!(s.delete_session("digest-1").await.unwrap());
  assert!(!s.delete_session("digest-1").await.unwrap());
  assert!(s.get_session("digest-1").await.unwrap().is_none());
}
