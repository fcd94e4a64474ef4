//! The `RoleStore` and `IdentityStore` traits.
//!
//! The traits are implemented by storage backends (e.g.
//! `medichannel-store-sqlite`). Higher layers (`medichannel-api`,
//! `medichannel-server`) depend on these abstractions, not on any concrete
//! backend.

use std::future::Future;

use crate::{
  actor::{ActorId, Credential, NewActor, Profile, Session},
  role::{Role, RoleAssignment},
};

// ─── Roles ───────────────────────────────────────────────────────────────────

/// Abstraction over the table-oriented store holding profiles and role
/// assignments.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RoleStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Lookups ───────────────────────────────────────────────────────────

  /// Whether `actor` holds at least one assignment with `role`.
  fn has_role<'a>(
    &'a self,
    actor: &'a ActorId,
    role: Role,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Retrieve a single profile. Returns `None` if not found.
  fn get_profile<'a>(
    &'a self,
    actor: &'a ActorId,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + 'a;

  /// All profiles, newest first (descending `created_at`).
  fn list_profiles(
    &self,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;

  /// All role assignments, unfiltered, in store order.
  fn list_roles(
    &self,
  ) -> impl Future<Output = Result<Vec<RoleAssignment>, Self::Error>> + Send + '_;

  /// Role assignments for a single actor, in store order.
  fn roles_for<'a>(
    &'a self,
    actor: &'a ActorId,
  ) -> impl Future<Output = Result<Vec<RoleAssignment>, Self::Error>> + Send + 'a;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Delete every assignment for `actor`. Returns the number of rows
  /// removed; zero is not an error.
  fn delete_roles<'a>(
    &'a self,
    actor: &'a ActorId,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// Insert one assignment for `actor`.
  fn insert_role<'a>(
    &'a self,
    actor: &'a ActorId,
    role: Role,
  ) -> impl Future<Output = Result<RoleAssignment, Self::Error>> + Send + 'a;

  /// Atomically replace every assignment for `actor` with a single new one.
  ///
  /// Either both the delete and the insert take effect or neither does; on
  /// error the previous assignments are intact.
  fn replace_role<'a>(
    &'a self,
    actor: &'a ActorId,
    role: Role,
  ) -> impl Future<Output = Result<RoleAssignment, Self::Error>> + Send + 'a;
}

// ─── Identity ────────────────────────────────────────────────────────────────

/// Signup, credentials and sessions. Shares the error type of the
/// [`RoleStore`] it extends.
pub trait IdentityStore: RoleStore {
  /// Create a profile and its credential. Returns `None`, and writes
  /// nothing, if the username is already taken.
  fn sign_up(
    &self,
    input: NewActor,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Look up the credential for `username`.
  fn credential<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<Credential>, Self::Error>> + Send + 'a;

  /// Persist a session keyed by the digest of its bearer token.
  fn create_session(
    &self,
    token_digest: String,
    actor: ActorId,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + '_;

  /// Resolve a token digest to a session, if one exists.
  fn get_session<'a>(
    &'a self,
    token_digest: &'a str,
  ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send + 'a;

  /// Remove a session (sign-out). Returns `false` if it did not exist.
  fn delete_session<'a>(
    &'a self,
    token_digest: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}
