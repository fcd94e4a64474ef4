//! JSON REST API for the MediChannel console.
//!
//! Exposes an axum [`Router`] backed by any [`medichannel_core::store::RoleStore`].
//! Authentication, TLS and transport concerns are the caller's
//! responsibility: the caller resolves the signed-in actor and inserts its
//! [`ActorId`](medichannel_core::actor::ActorId) into the request extensions.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", medichannel_api::api_router(ApiState::new(store.clone(), false)))
//! ```

pub mod dashboard;
pub mod error;
pub mod extract;
pub mod identity;
pub mod inbox;
pub mod management;


use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use medichannel_core::{inbox::Inbox, manage::RoleManager, store::RoleStore};
use tokio::sync::Mutex;

pub use error::ApiError;
pub use identity::{CurrentActor, SignedIn};

/// Shared handler state.
pub struct ApiState<S> {
  pub manager:   RoleManager<S>,
  pub inbox:     Arc<Mutex<Inbox>>,
  /// Honour client-chosen `demo_role` overrides.
  pub demo_mode: bool,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      manager:   self.manager.clone(),
      inbox:     Arc::clone(&self.inbox),
      demo_mode: self.demo_mode,
    }
  }
}

impl<S: RoleStore> ApiState<S> {
  /// State with the sample inbox loaded.
  pub fn new(store: Arc<S>, demo_mode: bool) -> Self {
    Self {
      manager: RoleManager::new(store),
      inbox: Arc::new(Mutex::new(Inbox::sample())),
      demo_mode,
    }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: RoleStore + 'static,
{
  Router::new()
    // Management
    .route("/management/access", get(management::access::<S>))
    .route("/management/roster", get(management::roster::<S>))
    .route("/management/actors/{id}/role", put(management::reassign::<S>))
    // Dashboard
    .route("/dashboard", get(dashboard::view::<S>))
    .route("/dashboard/metrics", get(dashboard::metrics::<S>))
    .route("/status", get(dashboard::status))
    // Inbox
    .route("/inbox", get(inbox::view::<S>))
    .route("/inbox/select", post(inbox::select::<S>))
    .route("/inbox/messages", post(inbox::send::<S>))
    .with_state(state)
}
