//! HTTP server for the MediChannel console.
//!
//! Wires session authentication in front of the [`medichannel_api`] router
//! and exposes the sign-up / sign-in / sign-out endpoints.

pub mod auth;
pub mod error;
pub mod settings;

pub use error::Error;
pub use settings::ServerConfig;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{Router, middleware, routing::post};
use medichannel_api::ApiState;
use medichannel_core::store::IdentityStore;
use tower_http::trace::TraceLayer;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state for the auth handlers and the session middleware.
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      config: Arc::clone(&self.config),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full application router, everything mounted under `/api`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: IdentityStore + 'static,
{
  let auth_routes = Router::new()
    .route("/auth/sign-up", post(auth::sign_up::<S>))
    .route("/auth/sign-in", post(auth::sign_in::<S>))
    .route("/auth/sign-out", post(auth::sign_out::<S>))
    .with_state(state.clone());

  let api = medichannel_api::api_router(ApiState::new(
    Arc::clone(&state.store),
    state.config.demo_mode,
  ))
  .merge(auth_routes);

  Router::new()
    .nest("/api", api)
    .layer(middleware::from_fn_with_state(
      state,
      auth::session_middleware::<S>,
    ))
    .layer(TraceLayer::new_for_http())
}
