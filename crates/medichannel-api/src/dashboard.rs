//! Handlers for `/dashboard` and `/status`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/dashboard` | `?tab=metrics&demo_role=manager` |
//! | `GET`  | `/dashboard/metrics` | 403 without the metrics capability |
//! | `GET`  | `/status` | No auth |

use axum::{
  Json,
  extract::State,
  response::{IntoResponse, Response},
};
use medichannel_core::{
  Error as CoreError,
  actor::ActorId,
  dashboard::{self, DashboardView, RoleSource, Tab},
  metrics::Snapshot,
  presence::{self, ChannelStatus, Indicator, PresenceStatus},
  role::{Capability, Role},
  store::RoleStore,
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError, extract::Params, identity::SignedIn};

/// The role the request acts as. `demo_role` only counts in demo mode.
pub(crate) async fn acting_source<S: RoleStore>(
  state: &ApiState<S>,
  actor: &ActorId,
  demo_role: Option<Role>,
) -> Result<RoleSource, ApiError> {
  let stored = dashboard::current_role(state.manager.store(), actor).await?;
  Ok(RoleSource::resolve(stored, demo_role, state.demo_mode))
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
  #[serde(default)]
  pub tab:       Tab,
  pub demo_role: Option<Role>,
}

/// `GET /dashboard[?tab=<tab>&demo_role=<role>]`
pub async fn view<S: RoleStore>(
  State(state): State<ApiState<S>>,
  SignedIn(actor): SignedIn,
  Params(params): Params<DashboardParams>,
) -> Result<Json<DashboardView>, ApiError> {
  let source = acting_source(&state, &actor, params.demo_role).await?;
  Ok(Json(dashboard::compose(params.tab, source)))
}

// ─── Metrics ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MetricsParams {
  pub demo_role: Option<Role>,
}

/// `GET /dashboard/metrics[?demo_role=<role>]`
pub async fn metrics<S: RoleStore>(
  State(state): State<ApiState<S>>,
  SignedIn(actor): SignedIn,
  Params(params): Params<MetricsParams>,
) -> Result<Response, ApiError> {
  let source = acting_source(&state, &actor, params.demo_role).await?;
  if !source.role().can(Capability::ViewMetrics) {
    return Err(CoreError::MissingCapability(Capability::ViewMetrics).into());
  }
  let snapshot = Snapshot::sample();
  Ok(Json(snapshot.report()).into_response())
}

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StatusResponse {
  pub status:   Indicator,
  pub channels: Vec<ChannelStatus>,
}

/// `GET /status`
pub async fn status() -> Json<StatusResponse> {
  Json(StatusResponse {
    status:   PresenceStatus::Online.into(),
    channels: presence::channel_board(),
  })
}
