//! Handlers for `/management` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/management/access` | 401 signed out, 403 not a manager |
//! | `GET`  | `/management/roster` | Guard, then one roster load |
//! | `PUT`  | `/management/actors/{id}/role` | Body: `{"role":"attendant"}` |

use axum::{
  Json,
  extract::{Path, State},
};
use medichannel_core::{
  Error as CoreError,
  actor::ActorId,
  notice::Notice,
  role::{Capability, Role, RoleAssignment},
  roster::{RosterEntry, RosterRow},
  store::RoleStore,
};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator as _;

use crate::{ApiState, error::ApiError, extract::Body, identity::CurrentActor};

// ─── Access ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AccessGranted {
  pub actor_id: ActorId,
}

/// `GET /management/access`
pub async fn access<S: RoleStore>(
  State(state): State<ApiState<S>>,
  actor: CurrentActor,
) -> Result<Json<AccessGranted>, ApiError> {
  let admitted = state.manager.admit(actor.actor()).await?;
  Ok(Json(AccessGranted { actor_id: admitted.actor().clone() }))
}

// ─── Roster ──────────────────────────────────────────────────────────────────

/// One entry of the "about profiles" panel.
#[derive(Debug, Serialize)]
pub struct RoleInfo {
  pub role:         Role,
  pub label:        &'static str,
  pub summary:      &'static str,
  pub capabilities: &'static [Capability],
}

fn roles() -> Vec<RoleInfo> {
  Role::iter()
    .map(|role| RoleInfo {
      role,
      label: role.label(),
      summary: role.summary(),
      capabilities: role.capabilities(),
    })
    .collect()
}

#[derive(Debug, Serialize)]
pub struct RosterResponse {
  pub total: usize,
  pub rows:  Vec<RosterRow>,
  pub roles: Vec<RoleInfo>,
}

impl RosterResponse {
  fn new(viewer: &ActorId, entries: &[RosterEntry]) -> Self {
    Self {
      total: entries.len(),
      rows:  entries.iter().map(|e| e.row(viewer)).collect(),
      roles: roles(),
    }
  }
}

/// `GET /management/roster`
pub async fn roster<S: RoleStore>(
  State(state): State<ApiState<S>>,
  actor: CurrentActor,
) -> Result<Json<RosterResponse>, ApiError> {
  let entered = state.manager.enter(actor.actor()).await?;
  Ok(Json(RosterResponse::new(entered.admitted.actor(), &entered.roster)))
}

// ─── Reassign ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReassignBody {
  pub role: String,
}

#[derive(Debug, Serialize)]
pub struct ReassignResponse {
  pub assignment: RoleAssignment,
  pub notices:    Vec<Notice>,
  #[serde(flatten)]
  pub roster:     RosterResponse,
}

/// `PUT /management/actors/{id}/role`, body: `{"role":"manager"}`
pub async fn reassign<S: RoleStore>(
  State(state): State<ApiState<S>>,
  actor: CurrentActor,
  Path(target): Path<String>,
  Body(body): Body<ReassignBody>,
) -> Result<Json<ReassignResponse>, ApiError> {
  let admitted = state.manager.admit(actor.actor()).await?;
  let role = body
    .role
    .parse::<Role>()
    .map_err(|_| CoreError::InvalidRole(body.role.clone()))?;

  let done = state
    .manager
    .reassign(&admitted, &ActorId::new(target), role)
    .await?;

  Ok(Json(ReassignResponse {
    assignment: done.assignment,
    notices:    done.notices,
    roster:     RosterResponse::new(admitted.actor(), &done.roster),
  }))
}
