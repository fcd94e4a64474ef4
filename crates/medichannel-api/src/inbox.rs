//! Handlers for `/inbox` endpoints.
//!
//! The inbox lives in memory for the lifetime of the server. Each caller keeps
//! their own selection, and patients only ever see the conversations they
//! started.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use chrono::Local;
use medichannel_core::{
  Error as CoreError,
  presence::Channel,
  role::{Capability, Role},
  store::RoleStore,
};
use serde::Deserialize;

use crate::{
  ApiState,
  dashboard::acting_source,
  error::ApiError,
  extract::{Body, Params},
  identity::SignedIn,
};

#[derive(Debug, Deserialize)]
pub struct RoleParams {
  pub demo_role: Option<Role>,
}

/// `GET /inbox[?demo_role=<role>]`
pub async fn view<S: RoleStore>(
  State(state): State<ApiState<S>>,
  SignedIn(actor): SignedIn,
  Params(params): Params<RoleParams>,
) -> Result<Response, ApiError> {
  let role = acting_source(&state, &actor, params.demo_role).await?.role();
  let inbox = state.inbox.lock().await;
  Ok(Json(inbox.view(&actor, role)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct SelectBody {
  pub index: usize,
}

/// `POST /inbox/select[?demo_role=<role>]`, body: `{"index":1}`
///
/// `index` counts within the caller's own conversation list.
pub async fn select<S: RoleStore>(
  State(state): State<ApiState<S>>,
  SignedIn(actor): SignedIn,
  Params(params): Params<RoleParams>,
  Body(body): Body<SelectBody>,
) -> Result<Response, ApiError> {
  let role = acting_source(&state, &actor, params.demo_role).await?.role();
  let mut inbox = state.inbox.lock().await;
  let conversation = inbox.select(&actor, role, body.index)?;
  Ok(Json(conversation).into_response())
}

#[derive(Debug, Deserialize)]
pub struct SendBody {
  pub text: String,
}

/// `POST /inbox/messages[?demo_role=<role>]`, body: `{"text":"Olá"}`
///
/// A patient's first message opens a WhatsApp conversation under their
/// profile name.
pub async fn send<S: RoleStore>(
  State(state): State<ApiState<S>>,
  SignedIn(actor): SignedIn,
  Params(params): Params<RoleParams>,
  Body(body): Body<SendBody>,
) -> Result<Response, ApiError> {
  let role = acting_source(&state, &actor, params.demo_role).await?.role();

  let contact = if role.can(Capability::ViewAllHistory) || body.text.trim().is_empty() {
    None
  } else {
    state
      .manager
      .store()
      .get_profile(&actor)
      .await
      .map_err(CoreError::fetch)?
      .map(|p| p.full_name)
  };

  let mut inbox = state.inbox.lock().await;
  if let Some(contact) = contact
    && inbox.selected(&actor, role).is_none()
  {
    inbox.open(actor.clone(), &contact, Channel::WhatsApp);
  }
  let message = inbox.send(&actor, role, &body.text, Local::now().time())?;
  Ok((StatusCode::CREATED, Json(message)).into_response())
}
