//! Bearer-token sessions.
//!
//! Sign-in hands the client an opaque random token; the store only ever sees
//! its SHA-256 digest. [`session_middleware`] turns a valid token back into
//! an [`ActorId`] request extension, which the API extractors read.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  Json,
  extract::{Request, State},
  http::{HeaderMap, StatusCode, header},
  middleware::Next,
  response::Response,
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use medichannel_core::{
  actor::{ActorId, NewActor, Profile},
  role::{Role, RoleAssignment},
  store::IdentityStore,
};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AppState, error::Error};

const TOKEN_BYTES: usize = 32;
pub const MIN_PASSWORD_LEN: usize = 6;

// ─── Tokens & passwords ──────────────────────────────────────────────────────

pub fn generate_token() -> String {
  let mut bytes = [0u8; TOKEN_BYTES];
  OsRng.fill_bytes(&mut bytes);
  URL_SAFE_NO_PAD.encode(bytes)
}

/// Hex SHA-256 of `token`.
pub fn digest(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

/// Argon2id PHC string for `password`.
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| Error::Hash(e.to_string()))
}

pub fn verify_password(password: &str, phc: &str) -> bool {
  PasswordHash::new(phc).is_ok_and(|parsed| {
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_ok()
  })
}

/// The token from an `Authorization: Bearer …` header.
pub fn bearer(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
    .map(str::trim)
    .filter(|t| !t.is_empty())
}

fn expires_at(created_at: DateTime<Utc>, ttl_hours: u32) -> DateTime<Utc> {
  created_at + Duration::hours(i64::from(ttl_hours))
}

// ─── Middleware ──────────────────────────────────────────────────────────────

/// Insert the signed-in [`ActorId`] into the request extensions when the
/// request carries a live session token.
///
/// Never rejects: handlers decide what an anonymous request may do.
pub async fn session_middleware<S>(
  State(state): State<AppState<S>>,
  mut req: Request,
  next: Next,
) -> Response
where
  S: IdentityStore + 'static,
{
  if let Some(actor) = resolve(&state, req.headers()).await {
    req.extensions_mut().insert(actor);
  }
  next.run(req).await
}

async fn resolve<S: IdentityStore>(state: &AppState<S>, headers: &HeaderMap) -> Option<ActorId> {
  let token_digest = digest(bearer(headers)?);

  let session = match state.store.get_session(&token_digest).await {
    Ok(session) => session?,
    Err(e) => {
      tracing::warn!(error = %e, "session lookup failed");
      return None;
    }
  };

  if expires_at(session.created_at, state.config.session_ttl_hours) <= Utc::now() {
    tracing::debug!(actor = %session.actor_id, "session expired");
    if let Err(e) = state.store.delete_session(&token_digest).await {
      tracing::warn!(error = %e, "failed to drop expired session");
    }
    return None;
  }

  Some(session.actor_id)
}

// ─── Handlers ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignUpBody {
  pub username:   String,
  pub password:   String,
  pub full_name:  String,
  #[serde(default)]
  pub avatar_url: Option<String>,
}

/// `POST /auth/sign-up`
pub async fn sign_up<S: IdentityStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<SignUpBody>,
) -> Result<(StatusCode, Json<Profile>), Error> {
  let username = body.username.trim();
  let full_name = body.full_name.trim();
  if username.is_empty() {
    return Err(Error::BadRequest("username is required".into()));
  }
  if full_name.is_empty() {
    return Err(Error::BadRequest("full name is required".into()));
  }
  if body.password.chars().count() < MIN_PASSWORD_LEN {
    return Err(Error::BadRequest(format!(
      "password must be at least {MIN_PASSWORD_LEN} characters"
    )));
  }

  let profile = state
    .store
    .sign_up(NewActor {
      username:      username.to_owned(),
      password_hash: hash_password(&body.password)?,
      full_name:     full_name.to_owned(),
      avatar_url:    body.avatar_url.filter(|u| !u.trim().is_empty()),
    })
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::Conflict(format!("username {username:?} is taken")))?;

  tracing::info!(actor = %profile.actor_id, "actor signed up");
  Ok((StatusCode::CREATED, Json(profile)))
}

#[derive(Debug, Deserialize)]
pub struct SignInBody {
  pub username: String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
  pub token:      String,
  pub actor_id:   ActorId,
  pub expires_at: DateTime<Utc>,
}

/// `POST /auth/sign-in`
pub async fn sign_in<S: IdentityStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<SignInBody>,
) -> Result<Json<SignInResponse>, Error> {
  let credential = state
    .store
    .credential(body.username.trim())
    .await
    .map_err(Error::store)?
    .ok_or(Error::Unauthorized)?;

  if !verify_password(&body.password, &credential.password_hash) {
    tracing::warn!(username = %credential.username, "sign-in with wrong password");
    return Err(Error::Unauthorized);
  }

  let token = generate_token();
  let session = state
    .store
    .create_session(digest(&token), credential.actor_id)
    .await
    .map_err(Error::store)?;

  tracing::info!(actor = %session.actor_id, "actor signed in");
  Ok(Json(SignInResponse {
    token,
    actor_id: session.actor_id,
    expires_at: expires_at(session.created_at, state.config.session_ttl_hours),
  }))
}

/// `POST /auth/sign-out`: drops the session behind the bearer token.
pub async fn sign_out<S: IdentityStore>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<StatusCode, Error> {
  let token = bearer(&headers).ok_or(Error::Unauthorized)?;
  let removed = state
    .store
    .delete_session(&digest(token))
    .await
    .map_err(Error::store)?;
  tracing::debug!(removed, "sign-out");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Bootstrap ───────────────────────────────────────────────────────────────

/// Give the account `username` exactly the role `role`.
///
/// Used from the command line to appoint the first manager, who can then
/// manage everyone else through the API.
pub async fn grant<S: IdentityStore>(
  store: &S,
  username: &str,
  role: Role,
) -> Result<RoleAssignment, Error> {
  let credential = store
    .credential(username)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::UnknownUser(username.to_owned()))?;

  let assignment = store
    .replace_role(&credential.actor_id, role)
    .await
    .map_err(Error::store)?;
  tracing::info!(actor = %credential.actor_id, %role, "role granted");
  Ok(assignment)
}
