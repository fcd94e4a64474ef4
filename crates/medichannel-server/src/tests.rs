//! End-to-end tests through the session middleware and the API router.

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use medichannel_core::{role::Role, store::RoleStore};
use medichannel_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{AppState, Error, ServerConfig, auth, router};

fn config(session_ttl_hours: u32) -> ServerConfig {
  ServerConfig {
    host: "127.0.0.1".into(),
    port: 0,
    store_path: PathBuf::from(":memory:"),
    demo_mode: false,
    session_ttl_hours,
  }
}

async fn app(session_ttl_hours: u32) -> (Router, Arc<SqliteStore>) {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let app = router(AppState {
    store:  store.clone(),
    config: Arc::new(config(session_ttl_hours)),
  });
  (app, store)
}

async fn call(
  app: &Router,
  method: &str,
  uri: &str,
  token: Option<&str>,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(token) = token {
    builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
  }
  let req = match body {
    Some(v) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(v.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };

  let resp = app.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let body = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, body)
}

async fn sign_up(app: &Router, username: &str, full_name: &str) -> Value {
  let (status, body) = call(
    app,
    "POST",
    "/api/auth/sign-up",
    None,
    Some(json!({ "username": username, "password": "secret1", "full_name": full_name })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  body
}

async fn sign_in(app: &Router, username: &str) -> String {
  let (status, body) = call(
    app,
    "POST",
    "/api/auth/sign-in",
    None,
    Some(json!({ "username": username, "password": "secret1" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  body["token"].as_str().unwrap().to_owned()
}

// ─── Sign-up / sign-in ───────────────────────────────────────────────────────

#[tokio::test]
async fn sign_up_returns_profile_without_role() {
  let (app, store) = app(12).await;
  let profile = sign_up(&app, "maria", "Maria Silva").await;
  assert_eq!(profile["full_name"], "Maria Silva");

  let actor = profile["actor_id"].as_str().unwrap().into();
  assert!(store.roles_for(&actor).await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_username_conflicts() {
  let (app, store) = app(12).await;
  sign_up(&app, "maria", "Maria Silva").await;
  let (status, body) = call(
    &app,
    "POST",
    "/api/auth/sign-up",
    None,
    Some(json!({ "username": "maria", "password": "secret1", "full_name": "Other" })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert!(body["error"].as_str().unwrap().contains("taken"));
  assert_eq!(store.list_profiles().await.unwrap().len(), 1);
}

#[tokio::test]
async fn short_password_is_rejected() {
  let (app, _) = app(12).await;
  let (status, _) = call(
    &app,
    "POST",
    "/api/auth/sign-up",
    None,
    Some(json!({ "username": "maria", "password": "123", "full_name": "Maria" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
  let (app, _) = app(12).await;
  sign_up(&app, "maria", "Maria Silva").await;
  let (status, _) = call(
    &app,
    "POST",
    "/api/auth/sign-in",
    None,
    Some(json!({ "username": "maria", "password": "wrong-password" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn session_token_identifies_the_actor() {
  let (app, store) = app(12).await;
  let profile = sign_up(&app, "gerente", "Gerente").await;
  let token = sign_in(&app, "gerente").await;

  let (status, _) = call(&app, "GET", "/api/management/access", Some(&token), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  auth::grant(store.as_ref(), "gerente", Role::Manager).await.unwrap();
  let (status, body) = call(&app, "GET", "/api/management/access", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["actor_id"], profile["actor_id"]);
}

#[tokio::test]
async fn unknown_token_is_anonymous() {
  let (app, _) = app(12).await;
  let (status, body) =
    call(&app, "GET", "/api/management/access", Some("not-a-token"), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["redirect"], "/auth");
}

#[tokio::test]
async fn signed_out_token_stops_working() {
  let (app, _) = app(12).await;
  sign_up(&app, "maria", "Maria Silva").await;
  let token = sign_in(&app, "maria").await;

  let (status, _) = call(&app, "GET", "/api/dashboard", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);

  let (status, _) = call(&app, "POST", "/api/auth/sign-out", Some(&token), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, _) = call(&app, "GET", "/api/dashboard", Some(&token), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_sessions_are_rejected() {
  let (app, _) = app(0).await;
  sign_up(&app, "maria", "Maria Silva").await;
  let token = sign_in(&app, "maria").await;

  let (status, _) = call(&app, "GET", "/api/dashboard", Some(&token), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ─── Bootstrap ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn grant_unknown_username_fails() {
  let (_, store) = app(12).await;
  let err = auth::grant(store.as_ref(), "nobody", Role::Manager).await;
  assert!(matches!(err, Err(Error::UnknownUser(u)) if u == "nobody"));
}

#[tokio::test]
async fn granted_manager_can_promote_others() {
  let (app, store) = app(12).await;
  sign_up(&app, "gerente", "Gerente").await;
  let carlos = sign_up(&app, "carlos", "Carlos Lima").await;
  auth::grant(store.as_ref(), "gerente", Role::Manager).await.unwrap();
  let token = sign_in(&app, "gerente").await;

  let uri = format!("/api/management/actors/{}/role", carlos["actor_id"].as_str().unwrap());
  let (status, body) =
    call(&app, "PUT", &uri, Some(&token), Some(json!({ "role": "attendant" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["total"], 2);

  let actor = carlos["actor_id"].as_str().unwrap().into();
  let roles = store.roles_for(&actor).await.unwrap();
  assert_eq!(roles.len(), 1);
  assert_eq!(roles[0].role, Role::Attendant);
}
