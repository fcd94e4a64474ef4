//! Request extractors for the signed-in actor.
//!
//! The router never authenticates anything itself. Whatever sits in front of
//! it (the server's session middleware, or a test) inserts the caller's
//! [`ActorId`] into the request extensions.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use medichannel_core::{Error, actor::ActorId};

use crate::error::ApiError;

/// The signed-in actor, if any. Never rejects.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Option<ActorId>);

impl<S: Send + Sync> FromRequestParts<S> for CurrentActor {
  type Rejection = Infallible;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    Ok(CurrentActor(parts.extensions.get::<ActorId>().cloned()))
  }
}

impl CurrentActor {
  pub fn actor(&self) -> Option<&ActorId> { self.0.as_ref() }
}

/// The signed-in actor. Rejects with 401 when there is none.
#[derive(Debug, Clone)]
pub struct SignedIn(pub ActorId);

impl<S: Send + Sync> FromRequestParts<S> for SignedIn {
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<ActorId>()
      .cloned()
      .map(SignedIn)
      .ok_or(ApiError::Core(Error::Unauthenticated))
  }
}
