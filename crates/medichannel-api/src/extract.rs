//! Body and query extractors that reject with [`ApiError::BadRequest`].
//!
//! axum's own [`Json`] and [`Query`] reject with plain-text bodies and, for
//! well-formed JSON of the wrong shape, a 422. Handlers use these wrappers so
//! every malformed request gets a 400 with the usual JSON error body.

use axum::{
  Json,
  extract::{
    FromRequest, FromRequestParts, Query, Request,
    rejection::{JsonRejection, QueryRejection},
  },
  http::request::Parts,
};

use crate::error::ApiError;

/// A JSON request body.
#[derive(Debug, Clone)]
pub struct Body<T>(pub T);

impl<S, T> FromRequest<S> for Body<T>
where
  Json<T>: FromRequest<S, Rejection = JsonRejection>,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let Json(value) = Json::<T>::from_request(req, state).await?;
    Ok(Body(value))
  }
}

/// Query-string parameters.
#[derive(Debug, Clone)]
pub struct Params<T>(pub T);

impl<S, T> FromRequestParts<S> for Params<T>
where
  Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
    Ok(Params(value))
  }
}
