//! Core types and trait definitions for the MediChannel console backend.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::RoleStore`] and
//! [`store::IdentityStore`]; the API layer drives the flows defined here.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod access;
pub mod actor;
pub mod dashboard;
pub mod error;
pub mod inbox;
pub mod manage;
pub mod metrics;
pub mod notice;
pub mod presence;
pub mod role;
pub mod roster;
pub mod store;

pub use error::{Error, Result};

#[cfg(test)]
mod testing;
