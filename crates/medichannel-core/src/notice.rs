//! Transient user-facing notices and navigation hints.
//!
//! Errors never escape the view boundary raw: each one is translated into a
//! [`Notice`] (and, for access failures, a [`Redirect`]) that the client
//! renders.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Info,
  Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
  pub title:       String,
  pub description: String,
  pub severity:    Severity,
}

impl Notice {
  pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
    Self {
      title:       title.into(),
      description: description.into(),
      severity:    Severity::Info,
    }
  }

  pub fn destructive(
    title: impl Into<String>,
    description: impl Into<String>,
  ) -> Self {
    Self {
      title:       title.into(),
      description: description.into(),
      severity:    Severity::Destructive,
    }
  }

  pub fn access_denied() -> Self {
    Self::destructive("Access denied", "Only managers can access this page")
  }

  pub fn roster_load_failed() -> Self {
    Self::destructive("Could not load users", "Please try again later")
  }

  pub fn role_updated() -> Self {
    Self::info("Role updated", "The user's profile was updated successfully")
  }

  pub fn role_update_failed() -> Self {
    Self::destructive("Could not update role", "The user's profile could not be updated")
  }
}

/// Where the client should navigate after a failed access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Redirect {
  SignIn,
  Home,
}

impl Redirect {
  pub fn path(self) -> &'static str {
    match self {
      Self::SignIn => "/auth",
      Self::Home => "/",
    }
  }
}
