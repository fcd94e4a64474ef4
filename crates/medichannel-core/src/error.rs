//! Error types for `medichannel-core`.

use thiserror::Error;

use crate::{
  actor::ActorId,
  notice::{Notice, Redirect},
  role::Capability,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no signed-in actor")]
  Unauthenticated,

  #[error("actor {0} does not hold the manager role")]
  Forbidden(ActorId),

  #[error("failed to read from the store: {0}")]
  RemoteFetchFailure(#[source] BoxError),

  #[error("failed to write to the store: {0}")]
  RemoteWriteFailure(#[source] BoxError),

  #[error("managers cannot reassign their own role")]
  SelfReassignment,

  #[error("unknown actor: {0}")]
  UnknownActor(ActorId),

  #[error("invalid role: {0:?}")]
  InvalidRole(String),

  #[error("message is empty")]
  EmptyMessage,

  #[error("no conversation at index {0}")]
  NoSuchConversation(usize),

  #[error("no conversation is selected")]
  NoConversationSelected,

  #[error("missing capability: {0}")]
  MissingCapability(Capability),
}

impl Error {
  pub fn fetch(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::RemoteFetchFailure(Box::new(e))
  }

  pub fn write(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::RemoteWriteFailure(Box::new(e))
  }

  /// The notice a client should show for this error.
  pub fn notice(&self) -> Notice {
    match self {
      Self::Unauthenticated => {
        Notice::destructive("Sign in required", "Please sign in to continue")
      }
      Self::Forbidden(_) => Notice::access_denied(),
      Self::RemoteFetchFailure(_) => Notice::roster_load_failed(),
      Self::RemoteWriteFailure(_) => Notice::role_update_failed(),
      Self::SelfReassignment => Notice::destructive(
        "Could not update role",
        "You cannot change your own role",
      ),
      Self::UnknownActor(_) => {
        Notice::destructive("Unknown user", "That user no longer exists")
      }
      Self::InvalidRole(_) => {
        Notice::destructive("Invalid role", "Choose patient, attendant or manager")
      }
      Self::EmptyMessage => Notice::destructive("Empty message", "Type a message first"),
      Self::NoSuchConversation(_) => {
        Notice::destructive("Conversation not found", "Pick a conversation from the list")
      }
      Self::NoConversationSelected => {
        Notice::destructive("No conversation", "Start or pick a conversation first")
      }
      Self::MissingCapability(_) => Notice::destructive(
        "Not available",
        "Your profile does not have access to this feature",
      ),
    }
  }

  /// Access failures send the client elsewhere; everything else stays put.
  pub fn redirect(&self) -> Option<Redirect> {
    match self {
      Self::Unauthenticated => Some(Redirect::SignIn),
      Self::Forbidden(_) => Some(Redirect::Home),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
