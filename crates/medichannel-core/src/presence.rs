//! Presence status and communication channels.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator as _};

// ─── Presence ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PresenceStatus {
  Online,
  Busy,
  Away,
  Offline,
  #[serde(other)]
  Unknown,
}

impl PresenceStatus {
  pub fn label(self) -> &'static str {
    match self {
      Self::Online => "Online",
      Self::Busy => "Busy",
      Self::Away => "Away",
      Self::Offline => "Offline",
      Self::Unknown => "Unknown",
    }
  }

  pub fn is_available(self) -> bool { matches!(self, Self::Online) }
}

impl FromStr for PresenceStatus {
  type Err = std::convert::Infallible;

  /// Never fails: anything unrecognised is [`PresenceStatus::Unknown`].
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(match s.trim().to_ascii_lowercase().as_str() {
      "online" => Self::Online,
      "busy" => Self::Busy,
      "away" => Self::Away,
      "offline" => Self::Offline,
      _ => Self::Unknown,
    })
  }
}

/// Presence indicator payload: status plus its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Indicator {
  pub status: PresenceStatus,
  pub label:  &'static str,
}

impl From<PresenceStatus> for Indicator {
  fn from(status: PresenceStatus) -> Self {
    Self { status, label: status.label() }
  }
}

// ─── Channels ────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
  #[strum(serialize = "WhatsApp")]
  WhatsApp,
  #[strum(serialize = "Instagram")]
  Instagram,
  #[strum(serialize = "Facebook")]
  Facebook,
  #[strum(serialize = "E-mail")]
  Email,
  #[strum(serialize = "Phone")]
  Phone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelState {
  Active,
  Busy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelStatus {
  pub channel: Channel,
  pub label:   String,
  pub state:   ChannelState,
}

/// Status of every integrated channel. The phone line is the only one that
/// reports busy.
pub fn channel_board() -> Vec<ChannelStatus> {
  Channel::iter()
    .map(|channel| ChannelStatus {
      channel,
      label: channel.to_string(),
      state: match channel {
        Channel::Phone => ChannelState::Busy,
        _ => ChannelState::Active,
      },
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unknown_status_strings_degrade() {
    assert_eq!("online".parse::<PresenceStatus>().unwrap(), PresenceStatus::Online);
    assert_eq!(" Busy ".parse::<PresenceStatus>().unwrap(), PresenceStatus::Busy);
    let unknown: PresenceStatus = "sleeping".parse().unwrap();
    assert_eq!(unknown, PresenceStatus::Unknown);
    assert_eq!(unknown.label(), "Unknown");
  }

  #[test]
  fn unknown_status_deserialises() {
    let s: PresenceStatus = serde_json::from_str("\"lunch\"").unwrap();
    assert_eq!(s, PresenceStatus::Unknown);
  }

  #[test]
  fn board_lists_all_channels_in_order() {
    let board = channel_board();
    let labels: Vec<_> = board.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, ["WhatsApp", "Instagram", "Facebook", "E-mail", "Phone"]);
    assert_eq!(board[4].state, ChannelState::Busy);
    assert!(board[..4].iter().all(|c| c.state == ChannelState::Active));
  }
}
