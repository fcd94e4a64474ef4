//! View composition for the main dashboard.
//!
//! The acting role comes from exactly one [`RoleSource`]: the actor's stored
//! role, or (only when demo mode is switched on) a role the client asked to
//! impersonate. The acting role then decides which tabs are visible.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator as _};

use crate::{
  Error, Result,
  actor::ActorId,
  metrics::{self, QueueItem, Summary},
  presence::{self, ChannelStatus, Indicator, PresenceStatus},
  role::{Capability, Role},
  store::RoleStore,
};

// ─── Tabs ────────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Tab {
  #[default]
  Overview,
  Messaging,
  Metrics,
  ChannelConfig,
}

impl Tab {
  pub fn label(self) -> &'static str {
    match self {
      Self::Overview => "Dashboard",
      Self::Messaging => "Attendance",
      Self::Metrics => "Metrics",
      Self::ChannelConfig => "Channels",
    }
  }

  /// Capability needed to see this tab, if any.
  pub fn requires(self) -> Option<Capability> {
    match self {
      Self::Overview | Self::Messaging => None,
      Self::Metrics => Some(Capability::ViewMetrics),
      Self::ChannelConfig => Some(Capability::ConfigureChannels),
    }
  }

  pub fn visible_to(self, role: Role) -> bool {
    self.requires().is_none_or(|cap| role.can(cap))
  }
}

// ─── Role source ─────────────────────────────────────────────────────────────

/// Where the acting role came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "role", rename_all = "snake_case")]
pub enum RoleSource {
  /// The actor's current stored role.
  Authenticated(Role),
  /// A client-chosen role, honoured only in demo mode.
  Demo(Role),
}

impl RoleSource {
  /// Pick the acting role. A requested override is ignored unless
  /// `demo_mode` is on.
  pub fn resolve(authenticated: Role, requested: Option<Role>, demo_mode: bool) -> Self {
    match requested {
      Some(role) if demo_mode => Self::Demo(role),
      Some(role) => {
        tracing::debug!(%role, "ignoring role override outside demo mode");
        Self::Authenticated(authenticated)
      }
      None => Self::Authenticated(authenticated),
    }
  }

  pub fn role(self) -> Role {
    match self {
      Self::Authenticated(role) | Self::Demo(role) => role,
    }
  }

  pub fn is_demo(self) -> bool { matches!(self, Self::Demo(_)) }
}

/// The actor's current stored role: first assignment, patient if none.
pub async fn current_role<S>(store: &S, actor: &ActorId) -> Result<Role>
where
  S: RoleStore,
{
  let roles = store.roles_for(actor).await.map_err(Error::fetch)?;
  Ok(roles.first().map(|a| a.role).unwrap_or_default())
}

// ─── Composition ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabEntry {
  pub tab:   Tab,
  pub label: &'static str,
}

/// Content of the overview tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
  pub headline: Summary,
  pub channels: Vec<ChannelStatus>,
  pub queue:    Vec<QueueItem>,
}

impl Overview {
  pub fn sample() -> Self {
    Self {
      headline: metrics::Snapshot::sample().summary,
      channels: presence::channel_board(),
      queue:    metrics::service_queue(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
  pub requested_tab: Tab,
  /// Equal to `requested_tab` unless that tab is hidden for the acting role.
  pub selected_tab:  Tab,
  pub tabs:          Vec<TabEntry>,
  pub acting_role:   Role,
  pub role_source:   RoleSource,
  pub capabilities:  &'static [Capability],
  pub status:        Indicator,
  /// Present only when the overview tab is selected.
  pub overview:      Option<Overview>,
}

/// Compose the dashboard for `requested` as seen by `source`.
pub fn compose(requested: Tab, source: RoleSource) -> DashboardView {
  let role = source.role();
  let tabs = Tab::iter()
    .filter(|t| t.visible_to(role))
    .map(|tab| TabEntry { tab, label: tab.label() })
    .collect();

  let selected_tab = if requested.visible_to(role) {
    requested
  } else {
    Tab::Overview
  };

  DashboardView {
    requested_tab: requested,
    selected_tab,
    tabs,
    acting_role: role,
    role_source: source,
    capabilities: role.capabilities(),
    status: PresenceStatus::Online.into(),
    overview: (selected_tab == Tab::Overview).then(Overview::sample),
  }
}
