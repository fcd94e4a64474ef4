//! Attendance metrics and the service queue shown on the dashboard.
//!
//! Figures are a fixed in-memory snapshot; nothing here is collected from
//! live traffic. The derived views (goal progress, rankings, trends) are
//! computed from the snapshot on demand.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::presence::{Channel, PresenceStatus};

/// Attendances the clinic aims to handle per day.
pub const DAILY_ATTENDANCE_GOAL: u32 = 300;

/// Target average first-response time, in minutes.
pub const RESPONSE_TIME_GOAL_MINUTES: f64 = 3.0;

// ─── Snapshot ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
  pub attendances_today:     u32,
  pub avg_response_minutes:  f64,
  /// Percent of conversations converted into booked appointments.
  pub conversion_rate:       u8,
  /// Out of 5.
  pub satisfaction:          f64,
  pub attendants_online:     u32,
  pub attendants_total:      u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendantPerformance {
  pub name:         String,
  pub attendances:  u32,
  pub avg_minutes:  f64,
  pub satisfaction: f64,
  pub status:       PresenceStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
  Up,
  Down,
  Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelPerformance {
  pub channel:    Channel,
  /// Share of total volume, percent.
  pub volume:     u8,
  pub conversion: u8,
  /// Week-over-week growth, percent (may be negative).
  pub growth:     i8,
}

impl ChannelPerformance {
  pub fn trend(&self) -> Trend {
    match self.growth.cmp(&0) {
      Ordering::Greater => Trend::Up,
      Ordering::Less => Trend::Down,
      Ordering::Equal => Trend::Flat,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
  pub summary:    Summary,
  pub attendants: Vec<AttendantPerformance>,
  pub channels:   Vec<ChannelPerformance>,
}

impl Snapshot {
  /// The clinic's sample figures.
  pub fn sample() -> Self {
    let attendant = |name: &str, attendances, avg_minutes, satisfaction, status| {
      AttendantPerformance {
        name: name.to_owned(),
        attendances,
        avg_minutes,
        satisfaction,
        status,
      }
    };
    let channel = |channel, volume, conversion, growth| ChannelPerformance {
      channel,
      volume,
      conversion,
      growth,
    };

    Self {
      summary:    Summary {
        attendances_today:    247,
        avg_response_minutes: 2.3,
        conversion_rate:      96,
        satisfaction:         4.8,
        attendants_online:    8,
        attendants_total:     12,
      },
      attendants: vec![
        attendant("Ana Silva", 45, 1.8, 4.9, PresenceStatus::Online),
        attendant("Carlos Santos", 38, 2.1, 4.7, PresenceStatus::Online),
        attendant("Maria Costa", 42, 2.5, 4.6, PresenceStatus::Busy),
        attendant("João Oliveira", 35, 1.9, 4.8, PresenceStatus::Online),
      ],
      channels:   vec![
        channel(Channel::WhatsApp, 45, 98, 12),
        channel(Channel::Instagram, 28, 89, 8),
        channel(Channel::Facebook, 22, 92, -3),
        channel(Channel::Email, 18, 85, 5),
        channel(Channel::Phone, 12, 94, -8),
      ],
    }
  }

  /// Progress toward [`DAILY_ATTENDANCE_GOAL`], clamped to `0..=100`.
  pub fn daily_goal_progress(&self) -> u8 {
    percent(self.summary.attendances_today, DAILY_ATTENDANCE_GOAL)
  }

  pub fn response_goal_met(&self) -> bool {
    self.summary.avg_response_minutes <= RESPONSE_TIME_GOAL_MINUTES
  }

  /// Attendants by satisfaction, then attendances, best first.
  pub fn ranking(&self) -> Vec<&AttendantPerformance> {
    let mut ranked: Vec<_> = self.attendants.iter().collect();
    ranked.sort_by(|a, b| {
      b.satisfaction
        .total_cmp(&a.satisfaction)
        .then(b.attendances.cmp(&a.attendances))
    });
    ranked
  }

  pub fn online_attendants(&self) -> impl Iterator<Item = &AttendantPerformance> {
    self.attendants.iter().filter(|a| a.status.is_available())
  }

  /// Bundle the snapshot with its derived figures for serialisation.
  pub fn report(&self) -> Report<'_> {
    Report {
      snapshot:            self,
      daily_goal:          DAILY_ATTENDANCE_GOAL,
      daily_goal_progress: self.daily_goal_progress(),
      response_goal:       RESPONSE_TIME_GOAL_MINUTES,
      response_goal_met:   self.response_goal_met(),
      ranking:             self.ranking().into_iter().map(|a| a.name.as_str()).collect(),
      channel_trends:      self.channels.iter().map(|c| (c.channel, c.trend())).collect(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct Report<'a> {
  #[serde(flatten)]
  pub snapshot:            &'a Snapshot,
  pub daily_goal:          u32,
  pub daily_goal_progress: u8,
  pub response_goal:       f64,
  pub response_goal_met:   bool,
  pub ranking:             Vec<&'a str>,
  pub channel_trends:      Vec<(Channel, Trend)>,
}

fn percent(value: u32, goal: u32) -> u8 {
  if goal == 0 {
    return 100;
  }
  let pct = u64::from(value) * 100 / u64::from(goal);
  pct.min(100) as u8
}

// ─── Service queue ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
  Low,
  Medium,
  High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueItem {
  pub patient:         String,
  pub channel:         Channel,
  pub waiting_minutes: u32,
  pub urgency:         Urgency,
}

/// Patients waiting for an attendant, most urgent first; ties go to whoever
/// has waited longest.
pub fn service_queue() -> Vec<QueueItem> {
  let mut queue = vec![
    QueueItem {
      patient:         "Ana Costa".into(),
      channel:         Channel::Email,
      waiting_minutes: 8,
      urgency:         Urgency::Low,
    },
    QueueItem {
      patient:         "Maria Silva".into(),
      channel:         Channel::WhatsApp,
      waiting_minutes: 2,
      urgency:         Urgency::High,
    },
    QueueItem {
      patient:         "João Santos".into(),
      channel:         Channel::Instagram,
      waiting_minutes: 5,
      urgency:         Urgency::Medium,
    },
  ];
  queue.sort_by(|a, b| {
    b.urgency
      .cmp(&a.urgency)
      .then(b.waiting_minutes.cmp(&a.waiting_minutes))
  });
  queue
}
