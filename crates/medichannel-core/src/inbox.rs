//! The chat inbox: conversations across channels and one thread each.
//!
//! Staff (roles with [`Capability::ViewAllHistory`]) see every conversation.
//! Other actors see only the conversations they own, and only when their
//! role has [`Capability::ViewOwnHistory`]. Each actor keeps their own
//! selection cursor.

use std::collections::HashMap;

use chrono::{NaiveTime, Timelike as _};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  actor::ActorId,
  presence::{Channel, PresenceStatus},
  role::{Capability, Role},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  Received,
  Sent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delivery {
  Delivered,
  Read,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
  pub id:        u64,
  pub direction: Direction,
  pub content:   String,
  pub at:        NaiveTime,
  pub delivery:  Delivery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversation {
  pub id:           u64,
  /// The actor on the contact side, when the contact has an account.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub owner:        Option<ActorId>,
  pub contact:      String,
  pub channel:      Channel,
  pub last_message: String,
  /// How long the contact has been waiting, e.g. `"2min"`.
  pub waiting:      String,
  pub unread:       u32,
  pub status:       PresenceStatus,
  pub initials:     String,
}

/// Conversations, their threads, and each actor's selection.
#[derive(Debug, Clone)]
pub struct Inbox {
  conversations:     Vec<Conversation>,
  threads:           HashMap<u64, Vec<Message>>,
  cursors:           HashMap<ActorId, u64>,
  next_message:      u64,
  next_conversation: u64,
}

/// What a client renders for the inbox.
#[derive(Debug, Clone, Serialize)]
pub struct InboxView<'a> {
  pub conversations: Vec<&'a Conversation>,
  /// Id of the selected conversation.
  pub selected:      Option<u64>,
  pub thread:        &'a [Message],
  pub can_send:      bool,
}

impl Inbox {
  pub fn new(conversations: Vec<Conversation>) -> Self {
    let next_conversation = conversations.iter().map(|c| c.id).max().unwrap_or(0) + 1;
    Self {
      conversations,
      threads: HashMap::new(),
      cursors: HashMap::new(),
      next_message: 1,
      next_conversation,
    }
  }

  /// Three sample conversations; the first carries a short thread.
  pub fn sample() -> Self {
    let conversation = |id, contact: &str, channel, last: &str, waiting: &str, unread, status| {
      Conversation {
        id,
        owner: None,
        contact: contact.to_owned(),
        channel,
        last_message: last.to_owned(),
        waiting: waiting.to_owned(),
        unread,
        status,
        initials: initials(contact),
      }
    };

    let mut inbox = Self::new(vec![
      conversation(
        1,
        "Maria Silva",
        Channel::WhatsApp,
        "I need to reschedule my appointment",
        "2min",
        2,
        PresenceStatus::Online,
      ),
      conversation(
        2,
        "João Santos",
        Channel::Instagram,
        "What are your opening hours?",
        "5min",
        1,
        PresenceStatus::Away,
      ),
      conversation(
        3,
        "Ana Costa",
        Channel::Email,
        "Thanks for the help!",
        "1h",
        0,
        PresenceStatus::Offline,
      ),
    ]);

    for (direction, content, (h, m), delivery) in [
      (
        Direction::Received,
        "Hi! I need to reschedule tomorrow's appointment",
        (14, 23),
        Delivery::Delivered,
      ),
      (
        Direction::Sent,
        "Hi Maria! Sure, let me check the available slots for you.",
        (14, 24),
        Delivery::Read,
      ),
      (
        Direction::Received,
        "Would next week work?",
        (14, 25),
        Delivery::Delivered,
      ),
    ] {
      let at = NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default();
      inbox.push(1, direction, content.to_owned(), at, delivery);
    }
    inbox
  }

  /// Every conversation, regardless of who is looking.
  pub fn conversations(&self) -> &[Conversation] { &self.conversations }

  /// The conversations `actor` may see when acting as `role`, in list order.
  pub fn visible<'a>(
    &'a self,
    actor: &ActorId,
    role: Role,
  ) -> impl Iterator<Item = &'a Conversation> {
    let all = role.can(Capability::ViewAllHistory);
    let own = role.can(Capability::ViewOwnHistory);
    self
      .conversations
      .iter()
      .filter(move |c| all || (own && c.owner.as_ref() == Some(actor)))
  }

  /// The actor's selected conversation, or the first visible one.
  pub fn selected(&self, actor: &ActorId, role: Role) -> Option<&Conversation> {
    self
      .cursors
      .get(actor)
      .and_then(|id| self.visible(actor, role).find(|c| c.id == *id))
      .or_else(|| self.visible(actor, role).next())
  }

  pub fn thread(&self, actor: &ActorId, role: Role) -> &[Message] {
    self
      .selected(actor, role)
      .and_then(|c| self.threads.get(&c.id))
      .map(Vec::as_slice)
      .unwrap_or_default()
  }

  pub fn view(&self, actor: &ActorId, role: Role) -> InboxView<'_> {
    InboxView {
      conversations: self.visible(actor, role).collect(),
      selected:      self.selected(actor, role).map(|c| c.id),
      thread:        self.thread(actor, role),
      can_send:      can_send(role),
    }
  }

  /// Select the conversation at `index` in the actor's visible list.
  ///
  /// Staff selecting a conversation marks it read.
  pub fn select(&mut self, actor: &ActorId, role: Role, index: usize) -> Result<&Conversation> {
    let id = self
      .visible(actor, role)
      .nth(index)
      .map(|c| c.id)
      .ok_or(Error::NoSuchConversation(index))?;
    self.cursors.insert(actor.clone(), id);

    let conversation = self
      .conversations
      .iter_mut()
      .find(|c| c.id == id)
      .ok_or(Error::NoSuchConversation(index))?;
    if role.can(Capability::ViewAllHistory) {
      conversation.unread = 0;
    }
    Ok(&*conversation)
  }

  /// Start a conversation owned by `owner` and select it for them.
  pub fn open(&mut self, owner: ActorId, contact: &str, channel: Channel) -> &Conversation {
    let id = self.next_conversation;
    self.next_conversation += 1;
    self.cursors.insert(owner.clone(), id);
    self.conversations.push(Conversation {
      id,
      owner: Some(owner),
      contact: contact.to_owned(),
      channel,
      last_message: String::new(),
      waiting: "now".to_owned(),
      unread: 0,
      status: PresenceStatus::Online,
      initials: initials(contact),
    });
    &self.conversations[self.conversations.len() - 1]
  }

  /// Append a message to the actor's selected conversation.
  ///
  /// Staff replies are outgoing; anything else arrives from the contact
  /// side and counts as unread. Surrounding whitespace is trimmed; nothing
  /// is sent if the result is empty.
  pub fn send(&mut self, actor: &ActorId, role: Role, text: &str, at: NaiveTime) -> Result<&Message> {
    if !can_send(role) {
      return Err(Error::MissingCapability(Capability::SendMessages));
    }
    let text = text.trim();
    if text.is_empty() {
      return Err(Error::EmptyMessage);
    }
    let id = self
      .selected(actor, role)
      .map(|c| c.id)
      .ok_or(Error::NoConversationSelected)?;

    let direction = if role.can(Capability::ReplyToConversations) {
      Direction::Sent
    } else {
      Direction::Received
    };

    if let Some(conversation) = self.conversations.iter_mut().find(|c| c.id == id) {
      conversation.last_message = text.to_owned();
      if direction == Direction::Received {
        conversation.unread += 1;
        conversation.waiting = "now".to_owned();
      }
    }

    let at = at.with_nanosecond(0).unwrap_or(at);
    Ok(self.push(id, direction, text.to_owned(), at, Delivery::Delivered))
  }

  fn push(
    &mut self,
    conversation: u64,
    direction: Direction,
    content: String,
    at: NaiveTime,
    delivery: Delivery,
  ) -> &Message {
    let message = Message { id: self.next_message, direction, content, at, delivery };
    self.next_message += 1;
    let thread = self.threads.entry(conversation).or_default();
    thread.push(message);
    &thread[thread.len() - 1]
  }
}

fn can_send(role: Role) -> bool {
  role.can(Capability::SendMessages) || role.can(Capability::ReplyToConversations)
}

fn initials(name: &str) -> String {
  name
    .split_whitespace()
    .filter_map(|w| w.chars().next())
    .flat_map(char::to_uppercase)
    .take(2)
    .collect()
}
