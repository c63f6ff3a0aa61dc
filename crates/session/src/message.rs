use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier for one message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct MessageId(pub u64);

impl MessageId {
    /// Creates a typed message identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Chat participant. A session has exactly two: the local user and one
/// counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Me,
    Other,
}

impl Sender {
    /// Returns the name shown for this participant, e.g. in quoted reply
    /// previews. The counterpart's name comes from configuration.
    pub fn display_name<'a>(self, counterpart: &'a str) -> &'a str {
        match self {
            Self::Me => "You",
            Self::Other => counterpart,
        }
    }
}

/// Frozen snapshot of a quoted message, captured at reply time.
///
/// This is not a live reference: later reactions to or deletion of the
/// original never propagate here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyPreview {
    pub id: MessageId,
    pub text: Option<String>,
    pub sender: Sender,
}

impl ReplyPreview {
    /// Captures the quoted fields of `message` as they are right now.
    pub fn of(message: &Message) -> Self {
        Self {
            id: message.id,
            text: message.text.clone(),
            sender: message.sender,
        }
    }
}

/// One chat message.
///
/// Created exactly once and never edited in place, except for
/// `reactions`, which is append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// URI of an image payload. A message may carry text, an image, or both.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<ReplyPreview>,
}

impl Message {
    /// Creates a text message.
    pub fn text(
        id: MessageId,
        sender: Sender,
        timestamp: DateTime<Utc>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id,
            text: Some(body.into()),
            image: None,
            sender,
            timestamp,
            reactions: Vec::new(),
            reply_to: None,
        }
    }

    /// Creates an image message.
    pub fn image(
        id: MessageId,
        sender: Sender,
        timestamp: DateTime<Utc>,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            id,
            text: None,
            image: Some(uri.into()),
            sender,
            timestamp,
            reactions: Vec::new(),
            reply_to: None,
        }
    }

    /// Attaches a frozen reply snapshot.
    pub fn with_reply(mut self, reply: ReplyPreview) -> Self {
        self.reply_to = Some(reply);
        self
    }

    /// Appends a reaction emoji. Order is arrival order; duplicates are
    /// allowed and never collapsed.
    pub fn push_reaction(&mut self, emoji: impl Into<String>) {
        self.reactions.push(emoji.into());
    }
}
