use chrono::{DateTime, TimeZone, Utc};

use crate::message::{Message, MessageId, Sender};

/// Ordered owner of one chat session's messages.
///
/// List order is arrival order; messages are only ever appended, so no
/// ordering pass is needed. All operations are synchronous and run on
/// the session's single logical thread.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
}

impl MessageStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with an existing history.
    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Finds a message by id.
    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|message| message.id == id)
    }

    /// Appends a fully formed message at the end of the sequence.
    ///
    /// Callers are responsible for id uniqueness; the store does not
    /// validate it.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Appends `emoji` to the message's reaction list in arrival order.
    ///
    /// Unknown ids are a silent no-op; returns whether the message was
    /// found.
    pub fn add_reaction(&mut self, id: MessageId, emoji: impl Into<String>) -> bool {
        match self.messages.iter_mut().find(|message| message.id == id) {
            Some(message) => {
                message.push_reaction(emoji);
                true
            }
            None => {
                tracing::debug!(id = id.0, "ignoring reaction for unknown message");
                false
            }
        }
    }

    /// Removes a message if present; returns whether anything was removed.
    ///
    /// Reply previews that quoted the removed message keep their frozen
    /// snapshot.
    pub fn remove(&mut self, id: MessageId) -> bool {
        let before = self.messages.len();
        self.messages.retain(|message| message.id != id);
        let removed = self.messages.len() != before;
        if !removed {
            tracing::debug!(id = id.0, "ignoring delete for unknown message");
        }
        removed
    }

    /// Highest id currently in the store; seeds the session's id counter
    /// so fresh ids never collide with a seeded history.
    pub fn max_id(&self) -> u64 {
        self.messages
            .iter()
            .map(|message| message.id.0)
            .max()
            .unwrap_or(0)
    }
}

/// The dummy history the demo ships: five messages across two calendar
/// days, so the timeline renders two day dividers.
pub fn demo_history() -> Vec<Message> {
    vec![
        Message::text(
            MessageId::new(1),
            Sender::Me,
            demo_timestamp(2025, 8, 18, 9, 30),
            "Hey John, how are you?",
        ),
        Message::text(
            MessageId::new(2),
            Sender::Other,
            demo_timestamp(2025, 8, 18, 9, 32),
            "I'm good! How about you?",
        ),
        Message::text(
            MessageId::new(3),
            Sender::Me,
            demo_timestamp(2025, 8, 18, 9, 33),
            "All good here 👍",
        ),
        Message::text(
            MessageId::new(4),
            Sender::Other,
            demo_timestamp(2025, 8, 19, 11, 20),
            "Did you check the report?",
        ),
        Message::text(
            MessageId::new(5),
            Sender::Me,
            demo_timestamp(2025, 8, 19, 11, 25),
            "Yes, looks great!",
        ),
    ]
}

fn demo_timestamp(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}
