use chrono::Utc;
use tokio::sync::mpsc;

use crate::composer::Composer;
use crate::config::SessionConfig;
use crate::message::{Message, MessageId, ReplyPreview, Sender};
use crate::reply::{ReplySessionId, ReplyTimer, TypingState, TypingTransition};
use crate::store::MessageStore;
use crate::timeline::{TimelineEntry, build_timeline, header_status};

/// Events produced by the reply timer and applied back on the session
/// owner's thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The simulated counterpart finished "typing".
    ReplyTimerFired { session: ReplySessionId },
}

/// Receiver half of the session event channel.
pub struct SessionEvents {
    events: mpsc::UnboundedReceiver<SessionEvent>,
}

impl SessionEvents {
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        self.events.recv().await
    }

    pub fn try_recv(&mut self) -> Option<SessionEvent> {
        self.events.try_recv().ok()
    }
}

/// Single owner of one chat session's state: the message list plus the
/// transient flags the chat screen renders.
///
/// Every mutation goes through the operations below on one logical
/// thread. The only asynchronous collaborator is the reply timer, which
/// reports back through the event channel; events are applied with
/// `handle_event`, never concurrently. Sending schedules that timer on
/// the ambient tokio runtime, so the session must live inside one.
pub struct ChatSession {
    store: MessageStore,
    config: SessionConfig,
    composer: Composer,
    reply_target: Option<Message>,
    quick_options_visible: bool,
    typing: TypingState,
    next_message_id: u64,
    next_reply_session_id: u64,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    // Dropping the guard aborts the pending timer, so tearing the whole
    // session down cancels any in-flight simulated reply.
    reply_timer: Option<ReplyTimer>,
}

impl ChatSession {
    /// Creates an empty session plus the receiver its timer events land on.
    pub fn new(config: SessionConfig) -> (Self, SessionEvents) {
        Self::with_history(config, Vec::new())
    }

    /// Creates a session seeded with an existing message history.
    pub fn with_history(config: SessionConfig, messages: Vec<Message>) -> (Self, SessionEvents) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let store = MessageStore::with_messages(messages);
        let next_message_id = store.max_id().saturating_add(1);
        let composer = Composer::new(config.max_composer_chars, config.max_composer_lines);

        let session = Self {
            store,
            composer,
            reply_target: None,
            quick_options_visible: true,
            typing: TypingState::Idle,
            next_message_id,
            next_reply_session_id: 1,
            events_tx,
            reply_timer: None,
            config,
        };

        (session, SessionEvents { events: events_rx })
    }

    /// Sends a local message.
    ///
    /// Whitespace-only text is silently ignored. Otherwise the message is
    /// appended with the current reply target frozen into it, the reply
    /// target is cleared, quick options are hidden, and the simulated
    /// reply is (re)scheduled.
    pub fn send_message(&mut self, text: &str) -> Option<MessageId> {
        if text.trim().is_empty() {
            tracing::debug!("ignoring send of blank message");
            return None;
        }

        let id = self.alloc_message_id();
        let mut message = Message::text(id, Sender::Me, Utc::now(), text);
        if let Some(target) = self.reply_target.take() {
            message = message.with_reply(ReplyPreview::of(&target));
        }

        self.store.append(message);
        self.quick_options_visible = false;
        self.schedule_reply();

        Some(id)
    }

    /// Submits whatever the composer holds and clears it.
    pub fn send_from_composer(&mut self) -> Option<MessageId> {
        if self.composer.is_blank() {
            return None;
        }

        let text = self.composer.take();
        self.send_message(&text)
    }

    /// Applies one event from the session channel.
    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::ReplyTimerFired { session } => self.finish_simulated_reply(session),
        }
    }

    /// Appends `emoji` to an existing message's reactions; unknown ids
    /// are a silent no-op.
    pub fn react_to_message(&mut self, id: MessageId, emoji: impl Into<String>) -> bool {
        self.store.add_reaction(id, emoji)
    }

    /// Selects (or clears) the message quoted by the next send.
    pub fn set_reply_target(&mut self, target: Option<Message>) {
        self.reply_target = target;
    }

    /// Removes a message; reply previews that quoted it keep their frozen
    /// snapshot. Unknown ids are a silent no-op.
    pub fn delete_message(&mut self, id: MessageId) -> bool {
        self.store.remove(id)
    }

    pub fn set_quick_options_visible(&mut self, visible: bool) {
        self.quick_options_visible = visible;
    }

    pub fn set_composer_text(&mut self, text: &str) {
        self.composer.set_text(text);
    }

    /// Cancels the pending simulated reply, if any. Useful when the chat
    /// screen is torn down while the session itself lives on.
    pub fn cancel_pending_reply(&mut self) {
        let Some(timer) = self.reply_timer.take() else {
            return;
        };

        match self.typing.apply(TypingTransition::Cancel(timer.session())) {
            Ok(next) => self.typing = next,
            Err(rejection) => tracing::debug!(?rejection, "typing transition rejected"),
        }
    }

    /// Recomputes the flat render sequence for the current state.
    pub fn timeline(&self) -> Vec<TimelineEntry> {
        let quick_options = self
            .quick_options_visible
            .then(|| self.config.quick_options.as_slice());
        build_timeline(self.store.messages(), self.is_typing(), quick_options)
    }

    pub fn is_typing(&self) -> bool {
        self.typing.active_session().is_some()
    }

    pub fn reply_target(&self) -> Option<&Message> {
        self.reply_target.as_ref()
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Header status line: "Typing..." while a reply is pending, else
    /// "online".
    pub fn header_status(&self) -> &'static str {
        header_status(self.is_typing())
    }

    fn schedule_reply(&mut self) {
        // Dropping the previous guard aborts its timer, so at most one
        // simulated reply is in flight per session.
        if let Some(previous) = self.reply_timer.take() {
            tracing::debug!(
                session = previous.session().0,
                "superseding pending simulated reply"
            );
        }

        let session = self.alloc_reply_session_id();
        match self.typing.apply(TypingTransition::Start(session)) {
            Ok(next) => self.typing = next,
            Err(rejection) => {
                tracing::debug!(?rejection, "typing transition rejected");
                return;
            }
        }

        self.reply_timer = Some(ReplyTimer::spawn(
            session,
            self.config.reply_delay,
            self.events_tx.clone(),
        ));
    }

    fn finish_simulated_reply(&mut self, session: ReplySessionId) {
        if !self.typing.accepts(session) {
            // A superseded timer can still have an event queued; strict
            // session equality keeps it from producing a second reply.
            tracing::debug!(session = session.0, "ignoring stale reply timer");
            return;
        }

        match self.typing.apply(TypingTransition::Finish(session)) {
            Ok(next) => self.typing = next,
            Err(rejection) => {
                tracing::debug!(?rejection, "typing transition rejected");
                return;
            }
        }
        self.reply_timer = None;

        let id = self.alloc_message_id();
        let reply = Message::text(id, Sender::Other, Utc::now(), self.config.reply_text.clone());
        self.store.append(reply);
        tracing::debug!(id = id.0, "appended simulated reply");
    }

    fn alloc_message_id(&mut self) -> MessageId {
        let id = MessageId::new(self.next_message_id);
        self.next_message_id = self.next_message_id.saturating_add(1);
        id
    }

    fn alloc_reply_session_id(&mut self) -> ReplySessionId {
        let id = ReplySessionId::new(self.next_reply_session_id);
        self.next_reply_session_id = self.next_reply_session_id.saturating_add(1);
        id
    }
}
