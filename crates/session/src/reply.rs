use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::session::SessionEvent;

/// Identifier for one scheduled simulated reply.
///
/// A fresh id is allocated for every send so a late event from a
/// superseded timer can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReplySessionId(pub u64);

impl ReplySessionId {
    /// Creates a typed reply session identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Typing-indicator lifecycle for the simulated counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypingState {
    #[default]
    Idle,
    Typing(ReplySessionId),
}

/// State transition input for the typing lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingTransition {
    Start(ReplySessionId),
    Finish(ReplySessionId),
    Cancel(ReplySessionId),
}

/// Rejection reason for illegal typing transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingRejection {
    NotTyping,
    SessionMismatch {
        active: ReplySessionId,
        attempted: ReplySessionId,
    },
}

/// Result type for typing transition application.
pub type TypingTransitionResult = Result<TypingState, TypingRejection>;

impl TypingState {
    /// Returns the pending reply session if and only if typing is active.
    pub fn active_session(&self) -> Option<ReplySessionId> {
        match self {
            Self::Typing(session) => Some(*session),
            Self::Idle => None,
        }
    }

    /// Returns true when a timer event matches the pending session.
    pub fn accepts(&self, session: ReplySessionId) -> bool {
        matches!(self, Self::Typing(active) if *active == session)
    }

    /// Applies one transition deterministically.
    ///
    /// `Start` is legal from `Typing`: a new send supersedes the pending
    /// reply and its timer, so at most one simulated reply is ever in
    /// flight. `Finish` and `Cancel` must name the active session exactly.
    pub fn apply(&self, transition: TypingTransition) -> TypingTransitionResult {
        match transition {
            TypingTransition::Start(session) => Ok(Self::Typing(session)),
            TypingTransition::Finish(session) | TypingTransition::Cancel(session) => match self {
                Self::Typing(active) if *active == session => Ok(Self::Idle),
                Self::Typing(active) => Err(TypingRejection::SessionMismatch {
                    active: *active,
                    attempted: session,
                }),
                Self::Idle => Err(TypingRejection::NotTyping),
            },
        }
    }
}

/// Guard for the scheduled reply task.
///
/// Dropping the guard aborts the timer, so session teardown and
/// send-while-typing both cancel the pending reply deterministically.
#[derive(Debug)]
pub struct ReplyTimer {
    session: ReplySessionId,
    handle: JoinHandle<()>,
}

impl ReplyTimer {
    /// Schedules the simulated reply: after `delay`, one
    /// `ReplyTimerFired` event is pushed into the session channel.
    pub fn spawn(
        session: ReplySessionId,
        delay: Duration,
        events: UnboundedSender<SessionEvent>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if events
                .send(SessionEvent::ReplyTimerFired { session })
                .is_err()
            {
                tracing::debug!(session = session.0, "session gone before reply timer fired");
            }
        });
        Self { session, handle }
    }

    /// The session this timer will report for.
    pub fn session(&self) -> ReplySessionId {
        self.session
    }
}

impl Drop for ReplyTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
