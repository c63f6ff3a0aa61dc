//! Chat session core: the message store, timeline assembly, and the
//! simulated-reply state machine behind a mobile-style chat screen.
//!
//! The presentation layer is an external collaborator. It drives the
//! session through [`ChatSession`]'s operations, renders the flat
//! sequence returned by [`ChatSession::timeline`], and forwards events
//! from [`SessionEvents`] back into [`ChatSession::handle_event`].

pub mod composer;
pub mod config;
pub mod message;
pub mod reply;
pub mod session;
pub mod store;
pub mod timeline;

pub use composer::{COMPOSER_BASE_HEIGHT, COMPOSER_LINE_HEIGHT, Composer};
pub use config::{ConfigError, ConfigResult, ConfigStore, SessionConfig};
pub use message::{Message, MessageId, ReplyPreview, Sender};
pub use reply::{
    ReplySessionId, ReplyTimer, TypingRejection, TypingState, TypingTransition,
    TypingTransitionResult,
};
pub use session::{ChatSession, SessionEvent, SessionEvents};
pub use store::{MessageStore, demo_history};
pub use timeline::{
    TimelineEntry, build_timeline, format_clock_time, format_day_label, header_status,
};
