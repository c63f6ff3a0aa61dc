use chrono::{DateTime, NaiveDate, Utc};

use crate::message::Message;

/// One entry in the flat render sequence the presentation layer consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineEntry {
    /// Calendar-day boundary before the first message of a new day.
    DayDivider { label: String },
    Message(Message),
    /// The counterpart is composing a reply.
    TypingIndicator,
    /// Canned suggested replies, shown until the first local send.
    QuickOptions(Vec<String>),
}

/// Assembles the flat render sequence for the current session state.
///
/// Pure function of its inputs: one O(n) walk over the messages, emitting
/// a divider whenever the calendar-day bucket changes, then the transient
/// markers. The bucket comparison key is the `NaiveDate` itself; the
/// human-readable label is a separate derivation of the same date, never
/// the comparison key.
pub fn build_timeline(
    messages: &[Message],
    is_typing: bool,
    quick_options: Option<&[String]>,
) -> Vec<TimelineEntry> {
    let mut entries = Vec::with_capacity(messages.len() + 4);
    let mut last_bucket: Option<NaiveDate> = None;

    for message in messages {
        let bucket = message.timestamp.date_naive();
        if last_bucket != Some(bucket) {
            entries.push(TimelineEntry::DayDivider {
                label: format_day_label(bucket),
            });
            last_bucket = Some(bucket);
        }
        entries.push(TimelineEntry::Message(message.clone()));
    }

    if is_typing {
        entries.push(TimelineEntry::TypingIndicator);
    }

    if let Some(options) = quick_options {
        entries.push(TimelineEntry::QuickOptions(options.to_vec()));
    }

    entries
}

/// Formats a day bucket for the divider pill, e.g. "Mon, Aug 18".
pub fn format_day_label(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}

/// Formats a message timestamp for the bubble corner, e.g. "09:30 AM".
pub fn format_clock_time(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%I:%M %p").to_string()
}

/// Header status line under the counterpart's name.
pub fn header_status(is_typing: bool) -> &'static str {
    if is_typing { "Typing..." } else { "online" }
}
