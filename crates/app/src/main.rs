//! Headless demo driver for the chat session core.
//!
//! Stands in for the presentation layer: it seeds the dummy history,
//! renders the timeline as text, performs one scripted send, and waits
//! for the simulated reply to land.

use palaver_session::{ChatSession, ConfigStore, TimelineEntry, demo_history, format_clock_time};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config_store = ConfigStore::load();
    if !ConfigStore::default_config_path().exists() {
        // Write the defaults out so they can be edited for the next run.
        let defaults = config_store.config().clone();
        if let Err(error) = config_store.update(defaults) {
            tracing::warn!("could not write default config: {error}");
        }
    }
    let config = config_store.config().clone();
    let counterpart = config.counterpart_name.clone();

    let (mut session, mut events) = ChatSession::with_history(config, demo_history());

    render_screen(&session, &counterpart);

    let target = session.messages().last().cloned();
    session.set_reply_target(target);
    tracing::info!("sending a scripted message");
    session.send_message("Looks great, let's ship it 🚀");

    render_screen(&session, &counterpart);

    while session.is_typing() {
        let Some(event) = events.recv().await else {
            break;
        };
        session.handle_event(event);
    }

    render_screen(&session, &counterpart);
}

fn render_screen(session: &ChatSession, counterpart: &str) {
    println!("\n== {counterpart} ({}) ==", session.header_status());
    for entry in session.timeline() {
        match entry {
            TimelineEntry::DayDivider { label } => println!("  ----- {label} -----"),
            TimelineEntry::Message(message) => {
                let who = message.sender.display_name(counterpart);
                let time = format_clock_time(message.timestamp);

                if let Some(preview) = &message.reply_to {
                    let quoted = preview.sender.display_name(counterpart);
                    let text = preview.text.as_deref().unwrap_or("[image]");
                    println!("  | {quoted}: {text}");
                }

                let body = match (&message.text, &message.image) {
                    (Some(text), _) => text.clone(),
                    (None, Some(uri)) => format!("[image: {uri}]"),
                    (None, None) => String::new(),
                };
                println!("  {who} [{time}]: {body}");

                if !message.reactions.is_empty() {
                    println!("      {}", message.reactions.join(" "));
                }
            }
            TimelineEntry::TypingIndicator => println!("  {counterpart} is typing..."),
            TimelineEntry::QuickOptions(options) => {
                println!("  quick replies: {}", options.join(" | "));
            }
        }
    }
}
