use std::time::Duration;

use palaver_session::{
    ChatSession, ReplyPreview, Sender, SessionConfig, SessionEvents, TimelineEntry, demo_history,
};

fn seeded_session() -> (ChatSession, SessionEvents) {
    ChatSession::with_history(SessionConfig::default(), demo_history())
}

/// Lets already-woken tasks run without advancing the paused clock.
async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn send_appends_one_me_message_with_a_fresh_id() {
    let (mut session, _events) = seeded_session();
    let before = session.messages().len();
    let prior_ids: Vec<_> = session.messages().iter().map(|m| m.id).collect();

    let id = session.send_message("hi").expect("non-blank send");

    assert_eq!(session.messages().len(), before + 1);
    let sent = session.messages().last().expect("just appended");
    assert_eq!(sent.id, id);
    assert_eq!(sent.sender, Sender::Me);
    assert!(!prior_ids.contains(&id));
}

#[tokio::test(start_paused = true)]
async fn blank_sends_are_no_ops() {
    let (mut session, _events) = seeded_session();
    let before = session.messages().len();

    assert_eq!(session.send_message(""), None);
    assert_eq!(session.send_message("   "), None);

    assert_eq!(session.messages().len(), before);
    assert!(!session.is_typing());
}

#[tokio::test(start_paused = true)]
async fn typing_flips_on_immediately_and_off_after_the_delay() {
    let (mut session, mut events) = seeded_session();

    session.send_message("hi");
    assert!(session.is_typing());
    assert_eq!(session.header_status(), "Typing...");

    // Just short of the configured delay nothing has fired yet.
    tokio::time::advance(Duration::from_millis(2_400)).await;
    settle().await;
    assert!(events.try_recv().is_none());
    assert!(session.is_typing());

    let event = events.recv().await.expect("timer fires at the deadline");
    session.handle_event(event);

    assert!(!session.is_typing());
    assert_eq!(session.header_status(), "online");

    let reply = session.messages().last().expect("reply appended");
    assert_eq!(reply.sender, Sender::Other);
    assert_eq!(reply.text.as_deref(), Some("This is Gale's reply 😊"));
}

#[tokio::test(start_paused = true)]
async fn resending_while_typing_yields_a_single_reply() {
    let (mut session, mut events) = seeded_session();
    let seeded = session.messages().len();

    session.send_message("first");
    tokio::time::advance(Duration::from_millis(1_000)).await;
    settle().await;
    session.send_message("second");

    let event = events.recv().await.expect("superseding timer fires");
    session.handle_event(event);

    settle().await;
    while let Some(stale) = events.try_recv() {
        session.handle_event(stale);
    }

    let replies = session
        .messages()
        .iter()
        .filter(|message| message.sender == Sender::Other)
        .count();
    let seeded_replies = demo_history()
        .iter()
        .filter(|message| message.sender == Sender::Other)
        .count();
    assert_eq!(replies, seeded_replies + 1);
    assert_eq!(session.messages().len(), seeded + 3);
    assert!(!session.is_typing());
}

#[tokio::test(start_paused = true)]
async fn tearing_the_session_down_cancels_the_pending_reply() {
    let (mut session, mut events) = seeded_session();

    session.send_message("hi");
    assert!(session.is_typing());
    drop(session);

    // The timer task is aborted and all senders are gone, so the channel
    // closes without ever delivering a reply event.
    assert_eq!(events.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn cancel_pending_reply_returns_to_idle_without_a_reply() {
    let (mut session, mut events) = seeded_session();
    let before = session.messages().len();

    session.send_message("hi");
    session.cancel_pending_reply();
    assert!(!session.is_typing());

    tokio::time::advance(Duration::from_millis(5_000)).await;
    settle().await;
    assert!(events.try_recv().is_none());
    assert_eq!(session.messages().len(), before + 1);
}

#[tokio::test(start_paused = true)]
async fn reply_target_is_frozen_into_the_sent_message_and_cleared() {
    let (mut session, _events) = seeded_session();
    let target = session.messages()[3].clone();

    session.set_reply_target(Some(target.clone()));
    session.send_message("about that");

    let sent = session.messages().last().expect("just appended");
    assert_eq!(sent.reply_to, Some(ReplyPreview::of(&target)));
    assert_eq!(session.reply_target(), None);
}

#[tokio::test(start_paused = true)]
async fn deleting_the_quoted_message_keeps_the_frozen_preview() {
    let (mut session, _events) = seeded_session();
    let target = session.messages()[3].clone();

    session.set_reply_target(Some(target.clone()));
    session.send_message("about that");
    assert!(session.delete_message(target.id));

    let sent = session.messages().last().expect("reply survives");
    let preview = sent.reply_to.as_ref().expect("snapshot survives");
    assert_eq!(preview.text, target.text);
    assert_eq!(preview.sender, target.sender);
}

#[tokio::test(start_paused = true)]
async fn quick_options_disappear_after_the_first_send() {
    let (mut session, _events) = seeded_session();

    let has_quick_options = |timeline: &[TimelineEntry]| {
        timeline
            .iter()
            .any(|entry| matches!(entry, TimelineEntry::QuickOptions(_)))
    };

    assert!(has_quick_options(&session.timeline()));
    session.send_message("hi");
    assert!(!has_quick_options(&session.timeline()));
}

#[tokio::test(start_paused = true)]
async fn composer_submit_drains_the_draft() {
    let (mut session, _events) = seeded_session();
    let before = session.messages().len();

    session.set_composer_text("   ");
    assert_eq!(session.send_from_composer(), None);
    assert_eq!(session.messages().len(), before);

    session.set_composer_text("typed in the input bar");
    let id = session.send_from_composer().expect("non-blank draft");

    assert_eq!(session.messages().last().map(|m| m.id), Some(id));
    assert!(session.composer().is_blank());
}

#[tokio::test(start_paused = true)]
async fn reacting_to_an_unknown_id_changes_nothing() {
    let (mut session, _events) = seeded_session();
    let before: Vec<_> = session.messages().to_vec();

    assert!(!session.react_to_message(palaver_session::MessageId::new(999), "👍"));
    assert_eq!(session.messages(), before.as_slice());
}

#[tokio::test(start_paused = true)]
async fn timeline_shows_typing_marker_while_a_reply_is_pending() {
    let (mut session, mut events) = seeded_session();

    session.send_message("hi");
    assert!(matches!(
        session.timeline().last(),
        Some(TimelineEntry::TypingIndicator)
    ));

    let event = events.recv().await.expect("timer fires");
    session.handle_event(event);

    assert!(!session
        .timeline()
        .iter()
        .any(|entry| matches!(entry, TimelineEntry::TypingIndicator)));
}
