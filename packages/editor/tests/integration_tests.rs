//! Integration tests for editor crate

use elemental_editor::{Channel, Codec, EditSession, EditorError, Mutation, SessionConfig};
use elemental_proto::{BlockBody, ContentNode, Inline, Mark};
use std::time::{Duration, Instant};

const CONTENT: &str = r#"{
    "version": "2022-01-01",
    "elements": [
        {
            "type": "channel",
            "channel": "email",
            "raw": { "subject": "Weekly digest" },
            "elements": [
                { "type": "text", "content": "Hello there" },
                { "type": "image", "src": "https://cdn.example.com/hero.png" }
            ]
        },
        {
            "type": "channel",
            "channel": "sms",
            "elements": [{ "type": "text", "content": "Hi" }]
        }
    ]
}"#;

fn open(channel: Channel) -> EditSession {
    EditSession::from_json(Codec::default(), CONTENT, channel, SessionConfig::default()).unwrap()
}

#[test]
fn test_edit_session_workflow() {
    let start = Instant::now();
    let mut session = open(Channel::Email);
    let paragraph = session.state().document.content[0].id.clone();

    session
        .apply(
            Mutation::ApplyMark {
                block_id: paragraph.clone(),
                start: 0,
                end: 5,
                mark: Mark::Bold,
            },
            start,
        )
        .unwrap();
    session
        .apply(
            Mutation::SetTitle {
                title: "Monthly digest".to_string(),
            },
            start + Duration::from_millis(200),
        )
        .unwrap();

    // Still inside the window of the second edit
    assert!(session.tick(start + Duration::from_millis(600)).is_none());

    let content = session.tick(start + Duration::from_millis(700)).unwrap();
    let email = content.channel(Channel::Email).unwrap();

    // Title stays in raw.subject, no meta node appears
    assert_eq!(
        email.raw.as_ref().and_then(|raw| raw.subject.as_deref()),
        Some("Monthly digest")
    );
    assert!(!email.elements.iter().any(|n| matches!(n, ContentNode::Meta(_))));

    match &email.elements[0] {
        ContentNode::Text(text) => {
            let elements = text.elements.as_ref().unwrap();
            assert_eq!(elements.len(), 2);
        }
        other => panic!("expected text, got {:?}", other),
    }

    // The other channel is untouched
    assert_eq!(
        content.channel(Channel::Sms).unwrap().elements,
        vec![ContentNode::text("Hi")]
    );
}

#[test]
fn test_undo_reschedules_persistence() {
    let start = Instant::now();
    let mut session = open(Channel::Sms);
    let block = session.state().document.content[0].id.clone();

    session
        .apply(
            Mutation::InsertText {
                block_id: block,
                offset: 2,
                text: " there".to_string(),
            },
            start,
        )
        .unwrap();
    session.flush().unwrap();

    assert!(session.undo(start));
    let content = session.flush().unwrap();
    assert_eq!(
        content.channel(Channel::Sms).unwrap().elements,
        vec![ContentNode::text("Hi")]
    );
}

#[test]
fn test_switch_channel_flushes_pending_edits() {
    let mut session = open(Channel::Sms);
    let block = session.state().document.content[0].id.clone();
    session
        .apply(
            Mutation::ReplaceInline {
                block_id: block,
                content: vec![Inline::text("Bye")],
            },
            Instant::now(),
        )
        .unwrap();

    let flushed = session.switch_channel(Channel::Email).unwrap();
    assert_eq!(
        flushed.channel(Channel::Sms).unwrap().elements,
        vec![ContentNode::text("Bye")]
    );
    assert_eq!(session.channel(), Channel::Email);
    assert!(!session.history().can_undo());
}

#[test]
fn test_add_and_remove_channels() {
    let mut session = open(Channel::Email);

    let content = session.add_channel(Channel::Push);
    let channels: Vec<Channel> = content.channels().collect();
    assert_eq!(channels, vec![Channel::Email, Channel::Sms, Channel::Push]);
    assert_eq!(session.channel(), Channel::Push);
    assert_eq!(session.state().title.as_str(), "");

    let content = session.remove_channel(Channel::Push).unwrap();
    assert!(content.channel(Channel::Push).is_none());
    assert_eq!(session.channel(), Channel::Email);

    assert!(matches!(
        session.remove_channel(Channel::Slack),
        Err(EditorError::ChannelNotFound(Channel::Slack))
    ));
}

#[test]
fn test_selection_survives_reload() {
    let mut session = open(Channel::Email);
    let image = session.state().document.content[1].id.clone();
    session.select(Some(image.clone())).unwrap();

    let content = session.persisted().unwrap().clone();
    session.reload(content);

    assert_eq!(session.selection(), Some(&image));
    assert!(matches!(
        session.state().document.content[1].body,
        BlockBody::ImageBlock
    ));
}

#[test]
fn test_selection_follows_block_after_insert_before_it() {
    let mut session = open(Channel::Email);
    let image = session.state().document.content[1].id.clone();
    session.select(Some(image.clone())).unwrap();

    let mut content = session.persisted().unwrap().clone();
    content.elements[0]
        .elements
        .insert(0, ContentNode::text("Inserted elsewhere"));
    session.reload(content);

    let document = &session.state().document;
    let selected = session.selection().unwrap();
    assert_ne!(selected, &image);
    assert_eq!(selected, &document.content[2].id);
    assert!(matches!(document.find(selected).unwrap().body, BlockBody::ImageBlock));
    assert!(matches!(document.find(&image).unwrap().body, BlockBody::Paragraph { .. }));
}

#[test]
fn test_selection_dropped_when_reloaded_block_changed() {
    let mut session = open(Channel::Email);
    let paragraph = session.state().document.content[0].id.clone();
    session.select(Some(paragraph)).unwrap();

    let mut content = session.persisted().unwrap().clone();
    content.elements[0].elements[0] = ContentNode::text("Rewritten by someone else");
    session.reload(content);

    assert_eq!(session.selection(), None);
}

#[test]
fn test_selection_cleared_when_block_removed() {
    let mut session = open(Channel::Email);
    let image = session.state().document.content[1].id.clone();
    session.select(Some(image.clone())).unwrap();

    session
        .apply(Mutation::RemoveBlock { block_id: image }, Instant::now())
        .unwrap();
    assert_eq!(session.selection(), None);
}

#[test]
fn test_invalid_json_is_reported() {
    let result = EditSession::from_json(
        Codec::default(),
        "{ not json",
        Channel::Email,
        SessionConfig::default(),
    );
    assert!(matches!(result, Err(EditorError::Codec(_))));
}
