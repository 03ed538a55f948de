//! Forward compatibility: content the codec does not understand

use elemental_codec::proto::{BlockBody, Inline};
use elemental_codec::{decode_channel, Codec, DiagnosticKind, DiagnosticLevel, NodePath};

#[test]
fn test_unknown_node_between_text_nodes() {
    let channel = decode_channel(
        r#"{
            "type": "channel",
            "channel": "email",
            "elements": [
                { "type": "text", "content": "before" },
                { "type": "poll", "question": "Pizza?", "options": ["yes", "no"] },
                { "type": "text", "content": "after" }
            ]
        }"#,
    )
    .unwrap();

    let converted = Codec::default().to_editing_tree(&channel);
    let blocks = &converted.value.document.content;

    assert_eq!(blocks.len(), 2);
    assert_eq!(
        blocks[0].body,
        BlockBody::Paragraph {
            content: vec![Inline::text("before")]
        }
    );
    assert_eq!(
        blocks[1].body,
        BlockBody::Paragraph {
            content: vec![Inline::text("after")]
        }
    );

    assert_eq!(converted.diagnostics.len(), 1);
    let diagnostic = &converted.diagnostics[0];
    assert_eq!(diagnostic.level, DiagnosticLevel::Warning);
    assert_eq!(diagnostic.path, NodePath::root().child(1));
    assert_eq!(
        diagnostic.kind,
        DiagnosticKind::UnrecognizedNode {
            type_name: Some("poll".to_string())
        }
    );
}

#[test]
fn test_missing_type_and_malformed_nodes() {
    let channel = decode_channel(
        r#"{
            "type": "channel",
            "channel": "email",
            "elements": [
                { "content": "no type" },
                { "type": "action", "content": 42 },
                { "type": "quote", "elements": [{ "type": "future-widget" }] }
            ]
        }"#,
    )
    .unwrap();

    let converted = Codec::default().to_editing_tree(&channel);
    let kinds: Vec<&DiagnosticKind> = converted.diagnostics.iter().map(|d| &d.kind).collect();

    assert!(matches!(kinds[0], DiagnosticKind::UnrecognizedNode { type_name: None }));
    assert!(matches!(kinds[1], DiagnosticKind::MalformedNode { node, .. } if node == "action"));
    assert!(matches!(
        kinds[2],
        DiagnosticKind::UnrecognizedNode { type_name: Some(name) } if name == "future-widget"
    ));
    assert_eq!(converted.diagnostics[2].path, NodePath::root().child(2).child(0));

    // Only the quote survives, and it is empty
    assert_eq!(converted.value.document.content.len(), 1);
    assert_eq!(
        converted.value.document.content[0].body,
        BlockBody::Blockquote { content: vec![] }
    );
}

#[test]
fn test_malformed_attributes_fall_back_to_defaults() {
    let channel = decode_channel(
        r#"{
            "type": "channel",
            "channel": "email",
            "elements": [
                { "type": "divider", "size": 5000, "color": "not a color" },
                { "type": "text", "content": "x", "text_style": "h7" }
            ]
        }"#,
    )
    .unwrap();

    let converted = Codec::default().to_editing_tree(&channel);
    let blocks = &converted.value.document.content;

    assert_eq!(blocks[0].attrs["size"], 1);
    assert_eq!(blocks[0].attrs["color"], "#dddddd");
    assert!(matches!(blocks[1].body, BlockBody::Paragraph { .. }));
    assert_eq!(converted.warnings().count(), 3);
}
