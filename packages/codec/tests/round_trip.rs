//! Round-trip tests: Elemental → editing tree → Elemental
//!
//! Every node type is converted both with the minimal attribute set and with
//! every declared attribute populated. The result must be semantically equal
//! to the input. Inputs written without default attributes must come back
//! byte for byte, node for node.

use elemental_codec::proto::{BlockBody, ChannelNode, ContentNode, ContentVisitor, ListDepth};
use elemental_codec::{decode_channel, parse_json, Codec, CodecOptions, DiagnosticKind};
use serde_json::Value;

fn channel(elements: &str) -> ChannelNode {
    let json = format!(
        r#"{{ "type": "channel", "channel": "email", "elements": {} }}"#,
        elements
    );
    decode_channel(&json).unwrap()
}

fn assert_round_trip(elements: &str) {
    let codec = Codec::default();
    let input = channel(elements);
    let output = codec.round_trip(&input);

    assert!(
        output.is_clean(),
        "unexpected diagnostics: {:?}",
        output.diagnostics
    );
    assert!(
        codec.semantically_equal(&input.elements, &output.value.elements),
        "round trip changed content\n  in:  {}\n  out: {}",
        serde_json::to_string(&input.elements).unwrap(),
        serde_json::to_string(&output.value.elements).unwrap()
    );
}

/// Compare the written nodes with the input JSON itself
fn assert_exact_round_trip(elements: &str) {
    let codec = Codec::default();
    let output = codec.round_trip(&channel(elements));

    assert!(
        output.is_clean(),
        "unexpected diagnostics: {:?}",
        output.diagnostics
    );
    let expected: Value = parse_json(elements).unwrap();
    let actual = serde_json::to_value(&output.value.elements).unwrap();
    assert_eq!(actual, expected);
}

#[test]
fn test_text_minimal() {
    assert_round_trip(r#"[{ "type": "text", "content": "Hello" }]"#);
}

#[test]
fn test_text_fully_populated() {
    assert_round_trip(
        r##"[{
            "type": "text",
            "text_style": "h2",
            "align": "right",
            "color": "#ff0000",
            "background_color": "#eeeeee",
            "padding": "10px 20px",
            "border": { "enabled": true, "color": "#000000", "size": "1px" },
            "elements": [
                { "type": "string", "content": "Hi ", "bold": true },
                { "type": "variable", "name": "first_name" },
                { "type": "string", "content": ", see ", "italic": true, "underline": true },
                { "type": "string", "content": "this", "href": "https://example.com", "strikethrough": true }
            ]
        }]"##,
    );
}

#[test]
fn test_empty_text() {
    assert_round_trip(r#"[{ "type": "text", "content": "" }]"#);
}

#[test]
fn test_image_minimal() {
    assert_round_trip(r#"[{ "type": "image", "src": "https://cdn.example.com/a.png" }]"#);
}

#[test]
fn test_image_fully_populated() {
    assert_round_trip(
        r#"[{
            "type": "image",
            "src": "https://cdn.example.com/a.png",
            "href": "https://example.com",
            "alt_text": "Logo",
            "width": "240px",
            "align": "left",
            "border": { "enabled": true, "radius": 4 }
        }]"#,
    );
}

#[test]
fn test_action_minimal() {
    assert_round_trip(r#"[{ "type": "action", "content": "Sign up", "href": "https://example.com" }]"#);
}

#[test]
fn test_action_fully_populated() {
    assert_round_trip(
        r##"[{
            "type": "action",
            "content": "Read more",
            "href": "https://example.com/post",
            "style": "link",
            "align": "left",
            "background_color": "#123456",
            "color": "#abcdef",
            "padding": "12px 24px",
            "border_radius": 12
        }]"##,
    );
}

#[test]
fn test_divider_and_spacer() {
    assert_round_trip(r#"[{ "type": "divider" }]"#);
    assert_round_trip(
        r##"[{ "type": "divider", "variant": "spacer", "size": 24, "color": "#ffffff", "padding": "0px" }]"##,
    );
}

#[test]
fn test_html() {
    assert_round_trip(r#"[{ "type": "html", "content": "<table><tr><td>x</td></tr></table>" }]"#);
}

#[test]
fn test_quote() {
    assert_round_trip(
        r##"[{
            "type": "quote",
            "border_color": "#333333",
            "elements": [
                { "type": "text", "content": "To be or not to be" },
                { "type": "text", "elements": [{ "type": "string", "content": "Hamlet", "italic": true }] }
            ]
        }]"##,
    );
}

#[test]
fn test_list() {
    assert_round_trip(
        r#"[{
            "type": "list",
            "list_type": "ordered",
            "elements": [
                { "type": "list-item", "elements": [{ "type": "text", "content": "one" }] },
                { "type": "list-item", "elements": [{ "type": "text", "content": "two" }] }
            ]
        }]"#,
    );
}

#[test]
fn test_meta_and_variable() {
    assert_round_trip(
        r#"[
            { "type": "meta", "title": "Welcome aboard" },
            { "type": "variable", "name": "promo_code" },
            { "type": "text", "content": "Thanks" }
        ]"#,
    );
}

#[test]
fn test_exact_lone_variable_text() {
    assert_exact_round_trip(r#"[{ "type": "text", "elements": [{ "type": "variable", "name": "x" }] }]"#);
}

#[test]
fn test_exact_standalone_variable() {
    assert_exact_round_trip(
        r#"[
            { "type": "variable", "name": "promo_code" },
            { "type": "variable", "name": "code", "align": "center" },
            { "type": "text", "content": "Thanks" }
        ]"#,
    );
}

#[test]
fn test_exact_meta_not_first() {
    assert_exact_round_trip(
        r#"[
            { "type": "text", "content": "body" },
            { "type": "meta", "title": "T" },
            { "type": "divider" }
        ]"#,
    );
}

#[test]
fn test_exact_blockquote_spelling() {
    assert_exact_round_trip(
        r#"[
            { "type": "blockquote", "elements": [{ "type": "text", "content": "a" }] },
            { "type": "quote", "elements": [{ "type": "text", "content": "b" }] }
        ]"#,
    );
}

#[test]
fn test_exact_run_fields() {
    assert_exact_round_trip(
        r##"[{
            "type": "text",
            "elements": [
                { "type": "string", "content": "red", "color": "#ff0000" },
                { "type": "string", "content": " bold", "bold": true },
                { "type": "variable", "name": "first_name" }
            ]
        }]"##,
    );
}

#[test]
fn test_wrong_typed_flag_is_repaired() {
    let codec = Codec::default();
    let input = channel(
        r#"[{
            "type": "text",
            "elements": [
                { "type": "string", "content": "Welcome", "bold": "true" },
                { "type": "string", "content": " rest" }
            ]
        }]"#,
    );
    let output = codec.round_trip(&input);

    assert_eq!(output.value.elements, vec![ContentNode::text("Welcome rest")]);
    assert_eq!(output.diagnostics.len(), 1);
    assert!(matches!(
        &output.diagnostics[0].kind,
        DiagnosticKind::MalformedAttribute { attribute, .. } if attribute == "elements[0].bold"
    ));
}

#[test]
fn test_undeclared_attributes_survive() {
    let codec = Codec::default();
    let input = channel(r#"[{ "type": "text", "content": "x", "locales": { "fr": "y" } }]"#);
    let output = codec.round_trip(&input).value;

    match &output.elements[0] {
        ContentNode::Text(text) => assert_eq!(text.attrs["locales"]["fr"], "y"),
        other => panic!("expected text, got {:?}", other),
    }
}

#[test]
fn test_emit_default_attributes() {
    let codec = Codec::new(CodecOptions {
        emit_default_attributes: true,
    });
    let input = channel(r#"[{ "type": "image", "src": "a.png" }]"#);
    let output = codec.round_trip(&input).value;

    match &output.elements[0] {
        ContentNode::Image(image) => {
            assert_eq!(image.attrs["width"], "100%");
            assert_eq!(image.attrs["align"], "center");
        }
        other => panic!("expected image, got {:?}", other),
    }
    assert!(codec.semantically_equal(&input.elements, &output.elements));
}

#[test]
fn test_five_level_list_nesting() {
    fn nested(depth: usize) -> String {
        if depth == 0 {
            return r#"{ "type": "text", "content": "leaf" }"#.to_string();
        }
        format!(
            r#"{{ "type": "list", "elements": [
                {{ "type": "list-item", "elements": [{{ "type": "text", "content": "level {depth}" }}] }},
                {{ "type": "list-item", "elements": [{inner}] }}
            ] }}"#,
            depth = depth,
            inner = nested(depth - 1)
        )
    }

    let elements = format!("[{}]", nested(5));
    assert_round_trip(&elements);

    // Walk the tree down five lists, checking order at every level
    let codec = Codec::default();
    let tree = codec.to_editing_tree(&channel(&elements)).value.document;
    let mut blocks = &tree.content;
    for depth in (1..=5).rev() {
        let items = match &blocks[0].body {
            BlockBody::List { items, .. } => items,
            other => panic!("expected list at depth {}, got {:?}", depth, other),
        };
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].content[0].body,
            BlockBody::Paragraph {
                content: vec![elemental_codec::proto::Inline::text(format!("level {}", depth))]
            }
        );
        blocks = &items[1].content;
    }
    assert!(matches!(blocks[0].body, BlockBody::Paragraph { .. }));
}

#[test]
fn test_deep_list_nesting() {
    const DEPTH: usize = 40;

    let mut node = r#"{ "type": "text", "content": "leaf" }"#.to_string();
    for _ in 0..DEPTH {
        node = format!(
            r#"{{ "type": "list", "elements": [{{ "type": "list-item", "elements": [{}] }}] }}"#,
            node
        );
    }
    let elements = format!("[{}]", node);

    let input = channel(&elements);
    let mut depth = ListDepth::default();
    for node in &input.elements {
        depth.visit_node(node);
    }
    assert_eq!(depth.max, DEPTH);

    assert_exact_round_trip(&elements);
}

#[test]
fn test_conversion_is_deterministic() {
    let codec = Codec::default();
    let input = channel(
        r#"[{ "type": "text", "content": "a" }, { "type": "list", "elements": [{ "type": "list-item", "elements": [] }] }]"#,
    );

    assert_eq!(codec.to_editing_tree(&input), codec.to_editing_tree(&input));
    assert_eq!(codec.round_trip(&input), codec.round_trip(&input));
}
