use criterion::{black_box, criterion_group, criterion_main, Criterion};
use elemental_codec::proto::ChannelNode;
use elemental_codec::{decode_channel, Codec};

fn newsletter(sections: usize) -> ChannelNode {
    let section = r##"
        { "type": "text", "text_style": "h2", "content": "Section title" },
        { "type": "text", "elements": [
            { "type": "string", "content": "Hello " },
            { "type": "variable", "name": "first_name" },
            { "type": "string", "content": ", this week we ", "bold": true },
            { "type": "string", "content": "shipped", "bold": true, "href": "https://example.com" }
        ] },
        { "type": "image", "src": "https://cdn.example.com/hero.png", "width": "320px" },
        { "type": "list", "list_type": "ordered", "elements": [
            { "type": "list-item", "elements": [{ "type": "text", "content": "one" }] },
            { "type": "list-item", "elements": [{ "type": "text", "content": "two" }] }
        ] },
        { "type": "action", "content": "Read more", "href": "https://example.com" },
        { "type": "divider" }
    "##;

    let elements = vec![section; sections].join(",");
    let json = format!(
        r#"{{ "type": "channel", "channel": "email", "elements": [{{ "type": "meta", "title": "Weekly" }}, {}] }}"#,
        elements
    );
    decode_channel(&json).unwrap()
}

fn to_editing_tree_small(c: &mut Criterion) {
    let codec = Codec::default();
    let channel = newsletter(1);

    c.bench_function("to_editing_tree_small", |b| {
        b.iter(|| codec.to_editing_tree(black_box(&channel)))
    });
}

fn to_editing_tree_large(c: &mut Criterion) {
    let codec = Codec::default();
    let channel = newsletter(100);

    c.bench_function("to_editing_tree_large", |b| {
        b.iter(|| codec.to_editing_tree(black_box(&channel)))
    });
}

fn to_elemental_large(c: &mut Criterion) {
    let codec = Codec::default();
    let state = codec.to_editing_tree(&newsletter(100)).value;

    c.bench_function("to_elemental_large", |b| {
        b.iter(|| codec.to_elemental(black_box(&state)))
    });
}

fn normalize_large(c: &mut Criterion) {
    let codec = Codec::default();
    let channel = newsletter(100);

    c.bench_function("normalize_large", |b| {
        b.iter(|| codec.normalize(black_box(&channel.elements)))
    });
}

criterion_group!(
    benches,
    to_editing_tree_small,
    to_editing_tree_large,
    to_elemental_large,
    normalize_large
);
criterion_main!(benches);
