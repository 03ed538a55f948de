//! # Elemental Codec
//!
//! Converts one channel of Elemental content into the editing document tree
//! and back.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ ElementalContent (persisted, per channel)    │
//! └──────────────────────────────────────────────┘
//!          │ to_editing_tree          ▲ apply_channel_update
//!          ▼                          │
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │ EditingState         │──▶│ ChannelPatch         │
//! │  doc + title + raw   │   │  nodes + raw         │
//! └──────────────────────┘   └──────────────────────┘
//!              to_elemental
//! ```
//!
//! ## Guarantees
//!
//! 1. **Pure**: no I/O, no shared state; identical input gives identical output
//! 2. **Never fails**: unknown nodes and bad attributes become diagnostics
//! 3. **Round-trip**: `to_elemental(to_editing_tree(x))` is semantically equal
//!    to `x` (see [`normalize`])
//! 4. **Title location is sticky**: a title read from `raw.subject` is written
//!    back to `raw.subject`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use elemental_codec::Codec;
//!
//! let codec = Codec::default();
//! let state = codec.to_editing_tree(&channel).value;
//! // ... the editing surface mutates state.document ...
//! let patch = codec.to_elemental(&state).value;
//! let content = elemental_codec::apply_channel_update(Some(&content), patch);
//! ```

mod channel;
mod codec;
mod defaults;
mod diagnostics;
mod error;
mod id_generator;
pub mod normalize;
mod title;
mod to_elemental;
mod to_tree;

pub use channel::{apply_channel_update, remove_channel};
pub use codec::{to_editing_tree, to_elemental, Codec, CodecOptions, EditingState};
pub use defaults::{channel_defaults, default_channel_node};
pub use diagnostics::{Converted, Diagnostic, DiagnosticKind, DiagnosticLevel, NodePath};
pub use error::{
    decode_channel, decode_content, encode_content, parse_json, CodecError, CodecResult,
};
pub use id_generator::{channel_seed, IdGenerator};
pub use normalize::{normalize_channel, normalize_nodes, semantically_equal};
pub use title::{read_title, write_title, TitleLocation, TitleState};

// Re-export the data model for convenience
pub use elemental_proto as proto;
pub use elemental_schema as schema;
