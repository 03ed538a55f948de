//! # Elemental Editor
//!
//! Editing-session state for Elemental content.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ codec: ElementalContent ⇄ EditingState      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: one open document                   │
//! │  - Apply mutations with validation          │
//! │  - Snapshot undo/redo                       │
//! │  - Debounced persistence per channel        │
//! │  - Channel add/remove/switch                │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ caller: save ElementalContent               │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Elemental is source of truth**: the editing tree is a derived view
//! 2. **Single writer**: all read-modify-write cycles go through the session
//! 3. **Explicit time**: debouncing is driven by `Instant`s the caller passes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use elemental_editor::{EditSession, Mutation, SessionConfig};
//!
//! let mut session = EditSession::open(Codec::default(), Some(content), Channel::Email, SessionConfig::default());
//! session.apply(Mutation::SetTitle { title: "Welcome".into() }, Instant::now())?;
//!
//! // Later, from the caller's timer
//! if let Some(content) = session.tick(Instant::now()) {
//!     save(content);
//! }
//! ```

mod debounce;
mod errors;
mod fetch_gate;
pub mod inline;
mod location;
mod mutations;
mod session;
mod undo_stack;

pub use debounce::Debouncer;
pub use errors::EditorError;
pub use fetch_gate::FetchGate;
pub use mutations::{node_kind, Mutation, MutationError, MutationResult};
pub use session::{EditSession, SessionConfig};
pub use undo_stack::{HistoryEntry, UndoStack};

// Re-export common types for convenience
pub use elemental_codec::{Codec, EditingState};
pub use elemental_proto::{BlockId, Channel, ElementalContent};
