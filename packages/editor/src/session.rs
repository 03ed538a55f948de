//! # Edit Session Management
//!
//! An EditSession is the single writer for one open document. It holds the
//! editing state of the active channel next to the last persisted
//! `ElementalContent`, and turns edits into new persisted content once the
//! user pauses.
//!
//! ```text
//! apply(mutation, now) ──▶ EditingState ──▶ Debouncer (dirty channel)
//!                                                │ tick(now)
//!                                                ▼
//!                  to_elemental + apply_channel_update ──▶ ElementalContent
//! ```

use crate::debounce::Debouncer;
use crate::undo_stack::UndoStack;
use crate::{EditorError, Mutation};
use elemental_codec::{
    apply_channel_update, channel_seed, decode_content, default_channel_node, remove_channel,
    Codec, Diagnostic, EditingState, IdGenerator,
};
use elemental_proto::{
    walk_block, Block, BlockId, Channel, ChannelNode, ChannelPatch, ElementalContent, TreeVisitor,
};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Session tuning
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Undo depth (0 = unlimited)
    pub undo_levels: usize,

    /// Quiet period before edits are persisted
    pub debounce: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            undo_levels: 100,
            debounce: Duration::from_millis(500),
        }
    }
}

/// Single edit session over one document
pub struct EditSession {
    codec: Codec,
    config: SessionConfig,

    /// Active channel being edited
    state: EditingState,

    /// Last content handed back to the caller for saving
    persisted: Option<ElementalContent>,

    history: UndoStack,

    /// Current selection, by block id
    selection: Option<BlockId>,

    debouncer: Debouncer<Channel>,

    /// Diagnostics from opening the active channel
    diagnostics: Vec<Diagnostic>,

    local_ids: IdGenerator,
}

impl EditSession {
    /// Open `channel` of `content`. A channel the document does not have yet
    /// starts from its default nodes.
    pub fn open(
        codec: Codec,
        content: Option<ElementalContent>,
        channel: Channel,
        config: SessionConfig,
    ) -> Self {
        let mut session = Self {
            codec,
            history: UndoStack::with_max_levels(config.undo_levels),
            debouncer: Debouncer::new(config.debounce),
            config,
            state: EditingState::empty(channel),
            persisted: content,
            selection: None,
            diagnostics: Vec::new(),
            local_ids: local_ids(channel),
        };
        session.load_channel(channel);
        session
    }

    /// Open from serialized Elemental content
    pub fn from_json(
        codec: Codec,
        json: &str,
        channel: Channel,
        config: SessionConfig,
    ) -> Result<Self, EditorError> {
        let content = decode_content(json)?;
        Ok(Self::open(codec, Some(content), channel, config))
    }

    pub fn channel(&self) -> Channel {
        self.state.channel
    }

    pub fn state(&self) -> &EditingState {
        &self.state
    }

    pub fn persisted(&self) -> Option<&ElementalContent> {
        self.persisted.as_ref()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn selection(&self) -> Option<&BlockId> {
        self.selection.as_ref()
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn is_dirty(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Apply an edit and schedule persistence
    pub fn apply(&mut self, mutation: Mutation, now: Instant) -> Result<(), EditorError> {
        self.history.apply(&mutation, &mut self.state)?;
        self.after_edit(now);
        Ok(())
    }

    /// Group the following edits into one undo step
    pub fn begin_batch(&mut self, description: impl Into<String>) {
        self.history.begin_batch();
        self.history.set_batch_description(description);
    }

    pub fn end_batch(&mut self) {
        self.history.end_batch();
    }

    pub fn undo(&mut self, now: Instant) -> bool {
        let undone = self.history.undo(&mut self.state);
        if undone {
            self.after_edit(now);
        }
        undone
    }

    pub fn redo(&mut self, now: Instant) -> bool {
        let redone = self.history.redo(&mut self.state);
        if redone {
            self.after_edit(now);
        }
        redone
    }

    pub fn select(&mut self, block_id: Option<BlockId>) -> Result<(), EditorError> {
        if let Some(id) = &block_id {
            if self.state.document.find(id).is_none() {
                return Err(EditorError::BlockNotFound(id.clone()));
            }
        }
        self.selection = block_id;
        Ok(())
    }

    /// An id not used anywhere in the active channel
    pub fn new_block_id(&mut self) -> BlockId {
        loop {
            let id = self.local_ids.next_id();
            if self.state.document.find(&id).is_none() {
                return id;
            }
        }
    }

    /// Persist if the debounce window has elapsed
    pub fn tick(&mut self, now: Instant) -> Option<ElementalContent> {
        self.debouncer.poll(now)?;
        Some(self.persist())
    }

    /// Persist pending edits immediately
    pub fn flush(&mut self) -> Option<ElementalContent> {
        self.debouncer.flush()?;
        Some(self.persist())
    }

    /// Switch the active channel, persisting pending edits of the current one
    pub fn switch_channel(&mut self, channel: Channel) -> Option<ElementalContent> {
        let flushed = self.flush();
        if channel != self.state.channel {
            self.load_channel(channel);
        }
        flushed
    }

    /// Add a channel with its default content and make it active
    pub fn add_channel(&mut self, channel: Channel) -> ElementalContent {
        self.flush();
        let exists = self
            .persisted
            .as_ref()
            .map_or(false, |content| content.channel(channel).is_some());

        if !exists {
            let defaults = default_channel_node(channel);
            let patch = ChannelPatch {
                channel,
                elements: defaults.elements,
                raw: defaults.raw,
            };
            self.persisted = Some(apply_channel_update(self.persisted.as_ref(), patch));
            info!(%channel, "Added channel");
        }

        self.load_channel(channel);
        self.current_content()
    }

    /// Remove a channel. If it was active, the first remaining channel opens.
    pub fn remove_channel(&mut self, channel: Channel) -> Result<ElementalContent, EditorError> {
        self.flush();
        let content = self
            .persisted
            .as_ref()
            .filter(|content| content.channel(channel).is_some())
            .ok_or(EditorError::ChannelNotFound(channel))?;

        let updated = remove_channel(content, channel);
        let Some(next) = updated.channels().next() else {
            return Err(EditorError::LastChannel(channel));
        };

        self.persisted = Some(updated.clone());
        if self.state.channel == channel {
            self.load_channel(next);
        }
        info!(%channel, "Removed channel");
        Ok(updated)
    }

    /// Replace the persisted content with a fresh copy from elsewhere.
    /// Pending edits and history are dropped.
    ///
    /// Ids are positional, so the selection follows the selected block's
    /// content rather than its id: it stays on the same id if that block is
    /// unchanged, moves to the one block elsewhere with identical content,
    /// and is cleared otherwise.
    pub fn reload(&mut self, content: ElementalContent) {
        self.debouncer.cancel();
        self.persisted = Some(content);
        let selected = self
            .selection
            .take()
            .and_then(|id| self.state.document.find(&id).cloned());
        self.load_channel(self.state.channel);
        self.selection = selected.and_then(|block| self.reselect(&block));
    }

    fn reselect(&self, previous: &Block) -> Option<BlockId> {
        if let Some(block) = self.state.document.find(&previous.id) {
            if block.same_content(previous) {
                return Some(previous.id.clone());
            }
        }

        let mut matches = SameContent {
            target: previous,
            found: Vec::new(),
        };
        matches.visit_document(&self.state.document);
        match matches.found.as_slice() {
            [id] => Some(id.clone()),
            found => {
                debug!(id = %previous.id, candidates = found.len(), "Dropped selection on reload");
                None
            }
        }
    }

    fn load_channel(&mut self, channel: Channel) {
        let node = self
            .persisted
            .as_ref()
            .and_then(|content| content.channel(channel))
            .cloned()
            .unwrap_or_else(|| default_channel_node(channel));

        self.open_node(&node);
    }

    fn open_node(&mut self, node: &ChannelNode) {
        let converted = self.codec.to_editing_tree(node);
        self.state = converted.value;
        self.diagnostics = converted.diagnostics;
        self.history = UndoStack::with_max_levels(self.config.undo_levels);
        self.selection = None;
        self.local_ids = local_ids(node.channel);
        debug!(channel = %node.channel, "Opened channel");
    }

    fn after_edit(&mut self, now: Instant) {
        if let Some(id) = &self.selection {
            if self.state.document.find(id).is_none() {
                self.selection = None;
            }
        }
        self.debouncer.push(self.state.channel, now);
    }

    fn persist(&mut self) -> ElementalContent {
        let patch = self.codec.to_elemental(&self.state).value;
        let updated = apply_channel_update(self.persisted.as_ref(), patch);
        info!(channel = %self.state.channel, "Persisted channel");
        self.persisted = Some(updated.clone());
        updated
    }

    fn current_content(&self) -> ElementalContent {
        self.persisted
            .clone()
            .unwrap_or_else(|| ElementalContent::new(Vec::new()))
    }
}

/// Ids of every block whose content equals `target`
struct SameContent<'a> {
    target: &'a Block,
    found: Vec<BlockId>,
}

impl TreeVisitor for SameContent<'_> {
    fn visit_block(&mut self, block: &Block) {
        if block.same_content(self.target) {
            self.found.push(block.id.clone());
        }
        walk_block(self, block);
    }
}

fn local_ids(channel: Channel) -> IdGenerator {
    IdGenerator::from_seed(format!("{}-local", channel_seed(channel)))
}
