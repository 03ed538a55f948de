//! Guard against refetching content that is already loaded or loading
//!
//! The gate remembers the last key a fetch was started for and whether that
//! fetch is still in flight. A new fetch is allowed only for a different key
//! and only while nothing is pending.

use tracing::debug;

#[derive(Debug, Clone)]
pub struct FetchGate<K> {
    last_seen: Option<K>,
    pending: bool,
}

impl<K: PartialEq + Clone + std::fmt::Debug> FetchGate<K> {
    pub fn new() -> Self {
        Self {
            last_seen: None,
            pending: false,
        }
    }

    /// Claim a fetch for `key`. Returns false if it should be skipped.
    pub fn begin(&mut self, key: &K) -> bool {
        if self.pending {
            debug!(?key, "Fetch skipped: another fetch is pending");
            return false;
        }
        if self.last_seen.as_ref() == Some(key) {
            debug!(?key, "Fetch skipped: already loaded");
            return false;
        }
        self.last_seen = Some(key.clone());
        self.pending = true;
        true
    }

    /// The fetch for the last claimed key finished
    pub fn complete(&mut self) {
        self.pending = false;
    }

    /// The fetch failed; the same key may be fetched again
    pub fn fail(&mut self) {
        self.pending = false;
        self.last_seen = None;
    }

    /// Forget everything, e.g. when the user switches to another template
    pub fn reset(&mut self) {
        self.last_seen = None;
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn last_seen(&self) -> Option<&K> {
        self.last_seen.as_ref()
    }
}

impl<K: PartialEq + Clone + std::fmt::Debug> Default for FetchGate<K> {
    fn default() -> Self {
        Self::new()
    }
}
