use crc32fast::Hasher;
use elemental_proto::{BlockId, Channel};

/// Seed for a channel's block ids, stable across sessions
pub fn channel_seed(channel: Channel) -> String {
    let mut hasher = Hasher::new();
    hasher.update(format!("elemental://{}", channel).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for blocks within a document
///
/// The codec numbers blocks in document pre-order, so converting the same
/// content twice yields the same ids and selections survive re-conversion.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn for_channel(channel: Channel) -> Self {
        Self::from_seed(channel_seed(channel))
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn next_id(&mut self) -> BlockId {
        self.count += 1;
        BlockId::new(format!("{}-{}", self.seed, self.count))
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}
