//! Error types for the editor

use elemental_proto::{BlockId, Channel};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Codec error: {0}")]
    Codec(#[from] elemental_codec::CodecError),

    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Channel {0} is not part of the document")]
    ChannelNotFound(Channel),

    #[error("Cannot remove {0}: it is the only channel")]
    LastChannel(Channel),
}
