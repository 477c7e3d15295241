use thiserror::Error;
use xpost_channel::ChannelError;
use xpost_store::StoreError;

/// Errors returned by the post module.
///
/// No variant leaves a partial write behind: every operation finishes its
/// checks before touching a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostError {
    #[error("channel not found: port ID ({port}) channel ID ({channel})")]
    ChannelNotFound { port: String, channel: String },

    #[error("sequence send not found: source port {port}, source channel {channel}")]
    SequenceNotFound { port: String, channel: String },

    #[error("module does not own channel capability {path}")]
    CapabilityMissing { path: String },

    #[error("cannot encode packet: {0}")]
    Encoding(String),

    #[error("invalid post: {0}")]
    Validation(String),

    #[error("cannot decode acknowledgement result: {0}")]
    AckDecode(String),

    #[error("counterparty does not implement the acknowledgement format: {0}")]
    UnsupportedAckFormat(String),

    #[error("cannot decode packet data: {0}")]
    PacketDecode(String),

    #[error("unrecognized packet type")]
    UnknownPacketType,

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("invalid genesis: {0}")]
    Genesis(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("module writer lock poisoned")]
    LockPoisoned,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),
}

pub type PostResult<T> = Result<T, PostError>;
