use thiserror::Error;
use xpost_types::{ChannelState, PacketId};

/// Errors raised by the channel transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("channel not found: port {port}, channel {channel}")]
    ChannelNotFound { port: String, channel: String },

    #[error("channel {port}/{channel} already exists")]
    ChannelExists { port: String, channel: String },

    #[error("channel {port}/{channel} is {state}, expected OPEN")]
    ChannelNotOpen {
        port: String,
        channel: String,
        state: ChannelState,
    },

    #[error("capability does not authenticate {0}")]
    CapabilityNotAuthenticated(String),

    #[error("packet destination {got} does not match counterparty {expected}")]
    CounterpartyMismatch { expected: String, got: String },

    #[error("packet sequence {got} does not match expected {expected}")]
    SequenceMismatch { expected: u64, got: u64 },

    #[error("packet must set a timeout height or timestamp")]
    MissingTimeout,

    #[error("no commitment for packet {0}")]
    PacketCommitmentNotFound(PacketId),

    #[error("packet {0} already received")]
    DuplicateReceipt(PacketId),

    #[error("channel state lock poisoned")]
    LockPoisoned,
}

pub type ChannelResult<T> = Result<T, ChannelError>;
