use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("packet data too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("unrecognized packet type")]
    UnknownPacketType,

    #[error("unsupported acknowledgement format: {0}")]
    UnsupportedAck(String),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
