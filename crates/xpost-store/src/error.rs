use xpost_types::PacketId;

/// Errors from record store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A writer panicked while holding the store lock.
    #[error("{0} store lock poisoned")]
    LockPoisoned(&'static str),

    /// The id space of a store is exhausted.
    #[error("{0} store id space exhausted")]
    IdExhausted(&'static str),

    /// The packet already has a recorded terminal outcome.
    #[error("packet {0} already settled")]
    AlreadySettled(PacketId),

    /// Bulk import into a store that already holds records.
    #[error("cannot import into non-empty {0} store")]
    NotEmpty(&'static str),

    /// Bulk import data is inconsistent.
    #[error("invalid {kind} import: {reason}")]
    InvalidImport { kind: &'static str, reason: String },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
