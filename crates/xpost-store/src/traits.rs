use xpost_types::{PacketId, PostRecord, SentPostRecord, TimedOutPostRecord};

use crate::error::StoreResult;
use crate::record::Record;
use crate::settlement::Settlement;

/// Append-only log of records keyed by store-assigned ids.
///
/// All implementations must satisfy these invariants:
/// - `append` assigns `count()` as the new record's id, then increments the
///   count. Ids are strictly increasing and never reused.
/// - Appended records are never modified or removed.
/// - A failed call leaves the store unchanged.
pub trait RecordStore<R: Record>: Send + Sync {
    /// Append a record and return the id it was stored under.
    fn append(&self, record: R) -> StoreResult<u64>;

    /// Read a record by id. Returns `Ok(None)` if no such id was assigned.
    fn get(&self, id: u64) -> StoreResult<Option<R>>;

    /// All records in id order.
    fn list(&self) -> StoreResult<Vec<R>>;

    /// The next id to be assigned.
    fn count(&self) -> StoreResult<u64>;

    /// Load records with pre-assigned ids into an empty store.
    ///
    /// Every id must be unique and below `count`; the next append uses
    /// `count` as its id.
    fn import(&self, records: Vec<R>, count: u64) -> StoreResult<()>;
}

/// Posts created on this chain from remote payloads.
pub type PostStore = dyn RecordStore<PostRecord>;

/// Posts the counterparty acknowledged.
pub type SentPostStore = dyn RecordStore<SentPostRecord>;

/// Posts whose packets expired.
pub type TimedOutPostStore = dyn RecordStore<TimedOutPostRecord>;

/// Terminal outcome of each originated packet.
pub trait SettlementStore: Send + Sync {
    /// Record the outcome of `packet`.
    ///
    /// Fails with [`StoreError::AlreadySettled`](crate::StoreError::AlreadySettled)
    /// if the packet already has one; the existing outcome is kept.
    fn settle(&self, packet: PacketId, settlement: Settlement) -> StoreResult<()>;

    /// The recorded outcome of `packet`, if any.
    fn get(&self, packet: &PacketId) -> StoreResult<Option<Settlement>>;

    /// All settled packets in packet id order.
    fn list(&self) -> StoreResult<Vec<(PacketId, Settlement)>>;

    fn is_settled(&self, packet: &PacketId) -> StoreResult<bool> {
        Ok(self.get(packet)?.is_some())
    }
}
