use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

use tracing::debug;
use xpost_types::PacketId;

use crate::error::{StoreError, StoreResult};
use crate::record::Record;
use crate::settlement::Settlement;
use crate::traits::{RecordStore, SettlementStore};

/// In-memory, `BTreeMap`-based append-only log.
///
/// Intended for tests, simulations, and embedding. Records are held behind a
/// `RwLock`: appends take the write lock, so they are serialized, while
/// reads share the lock.
pub struct InMemoryRecordStore<R> {
    inner: RwLock<LogState<R>>,
}

struct LogState<R> {
    records: BTreeMap<u64, R>,
    next_id: u64,
}

impl<R: Record> InMemoryRecordStore<R> {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(LogState {
                records: BTreeMap::new(),
                next_id: 0,
            }),
        }
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.inner.read().map(|s| s.records.len()).unwrap_or(0)
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The most recently appended record.
    pub fn last(&self) -> StoreResult<Option<R>> {
        let state = self.read_state()?;
        Ok(state.records.values().next_back().cloned())
    }

    fn read_state(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, LogState<R>>> {
        self.inner.read().map_err(|_| StoreError::LockPoisoned(R::KIND))
    }

    fn write_state(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, LogState<R>>> {
        self.inner.write().map_err(|_| StoreError::LockPoisoned(R::KIND))
    }
}

impl<R: Record> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> RecordStore<R> for InMemoryRecordStore<R> {
    fn append(&self, mut record: R) -> StoreResult<u64> {
        let mut state = self.write_state()?;
        let id = state.next_id;
        let next_id = id.checked_add(1).ok_or(StoreError::IdExhausted(R::KIND))?;
        record.set_id(id);
        state.records.insert(id, record);
        state.next_id = next_id;
        debug!(kind = R::KIND, id, "record appended");
        Ok(id)
    }

    fn get(&self, id: u64) -> StoreResult<Option<R>> {
        let state = self.read_state()?;
        Ok(state.records.get(&id).cloned())
    }

    fn list(&self) -> StoreResult<Vec<R>> {
        let state = self.read_state()?;
        Ok(state.records.values().cloned().collect())
    }

    fn count(&self) -> StoreResult<u64> {
        Ok(self.read_state()?.next_id)
    }

    fn import(&self, records: Vec<R>, count: u64) -> StoreResult<()> {
        let mut state = self.write_state()?;
        if !state.records.is_empty() || state.next_id != 0 {
            return Err(StoreError::NotEmpty(R::KIND));
        }

        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            let id = record.id();
            if !seen.insert(id) {
                return Err(StoreError::InvalidImport {
                    kind: R::KIND,
                    reason: format!("duplicate id {id}"),
                });
            }
            if id >= count {
                return Err(StoreError::InvalidImport {
                    kind: R::KIND,
                    reason: format!("id {id} is not below count {count}"),
                });
            }
        }

        state.records = records.into_iter().map(|r| (r.id(), r)).collect();
        state.next_id = count;
        debug!(kind = R::KIND, records = state.records.len(), count, "records imported");
        Ok(())
    }
}

impl<R: Record> std::fmt::Debug for InMemoryRecordStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRecordStore")
            .field("kind", &R::KIND)
            .field("record_count", &self.len())
            .finish()
    }
}

/// In-memory settlement log.
#[derive(Default)]
pub struct InMemorySettlementStore {
    settled: RwLock<BTreeMap<PacketId, Settlement>>,
}

impl InMemorySettlementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of settled packets.
    pub fn len(&self) -> usize {
        self.settled.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SettlementStore for InMemorySettlementStore {
    fn settle(&self, packet: PacketId, settlement: Settlement) -> StoreResult<()> {
        let mut map = self
            .settled
            .write()
            .map_err(|_| StoreError::LockPoisoned("settlement"))?;
        if map.contains_key(&packet) {
            return Err(StoreError::AlreadySettled(packet));
        }
        debug!(packet = %packet, outcome = settlement.label(), "packet settled");
        map.insert(packet, settlement);
        Ok(())
    }

    fn get(&self, packet: &PacketId) -> StoreResult<Option<Settlement>> {
        let map = self
            .settled
            .read()
            .map_err(|_| StoreError::LockPoisoned("settlement"))?;
        Ok(map.get(packet).cloned())
    }

    fn list(&self) -> StoreResult<Vec<(PacketId, Settlement)>> {
        let map = self
            .settled
            .read()
            .map_err(|_| StoreError::LockPoisoned("settlement"))?;
        Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl std::fmt::Debug for InMemorySettlementStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySettlementStore")
            .field("settled_count", &self.len())
            .finish()
    }
}
