//! Local record storage for xpost.
//!
//! Every side effect of the post module lands in one of these stores:
//!
//! - [`RecordStore`] -- append-only log with store-assigned, strictly
//!   increasing ids. Used for posts, sent posts, and timed-out posts.
//! - [`SettlementStore`] -- terminal outcome of each originated packet,
//!   keyed by [`PacketId`](xpost_types::PacketId).
//!
//! # Backends
//!
//! - [`InMemoryRecordStore`] / [`InMemorySettlementStore`] -- `RwLock`-guarded
//!   maps for tests, simulations, and embedding
//!
//! # Design Rules
//!
//! 1. Records are never updated or removed once appended.
//! 2. Ids are assigned by the store and never reused.
//! 3. Appends for one store are serialized; reads may run concurrently.
//! 4. A packet settles at most once.

pub mod error;
pub mod memory;
pub mod record;
pub mod settlement;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryRecordStore, InMemorySettlementStore};
pub use record::Record;
pub use settlement::Settlement;
pub use traits::{PostStore, RecordStore, SentPostStore, SettlementStore, TimedOutPostStore};
