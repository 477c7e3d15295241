use xpost_types::{PostRecord, SentPostRecord, TimedOutPostRecord};

/// A value that can live in a [`RecordStore`](crate::RecordStore).
///
/// The store owns the `id` field: whatever id a record carries on append is
/// overwritten with the next free id.
pub trait Record: Clone + Send + Sync + 'static {
    /// Short name used in errors and logs.
    const KIND: &'static str;

    fn id(&self) -> u64;

    fn set_id(&mut self, id: u64);
}

impl Record for PostRecord {
    const KIND: &'static str = "post";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl Record for SentPostRecord {
    const KIND: &'static str = "sent-post";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl Record for TimedOutPostRecord {
    const KIND: &'static str = "timed-out-post";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}
