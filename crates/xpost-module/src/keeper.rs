use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};
use xpost_channel::{CapabilityKeeper, ChannelKeeper};
use xpost_protocol::{AckOutcome, PostCodec};
use xpost_store::{
    InMemoryRecordStore, InMemorySettlementStore, PostStore, Record, SentPostStore, Settlement,
    SettlementStore, StoreError, TimedOutPostStore,
};
use xpost_types::{
    channel_capability_path, AckResult, Height, Packet, PacketId, PostPayload, PostRecord,
    SentPostRecord, TimedOutPostRecord,
};

use crate::config::ModuleConfig;
use crate::error::{PostError, PostResult};
use crate::genesis::GenesisState;
use crate::hooks::{AckObserver, TracingAckObserver};
use crate::msg::MsgSendIbcPost;

/// Handles to the stores one chain's module writes to.
#[derive(Clone)]
pub struct PostStores {
    pub posts: Arc<PostStore>,
    pub sent_posts: Arc<SentPostStore>,
    pub timed_out_posts: Arc<TimedOutPostStore>,
    pub settlements: Arc<dyn SettlementStore>,
}

impl PostStores {
    /// Fresh in-memory stores.
    pub fn in_memory() -> Self {
        Self {
            posts: Arc::new(InMemoryRecordStore::<PostRecord>::new()),
            sent_posts: Arc::new(InMemoryRecordStore::<SentPostRecord>::new()),
            timed_out_posts: Arc::new(InMemoryRecordStore::<TimedOutPostRecord>::new()),
            settlements: Arc::new(InMemorySettlementStore::new()),
        }
    }
}

/// The post module's state machine for one chain.
///
/// All store writes go through a single writer lock, so receive,
/// acknowledgement, and timeout handling never interleave. Channel and
/// capability lookups in [`transmit_post`](Self::transmit_post) take no
/// module lock.
pub struct PostKeeper {
    config: ModuleConfig,
    channels: Arc<dyn ChannelKeeper>,
    capabilities: Arc<dyn CapabilityKeeper>,
    stores: PostStores,
    observer: Arc<dyn AckObserver>,
    writer: Mutex<()>,
}

impl PostKeeper {
    pub fn new(
        config: ModuleConfig,
        channels: Arc<dyn ChannelKeeper>,
        capabilities: Arc<dyn CapabilityKeeper>,
        stores: PostStores,
    ) -> Self {
        Self {
            config,
            channels,
            capabilities,
            stores,
            observer: Arc::new(TracingAckObserver),
            writer: Mutex::new(()),
        }
    }

    /// Replace the error-acknowledgement observer.
    pub fn with_observer(mut self, observer: Arc<dyn AckObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    pub fn stores(&self) -> &PostStores {
        &self.stores
    }

    // ---- Transmit ----

    /// Build a packet carrying `payload` and hand it to the channel keeper.
    ///
    /// Nothing in the module's stores changes; the channel keeper owns the
    /// sequence and advances it on success. Errors from the channel keeper's
    /// send primitive are returned unchanged.
    pub fn transmit_post(
        &self,
        payload: &PostPayload,
        source_port: &str,
        source_channel: &str,
        timeout_height: Height,
        timeout_timestamp: u64,
    ) -> PostResult<PacketId> {
        let channel_end = self
            .channels
            .get_channel(source_port, source_channel)?
            .ok_or_else(|| PostError::ChannelNotFound {
                port: source_port.into(),
                channel: source_channel.into(),
            })?;
        let destination_port = channel_end.counterparty.port_id;
        let destination_channel = channel_end.counterparty.channel_id;

        let sequence = self
            .channels
            .next_sequence_send(source_port, source_channel)?
            .ok_or_else(|| PostError::SequenceNotFound {
                port: source_port.into(),
                channel: source_channel.into(),
            })?;

        let path = channel_capability_path(source_port, source_channel);
        let capability = self
            .capabilities
            .get_capability(&path)
            .ok_or(PostError::CapabilityMissing { path })?;

        let data = PostCodec::encode_packet_data(payload)
            .map_err(|e| PostError::Encoding(e.to_string()))?;

        let packet = Packet::new(
            data,
            sequence,
            source_port,
            source_channel,
            destination_port,
            destination_channel,
            timeout_height,
            timeout_timestamp,
        );
        let id = packet.id();
        self.channels.send_packet(&capability, packet)?;

        info!(packet = %id, title = %payload.title, "post sent");
        Ok(id)
    }

    /// Validate a send message and transmit its payload.
    ///
    /// `now` is the current time in nanoseconds, used when the message does
    /// not set a timeout timestamp. Messages never carry a height timeout.
    pub fn send_ibc_post(&self, msg: &MsgSendIbcPost, now: u64) -> PostResult<PacketId> {
        msg.validate_basic(&self.config)?;
        let timeout_timestamp = if msg.timeout_timestamp == 0 {
            now.saturating_add(self.config.default_timeout_timestamp_offset)
        } else {
            msg.timeout_timestamp
        };
        self.transmit_post(
            &msg.payload(),
            &msg.port,
            &msg.channel_id,
            Height::zero(),
            timeout_timestamp,
        )
    }

    // ---- Receive ----

    /// Store a post received from the counterparty and acknowledge it.
    ///
    /// The stored creator is `{source_port}-{source_channel}-{creator}`.
    /// Nothing is written when validation fails; the caller turns the error
    /// into an error acknowledgement.
    pub fn on_recv_post(&self, packet: &Packet, payload: &PostPayload) -> PostResult<AckResult> {
        payload
            .validate_basic()
            .map_err(|e| PostError::Validation(e.to_string()))?;
        self.check_limits(payload)?;

        let record = PostRecord::from_remote(&packet.source_port, &packet.source_channel, payload);
        let _writer = self.lock_writer()?;
        let id = self.stores.posts.append(record)?;

        info!(packet = %packet.id(), post_id = id, "post received");
        Ok(AckResult::for_post(id))
    }

    fn check_limits(&self, payload: &PostPayload) -> PostResult<()> {
        if payload.title.len() > self.config.max_title_len {
            return Err(PostError::Validation(format!(
                "title is {} bytes, max {}",
                payload.title.len(),
                self.config.max_title_len
            )));
        }
        if payload.content.len() > self.config.max_content_len {
            return Err(PostError::Validation(format!(
                "content is {} bytes, max {}",
                payload.content.len(),
                self.config.max_content_len
            )));
        }
        Ok(())
    }

    // ---- Acknowledgement ----

    /// Reconcile the counterparty's answer to a post this chain sent.
    ///
    /// A success records a sent post. A failure changes no post store: the
    /// message goes to the observer and the packet is settled as rejected.
    pub fn on_acknowledgement_post(
        &self,
        packet: &Packet,
        payload: &PostPayload,
        outcome: AckOutcome,
    ) -> PostResult<()> {
        match outcome {
            AckOutcome::Failure(message) => {
                {
                    let _writer = self.lock_writer()?;
                    if self.already_settled(packet)? {
                        return Ok(());
                    }
                    // No compensation for a rejected post: only the observer
                    // and the settlement log see it.
                    self.stores.settlements.settle(
                        packet.id(),
                        Settlement::Rejected {
                            reason: message.clone(),
                        },
                    )?;
                }
                // Observers may call back into the keeper.
                self.observer.on_error_acknowledgement(packet, payload, &message);
                Ok(())
            }
            AckOutcome::Success(bytes) => {
                let result = PostCodec::decode_ack_result(&bytes)
                    .map_err(|e| PostError::AckDecode(e.to_string()))?;

                let _writer = self.lock_writer()?;
                if self.already_settled(packet)? {
                    return Ok(());
                }
                let id = self.stores.sent_posts.append(SentPostRecord {
                    id: 0,
                    post_id: result.post_id.clone(),
                    title: payload.title.clone(),
                    chain: packet.destination_chain(),
                    creator: payload.creator.clone(),
                })?;
                self.stores.settlements.settle(
                    packet.id(),
                    Settlement::Acknowledged {
                        post_id: result.post_id.clone(),
                    },
                )?;

                info!(
                    packet = %packet.id(),
                    sent_post_id = id,
                    remote_post_id = %result.post_id,
                    "post acknowledged"
                );
                Ok(())
            }
        }
    }

    // ---- Timeout ----

    /// Record a post whose packet expired before the counterparty got it.
    pub fn on_timeout_post(&self, packet: &Packet, payload: &PostPayload) -> PostResult<()> {
        let _writer = self.lock_writer()?;
        if self.already_settled(packet)? {
            return Ok(());
        }
        let id = self.stores.timed_out_posts.append(TimedOutPostRecord {
            id: 0,
            title: payload.title.clone(),
            chain: packet.destination_chain(),
            creator: payload.creator.clone(),
        })?;
        self.stores
            .settlements
            .settle(packet.id(), Settlement::TimedOut)?;

        info!(packet = %packet.id(), timed_out_post_id = id, "post timed out");
        Ok(())
    }

    /// Returns `true` (and logs) if `packet` already has a terminal outcome.
    /// Must be called with the writer lock held.
    fn already_settled(&self, packet: &Packet) -> PostResult<bool> {
        match self.stores.settlements.get(&packet.id())? {
            Some(existing) => {
                warn!(
                    packet = %packet.id(),
                    existing = %existing,
                    "ignoring second reconciliation of settled packet"
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn lock_writer(&self) -> PostResult<MutexGuard<'_, ()>> {
        self.writer.lock().map_err(|_| PostError::LockPoisoned)
    }

    // ---- Queries ----

    pub fn post(&self, id: u64) -> PostResult<Option<PostRecord>> {
        Ok(self.stores.posts.get(id)?)
    }

    pub fn posts(&self) -> PostResult<Vec<PostRecord>> {
        Ok(self.stores.posts.list()?)
    }

    pub fn post_count(&self) -> PostResult<u64> {
        Ok(self.stores.posts.count()?)
    }

    pub fn sent_post(&self, id: u64) -> PostResult<Option<SentPostRecord>> {
        Ok(self.stores.sent_posts.get(id)?)
    }

    pub fn sent_posts(&self) -> PostResult<Vec<SentPostRecord>> {
        Ok(self.stores.sent_posts.list()?)
    }

    pub fn sent_post_count(&self) -> PostResult<u64> {
        Ok(self.stores.sent_posts.count()?)
    }

    pub fn timed_out_post(&self, id: u64) -> PostResult<Option<TimedOutPostRecord>> {
        Ok(self.stores.timed_out_posts.get(id)?)
    }

    pub fn timed_out_posts(&self) -> PostResult<Vec<TimedOutPostRecord>> {
        Ok(self.stores.timed_out_posts.list()?)
    }

    pub fn timed_out_post_count(&self) -> PostResult<u64> {
        Ok(self.stores.timed_out_posts.count()?)
    }

    /// The terminal outcome of a packet this chain sent, if any.
    pub fn settlement(&self, packet: &PacketId) -> PostResult<Option<Settlement>> {
        Ok(self.stores.settlements.get(packet)?)
    }

    // ---- Genesis ----

    /// Load exported state into empty stores.
    pub fn init_genesis(&self, genesis: &GenesisState) -> PostResult<()> {
        genesis.validate()?;
        if genesis.port_id != self.config.port_id {
            return Err(PostError::Genesis(format!(
                "genesis port {} does not match configured port {}",
                genesis.port_id, self.config.port_id
            )));
        }

        let _writer = self.lock_writer()?;
        if self.stores.posts.count()? != 0 {
            return Err(StoreError::NotEmpty(PostRecord::KIND).into());
        }
        if self.stores.sent_posts.count()? != 0 {
            return Err(StoreError::NotEmpty(SentPostRecord::KIND).into());
        }
        if self.stores.timed_out_posts.count()? != 0 {
            return Err(StoreError::NotEmpty(TimedOutPostRecord::KIND).into());
        }
        if !self.stores.settlements.list()?.is_empty() {
            return Err(StoreError::NotEmpty("settlement").into());
        }
        self.stores
            .posts
            .import(genesis.posts.clone(), genesis.post_count)?;
        self.stores
            .sent_posts
            .import(genesis.sent_posts.clone(), genesis.sent_post_count)?;
        self.stores
            .timed_out_posts
            .import(genesis.timed_out_posts.clone(), genesis.timed_out_post_count)?;
        for (packet, settlement) in &genesis.settlements {
            self.stores
                .settlements
                .settle(packet.clone(), settlement.clone())?;
        }

        debug!(
            posts = genesis.posts.len(),
            sent_posts = genesis.sent_posts.len(),
            timed_out_posts = genesis.timed_out_posts.len(),
            settlements = genesis.settlements.len(),
            "genesis imported"
        );
        Ok(())
    }

    /// Snapshot the module's records.
    pub fn export_genesis(&self) -> PostResult<GenesisState> {
        let _writer = self.lock_writer()?;
        Ok(GenesisState {
            port_id: self.config.port_id.clone(),
            posts: self.stores.posts.list()?,
            post_count: self.stores.posts.count()?,
            sent_posts: self.stores.sent_posts.list()?,
            sent_post_count: self.stores.sent_posts.count()?,
            timed_out_posts: self.stores.timed_out_posts.list()?,
            timed_out_post_count: self.stores.timed_out_posts.count()?,
            settlements: self.stores.settlements.list()?,
        })
    }
}

impl std::fmt::Debug for PostKeeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostKeeper")
            .field("port_id", &self.config.port_id)
            .finish()
    }
}
