//! In-process relay between two simulated chains.
//!
//! Each [`SimulatedChain`] owns an in-memory transport, a capability
//! keeper, and a post module. A [`LoopbackRelayer`] opens a channel pair
//! between two chains and moves committed packets across it, delivering
//! or timing them out against the destination's height and clock.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};
use xpost_channel::{ChannelKeeper, InMemoryCapabilityKeeper, InMemoryChannelKeeper};
use xpost_protocol::PostCodec;
use xpost_types::{Counterparty, Height, Ordering, Packet, PacketId};

use crate::config::ModuleConfig;
use crate::error::{PostError, PostResult};
use crate::hooks::{AckObserver, TracingAckObserver};
use crate::keeper::{PostKeeper, PostStores};
use crate::module::PostModule;
use crate::msg::MsgSendIbcPost;

/// Clock value of a fresh chain, in nanoseconds.
const GENESIS_TIME_NS: u64 = 1_700_000_000_000_000_000;

/// Time that passes per simulated block.
pub const BLOCK_TIME_NS: u64 = 5_000_000_000;

/// One chain running the post module on in-memory collaborators.
pub struct SimulatedChain {
    chain_id: String,
    transport: Arc<InMemoryChannelKeeper>,
    capabilities: Arc<InMemoryCapabilityKeeper>,
    module: PostModule,
    height: AtomicU64,
    timestamp: AtomicU64,
    next_channel: AtomicU64,
}

impl SimulatedChain {
    pub fn new(chain_id: impl Into<String>, config: ModuleConfig) -> Self {
        Self::with_observer(chain_id, config, Arc::new(TracingAckObserver))
    }

    pub fn with_observer(
        chain_id: impl Into<String>,
        config: ModuleConfig,
        observer: Arc<dyn AckObserver>,
    ) -> Self {
        let transport = Arc::new(InMemoryChannelKeeper::new());
        let capabilities = Arc::new(InMemoryCapabilityKeeper::new());
        let keeper = PostKeeper::new(
            config,
            transport.clone(),
            capabilities.clone(),
            PostStores::in_memory(),
        )
        .with_observer(observer);
        Self {
            chain_id: chain_id.into(),
            transport,
            capabilities,
            module: PostModule::new(Arc::new(keeper)),
            height: AtomicU64::new(1),
            timestamp: AtomicU64::new(GENESIS_TIME_NS),
            next_channel: AtomicU64::new(0),
        }
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn keeper(&self) -> &PostKeeper {
        self.module.keeper()
    }

    pub fn module(&self) -> &PostModule {
        &self.module
    }

    pub fn transport(&self) -> &InMemoryChannelKeeper {
        &self.transport
    }

    pub fn capabilities(&self) -> &InMemoryCapabilityKeeper {
        &self.capabilities
    }

    /// Current block height (revision 0).
    pub fn height(&self) -> Height {
        Height::new(0, self.height.load(AtomicOrdering::SeqCst))
    }

    /// Current block time in nanoseconds.
    pub fn timestamp(&self) -> u64 {
        self.timestamp.load(AtomicOrdering::SeqCst)
    }

    /// Produce `blocks` empty blocks.
    pub fn advance_blocks(&self, blocks: u64) {
        self.height.fetch_add(blocks, AtomicOrdering::SeqCst);
        self.timestamp
            .fetch_add(blocks.saturating_mul(BLOCK_TIME_NS), AtomicOrdering::SeqCst);
        debug!(chain = %self.chain_id, height = %self.height(), "advanced");
    }

    /// Move the clock forward without producing blocks.
    pub fn advance_time(&self, nanos: u64) {
        self.timestamp.fetch_add(nanos, AtomicOrdering::SeqCst);
    }

    /// Submit a send message at the chain's current time.
    pub fn send(&self, msg: &MsgSendIbcPost) -> PostResult<PacketId> {
        self.keeper().send_ibc_post(msg, self.timestamp())
    }

    fn allocate_channel(&self) -> String {
        format!(
            "channel-{}",
            self.next_channel.fetch_add(1, AtomicOrdering::SeqCst)
        )
    }
}

impl std::fmt::Debug for SimulatedChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedChain")
            .field("chain_id", &self.chain_id)
            .field("height", &self.height())
            .field("timestamp", &self.timestamp())
            .finish()
    }
}

/// What a single [`LoopbackRelayer::relay`] pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RelayReport {
    /// Packets received by the destination (either acknowledgement form).
    pub delivered: usize,
    /// Delivered packets whose positive acknowledgement was reconciled.
    pub acknowledged: usize,
    /// Delivered packets whose error acknowledgement was reconciled.
    pub rejected: usize,
    /// Packets reconciled as timeouts: expired, or sent on a channel the
    /// destination has closed.
    pub timed_out: usize,
    /// Packets the transport or the sender's module refused.
    pub failed: usize,
}

/// A channel pair between two simulated chains.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoopbackRelayer {
    pub a_chain: String,
    pub a_port: String,
    pub a_channel: String,
    pub b_chain: String,
    pub b_port: String,
    pub b_channel: String,
}

impl LoopbackRelayer {
    /// Open a channel on each chain pointing at the other, and hand the
    /// send capabilities to the chains' modules.
    pub fn connect(a: &SimulatedChain, b: &SimulatedChain, ordering: Ordering) -> PostResult<Self> {
        if a.chain_id == b.chain_id {
            return Err(PostError::Config(format!(
                "cannot connect chain {} to itself",
                a.chain_id
            )));
        }
        if a.module.version() != b.module.version() {
            return Err(PostError::Config(format!(
                "version mismatch: {} speaks {}, {} speaks {}",
                a.chain_id,
                a.module.version(),
                b.chain_id,
                b.module.version()
            )));
        }

        let link = Self {
            a_chain: a.chain_id.clone(),
            a_port: a.module.port_id().to_string(),
            a_channel: a.allocate_channel(),
            b_chain: b.chain_id.clone(),
            b_port: b.module.port_id().to_string(),
            b_channel: b.allocate_channel(),
        };

        let version = a.module.version();
        let cap_a = a.transport.open_channel(
            &link.a_port,
            &link.a_channel,
            Counterparty::new(&link.b_port, &link.b_channel),
            ordering,
            version,
        )?;
        a.capabilities.claim(cap_a);
        let cap_b = b.transport.open_channel(
            &link.b_port,
            &link.b_channel,
            Counterparty::new(&link.a_port, &link.a_channel),
            ordering,
            version,
        )?;
        b.capabilities.claim(cap_b);

        info!(
            a = %format!("{}:{}/{}", link.a_chain, link.a_port, link.a_channel),
            b = %format!("{}:{}/{}", link.b_chain, link.b_port, link.b_channel),
            ?ordering,
            "chains connected"
        );
        Ok(link)
    }

    /// The `(port, channel)` end this link has on `chain`.
    pub fn end_on(&self, chain: &SimulatedChain) -> PostResult<(&str, &str)> {
        if chain.chain_id == self.a_chain {
            Ok((&self.a_port, &self.a_channel))
        } else if chain.chain_id == self.b_chain {
            Ok((&self.b_port, &self.b_channel))
        } else {
            Err(PostError::Config(format!(
                "chain {} is not an end of this link",
                chain.chain_id
            )))
        }
    }

    /// Move every packet `src` committed on this link over to `dst`.
    ///
    /// A packet goes back to `src` as a timeout when it has expired at
    /// `dst`'s height or time, or when `dst`'s end of the channel is closed.
    /// Anything else is received by `dst` and its acknowledgement is
    /// reconciled on `src`. A timeout on an ordered channel closes both
    /// ends, so every later packet on it times out as well.
    ///
    /// Transport and module errors for a single packet are counted in
    /// [`RelayReport::failed`] and do not stop the pass.
    pub fn relay(&self, src: &SimulatedChain, dst: &SimulatedChain) -> PostResult<RelayReport> {
        let (src_port, src_channel) = self.end_on(src)?;
        self.end_on(dst)?;

        let mut report = RelayReport::default();
        let packets: Vec<Packet> = src
            .transport
            .pending_packets()?
            .into_iter()
            .filter(|p| p.source_port == src_port && p.source_channel == src_channel)
            .collect();

        for packet in &packets {
            self.relay_one(packet, src, dst, &mut report)?;
        }

        debug!(
            src = %src.chain_id,
            dst = %dst.chain_id,
            delivered = report.delivered,
            timed_out = report.timed_out,
            failed = report.failed,
            "relay pass finished"
        );
        Ok(report)
    }

    /// Relay a single packet from `src` to `dst`, such as one observed
    /// outside a full pass.
    pub fn relay_packet(
        &self,
        packet: &Packet,
        src: &SimulatedChain,
        dst: &SimulatedChain,
    ) -> PostResult<RelayReport> {
        self.end_on(src)?;
        self.end_on(dst)?;
        let mut report = RelayReport::default();
        self.relay_one(packet, src, dst, &mut report)?;
        Ok(report)
    }

    fn relay_one(
        &self,
        packet: &Packet,
        src: &SimulatedChain,
        dst: &SimulatedChain,
        report: &mut RelayReport,
    ) -> PostResult<()> {
        let dst_open = dst
            .transport
            .get_channel(&packet.destination_port, &packet.destination_channel)?
            .is_some_and(|end| end.is_open());
        let outcome = if !dst_open || packet.is_expired_at(dst.height(), dst.timestamp()) {
            self.time_out(packet, src, dst, report)
        } else {
            self.deliver(packet, src, dst, report)
        };
        if let Err(e) = outcome {
            warn!(packet = %packet.id(), error = %e, "packet not relayed");
            report.failed += 1;
        }
        Ok(())
    }

    fn time_out(
        &self,
        packet: &Packet,
        src: &SimulatedChain,
        dst: &SimulatedChain,
        report: &mut RelayReport,
    ) -> PostResult<()> {
        src.transport.timeout_packet(packet)?;
        let src_end = src
            .transport
            .get_channel(&packet.source_port, &packet.source_channel)?;
        if let Some(end) = src_end.filter(|end| end.ordering == Ordering::Ordered) {
            let dst_end = dst
                .transport
                .get_channel(&packet.destination_port, &packet.destination_channel)?;
            if !end.is_open() && dst_end.is_some_and(|e| e.is_open()) {
                dst.transport
                    .close_channel(&packet.destination_port, &packet.destination_channel)?;
                info!(packet = %packet.id(), chain = %dst.chain_id, "ordered channel closed");
            }
        }
        match src.module.on_timeout_packet(packet) {
            Ok(()) => report.timed_out += 1,
            Err(e) => {
                warn!(packet = %packet.id(), error = %e, "timeout not reconciled");
                report.failed += 1;
            }
        }
        Ok(())
    }

    fn deliver(
        &self,
        packet: &Packet,
        src: &SimulatedChain,
        dst: &SimulatedChain,
        report: &mut RelayReport,
    ) -> PostResult<()> {
        dst.transport.receive_packet(packet)?;
        let ack = dst.module.on_recv_packet(packet);
        report.delivered += 1;

        let ack_bytes =
            PostCodec::encode_ack(&ack).map_err(|e| PostError::Encoding(e.to_string()))?;
        src.transport.acknowledge_packet(packet)?;
        match src.module.on_acknowledgement_packet(packet, &ack_bytes) {
            Ok(()) if ack.is_success() => report.acknowledged += 1,
            Ok(()) => report.rejected += 1,
            Err(e) => {
                warn!(packet = %packet.id(), error = %e, "acknowledgement not reconciled");
                report.failed += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use xpost_store::Settlement;
    use xpost_types::PostPayload;

    #[derive(Default)]
    struct RecordingObserver {
        messages: Mutex<Vec<String>>,
    }

    impl AckObserver for RecordingObserver {
        fn on_error_acknowledgement(&self, _packet: &Packet, _payload: &PostPayload, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    /// Send a post from `chain` that expires at destination height `height`.
    fn send_until(chain: &SimulatedChain, link: &LoopbackRelayer, title: &str, height: u64) -> PacketId {
        let (port, channel) = link.end_on(chain).unwrap();
        chain
            .keeper()
            .transmit_post(
                &PostPayload::new("a", title, ""),
                port,
                channel,
                Height::new(0, height),
                0,
            )
            .unwrap()
    }

    fn pair(ordering: Ordering) -> (SimulatedChain, SimulatedChain, LoopbackRelayer) {
        let mars = SimulatedChain::new("mars", ModuleConfig::default());
        let venus = SimulatedChain::new("venus", ModuleConfig::default());
        let link = LoopbackRelayer::connect(&mars, &venus, ordering).unwrap();
        (mars, venus, link)
    }

    // -----------------------------------------------------------------------
    // Connect
    // -----------------------------------------------------------------------

    #[test]
    fn connect_opens_both_ends() {
        let (mars, venus, link) = pair(Ordering::Unordered);
        assert_eq!(link.a_channel, "channel-0");
        assert_eq!(link.b_channel, "channel-0");
        assert!(mars.capabilities().len() == 1 && venus.capabilities().len() == 1);
        assert_eq!(link.end_on(&venus).unwrap(), ("blog", "channel-0"));
    }

    #[test]
    fn second_link_gets_new_channel() {
        let (mars, venus, _) = pair(Ordering::Unordered);
        let second = LoopbackRelayer::connect(&mars, &venus, Ordering::Ordered).unwrap();
        assert_eq!(second.a_channel, "channel-1");
    }

    #[test]
    fn connect_rejects_version_mismatch() {
        let mars = SimulatedChain::new("mars", ModuleConfig::default());
        let venus = SimulatedChain::new(
            "venus",
            ModuleConfig {
                version: "blog-2".into(),
                ..ModuleConfig::default()
            },
        );
        assert!(matches!(
            LoopbackRelayer::connect(&mars, &venus, Ordering::Unordered),
            Err(PostError::Config(_))
        ));
    }

    #[test]
    fn relay_rejects_foreign_chain() {
        let (mars, _venus, link) = pair(Ordering::Unordered);
        let pluto = SimulatedChain::new("pluto", ModuleConfig::default());
        assert!(link.relay(&mars, &pluto).is_err());
    }

    // -----------------------------------------------------------------------
    // End to end
    // -----------------------------------------------------------------------

    #[test]
    fn post_is_replicated_and_acknowledged() {
        let (mars, venus, link) = pair(Ordering::Unordered);
        let msg = MsgSendIbcPost::new("alice", &link.a_port, &link.a_channel, 0, "Hello", "World");
        let id = mars.send(&msg).unwrap();

        let report = link.relay(&mars, &venus).unwrap();
        assert_eq!(
            report,
            RelayReport {
                delivered: 1,
                acknowledged: 1,
                ..RelayReport::default()
            }
        );

        let posts = venus.keeper().posts().unwrap();
        assert_eq!(posts[0].creator, "blog-channel-0-alice");
        assert_eq!(posts[0].title, "Hello");
        assert_eq!(posts[0].content, "World");

        let sent = mars.keeper().sent_posts().unwrap();
        assert_eq!(sent[0].post_id, posts[0].id.to_string());
        assert_eq!(sent[0].chain, "blog-channel-0");
        assert_eq!(sent[0].creator, "alice");
        assert_eq!(mars.keeper().timed_out_post_count().unwrap(), 0);
        assert!(mars.transport().pending_packets().unwrap().is_empty());
        assert_eq!(
            mars.keeper().settlement(&id).unwrap(),
            Some(Settlement::Acknowledged { post_id: "0".into() })
        );
    }

    #[test]
    fn replication_works_in_both_directions() {
        let (mars, venus, link) = pair(Ordering::Ordered);
        let payload = PostPayload::new("bob", "Back", "");
        venus
            .keeper()
            .transmit_post(&payload, &link.b_port, &link.b_channel, Height::new(0, 50), 0)
            .unwrap();
        assert_eq!(link.relay(&venus, &mars).unwrap().acknowledged, 1);
        assert_eq!(mars.keeper().posts().unwrap()[0].creator, "blog-channel-0-bob");
        assert_eq!(venus.keeper().sent_post_count().unwrap(), 1);
    }

    #[test]
    fn ordered_channel_delivers_in_sequence() {
        let (mars, venus, link) = pair(Ordering::Ordered);
        for title in ["one", "two", "three"] {
            let msg = MsgSendIbcPost::new("alice", &link.a_port, &link.a_channel, 0, title, "");
            mars.send(&msg).unwrap();
        }
        assert_eq!(link.relay(&mars, &venus).unwrap().acknowledged, 3);
        let titles: Vec<_> = venus
            .keeper()
            .posts()
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["one", "two", "three"]);
    }

    #[test]
    fn rejected_post_leaves_stores_untouched() {
        let observer = Arc::new(RecordingObserver::default());
        let mars = SimulatedChain::with_observer("mars", ModuleConfig::default(), observer.clone());
        let venus = SimulatedChain::new(
            "venus",
            ModuleConfig {
                max_content_len: 4,
                ..ModuleConfig::default()
            },
        );
        let link = LoopbackRelayer::connect(&mars, &venus, Ordering::Unordered).unwrap();
        let msg = MsgSendIbcPost::new("alice", &link.a_port, &link.a_channel, 0, "T", "too long");
        let id = mars.send(&msg).unwrap();

        let report = link.relay(&mars, &venus).unwrap();
        assert_eq!(report.delivered, 1);
        assert_eq!(report.rejected, 1);
        assert_eq!(venus.keeper().post_count().unwrap(), 0);
        assert_eq!(mars.keeper().sent_post_count().unwrap(), 0);
        assert_eq!(mars.keeper().timed_out_post_count().unwrap(), 0);
        assert_eq!(observer.messages.lock().unwrap().len(), 1);
        assert!(matches!(
            mars.keeper().settlement(&id).unwrap(),
            Some(Settlement::Rejected { .. })
        ));
    }

    #[test]
    fn expired_height_times_out() {
        let (mars, venus, link) = pair(Ordering::Unordered);
        let payload = PostPayload::new("carol", "Late", "");
        mars.keeper()
            .transmit_post(&payload, &link.a_port, &link.a_channel, Height::new(0, 3), 0)
            .unwrap();
        venus.advance_blocks(2);

        let report = link.relay(&mars, &venus).unwrap();
        assert_eq!(report.timed_out, 1);
        assert_eq!(report.delivered, 0);
        assert_eq!(venus.keeper().post_count().unwrap(), 0);
        let timed_out = mars.keeper().timed_out_posts().unwrap();
        assert_eq!(timed_out[0].title, "Late");
        assert_eq!(timed_out[0].chain, "blog-channel-0");
        assert_eq!(mars.keeper().sent_post_count().unwrap(), 0);
    }

    #[test]
    fn default_timestamp_timeout_expires_after_ten_minutes() {
        let (mars, venus, link) = pair(Ordering::Unordered);
        let msg = MsgSendIbcPost::new("alice", &link.a_port, &link.a_channel, 0, "T", "");
        mars.send(&msg).unwrap();
        venus.advance_time(600_000_000_000);
        assert_eq!(link.relay(&mars, &venus).unwrap().timed_out, 1);
    }

    #[test]
    fn unexpired_packet_is_delivered() {
        let (mars, venus, link) = pair(Ordering::Unordered);
        let msg = MsgSendIbcPost::new("alice", &link.a_port, &link.a_channel, 0, "T", "");
        mars.send(&msg).unwrap();
        venus.advance_time(599_000_000_000);
        assert_eq!(link.relay(&mars, &venus).unwrap().acknowledged, 1);
    }

    #[test]
    fn relay_is_idempotent_once_drained() {
        let (mars, venus, link) = pair(Ordering::Unordered);
        let msg = MsgSendIbcPost::new("alice", &link.a_port, &link.a_channel, 0, "T", "");
        mars.send(&msg).unwrap();
        link.relay(&mars, &venus).unwrap();
        assert_eq!(link.relay(&mars, &venus).unwrap(), RelayReport::default());
        assert_eq!(venus.keeper().post_count().unwrap(), 1);
        assert_eq!(mars.keeper().sent_post_count().unwrap(), 1);
    }

    #[test]
    fn closed_destination_times_out() {
        let (mars, venus, link) = pair(Ordering::Unordered);
        let msg = MsgSendIbcPost::new("alice", &link.a_port, &link.a_channel, 0, "T", "");
        let id = mars.send(&msg).unwrap();
        venus
            .transport()
            .close_channel(&link.b_port, &link.b_channel)
            .unwrap();
        let report = link.relay(&mars, &venus).unwrap();
        assert_eq!(report.timed_out, 1);
        assert_eq!(report.delivered, 0);
        assert!(mars.transport().pending_packets().unwrap().is_empty());
        assert_eq!(mars.keeper().settlement(&id).unwrap(), Some(Settlement::TimedOut));
    }

    // -----------------------------------------------------------------------
    // Ordered channels
    // -----------------------------------------------------------------------

    #[test]
    fn ordered_timeout_times_out_later_packets() {
        let (mars, venus, link) = pair(Ordering::Ordered);
        let first = send_until(&mars, &link, "first", 3);
        let second = send_until(&mars, &link, "second", 100);
        venus.advance_blocks(2);

        let report = link.relay(&mars, &venus).unwrap();
        assert_eq!(
            report,
            RelayReport {
                timed_out: 2,
                ..RelayReport::default()
            }
        );
        assert_eq!(mars.keeper().settlement(&first).unwrap(), Some(Settlement::TimedOut));
        assert_eq!(mars.keeper().settlement(&second).unwrap(), Some(Settlement::TimedOut));
        assert!(mars.transport().pending_packets().unwrap().is_empty());
        assert_eq!(venus.keeper().post_count().unwrap(), 0);

        let a_end = mars
            .transport()
            .get_channel(&link.a_port, &link.a_channel)
            .unwrap()
            .unwrap();
        let b_end = venus
            .transport()
            .get_channel(&link.b_port, &link.b_channel)
            .unwrap()
            .unwrap();
        assert!(!a_end.is_open() && !b_end.is_open());
        assert_eq!(link.relay(&mars, &venus).unwrap(), RelayReport::default());
    }

    #[test]
    fn ordered_channel_refuses_sends_after_timeout() {
        let (mars, venus, link) = pair(Ordering::Ordered);
        send_until(&mars, &link, "t", 2);
        venus.advance_blocks(1);
        link.relay(&mars, &venus).unwrap();

        let msg = MsgSendIbcPost::new("alice", &link.a_port, &link.a_channel, 0, "T", "");
        assert!(matches!(mars.send(&msg), Err(PostError::Channel(_))));
    }

    #[test]
    fn unordered_timeout_does_not_block_later_packets() {
        let (mars, venus, link) = pair(Ordering::Unordered);
        send_until(&mars, &link, "first", 3);
        send_until(&mars, &link, "second", 100);
        venus.advance_blocks(2);

        let report = link.relay(&mars, &venus).unwrap();
        assert_eq!(report.timed_out, 1);
        assert_eq!(report.acknowledged, 1);
        assert_eq!(venus.keeper().posts().unwrap()[0].title, "second");
    }

    // -----------------------------------------------------------------------
    // Per-packet failures
    // -----------------------------------------------------------------------

    fn uncommitted(link: &LoopbackRelayer, timeout: Height) -> Packet {
        Packet::new(
            PostCodec::encode_packet_data(&PostPayload::new("eve", "stray", "")).unwrap(),
            9,
            &link.a_port,
            &link.a_channel,
            &link.b_port,
            &link.b_channel,
            timeout,
            0,
        )
    }

    #[test]
    fn missing_commitment_on_ack_counts_failure() {
        let (mars, venus, link) = pair(Ordering::Unordered);
        let packet = uncommitted(&link, Height::new(0, 100));
        let report = link.relay_packet(&packet, &mars, &venus).unwrap();
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(mars.keeper().sent_post_count().unwrap(), 0);
        assert!(mars.keeper().settlement(&packet.id()).unwrap().is_none());
    }

    #[test]
    fn missing_commitment_on_timeout_counts_failure() {
        let (mars, venus, link) = pair(Ordering::Unordered);
        let packet = uncommitted(&link, Height::new(0, 1));
        let report = link.relay_packet(&packet, &mars, &venus).unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(report.timed_out, 0);
        assert_eq!(mars.keeper().timed_out_post_count().unwrap(), 0);
    }

    #[test]
    fn failed_packet_does_not_stop_pass() {
        let (mars, venus, link) = pair(Ordering::Unordered);
        for title in ["dup", "fresh"] {
            let msg = MsgSendIbcPost::new("alice", &link.a_port, &link.a_channel, 0, title, "");
            mars.send(&msg).unwrap();
        }
        let pending = mars.transport().pending_packets().unwrap();
        venus.transport().receive_packet(&pending[0]).unwrap();

        let report = link.relay(&mars, &venus).unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(report.acknowledged, 1);
        assert_eq!(venus.keeper().posts().unwrap()[0].title, "fresh");
        assert_eq!(mars.transport().pending_packets().unwrap(), vec![pending[0].clone()]);
    }
}
