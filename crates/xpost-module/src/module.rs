use std::sync::Arc;

use tracing::{debug, warn};
use xpost_protocol::{Acknowledgement, PacketData, PostCodec, ProtocolError};
use xpost_types::{Packet, PostPayload};

use crate::error::{PostError, PostResult};
use crate::keeper::PostKeeper;

/// Transport-facing callbacks over raw packets.
///
/// Decodes the packet-data envelope and acknowledgement bytes, then hands
/// typed values to the [`PostKeeper`].
#[derive(Clone, Debug)]
pub struct PostModule {
    keeper: Arc<PostKeeper>,
}

impl PostModule {
    pub fn new(keeper: Arc<PostKeeper>) -> Self {
        Self { keeper }
    }

    pub fn keeper(&self) -> &Arc<PostKeeper> {
        &self.keeper
    }

    pub fn port_id(&self) -> &str {
        &self.keeper.config().port_id
    }

    pub fn version(&self) -> &str {
        &self.keeper.config().version
    }

    /// Handle a packet delivered to this chain.
    ///
    /// Never fails: any error becomes an error acknowledgement for the
    /// sender.
    pub fn on_recv_packet(&self, packet: &Packet) -> Acknowledgement {
        match self.receive(packet) {
            Ok(ack) => ack,
            Err(e) => {
                warn!(packet = %packet.id(), error = %e, "rejecting packet");
                Acknowledgement::Error(e.to_string())
            }
        }
    }

    fn receive(&self, packet: &Packet) -> PostResult<Acknowledgement> {
        let payload = decode_payload(packet)?;
        let result = self.keeper.on_recv_post(packet, &payload)?;
        PostCodec::success_ack(&result).map_err(|e| PostError::Encoding(e.to_string()))
    }

    /// Handle the acknowledgement of a packet this chain sent.
    pub fn on_acknowledgement_packet(&self, packet: &Packet, ack_bytes: &[u8]) -> PostResult<()> {
        let ack = PostCodec::decode_ack(ack_bytes)
            .map_err(|e| PostError::UnsupportedAckFormat(e.to_string()))?;
        let payload = decode_payload(packet)?;
        debug!(packet = %packet.id(), success = ack.is_success(), "acknowledgement received");
        self.keeper
            .on_acknowledgement_post(packet, &payload, ack.into())
    }

    /// Handle the expiry of a packet this chain sent.
    pub fn on_timeout_packet(&self, packet: &Packet) -> PostResult<()> {
        let payload = decode_payload(packet)?;
        self.keeper.on_timeout_post(packet, &payload)
    }
}

fn decode_payload(packet: &Packet) -> PostResult<PostPayload> {
    match PostCodec::decode_packet_data(&packet.data) {
        Ok(PacketData::IbcPost(payload)) => Ok(payload),
        Ok(PacketData::NoData {}) => Err(PostError::UnknownPacketType),
        Err(ProtocolError::UnknownPacketType) => Err(PostError::UnknownPacketType),
        Err(e) => Err(PostError::PacketDecode(e.to_string())),
    }
}
