use std::fmt;

use serde::{Deserialize, Serialize};

use crate::height::Height;
use crate::post::chain_label;

/// Identity of an originated packet: `(source_port, source_channel, sequence)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PacketId {
    pub port: String,
    pub channel: String,
    pub sequence: u64,
}

impl PacketId {
    pub fn new(port: impl Into<String>, channel: impl Into<String>, sequence: u64) -> Self {
        Self {
            port: port.into(),
            channel: channel.into(),
            sequence,
        }
    }
}

impl fmt::Display for PacketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.port, self.channel, self.sequence)
    }
}

/// One unit of cross-chain transmission.
///
/// Built once by the sending module and never mutated afterwards. The
/// transport, the receiving module, and both reconcilers only read it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    pub sequence: u64,
    pub source_port: String,
    pub source_channel: String,
    pub destination_port: String,
    pub destination_channel: String,
    /// Opaque application bytes.
    pub data: Vec<u8>,
    /// Counterparty height at which the packet expires. Zero disables it.
    pub timeout_height: Height,
    /// Counterparty time (ns since epoch) at which the packet expires. Zero disables it.
    pub timeout_timestamp: u64,
}

impl Packet {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        data: Vec<u8>,
        sequence: u64,
        source_port: impl Into<String>,
        source_channel: impl Into<String>,
        destination_port: impl Into<String>,
        destination_channel: impl Into<String>,
        timeout_height: Height,
        timeout_timestamp: u64,
    ) -> Self {
        Self {
            sequence,
            source_port: source_port.into(),
            source_channel: source_channel.into(),
            destination_port: destination_port.into(),
            destination_channel: destination_channel.into(),
            data,
            timeout_height,
            timeout_timestamp,
        }
    }

    /// The packet's unique identity on its source chain.
    pub fn id(&self) -> PacketId {
        PacketId::new(&self.source_port, &self.source_channel, self.sequence)
    }

    /// `destination_port-destination_channel`, as recorded on the sender.
    pub fn destination_chain(&self) -> String {
        chain_label(&self.destination_port, &self.destination_channel)
    }

    /// Returns `true` if at least one timeout bound is set.
    pub fn has_timeout(&self) -> bool {
        !self.timeout_height.is_zero() || self.timeout_timestamp != 0
    }

    /// Returns `true` if the packet has expired against the given
    /// counterparty height and time.
    pub fn is_expired_at(&self, height: Height, timestamp: u64) -> bool {
        let height_expired = !self.timeout_height.is_zero() && height >= self.timeout_height;
        let time_expired = self.timeout_timestamp != 0 && timestamp >= self.timeout_timestamp;
        height_expired || time_expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(timeout_height: Height, timeout_timestamp: u64) -> Packet {
        Packet::new(
            b"{}".to_vec(),
            3,
            "blog",
            "channel-0",
            "blog",
            "channel-9",
            timeout_height,
            timeout_timestamp,
        )
    }

    #[test]
    fn id_uses_source_side() {
        let p = packet(Height::zero(), 0);
        assert_eq!(p.id(), PacketId::new("blog", "channel-0", 3));
        assert_eq!(p.id().to_string(), "blog/channel-0#3");
    }

    #[test]
    fn destination_chain_label() {
        assert_eq!(packet(Height::zero(), 0).destination_chain(), "blog-channel-9");
    }

    #[test]
    fn no_timeout_never_expires() {
        let p = packet(Height::zero(), 0);
        assert!(!p.has_timeout());
        assert!(!p.is_expired_at(Height::new(u64::MAX, u64::MAX), u64::MAX));
    }

    #[test]
    fn height_timeout_is_inclusive() {
        let p = packet(Height::new(0, 10), 0);
        assert!(!p.is_expired_at(Height::new(0, 9), 0));
        assert!(p.is_expired_at(Height::new(0, 10), 0));
    }

    #[test]
    fn timestamp_timeout_is_inclusive() {
        let p = packet(Height::zero(), 1_000);
        assert!(!p.is_expired_at(Height::zero(), 999));
        assert!(p.is_expired_at(Height::zero(), 1_000));
    }

    #[test]
    fn packet_ids_order_by_sequence() {
        let a = PacketId::new("blog", "channel-0", 1);
        let b = PacketId::new("blog", "channel-0", 2);
        assert!(a < b);
    }
}
