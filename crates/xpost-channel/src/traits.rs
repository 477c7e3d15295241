use xpost_types::{Capability, ChannelEnd, Packet};

use crate::error::ChannelResult;

/// Read access to channel ends plus the send primitive.
///
/// Channel ends and sequences are owned by the transport. The post module
/// only reads them and never advances a sequence itself.
pub trait ChannelKeeper: Send + Sync {
    /// The channel end for `port/channel`. `Ok(None)` if it does not exist.
    fn get_channel(&self, port: &str, channel: &str) -> ChannelResult<Option<ChannelEnd>>;

    /// The sequence the next packet sent on `port/channel` must carry.
    fn next_sequence_send(&self, port: &str, channel: &str) -> ChannelResult<Option<u64>>;

    /// Commit `packet` for relay. `capability` must authenticate the
    /// packet's source channel.
    fn send_packet(&self, capability: &Capability, packet: Packet) -> ChannelResult<()>;
}

/// Lookup of capabilities claimed by the module.
pub trait CapabilityKeeper: Send + Sync {
    /// The capability claimed under `path`, if any.
    fn get_capability(&self, path: &str) -> Option<Capability>;
}
