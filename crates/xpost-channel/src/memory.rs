use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::RngCore;
use tracing::debug;
use xpost_types::{
    channel_capability_path, chain_label, Capability, ChannelEnd, ChannelState, Counterparty,
    Ordering, Packet, PacketId,
};

use crate::error::{ChannelError, ChannelResult};
use crate::traits::ChannelKeeper;

/// In-memory channel transport for one chain.
///
/// Tracks channel ends, send and receive sequences, commitments for packets
/// sent but not yet acknowledged or timed out, and receipts for packets
/// received on unordered channels. A commitment is removed exactly once, by
/// [`acknowledge_packet`](Self::acknowledge_packet) or
/// [`timeout_packet`](Self::timeout_packet), which is what lets the module
/// rely on at most one reconciliation per packet.
pub struct InMemoryChannelKeeper {
    secret: [u8; 32],
    inner: RwLock<TransportState>,
}

#[derive(Default)]
struct TransportState {
    channels: BTreeMap<(String, String), ChannelEntry>,
    commitments: BTreeMap<PacketId, Packet>,
    receipts: BTreeSet<PacketId>,
}

struct ChannelEntry {
    end: ChannelEnd,
    next_send: u64,
    next_recv: u64,
}

impl InMemoryChannelKeeper {
    /// Create a transport with a random capability secret.
    pub fn new() -> Self {
        let mut secret = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut secret);
        Self::with_secret(secret)
    }

    /// Create a transport with a fixed capability secret.
    pub fn with_secret(secret: [u8; 32]) -> Self {
        Self {
            secret,
            inner: RwLock::new(TransportState::default()),
        }
    }

    /// Open `port/channel` towards `counterparty` and return the capability
    /// that authorizes sending on it.
    pub fn open_channel(
        &self,
        port: &str,
        channel: &str,
        counterparty: Counterparty,
        ordering: Ordering,
        version: &str,
    ) -> ChannelResult<Capability> {
        let mut state = self.write_state()?;
        let key = (port.to_string(), channel.to_string());
        if state.channels.contains_key(&key) {
            return Err(ChannelError::ChannelExists {
                port: port.into(),
                channel: channel.into(),
            });
        }
        state.channels.insert(
            key,
            ChannelEntry {
                end: ChannelEnd::open(counterparty, ordering, version),
                next_send: 1,
                next_recv: 1,
            },
        );
        debug!(port, channel, ?ordering, "channel opened");
        Ok(Capability::issue(
            &self.secret,
            channel_capability_path(port, channel),
        ))
    }

    /// Move `port/channel` to the closed state.
    pub fn close_channel(&self, port: &str, channel: &str) -> ChannelResult<()> {
        let mut state = self.write_state()?;
        let entry = state
            .channels
            .get_mut(&(port.to_string(), channel.to_string()))
            .ok_or_else(|| not_found(port, channel))?;
        entry.end.state = ChannelState::Closed;
        debug!(port, channel, "channel closed");
        Ok(())
    }

    /// Packets sent and still awaiting an acknowledgement or a timeout.
    pub fn pending_packets(&self) -> ChannelResult<Vec<Packet>> {
        Ok(self.read_state()?.commitments.values().cloned().collect())
    }

    /// Record receipt of `packet` on its destination channel.
    ///
    /// Ordered channels require the next expected sequence; unordered
    /// channels reject a second receipt of the same packet.
    pub fn receive_packet(&self, packet: &Packet) -> ChannelResult<()> {
        let mut guard = self.write_state()?;
        let state = &mut *guard;
        let key = (
            packet.destination_port.clone(),
            packet.destination_channel.clone(),
        );
        let entry = state
            .channels
            .get_mut(&key)
            .ok_or_else(|| not_found(&packet.destination_port, &packet.destination_channel))?;
        ensure_open(entry, &packet.destination_port, &packet.destination_channel)?;

        let expected_source = chain_label(
            &entry.end.counterparty.port_id,
            &entry.end.counterparty.channel_id,
        );
        let got_source = chain_label(&packet.source_port, &packet.source_channel);
        if expected_source != got_source {
            return Err(ChannelError::CounterpartyMismatch {
                expected: expected_source,
                got: got_source,
            });
        }

        let ordering = entry.end.ordering;
        match ordering {
            Ordering::Ordered => {
                if packet.sequence != entry.next_recv {
                    return Err(ChannelError::SequenceMismatch {
                        expected: entry.next_recv,
                        got: packet.sequence,
                    });
                }
                entry.next_recv += 1;
            }
            Ordering::Unordered => {
                if !state.receipts.insert(packet.id()) {
                    return Err(ChannelError::DuplicateReceipt(packet.id()));
                }
            }
        }
        debug!(packet = %packet.id(), "packet received");
        Ok(())
    }

    /// Remove the commitment of an acknowledged packet.
    pub fn acknowledge_packet(&self, packet: &Packet) -> ChannelResult<()> {
        self.clear_commitment(packet, "acknowledged")
    }

    /// Remove the commitment of a timed-out packet.
    ///
    /// A timeout on an ordered channel closes the source end: no later
    /// packet can be received in sequence once one has expired.
    pub fn timeout_packet(&self, packet: &Packet) -> ChannelResult<()> {
        let mut guard = self.write_state()?;
        let state = &mut *guard;
        let id = packet.id();
        let entry = state
            .channels
            .get_mut(&(packet.source_port.clone(), packet.source_channel.clone()))
            .ok_or_else(|| not_found(&packet.source_port, &packet.source_channel))?;
        if state.commitments.remove(&id).is_none() {
            return Err(ChannelError::PacketCommitmentNotFound(id));
        }
        if entry.end.ordering == Ordering::Ordered && entry.end.is_open() {
            entry.end.state = ChannelState::Closed;
            debug!(packet = %id, "ordered channel closed on timeout");
        }
        debug!(packet = %id, reason = "timed out", "packet commitment cleared");
        Ok(())
    }

    fn clear_commitment(&self, packet: &Packet, reason: &str) -> ChannelResult<()> {
        let mut state = self.write_state()?;
        let id = packet.id();
        if state.commitments.remove(&id).is_none() {
            return Err(ChannelError::PacketCommitmentNotFound(id));
        }
        debug!(packet = %id, reason, "packet commitment cleared");
        Ok(())
    }

    fn read_state(&self) -> ChannelResult<RwLockReadGuard<'_, TransportState>> {
        self.inner.read().map_err(|_| ChannelError::LockPoisoned)
    }

    fn write_state(&self) -> ChannelResult<RwLockWriteGuard<'_, TransportState>> {
        self.inner.write().map_err(|_| ChannelError::LockPoisoned)
    }
}

impl Default for InMemoryChannelKeeper {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelKeeper for InMemoryChannelKeeper {
    fn get_channel(&self, port: &str, channel: &str) -> ChannelResult<Option<ChannelEnd>> {
        let state = self.read_state()?;
        Ok(state
            .channels
            .get(&(port.to_string(), channel.to_string()))
            .map(|entry| entry.end.clone()))
    }

    fn next_sequence_send(&self, port: &str, channel: &str) -> ChannelResult<Option<u64>> {
        let state = self.read_state()?;
        Ok(state
            .channels
            .get(&(port.to_string(), channel.to_string()))
            .map(|entry| entry.next_send))
    }

    fn send_packet(&self, capability: &Capability, packet: Packet) -> ChannelResult<()> {
        let path = channel_capability_path(&packet.source_port, &packet.source_channel);
        if !capability.is_issued_by(&self.secret, &path) {
            return Err(ChannelError::CapabilityNotAuthenticated(path));
        }
        if !packet.has_timeout() {
            return Err(ChannelError::MissingTimeout);
        }

        let mut state = self.write_state()?;
        let key = (packet.source_port.clone(), packet.source_channel.clone());
        let entry = state
            .channels
            .get_mut(&key)
            .ok_or_else(|| not_found(&packet.source_port, &packet.source_channel))?;
        ensure_open(entry, &packet.source_port, &packet.source_channel)?;

        let expected_dest = chain_label(
            &entry.end.counterparty.port_id,
            &entry.end.counterparty.channel_id,
        );
        let got_dest = packet.destination_chain();
        if expected_dest != got_dest {
            return Err(ChannelError::CounterpartyMismatch {
                expected: expected_dest,
                got: got_dest,
            });
        }
        if packet.sequence != entry.next_send {
            return Err(ChannelError::SequenceMismatch {
                expected: entry.next_send,
                got: packet.sequence,
            });
        }

        entry.next_send += 1;
        let id = packet.id();
        debug!(packet = %id, len = packet.data.len(), "packet committed");
        state.commitments.insert(id, packet);
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryChannelKeeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (channels, pending) = self
            .read_state()
            .map(|s| (s.channels.len(), s.commitments.len()))
            .unwrap_or_default();
        f.debug_struct("InMemoryChannelKeeper")
            .field("channels", &channels)
            .field("pending", &pending)
            .finish()
    }
}

fn not_found(port: &str, channel: &str) -> ChannelError {
    ChannelError::ChannelNotFound {
        port: port.into(),
        channel: channel.into(),
    }
}

fn ensure_open(entry: &ChannelEntry, port: &str, channel: &str) -> ChannelResult<()> {
    if entry.end.is_open() {
        Ok(())
    } else {
        Err(ChannelError::ChannelNotOpen {
            port: port.into(),
            channel: channel.into(),
            state: entry.end.state,
        })
    }
}
