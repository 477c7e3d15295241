//! Foundation types for xpost, the cross-chain post replication module.
//!
//! This crate provides the value types shared by every other xpost crate:
//! channel identities, packets, timeouts, capabilities, and the records the
//! module writes to its local stores.
//!
//! # Key Types
//!
//! - [`Height`] -- Revision-aware block height used for packet timeouts
//! - [`Packet`] -- Immutable unit of cross-chain transmission
//! - [`PacketId`] -- `(source_port, source_channel, sequence)` packet identity
//! - [`ChannelEnd`] -- One side of an established channel and its counterparty
//! - [`Capability`] -- Opaque token proving permission to send on a channel
//! - [`PostPayload`] -- Application content carried by a packet
//! - [`PostRecord`], [`SentPostRecord`], [`TimedOutPostRecord`] -- Local records
//! - [`AckResult`] -- Success payload of a positive acknowledgement

pub mod capability;
pub mod channel;
pub mod error;
pub mod height;
pub mod packet;
pub mod post;

pub use capability::{channel_capability_path, Capability};
pub use channel::{ChannelEnd, ChannelState, Counterparty, Ordering};
pub use error::TypeError;
pub use height::Height;
pub use packet::{Packet, PacketId};
pub use post::{
    chain_label, remote_creator, AckResult, PostPayload, PostRecord, SentPostRecord,
    TimedOutPostRecord,
};
