//! Wire encoding for xpost.
//!
//! Defines the bytes exchanged between two chains running the post module:
//! the packet-data envelope carried by a [`Packet`](xpost_types::Packet),
//! the [`AckResult`](xpost_types::AckResult) returned on success, and the
//! channel-level [`Acknowledgement`] that wraps either a result or an error.
//!
//! Every encoding is JSON with fixed field names so that independently
//! built implementations interoperate byte for byte.

pub mod ack;
pub mod codec;
pub mod error;
pub mod packet_data;

pub use ack::{AckOutcome, Acknowledgement};
pub use codec::PostCodec;
pub use error::{ProtocolError, ProtocolResult};
pub use packet_data::{PacketData, MAX_PACKET_DATA_SIZE};
