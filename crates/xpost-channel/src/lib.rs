//! Channel and capability boundaries for xpost.
//!
//! The post module does not own channels: it reads channel ends and send
//! sequences from a [`ChannelKeeper`], proves its right to send with a
//! capability from a [`CapabilityKeeper`], and hands finished packets back
//! to the channel keeper.
//!
//! The in-memory implementations model the parts of a real transport the
//! module depends on: capability authentication, send sequencing, packet
//! commitments, and receipts. They back the tests, the loopback relayer,
//! and the CLI simulation.

pub mod capability;
pub mod error;
pub mod memory;
pub mod traits;

pub use capability::InMemoryCapabilityKeeper;
pub use error::{ChannelError, ChannelResult};
pub use memory::InMemoryChannelKeeper;
pub use traits::{CapabilityKeeper, ChannelKeeper};
