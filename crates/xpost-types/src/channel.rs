use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a channel end.
///
/// The handshake states are owned by the transport; this module only sends
/// on `Open` channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelState {
    Init,
    TryOpen,
    Open,
    Closed,
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Init => "INIT",
            Self::TryOpen => "TRYOPEN",
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        };
        f.write_str(s)
    }
}

/// Delivery ordering guaranteed by the transport for a channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ordering {
    #[default]
    Unordered,
    Ordered,
}

/// The remote side of a channel.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Counterparty {
    pub port_id: String,
    pub channel_id: String,
}

impl Counterparty {
    pub fn new(port_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            port_id: port_id.into(),
            channel_id: channel_id.into(),
        }
    }
}

/// One side of a channel, as seen by the chain that owns it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEnd {
    pub state: ChannelState,
    pub ordering: Ordering,
    pub counterparty: Counterparty,
    pub version: String,
}

impl ChannelEnd {
    /// An open channel end pointing at `counterparty`.
    pub fn open(counterparty: Counterparty, ordering: Ordering, version: impl Into<String>) -> Self {
        Self {
            state: ChannelState::Open,
            ordering,
            counterparty,
            version: version.into(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == ChannelState::Open
    }
}
