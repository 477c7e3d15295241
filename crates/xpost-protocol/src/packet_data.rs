use serde::{Deserialize, Serialize};
use xpost_types::PostPayload;

/// Upper bound on encoded packet data.
pub const MAX_PACKET_DATA_SIZE: usize = 64 * 1024;

/// Module-level packet data union.
///
/// Encoded as `{"ibcPostPacket":{...}}`. `NoData` is the empty envelope
/// `{"noData":{}}`, which the module refuses to send or receive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PacketData {
    #[serde(rename = "noData")]
    NoData {},
    #[serde(rename = "ibcPostPacket")]
    IbcPost(PostPayload),
}

impl PacketData {
    /// Envelope keys of every known variant.
    pub const TYPE_NAMES: [&'static str; 2] = ["noData", "ibcPostPacket"];

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::NoData {} => "noData",
            Self::IbcPost(_) => "ibcPostPacket",
        }
    }

    /// The post payload, if this envelope carries one.
    pub fn into_post(self) -> Option<PostPayload> {
        match self {
            Self::IbcPost(payload) => Some(payload),
            Self::NoData {} => None,
        }
    }
}

impl From<PostPayload> for PacketData {
    fn from(payload: PostPayload) -> Self {
        Self::IbcPost(payload)
    }
}
