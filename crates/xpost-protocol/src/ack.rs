use serde::{Deserialize, Serialize};

/// Channel-level acknowledgement written by the receiving chain.
///
/// Encoded as `{"result":"<base64>"}` or `{"error":"<message>"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Acknowledgement {
    Result(#[serde(with = "base64_bytes")] Vec<u8>),
    Error(String),
}

impl Acknowledgement {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Result(_))
    }
}

/// Delivery outcome handed to the sender's acknowledgement handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AckOutcome {
    /// The counterparty applied the packet; carries the encoded result.
    Success(Vec<u8>),
    /// The counterparty refused the packet.
    Failure(String),
}

impl From<Acknowledgement> for AckOutcome {
    fn from(ack: Acknowledgement) -> Self {
        match ack {
            Acknowledgement::Result(bytes) => Self::Success(bytes),
            Acknowledgement::Error(message) => Self::Failure(message),
        }
    }
}

impl From<AckOutcome> for Acknowledgement {
    fn from(outcome: AckOutcome) -> Self {
        match outcome {
            AckOutcome::Success(bytes) => Self::Result(bytes),
            AckOutcome::Failure(message) => Self::Error(message),
        }
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom)
    }
}
