use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use xpost_types::{AckResult, PostPayload};

use crate::ack::Acknowledgement;
use crate::error::{ProtocolError, ProtocolResult};
use crate::packet_data::{PacketData, MAX_PACKET_DATA_SIZE};

/// Codec for the bytes exchanged by the post module.
pub struct PostCodec;

impl PostCodec {
    /// Encode a bare payload.
    pub fn encode_payload(payload: &PostPayload) -> ProtocolResult<Vec<u8>> {
        to_json(payload)
    }

    /// Decode a bare payload.
    pub fn decode_payload(data: &[u8]) -> ProtocolResult<PostPayload> {
        from_json(data)
    }

    /// Encode a payload inside the packet-data envelope.
    pub fn encode_packet_data(payload: &PostPayload) -> ProtocolResult<Vec<u8>> {
        let bytes = to_json(&PacketData::IbcPost(payload.clone()))?;
        if bytes.len() > MAX_PACKET_DATA_SIZE {
            return Err(ProtocolError::TooLarge {
                size: bytes.len(),
                max: MAX_PACKET_DATA_SIZE,
            });
        }
        Ok(bytes)
    }

    /// Decode the packet-data envelope.
    ///
    /// A well-formed envelope whose single key names no known variant is
    /// [`ProtocolError::UnknownPacketType`]; anything else that fails to
    /// parse is [`ProtocolError::Deserialization`].
    pub fn decode_packet_data(data: &[u8]) -> ProtocolResult<PacketData> {
        if data.len() > MAX_PACKET_DATA_SIZE {
            return Err(ProtocolError::TooLarge {
                size: data.len(),
                max: MAX_PACKET_DATA_SIZE,
            });
        }
        let value: Value = from_json(data)?;
        if let Value::Object(map) = &value {
            let known = map
                .keys()
                .any(|k| PacketData::TYPE_NAMES.contains(&k.as_str()));
            if map.len() == 1 && !known {
                return Err(ProtocolError::UnknownPacketType);
            }
        }
        serde_json::from_value(value).map_err(|e| ProtocolError::Deserialization(e.to_string()))
    }

    /// Decode the packet-data envelope and extract the post payload.
    pub fn decode_post_packet(data: &[u8]) -> ProtocolResult<PostPayload> {
        Self::decode_packet_data(data)?
            .into_post()
            .ok_or(ProtocolError::UnknownPacketType)
    }

    pub fn encode_ack_result(result: &AckResult) -> ProtocolResult<Vec<u8>> {
        to_json(result)
    }

    pub fn decode_ack_result(data: &[u8]) -> ProtocolResult<AckResult> {
        from_json(data)
    }

    /// Encode a channel acknowledgement.
    pub fn encode_ack(ack: &Acknowledgement) -> ProtocolResult<Vec<u8>> {
        to_json(ack)
    }

    /// Decode a channel acknowledgement.
    ///
    /// Anything that is neither the result form nor the error form is
    /// reported as [`ProtocolError::UnsupportedAck`].
    pub fn decode_ack(data: &[u8]) -> ProtocolResult<Acknowledgement> {
        serde_json::from_slice(data).map_err(|e| ProtocolError::UnsupportedAck(e.to_string()))
    }

    /// Positive acknowledgement carrying `result`.
    pub fn success_ack(result: &AckResult) -> ProtocolResult<Acknowledgement> {
        Ok(Acknowledgement::Result(Self::encode_ack_result(result)?))
    }
}

fn to_json<T: Serialize>(value: &T) -> ProtocolResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| ProtocolError::Serialization(e.to_string()))
}

fn from_json<T: DeserializeOwned>(data: &[u8]) -> ProtocolResult<T> {
    serde_json::from_slice(data).map_err(|e| ProtocolError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn packet_data_roundtrip() {
        let payload = PostPayload::new("alice", "Hello", "World");
        let bytes = PostCodec::encode_packet_data(&payload).unwrap();
        assert_eq!(PostCodec::decode_post_packet(&bytes).unwrap(), payload);
    }

    #[test]
    fn decode_post_packet_rejects_no_data() {
        let err = PostCodec::decode_post_packet(br#"{"noData":{}}"#).unwrap_err();
        assert_eq!(err, ProtocolError::UnknownPacketType);
    }

    #[test]
    fn decode_packet_data_rejects_unknown_variant() {
        let err = PostCodec::decode_packet_data(br#"{"somethingElse":{}}"#).unwrap_err();
        assert_eq!(err, ProtocolError::UnknownPacketType);
    }

    #[test]
    fn decode_packet_data_malformed_is_deserialization_error() {
        let cases: [&[u8]; 4] = [b"{", br#"{"ibcPostPacket":42}"#, br#"{"a":{},"b":{}}"#, b"[]"];
        for data in cases {
            let err = PostCodec::decode_packet_data(data).unwrap_err();
            assert!(matches!(err, ProtocolError::Deserialization(_)), "{err:?}");
        }
    }

    #[test]
    fn encode_rejects_oversized_payload() {
        let payload = PostPayload::new("a", "t", "x".repeat(MAX_PACKET_DATA_SIZE));
        let err = PostCodec::encode_packet_data(&payload).unwrap_err();
        assert!(matches!(err, ProtocolError::TooLarge { .. }));
    }

    #[test]
    fn decode_rejects_oversized_data() {
        let data = vec![b' '; MAX_PACKET_DATA_SIZE + 1];
        let err = PostCodec::decode_packet_data(&data).unwrap_err();
        assert!(matches!(err, ProtocolError::TooLarge { .. }));
    }

    #[test]
    fn ack_result_decodes_reference_bytes() {
        let result = PostCodec::decode_ack_result(br#"{"postID":"7"}"#).unwrap();
        assert_eq!(result, AckResult::new("7"));
    }

    #[test]
    fn ack_result_rejects_garbage() {
        let err = PostCodec::decode_ack_result(b"not json").unwrap_err();
        assert!(matches!(err, ProtocolError::Deserialization(_)));
    }

    #[test]
    fn success_ack_wraps_result() {
        let ack = PostCodec::success_ack(&AckResult::for_post(3)).unwrap();
        match ack {
            Acknowledgement::Result(bytes) => {
                assert_eq!(PostCodec::decode_ack_result(&bytes).unwrap().post_id, "3")
            }
            Acknowledgement::Error(e) => panic!("unexpected error ack: {e}"),
        }
    }

    #[test]
    fn decode_ack_unknown_shape_is_unsupported() {
        let err = PostCodec::decode_ack(br#"{"unknown":"x"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::UnsupportedAck(_)));
        let err = PostCodec::decode_ack(b"\x00\x01").unwrap_err();
        assert!(matches!(err, ProtocolError::UnsupportedAck(_)));
    }

    #[test]
    fn ack_roundtrip_both_forms() {
        for ack in [
            Acknowledgement::Result(b"{}".to_vec()),
            Acknowledgement::Error("boom".into()),
        ] {
            let bytes = PostCodec::encode_ack(&ack).unwrap();
            assert_eq!(PostCodec::decode_ack(&bytes).unwrap(), ack);
        }
    }

    proptest! {
        #[test]
        fn payload_roundtrip(creator in ".*", title in ".*", content in ".*") {
            let payload = PostPayload::new(creator, title, content);
            let bytes = PostCodec::encode_payload(&payload).unwrap();
            prop_assert_eq!(PostCodec::decode_payload(&bytes).unwrap(), payload);
        }

        #[test]
        fn ack_result_roundtrip(id in any::<u64>()) {
            let result = AckResult::for_post(id);
            let bytes = PostCodec::encode_ack_result(&result).unwrap();
            let decoded = PostCodec::decode_ack_result(&bytes).unwrap();
            prop_assert_eq!(decoded.numeric_id(), Some(id));
            prop_assert_eq!(decoded, result);
        }

        #[test]
        fn encoding_is_deterministic(title in "[ -~]{0,64}") {
            let payload = PostPayload::new("alice", title, "body");
            prop_assert_eq!(
                PostCodec::encode_packet_data(&payload).unwrap(),
                PostCodec::encode_packet_data(&payload).unwrap()
            );
        }
    }
}
