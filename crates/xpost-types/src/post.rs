use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Builds the creator string of a record that arrived from another chain.
///
/// The result is `{source_port}-{source_channel}-{creator}`. Downstream
/// consumers match on this exact form, so the separator and the field order
/// must not change.
pub fn remote_creator(source_port: &str, source_channel: &str, creator: &str) -> String {
    format!("{source_port}-{source_channel}-{creator}")
}

/// `{port}-{channel}` label identifying the counterparty a post was sent to.
pub fn chain_label(port: &str, channel: &str) -> String {
    format!("{port}-{channel}")
}

/// Application content carried by a post packet.
///
/// Field order is part of the wire format: the JSON encoding is
/// `{"title":..,"content":..,"creator":..}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PostPayload {
    pub title: String,
    pub content: String,
    pub creator: String,
}

impl PostPayload {
    pub fn new(
        creator: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            creator: creator.into(),
        }
    }

    /// Stateless structural checks run before the payload is applied.
    pub fn validate_basic(&self) -> Result<(), TypeError> {
        if self.creator.trim().is_empty() {
            return Err(TypeError::InvalidPost("creator must not be empty".into()));
        }
        if self.title.trim().is_empty() {
            return Err(TypeError::InvalidPost("title must not be empty".into()));
        }
        Ok(())
    }
}

/// A post stored on this chain.
///
/// Records created from a remote payload carry a creator built with
/// [`remote_creator`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub creator: String,
}

impl PostRecord {
    /// Build the record for a payload received over `source_port/source_channel`.
    ///
    /// The id is a placeholder until the post store assigns one.
    pub fn from_remote(source_port: &str, source_channel: &str, payload: &PostPayload) -> Self {
        Self {
            id: 0,
            title: payload.title.clone(),
            content: payload.content.clone(),
            creator: remote_creator(source_port, source_channel, &payload.creator),
        }
    }
}

/// Success payload of a positive acknowledgement.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AckResult {
    /// Decimal id of the post created on the receiving chain.
    #[serde(rename = "postID")]
    pub post_id: String,
}

impl AckResult {
    pub fn new(post_id: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
        }
    }

    /// Acknowledge the post stored under `id`.
    pub fn for_post(id: u64) -> Self {
        Self::new(id.to_string())
    }

    /// The numeric post id, if the counterparty sent a well-formed one.
    pub fn numeric_id(&self) -> Option<u64> {
        self.post_id.parse().ok()
    }
}

/// Sender-side record of a post the counterparty acknowledged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentPostRecord {
    pub id: u64,
    #[serde(rename = "postID")]
    pub post_id: String,
    pub title: String,
    pub chain: String,
    pub creator: String,
}

/// Sender-side record of a post whose packet timed out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedOutPostRecord {
    pub id: u64,
    pub title: String,
    pub chain: String,
    pub creator: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn remote_creator_format() {
        assert_eq!(
            remote_creator("post", "channel-0", "alice"),
            "post-channel-0-alice"
        );
    }

    #[test]
    fn chain_label_format() {
        assert_eq!(chain_label("post", "channel-1"), "post-channel-1");
    }

    #[test]
    fn from_remote_copies_content_verbatim() {
        let payload = PostPayload::new("alice", "T", "  C\n");
        let record = PostRecord::from_remote("post", "channel-0", &payload);
        assert_eq!(record.creator, "post-channel-0-alice");
        assert_eq!(record.title, "T");
        assert_eq!(record.content, "  C\n");
    }

    #[test]
    fn validate_rejects_empty_creator() {
        let err = PostPayload::new("", "T", "C").validate_basic().unwrap_err();
        assert!(matches!(err, TypeError::InvalidPost(_)));
    }

    #[test]
    fn validate_rejects_blank_title() {
        let err = PostPayload::new("alice", "   ", "C").validate_basic().unwrap_err();
        assert!(matches!(err, TypeError::InvalidPost(_)));
    }

    #[test]
    fn validate_allows_empty_content() {
        PostPayload::new("alice", "T", "").validate_basic().unwrap();
    }

    #[test]
    fn payload_json_field_order() {
        let json = serde_json::to_string(&PostPayload::new("c", "t", "b")).unwrap();
        assert_eq!(json, r#"{"title":"t","content":"b","creator":"c"}"#);
    }

    #[test]
    fn ack_result_json_name() {
        let json = serde_json::to_string(&AckResult::for_post(7)).unwrap();
        assert_eq!(json, r#"{"postID":"7"}"#);
    }

    #[test]
    fn ack_result_numeric_id() {
        assert_eq!(AckResult::new("42").numeric_id(), Some(42));
        assert_eq!(AckResult::new("x").numeric_id(), None);
    }

    proptest! {
        #[test]
        fn remote_creator_keeps_original_suffix(
            port in "[a-z]{1,8}",
            channel in "channel-[0-9]{1,4}",
            creator in "[a-z0-9]{1,20}",
        ) {
            let mangled = remote_creator(&port, &channel, &creator);
            let expected_suffix = format!("-{}", creator);
            let expected_prefix = format!("{}-{}-", port, channel);
            prop_assert!(mangled.ends_with(&expected_suffix));
            prop_assert!(mangled.starts_with(&expected_prefix));
            prop_assert_ne!(mangled, creator);
        }
    }
}
