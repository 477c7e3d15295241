use serde::{Deserialize, Serialize};
use xpost_types::PostPayload;

use crate::config::ModuleConfig;
use crate::error::{PostError, PostResult};

/// Request to send a post to the counterparty of `port/channel_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MsgSendIbcPost {
    pub creator: String,
    pub port: String,
    #[serde(rename = "channelID")]
    pub channel_id: String,
    /// Counterparty time (ns) after which the post times out. Zero selects
    /// the configured default offset from the current time.
    pub timeout_timestamp: u64,
    pub title: String,
    pub content: String,
}

impl MsgSendIbcPost {
    pub fn new(
        creator: impl Into<String>,
        port: impl Into<String>,
        channel_id: impl Into<String>,
        timeout_timestamp: u64,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            creator: creator.into(),
            port: port.into(),
            channel_id: channel_id.into(),
            timeout_timestamp,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Stateless checks against the module's limits.
    pub fn validate_basic(&self, config: &ModuleConfig) -> PostResult<()> {
        if self.creator.trim().is_empty() {
            return Err(PostError::InvalidMessage("creator must not be empty".into()));
        }
        if self.port.trim().is_empty() {
            return Err(PostError::InvalidMessage("port must not be empty".into()));
        }
        if self.channel_id.trim().is_empty() {
            return Err(PostError::InvalidMessage("channel ID must not be empty".into()));
        }
        if self.title.trim().is_empty() {
            return Err(PostError::InvalidMessage("title must not be empty".into()));
        }
        if self.title.len() > config.max_title_len {
            return Err(PostError::InvalidMessage(format!(
                "title is {} bytes, max {}",
                self.title.len(),
                config.max_title_len
            )));
        }
        if self.content.len() > config.max_content_len {
            return Err(PostError::InvalidMessage(format!(
                "content is {} bytes, max {}",
                self.content.len(),
                config.max_content_len
            )));
        }
        Ok(())
    }

    /// The payload this message sends.
    pub fn payload(&self) -> PostPayload {
        PostPayload::new(&self.creator, &self.title, &self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg() -> MsgSendIbcPost {
        MsgSendIbcPost::new("alice", "blog", "channel-0", 0, "Hello", "World")
    }

    #[test]
    fn valid_message_passes() {
        msg().validate_basic(&ModuleConfig::default()).unwrap();
    }

    #[test]
    fn empty_fields_rejected() {
        let config = ModuleConfig::default();
        let mut m = msg();
        m.creator.clear();
        assert!(matches!(m.validate_basic(&config), Err(PostError::InvalidMessage(_))));

        let mut m = msg();
        m.channel_id = " ".into();
        assert!(matches!(m.validate_basic(&config), Err(PostError::InvalidMessage(_))));

        let mut m = msg();
        m.title.clear();
        assert!(matches!(m.validate_basic(&config), Err(PostError::InvalidMessage(_))));
    }

    #[test]
    fn length_limits_enforced() {
        let config = ModuleConfig {
            max_title_len: 4,
            max_content_len: 8,
            ..ModuleConfig::default()
        };
        let mut m = msg();
        m.title = "12345".into();
        assert!(m.validate_basic(&config).is_err());

        let mut m = msg();
        m.title = "1234".into();
        m.content = "123456789".into();
        assert!(m.validate_basic(&config).is_err());
    }

    #[test]
    fn payload_copies_fields() {
        let p = msg().payload();
        assert_eq!(p, PostPayload::new("alice", "Hello", "World"));
    }

    #[test]
    fn json_field_names() {
        let json = serde_json::to_value(msg()).unwrap();
        assert_eq!(json["channelID"], "channel-0");
        assert_eq!(json["timeoutTimestamp"], 0);
    }
}
