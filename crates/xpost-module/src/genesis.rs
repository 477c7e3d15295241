use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use xpost_store::Settlement;
use xpost_types::{PacketId, PostRecord, SentPostRecord, TimedOutPostRecord};

use crate::error::{PostError, PostResult};

/// Exported module state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenesisState {
    pub port_id: String,
    pub posts: Vec<PostRecord>,
    pub post_count: u64,
    pub sent_posts: Vec<SentPostRecord>,
    pub sent_post_count: u64,
    pub timed_out_posts: Vec<TimedOutPostRecord>,
    pub timed_out_post_count: u64,
    /// Terminal outcome of every packet this chain sent and reconciled.
    #[serde(default)]
    pub settlements: Vec<(PacketId, Settlement)>,
}

impl Default for GenesisState {
    fn default() -> Self {
        Self {
            port_id: "blog".into(),
            posts: Vec::new(),
            post_count: 0,
            sent_posts: Vec::new(),
            sent_post_count: 0,
            timed_out_posts: Vec::new(),
            timed_out_post_count: 0,
            settlements: Vec::new(),
        }
    }
}

impl GenesisState {
    /// Reject empty ports, duplicate ids, and ids at or above their count.
    pub fn validate(&self) -> PostResult<()> {
        if self.port_id.trim().is_empty() {
            return Err(PostError::Genesis("port ID must not be empty".into()));
        }
        check_ids("post", self.posts.iter().map(|r| r.id), self.post_count)?;
        check_ids(
            "sent post",
            self.sent_posts.iter().map(|r| r.id),
            self.sent_post_count,
        )?;
        check_ids(
            "timed-out post",
            self.timed_out_posts.iter().map(|r| r.id),
            self.timed_out_post_count,
        )?;
        let mut settled = BTreeSet::new();
        for (packet, _) in &self.settlements {
            if !settled.insert(packet) {
                return Err(PostError::Genesis(format!("packet {packet} settled twice")));
            }
        }
        Ok(())
    }

    /// Parse a JSON document and validate it.
    pub fn from_json(data: &[u8]) -> PostResult<Self> {
        let genesis: Self =
            serde_json::from_slice(data).map_err(|e| PostError::Genesis(e.to_string()))?;
        genesis.validate()?;
        Ok(genesis)
    }

    pub fn to_json_pretty(&self) -> PostResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PostError::Genesis(e.to_string()))
    }
}

fn check_ids(kind: &str, ids: impl Iterator<Item = u64>, count: u64) -> PostResult<()> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(PostError::Genesis(format!("duplicated id {id} for {kind}")));
        }
        if id >= count {
            return Err(PostError::Genesis(format!(
                "{kind} id {id} should be lower than count {count}"
            )));
        }
    }
    Ok(())
}
