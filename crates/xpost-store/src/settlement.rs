use std::fmt;

use serde::{Deserialize, Serialize};

/// Terminal outcome of an originated packet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Settlement {
    /// The counterparty applied the post and returned its id.
    Acknowledged { post_id: String },
    /// The counterparty returned an error acknowledgement.
    Rejected { reason: String },
    /// The packet expired before it was received.
    TimedOut,
}

impl Settlement {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Acknowledged { .. } => "acknowledged",
            Self::Rejected { .. } => "rejected",
            Self::TimedOut => "timed-out",
        }
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Acknowledged { post_id } => write!(f, "acknowledged (post {post_id})"),
            Self::Rejected { reason } => write!(f, "rejected: {reason}"),
            Self::TimedOut => f.write_str("timed-out"),
        }
    }
}
