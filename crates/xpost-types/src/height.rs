use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Revision-aware block height of a counterparty chain.
///
/// A height is ordered by `revision_number` first, then `revision_height`.
/// The zero height means "no height timeout" when used as a packet bound.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Height {
    /// Chain revision (bumped on upgrades that reset block height).
    pub revision_number: u64,
    /// Block height within the revision.
    pub revision_height: u64,
}

impl Height {
    /// Create a new height with explicit values.
    pub const fn new(revision_number: u64, revision_height: u64) -> Self {
        Self {
            revision_number,
            revision_height,
        }
    }

    /// The zero height. Disables the height bound on a packet.
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    /// Returns `true` if both components are zero.
    pub fn is_zero(&self) -> bool {
        self.revision_number == 0 && self.revision_height == 0
    }

    /// The next block in the same revision.
    pub fn increment(&self) -> Self {
        Self::new(self.revision_number, self.revision_height + 1)
    }
}

impl PartialOrd for Height {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Height {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.revision_number
            .cmp(&other.revision_number)
            .then(self.revision_height.cmp(&other.revision_height))
    }
}

impl fmt::Debug for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Height({}-{})", self.revision_number, self.revision_height)
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.revision_number, self.revision_height)
    }
}

/// Parses the `{revision_number}-{revision_height}` form.
impl FromStr for Height {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (number, height) = s
            .split_once('-')
            .ok_or_else(|| TypeError::InvalidHeight(format!("missing '-' in {s:?}")))?;
        let revision_number = number
            .parse()
            .map_err(|_| TypeError::InvalidHeight(format!("bad revision number in {s:?}")))?;
        let revision_height = height
            .parse()
            .map_err(|_| TypeError::InvalidHeight(format!("bad revision height in {s:?}")))?;
        Ok(Self::new(revision_number, revision_height))
    }
}
