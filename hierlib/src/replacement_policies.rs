use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::cache::CacheBlock;
use crate::error::ConfigurationError;

/// The replacement policies provided by the library
///
/// The two policies differ only in which timestamp of a block they read and write, so a closed
/// enum branched on inside the cache is all that's needed. Serialised as `LRU` or `FIFO`, and
/// parsed case-insensitively so JSON configurations go through the same checks as `FromStr`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ReplacementPolicy {
    /// Evicts the way with the oldest `last_used` timestamp
    #[default]
    LeastRecentlyUsed,
    /// Evicts the way with the oldest `inserted_at` timestamp, ignoring how recently it was read
    FirstInFirstOut,
}

impl ReplacementPolicy {
    /// Chooses the way of a set to fill on a miss
    ///
    /// The first invalid way wins regardless of policy. Otherwise the way holding the minimum of
    /// the policy's timestamp is chosen, ties going to the way found first in set order
    ///
    /// # Arguments
    ///
    /// * `set`: The ways of the set, in order. Must not be empty
    ///
    /// returns: usize, the way index within the set
    pub fn select_victim(&self, set: &[CacheBlock]) -> usize {
        if let Some(way) = set.iter().position(|block| !block.valid) {
            return way;
        }
        // min_by_key keeps the first of equal minimums
        let victim = match self {
            ReplacementPolicy::LeastRecentlyUsed => set.iter().enumerate().min_by_key(|(_, block)| block.last_used),
            ReplacementPolicy::FirstInFirstOut => set.iter().enumerate().min_by_key(|(_, block)| block.inserted_at),
        };
        victim.map(|(way, _)| way).unwrap_or(0)
    }

    /// Installs a new tag into a block chosen by `select_victim`
    ///
    /// Each policy only stamps the timestamp it reads, LRU leaves `inserted_at` alone and FIFO
    /// leaves `last_used` alone
    pub fn install(&self, block: &mut CacheBlock, tag: u64, time: u64) {
        block.valid = true;
        block.tag = tag;
        match self {
            ReplacementPolicy::LeastRecentlyUsed => block.last_used = Some(time),
            ReplacementPolicy::FirstInFirstOut => block.inserted_at = Some(time),
        }
    }
}

impl FromStr for ReplacementPolicy {
    type Err = ConfigurationError;

    /// # Examples
    ///
    /// ```
    /// use hierlib::replacement_policies::ReplacementPolicy;
    /// assert_eq!("fifo".parse::<ReplacementPolicy>().unwrap(), ReplacementPolicy::FirstInFirstOut);
    /// assert!("mru".parse::<ReplacementPolicy>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LRU" | "LEAST-RECENTLY-USED" => Ok(ReplacementPolicy::LeastRecentlyUsed),
            "FIFO" | "FIRST-IN-FIRST-OUT" => Ok(ReplacementPolicy::FirstInFirstOut),
            _ => Err(ConfigurationError::UnknownReplacementPolicy(s.to_string())),
        }
    }
}

impl TryFrom<String> for ReplacementPolicy {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReplacementPolicy> for String {
    fn from(value: ReplacementPolicy) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplacementPolicy::LeastRecentlyUsed => f.write_str("LRU"),
            ReplacementPolicy::FirstInFirstOut => f.write_str("FIFO"),
        }
    }
}
