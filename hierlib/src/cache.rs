use std::ops::Range;
use serde::Serialize;
use tracing::debug;
use crate::access_log::{AccessLog, LogMode};
use crate::config::LevelConfig;
use crate::error::ConfigurationError;
use crate::replacement_policies::ReplacementPolicy;

/// One way of a set
///
/// `tag` is only meaningful while `valid` is set, an invalid block never matches. The timestamps
/// are `None` until the owning level first stamps them, which orders them before any real time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheBlock {
    pub valid: bool,
    pub tag: u64,
    /// Read by LRU, stamped on every hit and on LRU fills
    pub last_used: Option<u64>,
    /// Read by FIFO, stamped on FIFO fills only
    pub inserted_at: Option<u64>,
}

/// The answer a single level gives to one probe
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LevelResponse {
    pub hit: bool,
    pub latency: u64,
}

/// One entry of a level's own access log
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct LevelLogEntry {
    pub address: u64,
    pub set_index: u64,
    pub hit: bool,
}

/// A single set-associative cache level
///
/// The general approach is one flat vector of blocks, where set `s` owns the ways
/// `s * associativity..(s + 1) * associativity`. Addresses are decomposed by division rather than
/// bit masks, so block sizes and set counts need not be powers of two
///
/// The level keeps a logical clock which advances once per `access`. It is only used to order
/// blocks for replacement, and is never shared with another level
#[derive(Debug, Clone)]
pub struct CacheLevel {
    name: String,
    block_size: u64,
    associativity: usize,
    num_blocks: u64,
    num_sets: u64,
    access_latency: u64,
    policy: ReplacementPolicy,
    blocks: Vec<CacheBlock>,
    time: u64,
    hits: u64,
    misses: u64,
    cold_misses: u64,
    access_log: AccessLog<LevelLogEntry>,
}

impl CacheLevel {
    /// Creates an empty cache level, with every block invalid
    ///
    /// # Arguments
    ///
    /// * `config`: Capacity, block size, associativity, and access latency
    /// * `name`: A human readable name, used in logs
    /// * `policy`: The replacement policy used once a set is full
    ///
    /// returns: Result<CacheLevel, ConfigurationError>, failing if the geometry would produce a
    /// cache without sets, or with a capacity that doesn't divide evenly into sets
    pub fn new(config: &LevelConfig, name: impl Into<String>, policy: ReplacementPolicy) -> Result<Self, ConfigurationError> {
        let LevelConfig { size, block_size, associativity, latency } = *config;
        if block_size == 0 {
            return Err(ConfigurationError::ZeroBlockSize);
        }
        if associativity == 0 {
            return Err(ConfigurationError::ZeroAssociativity);
        }
        // A set wider than u64::MAX bytes can't fit in any capacity
        let set_bytes = match block_size.checked_mul(associativity) {
            Some(set_bytes) if set_bytes <= size => set_bytes,
            _ => return Err(ConfigurationError::NoSets { size, block_size, associativity }),
        };
        if size % set_bytes != 0 {
            return Err(ConfigurationError::UnevenCapacity { size, block_size, associativity });
        }
        let num_blocks = size / block_size;
        let num_sets = num_blocks / associativity;
        let name = name.into();
        debug!(level = %name, num_sets, associativity, block_size, %policy, "Created cache level");
        Ok(Self {
            name,
            block_size,
            associativity: associativity as usize,
            num_blocks,
            num_sets,
            access_latency: latency,
            policy,
            blocks: vec![CacheBlock::default(); num_blocks as usize],
            time: 0,
            hits: 0,
            misses: 0,
            cold_misses: 0,
            access_log: AccessLog::default(),
        })
    }

    /// Replaces the access log policy, see `LogMode`
    pub fn with_log_mode(mut self, mode: LogMode) -> Self {
        self.set_log_mode(mode);
        self
    }

    pub fn set_log_mode(&mut self, mode: LogMode) {
        self.access_log.set_mode(mode);
    }

    /// Splits an address into its set index and tag
    ///
    /// The block address (address / block size) is what the cache tracks, the offset within the
    /// block is discarded
    ///
    /// # Examples
    ///
    /// ```
    /// use hierlib::cache::CacheLevel;
    /// use hierlib::config::LevelConfig;
    /// use hierlib::replacement_policies::ReplacementPolicy;
    /// // 16 blocks of 4 bytes, direct mapped, so 16 sets
    /// let level = CacheLevel::new(&LevelConfig::new(64, 4, 1, 1), "L1", ReplacementPolicy::LeastRecentlyUsed).unwrap();
    /// assert_eq!(level.address_to_set_and_tag(0x47), (1, 1));
    /// ```
    pub fn address_to_set_and_tag(&self, address: u64) -> (u64, u64) {
        let block_address = address / self.block_size;
        (block_address % self.num_sets, block_address / self.num_sets)
    }

    /// Probes the level for an address, filling it on a miss
    ///
    /// On a hit the block's `last_used` is refreshed. On a miss a way is chosen by the replacement
    /// policy and the tag is installed, a miss which lands in an empty way also counts as a cold
    /// miss. Both outcomes cost the level's access latency and are appended to the access log
    pub fn access(&mut self, address: u64) -> LevelResponse {
        self.time += 1;
        let time = self.time;
        let (set_index, tag) = self.address_to_set_and_tag(address);
        let set = &mut self.blocks[set_range(set_index as usize, self.associativity)];

        if let Some(block) = set.iter_mut().find(|block| block.valid && block.tag == tag) {
            block.last_used = Some(time);
            self.hits += 1;
            self.access_log.push(LevelLogEntry { address, set_index, hit: true });
            return LevelResponse { hit: true, latency: self.access_latency };
        }

        self.misses += 1;
        if set.iter().any(|block| !block.valid) {
            self.cold_misses += 1;
        }
        let way = self.policy.select_victim(set);
        let victim = &mut set[way];
        if victim.valid {
            debug!(level = %self.name, set = set_index, way, evicted = victim.tag, tag, "Evicted block");
        }
        self.policy.install(victim, tag, time);
        self.access_log.push(LevelLogEntry { address, set_index, hit: false });
        LevelResponse { hit: false, latency: self.access_latency }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hits across every probe, including probes issued to fill the level
    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Misses which were filled into a set that still had an invalid way
    pub fn cold_misses(&self) -> u64 {
        self.cold_misses
    }

    pub fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    pub fn access_latency(&self) -> u64 {
        self.access_latency
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    pub fn associativity(&self) -> usize {
        self.associativity
    }

    pub fn num_blocks(&self) -> u64 {
        self.num_blocks
    }

    pub fn num_sets(&self) -> u64 {
        self.num_sets
    }

    pub fn policy(&self) -> ReplacementPolicy {
        self.policy
    }

    pub fn access_log(&self) -> &AccessLog<LevelLogEntry> {
        &self.access_log
    }

    /// The ways of a set, in order, or None if the index is out of range
    pub fn set(&self, index: u64) -> Option<&[CacheBlock]> {
        if index >= self.num_sets {
            return None;
        }
        self.blocks.get(set_range(index as usize, self.associativity))
    }

    /// Every set in index order
    pub fn sets(&self) -> impl Iterator<Item = &[CacheBlock]> + '_ {
        self.blocks.chunks(self.associativity)
    }

    /// Gets the number of ways which have never been filled. Useful for analysing cache
    /// performance or debugging
    pub fn invalid_way_count(&self) -> usize {
        self.blocks.iter().filter(|block| !block.valid).count()
    }
}

fn set_range(set_index: usize, associativity: usize) -> Range<usize> {
    set_index * associativity..(set_index + 1) * associativity
}
