use serde::{Deserialize, Serialize};
use crate::access_log::LogMode;
use crate::replacement_policies::ReplacementPolicy;
use crate::workload::AccessPattern;

/// A two level hierarchy configuration, usually parsed from JSON
///
/// ```json
/// {
///     "l1": { "size": 64, "block_size": 4, "associativity": 1, "latency": 1 },
///     "l2": { "size": 128, "block_size": 4, "associativity": 2, "latency": 5 },
///     "memory_latency": 50,
///     "l1_policy": "LRU",
///     "l2_policy": "FIFO"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyConfig {
    pub l1: LevelConfig,
    pub l2: LevelConfig,
    pub memory_latency: u64,
    #[serde(default)]
    pub l1_policy: ReplacementPolicy,
    #[serde(default)]
    pub l2_policy: ReplacementPolicy,
    #[serde(default)]
    pub log_mode: LogMode,
}

/// The geometry and latency of a single cache level. Sizes are in bytes, latency is in cycles
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub size: u64,
    pub block_size: u64,
    pub associativity: u64,
    pub latency: u64,
}

impl LevelConfig {
    pub fn new(size: u64, block_size: u64, associativity: u64, latency: u64) -> Self {
        Self {
            size,
            block_size,
            associativity,
            latency,
        }
    }
}

/// The grid explored by a sweep. Every field is optional, defaulting to the standard experiment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Used for both L1 and L2 sizes
    pub cache_sizes: Vec<u64>,
    /// Used for both L1 and L2 associativity
    pub associativities: Vec<u64>,
    /// Shared by both levels, also the workload stride
    pub block_sizes: Vec<u64>,
    pub workloads: Vec<AccessPattern>,
    /// Applied to both levels
    pub policies: Vec<ReplacementPolicy>,
    pub memory_latency: u64,
    pub l1_latency: u64,
    pub l2_latency: u64,
    /// Number of addresses generated per configuration
    pub workload_size: usize,
    pub seed: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            cache_sizes: vec![64, 128],
            associativities: vec![1, 2, 4],
            block_sizes: vec![4, 8],
            workloads: vec![AccessPattern::Sequential, AccessPattern::Looping, AccessPattern::Random],
            policies: vec![ReplacementPolicy::LeastRecentlyUsed, ReplacementPolicy::FirstInFirstOut],
            memory_latency: 50,
            l1_latency: 1,
            l2_latency: 5,
            workload_size: 100,
            seed: 42,
        }
    }
}
