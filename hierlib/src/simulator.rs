use std::fmt;
use std::time::{Duration, Instant};
use serde::{Deserialize, Serialize};
use tracing::trace;
use crate::access_log::{AccessLog, LogMode};
use crate::cache::CacheLevel;
use crate::config::{HierarchyConfig, LevelConfig};
use crate::error::ConfigurationError;
use crate::replacement_policies::ReplacementPolicy;

/// Where a top level access was finally served from
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceLevel {
    L1,
    L2,
    Memory,
}

impl fmt::Display for ServiceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceLevel::L1 => f.write_str("L1"),
            ServiceLevel::L2 => f.write_str("L2"),
            ServiceLevel::Memory => f.write_str("Memory"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessOutcome {
    Hit,
    Miss,
}

/// One entry of the hierarchy's log, describing a single top level access
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyAccess {
    pub address: u64,
    pub serviced_by: ServiceLevel,
    /// Every level probed is charged, so an L2 hit costs L1 + L2 latency
    pub latency: u64,
}

impl HierarchyAccess {
    /// A hit in either cache level, a miss if memory had to be used
    pub fn outcome(&self) -> AccessOutcome {
        match self.serviced_by {
            ServiceLevel::L1 | ServiceLevel::L2 => AccessOutcome::Hit,
            ServiceLevel::Memory => AccessOutcome::Miss,
        }
    }
}

/// Statistics for a run. Can be serialised to the output format
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub l1_hit_rate: f64,
    /// Conditional on L1 missing, as L2 is only probed after an L1 miss
    pub l2_hit_rate: f64,
    /// Average memory access time in cycles
    pub amat: f64,
    pub l1_cold_misses: u64,
    pub l2_cold_misses: u64,
}

/// Drives an address sequence through an L1, an L2, and main memory
///
/// Each access probes L1, then L2 on an L1 miss, then memory on an L2 miss. Fills are issued as
/// ordinary `access` calls against the levels they fill, so each level's own counters and log
/// reflect every probe it received, fills included. The simulator's own counters and log are the
/// ones which describe the workload
///
/// It supports calling `run_simulation` multiple times, and will update the time taken to simulate
/// and the statistics accordingly
#[derive(Debug, Clone)]
pub struct HierarchySimulator {
    l1: CacheLevel,
    l2: CacheLevel,
    memory_latency: u64,
    total_accesses: u64,
    total_cycles: u64,
    l1_hits: u64,
    l2_hits: u64,
    log: AccessLog<HierarchyAccess>,
    simulation_time: Duration,
}

impl HierarchySimulator {
    /// Creates a new simulator with two empty levels
    ///
    /// # Arguments
    ///
    /// * `l1`, `l2`: Geometry and latency of each level
    /// * `memory_latency`: Cycles charged for going to memory, on top of both level latencies
    /// * `l1_policy`, `l2_policy`: Independent replacement policies for each level
    ///
    /// returns: Result<HierarchySimulator, ConfigurationError>
    pub fn new(
        l1: &LevelConfig,
        l2: &LevelConfig,
        memory_latency: u64,
        l1_policy: ReplacementPolicy,
        l2_policy: ReplacementPolicy,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            l1: CacheLevel::new(l1, "L1", l1_policy)?,
            l2: CacheLevel::new(l2, "L2", l2_policy)?,
            memory_latency,
            total_accesses: 0,
            total_cycles: 0,
            l1_hits: 0,
            l2_hits: 0,
            log: AccessLog::default(),
            simulation_time: Duration::new(0, 0),
        })
    }

    /// Creates a new simulator for a given configuration, usually resulting from parsing JSON
    pub fn from_config(config: &HierarchyConfig) -> Result<Self, ConfigurationError> {
        Ok(Self::new(&config.l1, &config.l2, config.memory_latency, config.l1_policy, config.l2_policy)?
            .with_log_mode(config.log_mode))
    }

    /// Applies a log mode to the hierarchy's log and to both levels' logs
    pub fn with_log_mode(mut self, mode: LogMode) -> Self {
        self.l1.set_log_mode(mode);
        self.l2.set_log_mode(mode);
        self.log.set_mode(mode);
        self
    }

    /// Performs one read through the hierarchy
    ///
    /// On an L2 hit the block is brought into L1 by probing L1 again. On a miss in both, L2 and
    /// then L1 are probed again to fill them from memory
    pub fn access(&mut self, address: u64) -> HierarchyAccess {
        self.total_accesses += 1;

        let l1 = self.l1.access(address);
        let record = if l1.hit {
            self.l1_hits += 1;
            HierarchyAccess { address, serviced_by: ServiceLevel::L1, latency: l1.latency }
        } else {
            let l2 = self.l2.access(address);
            if l2.hit {
                self.l2_hits += 1;
                self.l1.access(address);
                HierarchyAccess { address, serviced_by: ServiceLevel::L2, latency: l1.latency + l2.latency }
            } else {
                self.l2.access(address);
                self.l1.access(address);
                HierarchyAccess {
                    address,
                    serviced_by: ServiceLevel::Memory,
                    latency: l1.latency + l2.latency + self.memory_latency,
                }
            }
        };

        self.total_cycles += record.latency;
        trace!(address, serviced_by = %record.serviced_by, latency = record.latency, "Access");
        self.log.push(record);
        record
    }

    /// Accesses every address in order
    pub fn run_simulation<I: IntoIterator<Item = u64>>(&mut self, addresses: I) {
        let start = Instant::now();
        for address in addresses {
            self.access(address);
        }
        self.simulation_time += start.elapsed();
    }

    /// Hit rates, AMAT, and cold miss counts for everything simulated so far
    ///
    /// Every ratio falls back to 0 when its denominator is 0
    pub fn stats(&self) -> SimulationStats {
        let l1_misses = self.total_accesses - self.l1_hits;
        SimulationStats {
            l1_hit_rate: ratio(self.l1_hits, self.total_accesses),
            l2_hit_rate: ratio(self.l2_hits, l1_misses),
            amat: ratio(self.total_cycles, self.total_accesses),
            l1_cold_misses: self.l1.cold_misses(),
            l2_cold_misses: self.l2.cold_misses(),
        }
    }

    pub fn l1(&self) -> &CacheLevel {
        &self.l1
    }

    pub fn l2(&self) -> &CacheLevel {
        &self.l2
    }

    pub fn memory_latency(&self) -> u64 {
        self.memory_latency
    }

    pub fn total_accesses(&self) -> u64 {
        self.total_accesses
    }

    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Top level accesses which were served by L1
    pub fn l1_hits(&self) -> u64 {
        self.l1_hits
    }

    /// Top level accesses which missed L1 and were served by L2
    pub fn l2_hits(&self) -> u64 {
        self.l2_hits
    }

    pub fn log(&self) -> &AccessLog<HierarchyAccess> {
        &self.log
    }

    /// Gets the wall-clock time spent in `run_simulation`
    pub fn execution_time(&self) -> &Duration {
        &self.simulation_time
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
