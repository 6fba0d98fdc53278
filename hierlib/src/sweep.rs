use serde::{Deserialize, Serialize};
use tracing::info;
use crate::config::{LevelConfig, SweepConfig};
use crate::error::ConfigurationError;
use crate::replacement_policies::ReplacementPolicy;
use crate::simulator::HierarchySimulator;
use crate::workload::{generate_workload, AccessPattern};

/// The result of one configuration in a sweep. Field names match the CSV columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRecord {
    #[serde(rename = "L1 Size")]
    pub l1_size: u64,
    #[serde(rename = "L2 Size")]
    pub l2_size: u64,
    #[serde(rename = "L1 Assoc")]
    pub l1_associativity: u64,
    #[serde(rename = "L2 Assoc")]
    pub l2_associativity: u64,
    #[serde(rename = "Block Size")]
    pub block_size: u64,
    #[serde(rename = "Workload")]
    pub workload: AccessPattern,
    #[serde(rename = "Policy")]
    pub policy: ReplacementPolicy,
    #[serde(rename = "L1 Hit Rate")]
    pub l1_hit_rate: f64,
    #[serde(rename = "L2 Hit Rate")]
    pub l2_hit_rate: f64,
    #[serde(rename = "AMAT")]
    pub amat: f64,
    #[serde(rename = "L1 Cold Misses")]
    pub l1_cold_misses: u64,
    #[serde(rename = "L2 Cold Misses")]
    pub l2_cold_misses: u64,
}

/// AMAT across every record sharing a workload and policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmatSummary {
    pub workload: AccessPattern,
    pub policy: ReplacementPolicy,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub runs: usize,
}

/// Simulates every point of the sweep grid
///
/// The grid is walked in the order L1 size, L2 size, L1 associativity, L2 associativity, block
/// size, workload, policy. Each point gets a fresh simulator and a freshly generated workload with
/// a stride of one block. A single generator seeded from the configuration is shared across the
/// whole sweep, so results are reproducible for a given seed
///
/// returns: Result<Vec<SweepRecord>, ConfigurationError>, failing on the first point whose
/// geometry is degenerate
pub fn run_sweep(config: &SweepConfig) -> Result<Vec<SweepRecord>, ConfigurationError> {
    let mut rng = fastrand::Rng::with_seed(config.seed);
    let mut records = Vec::new();
    for &l1_size in &config.cache_sizes {
        for &l2_size in &config.cache_sizes {
            for &l1_associativity in &config.associativities {
                for &l2_associativity in &config.associativities {
                    for &block_size in &config.block_sizes {
                        for &workload in &config.workloads {
                            for &policy in &config.policies {
                                let l1 = LevelConfig::new(l1_size, block_size, l1_associativity, config.l1_latency);
                                let l2 = LevelConfig::new(l2_size, block_size, l2_associativity, config.l2_latency);
                                let addresses = generate_workload(workload, config.workload_size, block_size, &mut rng)?;
                                let mut simulator = HierarchySimulator::new(&l1, &l2, config.memory_latency, policy, policy)?;
                                simulator.run_simulation(addresses);
                                let stats = simulator.stats();
                                info!(
                                    "Done: L1 {l1_size}B, L2 {l2_size}B, L1 Assoc {l1_associativity}, L2 Assoc {l2_associativity}, \
                                     Blk {block_size}, WL {workload}, Policy {policy} | L1 Hit: {:.2}, L2 Hit: {:.2}, AMAT: {:.2}, \
                                     L1 Cold Misses: {}, L2 Cold Misses: {}",
                                    stats.l1_hit_rate, stats.l2_hit_rate, stats.amat, stats.l1_cold_misses, stats.l2_cold_misses
                                );
                                records.push(SweepRecord {
                                    l1_size,
                                    l2_size,
                                    l1_associativity,
                                    l2_associativity,
                                    block_size,
                                    workload,
                                    policy,
                                    l1_hit_rate: stats.l1_hit_rate,
                                    l2_hit_rate: stats.l2_hit_rate,
                                    amat: stats.amat,
                                    l1_cold_misses: stats.l1_cold_misses,
                                    l2_cold_misses: stats.l2_cold_misses,
                                });
                            }
                        }
                    }
                }
            }
        }
    }
    Ok(records)
}

/// Groups records by workload and policy, in order of first appearance
///
/// This is the grouping and ordering printed under "Analysis Summary" by the sweep command, one
/// entry per workload and policy pair with the average, minimum, and maximum AMAT
pub fn summarize(records: &[SweepRecord]) -> Vec<AmatSummary> {
    let mut summaries: Vec<AmatSummary> = Vec::new();
    for record in records {
        match summaries.iter_mut().find(|s| s.workload == record.workload && s.policy == record.policy) {
            Some(summary) => {
                // Holds the running total until the end
                summary.average += record.amat;
                summary.min = summary.min.min(record.amat);
                summary.max = summary.max.max(record.amat);
                summary.runs += 1;
            }
            None => summaries.push(AmatSummary {
                workload: record.workload,
                policy: record.policy,
                average: record.amat,
                min: record.amat,
                max: record.amat,
                runs: 1,
            }),
        }
    }
    for summary in &mut summaries {
        summary.average /= summary.runs as f64;
    }
    summaries
}
