use std::error::Error;
use crate::config::SweepConfig;
use crate::error::ConfigurationError;
use crate::replacement_policies::ReplacementPolicy;
use crate::sweep::{run_sweep, summarize, SweepRecord};
use crate::test::init;
use crate::workload::AccessPattern;

#[test]
fn default_sweep_covers_the_grid() -> Result<(), Box<dyn Error>> {
    init();
    let records = run_sweep(&SweepConfig::default())?;
    assert_eq!(records.len(), 2 * 2 * 3 * 3 * 2 * 3 * 2);
    for record in &records {
        assert!((0.0..=1.0).contains(&record.l1_hit_rate));
        assert!((0.0..=1.0).contains(&record.l2_hit_rate));
        assert!(record.amat >= 1.0);
    }
    // Innermost loop is the policy
    assert_eq!(records[0].policy, ReplacementPolicy::LeastRecentlyUsed);
    assert_eq!(records[1].policy, ReplacementPolicy::FirstInFirstOut);
    assert_eq!(records[0].workload, AccessPattern::Sequential);
    assert_eq!(records[2].workload, AccessPattern::Looping);
    Ok(())
}

#[test]
fn sequential_workloads_never_hit() -> Result<(), Box<dyn Error>> {
    let records = run_sweep(&SweepConfig::default())?;
    for record in records.iter().filter(|r| r.workload == AccessPattern::Sequential) {
        assert_eq!(record.l1_hit_rate, 0.0);
        assert_eq!(record.l2_hit_rate, 0.0);
        assert_eq!(record.amat, 56.0);
    }
    Ok(())
}

#[test]
fn looping_workload_fits_small_l1() -> Result<(), Box<dyn Error>> {
    let config = SweepConfig {
        cache_sizes: vec![64],
        associativities: vec![1],
        block_sizes: vec![4],
        workloads: vec![AccessPattern::Looping],
        ..SweepConfig::default()
    };
    let records = run_sweep(&config)?;
    assert_eq!(records.len(), 2);
    for record in records {
        // 16 compulsory misses, then every access hits L1
        assert_eq!(record.l1_hit_rate, 0.84);
        assert_eq!(record.l2_hit_rate, 0.0);
        assert!((record.amat - 9.8).abs() < 1e-9);
        assert_eq!(record.l1_cold_misses, 16);
        assert_eq!(record.l2_cold_misses, 16);
    }
    Ok(())
}

#[test]
fn sweeps_are_reproducible_for_a_seed() -> Result<(), Box<dyn Error>> {
    let config = SweepConfig {
        workloads: vec![AccessPattern::Random],
        seed: 1234,
        ..SweepConfig::default()
    };
    assert_eq!(run_sweep(&config)?, run_sweep(&config)?);
    Ok(())
}

#[test]
fn degenerate_point_fails_the_sweep() {
    let config = SweepConfig {
        block_sizes: vec![48],
        ..SweepConfig::default()
    };
    assert_eq!(
        run_sweep(&config),
        Err(ConfigurationError::UnevenCapacity { size: 64, block_size: 48, associativity: 1 })
    );
}

#[test]
fn partial_json_uses_defaults() -> Result<(), Box<dyn Error>> {
    let config: SweepConfig = serde_json::from_str(r#"{ "seed": 7, "policies": ["fifo"], "workloads": ["looping"] }"#)?;
    assert_eq!(config.seed, 7);
    assert_eq!(config.policies, vec![ReplacementPolicy::FirstInFirstOut]);
    assert_eq!(config.workloads, vec![AccessPattern::Looping]);
    assert_eq!(config.cache_sizes, vec![64, 128]);
    assert_eq!(config.memory_latency, 50);
    Ok(())
}

fn record(workload: AccessPattern, policy: ReplacementPolicy, amat: f64) -> SweepRecord {
    SweepRecord {
        l1_size: 64,
        l2_size: 128,
        l1_associativity: 1,
        l2_associativity: 2,
        block_size: 4,
        workload,
        policy,
        l1_hit_rate: 0.0,
        l2_hit_rate: 0.0,
        amat,
        l1_cold_misses: 0,
        l2_cold_misses: 0,
    }
}

#[test]
fn summaries_group_by_workload_and_policy() {
    let lru = ReplacementPolicy::LeastRecentlyUsed;
    let fifo = ReplacementPolicy::FirstInFirstOut;
    let records = vec![
        record(AccessPattern::Looping, lru, 2.0),
        record(AccessPattern::Looping, fifo, 10.0),
        record(AccessPattern::Looping, lru, 6.0),
        record(AccessPattern::Random, lru, 30.0),
    ];
    let summaries = summarize(&records);
    assert_eq!(summaries.len(), 3);
    assert_eq!((summaries[0].workload, summaries[0].policy), (AccessPattern::Looping, lru));
    assert_eq!(summaries[0].average, 4.0);
    assert_eq!(summaries[0].min, 2.0);
    assert_eq!(summaries[0].max, 6.0);
    assert_eq!(summaries[0].runs, 2);
    assert_eq!(summaries[1].average, 10.0);
    assert_eq!(summaries[2].workload, AccessPattern::Random);
    assert!(summarize(&[]).is_empty());
}

#[test]
fn default_summary_has_one_entry_per_workload_and_policy() -> Result<(), Box<dyn Error>> {
    let summaries = summarize(&run_sweep(&SweepConfig::default())?);
    assert_eq!(summaries.len(), 6);
    assert!(summaries.iter().all(|s| s.runs == 72 && s.min <= s.average && s.average <= s.max));
    Ok(())
}
