use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hierlib::access_log::LogMode;
use hierlib::config::{LevelConfig, SweepConfig};
use hierlib::replacement_policies::ReplacementPolicy;
use hierlib::simulator::HierarchySimulator;
use hierlib::sweep::run_sweep;
use hierlib::workload::{generate_workload, AccessPattern};

/// Long single runs, with logging off so only the simulation is measured
pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Hierarchy");
    let l1 = LevelConfig::new(32 * 1024, 64, 8, 1);
    let l2 = LevelConfig::new(256 * 1024, 64, 8, 10);
    let mut rng = fastrand::Rng::with_seed(42);

    for pattern in [AccessPattern::Sequential, AccessPattern::Looping, AccessPattern::Random] {
        for policy in [ReplacementPolicy::LeastRecentlyUsed, ReplacementPolicy::FirstInFirstOut] {
            let addresses = generate_workload(pattern, 100_000, 64, &mut rng).unwrap();
            group.bench_with_input(BenchmarkId::new(format!("{pattern}"), policy), &addresses, |bench, addresses| {
                bench.iter(|| {
                    let mut simulator = HierarchySimulator::new(&l1, &l2, 100, policy, policy)
                        .unwrap()
                        .with_log_mode(LogMode::Disabled);
                    simulator.run_simulation(addresses.iter().copied());
                    simulator.stats()
                });
            });
        }
    }
    group.finish();

    c.bench_function("Default sweep", |bench| {
        let config = SweepConfig::default();
        bench.iter(|| run_sweep(&config).unwrap());
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().significance_level(0.1).sample_size(10);
    targets = criterion_benchmark
);
criterion_main!(benches);
