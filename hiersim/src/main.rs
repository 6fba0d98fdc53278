use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;
use clap::{Args, Parser, Subcommand};
use eyre::{Result, WrapErr};
use hierlib::config::{HierarchyConfig, SweepConfig};
use hierlib::io::{get_reader, read_trace, write_csv};
use hierlib::simulator::HierarchySimulator;
use hierlib::sweep::{run_sweep, summarize};
use hierlib::workload::{generate_workload, AccessPattern};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[cfg(debug_assertions)]
const DEBUG_DEFAULT: bool = true;

#[cfg(not(debug_assertions))]
const DEBUG_DEFAULT: bool = false;

#[derive(Parser, Debug)]
#[command(about = String::from("Two level cache hierarchy simulator"))]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one hierarchy configuration over a trace or a generated workload
    Simulate(SimulateArgs),
    /// Run every configuration of a sweep and summarise AMAT
    Sweep(SweepArgs),
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// JSON hierarchy configuration
    config: PathBuf,

    /// Trace of addresses, one per line. Overrides the generated workload
    #[arg(short, long)]
    trace: Option<PathBuf>,

    #[arg(short, long, default_value = "looping")]
    workload: AccessPattern,

    /// Number of generated addresses
    #[arg(short, long, default_value_t = 100)]
    size: usize,

    /// Distance between generated addresses, defaults to the L1 block size
    #[arg(long)]
    stride: Option<u64>,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(short, long)]
    performance: bool,

    #[arg(short, long, default_value_t = DEBUG_DEFAULT)]
    debug: bool,
}

#[derive(Args, Debug)]
struct SweepArgs {
    /// JSON sweep configuration, the standard grid is used if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write every record to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print every record as JSON
    #[arg(long)]
    json: bool,

    #[arg(short, long, default_value_t = DEBUG_DEFAULT)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let debug = match &cli.command {
        Command::Simulate(args) => args.debug,
        Command::Sweep(args) => args.debug,
    };
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Simulate(args) => simulate(args),
        Command::Sweep(args) => sweep(args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).wrap_err_with(|| format!("Couldn't open the config file at path {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).wrap_err("Couldn't parse the config file")
}

fn simulate(args: SimulateArgs) -> Result<()> {
    let start = Instant::now();
    let config: HierarchyConfig = read_json(&args.config)?;
    let mut simulator = HierarchySimulator::from_config(&config).wrap_err("Invalid hierarchy configuration")?;

    let addresses = match &args.trace {
        Some(path) => {
            let file = File::open(path).wrap_err_with(|| format!("Couldn't open the trace file at path {}", path.display()))?;
            read_trace(get_reader(file)?).wrap_err("Couldn't read the trace file")?
        }
        None => {
            let stride = args.stride.unwrap_or(config.l1.block_size);
            let mut rng = fastrand::Rng::with_seed(args.seed);
            generate_workload(args.workload, args.size, stride, &mut rng).wrap_err("Couldn't generate the workload")?
        }
    };
    info!(accesses = addresses.len(), "Simulating");

    simulator.run_simulation(addresses);
    let stats = simulator.stats();
    println!("{}", serde_json::to_string_pretty(&stats).wrap_err("Couldn't serialise the output")?);

    if args.performance {
        let simulation_time = simulator.execution_time();
        let total_time = start.elapsed();
        println!("Simulation time: {}s", simulation_time.as_nanos() as f64 / 1e9);
        println!("Total execution time (includes initial parsing, configuration, and output): {}s", total_time.as_nanos() as f64 / 1e9)
    }
    if args.debug {
        #[cfg(debug_assertions)]
        println!("Running the debug binary, debug mode is enabled by default. If benchmarking, do not use this binary, re-compile with the --release argument when using cargo run");
        println!("Parsed input configuration: {config:?}");
        for level in [simulator.l1(), simulator.l2()] {
            println!(
                "{}: {} probes ({} hits), {} of {} ways never filled",
                level.name(),
                level.accesses(),
                level.hits(),
                level.invalid_way_count(),
                level.num_blocks()
            );
        }
    }
    Ok(())
}

fn sweep(args: SweepArgs) -> Result<()> {
    let config: SweepConfig = match &args.config {
        Some(path) => read_json(path)?,
        None => SweepConfig::default(),
    };
    if args.debug {
        println!("Parsed sweep configuration: {config:?}");
    }
    let records = run_sweep(&config).wrap_err("Invalid sweep configuration")?;

    if let Some(path) = &args.csv {
        let file = File::create(path).wrap_err_with(|| format!("Couldn't create the CSV file at path {}", path.display()))?;
        write_csv(BufWriter::new(file), &records).wrap_err("Couldn't write the CSV file")?;
        info!(path = %path.display(), records = records.len(), "Wrote results");
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&records).wrap_err("Couldn't serialise the output")?);
    }

    println!("\n===== Analysis Summary =====");
    for summary in summarize(&records) {
        println!("{} workload with {} policy:", capitalise(summary.workload.name()), summary.policy);
        println!("  Average AMAT: {:.2} cycles", summary.average);
        println!("  Min AMAT: {:.2} cycles", summary.min);
        println!("  Max AMAT: {:.2} cycles\n", summary.max);
    }
    Ok(())
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
