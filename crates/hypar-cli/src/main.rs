use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use hypar_core::{ErrorInfo, HyparError, Mode, Objective, PartitionConfig, PartitionId};
use hypar_engine::Partitioner;
use hypar_io::{
    apply_fixed_vertices, read_fixed_vertex_file, read_hypergraph_file, write_partition_file,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hypar", about = "Multilevel k-way hypergraph partitioner")]
struct Cli {
    /// Hypergraph in hMetis format.
    #[arg(long)]
    hypergraph: PathBuf,
    /// Number of blocks.
    #[arg(short, long)]
    k: PartitionId,
    /// Allowed imbalance, e.g. 0.03.
    #[arg(short, long)]
    epsilon: Option<f64>,
    /// Master seed for all stochastic choices.
    #[arg(long)]
    seed: Option<u64>,
    /// Partitioning mode: direct-kway | recursive-bisection.
    #[arg(long)]
    mode: Option<String>,
    /// Objective: cut | connectivity.
    #[arg(long)]
    objective: Option<String>,
    /// Number of V-cycles (direct k-way mode only).
    #[arg(long)]
    v_cycles: Option<u32>,
    /// YAML configuration file; explicit flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Fixed-vertex file: one block id or -1 per vertex.
    #[arg(long)]
    fixed: Option<PathBuf>,
    /// Partition output file (default: <hypergraph>.part<k>).
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Suppress banner, logging and the result summary.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("hypar: {err}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn exit_code(err: &HyparError) -> u8 {
    match err {
        HyparError::Config(_) => 1,
        HyparError::Input(_) => 2,
        HyparError::Infeasible(_) => 3,
        HyparError::Internal(_) => 4,
    }
}

fn run(cli: Cli) -> Result<(), HyparError> {
    let mut config = load_config(&cli)?;
    if !config.quiet_mode {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
        println!("hypar - multilevel k-way hypergraph partitioner");
    }

    let mut hg = read_hypergraph_file(&cli.hypergraph, config.k as usize)?;
    if let Some(fixed_path) = &cli.fixed {
        let table = read_fixed_vertex_file(fixed_path, hg.initial_num_nodes(), config.k as usize)?;
        apply_fixed_vertices(&mut hg, &table);
    }
    if hg.num_fixed_vertices() > 0 {
        config.enable_min_hash_sparsifier = false;
    }

    let partitioner = Partitioner::new(config.clone())?;
    let started = Instant::now();
    let summary = partitioner.partition(&mut hg)?;
    let elapsed = started.elapsed();

    let output = cli.output.clone().unwrap_or_else(|| {
        let mut name = cli.hypergraph.as_os_str().to_os_string();
        name.push(format!(".part{}", config.k));
        PathBuf::from(name)
    });
    write_partition_file(&hg, &output)?;

    if !config.quiet_mode {
        println!("hyperedge cut     = {}", summary.cut);
        println!("connectivity      = {}", summary.connectivity);
        println!("imbalance         = {:.5}", summary.imbalance);
        for block in 0..config.k {
            println!(
                "block {block:>3}: weight = {:>8}  size = {:>8}",
                hg.block_weight(block),
                hg.block_size(block)
            );
        }
        println!("partition written to {}", output.display());
        println!("elapsed           = {:.3}s", elapsed.as_secs_f64());
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<PartitionConfig, HyparError> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|err| {
                HyparError::Config(
                    ErrorInfo::new("unreadable-config", "cannot read configuration file")
                        .with_context("path", path.display())
                        .with_context("cause", err),
                )
            })?;
            let mut parsed: PartitionConfig = serde_yaml::from_str(&text).map_err(|err| {
                HyparError::Config(
                    ErrorInfo::new("bad-config", "cannot parse configuration file")
                        .with_context("path", path.display())
                        .with_context("cause", err),
                )
            })?;
            parsed.k = cli.k;
            parsed
        }
        None => PartitionConfig::with_k(cli.k),
    };

    if let Some(epsilon) = cli.epsilon {
        config.epsilon = epsilon;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(mode) = &cli.mode {
        config.mode = parse_mode(mode)?;
    }
    if let Some(objective) = &cli.objective {
        config.objective = parse_objective(objective)?;
    }
    if let Some(v_cycles) = cli.v_cycles {
        config.v_cycles = v_cycles;
    }
    if cli.quiet {
        config.quiet_mode = true;
    }
    Ok(config)
}

fn parse_mode(text: &str) -> Result<Mode, HyparError> {
    match text {
        "direct" | "direct-kway" => Ok(Mode::DirectKway),
        "rb" | "recursive-bisection" => Ok(Mode::RecursiveBisection),
        other => Err(HyparError::Config(
            ErrorInfo::new("bad-mode", "unknown partitioning mode")
                .with_context("mode", other)
                .with_hint("use direct-kway or recursive-bisection"),
        )),
    }
}

fn parse_objective(text: &str) -> Result<Objective, HyparError> {
    match text {
        "cut" => Ok(Objective::Cut),
        "km1" | "connectivity" => Ok(Objective::Connectivity),
        other => Err(HyparError::Config(
            ErrorInfo::new("bad-objective", "unknown objective")
                .with_context("objective", other)
                .with_hint("use cut or connectivity"),
        )),
    }
}
