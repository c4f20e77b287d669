use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

use crate::{
    checker::{Feasibility, FeasibilityChecker},
    graph::{Format, Instance},
    network::FlowNetwork,
    portal::ZeroModulus,
};

pub mod checker;
pub mod digits;
pub mod dinic;
pub mod error;
pub mod graph;
pub mod network;
pub mod node;
pub mod portal;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser, Debug)]
#[command(version, about = "Two-path portal feasibility queries and a digit-product search")]
pub struct Cli {
    /// Number of threads to use (use all available threads if not specified).
    #[arg(short = 't', long, global = true)]
    pub num_of_threads: Option<usize>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer `Yes`/`No` for every query of a portal instance (default).
    Solve(SolveArgs),
    /// Search all 8-digit x and 7-digit y with x * y equal to their digit product.
    Digits(DigitsArgs),
}

#[derive(Args, Debug, Default)]
pub struct SolveArgs {
    /// Path to the instance (read from stdin if not specified).
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Encoding of the instance.
    #[arg(short, long, default_value = "tokens")]
    pub format: Format,
    /// Search used to answer the queries.
    #[arg(short, long, default_value = "greedy")]
    pub engine: Engine,
    /// Meaning of a portal exit with modulus 0.
    #[arg(short, long, default_value = "unreachable")]
    pub zero_exit_modulus: ZeroModulus,
}

#[derive(Args, Debug)]
pub struct DigitsArgs {
    /// First left half of x to try.
    #[arg(long, default_value_t = digits::XL.start, value_parser = clap::value_parser!(i64).range(10_000..=100_000))]
    pub xl_start: i64,
    /// Left half of x to stop before.
    #[arg(long, default_value_t = digits::XL.end, value_parser = clap::value_parser!(i64).range(10_000..=100_000))]
    pub xl_end: i64,
}

#[derive(Debug, ValueEnum, Clone, Copy, Default, PartialEq, Eq)]
pub enum Engine {
    /// Two depth-first augmenting paths without residual back edges.
    #[default]
    Greedy,
    /// Bounded max flow over the materialized network.
    Exact,
}

fn run_queries<F: Feasibility>(mut engine: F, queries: &[(usize, usize)]) -> anyhow::Result<()> {
    let mut out = BufWriter::new(io::stdout().lock());
    let mut yes = 0;
    for &(x, y) in queries {
        let verdict = engine.answer(x, y)?;
        if verdict == checker::Verdict::Yes {
            yes += 1;
        }
        writeln!(out, "{verdict}")?;
    }
    out.flush()?;
    info!(queries = queries.len(), yes, "All queries answered");
    Ok(())
}

fn solve(args: SolveArgs) -> anyhow::Result<()> {
    let instance = match &args.input {
        Some(path) => Instance::load(path, args.format)?,
        None => Instance::from_reader(io::stdin().lock(), args.format)?,
    };
    let graph = &instance.graph;
    info!(
        nodes = graph.nodes,
        portals = graph.portals.len(),
        destination = graph.destination,
        queries = instance.queries.len(),
        "Instance loaded"
    );
    info!(engine = ?args.engine, zero_exit_modulus = ?args.zero_exit_modulus, "Answering queries");
    match args.engine {
        Engine::Greedy => run_queries(
            FeasibilityChecker::new(graph, args.zero_exit_modulus),
            &instance.queries,
        ),
        Engine::Exact => run_queries(
            FlowNetwork::new(graph, args.zero_exit_modulus),
            &instance.queries,
        ),
    }
}

fn search_digits(args: DigitsArgs) -> anyhow::Result<()> {
    let index = digits::RightIndex::build();
    let solutions = digits::search(&index, args.xl_start..args.xl_end);
    info!("Search finished with {} solution(s)", solutions.len());
    let mut out = BufWriter::new(io::stdout().lock());
    if solutions.is_empty() {
        writeln!(out, "No solution found.")?;
    }
    for (i, s) in solutions.iter().enumerate() {
        writeln!(out, "{}: x = {}, y = {}", i + 1, s.x, s.y)?;
    }
    out.flush()?;
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("PORTALS_LOG_LEVEL")
                .from_env_lossy(),
        )
        .init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let thd_cnt = cli.num_of_threads.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|x| x.get())
            .unwrap_or(1)
    });
    rayon::ThreadPoolBuilder::new()
        .num_threads(thd_cnt)
        .build_global()?;
    match cli.command.unwrap_or_else(|| Command::Solve(SolveArgs::default())) {
        Command::Solve(args) => solve(args),
        Command::Digits(args) => search_digits(args),
    }
}
