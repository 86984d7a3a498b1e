//! Times the hybrid sort flavours over generated inputs and prints the results as JSON.
//!
//! Every run is checked against `slice::sort` before its timing is recorded.

use std::env;
use std::process;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use hybrid_sort_rs::{BufferStrategy, HybridSorter, SortError, SortStats, DEFAULT_THRESHOLD};
use sort_test_tools::patterns;

#[derive(Debug, Parser)]
#[command(name = "sort-harness", about = "Time hybrid merge/insertion sort flavours")]
struct Args {
    /// Number of elements per input.
    #[arg(long, default_value_t = 100_000)]
    len: usize,

    /// Timed runs per (flavour, pattern) pair, each on a fresh copy of the input.
    #[arg(long, default_value_t = 10)]
    iters: usize,

    /// Input patterns, all of them if omitted.
    #[arg(long = "pattern", value_enum)]
    patterns: Vec<Pattern>,

    /// Sort flavours, all of them if omitted.
    #[arg(long = "sort", value_enum)]
    sorts: Vec<Flavour>,

    /// Insertion sort threshold, partitions with `r - p` at or below it skip merging.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: usize,

    /// Ranges at or below this length are not forked by the parallel flavour.
    #[arg(long, default_value_t = hybrid_sort_rs::DEFAULT_PARALLEL_CUTOFF)]
    parallel_cutoff: usize,

    /// Seed for the random patterns, overrides OVERRIDE_SEED.
    #[arg(long)]
    seed: Option<u64>,

    /// Pin the process to this core before measuring.
    #[arg(long)]
    pin_core: Option<usize>,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
enum Pattern {
    Random,
    RandomD20,
    RandomZipf,
    RandomSorted90,
    Ascending,
    Descending,
    SawAscending,
    PipeOrgan,
    AllEqual,
}

impl Pattern {
    fn generate(self, len: usize) -> Vec<u32> {
        match self {
            Pattern::Random => patterns::random(len),
            Pattern::RandomD20 => patterns::random_d20(len),
            Pattern::RandomZipf => patterns::random_zipf(len),
            Pattern::RandomSorted90 => patterns::random_sorted_90(len),
            Pattern::Ascending => patterns::ascending(len),
            Pattern::Descending => patterns::descending(len),
            Pattern::SawAscending => patterns::saw_ascending(len),
            Pattern::PipeOrgan => patterns::pipe_organ(len),
            Pattern::AllEqual => patterns::all_equal(len),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
enum Flavour {
    PerSort,
    PerMerge,
    Parallel,
    Std,
}

impl Flavour {
    fn run(self, sorter: &HybridSorter, v: &mut [u32]) -> Result<SortStats, SortError> {
        match self {
            Flavour::PerSort => sorter.with_strategy(BufferStrategy::PerSort).sort(v),
            Flavour::PerMerge => sorter.with_strategy(BufferStrategy::PerMerge).sort(v),
            Flavour::Parallel => sorter.par_sort(v),
            Flavour::Std => {
                v.sort();
                Ok(SortStats::default())
            }
        }
    }
}

#[derive(Debug, Error)]
enum HarnessError {
    #[error("{flavour:?} failed on {pattern:?}: {source}")]
    Sort {
        flavour: Flavour,
        pattern: Pattern,
        #[source]
        source: SortError,
    },

    #[error("{flavour:?} produced wrong output on {pattern:?} with seed {seed}")]
    Mismatch {
        flavour: Flavour,
        pattern: Pattern,
        seed: u64,
    },

    #[error("core {0} is not available for pinning")]
    NoSuchCore(usize),

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct Report {
    seed: u64,
    len: usize,
    iters: usize,
    threshold: usize,
    results: Vec<RunResult>,
}

#[derive(Debug, Serialize)]
struct RunResult {
    sort: Flavour,
    pattern: Pattern,
    min_ns: u128,
    median_ns: u128,
    mean_ns: u128,
    stats: StatsRecord,
}

#[derive(Debug, Serialize)]
struct StatsRecord {
    insertion_sorts: usize,
    merges: usize,
    scratch_allocations: usize,
    max_depth: usize,
}

impl From<SortStats> for StatsRecord {
    fn from(stats: SortStats) -> Self {
        Self {
            insertion_sorts: stats.insertion_sorts,
            merges: stats.merges,
            scratch_allocations: stats.scratch_allocations,
            max_depth: stats.max_depth,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    }
}

fn run(mut args: Args) -> Result<String, HarnessError> {
    if let Some(seed) = args.seed {
        // Must happen before the first pattern reads the seed.
        env::set_var("OVERRIDE_SEED", seed.to_string());
    }

    if let Some(core) = args.pin_core {
        pin_to_core(core)?;
    }

    if args.patterns.is_empty() {
        args.patterns = Pattern::value_variants().to_vec();
    }
    if args.sorts.is_empty() {
        args.sorts = Flavour::value_variants().to_vec();
    }
    if args.iters == 0 {
        warn!("--iters 0 requested, running once");
        args.iters = 1;
    }

    let sorter = HybridSorter::new()
        .with_threshold(args.threshold)
        .with_parallel_cutoff(args.parallel_cutoff);
    let seed = patterns::random_init_seed();
    info!(seed, len = args.len, iters = args.iters, "starting");

    let mut results = Vec::new();
    for &pattern in &args.patterns {
        let input = pattern.generate(args.len);
        let mut expected = input.clone();
        expected.sort();

        for &flavour in &args.sorts {
            let result = measure(flavour, pattern, &sorter, &input, &expected, args.iters, seed)?;
            debug!(?flavour, ?pattern, median_ns = result.median_ns, "measured");
            results.push(result);
        }
    }

    let report = Report {
        seed,
        len: args.len,
        iters: args.iters,
        threshold: args.threshold,
        results,
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    Ok(json)
}

fn measure(
    flavour: Flavour,
    pattern: Pattern,
    sorter: &HybridSorter,
    input: &[u32],
    expected: &[u32],
    iters: usize,
    seed: u64,
) -> Result<RunResult, HarnessError> {
    let mut timings = Vec::with_capacity(iters);
    let mut last_stats = SortStats::default();

    for _ in 0..iters {
        let mut v = input.to_vec();

        let start = Instant::now();
        let stats = flavour
            .run(sorter, &mut v)
            .map_err(|source| HarnessError::Sort {
                flavour,
                pattern,
                source,
            })?;
        timings.push(start.elapsed().as_nanos());

        if v != expected {
            return Err(HarnessError::Mismatch {
                flavour,
                pattern,
                seed,
            });
        }
        last_stats = stats;
    }

    timings.sort_unstable();
    let mean_ns = timings.iter().sum::<u128>() / timings.len() as u128;

    Ok(RunResult {
        sort: flavour,
        pattern,
        min_ns: timings[0],
        median_ns: timings[timings.len() / 2],
        mean_ns,
        stats: last_stats.into(),
    })
}

fn pin_to_core(core: usize) -> Result<(), HarnessError> {
    let core_id = core_affinity::get_core_ids()
        .and_then(|ids| ids.into_iter().find(|id| id.id == core))
        .ok_or(HarnessError::NoSuchCore(core))?;

    if !core_affinity::set_for_current(core_id) {
        warn!(core, "failed to pin to core, timings may be noisy");
    }
    Ok(())
}
