//! linkrank CLI - rank the pages of an HTML corpus.
//!
//! # Usage
//!
//! ```bash
//! # Both estimators with the conventional settings
//! linkrank corpus0
//!
//! # Reproducible sampling, tighter convergence
//! linkrank corpus0 --seed 7 --samples 100000 --tolerance 1e-6
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use linkrank::{
    crawl, pagerank_checked_run, sample_pagerank_checked_run, Distribution, LinkGraph,
    PageRankConfig, SamplingConfig,
};

#[derive(Parser)]
#[command(name = "linkrank")]
#[command(about = "PageRank of a directory of HTML pages, by sampling and by iteration", long_about = None)]
struct Cli {
    /// Directory containing the corpus `.html` files
    corpus: PathBuf,

    /// Probability of following a link instead of jumping to a random page
    #[arg(short, long, default_value_t = 0.85, env = "LINKRANK_DAMPING")]
    damping: f64,

    /// Number of pages visited by the random surfer
    #[arg(short = 'n', long, default_value_t = 10_000, env = "LINKRANK_SAMPLES")]
    samples: usize,

    /// Stop iterating once no rank moves by this much in one pass
    #[arg(short, long, default_value_t = 0.001, env = "LINKRANK_TOLERANCE")]
    tolerance: f64,

    /// Give up iterating after this many passes
    #[arg(long, default_value_t = 1_000, env = "LINKRANK_MAX_ITERATIONS")]
    max_iterations: usize,

    /// Seed for the random surfer
    #[arg(long, env = "LINKRANK_SEED")]
    seed: Option<u64>,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when the iterative solver ran out of passes.
fn run(cli: &Cli) -> Result<bool> {
    let sampling = SamplingConfig {
        damping: cli.damping,
        samples: cli.samples,
        seed: cli.seed,
    };
    let iteration = PageRankConfig {
        damping: cli.damping,
        max_iterations: cli.max_iterations,
        tolerance: cli.tolerance,
    };
    sampling.validate().context("invalid sampling settings")?;
    iteration.validate().context("invalid iteration settings")?;

    let corpus = crawl(&cli.corpus)
        .with_context(|| format!("failed to load corpus from {}", cli.corpus.display()))?;
    let graph = LinkGraph::build(corpus);

    let sampled = sample_pagerank_checked_run(&graph, sampling).context("sampling failed")?;
    println!("PageRank Results from Sampling (n = {})", cli.samples);
    print_ranks(&graph.label(&sampled.scores));

    let iterated = pagerank_checked_run(&graph, iteration).context("iteration failed")?;
    println!("PageRank Results from Iteration");
    print_ranks(&graph.label(&iterated.scores));

    if !iterated.converged {
        eprintln!(
            "warning: iteration stopped after {} passes without converging (max delta {:e} >= tolerance {})",
            iterated.iterations, iterated.max_delta, cli.tolerance
        );
    }
    Ok(iterated.converged)
}

fn print_ranks(ranks: &Distribution) {
    for (page, rank) in ranks.iter() {
        println!("  {page}: {rank:.4}");
    }
}
