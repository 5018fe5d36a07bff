//! `linkrank`: PageRank for a corpus of hyperlinked pages, estimated two ways over one graph.
//!
//! - [`sampling`]: a random surfer walks the link graph; ranks are visit frequencies.
//! - [`pagerank`]: power iteration on the same Markov chain until ranks stop moving.
//!
//! Both consume a [`LinkGraph`] (or any [`GraphRef`] adapter) and share the transition model in
//! [`transition`], including its rule for dangling pages.
//!
//! Public invariants (must not drift):
//! - **Node order**: per-node outputs are indexed \(0..n-1\); for [`LinkGraph`] that is ascending
//!   page-name order.
//! - **Stochastic outputs**: transition rows and both rank estimates sum to one (within
//!   [`transition::SUM_TOLERANCE`]); this is checked with `debug_assert!`, not surfaced as errors.
//! - **Dangling pages**: a page with no outbound links jumps uniformly to any page, in both
//!   estimators.
//! - **Synchronous iteration**: each solver pass reads one snapshot and writes a separate buffer.
//! - **Determinism**: the solver is deterministic; the sampler is deterministic given a seed or an
//!   injected [`WeightedChoice`].
//!
//! Swappable (allowed to change without breaking the contract):
//! - serial vs parallel sampling chains (`parallel` feature)
//! - internal data structures (so long as invariants hold)

use std::path::PathBuf;

pub mod corpus;
pub mod graph;
pub mod pagerank;
pub mod sampling;
pub mod transition;

pub use corpus::{crawl, extract_links, Corpus};
pub use graph::{AdjacencyList, Graph, GraphRef, LinkGraph};
pub use pagerank::{pagerank, pagerank_checked, PageRankConfig};
pub use pagerank::{pagerank_checked_run, pagerank_run, pagerank_run_from, PageRankRun};
pub use sampling::{
    sample_pagerank_checked, sample_pagerank_checked_run, sample_pagerank_run, SampleRun,
    SamplingConfig, WeightedChoice,
};
pub use transition::{normalize, transition, transition_checked, Distribution, Fanout};

#[cfg(feature = "parallel")]
pub use sampling::sample_pagerank_parallel;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("index out of bounds: {0}")]
    IndexOutOfBounds(usize),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("graph has no pages")]
    EmptyGraph,
    #[error("unknown page: {0}")]
    UnknownPage(String),
    #[error("pagerank did not converge after {iterations} iterations (max delta {max_delta:e})")]
    NotConverged { iterations: usize, max_delta: f64 },
    #[error("no .html pages found in {}", .0.display())]
    EmptyCorpus(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("walk directory error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
