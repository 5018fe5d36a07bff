//! Sampling estimator: PageRank as visit frequencies of a simulated random surfer.
//!
//! The surfer starts on a uniformly random page and then takes `samples - 1` steps, each drawn
//! from the transition row of the page it is on (see [`crate::transition`]). The estimate is the
//! fraction of samples that landed on each page; as `samples` grows it approaches the stationary
//! distribution that [`crate::pagerank`] computes exactly.
//!
//! Randomness is injected through [`WeightedChoice`], so tests can drive the chain with a seeded
//! generator or a scripted fake.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution as _;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::graph::GraphRef;
use crate::transition::{self, check_damping};
use crate::{Error, Result};

/// Source of random draws for the sampler.
pub trait WeightedChoice {
    /// Uniform index in `0..n` (`n > 0`).
    fn choose_uniform(&mut self, n: usize) -> usize;

    /// Index `i` drawn with probability proportional to `weights[i]`.
    fn choose_weighted(&mut self, weights: &[f64]) -> Result<usize>;
}

impl<R: Rng> WeightedChoice for R {
    fn choose_uniform(&mut self, n: usize) -> usize {
        self.random_range(0..n)
    }

    fn choose_weighted(&mut self, weights: &[f64]) -> Result<usize> {
        let dist = WeightedIndex::<f64>::new(weights).map_err(|e| {
            Error::InvalidParameter(format!("transition weights rejected: {e}"))
        })?;
        Ok(dist.sample(self))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplingConfig {
    pub damping: f64,
    /// Total number of visited pages recorded, including the starting page.
    pub samples: usize,
    /// Seed for the built-in generator; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            samples: 10_000,
            seed: None,
        }
    }
}

impl SamplingConfig {
    pub fn validate(&self) -> Result<()> {
        check_damping(self.damping, false)?;
        if self.samples == 0 {
            return Err(Error::InvalidParameter(
                "samples must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleRun {
    /// `visits[i] / samples`; sums to one.
    pub scores: Vec<f64>,
    pub visits: Vec<u64>,
    pub samples: usize,
}

impl SampleRun {
    fn from_visits(visits: Vec<u64>, samples: usize) -> Self {
        let total = samples as f64;
        let scores: Vec<f64> = visits.iter().map(|&c| c as f64 / total).collect();
        debug_assert!(
            transition::sums_to_one(&scores),
            "sampled ranks sum to {}",
            scores.iter().sum::<f64>()
        );
        Self {
            scores,
            visits,
            samples,
        }
    }
}

/// Run the surfer with an injected random source.
pub fn sample_pagerank_run<G, R>(
    graph: &G,
    config: SamplingConfig,
    source: &mut R,
) -> Result<SampleRun>
where
    G: GraphRef + ?Sized,
    R: WeightedChoice + ?Sized,
{
    config.validate()?;
    let n = graph.node_count();
    if n == 0 {
        return Err(Error::EmptyGraph);
    }

    let mut visits = vec![0u64; n];
    let mut row = vec![0.0; n];

    let mut current = source.choose_uniform(n);
    if current >= n {
        return Err(Error::IndexOutOfBounds(current));
    }
    visits[current] += 1;

    for _ in 1..config.samples {
        transition::transition_into(graph, current, config.damping, &mut row);
        current = source.choose_weighted(&row)?;
        if current >= n {
            return Err(Error::IndexOutOfBounds(current));
        }
        visits[current] += 1;
    }

    tracing::debug!(
        pages = n,
        samples = config.samples,
        damping = config.damping,
        "sampled pagerank"
    );
    Ok(SampleRun::from_visits(visits, config.samples))
}

/// Run the surfer with a generator built from `config.seed`.
pub fn sample_pagerank_checked_run<G: GraphRef + ?Sized>(
    graph: &G,
    config: SamplingConfig,
) -> Result<SampleRun> {
    config.validate()?;
    let mut rng = config.rng();
    sample_pagerank_run(graph, config, &mut rng)
}

pub fn sample_pagerank_checked<G: GraphRef + ?Sized>(
    graph: &G,
    config: SamplingConfig,
) -> Result<Vec<f64>> {
    Ok(sample_pagerank_checked_run(graph, config)?.scores)
}

/// Independent surfers in parallel, merged by summing visit counts.
///
/// `config.samples` is split across `chains`; chain `c` is seeded with `seed + c`, so a fixed
/// seed gives a deterministic result regardless of thread scheduling.
#[cfg(feature = "parallel")]
pub fn sample_pagerank_parallel<G: GraphRef + Sync + ?Sized>(
    graph: &G,
    config: SamplingConfig,
    chains: usize,
) -> Result<SampleRun> {
    use rayon::prelude::*;

    config.validate()?;
    if chains == 0 {
        return Err(Error::InvalidParameter(
            "chains must be >= 1".to_string(),
        ));
    }
    let n = graph.node_count();
    if n == 0 {
        return Err(Error::EmptyGraph);
    }

    let base_seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let per_chain = config.samples / chains;
    let extra = config.samples % chains;

    let runs: Vec<Option<SampleRun>> = (0..chains)
        .into_par_iter()
        .map(|c| {
            let samples = per_chain + usize::from(c < extra);
            if samples == 0 {
                return Ok(None);
            }
            let chain_config = SamplingConfig {
                samples,
                seed: Some(base_seed.wrapping_add(c as u64)),
                ..config
            };
            let mut rng = chain_config.rng();
            sample_pagerank_run(graph, chain_config, &mut rng).map(Some)
        })
        .collect::<Result<_>>()?;

    let mut visits = vec![0u64; n];
    for run in runs.into_iter().flatten() {
        for (acc, v) in visits.iter_mut().zip(run.visits) {
            *acc += v;
        }
    }
    Ok(SampleRun::from_visits(visits, config.samples))
}
