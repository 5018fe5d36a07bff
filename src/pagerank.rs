//! Iterative PageRank: power iteration on the random-surfer chain.
//!
//! Each pass computes, from a frozen snapshot of the previous ranks,
//! \[
//!   r'(p) = \frac{1-d}{n} + d \sum_{q \to p} \frac{r(q)}{\deg(q)} + d \sum_{q\ \text{dangling}} \frac{r(q)}{n}
//! \]
//! Dangling mass goes through [`Fanout::Uniform`], the same rule the sampler uses, so both
//! estimators converge on the same distribution.

use crate::graph::GraphRef;
use crate::transition::{self, check_damping, Fanout};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRankRun {
    pub scores: Vec<f64>,
    pub iterations: usize,
    /// Largest absolute per-node change in the last pass.
    pub max_delta: f64,
    pub converged: bool,
}

impl PageRankRun {
    /// Turn a run that hit `max_iterations` into [`Error::NotConverged`].
    pub fn into_converged(self) -> Result<Self> {
        if self.converged {
            Ok(self)
        } else {
            Err(Error::NotConverged {
                iterations: self.iterations,
                max_delta: self.max_delta,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRankConfig {
    pub damping: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 1_000,
            tolerance: 1e-3,
        }
    }
}

impl PageRankConfig {
    pub fn validate(&self) -> Result<()> {
        check_damping(self.damping, false)?;
        if self.max_iterations == 0 {
            return Err(Error::InvalidParameter(
                "max_iterations must be > 0".to_string(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(Error::InvalidParameter(
                "tolerance must be finite and > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Checked PageRank: validates `config` and rejects empty graphs.
pub fn pagerank_checked<G: GraphRef + ?Sized>(graph: &G, config: PageRankConfig) -> Result<Vec<f64>> {
    Ok(pagerank_checked_run(graph, config)?.scores)
}

pub fn pagerank<G: GraphRef + ?Sized>(graph: &G, config: PageRankConfig) -> Vec<f64> {
    pagerank_run(graph, config).scores
}

pub fn pagerank_checked_run<G: GraphRef + ?Sized>(
    graph: &G,
    config: PageRankConfig,
) -> Result<PageRankRun> {
    config.validate()?;
    if graph.node_count() == 0 {
        return Err(Error::EmptyGraph);
    }
    Ok(pagerank_run(graph, config))
}

/// PageRank with convergence reporting, starting from the uniform distribution.
///
/// `iterations` is the number of passes performed. A run that exhausts `max_iterations` is
/// returned with `converged = false` (best-effort scores, still normalized).
pub fn pagerank_run<G: GraphRef + ?Sized>(graph: &G, config: PageRankConfig) -> PageRankRun {
    let n = graph.node_count();
    if n == 0 {
        return PageRankRun {
            scores: Vec::new(),
            iterations: 0,
            max_delta: 0.0,
            converged: true,
        };
    }
    let initial = vec![1.0 / n as f64; n];
    iterate(graph, config, initial)
}

/// PageRank starting from `initial` (normalized first) instead of the uniform distribution.
///
/// Restarting from a converged result should stop after one pass with no node moving by more
/// than `tolerance`.
pub fn pagerank_run_from<G: GraphRef + ?Sized>(
    graph: &G,
    config: PageRankConfig,
    initial: &[f64],
) -> Result<PageRankRun> {
    config.validate()?;
    let n = graph.node_count();
    if n == 0 {
        return Err(Error::EmptyGraph);
    }
    if initial.len() != n {
        return Err(Error::InvalidParameter(format!(
            "initial length must equal node_count (len={} node_count={})",
            initial.len(),
            n
        )));
    }
    if initial.iter().any(|x| !x.is_finite() || *x < 0.0) {
        return Err(Error::InvalidParameter(
            "initial entries must be finite and non-negative".to_string(),
        ));
    }
    let mut scores = initial.to_vec();
    transition::normalize(&mut scores);
    if !transition::sums_to_one(&scores) {
        return Err(Error::InvalidParameter(
            "initial sum must be > 0".to_string(),
        ));
    }
    Ok(iterate(graph, config, scores))
}

fn iterate<G: GraphRef + ?Sized>(
    graph: &G,
    config: PageRankConfig,
    mut scores: Vec<f64>,
) -> PageRankRun {
    let n = graph.node_count();
    let n_f64 = n as f64;
    let teleport = (1.0 - config.damping) / n_f64;
    let mut new_scores = vec![0.0; n];

    let mut iters = 0usize;
    let mut last_delta = f64::INFINITY;
    let mut converged = false;
    for _ in 0..config.max_iterations {
        iters += 1;

        // Reads only `scores`; writes only `new_scores`.
        let dangling_sum: f64 = scores
            .iter()
            .enumerate()
            .filter(|&(u, _)| Fanout::of(graph, u).is_dangling())
            .map(|(_, s)| s)
            .sum();
        new_scores.fill(teleport + config.damping * dangling_sum / n_f64);

        for (u, &score) in scores.iter().enumerate() {
            if let Fanout::Links(links) = Fanout::of(graph, u) {
                let share = config.damping * score / links.len() as f64;
                for &v in links {
                    new_scores[v] += share;
                }
            }
        }

        let delta = scores
            .iter()
            .zip(new_scores.iter())
            .map(|(old, new)| (old - new).abs())
            .fold(0.0, f64::max);
        last_delta = delta;
        std::mem::swap(&mut scores, &mut new_scores);
        if delta < config.tolerance {
            converged = true;
            break;
        }
    }

    transition::normalize(&mut scores);
    debug_assert!(
        transition::sums_to_one(&scores),
        "pagerank sums to {}",
        scores.iter().sum::<f64>()
    );

    if converged {
        tracing::debug!(
            pages = n,
            iterations = iters,
            max_delta = last_delta,
            "pagerank converged"
        );
    } else {
        tracing::warn!(
            pages = n,
            iterations = iters,
            max_delta = last_delta,
            tolerance = config.tolerance,
            "pagerank did not converge; returning best-effort ranks"
        );
    }

    PageRankRun {
        scores,
        iterations: iters,
        max_delta: last_delta,
        converged,
    }
}
