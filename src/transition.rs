//! Random-surfer transition model.
//!
//! From page `u` with damping `d` over `n` pages:
//! - if `u` has `L > 0` outbound links, every page gets \((1-d)/n\) and each linked page gets
//!   an extra \(d/L\);
//! - if `u` is dangling, the next page is uniform over all `n` pages.
//!
//! The dangling rule lives in [`Fanout`], which both the sampler and the iterative solver go
//! through, so the two estimators target the same stationary distribution.

use std::collections::BTreeMap;

use crate::graph::GraphRef;
use crate::{Error, Result};

/// Tolerance for "sums to one" checks on distributions.
pub const SUM_TOLERANCE: f64 = 1e-5;

/// Where a node's probability mass goes when the surfer follows a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fanout<'a> {
    /// Dangling node: mass spreads uniformly over every node (including itself).
    Uniform,
    /// Mass splits evenly over these outbound neighbors.
    Links(&'a [usize]),
}

impl<'a> Fanout<'a> {
    pub fn of<G: GraphRef + ?Sized>(graph: &'a G, node: usize) -> Self {
        match graph.neighbors_ref(node) {
            [] => Fanout::Uniform,
            links => Fanout::Links(links),
        }
    }

    pub fn is_dangling(&self) -> bool {
        matches!(self, Fanout::Uniform)
    }
}

pub(crate) fn check_damping(damping: f64, allow_endpoints: bool) -> Result<()> {
    if !damping.is_finite() {
        return Err(Error::InvalidParameter(
            "damping must be finite".to_string(),
        ));
    }
    if allow_endpoints {
        if !(0.0..=1.0).contains(&damping) {
            return Err(Error::InvalidParameter(format!(
                "damping must be in [0,1] (got {damping})"
            )));
        }
    } else if damping <= 0.0 || damping >= 1.0 {
        return Err(Error::InvalidParameter(format!(
            "damping must be in (0,1) (got {damping})"
        )));
    }
    Ok(())
}

/// Transition probabilities out of `node`, indexed by target node.
pub fn transition<G: GraphRef + ?Sized>(graph: &G, node: usize, damping: f64) -> Vec<f64> {
    let mut out = vec![0.0; graph.node_count()];
    transition_into(graph, node, damping, &mut out);
    out
}

/// Like [`transition`], writing into a caller-owned buffer of length `node_count()`.
pub fn transition_into<G: GraphRef + ?Sized>(
    graph: &G,
    node: usize,
    damping: f64,
    out: &mut [f64],
) {
    let n = graph.node_count();
    assert_eq!(out.len(), n, "transition buffer length must equal node_count");
    let n_f64 = n as f64;
    match Fanout::of(graph, node) {
        Fanout::Uniform => out.fill(1.0 / n_f64),
        Fanout::Links(links) => {
            out.fill((1.0 - damping) / n_f64);
            let share = damping / links.len() as f64;
            for &v in links {
                out[v] += share;
            }
        }
    }
    debug_assert!(
        sums_to_one(out),
        "transition row for node {node} sums to {}",
        out.iter().sum::<f64>()
    );
}

/// Checked transition: rejects empty graphs, bad node ids, and damping outside `[0,1]`.
pub fn transition_checked<G: GraphRef + ?Sized>(
    graph: &G,
    node: usize,
    damping: f64,
) -> Result<Vec<f64>> {
    check_damping(damping, true)?;
    let n = graph.node_count();
    if n == 0 {
        return Err(Error::EmptyGraph);
    }
    if node >= n {
        return Err(Error::IndexOutOfBounds(node));
    }
    Ok(transition(graph, node, damping))
}

pub(crate) fn sums_to_one(xs: &[f64]) -> bool {
    (xs.iter().sum::<f64>() - 1.0).abs() < SUM_TOLERANCE
}

/// Scale `xs` in place so it sums to one. No-op if the sum is not positive.
pub fn normalize(xs: &mut [f64]) {
    let total: f64 = xs.iter().sum();
    if total > 0.0 && total.is_finite() {
        for x in xs.iter_mut() {
            *x /= total;
        }
    }
}

/// Probability mass over named pages, ordered by page name.
///
/// Used for both transition rows and rank estimates.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Distribution {
    probs: BTreeMap<String, f64>,
}

impl Distribution {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        Self {
            probs: pairs.into_iter().collect(),
        }
    }

    pub fn get(&self, page: &str) -> Option<f64> {
        self.probs.get(page).copied()
    }

    pub fn len(&self) -> usize {
        self.probs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// Entries in ascending page-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.probs.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn total(&self) -> f64 {
        self.probs.values().sum()
    }

    /// Largest absolute per-page difference; pages missing on one side count as zero there.
    pub fn max_abs_diff(&self, other: &Distribution) -> f64 {
        let lhs = self
            .iter()
            .map(|(page, p)| (p - other.get(page).unwrap_or(0.0)).abs());
        let rhs = other
            .iter()
            .filter(|(page, _)| !self.probs.contains_key(*page))
            .map(|(_, p)| p.abs());
        lhs.chain(rhs).fold(0.0, f64::max)
    }

    pub fn into_inner(self) -> BTreeMap<String, f64> {
        self.probs
    }
}
