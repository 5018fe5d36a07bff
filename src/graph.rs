//! Graph adapters and the page-level link graph.
//!
//! Operators in this crate are index-based: nodes are `0..node_count()`, and an adapter hands
//! out each node's outbound neighbors. [`LinkGraph`] is the page-named graph built from a
//! crawled corpus; it implements both adapter traits, so every operator accepts it directly.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::transition::{self, Distribution};
use crate::{Error, Result};

/// Owned-neighbor adapter.
///
/// Cheap to implement for foreign graph types (e.g. `petgraph`), at the cost of one allocation
/// per `neighbors` call.
pub trait Graph {
    fn node_count(&self) -> usize;
    fn neighbors(&self, node: usize) -> Vec<usize>;

    fn out_degree(&self, node: usize) -> usize {
        self.neighbors(node).len()
    }
}

/// Borrowed-neighbor adapter, used on hot paths (per-step sampling, solver passes).
///
/// Contract: neighbor lists hold no duplicates, no self-loops, and only ids `< node_count()`.
/// [`AdjacencyList::from_graph`] produces a conforming adapter from any [`Graph`].
pub trait GraphRef {
    fn node_count(&self) -> usize;
    fn neighbors_ref(&self, node: usize) -> &[usize];

    fn out_degree_ref(&self, node: usize) -> usize {
        self.neighbors_ref(node).len()
    }
}

/// Plain adjacency lists satisfying the [`GraphRef`] contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdjacencyList {
    adj: Vec<Vec<usize>>,
}

impl AdjacencyList {
    /// Normalize raw adjacency lists: sort, dedup, drop self-loops and out-of-range ids.
    pub fn new(mut adj: Vec<Vec<usize>>) -> Self {
        let n = adj.len();
        for (u, nbrs) in adj.iter_mut().enumerate() {
            nbrs.retain(|&v| v < n && v != u);
            nbrs.sort_unstable();
            nbrs.dedup();
        }
        Self { adj }
    }

    /// Snapshot any owned-neighbor adapter into a conforming [`GraphRef`].
    pub fn from_graph<G: Graph + ?Sized>(graph: &G) -> Self {
        let adj = (0..graph.node_count()).map(|u| graph.neighbors(u)).collect();
        Self::new(adj)
    }
}

impl GraphRef for AdjacencyList {
    fn node_count(&self) -> usize {
        self.adj.len()
    }
    fn neighbors_ref(&self, node: usize) -> &[usize] {
        &self.adj[node]
    }
}

impl Graph for AdjacencyList {
    fn node_count(&self) -> usize {
        self.adj.len()
    }
    fn neighbors(&self, node: usize) -> Vec<usize> {
        self.adj[node].clone()
    }
    fn out_degree(&self, node: usize) -> usize {
        self.adj[node].len()
    }
}

/// Immutable hyperlink graph over a corpus of named pages.
///
/// Invariants (established by [`LinkGraph::build`], never mutated afterwards):
/// - pages are stored in ascending name order; node `i` is `pages()[i]`
/// - every link target is a corpus page
/// - no page links to itself
/// - a page with no outbound links is *dangling*
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkGraph {
    pages: Vec<String>,
    index: HashMap<String, usize>,
    links: Vec<Vec<usize>>,
}

impl LinkGraph {
    /// Build the graph from `(page, raw link targets)` pairs.
    ///
    /// Targets that are not themselves corpus pages are dropped, as are self-links. Repeated
    /// page keys merge their targets. An empty corpus yields an empty graph; the estimators
    /// reject it with [`Error::EmptyGraph`].
    pub fn build<I, P, L, T>(corpus: I) -> Self
    where
        I: IntoIterator<Item = (P, L)>,
        P: Into<String>,
        L: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut raw: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (page, targets) in corpus {
            raw.entry(page.into())
                .or_default()
                .extend(targets.into_iter().map(|t| t.as_ref().to_string()));
        }

        let pages: Vec<String> = raw.keys().cloned().collect();
        let index: HashMap<String, usize> = pages
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), i))
            .collect();

        // Targets iterate in name order, so each list comes out sorted and unique.
        let links: Vec<Vec<usize>> = raw
            .values()
            .enumerate()
            .map(|(src, targets)| {
                targets
                    .iter()
                    .filter_map(|t| index.get(t.as_str()).copied())
                    .filter(|&dst| dst != src)
                    .collect()
            })
            .collect();

        let graph = Self {
            pages,
            index,
            links,
        };
        tracing::debug!(
            pages = graph.len(),
            edges = graph.edge_count(),
            dangling = graph.dangling_pages().count(),
            "built link graph"
        );
        graph
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Page names in node order (ascending).
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn page(&self, node: usize) -> Option<&str> {
        self.pages.get(node).map(String::as_str)
    }

    pub fn index_of(&self, page: &str) -> Option<usize> {
        self.index.get(page).copied()
    }

    /// Outbound links of `page`, by name, or `None` if `page` is not in the corpus.
    pub fn links(&self, page: &str) -> Option<impl Iterator<Item = &str> + '_> {
        let node = self.index_of(page)?;
        Some(self.links[node].iter().map(|&v| self.pages[v].as_str()))
    }

    pub fn is_dangling(&self, node: usize) -> bool {
        self.links.get(node).is_some_and(Vec::is_empty)
    }

    pub fn dangling_pages(&self) -> impl Iterator<Item = &str> + '_ {
        self.links
            .iter()
            .zip(&self.pages)
            .filter(|(nbrs, _)| nbrs.is_empty())
            .map(|(_, page)| page.as_str())
    }

    pub fn edge_count(&self) -> usize {
        self.links.iter().map(Vec::len).sum()
    }

    /// Transition distribution out of `page`, keyed by page name.
    pub fn transition(&self, page: &str, damping: f64) -> Result<Distribution> {
        let node = self
            .index_of(page)
            .ok_or_else(|| Error::UnknownPage(page.to_string()))?;
        let probs = transition::transition_checked(self, node, damping)?;
        Ok(self.label(&probs))
    }

    /// Attach page names to a per-node score vector.
    ///
    /// # Panics
    /// Panics if `scores.len() != self.len()`.
    pub fn label(&self, scores: &[f64]) -> Distribution {
        assert_eq!(
            scores.len(),
            self.len(),
            "score vector length must equal page count"
        );
        Distribution::from_pairs(self.pages.iter().cloned().zip(scores.iter().copied()))
    }
}

impl GraphRef for LinkGraph {
    fn node_count(&self) -> usize {
        self.pages.len()
    }
    fn neighbors_ref(&self, node: usize) -> &[usize] {
        &self.links[node]
    }
}

impl Graph for LinkGraph {
    fn node_count(&self) -> usize {
        self.pages.len()
    }
    fn neighbors(&self, node: usize) -> Vec<usize> {
        self.links[node].clone()
    }
    fn out_degree(&self, node: usize) -> usize {
        self.links[node].len()
    }
}

#[cfg(feature = "petgraph")]
impl<N, E, Ty, Ix> Graph for petgraph::Graph<N, E, Ty, Ix>
where
    Ty: petgraph::EdgeType,
    Ix: petgraph::graph::IndexType,
{
    fn node_count(&self) -> usize {
        petgraph::Graph::node_count(self)
    }
    fn neighbors(&self, node: usize) -> Vec<usize> {
        petgraph::Graph::neighbors(self, petgraph::graph::NodeIndex::new(node))
            .map(|n| n.index())
            .collect()
    }
}
