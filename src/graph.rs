//! Edge-labeled directed graphs consumed by the decoders.
//!
//! Nodes and their outgoing transitions are kept in insertion order. The
//! decoders rely on that order for every tie-break, so two graphs built by
//! the same sequence of calls always decode identically.

use indexmap::IndexMap;
use std::hash::Hash;

/// One outgoing transition: target node, label, and an optional weight.
///
/// Unweighted graphs use `W = ()`; probabilistic graphs use `W = f64`.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<N, L, W = ()> {
    pub target: N,
    pub label: L,
    pub weight: W,
}

impl<N, L> Transition<N, L> {
    pub fn new(target: N, label: L) -> Self {
        Self {
            target,
            label,
            weight: (),
        }
    }
}

impl<N, L> Transition<N, L, f64> {
    pub fn weighted(target: N, label: L, probability: f64) -> Self {
        Self {
            target,
            label,
            weight: probability,
        }
    }

    /// The transition probability.
    #[inline]
    pub fn probability(&self) -> f64 {
        self.weight
    }
}

/// Adjacency-list graph with labeled (and optionally weighted) transitions.
#[derive(Clone, Debug)]
pub struct LabeledGraph<N, L, W = ()> {
    adjacency: IndexMap<N, Vec<Transition<N, L, W>>>,
}

/// Graph whose transitions carry probabilities.
pub type WeightedGraph<N, L> = LabeledGraph<N, L, f64>;

impl<N, L, W> Default for LabeledGraph<N, L, W> {
    fn default() -> Self {
        Self {
            adjacency: IndexMap::new(),
        }
    }
}

impl<N, L, W> LabeledGraph<N, L, W>
where
    N: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node` with no outgoing transitions. No-op if already present.
    pub fn add_node(&mut self, node: N) {
        self.adjacency.entry(node).or_default();
    }

    /// Append a transition leaving `from`. Both endpoints become nodes of the graph.
    pub fn add_transition(&mut self, from: N, transition: Transition<N, L, W>) {
        let target = transition.target.clone();
        self.adjacency.entry(from).or_default().push(transition);
        self.add_node(target);
    }

    #[inline]
    pub fn contains_node(&self, node: &N) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Outgoing transitions of `node`, in insertion order. Unknown nodes have none.
    #[inline]
    pub fn transitions(&self, node: &N) -> &[Transition<N, L, W>] {
        self.adjacency
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.adjacency.keys()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Same topology and labels with the weights dropped.
    pub fn strip_weights(&self) -> LabeledGraph<N, L>
    where
        L: Clone,
    {
        let adjacency = self
            .adjacency
            .iter()
            .map(|(node, edges)| {
                let edges = edges
                    .iter()
                    .map(|t| Transition::new(t.target.clone(), t.label.clone()))
                    .collect();
                (node.clone(), edges)
            })
            .collect();
        LabeledGraph { adjacency }
    }
}

impl<N, L, W> LabeledGraph<N, L, W>
where
    N: Clone + Eq + Hash,
    L: PartialEq,
{
    /// True iff `path` has one node more than `sequence` and every step
    /// `path[i] -> path[i + 1]` is a transition labeled `sequence[i]`.
    pub fn follows(&self, path: &[N], sequence: &[L]) -> bool {
        if path.len() != sequence.len() + 1 {
            return false;
        }
        path.windows(2).zip(sequence).all(|(pair, symbol)| {
            self.transitions(&pair[0])
                .iter()
                .any(|t| t.target == pair[1] && t.label == *symbol)
        })
    }
}

impl<N, L> LabeledGraph<N, L>
where
    N: Clone + Eq + Hash,
{
    pub fn add_edge(&mut self, from: N, to: N, label: L) {
        self.add_transition(from, Transition::new(to, label));
    }
}

impl<N, L> LabeledGraph<N, L, f64>
where
    N: Clone + Eq + Hash,
{
    pub fn add_weighted_edge(&mut self, from: N, to: N, label: L, probability: f64) {
        self.add_transition(from, Transition::weighted(to, label, probability));
    }
}

impl<N, L> LabeledGraph<N, L, f64>
where
    N: Clone + Eq + Hash,
    L: PartialEq,
{
    /// Probability of following `path` while reading `sequence`.
    ///
    /// With parallel transitions sharing a label the most probable one is
    /// used at each step. Returns `None` if the path does not follow the
    /// sequence.
    pub fn path_probability(&self, path: &[N], sequence: &[L]) -> Option<f64> {
        if path.len() != sequence.len() + 1 {
            return None;
        }
        let mut product = 1.0;
        for (pair, symbol) in path.windows(2).zip(sequence) {
            let best = self
                .transitions(&pair[0])
                .iter()
                .filter(|t| t.target == pair[1] && t.label == *symbol)
                .map(Transition::probability)
                .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |a| a.max(p))))?;
            product *= best;
        }
        Some(product)
    }
}

impl<N, L, W> FromIterator<(N, Vec<Transition<N, L, W>>)> for LabeledGraph<N, L, W>
where
    N: Eq + Hash,
{
    /// Build from adjacency lists. Targets are not registered as nodes
    /// unless they also appear as keys.
    fn from_iter<I: IntoIterator<Item = (N, Vec<Transition<N, L, W>>)>>(iter: I) -> Self {
        let mut adjacency: IndexMap<N, Vec<Transition<N, L, W>>> = IndexMap::new();
        for (node, edges) in iter {
            adjacency.entry(node).or_default().extend(edges);
        }
        Self { adjacency }
    }
}
