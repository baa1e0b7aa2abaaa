//! Maximum-likelihood decoding over a probability-weighted labeled graph.
//!
//! This is Viterbi decoding where the hidden states are graph nodes and the
//! observation at step `i` must equal the label of the transition taken.
//! Scores are accumulated as natural-log probabilities so long sequences do
//! not underflow; the probability is recovered once, at the very end.

use crate::error::DecodeError;
use crate::frontier::{Frontier, Merge};
use crate::graph::WeightedGraph;
use crate::traits::{Shareable, TrellisProblem};
use crate::utils::checked_ln;
use crate::TrellisEngine;
use std::hash::Hash;

/// Maximum-likelihood instance: borrowed weighted graph, start node, target sequence.
#[derive(Clone, Debug)]
pub struct MaxLikelihoodProblem<'a, N, L> {
    graph: &'a WeightedGraph<N, L>,
    start: N,
    sequence: &'a [L],
}

/// Most probable label-matching path.
#[derive(Clone, Debug, PartialEq)]
pub struct BestPath<N> {
    pub path: Vec<N>,
    /// Sum of `ln(p)` over the transitions taken.
    pub log_probability: f64,
    /// `exp(log_probability)`; may underflow to 0.0 for very long paths.
    pub probability: f64,
}

impl<N> BestPath<N> {
    fn from_log(path: Vec<N>, log_probability: f64) -> Self {
        Self {
            path,
            log_probability,
            probability: log_probability.exp(),
        }
    }
}

impl<'a, N, L> MaxLikelihoodProblem<'a, N, L>
where
    N: Clone + Eq + Hash,
{
    /// # Errors
    /// [`DecodeError::InvalidStart`] if `start` is not a node of `graph`.
    pub fn new(
        graph: &'a WeightedGraph<N, L>,
        start: N,
        sequence: &'a [L],
    ) -> Result<Self, DecodeError> {
        if !graph.contains_node(&start) {
            #[cfg(feature = "tracing")]
            tracing::debug!("start node missing from graph");
            return Err(DecodeError::InvalidStart);
        }
        Ok(Self {
            graph,
            start,
            sequence,
        })
    }

    pub fn sequence(&self) -> &'a [L] {
        self.sequence
    }
}

impl<N, L> TrellisProblem for MaxLikelihoodProblem<'_, N, L>
where
    N: Clone + Eq + Hash,
    L: PartialEq,
{
    type Node = N;
    type Score = f64;
    type Cost = f64;

    fn num_steps(&self) -> usize {
        self.sequence.len()
    }

    fn start_node(&self) -> &N {
        &self.start
    }

    /// ln(1)
    fn initial_score(&self) -> f64 {
        0.0
    }

    fn relax(
        &self,
        step: usize,
        node: &N,
        score: &f64,
        emit: &mut dyn FnMut(N, f64),
    ) -> Result<(), DecodeError> {
        let symbol = &self.sequence[step];
        for t in self.graph.transitions(node) {
            if t.label != *symbol {
                continue;
            }
            let log_p = match checked_ln(t.probability(), step) {
                Ok(log_p) => log_p,
                Err(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(step, error = %err, "rejecting transition");
                    return Err(err);
                }
            };
            emit(t.target.clone(), score + log_p);
        }
        Ok(())
    }

    /// Strictly better candidates replace; ties keep the earlier arrival.
    fn merge(&self, existing: &f64, candidate: &f64) -> Merge {
        if candidate > existing {
            Merge::Replace
        } else {
            Merge::Keep
        }
    }

    /// Highest accumulated log-probability, earliest slot on ties.
    fn select_terminal(&self, frontier_n: &Frontier<N, f64>) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (slot, (_, arrival)) in frontier_n.iter().enumerate() {
            match best {
                Some((_, b)) if arrival.score <= b => {}
                _ => best = Some((slot, arrival.score)),
            }
        }
        best.map(|(slot, _)| slot)
    }

    fn extract_cost(&self, score: &f64) -> f64 {
        *score
    }
}

/// Find the most probable path from `start` whose edge labels spell `sequence`.
///
/// Returns `Ok(None)` when no label-matching path exists. An empty sequence
/// yields `[start]` with probability 1.
///
/// ```
/// use trellis_dp::{find_best_path, WeightedGraph};
///
/// let mut graph = WeightedGraph::new();
/// graph.add_weighted_edge('A', 'B', 'a', 0.5);
/// graph.add_weighted_edge('A', 'C', 'b', 0.5);
/// graph.add_weighted_edge('B', 'D', 'b', 0.6);
/// graph.add_weighted_edge('C', 'D', 'a', 0.9);
/// let best = find_best_path(&graph, &'A', &['a', 'b']).unwrap().unwrap();
/// assert_eq!(best.path, vec!['A', 'B', 'D']);
/// assert!((best.probability - 0.3).abs() < 1e-12);
/// ```
///
/// # Errors
/// - [`DecodeError::InvalidStart`] if `start` is not a node of `graph`.
/// - [`DecodeError::InvalidProbability`] if a label-matching transition
///   reached during the search has a probability outside `(0, 1]`.
pub fn find_best_path<N, L>(
    graph: &WeightedGraph<N, L>,
    start: &N,
    sequence: &[L],
) -> Result<Option<BestPath<N>>, DecodeError>
where
    N: Clone + Eq + Hash + Shareable,
    L: PartialEq + Shareable,
{
    let problem = MaxLikelihoodProblem::new(graph, start.clone(), sequence)?;
    let decoded = TrellisEngine::new(problem).run()?;
    Ok(decoded.map(|d| BestPath::from_log(d.path, d.cost)))
}
