//! Reachability decoding: does some path spell out the target sequence?
//!
//! Frontier `i` holds the nodes reachable by a label-matching path of length
//! `i`. Only existence matters, so the first predecessor discovered for a
//! node at a step is kept and later ones are ignored.

use crate::error::DecodeError;
use crate::frontier::{Frontier, Merge};
use crate::graph::LabeledGraph;
use crate::traits::{Shareable, TrellisProblem};
use crate::TrellisEngine;
use std::hash::Hash;

/// Reachability instance: borrowed graph, start node, target sequence.
///
/// Transition weights, if any, are ignored.
#[derive(Clone, Debug)]
pub struct ReachabilityProblem<'a, N, L, W = ()> {
    graph: &'a LabeledGraph<N, L, W>,
    start: N,
    sequence: &'a [L],
}

impl<'a, N, L, W> ReachabilityProblem<'a, N, L, W>
where
    N: Clone + Eq + Hash,
{
    /// # Errors
    /// [`DecodeError::InvalidStart`] if `start` is not a node of `graph`.
    pub fn new(
        graph: &'a LabeledGraph<N, L, W>,
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

impl<N, L, W> TrellisProblem for ReachabilityProblem<'_, N, L, W>
where
    N: Clone + Eq + Hash,
    L: PartialEq,
{
    type Node = N;
    type Score = ();
    type Cost = ();

    fn num_steps(&self) -> usize {
        self.sequence.len()
    }

    fn start_node(&self) -> &N {
        &self.start
    }

    fn initial_score(&self) {}

    fn relax(
        &self,
        step: usize,
        node: &N,
        _score: &(),
        emit: &mut dyn FnMut(N, ()),
    ) -> Result<(), DecodeError> {
        let symbol = &self.sequence[step];
        for t in self.graph.transitions(node) {
            if t.label == *symbol {
                emit(t.target.clone(), ());
            }
        }
        Ok(())
    }

    /// First writer wins.
    fn merge(&self, _existing: &(), _candidate: &()) -> Merge {
        Merge::Keep
    }

    /// The first node inserted into the final frontier.
    fn select_terminal(&self, frontier_n: &Frontier<N, ()>) -> Option<usize> {
        (!frontier_n.is_empty()).then_some(0)
    }

    fn extract_cost(&self, _score: &()) {}
}

/// Find one path from `start` whose edge labels spell `sequence`.
///
/// Returns `Ok(None)` when no such path exists. An empty sequence yields
/// `[start]`.
///
/// ```
/// use trellis_dp::{find_path, LabeledGraph};
///
/// let mut graph: LabeledGraph<char, char> = LabeledGraph::new();
/// graph.add_edge('A', 'B', 'a');
/// graph.add_edge('A', 'C', 'b');
/// graph.add_edge('B', 'D', 'b');
/// graph.add_edge('C', 'D', 'a');
/// assert_eq!(find_path(&graph, &'A', &['a', 'b']).unwrap(), Some(vec!['A', 'B', 'D']));
/// assert_eq!(find_path(&graph, &'A', &['a', 'a']).unwrap(), None);
/// ```
///
/// # Errors
/// [`DecodeError::InvalidStart`] if `start` is not a node of `graph`.
pub fn find_path<N, L, W>(
    graph: &LabeledGraph<N, L, W>,
    start: &N,
    sequence: &[L],
) -> Result<Option<Vec<N>>, DecodeError>
where
    N: Clone + Eq + Hash + Shareable,
    L: PartialEq + Shareable,
    W: Shareable,
{
    let problem = ReachabilityProblem::new(graph, start.clone(), sequence)?;
    let decoded = TrellisEngine::new(problem).run()?;
    Ok(decoded.map(|d| d.path))
}
