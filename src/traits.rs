//! Core trait for sequence-constrained trellis decoders.
//!
//! To run a decoder on [`TrellisEngine`](crate::engine::TrellisEngine),
//! implement [`TrellisProblem`] for a struct that captures one instance
//! (graph, start node, target sequence).
//!
//! The trait encodes the layered structure the engine drives:
//! - Steps `0..=n`, one per consumed symbol plus the start.
//! - Frontiers: the nodes reached at a step, each with a policy-specific score.
//! - Candidate generation: the transitions leaving a node at a given step.
//! - An update policy deciding which of two arrivals at the same node survives.
//! - Terminal selection: which node of the last frontier the path ends at.

use crate::error::DecodeError;
use crate::frontier::{Frontier, Merge};
use std::hash::Hash;

/// Thread-safety bound that is only enforced with the `parallel` feature.
///
/// Problem types borrow caller data (graphs, sequences); the parallel engine
/// needs that data to be shareable across the rayon pool.
#[cfg(feature = "parallel")]
pub trait Shareable: Send + Sync {}
#[cfg(feature = "parallel")]
impl<T: Send + Sync + ?Sized> Shareable for T {}

/// Thread-safety bound that is only enforced with the `parallel` feature.
#[cfg(not(feature = "parallel"))]
pub trait Shareable {}
#[cfg(not(feature = "parallel"))]
impl<T: ?Sized> Shareable for T {}

/// A fixed decode instance.
///
/// Semantics:
/// - There are `n = num_steps()` steps.
/// - Frontier 0 holds only `start_node()` with `initial_score()`.
/// - `relax(i, u, score, emit)` emits every `(v, candidate_score)` that
///   frontier `i + 1` may receive from `u`.
/// - When a node already holds a record, `merge(existing, candidate)` decides.
/// - After `n` steps `select_terminal` picks the node the path ends at.
pub trait TrellisProblem {
    /// Graph node identifier. Equality and hashing only; no ordering.
    type Node: Clone + Eq + Hash;

    /// Per-node payload carried in a frontier (e.g. `()` or a log-probability).
    type Score: Clone;

    /// Objective reported alongside the path.
    type Cost;

    /// Number of steps `n` (the target sequence length).
    fn num_steps(&self) -> usize;

    /// Node placed in frontier 0.
    fn start_node(&self) -> &Self::Node;

    /// Score of the start node in frontier 0.
    fn initial_score(&self) -> Self::Score;

    /// Emit every candidate arrival for step `step + 1` reachable from `node`.
    ///
    /// Requirements:
    /// - Must only depend on `node`, `score`, and fixed problem data.
    /// - Candidates must be emitted in a deterministic order.
    fn relax(
        &self,
        step: usize,
        node: &Self::Node,
        score: &Self::Score,
        emit: &mut dyn FnMut(Self::Node, Self::Score),
    ) -> Result<(), DecodeError>;

    /// Update policy for a node reached more than once at the same step.
    fn merge(&self, existing: &Self::Score, candidate: &Self::Score) -> Merge;

    /// Slot of the node in the final frontier where the path should end.
    ///
    /// Only called on a non-empty frontier.
    fn select_terminal(&self, frontier_n: &Frontier<Self::Node, Self::Score>) -> Option<usize>;

    /// Objective value for the terminal arrival's score.
    fn extract_cost(&self, score: &Self::Score) -> Self::Cost;
}
