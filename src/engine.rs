//! Generic trellis engine.
//!
//! This module implements the two-phase decode shared by every decoder:
//! 1. A forward pass that builds one frontier per step, each derived only
//!    from the previous one and the problem's update policy.
//! 2. A backward walk over predecessor slots from the selected terminal node.
//!
//! The engine is completely generic over implementations of [`TrellisProblem`].

use crate::builder::DecodeLimits;
use crate::error::DecodeError;
use crate::frontier::{Arrival, Frontier, Predecessor, Trellis};
use crate::traits::TrellisProblem;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A decoded path together with the problem's objective for it.
#[derive(Clone, Debug, PartialEq)]
pub struct Decoded<N, C> {
    /// Nodes from the start (step 0) to the terminal node (step n).
    pub path: Vec<N>,
    pub cost: C,
}

type FrontierOf<P> = Frontier<<P as TrellisProblem>::Node, <P as TrellisProblem>::Score>;
type TrellisOf<P> = Trellis<<P as TrellisProblem>::Node, <P as TrellisProblem>::Score>;
type DecodedOf<P> = Decoded<<P as TrellisProblem>::Node, <P as TrellisProblem>::Cost>;

/// Trellis engine for a given problem instance `P`.
///
/// Typical usage:
/// ```
/// use trellis_dp::{LabeledGraph, TrellisEngine, problems::reachability::ReachabilityProblem};
///
/// let mut graph: LabeledGraph<&str, char> = LabeledGraph::new();
/// graph.add_edge("A", "B", 'a');
/// graph.add_edge("B", "D", 'b');
/// let sequence = ['a', 'b'];
/// let problem = ReachabilityProblem::new(&graph, "A", &sequence).unwrap();
/// let decoded = TrellisEngine::new(problem).run().unwrap().unwrap();
/// assert_eq!(decoded.path, vec!["A", "B", "D"]);
/// ```
pub struct TrellisEngine<P: TrellisProblem> {
    problem: P,
    limits: DecodeLimits,
}

impl<P: TrellisProblem> TrellisEngine<P> {
    /// Create an engine with no resource limits.
    pub fn new(problem: P) -> Self {
        Self::with_limits(problem, DecodeLimits::default())
    }

    /// Create an engine that enforces `limits` during the forward pass.
    pub fn with_limits(problem: P, limits: DecodeLimits) -> Self {
        Self { problem, limits }
    }

    /// Expose immutable reference to the underlying problem.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Return the configured limits.
    pub fn limits(&self) -> DecodeLimits {
        self.limits
    }

    /// Phase I: build the frontiers for steps `0..=n` with `expand`.
    fn build_with<F>(&self, expand: F) -> Result<TrellisOf<P>, DecodeError>
    where
        F: Fn(&P, usize, &FrontierOf<P>) -> Result<FrontierOf<P>, DecodeError>,
    {
        let n = self.problem.num_steps();
        self.limits.check_steps(n)?;

        let initial = Frontier::seed(
            self.problem.start_node().clone(),
            self.problem.initial_score(),
        );
        let mut trellis = Trellis::with_capacity(initial, n);

        for step in 0..n {
            #[cfg(feature = "tracing")]
            let span = tracing::trace_span!("forward_step", step);
            #[cfg(feature = "tracing")]
            let _enter = span.enter();

            let next = expand(&self.problem, step, trellis.last())?;

            #[cfg(feature = "tracing")]
            tracing::trace!(width = next.len(), "frontier built");

            self.limits.check_width(step + 1, next.len())?;
            trellis.push(next);
        }

        Ok(trellis)
    }

    /// Phase II: pick the terminal node and walk back to the start.
    fn decode(&self, trellis: &TrellisOf<P>) -> Option<DecodedOf<P>> {
        let last = trellis.last();
        if last.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::debug!(steps = trellis.len() - 1, "final frontier empty");
            return None;
        }
        let slot = self.problem.select_terminal(last);
        debug_assert!(
            slot.is_some_and(|slot| slot < last.len()),
            "select_terminal must pick a slot of a non-empty final frontier"
        );
        let slot = slot?;
        let (_, arrival) = last.get_slot(slot)?;
        let cost = self.problem.extract_cost(&arrival.score);
        let path = trellis.backtrack(slot);
        debug_assert!(path.is_some(), "predecessor slots must lead back to the start");
        Some(Decoded { path: path?, cost })
    }

    fn run_with<F>(&self, expand: F) -> Result<Option<DecodedOf<P>>, DecodeError>
    where
        F: Fn(&P, usize, &FrontierOf<P>) -> Result<FrontierOf<P>, DecodeError>,
    {
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("trellis_run", steps = self.problem.num_steps());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let trellis = self.build_with(expand)?;
        Ok(self.decode(&trellis))
    }
}

/// Derive frontier `step + 1` from `current`, visiting sources in slot order.
fn expand_serial<P: TrellisProblem>(
    problem: &P,
    step: usize,
    current: &FrontierOf<P>,
) -> Result<FrontierOf<P>, DecodeError> {
    let mut next = Frontier::new(step + 1);
    for (slot, (node, arrival)) in current.iter().enumerate() {
        problem.relax(step, node, &arrival.score, &mut |target, score| {
            next.offer(
                target,
                Arrival {
                    score,
                    predecessor: Predecessor::Slot(slot),
                },
                |existing, candidate| problem.merge(existing, candidate),
            );
        })?;
    }
    Ok(next)
}

/// Parallel counterpart of [`expand_serial`].
///
/// Candidates are generated concurrently per source node, then merged in
/// slot order, so the resulting frontier and the first reported error are
/// the same as in the serial pass.
#[cfg(feature = "parallel")]
fn expand_parallel<P>(
    problem: &P,
    step: usize,
    current: &FrontierOf<P>,
) -> Result<FrontierOf<P>, DecodeError>
where
    P: TrellisProblem + Sync,
    P::Node: Send + Sync,
    P::Score: Send + Sync,
{
    let sources: Vec<_> = current.iter().collect();
    let batches: Vec<Result<Vec<(P::Node, P::Score)>, DecodeError>> = sources
        .par_iter()
        .map(|&(node, arrival)| {
            let mut out = Vec::new();
            problem.relax(step, node, &arrival.score, &mut |target, score| {
                out.push((target, score))
            })?;
            Ok(out)
        })
        .collect();

    let mut next = Frontier::new(step + 1);
    for (slot, batch) in batches.into_iter().enumerate() {
        for (target, score) in batch? {
            next.offer(
                target,
                Arrival {
                    score,
                    predecessor: Predecessor::Slot(slot),
                },
                |existing, candidate| problem.merge(existing, candidate),
            );
        }
    }
    Ok(next)
}

#[cfg(feature = "parallel")]
impl<P> TrellisEngine<P>
where
    P: TrellisProblem + Sync,
    P::Node: Send + Sync,
    P::Score: Send + Sync,
{
    /// Build every frontier of the trellis, evaluating each step's sources
    /// on the rayon pool.
    pub fn build_trellis(&self) -> Result<TrellisOf<P>, DecodeError> {
        self.build_with(expand_parallel::<P>)
    }

    /// Run the full decode, enforcing the thread-safety bounds required by
    /// the `parallel` feature.
    ///
    /// Returns `Ok(None)` when no label-matching path exists, and otherwise
    /// the path from the start node to the terminal node chosen by
    /// [`TrellisProblem::select_terminal`]. Results are identical to the
    /// serial build.
    pub fn run(&self) -> Result<Option<DecodedOf<P>>, DecodeError> {
        self.run_with(expand_parallel::<P>)
    }
}

#[cfg(not(feature = "parallel"))]
impl<P: TrellisProblem> TrellisEngine<P> {
    /// Build every frontier of the trellis (serial execution).
    pub fn build_trellis(&self) -> Result<TrellisOf<P>, DecodeError> {
        self.build_with(expand_serial::<P>)
    }

    /// Run the full decode (serial execution).
    ///
    /// Returns `Ok(None)` when no label-matching path exists, and otherwise
    /// the path from the start node to the terminal node chosen by
    /// [`TrellisProblem::select_terminal`].
    ///
    /// # Errors
    /// Propagates errors raised by [`TrellisProblem::relax`] and limit
    /// violations configured through [`DecodeLimits`].
    pub fn run(&self) -> Result<Option<DecodedOf<P>>, DecodeError> {
        self.run_with(expand_serial::<P>)
    }
}

/// Serial forward pass, available regardless of features.
///
/// Used as the reference the parallel build is checked against.
pub fn build_trellis_serial<P: TrellisProblem>(
    engine: &TrellisEngine<P>,
) -> Result<TrellisOf<P>, DecodeError> {
    engine.build_with(expand_serial::<P>)
}
