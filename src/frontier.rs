//! Per-step frontiers and the trellis arena that holds them.
//!
//! A [`Frontier`] maps each node reached at one step to its [`Arrival`]
//! record. Predecessors are stored as slots (insertion indices) into the
//! previous frontier, so the [`Trellis`] is an arena of generations and a
//! path is recovered by following slots backward.

use indexmap::IndexMap;
use std::hash::Hash;

/// Outcome of the pluggable update policy when a node is reached again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Merge {
    /// Keep the existing record.
    Keep,
    /// Overwrite it with the candidate.
    Replace,
}

/// How a node was reached at a given step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Predecessor {
    /// Sentinel for the start node in frontier 0.
    Start,
    /// Insertion index of the predecessor in the previous frontier.
    Slot(usize),
}

/// Arrival record: policy-specific score plus back pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct Arrival<S> {
    pub score: S,
    pub predecessor: Predecessor,
}

/// Nodes reachable after consuming `step` symbols.
#[derive(Clone, Debug)]
pub struct Frontier<N, S> {
    step: usize,
    arrivals: IndexMap<N, Arrival<S>>,
}

impl<N, S> Frontier<N, S>
where
    N: Eq + Hash,
{
    pub fn new(step: usize) -> Self {
        Self {
            step,
            arrivals: IndexMap::new(),
        }
    }

    /// Frontier 0: only `start`, with the sentinel predecessor.
    pub fn seed(start: N, score: S) -> Self {
        let mut frontier = Self::new(0);
        frontier.arrivals.insert(
            start,
            Arrival {
                score,
                predecessor: Predecessor::Start,
            },
        );
        frontier
    }

    /// Offer a candidate arrival for `node`.
    ///
    /// A node seen for the first time is always inserted. Otherwise `merge`
    /// decides between the existing record and the candidate; a replacement
    /// keeps the node's original slot. Returns true if the frontier changed.
    pub fn offer<F>(&mut self, node: N, candidate: Arrival<S>, merge: F) -> bool
    where
        F: FnOnce(&S, &S) -> Merge,
    {
        match self.arrivals.get_mut(&node) {
            None => {
                self.arrivals.insert(node, candidate);
                true
            }
            Some(existing) => match merge(&existing.score, &candidate.score) {
                Merge::Keep => false,
                Merge::Replace => {
                    *existing = candidate;
                    true
                }
            },
        }
    }

    #[inline]
    pub fn step(&self) -> usize {
        self.step
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }

    pub fn get(&self, node: &N) -> Option<&Arrival<S>> {
        self.arrivals.get(node)
    }

    pub fn slot_of(&self, node: &N) -> Option<usize> {
        self.arrivals.get_index_of(node)
    }

    pub fn get_slot(&self, slot: usize) -> Option<(&N, &Arrival<S>)> {
        self.arrivals.get_index(slot)
    }

    /// Arrivals in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&N, &Arrival<S>)> {
        self.arrivals.iter()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.arrivals.keys()
    }
}

/// Arena of frontiers, one per step `0..=n`.
#[derive(Clone, Debug)]
pub struct Trellis<N, S> {
    generations: Vec<Frontier<N, S>>,
}

impl<N, S> Trellis<N, S>
where
    N: Clone + Eq + Hash,
{
    pub fn new(initial: Frontier<N, S>) -> Self {
        Self {
            generations: vec![initial],
        }
    }

    pub fn with_capacity(initial: Frontier<N, S>, steps: usize) -> Self {
        let mut generations = Vec::with_capacity(steps + 1);
        generations.push(initial);
        Self { generations }
    }

    pub fn push(&mut self, frontier: Frontier<N, S>) {
        debug_assert_eq!(
            frontier.step(),
            self.generations.len(),
            "frontiers must be pushed in step order"
        );
        self.generations.push(frontier);
    }

    /// Number of frontiers held (steps built so far plus one).
    #[inline]
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    pub fn frontier(&self, step: usize) -> Option<&Frontier<N, S>> {
        self.generations.get(step)
    }

    /// The most recently built frontier.
    pub fn last(&self) -> &Frontier<N, S> {
        // never empty: constructed with frontier 0
        &self.generations[self.generations.len() - 1]
    }

    pub fn generations(&self) -> &[Frontier<N, S>] {
        &self.generations
    }

    /// Walk predecessor slots from `slot` in the last frontier back to the
    /// sentinel and return the nodes from step 0 forward.
    ///
    /// Returns `None` if a slot does not resolve, which only happens when
    /// frontiers were assembled by hand inconsistently.
    pub fn backtrack(&self, slot: usize) -> Option<Vec<N>> {
        let mut path = Vec::with_capacity(self.generations.len());
        let mut slot = slot;
        for frontier in self.generations.iter().rev() {
            let (node, arrival) = frontier.get_slot(slot)?;
            path.push(node.clone());
            match arrival.predecessor {
                Predecessor::Slot(prev) => slot = prev,
                Predecessor::Start => break,
            }
        }
        if path.len() != self.generations.len() {
            return None;
        }
        path.reverse();
        Some(path)
    }
}
