//! Sequence-constrained path decoding (trellis DP)
//!
//! Given a directed graph whose transitions carry labels, a start node and a
//! target symbol sequence, this crate answers two questions:
//!
//! 1. Is there a path from the start whose edge labels spell the sequence?
//!    ([`find_path`])
//! 2. Among those paths, which one maximizes the product of transition
//!    probabilities? ([`find_best_path`])
//!
//! ## Core idea
//! 1. Model the search as a *layered* DP: frontier `i` holds every node
//!    reachable after consuming `i` symbols, plus a back pointer.
//! 2. Implement the [`TrellisProblem`] trait to choose what each frontier
//!    entry carries and which arrival wins when a node is reached twice.
//! 3. Let [`TrellisEngine`] build the frontiers and walk back from the chosen
//!    terminal node to recover an explicit path.
//!
//! Probabilities are accumulated as natural logarithms, so long sequences do
//! not underflow mid-computation. All tie-breaks are first-seen-wins over
//! insertion order, which makes every decode deterministic.
//!
//! ## Quick start
//! ```
//! use trellis_dp::{find_best_path, find_path, WeightedGraph};
//!
//! let mut graph = WeightedGraph::new();
//! graph.add_weighted_edge("A", "B", 'a', 0.5);
//! graph.add_weighted_edge("A", "C", 'b', 0.5);
//! graph.add_weighted_edge("B", "D", 'b', 0.6);
//! graph.add_weighted_edge("C", "D", 'a', 0.9);
//!
//! let path = find_path(&graph, &"A", &['a', 'b']).unwrap();
//! assert_eq!(path, Some(vec!["A", "B", "D"]));
//!
//! let best = find_best_path(&graph, &"A", &['a', 'b']).unwrap().unwrap();
//! assert!((best.probability - 0.3).abs() < 1e-12);
//! ```
//!
//! ## Cargo features
//! - `parallel`: evaluate the source nodes of a step on the rayon pool.
//!   Results are identical to the serial engine.
//! - `tracing`: emit spans and events through the `tracing` crate.

pub mod builder;
pub mod engine;
pub mod error;
pub mod frontier;
pub mod graph;
pub mod problems;
pub mod traits;
pub mod utils;

pub use crate::builder::{DecodeLimits, TrellisEngineBuilder};
pub use crate::engine::{Decoded, TrellisEngine};
pub use crate::error::DecodeError;
pub use crate::graph::{LabeledGraph, Transition, WeightedGraph};
pub use crate::problems::max_likelihood::{find_best_path, BestPath};
pub use crate::problems::reachability::find_path;
pub use crate::traits::TrellisProblem;
