//! Decoder implementations for the trellis engine.
//!
//! These modules show how to implement [`TrellisProblem`](crate::traits::TrellisProblem)
//! for concrete update policies:
//! - [`reachability`]   : any label-matching path, first-seen predecessor wins.
//! - [`max_likelihood`] : most probable label-matching path, best log-probability wins.

pub mod max_likelihood;
pub mod reachability;
