//! Assorted numeric helpers for log-domain accumulation.

use crate::error::DecodeError;

/// Returns true if `p` is a usable transition probability, i.e. finite and in `(0, 1]`.
///
/// NaN fails every comparison and is therefore rejected as well.
#[inline]
pub fn is_valid_probability(p: f64) -> bool {
    p > 0.0 && p <= 1.0
}

/// Natural logarithm of a transition probability evaluated at `step`.
///
/// The probability is checked before `ln` is taken, so zero or negative
/// weights never turn into `-inf`/NaN scores.
#[inline]
pub fn checked_ln(p: f64, step: usize) -> Result<f64, DecodeError> {
    if is_valid_probability(p) {
        Ok(p.ln())
    } else {
        Err(DecodeError::InvalidProbability {
            step,
            probability: p,
        })
    }
}
