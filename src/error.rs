//! Error type shared by every decoder.
//!
//! A missing path is not an error: decoders report it as `Ok(None)`.

use thiserror::Error;

/// Caller-input errors raised while setting up or running a decode.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The start node is not a key of the graph.
    #[error("start node is not present in the graph")]
    InvalidStart,
    /// A label-matching transition carries a probability outside `(0, 1]`.
    #[error("transition evaluated at step {step} has invalid probability {probability}")]
    InvalidProbability { step: usize, probability: f64 },
    /// The sequence needs more steps than the configured limit allows.
    #[error("sequence of length {len} exceeds the step limit of {limit}")]
    SequenceTooLong { len: usize, limit: usize },
    /// A frontier grew past the configured width limit.
    #[error("frontier at step {step} holds {width} nodes, above the limit of {limit}")]
    FrontierTooWide {
        step: usize,
        width: usize,
        limit: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::DecodeError;

    #[test]
    fn messages_name_the_offending_values() {
        let err = DecodeError::InvalidProbability {
            step: 3,
            probability: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "transition evaluated at step 3 has invalid probability 0"
        );

        let err = DecodeError::FrontierTooWide {
            step: 1,
            width: 9,
            limit: 4,
        };
        assert!(err.to_string().contains("step 1"));
        assert!(err.to_string().contains("limit of 4"));
    }
}
