use crate::error::DecodeError;
use crate::traits::TrellisProblem;
use crate::TrellisEngine;

/// Optional resource bounds applied around a decode.
///
/// `None` means unbounded. Limits never change a successful result; they
/// only turn an oversized decode into an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Longest accepted target sequence.
    pub max_steps: Option<usize>,
    /// Largest accepted frontier at any step.
    pub max_frontier_width: Option<usize>,
}

impl DecodeLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub(crate) fn check_steps(&self, len: usize) -> Result<(), DecodeError> {
        match self.max_steps {
            Some(limit) if len > limit => {
                #[cfg(feature = "tracing")]
                tracing::debug!(len, limit, "sequence rejected by step limit");
                Err(DecodeError::SequenceTooLong { len, limit })
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn check_width(&self, step: usize, width: usize) -> Result<(), DecodeError> {
        match self.max_frontier_width {
            Some(limit) if width > limit => {
                #[cfg(feature = "tracing")]
                tracing::debug!(step, width, limit, "frontier rejected by width limit");
                Err(DecodeError::FrontierTooWide { step, width, limit })
            }
            _ => Ok(()),
        }
    }
}

pub struct TrellisEngineBuilder<P: TrellisProblem> {
    problem: P,
    limits: DecodeLimits,
}

impl<P: TrellisProblem> TrellisEngineBuilder<P> {
    pub fn new(problem: P) -> Self {
        Self {
            problem,
            limits: DecodeLimits::default(),
        }
    }
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.limits.max_steps = Some(max_steps);
        self
    }
    pub fn with_max_frontier_width(mut self, width: usize) -> Self {
        self.limits.max_frontier_width = Some(width);
        self
    }
    pub fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }
    pub fn build(self) -> TrellisEngine<P> {
        TrellisEngine::with_limits(self.problem, self.limits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_accepts_anything() {
        let limits = DecodeLimits::unlimited();
        assert!(limits.check_steps(usize::MAX).is_ok());
        assert!(limits.check_width(3, usize::MAX).is_ok());
    }

    #[test]
    fn limits_are_inclusive() {
        let limits = DecodeLimits {
            max_steps: Some(4),
            max_frontier_width: Some(2),
        };
        assert!(limits.check_steps(4).is_ok());
        assert_eq!(
            limits.check_steps(5),
            Err(DecodeError::SequenceTooLong { len: 5, limit: 4 })
        );
        assert!(limits.check_width(1, 2).is_ok());
        assert_eq!(
            limits.check_width(1, 3),
            Err(DecodeError::FrontierTooWide {
                step: 1,
                width: 3,
                limit: 2
            })
        );
    }
}
