//! Simulation error type.

use std::fmt;

use crate::validation::ValidationError;

/// Errors returned by a simulation run.
///
/// A run either returns a complete, invariant-satisfying result or one of
/// these; partial timelines are never exposed.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Input rejected before simulation began. Carries every violation found.
    InvalidInput(Vec<ValidationError>),
    /// The engine could not produce a valid timeline.
    ///
    /// Unreachable for validated input.
    Unschedulable(String),
    /// The run covered zero time, so rates are undefined.
    ///
    /// Unreachable for validated input.
    DegenerateRun,
}

impl SimulationError {
    /// Validation errors, if this is an input error.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            SimulationError::InvalidInput(errors) => errors,
            _ => &[],
        }
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidInput(errors) => {
                write!(f, "Invalid input")?;
                for (i, e) in errors.iter().enumerate() {
                    let sep = if i == 0 { ": " } else { "; " };
                    write!(f, "{sep}{}", e.message)?;
                }
                Ok(())
            }
            SimulationError::Unschedulable(reason) => write!(f, "Unschedulable: {reason}"),
            SimulationError::DegenerateRun => write!(f, "Degenerate run: total time is zero"),
        }
    }
}

impl std::error::Error for SimulationError {}

impl From<Vec<ValidationError>> for SimulationError {
    fn from(errors: Vec<ValidationError>) -> Self {
        SimulationError::InvalidInput(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_display_lists_all_violations() {
        let err = SimulationError::InvalidInput(vec![
            ValidationError::new(ValidationErrorKind::NegativeArrival, "arrival", "P1 arrives at -1"),
            ValidationError::new(ValidationErrorKind::NonPositiveBurst, "burst", "P2 has burst 0"),
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid input: P1 arrives at -1; P2 has burst 0"
        );
        assert_eq!(err.validation_errors().len(), 2);
    }

    #[test]
    fn test_display_defensive_variants() {
        assert_eq!(
            SimulationError::DegenerateRun.to_string(),
            "Degenerate run: total time is zero"
        );
        let err = SimulationError::Unschedulable("no processes".into());
        assert_eq!(err.to_string(), "Unschedulable: no processes");
        assert!(err.validation_errors().is_empty());
    }
}
