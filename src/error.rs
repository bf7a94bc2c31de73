//! Error types for the calculation core and the export layer

use thiserror::Error;

/// Errors raised by the development engine, capital aggregator and generators.
///
/// Every core operation is a deterministic function of its inputs, so none of
/// these are retryable: the caller decides whether to skip the record or abort.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A caller supplied an out-of-domain scalar.
    #[error("Invalid parameter {parameter} = {value}: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Value as supplied.
        value: f64,
        /// Constraint that was violated.
        reason: String,
    },

    /// A derived ratio would require division by zero.
    #[error("Domain error in {operation}: {reason}")]
    Domain {
        /// Operation that could not be completed.
        operation: &'static str,
        /// Description of the degenerate input.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid(parameter: &'static str, value: f64, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter,
            value,
            reason: reason.into(),
        }
    }

    /// Creates a domain error.
    #[must_use]
    pub fn domain(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Domain {
            operation,
            reason: reason.into(),
        }
    }

    /// Returns true if this is an invalid parameter error.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }

    /// Returns true if this is a domain error.
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain { .. })
    }
}

/// Result alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while assembling or writing regulatory template tables.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A template mapping names a field the record does not expose.
    #[error("Template {template} maps unknown source field '{field}'")]
    UnknownField {
        /// Template code, e.g. "QSR 002".
        template: &'static str,
        /// Source field name from the mapping.
        field: &'static str,
    },

    /// Template code could not be resolved.
    #[error("Unknown template code '{0}'")]
    UnknownTemplate(String),

    /// Record generation failed in the core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// CSV writer failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid("loss_ratio", -0.5, "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "Invalid parameter loss_ratio = -0.5: must be greater than zero"
        );
        assert!(err.is_invalid_parameter());
        assert!(!err.is_domain());

        let err = CoreError::domain("aggregate_mcr", "scr is zero");
        assert_eq!(err.to_string(), "Domain error in aggregate_mcr: scr is zero");
        assert!(err.is_domain());
    }

    #[test]
    fn test_export_error_wraps_core() {
        let err: ExportError = CoreError::domain("coverage_ratio", "scr is zero").into();
        assert!(matches!(err, ExportError::Core(CoreError::Domain { .. })));
    }
}
