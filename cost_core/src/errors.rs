//! # Error Types
//!
//! Structured error types for cost_core. Every failure the engine can
//! produce is a typed, recoverable value: the host decides whether to
//! re-prompt, retry with different selections, or give up. Nothing here
//! aborts the process.
//!
//! ## Example
//!
//! ```rust
//! use cost_core::errors::{EstimateError, EstimateResult};
//!
//! fn check_bounds(value: f64, lower: f64, upper: f64) -> EstimateResult<()> {
//!     if value < lower || value > upper {
//!         return Err(EstimateError::OutOfRange { value, lower, upper });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for cost_core operations
pub type EstimateResult<T> = Result<T, EstimateError>;

/// Which local rule a request field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldErrorKind {
    /// The field is empty or absent
    Missing,
    /// The field is present but fails a shape rule
    Invalid,
}

/// One request field that is missing or fails a local shape rule.
///
/// Field errors are accumulated in batch by
/// [`validate_request`](crate::estimate::validate_request) so the host can
/// report every problem in one pass instead of one at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending request field (e.g. "plant_type")
    pub field: String,
    /// Missing vs. invalid, so hosts can phrase the two differently
    pub kind: FieldErrorKind,
    /// Stable human-readable rule text (e.g. "must be selected")
    pub message: String,
}

impl FieldError {
    /// Create a Missing field error
    pub fn missing(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            kind: FieldErrorKind::Missing,
            message: message.into(),
        }
    }

    /// Create an Invalid field error
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            kind: FieldErrorKind::Invalid,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Structured error type for catalog and estimation operations.
///
/// Each variant carries enough context for the host to surface the failure
/// at the right place (which filter stage, which bounds, which operands).
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum EstimateError {
    /// An input value is invalid (out of range, wrong shape, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field or criterion is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A request failed shape validation; carries the full batch of
    /// field errors, not just the first
    #[error("Request failed validation with {} field error(s)", .errors.len())]
    InvalidRequest { errors: Vec<FieldError> },

    /// The catalog data is missing one or more required key columns
    #[error("Catalog is missing required columns: {}", .missing_columns.join(", "))]
    Schema { missing_columns: Vec<String> },

    /// A hierarchical filter stage matched no rows; names the stage and
    /// criterion so the host can re-prompt at the right selection level
    #[error("No catalog rows match {stage} '{value}'")]
    EmptyResult { stage: String, value: String },

    /// A fully-specified point lookup matched no record
    #[error("No catalog record for method '{method}', plant type '{plant_type}', equipment '{equipment}', equipment type '{equipment_type}'")]
    NotFound {
        method: String,
        plant_type: String,
        equipment: String,
        equipment_type: String,
    },

    /// Sizing value outside the correlation's declared valid range
    #[error("Sizing value {value} is outside the valid range {lower} to {upper}")]
    OutOfRange { value: f64, lower: f64, upper: f64 },

    /// The power-law evaluation produced a non-finite number
    #[error("Cost correlation is undefined for base {base} and exponent {exponent}")]
    Computation { base: f64, exponent: f64 },

    /// File I/O error while loading catalog data
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },
}

impl EstimateError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EstimateError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        EstimateError::MissingField {
            field: field.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EstimateError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EstimateError::InvalidInput { .. } => "INVALID_INPUT",
            EstimateError::MissingField { .. } => "MISSING_FIELD",
            EstimateError::InvalidRequest { .. } => "INVALID_REQUEST",
            EstimateError::Schema { .. } => "SCHEMA_ERROR",
            EstimateError::EmptyResult { .. } => "EMPTY_RESULT",
            EstimateError::NotFound { .. } => "NOT_FOUND",
            EstimateError::OutOfRange { .. } => "OUT_OF_RANGE",
            EstimateError::Computation { .. } => "COMPUTATION_ERROR",
            EstimateError::FileError { .. } => "FILE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = EstimateError::OutOfRange {
            value: 500.0,
            lower: 0.2,
            upper: 126.0,
        };
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: EstimateError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            EstimateError::missing_field("method").error_code(),
            "MISSING_FIELD"
        );
        assert_eq!(
            EstimateError::Schema {
                missing_columns: vec!["equipment_type".to_string()]
            }
            .error_code(),
            "SCHEMA_ERROR"
        );
    }

    #[test]
    fn test_invalid_request_carries_every_field_error() {
        let error = EstimateError::InvalidRequest {
            errors: vec![
                FieldError::missing("method", "must be selected"),
                FieldError::invalid("sizing_value", "must be a positive number"),
            ],
        };
        assert_eq!(error.to_string(), "Request failed validation with 2 field error(s)");
        assert_eq!(
            FieldError::missing("method", "must be selected").to_string(),
            "method: must be selected"
        );
    }
}
