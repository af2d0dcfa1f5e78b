// src/error.rs
use std::fmt;

/// Custom error types for the lorenz-chaos library
///
/// Numerical blow-up is never reported here: a trajectory that overflows is a
/// legitimate outcome of a chaotic system and is returned as-is.
#[derive(Debug, Clone)]
pub enum ChaosError {
    /// Invalid parameter values
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid configuration
    InvalidConfiguration { field: String, reason: String },

    /// State vector length does not match the model dimension
    DimensionMismatch { expected: usize, actual: usize },

    /// Slider or setting name that the parameter surface does not know
    UnknownParameter { name: String, available: Vec<String> },

    /// Settings file or environment could not be loaded
    Settings { reason: String },

    /// Rendering sink failed to write its output
    Io { reason: String },
}

impl fmt::Display for ChaosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChaosError::InvalidParameters {
                parameter,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid parameter '{}' = {}: {}",
                    parameter, value, constraint
                )
            }
            ChaosError::InvalidConfiguration { field, reason } => {
                write!(f, "Invalid configuration for '{}': {}", field, reason)
            }
            ChaosError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "State dimension mismatch: expected {} components, got {}",
                    expected, actual
                )
            }
            ChaosError::UnknownParameter { name, available } => {
                write!(
                    f,
                    "Unknown parameter '{}' (available: {})",
                    name,
                    available.join(", ")
                )
            }
            ChaosError::Settings { reason } => {
                write!(f, "Failed to load settings: {}", reason)
            }
            ChaosError::Io { reason } => write!(f, "I/O error: {}", reason),
        }
    }
}

impl std::error::Error for ChaosError {}

impl From<std::io::Error> for ChaosError {
    fn from(err: std::io::Error) -> Self {
        ChaosError::Io {
            reason: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for ChaosError {
    fn from(err: config::ConfigError) -> Self {
        ChaosError::Settings {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for lorenz-chaos operations
pub type ChaosResult<T> = Result<T, ChaosError>;

/// Validation utilities
pub mod validation {
    use super::{ChaosError, ChaosResult};

    /// Largest number of samples a single time grid may hold
    pub const MAX_GRID_SAMPLES: usize = 10_000_000;

    /// Largest ensemble the driver accepts
    pub const MAX_ENSEMBLE_SIZE: usize = 100_000;

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> ChaosResult<()> {
        if !(value > 0.0) {
            Err(ChaosError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> ChaosResult<()> {
        if !(value >= 0.0) {
            Err(ChaosError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is within a range
    pub fn validate_range(name: &str, value: f64, min: f64, max: f64) -> ChaosResult<()> {
        if !(value >= min && value <= max) {
            Err(ChaosError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: format!("must be in range [{}, {}]", min, max),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> ChaosResult<()> {
        if !value.is_finite() {
            Err(ChaosError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate ensemble size
    pub fn validate_ensemble_size(members: usize) -> ChaosResult<()> {
        if members == 0 {
            Err(ChaosError::InvalidConfiguration {
                field: "ensemble_size".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if members > MAX_ENSEMBLE_SIZE {
            Err(ChaosError::InvalidConfiguration {
                field: "ensemble_size".to_string(),
                reason: format!("exceeds maximum allowed ({})", MAX_ENSEMBLE_SIZE),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a state has the expected number of components
    pub fn validate_dimension(expected: usize, actual: usize) -> ChaosResult<()> {
        if expected != actual {
            Err(ChaosError::DimensionMismatch { expected, actual })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("samples_per_unit_time", 100.0).is_ok());
        assert!(validate_positive("samples_per_unit_time", 0.0).is_err());
        assert!(validate_positive("samples_per_unit_time", -1.0).is_err());
        assert!(validate_positive("samples_per_unit_time", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("t_end", 0.0).is_ok());
        assert!(validate_non_negative("t_end", 12.5).is_ok());
        assert!(validate_non_negative("t_end", -0.1).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite("sigma", 10.0).is_ok());
        assert!(validate_finite("sigma", f64::NAN).is_err());
        assert!(validate_finite("sigma", f64::INFINITY).is_err());
        assert!(validate_finite("sigma", f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_validate_ensemble_size() {
        assert!(validate_ensemble_size(1).is_ok());
        assert!(validate_ensemble_size(0).is_err());
        assert!(validate_ensemble_size(MAX_ENSEMBLE_SIZE + 1).is_err());
    }

    #[test]
    fn test_error_display() {
        let error = ChaosError::InvalidParameters {
            parameter: "forcing".to_string(),
            value: f64::NAN,
            constraint: "must be finite".to_string(),
        };

        let display = format!("{}", error);
        assert!(display.contains("forcing"));
        assert!(display.contains("NaN"));
        assert!(display.contains("finite"));
    }

    #[test]
    fn test_unknown_parameter_lists_alternatives() {
        let error = ChaosError::UnknownParameter {
            name: "gamma".to_string(),
            available: vec!["sigma".to_string(), "beta".to_string()],
        };

        let display = format!("{}", error);
        assert!(display.contains("gamma"));
        assert!(display.contains("sigma, beta"));
    }
}
