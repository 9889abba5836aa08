//! Error types for optimizar.
//!
//! All fallible operations return `Result<T, BoError>` instead of panicking.
//!
//! # Design
//!
//! Following the Jidoka principle, errors are:
//! 1. Immediately detectable (type-safe)
//! 2. Self-documenting (descriptive variants)
//! 3. Actionable (carry the offending values)
//!
//! Budget exhaustion and empty candidate proposals are *not* errors — they
//! are normal terminal outcomes of the run state machine and are signaled
//! through [`crate::engine::runner::StepOutcome`].

use thiserror::Error;

/// Result type alias for optimizar operations.
pub type BoResult<T> = Result<T, BoError>;

/// Unified error type for all optimizar operations.
#[derive(Debug, Error)]
pub enum BoError {
    // ===== Validation Errors =====
    /// Malformed search space or out-of-bounds point.
    ///
    /// Rejected before use, never silently clamped by the engine (a plugin
    /// may choose to clamp internally).
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the violated constraint.
        message: String,
    },

    // ===== Numerical Errors =====
    /// Covariance factorization failed after jitter was applied.
    ///
    /// Jitter is the proactive mitigation; this variant only surfaces when
    /// the matrix is irrecoverably singular.
    #[error("Numeric instability: {message}")]
    NumericInstability {
        /// Description of the failure.
        message: String,
    },

    // ===== Plugin Errors =====
    /// A strategy returned malformed shapes (wrong candidate dimensionality,
    /// mismatched score counts, missing manifest fields).
    #[error("Plugin contract violation in '{plugin}': {message}")]
    PluginContract {
        /// Name of the offending plugin.
        plugin: String,
        /// Description of the violation.
        message: String,
    },

    /// Oracle evaluation failure, propagated unchanged to the caller.
    ///
    /// The engine never retries evaluations: expensive black-box oracles
    /// must not be re-invoked without caller consent.
    #[error("Oracle error: {message}")]
    Oracle {
        /// Description of the evaluation failure.
        message: String,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Schema validation error.
    #[error("Validation error: {0}")]
    ConfigValidation(#[from] validator::ValidationErrors),

    // ===== I/O / Trace Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Exported run trace failed its integrity check.
    #[error("Trace integrity violation: hash mismatch")]
    TraceIntegrity,
}

impl BoError {
    /// Create a validation error with a message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a numeric instability error.
    #[must_use]
    pub fn numeric(message: impl Into<String>) -> Self {
        Self::NumericInstability {
            message: message.into(),
        }
    }

    /// Create a plugin contract violation.
    #[must_use]
    pub fn plugin_contract(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PluginContract {
            plugin: plugin.into(),
            message: message.into(),
        }
    }

    /// Create an oracle evaluation error.
    #[must_use]
    pub fn oracle(message: impl Into<String>) -> Self {
        Self::Oracle {
            message: message.into(),
        }
    }

    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Check if this error indicates a fault in a plugged-in strategy
    /// rather than in the engine or its inputs.
    #[must_use]
    pub const fn is_plugin_fault(&self) -> bool {
        matches!(self, Self::PluginContract { .. } | Self::Oracle { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_fault_detection() {
        let contract = BoError::plugin_contract("multi-start", "candidate has 3 dims, expected 2");
        assert!(contract.is_plugin_fault());

        let oracle = BoError::oracle("remote evaluation timed out");
        assert!(oracle.is_plugin_fault());

        let validation = BoError::validation("empty domain");
        assert!(!validation.is_plugin_fault());

        let numeric = BoError::numeric("non-positive pivot");
        assert!(!numeric.is_plugin_fault());
    }

    #[test]
    fn test_error_validation_display() {
        let err = BoError::validation("value 11 out of bounds [-5, 10] for dimension 0");
        let msg = err.to_string();
        assert!(msg.contains("Validation error"));
        assert!(msg.contains("out of bounds"));
    }

    #[test]
    fn test_error_numeric_display() {
        let err = BoError::numeric("covariance not positive definite at pivot 3");
        let msg = err.to_string();
        assert!(msg.contains("Numeric instability"));
        assert!(msg.contains("pivot 3"));
    }

    #[test]
    fn test_error_plugin_contract_display() {
        let err = BoError::plugin_contract("rbf", "covariance matrix is 2x3, expected 2x2");
        let msg = err.to_string();
        assert!(msg.contains("Plugin contract violation"));
        assert!(msg.contains("'rbf'"));
    }

    #[test]
    fn test_error_oracle_display() {
        let err = BoError::oracle("objective returned NaN");
        let msg = err.to_string();
        assert!(msg.contains("Oracle error"));
        assert!(msg.contains("NaN"));
    }

    #[test]
    fn test_error_config() {
        let err = BoError::config("budget must cover the initial design");
        assert!(!err.is_plugin_fault());
        let msg = err.to_string();
        assert!(msg.contains("Configuration error"));
    }

    #[test]
    fn test_error_serialization() {
        let err = BoError::serialization("failed to encode trace");
        let msg = err.to_string();
        assert!(msg.contains("Serialization error"));
        assert!(msg.contains("failed to encode trace"));
    }

    #[test]
    fn test_error_trace_integrity() {
        let err = BoError::TraceIntegrity;
        let msg = err.to_string();
        assert!(msg.contains("hash mismatch"));
    }

    #[test]
    fn test_error_debug() {
        let err = BoError::config("test");
        let debug = format!("{err:?}");
        assert!(debug.contains("Config"));
    }
}
