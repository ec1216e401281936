//! Error types for topology synthesis.
//!
//! Every failure inside the synthesizer is fatal: the run is aborted and no
//! partial graph is handed back to the caller.

use thiserror::Error;

/// Errors that can occur while synthesizing a network topology
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// A required configuration key is missing or its value is malformed
    #[error("Invalid configuration at '{key_path}': {reason}")]
    Configuration { key_path: String, reason: String },

    /// Two entities would receive the same logical name
    #[error("Logical name '{name}' is already taken in this stack")]
    Conflict { name: String },

    /// Two subnets claim the same address block
    #[error("Subnet '{name}' reuses CIDR block {cidr} already assigned to '{existing}'")]
    CidrConflict {
        name: String,
        cidr: String,
        existing: String,
    },

    /// An entity references something that does not exist (yet) in the graph
    #[error("Resource '{resource}' depends on '{missing}', which does not exist in the graph")]
    Dependency { resource: String, missing: String },
}

impl SynthesisError {
    /// Shorthand for a configuration error at a key path
    pub fn configuration(key_path: impl Into<String>, reason: impl Into<String>) -> Self {
        SynthesisError::Configuration {
            key_path: key_path.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a missing required key
    pub fn missing_key(key_path: impl Into<String>) -> Self {
        Self::configuration(key_path, "required key is missing")
    }
}

/// Result type for synthesis operations
pub type SynthesisResult<T> = Result<T, SynthesisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_reports_key_path() {
        let err = SynthesisError::missing_key("resources.vpc.cidr");
        assert_eq!(
            err.to_string(),
            "Invalid configuration at 'resources.vpc.cidr': required key is missing"
        );
    }

    #[test]
    fn test_dependency_error_message() {
        let err = SynthesisError::Dependency {
            resource: "PrivateNATGateway".to_string(),
            missing: "PublicA".to_string(),
        };
        assert!(err.to_string().contains("PrivateNATGateway"));
        assert!(err.to_string().contains("PublicA"));
    }
}
