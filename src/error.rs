//! Error types for configuration loading and validation.

use std::fmt;
use std::path::PathBuf;

/// Constraint a configuration value failed to satisfy
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// Document does not match the schema (missing field, wrong type, bad YAML)
    Schema(String),
    /// Value must be strictly greater than zero
    Positive,
    /// Value must be zero or greater
    NonNegative,
    /// Value must lie in the inclusive range
    Range { min: f64, max: f64 },
    /// Value must not exceed another field
    AtMost { limit_field: &'static str, limit: f64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(msg) => write!(f, "{}", msg),
            Self::Positive => write!(f, "must be greater than 0"),
            Self::NonNegative => write!(f, "must be non-negative"),
            Self::Range { min, max } => write!(f, "must be between {} and {}", min, max),
            Self::AtMost { limit_field, limit } => {
                write!(f, "cannot exceed {} ({})", limit_field, limit)
            }
        }
    }
}

/// A single rejected field, identified by its dotted path
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub violation: Violation,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, violation: Violation) -> Self {
        Self {
            field: field.into(),
            violation,
        }
    }

    /// Schema-level failure reported by the YAML decoder
    pub fn schema(message: impl Into<String>) -> Self {
        Self::new("<document>", Violation::Schema(message.into()))
    }

    /// Prefix the field path with the name of the enclosing record
    pub fn nested(mut self, parent: &str) -> Self {
        self.field = format!("{}.{}", parent, self.field);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.violation)
    }
}

impl std::error::Error for ValidationError {}

/// Errors that can occur while loading or saving a configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Requested file does not exist
    NotFound(PathBuf),
    Io(std::io::Error),
    Validation(ValidationError),
    Serialization(serde_yaml::Error),
}

impl ConfigError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The rejected field, if this is a validation failure
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Validation(e) => write!(f, "Invalid configuration: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Validation(e) => Some(e),
            Self::Serialization(e) => Some(e),
            Self::NotFound(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ValidationError> for ConfigError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_field_path() {
        let err = ValidationError::new("rain_duration", Violation::Positive).nested("climate");
        assert_eq!(err.field, "climate.rain_duration");
        assert_eq!(err.to_string(), "climate.rain_duration: must be greater than 0");
    }

    #[test]
    fn test_display_range() {
        let err = ConfigError::from(ValidationError::new(
            "grid_size",
            Violation::Range { min: 5.0, max: 100.0 },
        ));
        assert_eq!(
            err.to_string(),
            "Invalid configuration: grid_size: must be between 5 and 100"
        );
        assert!(!err.is_not_found());
        assert!(err.validation().is_some());
    }
}
