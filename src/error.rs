//! Loading and lookup errors.
//!
//! The per-tick simulation never fails: invalid calls are no-ops and broken
//! invariants panic. Only template/settings loading and name lookups return
//! [`SimResult`].

use std::fmt;

/// Top-level error enum for the simulation core.
#[derive(Debug)]
pub enum SimError {
    /// Template or settings JSON could not be parsed.
    Parse {
        /// What was being parsed ("templates", "settings").
        what: &'static str,
        /// Parser message.
        message: String,
    },

    /// A template was looked up by a name the registry does not hold.
    UnknownTemplate {
        /// Template table ("unit", "weapon", ...).
        kind: &'static str,
        name: String,
    },

    /// A template holds a value the simulation cannot run with.
    InvalidTemplate {
        kind: &'static str,
        name: String,
        reason: String,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Parse { what, message } => {
                write!(f, "failed to parse {}: {}", what, message)
            }
            SimError::UnknownTemplate { kind, name } => {
                write!(f, "unknown {} template '{}'", kind, name)
            }
            SimError::InvalidTemplate { kind, name, reason } => {
                write!(f, "invalid {} template '{}': {}", kind, name, reason)
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

/// Returns an error unless `value` is strictly positive.
pub(crate) fn require_positive(
    kind: &'static str,
    name: &str,
    field: &str,
    value: f32,
) -> SimResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidTemplate {
            kind,
            name: name.to_string(),
            reason: format!("{} must be > 0 (got {})", field, value),
        })
    }
}

/// Returns an error unless `value` is zero or positive.
pub(crate) fn require_non_negative(
    kind: &'static str,
    name: &str,
    field: &str,
    value: f32,
) -> SimResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidTemplate {
            kind,
            name: name.to_string(),
            reason: format!("{} must be >= 0 (got {})", field, value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SimError::UnknownTemplate {
            kind: "unit",
            name: "yeti".to_string(),
        };
        assert_eq!(err.to_string(), "unknown unit template 'yeti'");

        let err = require_positive("unit", "yeti", "mass", 0.0).unwrap_err();
        assert!(err.to_string().contains("mass must be > 0"));
    }

    #[test]
    fn test_require_non_negative() {
        assert!(require_non_negative("wave", "w", "start_time", 0.0).is_ok());
        assert!(require_non_negative("wave", "w", "start_time", -1.0).is_err());
        assert!(require_non_negative("wave", "w", "start_time", f32::NAN).is_err());
    }
}
