use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WagerError {
    /// Odds outside the American price domain (|odds| < 100, or a decimal <= 1.0)
    #[error("odds {value} are outside the American price domain")]
    InvalidOdds { value: f64 },

    #[error("stake {value} must be positive")]
    InvalidStake { value: f64 },

    #[error("no legs supplied")]
    EmptyLegSet,

    /// Recoverable input-quality failure, carried as data
    #[error("{0}")]
    ValidationFailed(ValidationFailure),
}

impl WagerError {
    /// Programmer-error class failures. Trusted callers may treat these as
    /// unreachable; batch callers report and skip the offending record.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, WagerError::ValidationFailed(_))
    }
}

/// A single field-level reason a record was rejected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Field path, e.g. "stake" or "legs[1].line"
    pub field: String,
    pub reason: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Every violated field of one record, so callers can surface all problems at once
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub violations: Vec<Violation>,
}

impl ValidationFailure {
    pub fn single(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            violations: vec![Violation::new(field, reason)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn push(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.violations.push(Violation::new(field, reason));
    }

    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed:")?;
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, ";")?;
            }
            write!(f, " {}: {}", v.field, v.reason)?;
        }
        Ok(())
    }
}
