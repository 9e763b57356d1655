//! Kernel error shared by the domain crates

use std::fmt::Display;

use thiserror::Error;

use crate::money::MoneyError;
use crate::temporal::TemporalError;

/// Errors raised while building or combining kernel values
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error(transparent)]
    Temporal(#[from] TemporalError),

    /// A well-formed value the domain still refuses, e.g. a zero sum insured
    #[error("{subject}: {reason}")]
    OutOfRange { subject: String, reason: String },
}

impl CoreError {
    pub fn out_of_range(subject: impl Display, reason: impl Into<String>) -> Self {
        CoreError::OutOfRange {
            subject: subject.to_string(),
            reason: reason.into(),
        }
    }
}
