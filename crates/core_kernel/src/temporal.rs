//! Cover period handling
//!
//! A cover is in force from its start time (inclusive) until its expiry
//! (exclusive). Periods are immutable once issued; a migrated cover must carry
//! the exact period of the record it replaces.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must be before expiry {expiry}")]
    InvalidPeriod {
        start: String,
        expiry: String,
    },

    #[error("Period of {days} days from {start} is out of range")]
    OutOfRange { start: String, days: u32 },
}

/// The window during which a cover is in force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoverPeriod {
    /// Start of cover (inclusive)
    start: DateTime<Utc>,
    /// Expiry of cover (exclusive)
    expiry: DateTime<Utc>,
}

impl CoverPeriod {
    /// Creates a new cover period
    pub fn new(start: DateTime<Utc>, expiry: DateTime<Utc>) -> Result<Self, TemporalError> {
        if start >= expiry {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                expiry: expiry.to_string(),
            });
        }
        Ok(Self { start, expiry })
    }

    /// Creates a period of the given number of days starting at `start`
    pub fn days_from(start: DateTime<Utc>, days: u32) -> Result<Self, TemporalError> {
        let expiry = start
            .checked_add_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| TemporalError::OutOfRange {
                start: start.to_string(),
                days,
            })?;
        Self::new(start, expiry)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }

    /// Returns true if cover is in force at the given timestamp
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp < self.expiry
    }

    /// Returns true if the cover has expired at the given timestamp
    pub fn is_expired_at(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.expiry
    }

    /// Length of the cover period
    pub fn duration(&self) -> Duration {
        self.expiry - self.start
    }
}
