//! Error types for schedule construction.

use thiserror::Error;

/// A specialized Result type for schedule operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Errors raised while turning upstream records into a debt schedule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// A cashflow refers to a bond that has no reference record.
    #[error("No reference data for cashflow ISIN {isin}")]
    UnknownIsin {
        /// ISIN carried by the cashflow.
        isin: String,
    },

    /// A cashflow date could not be parsed.
    #[error("Invalid cashflow date '{value}' for {isin}")]
    InvalidDate {
        /// ISIN carried by the cashflow.
        isin: String,
        /// The raw date value.
        value: String,
    },

    /// Real-value conversion overflowed the decimal range.
    #[error("Cashflow amount overflow for {isin}")]
    AmountOverflow {
        /// ISIN carried by the cashflow.
        isin: String,
    },

    /// Nothing left to aggregate after date and payment type filtering.
    #[error("No cashflows remain after filtering")]
    EmptySchedule,
}

impl ScheduleError {
    /// Create an unknown ISIN error.
    pub fn unknown_isin(isin: impl Into<String>) -> Self {
        Self::UnknownIsin { isin: isin.into() }
    }

    /// Create an invalid date error.
    pub fn invalid_date(isin: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidDate {
            isin: isin.into(),
            value: value.into(),
        }
    }
}
