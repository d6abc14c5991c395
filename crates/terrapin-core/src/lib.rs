//! # Terrapin Core
//!
//! Core types and schedule aggregation for the Terrapin debt payment schedule API.
//!
//! This crate is pure and synchronous. It knows nothing about HTTP; the data
//! sources live behind the traits in `terrapin-traits`.
//!
//! ## Module Structure
//!
//! - [`ids`]: Identifier newtypes (ISIN, LEI)
//! - [`records`]: Upstream bond search, reference and cashflow records
//! - [`schedule`]: Real-value cashflows, payment type filtering, yearly pivot
//! - [`error`]: Schedule error type
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use terrapin_core::prelude::*;
//!
//! let book = ReferenceBook::from_records(vec![BondReference::new("GB00X", dec!(1_000_000_000))]);
//! let cashflows = vec![CashflowRecord::new("GB00X", dec!(50), "2025-03-01", "interest")];
//! let cutoff = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
//!
//! let scheduled = compute_cashflows(&cashflows, &book, cutoff).unwrap();
//! let rows = build_schedule(scheduled, PaymentType::Total).unwrap();
//!
//! assert_eq!(rows[0].year, 2025);
//! assert_eq!(rows[0].amount("interest"), Some(dec!(0.5)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod ids;
pub mod records;
pub mod schedule;

pub use error::{ScheduleError, ScheduleResult};
pub use ids::{Isin, Lei};

/// Commonly used types.
pub mod prelude {
    pub use crate::error::{ScheduleError, ScheduleResult};
    pub use crate::ids::{Isin, Lei};
    pub use crate::records::{BondReference, BondSummary, CashflowRecord};
    pub use crate::schedule::{
        aggregate_by_year, build_schedule, compute_cashflows, filter_by_payment_type,
        parse_cashflow_date, pivot, real_amount, PaymentType, ReferenceBook, ScheduleRow,
        ScheduledCashflow,
    };
}
