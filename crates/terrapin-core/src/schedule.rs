//! Debt payment schedule construction.
//!
//! Turns raw upstream cashflows into a per-year table:
//!
//! 1. [`compute_cashflows`] converts each percentage-of-par payment into
//!    billions of currency units and keeps payments after the cutoff date.
//! 2. [`filter_by_payment_type`] restricts to interest or principal.
//! 3. [`aggregate_by_year`] sums amounts per (year, type).
//! 4. [`pivot`] reshapes the sums into one [`ScheduleRow`] per year.
//!
//! [`build_schedule`] runs steps 2 to 4.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{ScheduleError, ScheduleResult};
use crate::ids::Isin;
use crate::records::{BondReference, CashflowRecord};

/// Cashflow type used for coupon payments.
pub const INTEREST: &str = "interest";

/// Cashflow type used for redemptions.
pub const PRINCIPAL: &str = "principal";

const PERCENT: Decimal = dec!(100);
const BILLION: Decimal = dec!(1_000_000_000);

// =============================================================================
// PAYMENT TYPE
// =============================================================================

/// Which cashflows to keep in the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentType {
    /// Coupon payments only
    Interest,
    /// Redemptions only
    Principal,
    /// Everything, unfiltered
    #[default]
    Total,
}

impl PaymentType {
    /// Returns true if a cashflow of the given type passes this filter.
    pub fn matches(&self, kind: &str) -> bool {
        match self {
            PaymentType::Interest => kind == INTEREST,
            PaymentType::Principal => kind == PRINCIPAL,
            PaymentType::Total => true,
        }
    }

    /// Query-string name of this filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Interest => INTEREST,
            PaymentType::Principal => PRINCIPAL,
            PaymentType::Total => "total",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a payment type name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPaymentType(pub String);

impl fmt::Display for UnknownPaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown payment type '{}'", self.0)
    }
}

impl std::error::Error for UnknownPaymentType {}

impl FromStr for PaymentType {
    type Err = UnknownPaymentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            INTEREST => Ok(PaymentType::Interest),
            PRINCIPAL => Ok(PaymentType::Principal),
            "total" => Ok(PaymentType::Total),
            other => Err(UnknownPaymentType(other.to_string())),
        }
    }
}

// =============================================================================
// REFERENCE BOOK
// =============================================================================

/// Reference records keyed by ISIN.
///
/// Keeps the order in which ISINs first appeared upstream. A later record for
/// the same ISIN replaces the earlier one.
#[derive(Debug, Clone, Default)]
pub struct ReferenceBook {
    order: Vec<Isin>,
    by_isin: HashMap<Isin, BondReference>,
}

impl ReferenceBook {
    /// Build a book from reference records.
    pub fn from_records(records: impl IntoIterator<Item = BondReference>) -> Self {
        let mut book = Self::default();
        for record in records {
            if !book.by_isin.contains_key(&record.isin) {
                book.order.push(record.isin.clone());
            }
            book.by_isin.insert(record.isin.clone(), record);
        }
        book
    }

    /// ISINs held by the book, in first-seen order.
    pub fn isins(&self) -> &[Isin] {
        &self.order
    }

    /// Look up a reference record.
    pub fn get(&self, isin: &Isin) -> Option<&BondReference> {
        self.by_isin.get(isin)
    }

    /// Number of bonds in the book.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the book is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// =============================================================================
// REAL-VALUE CASHFLOWS
// =============================================================================

/// A cashflow converted to real currency units.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledCashflow {
    /// ISIN of the paying bond
    pub isin: Isin,
    /// Payment date
    pub date: NaiveDate,
    /// Cashflow type
    pub kind: String,
    /// Amount in billions of currency units
    pub amount: Decimal,
}

/// Convert a percentage-of-par payment into billions of currency units.
///
/// `amount * issued_amount / 100 / 1e9`. Returns `None` on decimal overflow.
pub fn real_amount(amount: Decimal, issued_amount: Decimal) -> Option<Decimal> {
    amount
        .checked_mul(issued_amount)?
        .checked_div(PERCENT)?
        .checked_div(BILLION)
}

/// Parse an upstream cashflow date.
///
/// Accepts `YYYY-MM-DD`, optionally followed by a `T` or space separated time.
pub fn parse_cashflow_date(isin: &Isin, raw: &str) -> ScheduleResult<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(datetime.date());
        }
    }
    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(datetime.date_naive());
    }
    Err(ScheduleError::invalid_date(isin.as_str(), raw))
}

/// Convert raw cashflows to real values and keep those strictly after `cutoff`.
///
/// Every cashflow is converted before the date filter is applied, so a
/// cashflow for a bond missing from `book` fails the whole computation.
pub fn compute_cashflows(
    cashflows: &[CashflowRecord],
    book: &ReferenceBook,
    cutoff: NaiveDate,
) -> ScheduleResult<Vec<ScheduledCashflow>> {
    let mut scheduled = Vec::with_capacity(cashflows.len());

    for record in cashflows {
        let reference = book
            .get(&record.isin)
            .ok_or_else(|| ScheduleError::unknown_isin(record.isin.as_str()))?;

        let amount = real_amount(record.amount, reference.issued_amount).ok_or_else(|| {
            ScheduleError::AmountOverflow {
                isin: record.isin.to_string(),
            }
        })?;
        let date = parse_cashflow_date(&record.isin, &record.date)?;

        if date > cutoff {
            scheduled.push(ScheduledCashflow {
                isin: record.isin.clone(),
                date,
                kind: record.kind.clone(),
                amount,
            });
        }
    }

    Ok(scheduled)
}

/// Keep only cashflows matching the payment type.
pub fn filter_by_payment_type(
    cashflows: Vec<ScheduledCashflow>,
    payment_type: PaymentType,
) -> Vec<ScheduledCashflow> {
    match payment_type {
        PaymentType::Total => cashflows,
        _ => cashflows
            .into_iter()
            .filter(|c| payment_type.matches(&c.kind))
            .collect(),
    }
}

// =============================================================================
// AGGREGATION & PIVOT
// =============================================================================

/// Sum amounts per (calendar year, cashflow type).
pub fn aggregate_by_year(cashflows: &[ScheduledCashflow]) -> BTreeMap<(i32, String), Decimal> {
    let mut totals: BTreeMap<(i32, String), Decimal> = BTreeMap::new();
    for cashflow in cashflows {
        *totals
            .entry((cashflow.date.year(), cashflow.kind.clone()))
            .or_insert(Decimal::ZERO) += cashflow.amount;
    }
    totals
}

/// One year of the debt payment schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRow {
    /// Calendar year
    pub year: i32,
    /// Amount per cashflow type, in billions
    pub amounts: BTreeMap<String, Decimal>,
}

impl ScheduleRow {
    /// Amount for a cashflow type, if the column exists.
    pub fn amount(&self, kind: &str) -> Option<Decimal> {
        self.amounts.get(kind).copied()
    }

    /// Sum across all columns.
    pub fn total(&self) -> Decimal {
        self.amounts.values().copied().sum()
    }
}

/// Serialized as a flat record: `{"year": "2025", "interest": 0.5, ...}`.
impl Serialize for ScheduleRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.amounts.len() + 1))?;
        map.serialize_entry("year", &self.year.to_string())?;
        for (kind, amount) in &self.amounts {
            map.serialize_entry(kind, &amount.normalize())?;
        }
        map.end()
    }
}

/// Reshape yearly totals into rows, one per year in ascending order.
///
/// Every row carries a column for every type present anywhere in `totals`;
/// missing combinations are zero.
pub fn pivot(totals: &BTreeMap<(i32, String), Decimal>) -> ScheduleResult<Vec<ScheduleRow>> {
    if totals.is_empty() {
        return Err(ScheduleError::EmptySchedule);
    }

    let columns: BTreeSet<&str> = totals.keys().map(|(_, kind)| kind.as_str()).collect();

    let mut rows: Vec<ScheduleRow> = Vec::new();
    for ((year, kind), amount) in totals {
        if rows.last().map(|r| r.year) != Some(*year) {
            rows.push(ScheduleRow {
                year: *year,
                amounts: columns
                    .iter()
                    .map(|c| (c.to_string(), Decimal::ZERO))
                    .collect(),
            });
        }
        if let Some(row) = rows.last_mut() {
            row.amounts.insert(kind.clone(), *amount);
        }
    }

    Ok(rows)
}

/// Filter, aggregate and pivot real-value cashflows.
pub fn build_schedule(
    cashflows: Vec<ScheduledCashflow>,
    payment_type: PaymentType,
) -> ScheduleResult<Vec<ScheduleRow>> {
    let filtered = filter_by_payment_type(cashflows, payment_type);
    pivot(&aggregate_by_year(&filtered))
}
