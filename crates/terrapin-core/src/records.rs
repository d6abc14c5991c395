//! Upstream bond records.
//!
//! These mirror the payloads returned by the bond search, bond reference and
//! bond cashflows calls. Only the fields the schedule needs are typed; the
//! rest of each payload is kept as an opaque JSON map so nothing is lost when
//! records are passed through or re-serialized.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::Isin;

/// A bond returned by the search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondSummary {
    /// ISIN
    pub isin: Isin,
    /// Remaining upstream fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BondSummary {
    /// Create a summary carrying only an ISIN.
    pub fn new(isin: impl Into<Isin>) -> Self {
        Self {
            isin: isin.into(),
            extra: Map::new(),
        }
    }

    /// Attach an extra upstream field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Issuer LEI, if the payload carries one.
    pub fn lei(&self) -> Option<&str> {
        self.extra.get("lei").and_then(Value::as_str)
    }

    /// Interest type classification, if the payload carries one.
    pub fn interest_type(&self) -> Option<&str> {
        self.extra.get("interest_type").and_then(Value::as_str)
    }
}

/// Reference data for a single bond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondReference {
    /// ISIN
    pub isin: Isin,
    /// Amount issued, in currency units
    pub issued_amount: Decimal,
    /// Remaining upstream fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BondReference {
    /// Create a reference record.
    pub fn new(isin: impl Into<Isin>, issued_amount: Decimal) -> Self {
        Self {
            isin: isin.into(),
            issued_amount,
            extra: Map::new(),
        }
    }
}

/// A single scheduled payment of a bond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowRecord {
    /// ISIN of the paying bond
    pub isin: Isin,
    /// Payment as a percentage of par
    pub amount: Decimal,
    /// Payment date (ISO-8601)
    pub date: String,
    /// Cashflow type (`interest`, `principal`, ...)
    #[serde(rename = "type")]
    pub kind: String,
}

impl CashflowRecord {
    /// Create a cashflow record.
    pub fn new(
        isin: impl Into<Isin>,
        amount: Decimal,
        date: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            isin: isin.into(),
            amount,
            date: date.into(),
            kind: kind.into(),
        }
    }
}
