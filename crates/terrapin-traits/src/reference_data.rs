//! Bond data source trait.
//!
//! [`BondDataSource`] is the seam between the debt schedule pipeline and the
//! bond data provider. It mirrors the three upstream calls:
//! - bond search by issuer and interest type
//! - reference data for a set of ISINs
//! - cashflow schedules for a set of ISINs

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use terrapin_core::ids::{Isin, Lei};
use terrapin_core::records::{BondReference, BondSummary, CashflowRecord};

use crate::error::TraitError;

/// Filter for bond search.
///
/// Serializes to the upstream request body `{"leis": [...], "interest_types": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BondSearchFilter {
    /// Issuer LEIs
    pub leis: Vec<Lei>,
    /// Interest type classifications (e.g. "fixed rate")
    pub interest_types: Vec<String>,
}

impl BondSearchFilter {
    /// Create a filter.
    pub fn new(leis: Vec<Lei>, interest_types: Vec<String>) -> Self {
        Self {
            leis,
            interest_types,
        }
    }

    /// Returns true if a search result satisfies this filter.
    ///
    /// Empty criteria match everything, and so do summaries that do not carry
    /// the corresponding field.
    pub fn matches(&self, bond: &BondSummary) -> bool {
        let lei_ok = self.leis.is_empty()
            || bond
                .lei()
                .map_or(true, |lei| self.leis.iter().any(|l| l.as_str() == lei));
        let type_ok = self.interest_types.is_empty()
            || bond
                .interest_type()
                .map_or(true, |t| self.interest_types.iter().any(|i| i == t));
        lei_ok && type_ok
    }
}

/// Trait for bond data providers.
#[async_trait]
pub trait BondDataSource: Send + Sync {
    /// Search bonds matching the filter.
    async fn search_bonds(&self, filter: &BondSearchFilter) -> Result<Vec<BondSummary>, TraitError>;

    /// Get reference data for the given ISINs.
    async fn bond_reference(&self, isins: &[Isin]) -> Result<Vec<BondReference>, TraitError>;

    /// Get cashflow schedules for the given ISINs.
    async fn bond_cashflows(&self, isins: &[Isin]) -> Result<Vec<CashflowRecord>, TraitError>;

    /// Short name of the source, for logging.
    fn name(&self) -> &str;
}
