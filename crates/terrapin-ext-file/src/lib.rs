//! # Terrapin Ext File
//!
//! Fixture-backed bond data for offline runs and tests.
//!
//! [`InMemoryBondSource`] answers the three bond data calls from records held
//! in memory. Records can be supplied directly or loaded from a directory
//! holding `bond_search.json`, `bond_reference.json` and `bond_cashflows.json`,
//! each in the upstream `{"data": [...]}` envelope.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::info;

use terrapin_core::ids::Isin;
use terrapin_core::records::{BondReference, BondSummary, CashflowRecord};
use terrapin_traits::error::TraitError;
use terrapin_traits::reference_data::{BondDataSource, BondSearchFilter};

/// File holding search results.
pub const SEARCH_FILE: &str = "bond_search.json";
/// File holding reference records.
pub const REFERENCE_FILE: &str = "bond_reference.json";
/// File holding cashflow records.
pub const CASHFLOWS_FILE: &str = "bond_cashflows.json";

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: Vec<T>,
}

/// In-memory bond data source.
#[derive(Debug, Default)]
pub struct InMemoryBondSource {
    bonds: Vec<BondSummary>,
    references: Vec<BondReference>,
    cashflows: Vec<CashflowRecord>,
    calls: AtomicUsize,
}

impl InMemoryBondSource {
    /// Create a new empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bond search results.
    #[must_use]
    pub fn with_bonds(mut self, bonds: Vec<BondSummary>) -> Self {
        self.bonds = bonds;
        self
    }

    /// Set the reference records.
    #[must_use]
    pub fn with_references(mut self, references: Vec<BondReference>) -> Self {
        self.references = references;
        self
    }

    /// Set the cashflow records.
    #[must_use]
    pub fn with_cashflows(mut self, cashflows: Vec<CashflowRecord>) -> Self {
        self.cashflows = cashflows;
        self
    }

    /// Load fixtures from a directory.
    ///
    /// A missing file leaves that dataset empty; an unreadable or malformed
    /// file is an error.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, TraitError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(TraitError::InvalidInput(format!(
                "fixture directory not found: {}",
                dir.display()
            )));
        }

        let source = Self::new()
            .with_bonds(load_envelope(&dir.join(SEARCH_FILE))?)
            .with_references(load_envelope(&dir.join(REFERENCE_FILE))?)
            .with_cashflows(load_envelope(&dir.join(CASHFLOWS_FILE))?);

        info!(
            "Loaded fixtures from {}: {} bonds, {} references, {} cashflows",
            dir.display(),
            source.bonds.len(),
            source.references.len(),
            source.cashflows.len()
        );
        Ok(source)
    }

    /// Number of data calls answered so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }
}

fn load_envelope<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, TraitError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| TraitError::IoError(format!("{}: {}", path.display(), e)))?;
    let envelope: DataEnvelope<T> = serde_json::from_str(&content)
        .map_err(|e| TraitError::ParseError(format!("{}: {}", path.display(), e)))?;
    Ok(envelope.data)
}

#[async_trait]
impl BondDataSource for InMemoryBondSource {
    async fn search_bonds(&self, filter: &BondSearchFilter) -> Result<Vec<BondSummary>, TraitError> {
        self.record_call();
        Ok(self
            .bonds
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect())
    }

    async fn bond_reference(&self, isins: &[Isin]) -> Result<Vec<BondReference>, TraitError> {
        self.record_call();
        let wanted: HashSet<&Isin> = isins.iter().collect();
        Ok(self
            .references
            .iter()
            .filter(|r| wanted.contains(&r.isin))
            .cloned()
            .collect())
    }

    async fn bond_cashflows(&self, isins: &[Isin]) -> Result<Vec<CashflowRecord>, TraitError> {
        self.record_call();
        let wanted: HashSet<&Isin> = isins.iter().collect();
        Ok(self
            .cashflows
            .iter()
            .filter(|c| wanted.contains(&c.isin))
            .cloned()
            .collect())
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
