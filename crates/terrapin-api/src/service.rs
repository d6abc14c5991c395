//! Debt payment schedule pipeline.
//!
//! One request makes three sequential calls to the bond data source:
//! search, reference, cashflows. Each feeds the next. The cashflow call asks
//! only for ISINs that came back with reference data.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use terrapin_core::ids::Isin;
use terrapin_core::schedule::{
    build_schedule, compute_cashflows, PaymentType, ReferenceBook, ScheduleRow,
};
use terrapin_traits::reference_data::{BondDataSource, BondSearchFilter};

use crate::config::ScheduleConfig;
use crate::error::ApiResult;

/// Builds debt payment schedules from a bond data source.
pub struct DebtScheduleService {
    source: Arc<dyn BondDataSource>,
    filter: BondSearchFilter,
    cutoff: NaiveDate,
}

impl DebtScheduleService {
    /// Create a service over `source`.
    pub fn new(source: Arc<dyn BondDataSource>, config: &ScheduleConfig) -> Self {
        Self {
            source,
            filter: config.search_filter(),
            cutoff: config.cutoff_date,
        }
    }

    /// Name of the underlying data source.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Build the schedule for a payment type.
    pub async fn schedule(&self, payment_type: PaymentType) -> ApiResult<Vec<ScheduleRow>> {
        let bonds = self.source.search_bonds(&self.filter).await?;
        let isins: Vec<Isin> = bonds.into_iter().map(|b| b.isin).collect();
        debug!(bonds = isins.len(), "Bond search complete");

        let references = self.source.bond_reference(&isins).await?;
        let book = ReferenceBook::from_records(references);
        if book.len() < isins.len() {
            debug!(
                requested = isins.len(),
                returned = book.len(),
                "Reference data missing for some bonds"
            );
        }

        let cashflows = self.source.bond_cashflows(book.isins()).await?;
        debug!(cashflows = cashflows.len(), "Cashflows fetched");

        let scheduled = compute_cashflows(&cashflows, &book, self.cutoff)?;
        let rows = build_schedule(scheduled, payment_type)?;

        info!(
            source = self.source.name(),
            %payment_type,
            years = rows.len(),
            "Debt payment schedule built"
        );
        Ok(rows)
    }
}
