//! Debt payment schedule endpoint.

use axum::{
    extract::{Query, State},
    Json,
};

use terrapin_core::schedule::{PaymentType, ScheduleRow};

use crate::error::ApiResult;
use crate::state::AppState;

/// Query parameters for the schedule.
#[derive(Debug, Default)]
pub struct ScheduleQuery {
    /// `interest`, `principal` or `total`.
    pub payment_type: Option<String>,
}

impl ScheduleQuery {
    /// Build from raw query pairs. A repeated parameter takes its last value;
    /// unrelated parameters are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let payment_type = pairs
            .into_iter()
            .filter(|(key, _)| key == "payment_type")
            .map(|(_, value)| value)
            .last();
        Self { payment_type }
    }

    /// Resolve the payment type filter.
    ///
    /// Absent and unrecognized values both mean the unfiltered total.
    pub fn payment_type(&self) -> PaymentType {
        match self.payment_type.as_deref() {
            None => PaymentType::Total,
            Some(raw) => raw.parse::<PaymentType>().unwrap_or_else(|e| {
                tracing::warn!("{}, returning all payment types", e);
                PaymentType::Total
            }),
        }
    }
}

/// Yearly debt payment schedule.
pub async fn debt_payment_schedule(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Vec<ScheduleRow>>> {
    let query = ScheduleQuery::from_pairs(pairs);
    let rows = state.schedule.schedule(query.payment_type()).await?;
    Ok(Json(rows))
}
