//! Application state.

use std::sync::Arc;

use terrapin_traits::reference_data::BondDataSource;

use crate::config::ApiConfig;
use crate::service::DebtScheduleService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ApiConfig>,

    /// Debt schedule pipeline.
    pub schedule: Arc<DebtScheduleService>,
}

impl AppState {
    /// Create state over a bond data source.
    pub fn new(config: ApiConfig, source: Arc<dyn BondDataSource>) -> Self {
        let schedule = DebtScheduleService::new(source, &config.schedule);
        Self {
            config: Arc::new(config),
            schedule: Arc::new(schedule),
        }
    }
}
