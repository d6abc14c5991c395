//! Terrapin debt schedule REST API.
//!
//! Serves an OpenBB widget configuration and a debt payment schedule built
//! from Terrapin Finance bond data.
//!
//! ## Endpoints
//!
//! - `GET /`: service info
//! - `GET /widgets.json`: OpenBB widget configuration
//! - `GET /debt_payment_schedule?payment_type=interest|principal|total`
//! - `GET /health`
//!
//! ## Usage
//!
//! ```bash
//! # Live upstream
//! TERRAPIN_API_KEY=... terrapin-api-server
//!
//! # Offline, from fixture files
//! terrapin-api-server --fixtures crates/terrapin-api/fixtures/uk-gilts
//!
//! # Custom host, port and config file
//! terrapin-api-server --host 0.0.0.0 --port 5050 --config crates/terrapin-api/config/terrapin.toml
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod service;
pub mod state;

pub use config::{ApiConfig, ScheduleConfig};
pub use error::{ApiError, ApiResult};
pub use server::create_router;
pub use service::DebtScheduleService;
pub use state::AppState;
