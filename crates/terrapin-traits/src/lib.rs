//! # Terrapin Traits
//!
//! Trait definitions for bond data sources.
//!
//! This crate contains ONLY trait definitions and their request/error types.
//! Implementations live in the extension crates:
//!
//! - `terrapin-ext-http`: the Terrapin Finance REST API
//! - `terrapin-ext-file`: in-memory and JSON fixture data
//!
//! ## Dependency Injection
//!
//! The debt schedule service takes any source behind an `Arc`:
//!
//! ```ignore
//! let source: Arc<dyn BondDataSource> = Arc::new(TerrapinClient::new(config)?);
//! let service = DebtScheduleService::new(source, schedule_config);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod reference_data;

pub use error::TraitError;
pub use reference_data::{BondDataSource, BondSearchFilter};
