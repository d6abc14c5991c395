//! Service info endpoint.

use axum::Json;
use serde_json::{json, Value};

/// Service info.
pub async fn info() -> Json<Value> {
    Json(json!({ "Info": "Terrapin Example for OpenBB" }))
}
