//! Integration tests for the Terrapin API endpoints.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;

use terrapin_api::{create_router, ApiConfig, AppState};
use terrapin_core::ids::Isin;
use terrapin_core::records::{BondReference, BondSummary, CashflowRecord};
use terrapin_ext_file::InMemoryBondSource;
use terrapin_traits::{BondDataSource, BondSearchFilter, TraitError};

// =============================================================================
// TEST SOURCES
// =============================================================================

/// Source answering with fixed data regardless of the request, and recording
/// the ISINs it was asked for.
#[derive(Default)]
struct StubSource {
    bonds: Vec<BondSummary>,
    references: Vec<BondReference>,
    cashflows: Vec<CashflowRecord>,
    reference_requests: Mutex<Vec<Vec<Isin>>>,
    cashflow_requests: Mutex<Vec<Vec<Isin>>>,
}

#[async_trait]
impl BondDataSource for StubSource {
    async fn search_bonds(&self, _filter: &BondSearchFilter) -> Result<Vec<BondSummary>, TraitError> {
        Ok(self.bonds.clone())
    }

    async fn bond_reference(&self, isins: &[Isin]) -> Result<Vec<BondReference>, TraitError> {
        self.reference_requests.lock().unwrap().push(isins.to_vec());
        Ok(self.references.clone())
    }

    async fn bond_cashflows(&self, isins: &[Isin]) -> Result<Vec<CashflowRecord>, TraitError> {
        self.cashflow_requests.lock().unwrap().push(isins.to_vec());
        Ok(self.cashflows.clone())
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Source whose search call always fails.
struct FailingSource;

#[async_trait]
impl BondDataSource for FailingSource {
    async fn search_bonds(&self, _filter: &BondSearchFilter) -> Result<Vec<BondSummary>, TraitError> {
        Err(TraitError::ConnectionFailed(
            "bond_search: connection refused".to_string(),
        ))
    }

    async fn bond_reference(&self, _isins: &[Isin]) -> Result<Vec<BondReference>, TraitError> {
        unreachable!("search failed first")
    }

    async fn bond_cashflows(&self, _isins: &[Isin]) -> Result<Vec<CashflowRecord>, TraitError> {
        unreachable!("search failed first")
    }

    fn name(&self) -> &str {
        "failing"
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn app_with(source: Arc<dyn BondDataSource>) -> axum::Router {
    create_router(AppState::new(ApiConfig::default(), source))
}

/// One bond X issued at 1bn paying a single 50% coupon in 2025.
fn single_bond_source() -> InMemoryBondSource {
    InMemoryBondSource::new()
        .with_bonds(vec![BondSummary::new("X")])
        .with_references(vec![BondReference::new("X", dec!(1_000_000_000))])
        .with_cashflows(vec![CashflowRecord::new(
            "X",
            dec!(50),
            "2025-03-01",
            "interest",
        )])
}

/// Two bonds with interest and principal across several years.
fn mixed_source() -> InMemoryBondSource {
    InMemoryBondSource::new()
        .with_bonds(vec![BondSummary::new("A"), BondSummary::new("B")])
        .with_references(vec![
            BondReference::new("A", dec!(10_000_000_000)),
            BondReference::new("B", dec!(20_000_000_000)),
        ])
        .with_cashflows(vec![
            CashflowRecord::new("A", dec!(2), "2024-06-01", "interest"),
            CashflowRecord::new("A", dec!(2), "2024-12-01", "interest"),
            CashflowRecord::new("A", dec!(2), "2025-06-01", "interest"),
            CashflowRecord::new("B", dec!(1), "2025-06-01", "interest"),
            CashflowRecord::new("A", dec!(100), "2026-06-01", "principal"),
            CashflowRecord::new("B", dec!(1), "2027-06-01", "interest"),
        ])
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(json!({}));
    (status, json)
}

/// Helper to make a GET request and get JSON response.
async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

fn assert_close(value: &Value, expected: f64) {
    let actual = value
        .as_f64()
        .unwrap_or_else(|| panic!("expected number, got {value}"));
    assert!(
        (actual - expected).abs() < 1e-12,
        "expected {expected}, got {actual}"
    );
}

// =============================================================================
// STATIC ENDPOINTS
// =============================================================================

#[tokio::test]
async fn test_root_endpoint() {
    let (status, body) = get_json(app_with(Arc::new(InMemoryBondSource::new())), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"Info": "Terrapin Example for OpenBB"}));
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = get_json(app_with(Arc::new(InMemoryBondSource::new())), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["source"], "in-memory");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_widgets_served_byte_for_byte() {
    let path = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/widgets.json"));
    let expected = std::fs::read(&path).unwrap();

    let app = app_with(Arc::new(InMemoryBondSource::new()));
    let request = Request::builder().uri("/widgets.json").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body.as_ref(), expected.as_slice());
}

#[tokio::test]
async fn test_widgets_keep_file_key_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("widgets.json");
    let document = r#"{"zeta": {"name": "Z", "category": "c"}, "alpha": {"name": "A"}}"#;
    std::fs::write(&path, document).unwrap();

    let config = ApiConfig {
        widgets_path: path,
        ..ApiConfig::default()
    };
    let app = create_router(AppState::new(config, Arc::new(InMemoryBondSource::new())));
    let request = Request::builder().uri("/widgets.json").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(std::str::from_utf8(&body).unwrap(), document);
}

#[tokio::test]
async fn test_widgets_invalid_json_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("widgets.json");
    std::fs::write(&path, "{\"unterminated\": ").unwrap();

    let config = ApiConfig {
        widgets_path: path,
        ..ApiConfig::default()
    };
    let app = create_router(AppState::new(config, Arc::new(InMemoryBondSource::new())));

    let (status, body) = get_json(app, "/widgets.json").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["kind"], "WIDGETS_ERROR");
}

#[tokio::test]
async fn test_widgets_from_configured_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("widgets.json");
    std::fs::write(&path, r#"{"custom": {"name": "Custom"}}"#).unwrap();

    let config = ApiConfig {
        widgets_path: path,
        ..ApiConfig::default()
    };
    let app = create_router(AppState::new(config, Arc::new(InMemoryBondSource::new())));

    let (status, body) = get_json(app, "/widgets.json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"custom": {"name": "Custom"}}));
}

#[tokio::test]
async fn test_widgets_missing_file_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let config = ApiConfig {
        widgets_path: dir.path().join("missing.json"),
        ..ApiConfig::default()
    };
    let app = create_router(AppState::new(config, Arc::new(InMemoryBondSource::new())));

    let (status, body) = get_json(app, "/widgets.json").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["kind"], "WIDGETS_ERROR");
}

// =============================================================================
// DEBT PAYMENT SCHEDULE
// =============================================================================

#[tokio::test]
async fn test_single_bond_scenario() {
    let (status, body) = get_json(
        app_with(Arc::new(single_bond_source())),
        "/debt_payment_schedule",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"year": "2025", "interest": 0.5}]));
}

#[tokio::test]
async fn test_three_upstream_calls_per_request() {
    let source = Arc::new(single_bond_source());
    let app = app_with(source.clone());

    get_json(app.clone(), "/debt_payment_schedule").await;
    assert_eq!(source.calls(), 3);

    get_json(app, "/debt_payment_schedule?payment_type=interest").await;
    assert_eq!(source.calls(), 6);
}

#[tokio::test]
async fn test_total_and_absent_return_all_types() {
    for uri in [
        "/debt_payment_schedule",
        "/debt_payment_schedule?payment_type=total",
        "/debt_payment_schedule?payment_type=coupons",
    ] {
        let (status, body) = get_json(app_with(Arc::new(mixed_source())), uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");

        let rows = body.as_array().unwrap();
        let years: Vec<&str> = rows.iter().map(|r| r["year"].as_str().unwrap()).collect();
        assert_eq!(years, vec!["2025", "2026", "2027"], "{uri}");

        // A: 2 * 10bn / 1e11 = 0.2, B: 1 * 20bn / 1e11 = 0.2
        assert_close(&rows[0]["interest"], 0.4);
        assert_close(&rows[0]["principal"], 0.0);
        assert_close(&rows[1]["interest"], 0.0);
        assert_close(&rows[1]["principal"], 10.0);
        assert_close(&rows[2]["interest"], 0.2);
        assert_close(&rows[2]["principal"], 0.0);
    }
}

#[tokio::test]
async fn test_interest_only() {
    let (status, body) = get_json(
        app_with(Arc::new(mixed_source())),
        "/debt_payment_schedule?payment_type=interest",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        let keys: Vec<&String> = row.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);
        assert!(row.get("principal").is_none());
    }
    assert_eq!(rows[0]["year"], "2025");
    assert_eq!(rows[1]["year"], "2027");
}

#[tokio::test]
async fn test_principal_only() {
    let (status, body) = get_json(
        app_with(Arc::new(mixed_source())),
        "/debt_payment_schedule?payment_type=principal",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"year": "2026", "principal": 10.0}]));
}

#[tokio::test]
async fn test_repeated_payment_type_uses_last_value() {
    let (status, body) = get_json(
        app_with(Arc::new(mixed_source())),
        "/debt_payment_schedule?payment_type=interest&payment_type=principal",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"year": "2026", "principal": 10.0}]));

    let (status, body) = get_json(
        app_with(Arc::new(mixed_source())),
        "/debt_payment_schedule?payment_type=interest&payment_type=total",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_cutoff_date_is_exclusive() {
    let source = InMemoryBondSource::new()
        .with_bonds(vec![BondSummary::new("X")])
        .with_references(vec![BondReference::new("X", dec!(1_000_000_000))])
        .with_cashflows(vec![
            CashflowRecord::new("X", dec!(10), "2024-12-01", "interest"),
            CashflowRecord::new("X", dec!(20), "2024-12-02", "interest"),
        ]);

    let (status, body) = get_json(app_with(Arc::new(source)), "/debt_payment_schedule").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"year": "2024", "interest": 0.2}]));
}

#[tokio::test]
async fn test_cashflows_requested_only_for_referenced_bonds() {
    let source = Arc::new(StubSource {
        bonds: vec![BondSummary::new("A"), BondSummary::new("B")],
        references: vec![BondReference::new("A", dec!(1_000_000_000))],
        cashflows: vec![CashflowRecord::new("A", dec!(10), "2025-01-01", "interest")],
        ..StubSource::default()
    });

    let (status, _) = get_json(app_with(source.clone()), "/debt_payment_schedule").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        source.reference_requests.lock().unwrap()[0],
        vec![Isin::new("A"), Isin::new("B")]
    );
    assert_eq!(source.cashflow_requests.lock().unwrap()[0], vec![Isin::new("A")]);
}

#[tokio::test]
async fn test_cashflow_without_reference_is_500() {
    let source = StubSource {
        bonds: vec![BondSummary::new("A")],
        references: vec![BondReference::new("A", dec!(1_000_000_000))],
        cashflows: vec![
            CashflowRecord::new("A", dec!(10), "2025-01-01", "interest"),
            CashflowRecord::new("Z", dec!(10), "2025-01-01", "interest"),
        ],
        ..StubSource::default()
    };

    let (status, body) = get_json(app_with(Arc::new(source)), "/debt_payment_schedule").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["kind"], "SCHEDULE_ERROR");
    assert!(body["error"]["message"].as_str().unwrap().contains('Z'));
}

#[tokio::test]
async fn test_empty_schedule_is_500() {
    let source = InMemoryBondSource::new()
        .with_bonds(vec![BondSummary::new("X")])
        .with_references(vec![BondReference::new("X", dec!(1_000_000_000))])
        .with_cashflows(vec![CashflowRecord::new(
            "X",
            dec!(10),
            "2023-01-01",
            "interest",
        )]);

    let (status, body) = get_json(app_with(Arc::new(source)), "/debt_payment_schedule").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["kind"], "SCHEDULE_ERROR");
}

#[tokio::test]
async fn test_invalid_cashflow_date_is_500() {
    let source = InMemoryBondSource::new()
        .with_bonds(vec![BondSummary::new("X")])
        .with_references(vec![BondReference::new("X", dec!(1_000_000_000))])
        .with_cashflows(vec![CashflowRecord::new("X", dec!(10), "soon", "interest")]);

    let (status, body) = get_json(app_with(Arc::new(source)), "/debt_payment_schedule").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["kind"], "SCHEDULE_ERROR");
}

#[tokio::test]
async fn test_upstream_failure_is_500_with_message() {
    let (status, body) = get_json(app_with(Arc::new(FailingSource)), "/debt_payment_schedule").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["kind"], "UPSTREAM_ERROR");
    assert_eq!(
        body["error"]["message"],
        "Upstream error: connection failed: bond_search: connection refused"
    );
}

#[tokio::test]
async fn test_fixture_directory_schedule() {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/uk-gilts");
    let source = InMemoryBondSource::from_dir(dir).unwrap();

    let (status, body) = get_json(app_with(Arc::new(source)), "/debt_payment_schedule").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    let years: Vec<&str> = rows.iter().map(|r| r["year"].as_str().unwrap()).collect();
    assert_eq!(years, vec!["2025", "2026", "2027", "2028"]);

    // Index-linked gilt is excluded by the fixed rate search filter.
    assert_close(&rows[0]["interest"], 0.1575);
    assert_close(&rows[0]["principal"], 0.0);
    assert_close(&rows[1]["interest"], 0.1575);
    assert_close(&rows[1]["principal"], 30.0);
    assert_close(&rows[2]["interest"], 0.045);
    assert_close(&rows[3]["interest"], 0.0225);
    assert_close(&rows[3]["principal"], 36.0);
}

// =============================================================================
// CORS
// =============================================================================

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri("/debt_payment_schedule")
        .header("Origin", origin)
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "x-openbb-token")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_cors_allows_openbb_origin_with_credentials() {
    let app = app_with(Arc::new(InMemoryBondSource::new()));

    let response = app.oneshot(preflight("https://pro.openbb.co")).await.unwrap();
    let headers = response.headers();

    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "https://pro.openbb.co"
    );
    assert_eq!(headers.get("access-control-allow-credentials").unwrap(), "true");
    assert_eq!(headers.get("access-control-allow-methods").unwrap(), "GET");
    assert_eq!(
        headers.get("access-control-allow-headers").unwrap(),
        "x-openbb-token"
    );
}

#[tokio::test]
async fn test_cors_rejects_unknown_origin() {
    let app = app_with(Arc::new(InMemoryBondSource::new()));

    let response = app.oneshot(preflight("https://evil.example")).await.unwrap();

    assert!(response.headers().get("access-control-allow-origin").is_none());
}
