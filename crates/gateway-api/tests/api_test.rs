//! HTTP-level tests: JSON → router → services → JSON, with a pinned random
//! source so invoice outcomes are deterministic.

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use gateway_api::{create_router, AppConfig, AppState, API_KEY_HEADER};
use gateway_core::FixedSample;
use serde_json::{json, Value};
use std::sync::Arc;

fn server_with_sample(sample: f64) -> TestServer {
    let state = AppState::with_random_source(AppConfig::default(), Arc::new(FixedSample(sample)));
    TestServer::new(create_router(state)).unwrap()
}

fn key_header(key: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(API_KEY_HEADER),
        HeaderValue::from_str(key).unwrap(),
    )
}

async fn register(server: &TestServer, name: &str, email: &str) -> String {
    let response = server
        .post("/accounts")
        .json(&json!({ "name": name, "email": email }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    body["api_key"].as_str().unwrap().to_string()
}

fn invoice_body(amount: f64, card_number: &str) -> Value {
    json!({
        "amount": amount,
        "description": "Order #1001",
        "payment_type": "credit_card",
        "card_number": card_number,
        "cvv": "737",
        "expiry_month": 12,
        "expiry_year": 2030,
        "cardholder_name": "Jane Doe"
    })
}

async fn create_invoice(server: &TestServer, key: &str, amount: f64) -> Value {
    let (name, value) = key_header(key);
    let response = server
        .post("/invoice")
        .add_header(name, value)
        .json(&invoice_body(amount, "4111111111114242"))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_health() {
    let server = server_with_sample(0.5);
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_register_account() {
    let server = server_with_sample(0.5);
    let response = server
        .post("/accounts")
        .json(&json!({ "name": "Acme", "email": "ops@acme.io" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["name"], "Acme");
    assert_eq!(body["email"], "ops@acme.io");
    assert_eq!(body["api_key"].as_str().unwrap().len(), 32);
    uuid::Uuid::parse_str(body["id"].as_str().unwrap()).unwrap();
}

#[tokio::test]
async fn test_register_duplicate_and_invalid_accounts() {
    let server = server_with_sample(0.5);
    register(&server, "Acme", "ops@acme.io").await;

    let duplicate = server
        .post("/accounts")
        .json(&json!({ "name": "Acme 2", "email": "OPS@acme.io" }))
        .await;
    duplicate.assert_status(StatusCode::CONFLICT);
    let body: Value = duplicate.json();
    assert_eq!(body["code"], 409);

    let invalid = server
        .post("/accounts")
        .json(&json!({ "name": "", "email": "nobody@acme.io" }))
        .await;
    invalid.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_account_by_key() {
    let server = server_with_sample(0.5);
    let key = register(&server, "Acme", "ops@acme.io").await;

    let (name, value) = key_header(&key);
    let response = server.get("/accounts").add_header(name, value).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["email"], "ops@acme.io");
    assert_eq!(body["api_key"], key.as_str());

    server
        .get("/accounts")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invoice_scenario_across_accounts() {
    let server = server_with_sample(0.5);
    let key_a = register(&server, "Alpha", "a@alpha.io").await;
    let key_b = register(&server, "Beta", "b@beta.io").await;

    let invoice = create_invoice(&server, &key_a, 50.0).await;
    assert_eq!(invoice["card_last_digits"], "4242");
    assert_eq!(invoice["status"], "approved");
    assert_eq!(invoice["amount"], 50.0);

    let id = invoice["id"].as_str().unwrap();

    let (name, value) = key_header(&key_b);
    server
        .get(&format!("/invoice/{id}"))
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let (name, value) = key_header(&key_a);
    let own = server.get(&format!("/invoice/{id}")).add_header(name, value).await;
    own.assert_status_ok();
    let body: Value = own.json();
    assert_eq!(body, invoice);
}

#[tokio::test]
async fn test_invoice_response_hides_card_data() {
    let server = server_with_sample(0.5);
    let key = register(&server, "Acme", "ops@acme.io").await;

    let (name, value) = key_header(&key);
    let response = server
        .post("/invoice")
        .add_header(name, value)
        .json(&invoice_body(75.0, "5500005555554444"))
        .await;
    response.assert_status(StatusCode::CREATED);

    let text = response.text();
    assert!(!text.contains("5500005555554444"));

    let body: Value = response.json();
    let mut keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "account_id",
            "amount",
            "card_last_digits",
            "created_at",
            "description",
            "id",
            "payment_type",
            "status",
            "updated_at",
        ]
    );
}

#[tokio::test]
async fn test_rejected_invoice() {
    let server = server_with_sample(0.7000001);
    let key = register(&server, "Acme", "ops@acme.io").await;

    let invoice = create_invoice(&server, &key, 10_000.0).await;
    assert_eq!(invoice["status"], "rejected");
}

#[tokio::test]
async fn test_invalid_invoices() {
    let server = server_with_sample(0.5);
    let key = register(&server, "Acme", "ops@acme.io").await;

    for (amount, card) in [(0.0, "4242424242424242"), (-5.0, "4242424242424242"), (10.0, "424")] {
        let (name, value) = key_header(&key);
        let response = server
            .post("/invoice")
            .add_header(name, value)
            .json(&invoice_body(amount, card))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    let (name, value) = key_header(&key);
    let listed: Value = server.get("/invoice").add_header(name, value).await.json();
    assert_eq!(listed["count"], 0);
}

#[tokio::test]
async fn test_invoice_routes_require_valid_key() {
    let server = server_with_sample(0.5);
    register(&server, "Acme", "ops@acme.io").await;

    server
        .post("/invoice")
        .json(&invoice_body(10.0, "4242424242424242"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    for key in ["", "deadbeefdeadbeefdeadbeefdeadbeef"] {
        let (name, value) = key_header(key);
        let response = server.get("/invoice").add_header(name, value).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["code"], 401);
    }
}

#[tokio::test]
async fn test_list_is_scoped_and_ordered() {
    let server = server_with_sample(0.5);
    let key_a = register(&server, "Alpha", "a@alpha.io").await;
    let key_b = register(&server, "Beta", "b@beta.io").await;

    let first = create_invoice(&server, &key_a, 10.0).await;
    create_invoice(&server, &key_b, 20.0).await;
    let second = create_invoice(&server, &key_a, 30.0).await;

    let (name, value) = key_header(&key_a);
    let listed: Value = server.get("/invoice").add_header(name, value).await.json();
    assert_eq!(listed["count"], 2);
    assert_eq!(listed["invoices"][0]["id"], first["id"]);
    assert_eq!(listed["invoices"][1]["id"], second["id"]);

    let fresh = register(&server, "Gamma", "c@gamma.io").await;
    let (name, value) = key_header(&fresh);
    let empty: Value = server.get("/invoice").add_header(name, value).await.json();
    assert_eq!(empty["count"], 0);
    assert_eq!(empty["invoices"], json!([]));
}

#[tokio::test]
async fn test_large_invoice_status_update() {
    let server = server_with_sample(0.5);
    let key_a = register(&server, "Alpha", "a@alpha.io").await;
    let key_b = register(&server, "Beta", "b@beta.io").await;

    let invoice = create_invoice(&server, &key_a, 15_000.0).await;
    assert_eq!(invoice["status"], "pending");
    let path = format!("/invoice/{}/status", invoice["id"].as_str().unwrap());

    let (name, value) = key_header(&key_b);
    server
        .patch(&path)
        .add_header(name, value)
        .json(&json!({ "status": "approved" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let (name, value) = key_header(&key_a);
    let updated = server
        .patch(&path)
        .add_header(name, value)
        .json(&json!({ "status": "approved" }))
        .await;
    updated.assert_status_ok();
    let body: Value = updated.json();
    assert_eq!(body["status"], "approved");

    let (name, value) = key_header(&key_a);
    let again = server
        .patch(&path)
        .add_header(name, value)
        .json(&json!({ "status": "rejected" }))
        .await;
    again.assert_status(StatusCode::CONFLICT);

    let (name, value) = key_header(&key_a);
    let unknown_status = server
        .patch(&path)
        .add_header(name, value)
        .json(&json!({ "status": "refunded" }))
        .await;
    assert!(unknown_status.status_code().is_client_error());
}

#[tokio::test]
async fn test_malformed_invoice_id_is_not_found() {
    let server = server_with_sample(0.5);
    let key = register(&server, "Acme", "ops@acme.io").await;

    let (name, value) = key_header(&key);
    server
        .get("/invoice/not-a-uuid")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_invoice_body_hides_card_data() {
    let server = server_with_sample(0.5);
    let key = register(&server, "Acme", "ops@acme.io").await;

    let mut numeric_number = invoice_body(25.0, "4242424242424242");
    numeric_number["card_number"] = json!(4111111111114242u64);
    let mut numeric_cvv = invoice_body(25.0, "4242424242424242");
    numeric_cvv["cvv"] = json!(737);

    for body in [numeric_number, numeric_cvv] {
        let (name, value) = key_header(&key);
        let response = server.post("/invoice").add_header(name, value).json(&body).await;
        assert!(response.status_code().is_client_error());

        let text = response.text();
        assert!(!text.contains("4111111111114242"), "body: {text}");
        assert!(!text.contains("737"), "body: {text}");

        let error: Value = response.json();
        assert_eq!(error["error"], "Invalid request body");
        assert_eq!(error["code"], response.status_code().as_u16());
    }
}

#[tokio::test]
async fn test_malformed_bodies_use_error_shape() {
    let server = server_with_sample(0.5);

    let account = server
        .post("/accounts")
        .json(&json!({ "name": 7, "email": "ops@acme.io" }))
        .await;
    assert!(account.status_code().is_client_error());
    let body: Value = account.json();
    assert_eq!(body["error"], "Invalid request body");

    let key = register(&server, "Acme", "ops@acme.io").await;
    let invoice = create_invoice(&server, &key, 15_000.0).await;
    let path = format!("/invoice/{}/status", invoice["id"].as_str().unwrap());

    let (name, value) = key_header(&key);
    let status = server
        .patch(&path)
        .add_header(name, value)
        .json(&json!({ "status": "refunded" }))
        .await;
    assert!(status.status_code().is_client_error());
    let body: Value = status.json();
    assert_eq!(body["error"], "Invalid request body");
    assert_eq!(body["code"], status.status_code().as_u16());
}
