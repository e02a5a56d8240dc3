//! Integration tests for the async client against a mock backend.
#![cfg(feature = "async")]

use monalisa_client::client::{MonalisaClient, RequestOptions};
use monalisa_client::endpoint::HttpMethod;
use monalisa_client::error::MonalisaError;
use monalisa_client::models::{
    InvoiceId, MerchantId, MerchantUpdate, NewMerchant, PaymentStatus, TransactionId,
};
use monalisa_client::session::SESSION_TOKEN_KEY;
use monalisa_client::storage::{InMemoryStore, KeyValueStore as _};
use reqwest::header::{HeaderName, HeaderValue};
use secrecy::{ExposeSecret as _, SecretString};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a client pointed at the mock server with an empty session.
fn client_for(server: &MockServer) -> MonalisaClient {
    MonalisaClient::builder()
        .base_url(server.uri())
        .build()
        .unwrap()
}

/// Builds a client whose session already holds `token`.
fn authenticated_client_for(server: &MockServer, token: &str) -> MonalisaClient {
    let store = InMemoryStore::new();
    store.set(SESSION_TOKEN_KEY, token).unwrap();
    MonalisaClient::builder()
        .base_url(server.uri())
        .store(store)
        .build()
        .unwrap()
}

/// A merchant body as the backend returns it.
fn merchant_json(id: i64, name: &str, active: bool) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "merchant_id": format!("EXT-{id}"),
        "is_active": active,
        "created_at": "2024-05-01T10:30:00.123456",
        "updated_at": "2024-05-01T10:30:00.123456"
    })
}

#[tokio::test]
async fn request_carries_bearer_token_when_session_has_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/merchants"))
        .and(header("authorization", "Bearer tok-123"))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "merchants": [], "total": 0 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = authenticated_client_for(&server, "tok-123");
    let list = client.merchants().await.unwrap();
    assert_eq!(list.total, 0);
}

#[tokio::test]
async fn request_has_no_authorization_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/merchants"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "merchants": [], "total": 0 })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let _list = client.merchants().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let request = requests.first().unwrap();
    assert!(request.headers.get("authorization").is_none());
    assert_eq!(
        request.headers.get("content-type").unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn login_persists_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "owner@toko.id", "password": "rahasia" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-token",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .login("owner@toko.id", SecretString::from("rahasia"))
        .await
        .unwrap();

    assert_eq!(response.token_type.as_deref(), Some("bearer"));
    let stored = client.session().token().unwrap();
    assert_eq!(stored.expose_secret(), "fresh-token");
    assert_eq!(
        client
            .session()
            .store()
            .get(SESSION_TOKEN_KEY)
            .unwrap()
            .as_deref(),
        Some("fresh-token")
    );
}

#[tokio::test]
async fn token_from_login_is_sent_on_next_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access_token": "t-1" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/merchants/3"))
        .and(header("authorization", "Bearer t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(merchant_json(3, "Kopi", true)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let _login = client
        .login("a@b.c", SecretString::from("pw"))
        .await
        .unwrap();
    let merchant = client.merchant(MerchantId::new(3)).await.unwrap();
    assert_eq!(merchant.name, "Kopi");
}

#[tokio::test]
async fn login_without_token_keeps_session_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .login("a@b.c", SecretString::from("pw"))
        .await
        .unwrap();
    assert!(response.access_token.is_none());
    assert_eq!(response.extra["status"], "ok");
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn rejected_login_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "detail": "Incorrect email or password" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .login("a@b.c", SecretString::from("wrong"))
        .await
        .unwrap_err();
    match err {
        MonalisaError::Auth { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Incorrect email or password");
        }
        other => panic!("expected auth error, got {other:?}"),
    }
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn logout_clears_token() {
    let server = MockServer::start().await;
    let client = authenticated_client_for(&server, "old");
    assert!(client.session().is_authenticated());
    client.logout();
    assert!(client.session().token().is_none());
    client.logout();
    assert!(client.session().token().is_none());
}

#[tokio::test]
async fn not_found_detail_becomes_request_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/merchants/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "not found" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.merchant(MerchantId::new(99)).await.unwrap_err();
    match err {
        MonalisaError::Request { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "not found");
        }
        other => panic!("expected request error, got {other:?}"),
    }
}

#[tokio::test]
async fn unparsable_error_body_falls_back_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/merchants"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>boom</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.merchants().await.unwrap_err();
    match err {
        MonalisaError::Request { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "HTTP 500");
        }
        other => panic!("expected request error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_success_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/merchants"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.merchants().await.unwrap_err();
    assert!(matches!(err, MonalisaError::Decode(_)));
}

#[tokio::test]
async fn transactions_query_and_body_passthrough() {
    let server = MockServer::start().await;
    let body = json!({
        "transactions": [{
            "id": 21,
            "merchant_id": 1,
            "invoice_id": "INV-21",
            "amount": 15000,
            "description": null,
            "status": "pending",
            "qris_status": null,
            "payment_method": null,
            "customer_name": null,
            "created_at": "2024-05-01T10:30:00",
            "updated_at": "2024-05-01T10:30:00"
        }],
        "total": 1,
        "page": 1,
        "limit": 5
    });
    Mock::given(method("GET"))
        .and(path("/api/qris/transactions"))
        .and(query_param("merchant_id", "1"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client
        .qris_transactions(MerchantId::new(1), 1, 5)
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.limit, 5);
    let tx = page.transactions.first().unwrap();
    assert_eq!(tx.invoice_id, InvoiceId::from("INV-21"));
    assert_eq!(tx.status, PaymentStatus::Pending);

    let requests = server.received_requests().await.unwrap();
    let request = requests.first().unwrap();
    assert_eq!(
        request.url.query(),
        Some("merchant_id=1&page=1&limit=5")
    );
}

#[tokio::test]
async fn create_invoice_sends_expected_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/qris/create-invoice"))
        .and(body_json(json!({
            "merchant_id": 7,
            "amount": 50000,
            "description": "Coffee"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "invoice_id": "INV-7",
            "qr_code_url": "https://qris.example/INV-7.png",
            "amount": 50000,
            "status": "created"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let invoice = client
        .create_qris_invoice(MerchantId::new(7), 50_000, "Coffee")
        .await
        .unwrap();
    assert_eq!(invoice.invoice_id, InvoiceId::from("INV-7"));
    assert_eq!(invoice.amount, 50_000);
}

#[tokio::test]
async fn check_status_parses_payer_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/qris/check-status/INV-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "qris_status": "paid",
            "qris_payment_customername": "Siti",
            "qris_payment_methodby": "DANA"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let status = client
        .check_qris_status(&InvoiceId::from("INV-7"))
        .await
        .unwrap();
    assert!(status.status.is_settled());
    assert_eq!(status.payer_name.as_deref(), Some("Siti"));
    assert_eq!(status.payment_method.as_deref(), Some("DANA"));
}

#[tokio::test]
async fn merchant_crud_round() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/merchants"))
        .and(body_json(json!({
            "name": "Toko Baru",
            "merchant_id": "EXT-5",
            "api_key": "key-5",
            "is_active": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(merchant_json(5, "Toko Baru", true)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/merchants/5"))
        .and(body_json(json!({ "is_active": false })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(merchant_json(5, "Toko Baru", false)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/merchants/5"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "message": "Merchant deleted successfully" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let created = client
        .create_merchant(&NewMerchant::new(
            "Toko Baru",
            "EXT-5",
            SecretString::from("key-5"),
        ))
        .await
        .unwrap();
    assert!(created.is_active);

    let updated = client
        .update_merchant(created.id, &MerchantUpdate::new().active(false))
        .await
        .unwrap();
    assert!(!updated.is_active);

    let deleted = client.delete_merchant(created.id).await.unwrap();
    assert_eq!(deleted.message, "Merchant deleted successfully");
}

#[tokio::test]
async fn test_connection_uses_get() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/merchants/2/test-connection"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Connection successful",
            "status": "success"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .test_merchant_connection(MerchantId::new(2))
        .await
        .unwrap();
    assert!(result.is_success());
}

#[tokio::test]
async fn failed_connection_test_surfaces_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/merchants/2/test-connection"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "Connection failed" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .test_merchant_connection(MerchantId::new(2))
        .await
        .unwrap_err();
    assert_eq!(err.backend_message(), Some("Connection failed"));
}

#[tokio::test]
async fn single_transaction_and_health() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/qris/transactions/21"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 21,
            "merchant_id": 1,
            "invoice_id": "INV-21",
            "amount": 15000,
            "status": "success",
            "created_at": "2024-05-01T10:30:00Z"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "healthy" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let tx = client
        .qris_transaction(TransactionId::new(21))
        .await
        .unwrap();
    assert!(tx.effective_status().is_settled());
    assert_eq!(client.health().await.unwrap().status, "healthy");
}

#[tokio::test]
async fn validation_errors_keep_structured_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/qris/create-invoice"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{ "loc": ["body", "amount"], "msg": "ensure this value is greater than 0" }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .create_qris_invoice(MerchantId::new(1), 0, "")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert!(err.backend_message().unwrap().contains("greater than 0"));
}

#[tokio::test]
async fn raw_request_with_caller_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/custom"))
        .and(header("x-client", "monalisa-tests"))
        .and(body_json(json!({ "ping": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "pong": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let options = RequestOptions::new(HttpMethod::Post)
        .json(&json!({ "ping": true }))
        .unwrap()
        .header(
            HeaderName::from_static("x-client"),
            HeaderValue::from_static("monalisa-tests"),
        );
    let response: serde_json::Value = client.request("/api/custom", options).await.unwrap();
    assert_eq!(response, json!({ "pong": true }));
}

#[tokio::test]
async fn independent_clients_have_independent_sessions() {
    let server = MockServer::start().await;
    let first = authenticated_client_for(&server, "one");
    let second = client_for(&server);
    first.logout();
    assert!(!first.session().is_authenticated());
    assert!(!second.session().is_authenticated());

    second
        .session()
        .set_token(&SecretString::from("two"))
        .unwrap();
    assert!(!first.session().is_authenticated());
    assert_eq!(second.session().token().unwrap().expose_secret(), "two");
}
