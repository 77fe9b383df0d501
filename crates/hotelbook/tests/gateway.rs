//! Gateway tests against a mock Booking API.
//!
//! These tests use wiremock to simulate the backend and check how the
//! gateway attaches, refreshes and clears tokens.

use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;

use futures_util::future::join_all;
use hotelbook::error::StorageError;
use hotelbook::{
    ApiUrl, ClientConfig, CredentialStore, Error, Gateway, MemoryStore, Outcome, RequestOptions,
    TokenSlot,
};
use serde_json::json;
use wiremock::matchers::{any, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROOMS: &str = "/api/v1/rooms/";
const REFRESH: &str = "/api/v1/auth/token/refresh/";

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(ApiUrl::new(server.uri()).unwrap())
}

fn gateway(server: &MockServer, store: &Arc<MemoryStore>) -> Gateway {
    Gateway::new(config(server), store.clone()).unwrap()
}

fn tokens(store: &MemoryStore) -> (Option<String>, Option<String>) {
    (
        store
            .access_token()
            .unwrap()
            .map(|t| t.as_str().to_string()),
        store
            .refresh_token()
            .unwrap()
            .map(|t| t.as_str().to_string()),
    )
}

fn response(outcome: Outcome) -> reqwest::Response {
    match outcome {
        Outcome::Response(response) => response,
        Outcome::Unauthenticated => panic!("expected a response, got Unauthenticated"),
    }
}

async fn mount_refresh(server: &MockServer, refresh: &str, template: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .and(body_json(json!({ "refresh": refresh })))
        .respond_with(template)
        .expect(times)
        .mount(server)
        .await;
}

// ============================================================================
// Authorization header
// ============================================================================

#[tokio::test]
async fn test_anonymous_request_has_no_authorization() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROOMS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let outcome = gateway(&server, &store)
        .request(ROOMS, RequestOptions::get())
        .await
        .unwrap();

    let response = response(outcome);
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "[]");

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
    assert_eq!(requests[0].headers.get("content-type").unwrap(), "application/json");
}

#[tokio::test]
async fn test_caller_authorization_is_not_forwarded_without_token() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    gateway(&server, &store)
        .request(
            ROOMS,
            RequestOptions::get().header("Authorization", "Bearer forged"),
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_stored_token_overrides_caller_authorization() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/bookings/create/"))
        .and(header("authorization", "Bearer A1"))
        .and(header("content-type", "application/json; charset=utf-8"))
        .and(header("x-client", "tests"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::with_tokens(Some("A1"), Some("R1")));
    let options = RequestOptions::post()
        .header("Authorization", "Bearer forged")
        .header("Content-Type", "application/json; charset=utf-8")
        .header("X-Client", "tests")
        .body(r#"{"room": 3, "check_in": "2025-06-10", "check_out": "2025-06-12"}"#);

    let outcome = gateway(&server, &store)
        .request("/api/v1/bookings/create/", options)
        .await
        .unwrap();

    assert_eq!(response(outcome).status(), 201);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].headers.get_all("authorization").iter().count(), 1);
    assert_eq!(
        requests[0].body,
        br#"{"room": 3, "check_in": "2025-06-10", "check_out": "2025-06-12"}"#
    );
}

#[tokio::test]
async fn test_absolute_url_is_used_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROOMS))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::with_tokens(Some("A1"), None));
    let url = format!("{}{}?capacity=2", server.uri(), ROOMS);
    let outcome = gateway(&server, &store)
        .request(&url, RequestOptions::get())
        .await
        .unwrap();

    assert_eq!(response(outcome).status(), 200);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("capacity=2"));
}

// ============================================================================
// Refresh and retry
// ============================================================================

#[tokio::test]
async fn test_expired_token_is_refreshed_and_request_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROOMS))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Given token not valid for any token type"
        })))
        .expect(1)
        .mount(&server)
        .await;

    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200).set_body_json(json!({ "access": "A2" })),
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path(ROOMS))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::with_tokens(Some("A1"), Some("R1")));
    let outcome = gateway(&server, &store)
        .request(ROOMS, RequestOptions::get())
        .await
        .unwrap();

    assert_eq!(response(outcome).status(), 200);
    assert_eq!(tokens(&store), (Some("A2".into()), Some("R1".into())));

    let requests = server.received_requests().await.unwrap();
    let refresh = requests
        .iter()
        .find(|r| r.url.path() == REFRESH)
        .unwrap();
    assert!(refresh.headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_retry_resends_method_and_body() {
    let server = MockServer::start().await;
    let body = json!({ "check_out": "2025-06-15" });

    Mock::given(method("PATCH"))
        .and(path("/api/v1/bookings/4/update/"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200).set_body_json(json!({ "access": "A2" })),
        1,
    )
    .await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/bookings/4/update/"))
        .and(header("authorization", "Bearer A2"))
        .and(body_json(&body))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::with_tokens(Some("A1"), Some("R1")));
    let outcome = gateway(&server, &store)
        .request(
            "/api/v1/bookings/4/update/",
            RequestOptions::patch().json(&body).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response(outcome).status(), 200);
}

#[tokio::test]
async fn test_failed_refresh_clears_tokens_and_reports_unauthenticated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROOMS))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(400).set_body_json(json!({
            "detail": "Token is invalid or expired",
            "code": "token_not_valid"
        })),
        1,
    )
    .await;

    let store = Arc::new(MemoryStore::with_tokens(Some("A1"), Some("R1")));
    let outcome = gateway(&server, &store)
        .request(ROOMS, RequestOptions::get())
        .await
        .unwrap();

    assert!(outcome.is_unauthenticated());
    assert!(outcome.into_response().is_none());
    assert_eq!(tokens(&store), (None, None));
}

#[tokio::test]
async fn test_unauthorized_without_refresh_token_is_passed_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Authentication credentials were not provided."
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(path(REFRESH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::with_tokens(Some("A1"), None));
    let outcome = gateway(&server, &store)
        .request("/api/v1/auth/me/", RequestOptions::get())
        .await
        .unwrap();

    let response = response(outcome);
    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Authentication credentials were not provided.");

    // The gateway does not clear anything when it cannot refresh.
    assert_eq!(tokens(&store), (Some("A1".into()), None));
}

#[tokio::test]
async fn test_refresh_token_without_access_token_still_refreshes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/bookings/"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/bookings/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200).set_body_json(json!({ "access": "A2" })),
        1,
    )
    .await;

    let store = Arc::new(MemoryStore::with_tokens(None, Some("R1")));
    let outcome = gateway(&server, &store)
        .request("/api/v1/bookings/", RequestOptions::get())
        .await
        .unwrap();

    assert_eq!(response(outcome).status(), 200);
    assert_eq!(tokens(&store), (Some("A2".into()), Some("R1".into())));
}

#[tokio::test]
async fn test_second_unauthorized_is_returned_without_another_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/bookings/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200).set_body_json(json!({ "access": "A2" })),
        1,
    )
    .await;

    let store = Arc::new(MemoryStore::with_tokens(Some("A1"), Some("R1")));
    let outcome = gateway(&server, &store)
        .request("/api/v1/bookings/", RequestOptions::get())
        .await
        .unwrap();

    assert_eq!(response(outcome).status(), 401);
    assert_eq!(tokens(&store), (Some("A2".into()), Some("R1".into())));
}

#[tokio::test]
async fn test_non_401_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/bookings/99/"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(path(REFRESH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::with_tokens(Some("A1"), Some("R1")));
    let outcome = gateway(&server, &store)
        .request("/api/v1/bookings/99/", RequestOptions::get())
        .await
        .unwrap();

    assert_eq!(response(outcome).status(), 403);
    assert_eq!(tokens(&store), (Some("A1".into()), Some("R1".into())));
}

#[tokio::test]
async fn test_repeated_successful_requests_leave_tokens_alone() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROOMS))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::with_tokens(Some("A1"), Some("R1")));
    let gateway = gateway(&server, &store);

    for _ in 0..2 {
        let outcome = gateway.request(ROOMS, RequestOptions::get()).await.unwrap();
        assert_eq!(response(outcome).status(), 200);
    }

    assert_eq!(tokens(&store), (Some("A1".into()), Some("R1".into())));
}

// ============================================================================
// refresh_access_token
// ============================================================================

#[tokio::test]
async fn test_refresh_without_refresh_token_makes_no_call() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::with_tokens(Some("A1"), None));
    let refreshed = gateway(&server, &store)
        .refresh_access_token()
        .await
        .unwrap();

    assert!(!refreshed);
    assert_eq!(tokens(&store), (Some("A1".into()), None));
}

#[tokio::test]
async fn test_refresh_replaces_only_access_token() {
    let server = MockServer::start().await;

    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200).set_body_json(json!({ "access": "A2", "refresh": "R2" })),
        1,
    )
    .await;

    let store = Arc::new(MemoryStore::with_tokens(Some("A1"), Some("R1")));
    let refreshed = gateway(&server, &store)
        .refresh_access_token()
        .await
        .unwrap();

    assert!(refreshed);
    assert_eq!(tokens(&store), (Some("A2".into()), Some("R1".into())));
}

#[tokio::test]
async fn test_rejected_refresh_keeps_tokens() {
    let server = MockServer::start().await;

    mount_refresh(&server, "R1", ResponseTemplate::new(401), 1).await;

    let store = Arc::new(MemoryStore::with_tokens(Some("A1"), Some("R1")));
    let refreshed = gateway(&server, &store)
        .refresh_access_token()
        .await
        .unwrap();

    assert!(!refreshed);
    assert_eq!(tokens(&store), (Some("A1".into()), Some("R1".into())));
}

#[tokio::test]
async fn test_malformed_refresh_response_counts_as_failure() {
    let server = MockServer::start().await;

    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200).set_body_string("<html>gateway error</html>"),
        1,
    )
    .await;

    let store = Arc::new(MemoryStore::with_tokens(Some("A1"), Some("R1")));
    let refreshed = gateway(&server, &store)
        .refresh_access_token()
        .await
        .unwrap();

    assert!(!refreshed);
    assert_eq!(tokens(&store), (Some("A1".into()), Some("R1".into())));
}

// ============================================================================
// Transport failures
// ============================================================================

#[tokio::test]
async fn test_refresh_timeout_is_treated_as_failed_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROOMS))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200)
            .set_body_json(json!({ "access": "A2" }))
            .set_delay(Duration::from_secs(5)),
        1,
    )
    .await;

    let store = Arc::new(MemoryStore::with_tokens(Some("A1"), Some("R1")));
    let gateway = Gateway::new(
        config(&server).with_timeout(Duration::from_millis(300)),
        store.clone(),
    )
    .unwrap();

    let outcome = gateway.request(ROOMS, RequestOptions::get()).await.unwrap();

    assert!(outcome.is_unauthenticated());
    assert_eq!(tokens(&store), (None, None));
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    // Nothing listens on the discard port.
    let config = ClientConfig::new(ApiUrl::new("http://127.0.0.1:9").unwrap());
    let store = Arc::new(MemoryStore::with_tokens(Some("A1"), Some("R1")));
    let gateway = Gateway::new(config, store.clone()).unwrap();

    let result = gateway.request(ROOMS, RequestOptions::get()).await;

    assert!(matches!(result, Err(Error::Transport(_))));
    assert_eq!(tokens(&store), (Some("A1".into()), Some("R1".into())));
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_unauthorized_requests_share_one_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROOMS))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(ROOMS))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200)
            .set_body_json(json!({ "access": "A2" }))
            .set_delay(Duration::from_millis(200)),
        1,
    )
    .await;

    let store = Arc::new(MemoryStore::with_tokens(Some("A1"), Some("R1")));
    let gateway = gateway(&server, &store);

    let outcomes = join_all(
        (0..4).map(|_| gateway.request(ROOMS, RequestOptions::get())),
    )
    .await;

    for outcome in outcomes {
        assert_eq!(response(outcome.unwrap()).status(), 200);
    }
    assert_eq!(tokens(&store), (Some("A2".into()), Some("R1".into())));
}

#[tokio::test]
async fn test_concurrent_requests_after_failed_refresh_are_unauthenticated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROOMS))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(401).set_delay(Duration::from_millis(200)),
        1,
    )
    .await;

    let store = Arc::new(MemoryStore::with_tokens(Some("A1"), Some("R1")));
    let gateway = gateway(&server, &store);

    let outcomes = join_all(
        (0..3).map(|_| gateway.request(ROOMS, RequestOptions::get())),
    )
    .await;

    for outcome in outcomes {
        assert!(outcome.unwrap().is_unauthenticated());
    }
    assert_eq!(tokens(&store), (None, None));
}

// ============================================================================
// Slow stores
// ============================================================================

/// Store whose first read blocks until the test opens the gate.
struct GatedStore {
    inner: MemoryStore,
    gate: Mutex<Option<mpsc::Receiver<()>>>,
}

impl CredentialStore for GatedStore {
    fn get(&self, slot: TokenSlot) -> hotelbook::Result<Option<String>> {
        if let Some(gate) = self.gate.lock().unwrap().take() {
            gate.recv_timeout(Duration::from_secs(5)).map_err(|e| {
                Error::from(StorageError::Io {
                    path: "gate".into(),
                    message: e.to_string(),
                })
            })?;
        }
        self.inner.get(slot)
    }

    fn set(&self, slot: TokenSlot, value: &str) -> hotelbook::Result<()> {
        self.inner.set(slot, value)
    }

    fn remove(&self, slot: TokenSlot) -> hotelbook::Result<()> {
        self.inner.remove(slot)
    }
}

#[tokio::test]
async fn test_blocking_store_does_not_stall_the_runtime() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROOMS))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (open, gate) = mpsc::channel();
    let store = Arc::new(GatedStore {
        inner: MemoryStore::with_tokens(Some("A1"), Some("R1")),
        gate: Mutex::new(Some(gate)),
    });
    let gateway = Gateway::new(config(&server), store).unwrap();

    // Runs on the same single-threaded runtime as the request below.
    let opener = tokio::spawn(async move {
        open.send(()).unwrap();
    });

    let outcome = gateway.request(ROOMS, RequestOptions::get()).await.unwrap();

    assert_eq!(response(outcome).status(), 200);
    opener.await.unwrap();
}
