//! Integration tests for the data-bundle storefront.
//!
//! Each test starts two servers on ephemeral ports: a fake commerce API
//! (axum, canned fixtures, records every request body) and the real
//! storefront router pointed at it. Tests drive the storefront over HTTP with
//! a cookie-keeping `reqwest` client that does not follow redirects, so
//! `Location` and `HX-Redirect` headers can be asserted directly.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p databundle-integration-tests
//! ```
//!
//! # Fixtures
//!
//! Store `ama-data` sells:
//!
//! | id    | network    | size | price          |
//! |-------|------------|------|----------------|
//! | `y5`  | YELLO      | 5GB  | 25             |
//! | `y50` | YELLO      | 50GB | 180            |
//! | `t2`  | TELECEL    | 2GB  | 9 (sale: 8)    |
//! | `a3`  | AT_PREMIUM | 3GB  | 15 (no stock)  |
//! | `t1`  | TELECEL    | 1GB  | 5              |
//!
//! Initializing a purchase of `t1` is refused by the fake API. The listing
//! also carries `b1` on a network the storefront does not sell, which the
//! storefront must skip.
//!
//! Payment references select the verify response: `REF-OK` succeeds,
//! `REF-ODD` succeeds with oddly typed display fields,
//! `REF-PENDING` is a 404, `REF-HTML` is an HTML page and `REF-FAIL` is an
//! explicit failure. Any other store slug is a 404.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use databundle_storefront::config::{CommerceApiConfig, StorefrontConfig};
use databundle_storefront::state::AppState;
use serde::Deserialize;
use serde_json::{Value, json};

/// Store slug the fake API knows.
pub const STORE_SLUG: &str = "ama-data";

/// Checkout URL returned by the fake initialize endpoint.
pub const CHECKOUT_URL: &str = "https://checkout.example.test/pay/abc123";

/// Product whose purchase initialization the fake API refuses.
pub const REFUSED_PRODUCT: &str = "t1";

/// Message the fake API gives when refusing an initialization.
pub const REFUSED_MESSAGE: &str = "Bundle temporarily unavailable";

// =============================================================================
// Fake commerce API
// =============================================================================

/// A request the fake API received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub body: Value,
}

#[derive(Clone, Default)]
struct FakeState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeState {
    fn record(&self, path: String, body: Value) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest { path, body });
        }
    }
}

fn success(data: Value) -> Response {
    Json(json!({ "status": "success", "data": data })).into_response()
}

fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "status": "error", "message": message })),
    )
        .into_response()
}

fn store_fixture() -> Value {
    json!({
        "name": "Ama Data Hub",
        "slug": STORE_SLUG,
        "description": "Cheap bundles, delivered fast",
        "logo": "https://cdn.example.test/ama.png",
        "isVerified": true,
        "contactInfo": { "phone": "0241112222", "whatsapp": "0553334444" },
        "customization": { "primaryColor": "#0f766e", "secondaryColor": "#facc15" },
        "metrics": { "totalOrders": 120, "rating": 4.7 }
    })
}

fn products_fixture() -> Value {
    json!([
        { "_id": "y5", "network": "YELLO", "capacity": 5, "sellingPrice": 25 },
        { "_id": "y50", "network": "YELLO", "capacity": 50, "sellingPrice": 180 },
        { "_id": "t2", "network": "TELECEL", "capacity": 2, "sellingPrice": 9, "salePrice": 8 },
        { "_id": "a3", "network": "AT_PREMIUM", "capacity": 3, "sellingPrice": 15, "inStock": false },
        { "_id": "t1", "network": "TELECEL", "capacity": 1, "sellingPrice": 5 },
        { "_id": "b1", "network": "AT_BIGTIME", "capacity": 1, "sellingPrice": 4 }
    ])
}

fn orders_fixture() -> Value {
    json!([
        {
            "_id": "o1",
            "reference": "REF-OK",
            "phoneNumber": "0241234567",
            "product": { "network": "YELLO", "capacity": 5 },
            "amount": 25,
            "status": "completed",
            "createdAt": "2024-03-01T10:15:00Z"
        }
    ])
}

async fn fake_store(Path(slug): Path<String>) -> Response {
    if slug == STORE_SLUG {
        success(store_fixture())
    } else {
        not_found("Store not found")
    }
}

async fn fake_products(Path(slug): Path<String>) -> Response {
    if slug == STORE_SLUG {
        success(json!({ "products": products_fixture() }))
    } else {
        not_found("Store not found")
    }
}

async fn fake_initialize(
    State(state): State<FakeState>,
    Path(slug): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let refused = body["productId"] == REFUSED_PRODUCT;
    state.record(format!("/agent-stores/stores/{slug}/purchase/initialize"), body);
    if refused {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "status": "error", "message": REFUSED_MESSAGE })),
        )
            .into_response();
    }
    success(json!({ "authorizationUrl": CHECKOUT_URL, "reference": "REF-NEW" }))
}

#[derive(Deserialize)]
struct VerifyQuery {
    reference: String,
}

async fn fake_verify(Query(query): Query<VerifyQuery>) -> Response {
    match query.reference.as_str() {
        "REF-OK" => success(json!({
            "_id": "txn-1",
            "reference": "REF-OK",
            "phoneNumber": "0241234567",
            "network": "YELLO",
            "capacity": 5,
            "amount": 25,
            "status": "completed"
        })),
        "REF-ODD" => success(json!({
            "_id": 4412,
            "reference": "REF-ODD",
            "network": "MTN",
            "capacity": "5GB",
            "amount": "25",
            "status": "completed",
            "createdAt": "2024-03-01 10:15:00"
        })),
        "REF-HTML" => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            "<html><body>Gateway maintenance</body></html>",
        )
            .into_response(),
        "REF-FAIL" => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "status": "error", "message": "Card declined by issuer" })),
        )
            .into_response(),
        _ => not_found("Transaction not found"),
    }
}

async fn fake_order_search(
    State(state): State<FakeState>,
    Path(slug): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    state.record(format!("/agent-stores/stores/{slug}/orders/search"), body.clone());
    if body.get("phoneNumber").is_some() || body["reference"] == "REF-OK" {
        success(json!({ "orders": orders_fixture() }))
    } else {
        not_found("No orders found")
    }
}

async fn fake_momo_track(State(state): State<FakeState>, Json(body): Json<Value>) -> Response {
    state.record("/momo-purchase/track".to_string(), body);
    success(orders_fixture())
}

async fn fake_join_info(Path(slug): Path<String>) -> Response {
    if slug == STORE_SLUG {
        success(json!({
            "storeName": "Ama Data Hub",
            "description": "Resell bundles at agent prices",
            "benefits": ["Agent pricing", "Daily payouts"],
            "registrationFee": 50
        }))
    } else {
        not_found("Store not found")
    }
}

async fn fake_apply(
    State(state): State<FakeState>,
    Path(slug): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    state.record(format!("/sub-agent/store/{slug}/apply"), body);
    Json(json!({ "status": "success", "message": "Application received" })).into_response()
}

/// In-process stand-in for the commerce API.
pub struct FakeApi {
    pub url: String,
    state: FakeState,
}

impl FakeApi {
    /// Start the fake API on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let state = FakeState::default();
        let app = Router::new()
            .route("/agent-stores/store/{slug}", get(fake_store))
            .route("/agent-stores/stores/{slug}/products", get(fake_products))
            .route(
                "/agent-stores/stores/{slug}/purchase/initialize",
                post(fake_initialize),
            )
            .route("/agent-stores/stores/{slug}/payment/verify", get(fake_verify))
            .route(
                "/agent-stores/stores/{slug}/orders/search",
                post(fake_order_search),
            )
            .route("/momo-purchase/track", post(fake_momo_track))
            .route("/sub-agent/store/{slug}/join-info", get(fake_join_info))
            .route("/sub-agent/store/{slug}/apply", post(fake_apply))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake API");
        let addr = listener.local_addr().expect("Fake API has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    /// Every request body recorded so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Recorded requests whose path ends with `suffix`.
    #[must_use]
    pub fn requests_to(&self, suffix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.ends_with(suffix))
            .collect()
    }
}

// =============================================================================
// Test context
// =============================================================================

/// A running storefront wired to a fresh fake API.
pub struct TestContext {
    pub api: FakeApi,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestContext {
    /// Start the fake API and a storefront pointed at it.
    ///
    /// # Panics
    ///
    /// Panics if either server cannot start.
    pub async fn new() -> Self {
        let api = FakeApi::start().await;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind storefront");
        let addr = listener.local_addr().expect("Storefront has no address");
        let base_url = format!("http://{addr}");

        let config = StorefrontConfig {
            host: addr.ip(),
            port: addr.port(),
            base_url: base_url.clone(),
            commerce: CommerceApiConfig::with_base_url(&api.url)
                .expect("Fake API URL is valid"),
            support_whatsapp: Some("0209998888".to_string()),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let state = AppState::new(config).expect("Failed to build state");
        let app = databundle_storefront::app(state);

        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .ok();
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to build client");

        Self {
            api,
            base_url,
            client,
        }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET` a storefront path.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed")
    }

    /// `GET` a storefront path as HTMX would.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn htmx_get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .header("hx-request", "true")
            .send()
            .await
            .expect("GET failed")
    }

    /// `POST` a form to a storefront path, optionally as HTMX.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
        htmx: bool,
    ) -> reqwest::Response {
        let mut request = self.client.post(self.url(path)).form(form);
        if htmx {
            request = request.header("hx-request", "true");
        }
        request.send().await.expect("POST failed")
    }
}

/// Response body as text.
///
/// # Panics
///
/// Panics if the body cannot be read.
pub async fn body_text(response: reqwest::Response) -> String {
    response.text().await.expect("Failed to read body")
}
