//! Commerce API client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`; every response uses the
//!   `{ status, data, message }` envelope
//! - The commerce API is the source of truth: no local persistence
//! - Store profiles and catalogs are cached in `moka` (60 second TTL by
//!   default); purchases, verification and searches are never cached
//! - No automatic retries
//!
//! # Example
//!
//! ```rust,ignore
//! use databundle_storefront::commerce::CommerceClient;
//!
//! let client = CommerceClient::new(&config.commerce)?;
//! let store = client.get_store("ama-data").await?;
//! let products = client.get_products(&store.slug).await?;
//! ```

mod cache;

use std::sync::Arc;

use databundle_core::checkout::PurchaseRequest;
use databundle_core::signup::SignupApplication;
use databundle_core::verification::VerificationOutcome;
use databundle_core::lenient::decode_each;
use databundle_core::{
    ApiEnvelope, JoinInfo, Listing, Order, OrderLookup, PaymentReference, Product, ProductId,
    Store,
};
use moka::future::Cache;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::CommerceApiConfig;

use cache::{CacheKey, CacheValue};

/// Longest slice of an upstream body copied into logs and errors.
const BODY_SNIPPET_LEN: usize = 200;

/// Errors that can occur when talking to the commerce API.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code.
    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Envelope reported an error.
    #[error("API error: {0}")]
    Api(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CommerceError {
    /// Message safe to show next to a form.
    ///
    /// Messages written by the API are passed through; transport and parse
    /// details are not.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(message) | Self::Status { message, .. } if !message.trim().is_empty() => {
                message.clone()
            }
            Self::NotFound(_) => "That item is no longer available".to_string(),
            _ => "We could not reach the payment service. Please try again.".to_string(),
        }
    }
}

/// Successful purchase initialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInitialization {
    /// Hosted checkout page to send the customer to.
    #[serde(default)]
    pub authorization_url: String,
    /// Payment reference, echoed back on return.
    #[serde(default)]
    pub reference: Option<PaymentReference>,
}

/// Order search and tracking answer with a list, a wrapped list or a single
/// transaction depending on the endpoint.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OrderResults {
    Many(Listing<Value>),
    One(Value),
}

impl OrderResults {
    fn into_values(self) -> Vec<Value> {
        match self {
            Self::Many(listing) => listing.into_vec(),
            Self::One(order) => vec![order],
        }
    }
}

/// Decode list entries one by one, dropping (and logging) those that do not
/// decode so one odd record never hides the rest.
fn decode_listing<T: DeserializeOwned>(items: Vec<Value>, what: &'static str) -> Vec<T> {
    let (decoded, skipped) = decode_each(items);
    if skipped > 0 {
        warn!(skipped, kind = what, "Skipped unreadable records");
    }
    decoded
}

// =============================================================================
// CommerceClient
// =============================================================================

/// Client for the commerce REST API.
#[derive(Clone)]
pub struct CommerceClient {
    inner: Arc<CommerceClientInner>,
}

struct CommerceClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl CommerceClient {
    /// Create a new commerce API client.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Http` if the HTTP client cannot be built.
    pub fn new(config: &CommerceApiConfig) -> Result<Self, CommerceError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("databundle-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(CommerceClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    // =========================================================================
    // Stores and catalog (cached)
    // =========================================================================

    /// Get a store's public profile.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` for unknown slugs.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_store(&self, slug: &str) -> Result<Store, CommerceError> {
        let cache_key = CacheKey::Store(slug.to_string());

        if let Some(CacheValue::Store(store)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for store");
            return Ok(*store);
        }

        let url = self.url(&format!("/agent-stores/store/{}", encode(slug)));
        let store: Store = self.get_json(&url, slug).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Store(Box::new(store.clone())))
            .await;

        Ok(store)
    }

    /// Get every product a store sells, in API order.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError` if the request or decoding fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_products(&self, slug: &str) -> Result<Arc<Vec<Product>>, CommerceError> {
        let cache_key = CacheKey::Products(slug.to_string());

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let url = self.url(&format!("/agent-stores/stores/{}/products", encode(slug)));
        let listing: Listing<Value> = self.get_json(&url, slug).await?;
        let products = Arc::new(decode_listing::<Product>(listing.into_vec(), "product"));

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(Arc::clone(&products)))
            .await;

        Ok(products)
    }

    /// Find one product in a store's catalog.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` if the store does not sell it.
    pub async fn get_product(&self, slug: &str, id: &ProductId) -> Result<Product, CommerceError> {
        self.get_products(slug)
            .await?
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| CommerceError::NotFound(format!("product {id}")))
    }

    /// Drop cached data for a store.
    pub async fn invalidate_store(&self, slug: &str) {
        self.inner
            .cache
            .invalidate(&CacheKey::Store(slug.to_string()))
            .await;
        self.inner
            .cache
            .invalidate(&CacheKey::Products(slug.to_string()))
            .await;
    }

    // =========================================================================
    // Payments (never cached)
    // =========================================================================

    /// Start a payment and get the hosted checkout URL.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError` on any failure, including a success envelope
    /// without a usable authorization URL.
    #[instrument(
        skip(self, request),
        fields(slug = %slug, product_id = %request.product_id, phone = %request.phone.masked())
    )]
    pub async fn initialize_purchase(
        &self,
        slug: &str,
        request: &PurchaseRequest,
    ) -> Result<PaymentInitialization, CommerceError> {
        let url = self.url(&format!(
            "/agent-stores/stores/{}/purchase/initialize",
            encode(slug)
        ));
        let response = self.inner.client.post(&url).json(request).send().await?;
        let init: PaymentInitialization = decode_response(response, slug).await?;

        if !is_http_url(&init.authorization_url) {
            return Err(CommerceError::Api(
                "Payment provider returned no checkout link".to_string(),
            ));
        }

        Ok(init)
    }

    /// Ask the API whether a payment went through.
    ///
    /// Never fails: transport errors and ambiguous answers are reported as
    /// `Processing`.
    #[instrument(skip(self), fields(slug = %slug, reference = %reference))]
    pub async fn verify_payment(
        &self,
        slug: &str,
        reference: &PaymentReference,
    ) -> VerificationOutcome {
        let url = self.url(&format!(
            "/agent-stores/stores/{}/payment/verify",
            encode(slug)
        ));
        let response = match self
            .inner
            .client
            .get(&url)
            .query(&[("reference", reference.as_str())])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Verify request failed");
                return VerificationOutcome::transport_error();
            }
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Failed to read verify response");
                return VerificationOutcome::transport_error();
            }
        };

        let outcome = VerificationOutcome::classify(status, content_type.as_deref(), &body);
        debug!(status, outcome = outcome.name(), "Payment verification classified");
        outcome
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Search a store's orders by phone number or reference.
    ///
    /// A 404 means nothing matched and yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError` if the request or decoding fails.
    #[instrument(skip(self, lookup), fields(slug = %slug, lookup = %lookup.log_label()))]
    pub async fn search_orders(
        &self,
        slug: &str,
        lookup: &OrderLookup,
    ) -> Result<Vec<Order>, CommerceError> {
        let url = self.url(&format!("/agent-stores/stores/{}/orders/search", encode(slug)));
        self.post_order_lookup(&url, lookup).await
    }

    /// Track a mobile-money purchase across all stores.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError` if the request or decoding fails.
    #[instrument(skip(self, lookup), fields(lookup = %lookup.log_label()))]
    pub async fn track_momo(&self, lookup: &OrderLookup) -> Result<Vec<Order>, CommerceError> {
        let url = self.url("/momo-purchase/track");
        self.post_order_lookup(&url, lookup).await
    }

    async fn post_order_lookup(
        &self,
        url: &str,
        lookup: &OrderLookup,
    ) -> Result<Vec<Order>, CommerceError> {
        let response = self
            .inner
            .client
            .post(url)
            .json(&lookup.to_request_body())
            .send()
            .await?;

        match decode_response::<OrderResults>(response, "orders").await {
            Ok(results) => Ok(decode_listing(results.into_values(), "order")),
            Err(CommerceError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    // =========================================================================
    // Resellers
    // =========================================================================

    /// Reseller programme details for a store.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError` if the request or decoding fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn join_info(&self, slug: &str) -> Result<JoinInfo, CommerceError> {
        let url = self.url(&format!("/sub-agent/store/{}/join-info", encode(slug)));
        self.get_json(&url, slug).await
    }

    /// Submit a reseller application. Returns the API's confirmation message.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError` if the API rejects the application.
    #[instrument(
        skip(self, application),
        fields(slug = %slug, phone = %application.phone.masked())
    )]
    pub async fn apply_reseller(
        &self,
        slug: &str,
        application: &SignupApplication,
    ) -> Result<Option<String>, CommerceError> {
        let url = self.url(&format!("/sub-agent/store/{}/apply", encode(slug)));
        let response = self
            .inner
            .client
            .post(&url)
            .json(&application.to_request_body())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let envelope: ApiEnvelope<serde_json::Value> = parse_envelope(status, &body, slug)?;
        if envelope.is_success() {
            Ok(envelope.message)
        } else {
            Err(CommerceError::Api(
                envelope
                    .message
                    .unwrap_or_else(|| "Application was not accepted".to_string()),
            ))
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        what: &str,
    ) -> Result<T, CommerceError> {
        let response = self.inner.client.get(url).send().await?;
        decode_response(response, what).await
    }
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

fn is_http_url(value: &str) -> bool {
    url::Url::parse(value).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
    what: &str,
) -> Result<T, CommerceError> {
    let status = response.status();
    let body = response.text().await?;
    decode_envelope(status, &body, what)
}

/// Parse an envelope, mapping HTTP failures to errors.
fn parse_envelope<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
    what: &str,
) -> Result<ApiEnvelope<T>, CommerceError> {
    if status == StatusCode::NOT_FOUND {
        return Err(CommerceError::NotFound(what.to_string()));
    }

    match serde_json::from_str::<ApiEnvelope<T>>(body) {
        Ok(envelope) if status.is_success() => Ok(envelope),
        Ok(envelope) => Err(CommerceError::Status {
            status: status.as_u16(),
            message: envelope.message.unwrap_or_default(),
        }),
        Err(e) if status.is_success() => {
            tracing::error!(
                error = %e,
                body = %snippet(body),
                "Failed to parse commerce API response"
            );
            Err(CommerceError::Parse(e))
        }
        Err(_) => {
            tracing::error!(
                status = %status,
                body = %snippet(body),
                "Commerce API returned non-success status"
            );
            Err(CommerceError::Status {
                status: status.as_u16(),
                message: String::new(),
            })
        }
    }
}

/// Parse an envelope and take its payload.
fn decode_envelope<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
    what: &str,
) -> Result<T, CommerceError> {
    parse_envelope(status, body, what)?
        .into_data()
        .map_err(CommerceError::Api)
}

fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_LEN).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_commerce_error_display() {
        let err = CommerceError::NotFound("ama-data".to_string());
        assert_eq!(err.to_string(), "Not found: ama-data");

        let err = CommerceError::Status {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API returned 500: boom");
    }

    #[test]
    fn test_user_message_passes_api_text_through() {
        let err = CommerceError::Api("Bundle unavailable".to_string());
        assert_eq!(err.user_message(), "Bundle unavailable");

        let err = CommerceError::Status {
            status: 502,
            message: String::new(),
        };
        assert!(err.user_message().contains("try again"));
    }

    #[test]
    fn test_decode_success_envelope() {
        let body = r#"{"status":"success","data":{"name":"Ama Data","slug":"ama-data"}}"#;
        let store: Store = decode_envelope(StatusCode::OK, body, "ama-data").unwrap();
        assert_eq!(store.name, "Ama Data");
    }

    #[test]
    fn test_decode_404_is_not_found() {
        let err = decode_envelope::<Store>(StatusCode::NOT_FOUND, "<html>", "x").unwrap_err();
        assert!(matches!(err, CommerceError::NotFound(_)));
    }

    #[test]
    fn test_decode_error_status_keeps_message() {
        let body = r#"{"status":"error","message":"Store suspended"}"#;
        let err = decode_envelope::<Store>(StatusCode::FORBIDDEN, body, "x").unwrap_err();
        assert_eq!(err.user_message(), "Store suspended");
    }

    #[test]
    fn test_decode_error_envelope_on_200() {
        let body = r#"{"status":"error","message":"Out of stock"}"#;
        let err = decode_envelope::<Store>(StatusCode::OK, body, "x").unwrap_err();
        assert!(matches!(err, CommerceError::Api(ref m) if m == "Out of stock"));
    }

    #[test]
    fn test_decode_garbage_on_200_is_parse_error() {
        let err = decode_envelope::<Store>(StatusCode::OK, "not json", "x").unwrap_err();
        assert!(matches!(err, CommerceError::Parse(_)));
    }

    #[test]
    fn test_order_results_accept_every_shape() {
        let order = r#"{"_id":"o1","reference":"R1","phoneNumber":"0241234567","amount":5}"#;

        let bare: OrderResults = serde_json::from_str(&format!("[{order}]")).unwrap();
        assert_eq!(bare.into_values().len(), 1);

        let wrapped: OrderResults =
            serde_json::from_str(&format!(r#"{{"orders":[{order},{order}]}}"#)).unwrap();
        assert_eq!(wrapped.into_values().len(), 2);

        let single: OrderResults = serde_json::from_str(order).unwrap();
        let orders: Vec<Order> = decode_listing(single.into_values(), "order");
        assert_eq!(orders[0].reference.as_str(), "R1");
    }

    #[test]
    fn test_unknown_network_skips_only_that_product() {
        let body = r#"{"status":"success","data":{"products":[
            {"_id":"y5","network":"YELLO","capacity":5,"sellingPrice":25},
            {"_id":"b1","network":"AT_BIGTIME","capacity":1,"sellingPrice":4}
        ]}}"#;
        let listing: Listing<Value> = decode_envelope(StatusCode::OK, body, "x").unwrap();
        let products: Vec<Product> = decode_listing(listing.into_vec(), "product");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id.as_str(), "y5");
    }

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode("ama data/../x"), "ama%20data%2F..%2Fx");
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://checkout.example.com/pay/abc"));
        assert!(!is_http_url("javascript:alert(1)"));
        assert!(!is_http_url(""));
    }
}
