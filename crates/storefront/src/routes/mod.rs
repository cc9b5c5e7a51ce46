//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                     - Last visited store, or store finder
//! GET  /health                               - Health check
//!
//! # Store
//! GET  /shop/{slug}                          - Catalog (?network=&q=&sort=)
//! GET  /shop/{slug}/orders                   - Order search (?q=)
//! GET  /shop/{slug}/payment/verify           - Payment result (?reference= or ?trxref=)
//!
//! # Purchase card (HTMX fragments)
//! GET  /shop/{slug}/products/{id}/card       - Expand card
//! GET  /shop/{slug}/products/{id}/close      - Collapse card
//! POST /shop/{slug}/products/{id}/validate   - Validate name/phone, show confirmation
//! POST /shop/{slug}/products/{id}/purchase   - Initialize payment, redirect to gateway
//!
//! # Resellers
//! GET  /shop/{slug}/join                     - Join info and application form
//! POST /shop/{slug}/join                     - Submit application
//!
//! # Tracking and preferences
//! GET  /track                                - Mobile-money purchase tracking (?q=)
//! POST /preferences/theme                    - Toggle light/dark theme
//! ```

pub mod checkout;
pub mod home;
pub mod orders;
pub mod payment;
pub mod preferences;
pub mod reseller;
pub mod store;

use axum::{
    Router,
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, request::Parts},
    routing::{get, post},
};
use tower_sessions::Session;

use crate::middleware::{PageNonce, checkout_rate_limiter, signup_rate_limiter};
use crate::models::session as visitor;
use crate::state::AppState;

// =============================================================================
// Page Context
// =============================================================================

/// Per-request data every full page needs: theme, CSP nonce and the current
/// location (for the theme toggle to return to).
#[derive(Debug, Clone)]
pub struct PageContext {
    pub theme: String,
    pub nonce: String,
    pub path: String,
}

impl Default for PageContext {
    fn default() -> Self {
        Self {
            theme: visitor::Theme::default().as_str().to_string(),
            nonce: String::new(),
            path: "/".to_string(),
        }
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        let nonce = parts
            .extensions
            .get::<PageNonce>()
            .map(|n| n.as_str().to_string())
            .unwrap_or_default();
        let path = parts
            .uri
            .path_and_query()
            .map_or_else(|| "/".to_string(), |pq| pq.as_str().to_string());

        Ok(Self {
            theme: visitor::theme(&session).await.as_str().to_string(),
            nonce,
            path,
        })
    }
}

/// Whether the request was issued by HTMX.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

// =============================================================================
// Routers
// =============================================================================

/// Create the purchase card routes router.
pub fn card_routes() -> Router<AppState> {
    Router::new()
        .route("/card", get(checkout::expand))
        .route("/close", get(checkout::close))
        .merge(
            Router::new()
                .route("/validate", post(checkout::validate))
                .route("/purchase", post(checkout::purchase))
                .layer(checkout_rate_limiter()),
        )
}

/// Create the store routes router.
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(store::show))
        .route("/orders", get(orders::search))
        .route("/payment/verify", get(payment::verify))
        .route(
            "/join",
            get(reseller::join_page).merge(post(reseller::apply).layer(signup_rate_limiter())),
        )
        .nest("/products/{id}", card_routes())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(home::health))
        .nest("/shop/{slug}", store_routes())
        .route("/track", get(orders::track))
        .route("/preferences/theme", post(preferences::toggle_theme))
}
