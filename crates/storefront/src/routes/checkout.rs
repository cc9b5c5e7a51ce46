//! Purchase card route handlers.
//!
//! Each card is an HTMX fragment. HTTP is stateless, so every handler
//! rebuilds the card's state machine from the product and the submitted
//! form, drives it to the next state and renders the result. Confirming
//! re-validates the input before the payment is initialized.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use databundle_core::ProductId;
use databundle_core::checkout::{CheckoutCard, PurchaseForm};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::routes::store::{CardView, StoreView};
use crate::routes::{PageContext, is_htmx};
use crate::state::AppState;

/// Header telling HTMX to perform a full-page navigation.
const HX_REDIRECT: &str = "hx-redirect";

/// Card fragment (HTMX swaps).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_card.html")]
pub struct CardFragment {
    pub card: CardView,
}

/// Full page wrapping one card, for clients without HTMX.
#[derive(Template, WebTemplate)]
#[template(path = "store/card.html")]
pub struct CardPage {
    pub page: PageContext,
    pub store: StoreView,
    pub card: CardView,
}

/// Render a card as a fragment or, for plain form posts, a full page.
async fn render_card(
    state: &AppState,
    headers: &HeaderMap,
    page: PageContext,
    card: CardView,
) -> Response {
    if is_htmx(headers) {
        return CardFragment { card }.into_response();
    }

    let store = state.commerce().get_store(&card.slug).await.map_or_else(
        |_| StoreView::placeholder(&card.slug),
        |store| StoreView::from(&store),
    );
    CardPage { page, store, card }.into_response()
}

/// Expand a card. A prefilled form (the "edit" button on the confirmation
/// step) goes back from confirming with the entered values.
#[instrument(skip(state, headers, page, form), fields(slug = %slug, product_id = %id))]
pub async fn expand(
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
    Query(form): Query<PurchaseForm>,
    headers: HeaderMap,
    page: PageContext,
) -> Result<Response> {
    let product = state.commerce().get_product(&slug, &ProductId::new(id)).await?;
    let mut card = CheckoutCard::new(product);
    card.expand()?;

    let prefilled = !form.name.is_empty() || !form.phone.is_empty();
    if prefilled && card.submit(&form).is_ok() {
        card.back()?;
    }

    let view = CardView::new(&slug, &card, &form.name, &form.phone);
    Ok(render_card(&state, &headers, page, view).await)
}

/// Collapse a card.
#[instrument(skip(state, headers, page), fields(slug = %slug, product_id = %id))]
pub async fn close(
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
    headers: HeaderMap,
    page: PageContext,
) -> Result<Response> {
    let product = state.commerce().get_product(&slug, &ProductId::new(id)).await?;
    let mut card = CheckoutCard::new(product);
    card.close()?;

    let view = CardView::new(&slug, &card, "", "");
    Ok(render_card(&state, &headers, page, view).await)
}

/// Validate the card form and show the confirmation step, or the form again
/// with the error.
#[instrument(skip(state, headers, page, form), fields(slug = %slug, product_id = %id))]
pub async fn validate(
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
    headers: HeaderMap,
    page: PageContext,
    Form(form): Form<PurchaseForm>,
) -> Result<Response> {
    let product = state.commerce().get_product(&slug, &ProductId::new(id)).await?;
    let mut card = CheckoutCard::new(product);
    card.expand()?;

    if let Err(e) = card.submit(&form) {
        tracing::debug!(error = %e, "Card validation failed");
    }

    let view = CardView::new(&slug, &card, &form.name, &form.phone);
    Ok(render_card(&state, &headers, page, view).await)
}

/// Confirm the purchase: initialize the payment and send the browser to the
/// gateway's checkout page.
#[instrument(skip(state, headers, page, form), fields(slug = %slug, product_id = %id))]
pub async fn purchase(
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
    headers: HeaderMap,
    page: PageContext,
    Form(form): Form<PurchaseForm>,
) -> Result<Response> {
    let product = state.commerce().get_product(&slug, &ProductId::new(id)).await?;
    let mut card = CheckoutCard::new(product);
    card.expand()?;

    if card.submit(&form).is_err() {
        let view = CardView::new(&slug, &card, &form.name, &form.phone);
        return Ok(render_card(&state, &headers, page, view).await);
    }

    let request = card.confirm()?;
    add_breadcrumb(
        "checkout",
        "Purchase confirmed",
        Some(&[("slug", slug.as_str()), ("product_id", request.product_id.as_str())]),
    );

    let outcome = state
        .commerce()
        .initialize_purchase(&slug, &request)
        .await
        .map(|init| {
            tracing::info!(
                reference = ?init.reference.as_ref().map(ToString::to_string),
                "Payment initialized"
            );
            init.authorization_url
        })
        .map_err(|e| {
            tracing::warn!(error = %e, "Payment initialization failed");
            e.user_message()
        });

    match card.complete(outcome).map(str::to_owned) {
        Ok(url) => Ok(redirect_to_gateway(&headers, &url)),
        Err(_) => {
            let view = CardView::new(&slug, &card, &form.name, &form.phone);
            Ok(render_card(&state, &headers, page, view).await)
        }
    }
}

/// Full-page navigation to the payment gateway.
fn redirect_to_gateway(headers: &HeaderMap, url: &str) -> Response {
    if is_htmx(headers) {
        match HeaderValue::from_str(url) {
            Ok(value) => (StatusCode::OK, [(HX_REDIRECT, value)]).into_response(),
            Err(_) => StatusCode::BAD_GATEWAY.into_response(),
        }
    } else {
        Redirect::to(url).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_htmx_redirect_uses_header() {
        let mut headers = HeaderMap::new();
        headers.insert("hx-request", HeaderValue::from_static("true"));
        let response = redirect_to_gateway(&headers, "https://pay.example/abc");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("hx-redirect").and_then(|v| v.to_str().ok()),
            Some("https://pay.example/abc")
        );
    }

    #[test]
    fn test_plain_redirect_is_see_other() {
        let response = redirect_to_gateway(&HeaderMap::new(), "https://pay.example/abc");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").and_then(|v| v.to_str().ok()),
            Some("https://pay.example/abc")
        );
    }
}
