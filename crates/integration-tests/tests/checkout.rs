//! Purchase card flow against the fake commerce API.

#![allow(clippy::unwrap_used)]

use databundle_integration_tests::{
    CHECKOUT_URL, REFUSED_MESSAGE, REFUSED_PRODUCT, TestContext, body_text,
};

const CARD: &str = "/shop/ama-data/products/y5";

#[tokio::test]
async fn test_htmx_purchase_redirects_to_gateway() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post_form(
            &format!("{CARD}/purchase"),
            &[("name", "Ama"), ("phone", "0241234567")],
            true,
        )
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get("hx-redirect")
            .and_then(|v| v.to_str().ok()),
        Some(CHECKOUT_URL)
    );

    let calls = ctx.api.requests_to("/purchase/initialize");
    assert_eq!(calls.len(), 1);
    let body = &calls[0].body;
    assert_eq!(body["phoneNumber"], "0241234567");
    assert_eq!(body["customerName"], "Ama");
    assert_eq!(body["productId"], "y5");
    assert_eq!(body["network"], "YELLO");
}

#[tokio::test]
async fn test_plain_purchase_is_see_other() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post_form(
            &format!("{CARD}/purchase"),
            &[("name", "Ama"), ("phone", "024 123 4567")],
            false,
        )
        .await;

    assert_eq!(response.status(), 303);
    assert_eq!(
        response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok()),
        Some(CHECKOUT_URL)
    );
}

#[tokio::test]
async fn test_short_phone_is_rejected_locally() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post_form(
            &format!("{CARD}/validate"),
            &[("name", "Ama"), ("phone", "024123")],
            true,
        )
        .await;
    assert_eq!(response.status(), 200);
    let html = body_text(response).await;
    assert!(html.contains("bundle-card--expanded"));
    assert!(html.contains("field-error"));

    // Confirming with the same input re-validates and still makes no call.
    let response = ctx
        .post_form(
            &format!("{CARD}/purchase"),
            &[("name", "Ama"), ("phone", "024123")],
            true,
        )
        .await;
    assert!(response.headers().get("hx-redirect").is_none());
    assert!(ctx.api.requests_to("/purchase/initialize").is_empty());
}

#[tokio::test]
async fn test_validate_shows_confirmation_with_cleaned_phone() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post_form(
            &format!("{CARD}/validate"),
            &[("name", "Ama"), ("phone", "024-123 4567")],
            true,
        )
        .await;
    let html = body_text(response).await;

    assert!(html.contains("bundle-card--confirming"));
    assert!(html.contains("value=\"0241234567\""));
    assert!(!html.contains("<html"), "HTMX requests get a fragment");
}

#[tokio::test]
async fn test_expand_and_close_card() {
    let ctx = TestContext::new().await;

    let html = body_text(ctx.htmx_get(&format!("{CARD}/card")).await).await;
    assert!(html.contains("name=\"phone\""));

    let html = body_text(ctx.htmx_get(&format!("{CARD}/close")).await).await;
    assert!(html.contains("bundle-card--closed"));
    assert!(html.contains("Buy now"));
}

#[tokio::test]
async fn test_edit_link_prefills_form() {
    let ctx = TestContext::new().await;

    let html = body_text(
        ctx.htmx_get(&format!("{CARD}/card?name=Ama&phone=0241234567"))
            .await,
    )
    .await;

    assert!(html.contains("bundle-card--expanded"));
    assert!(html.contains("value=\"Ama\""));
    assert!(html.contains("value=\"0241234567\""));
}

#[tokio::test]
async fn test_out_of_stock_bundle_cannot_be_bought() {
    let ctx = TestContext::new().await;

    let html = body_text(
        ctx.post_form(
            "/shop/ama-data/products/a3/validate",
            &[("name", "Ama"), ("phone", "0261234567")],
            true,
        )
        .await,
    )
    .await;

    assert!(html.contains("out of stock"));
    assert!(ctx.api.requests_to("/purchase/initialize").is_empty());
}

#[tokio::test]
async fn test_unknown_product_is_404() {
    let ctx = TestContext::new().await;
    let response = ctx.htmx_get("/shop/ama-data/products/nope/card").await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_refused_initialization_returns_card_to_form() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post_form(
            &format!("/shop/ama-data/products/{REFUSED_PRODUCT}/purchase"),
            &[("name", "Ama"), ("phone", "0201234567")],
            true,
        )
        .await;

    assert_eq!(response.status(), 200);
    assert!(response.headers().get("hx-redirect").is_none());
    let html = body_text(response).await;
    assert!(html.contains("bundle-card--expanded"));
    assert!(html.contains(REFUSED_MESSAGE));
    assert!(html.contains("value=\"0201234567\""));
    assert_eq!(ctx.api.requests_to("/purchase/initialize").len(), 1);
}
