//! Order search and mobile-money tracking.

#![allow(clippy::unwrap_used)]

use databundle_integration_tests::{TestContext, body_text};

#[tokio::test]
async fn test_search_by_phone_sends_phone_number() {
    let ctx = TestContext::new().await;
    let html = body_text(ctx.get("/shop/ama-data/orders?q=024%20123%204567").await).await;

    assert!(html.contains("REF-OK"));
    assert!(html.contains("Completed"));
    let calls = ctx.api.requests_to("/orders/search");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].body["phoneNumber"], "0241234567");
}

#[tokio::test]
async fn test_unknown_reference_shows_no_results() {
    let ctx = TestContext::new().await;
    let response = ctx.get("/shop/ama-data/orders?q=REF-NONE").await;

    assert_eq!(response.status(), 200);
    let html = body_text(response).await;
    assert!(html.contains("No orders found"));
    assert_eq!(
        ctx.api.requests_to("/orders/search")[0].body["reference"],
        "REF-NONE"
    );
}

#[tokio::test]
async fn test_blank_query_is_rejected_without_api_call() {
    let ctx = TestContext::new().await;
    let html = body_text(ctx.get("/shop/ama-data/orders?q=+").await).await;

    assert!(html.contains("Enter a phone number or payment reference"));
    assert!(ctx.api.requests_to("/orders/search").is_empty());
}

#[tokio::test]
async fn test_momo_tracking() {
    let ctx = TestContext::new().await;
    let html = body_text(ctx.get("/track?q=REF-OK").await).await;

    assert!(html.contains("MTN 5GB"));
    let calls = ctx.api.requests_to("/momo-purchase/track");
    assert_eq!(calls[0].body["reference"], "REF-OK");
}
