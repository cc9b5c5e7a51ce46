//! Single-shot payment verification pages.

#![allow(clippy::unwrap_used)]

use databundle_integration_tests::{TestContext, body_text};

async fn verify_page(ctx: &TestContext, query: &str) -> (u16, String) {
    let response = ctx
        .get(&format!("/shop/ama-data/payment/verify?{query}"))
        .await;
    let status = response.status().as_u16();
    (status, body_text(response).await)
}

#[tokio::test]
async fn test_confirmed_payment_shows_summary() {
    let ctx = TestContext::new().await;
    let (status, html) = verify_page(&ctx, "reference=REF-OK").await;

    assert_eq!(status, 200);
    assert!(html.contains("Payment successful"));
    assert!(html.contains("MTN 5GB"));
    assert!(html.contains("0241234567"));
    assert!(html.contains("/shop/ama-data/orders?q=REF-OK"));
}

#[tokio::test]
async fn test_odd_summary_fields_still_show_success() {
    let ctx = TestContext::new().await;
    let (status, html) = verify_page(&ctx, "reference=REF-ODD").await;

    assert_eq!(status, 200);
    assert!(html.contains("Payment successful"));
    assert!(!html.contains("Payment failed"));
    assert!(html.contains("GH₵25.00"));
}

#[tokio::test]
async fn test_order_search_offers_last_verified_payment() {
    let ctx = TestContext::new().await;
    verify_page(&ctx, "reference=REF-OK").await;

    let html = body_text(ctx.get("/shop/ama-data/orders").await).await;
    assert!(html.contains("Your last payment"));
    assert!(html.contains("?q=REF-OK"));
}

#[tokio::test]
async fn test_not_found_is_processing_not_failed() {
    let ctx = TestContext::new().await;
    let (status, html) = verify_page(&ctx, "reference=REF-PENDING").await;

    assert_eq!(status, 200);
    assert!(html.contains("Payment is processing"));
    assert!(!html.contains("Payment failed"));
}

#[tokio::test]
async fn test_html_response_is_processing() {
    let ctx = TestContext::new().await;
    let (_, html) = verify_page(&ctx, "reference=REF-HTML").await;

    assert!(html.contains("Payment is processing"));
    assert!(!html.contains("Payment failed"));
}

#[tokio::test]
async fn test_explicit_failure_lists_causes_and_support() {
    let ctx = TestContext::new().await;
    let (_, html) = verify_page(&ctx, "reference=REF-FAIL").await;

    assert!(html.contains("Payment failed"));
    assert!(html.contains("Card declined by issuer"));
    assert!(html.contains("Insufficient balance"));
    // Store's WhatsApp number wins over the platform one.
    assert!(html.contains("https://wa.me/233553334444"));
}

#[tokio::test]
async fn test_trxref_with_suffix_is_accepted() {
    let ctx = TestContext::new().await;
    let (_, html) = verify_page(&ctx, "trxref=REF-OK:1700000000").await;

    assert!(html.contains("Payment successful"));
}

#[tokio::test]
async fn test_missing_reference_fails() {
    let ctx = TestContext::new().await;
    let (_, html) = verify_page(&ctx, "").await;

    assert!(html.contains("Payment failed"));
    assert!(html.contains("No payment reference was supplied"));
}
