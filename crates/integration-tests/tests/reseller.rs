//! Reseller join page and application.

#![allow(clippy::unwrap_used)]

use databundle_integration_tests::{TestContext, body_text};

const JOIN: &str = "/shop/ama-data/join";

fn valid_form<'a>() -> Vec<(&'a str, &'a str)> {
    vec![
        ("full_name", "Kwame Mensah"),
        ("email", "kwame@example.com"),
        ("phone", "024 123 4567"),
        ("business_name", ""),
        ("password", "s3cret!"),
        ("confirm_password", "s3cret!"),
    ]
}

#[tokio::test]
async fn test_join_page_shows_programme() {
    let ctx = TestContext::new().await;
    let html = body_text(ctx.get(JOIN).await).await;

    assert!(html.contains("Sell data with Ama Data Hub"));
    assert!(html.contains("Daily payouts"));
    assert!(html.contains("GH₵50.00"));
}

#[tokio::test]
async fn test_invalid_application_shows_field_errors() {
    let ctx = TestContext::new().await;
    let response = ctx
        .post_form(
            JOIN,
            &[
                ("full_name", ""),
                ("email", "kwame@localhost"),
                ("phone", "12345"),
                ("password", "abc"),
                ("confirm_password", "abd"),
            ],
            false,
        )
        .await;

    assert_eq!(response.status(), 422);
    let html = body_text(response).await;
    assert!(html.contains("Full name is required"));
    assert!(html.contains("Enter a valid email address"));
    assert!(html.contains("Enter a valid 10-digit phone number"));
    assert!(html.contains("Password must be at least 6 characters"));
    assert!(html.contains("Passwords do not match"));
    assert!(html.contains("value=\"kwame@localhost\""));
    assert!(ctx.api.requests_to("/apply").is_empty());
}

#[tokio::test]
async fn test_successful_application_never_echoes_password() {
    let ctx = TestContext::new().await;
    let response = ctx.post_form(JOIN, &valid_form(), false).await;

    assert_eq!(response.status(), 200);
    let html = body_text(response).await;
    assert!(html.contains("Thanks, Kwame Mensah"));
    assert!(html.contains("Application received"));
    assert!(!html.contains("s3cret!"));

    let calls = ctx.api.requests_to("/apply");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].body["phoneNumber"], "0241234567");
    assert_eq!(calls[0].body["password"], "s3cret!");

    // The session remembers the application, not the password.
    let html = body_text(ctx.get(JOIN).await).await;
    assert!(html.contains("already applied"));
    assert!(!html.contains("s3cret!"));
}
