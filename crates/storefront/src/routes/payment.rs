//! Payment verification route handler.
//!
//! The payment gateway sends the customer back here with `?reference=` (or
//! `?trxref=`). The verify endpoint is called once; an answer that only
//! means "not propagated yet" shows a come-back-later page instead of a
//! failure.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use databundle_core::PaymentReference;
use databundle_core::verification::{FAILURE_CAUSES, VerificationOutcome};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::session as visitor;
use crate::routes::PageContext;
use crate::routes::store::StoreView;
use crate::state::AppState;

/// Query parameters appended by the payment gateway.
#[derive(Debug, Default, Deserialize)]
pub struct VerifyParams {
    pub reference: Option<String>,
    pub trxref: Option<String>,
}

impl VerifyParams {
    /// The reference, preferring `reference` over `trxref`.
    #[must_use]
    pub fn payment_reference(&self) -> Option<PaymentReference> {
        [self.reference.as_deref(), self.trxref.as_deref()]
            .into_iter()
            .flatten()
            .find_map(PaymentReference::from_query)
    }
}

/// Verification result template.
#[derive(Template, WebTemplate)]
#[template(path = "payment/verify.html")]
pub struct VerifyTemplate {
    pub page: PageContext,
    pub store: StoreView,
    /// `success`, `processing` or `failed`.
    pub outcome: String,
    pub reference: String,
    pub message: String,
    pub amount: String,
    pub bundle: String,
    pub phone: String,
    pub status_label: String,
    pub causes: Vec<&'static str>,
    pub support_url: String,
}

/// Verify a payment and show the result.
#[instrument(skip(state, session, page, params), fields(slug = %slug))]
pub async fn verify(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<VerifyParams>,
    session: Session,
    page: PageContext,
) -> Result<VerifyTemplate> {
    let reference = params.payment_reference();
    let outcome = match &reference {
        Some(reference) => state.commerce().verify_payment(&slug, reference).await,
        None => VerificationOutcome::missing_reference(),
    };
    tracing::info!(
        reference = ?reference.as_ref().map(PaymentReference::as_str),
        outcome = outcome.name(),
        "Payment verification"
    );

    // Branding only; a store lookup failure must not hide the payment result.
    let store = state.commerce().get_store(&slug).await.map_or_else(
        |e| {
            tracing::warn!(error = %e, "Store lookup failed on verify page");
            StoreView::placeholder(&slug)
        },
        |store| StoreView::from(&store),
    );

    let support_url = if store.whatsapp_url.is_empty() {
        state.support_whatsapp_url().unwrap_or_default()
    } else {
        store.whatsapp_url.clone()
    };

    let mut view = VerifyTemplate {
        page,
        store,
        outcome: outcome.name().to_string(),
        reference: reference.as_ref().map(ToString::to_string).unwrap_or_default(),
        message: String::new(),
        amount: String::new(),
        bundle: String::new(),
        phone: String::new(),
        status_label: String::new(),
        causes: Vec::new(),
        support_url,
    };

    match outcome {
        VerificationOutcome::Success(summary) => {
            // The reference is what order tracking can look up.
            let transaction_id = [
                summary.reference.as_deref(),
                Some(view.reference.as_str()),
                summary.id.as_deref(),
            ]
            .into_iter()
            .flatten()
            .find(|id| !id.is_empty())
            .unwrap_or_default()
            .to_string();
            if !transaction_id.is_empty() {
                visitor::set_last_transaction_id(&session, &transaction_id).await?;
            }
            // A sale can change stock and store metrics.
            state.commerce().invalidate_store(&slug).await;
            add_breadcrumb(
                "payment",
                "Payment verified",
                Some(&[("slug", slug.as_str()), ("transaction_id", transaction_id.as_str())]),
            );

            view.amount = summary.amount_label();
            view.bundle = summary.bundle_label().unwrap_or_default();
            view.phone = summary.phone_number.clone().unwrap_or_default();
            view.status_label = summary.status.label().to_string();
            if let Some(reference) = summary.reference {
                view.reference = reference;
            }
        }
        VerificationOutcome::Processing => {}
        VerificationOutcome::Failed(message) => {
            view.message = message;
            view.causes = FAILURE_CAUSES.to_vec();
        }
    }

    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_prefers_reference_param() {
        let params = VerifyParams {
            reference: Some("REF-1".to_string()),
            trxref: Some("REF-2".to_string()),
        };
        assert_eq!(
            params.payment_reference().map(|r| r.to_string()),
            Some("REF-1".to_string())
        );
    }

    #[test]
    fn test_reference_falls_back_to_trxref_and_strips_suffix() {
        let params = VerifyParams {
            reference: Some("   ".to_string()),
            trxref: Some("REF-2:extra".to_string()),
        };
        assert_eq!(
            params.payment_reference().map(|r| r.to_string()),
            Some("REF-2".to_string())
        );
    }

    #[test]
    fn test_missing_reference() {
        assert!(VerifyParams::default().payment_reference().is_none());
    }
}
