//! Payment verification outcome classification.
//!
//! The verify endpoint is called once when the customer returns from the
//! payment page. Its answer is ambiguous while the order is still propagating
//! on the backend: it may answer 404, a "not found" message, or an HTML error
//! page. None of those mean the payment failed, so they are classified as
//! `Processing` and the customer is asked to check back later. Only an
//! explicit, well-formed failure is `Failed`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{Network, OrderStatus, Price, lenient};

/// Likely reasons for a failed payment, shown on the failure page.
pub const FAILURE_CAUSES: &[&str] = &[
    "Insufficient balance on the mobile money wallet",
    "The payment prompt was declined or timed out",
    "The wallet PIN was entered incorrectly",
    "The payment was cancelled on the checkout page",
];

/// Transaction details returned by a successful verification.
///
/// Every field is display-only and decodes leniently: an unreadable field is
/// left empty, it never turns a confirmed payment into a failure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    #[serde(default, alias = "_id", deserialize_with = "lenient::option")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub reference: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub network: Option<Network>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub capacity: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TransactionSummary {
    /// Summary from a verify payload. A payload that is not an object gives
    /// an empty summary.
    #[must_use]
    pub fn from_payload(data: &Value) -> Self {
        Self::deserialize(data).unwrap_or_default()
    }

    /// Amount formatted for display, or `-` if absent.
    #[must_use]
    pub fn amount_label(&self) -> String {
        self.amount
            .map_or_else(|| "-".to_string(), |a| Price::cedis(a).display())
    }

    /// Bundle label, e.g. `MTN 5GB`, when the API included it.
    #[must_use]
    pub fn bundle_label(&self) -> Option<String> {
        match (self.network, self.capacity) {
            (Some(network), Some(capacity)) => Some(format!(
                "{} {}GB",
                network.display_name(),
                capacity.normalize()
            )),
            (Some(network), None) => Some(network.display_name().to_string()),
            _ => None,
        }
    }
}

/// Result of a single verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Payment confirmed.
    Success(TransactionSummary),
    /// Not confirmed yet; the customer should check back later.
    Processing,
    /// Payment failed, with a message for the customer.
    Failed(String),
}

impl VerificationOutcome {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Processing => "processing",
            Self::Failed(_) => "failed",
        }
    }

    /// Outcome when no usable reference was supplied.
    #[must_use]
    pub fn missing_reference() -> Self {
        Self::Failed("No payment reference was supplied".to_string())
    }

    /// Outcome when the verify request never produced a response (timeout,
    /// connection refused). The payment may still have gone through.
    #[must_use]
    pub const fn transport_error() -> Self {
        Self::Processing
    }

    /// Classify a verify-endpoint response.
    #[must_use]
    pub fn classify(status: u16, content_type: Option<&str>, body: &str) -> Self {
        if status == 404 {
            return Self::Processing;
        }

        let is_json = content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("json"));
        if !is_json {
            return Self::Processing;
        }

        // The envelope is read field by field so an odd payload can only
        // shrink the summary, never flip the outcome.
        let Ok(envelope) = serde_json::from_str::<Value>(body) else {
            return Self::Failed(
                "The payment provider returned an unreadable response".to_string(),
            );
        };

        let message = envelope
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if message.to_ascii_lowercase().contains("not found") {
            return Self::Processing;
        }

        let reported_success = envelope
            .get("status")
            .and_then(Value::as_str)
            .is_some_and(|s| s.eq_ignore_ascii_case("success"));
        let data = envelope.get("data").filter(|data| !data.is_null());

        match data {
            Some(data) if reported_success && (200..300).contains(&status) => {
                let summary = TransactionSummary::from_payload(data);
                if summary.status == OrderStatus::Failed {
                    Self::Failed(non_empty_or(message, "The payment was not completed"))
                } else {
                    Self::Success(summary)
                }
            }
            _ => Self::Failed(non_empty_or(message, "Payment verification failed")),
        }
    }
}

fn non_empty_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
