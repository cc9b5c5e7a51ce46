//! Orders and payment transactions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{OrderId, PaymentReference};
use super::lenient;
use super::network::Network;
use super::phone::CleanPhone;
use super::price::Price;
use super::status::OrderStatus;

/// An order (or the transaction that paid for it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: OrderId,
    pub reference: PaymentReference,
    pub phone_number: String,
    #[serde(default, deserialize_with = "lenient::option")]
    pub product: Option<ProductSnapshot>,
    pub amount: Decimal,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Amount paid, in cedis.
    #[must_use]
    pub fn price(&self) -> Price {
        Price::cedis(self.amount)
    }

    /// Bundle description, e.g. `Telecel 2GB`, or a placeholder when the API
    /// omitted the snapshot.
    #[must_use]
    pub fn bundle_label(&self) -> String {
        self.product.as_ref().map_or_else(
            || "Data bundle".to_string(),
            |p| format!("{} {}GB", p.network.display_name(), p.capacity.normalize()),
        )
    }

    /// Creation time formatted for display.
    #[must_use]
    pub fn created_label(&self) -> String {
        self.created_at.map_or_else(
            || "-".to_string(),
            |t| t.format("%d %b %Y, %H:%M").to_string(),
        )
    }
}

/// Product details captured at purchase time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub network: Network,
    pub capacity: Decimal,
}

/// How a customer looks up their orders.
///
/// A valid local phone number searches by phone; anything else is treated as
/// a payment reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderLookup {
    Phone(CleanPhone),
    Reference(String),
}

impl OrderLookup {
    /// Longest reference accepted from the search box.
    pub const MAX_REFERENCE_LENGTH: usize = 64;

    /// Interpret a search-box value. Returns `None` for blank or oversized input.
    #[must_use]
    pub fn parse(query: &str) -> Option<Self> {
        let query = query.trim();
        if query.is_empty() || query.len() > Self::MAX_REFERENCE_LENGTH {
            return None;
        }
        Some(CleanPhone::local(query).map_or_else(
            |_| Self::Reference(query.to_string()),
            Self::Phone,
        ))
    }

    /// JSON body for the order search and tracking endpoints.
    #[must_use]
    pub fn to_request_body(&self) -> serde_json::Value {
        match self {
            Self::Phone(phone) => serde_json::json!({ "phoneNumber": phone }),
            Self::Reference(reference) => serde_json::json!({ "reference": reference }),
        }
    }

    /// Label for logs; phone numbers are masked.
    #[must_use]
    pub fn log_label(&self) -> String {
        match self {
            Self::Phone(phone) => format!("phone:{}", phone.masked()),
            Self::Reference(reference) => format!("reference:{reference}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_phone() {
        let lookup = OrderLookup::parse(" 024 123 4567 ").unwrap();
        assert_eq!(
            lookup.to_request_body(),
            serde_json::json!({"phoneNumber": "0241234567"})
        );
        assert_eq!(lookup.log_label(), "phone:024****567");
    }

    #[test]
    fn test_lookup_by_reference() {
        let lookup = OrderLookup::parse("DB-77ab").unwrap();
        assert_eq!(lookup, OrderLookup::Reference("DB-77ab".to_string()));
        assert_eq!(
            lookup.to_request_body(),
            serde_json::json!({"reference": "DB-77ab"})
        );
    }

    #[test]
    fn test_lookup_rejects_blank_and_oversized() {
        assert!(OrderLookup::parse("   ").is_none());
        assert!(OrderLookup::parse(&"x".repeat(65)).is_none());
    }

    #[test]
    fn test_decode_full_order() {
        let order: Order = serde_json::from_str(
            r#"{
                "_id": "o1",
                "reference": "REF-1",
                "phoneNumber": "0241234567",
                "product": {"network": "YELLO", "capacity": 5},
                "amount": 25,
                "status": "completed",
                "createdAt": "2024-03-01T10:15:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.bundle_label(), "MTN 5GB");
        assert_eq!(order.price().display(), "GH₵25.00");
        assert_eq!(order.created_label(), "01 Mar 2024, 10:15");
    }

    #[test]
    fn test_decode_order_without_snapshot() {
        let order: Order = serde_json::from_str(
            r#"{"id":"o2","reference":"R2","phoneNumber":"0201234567","amount":"4.5"}"#,
        )
        .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.bundle_label(), "Data bundle");
        assert_eq!(order.created_label(), "-");
    }

    #[test]
    fn test_odd_display_fields_do_not_drop_the_order() {
        let order: Order = serde_json::from_str(
            r#"{
                "_id": "o3",
                "reference": "R3",
                "phoneNumber": "0561234567",
                "product": {"network": "AT_BIGTIME", "capacity": 3},
                "amount": 15,
                "status": null,
                "createdAt": "2024-03-01 10:15:00"
            }"#,
        )
        .unwrap();
        assert!(order.product.is_none());
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.created_label(), "01 Mar 2024, 10:15");
    }
}
