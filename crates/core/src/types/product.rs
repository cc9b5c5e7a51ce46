//! Data bundle products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::network::Network;
use super::price::Price;

/// A priced data bundle offered by an agent store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: ProductId,
    pub network: Network,
    /// Bundle size in GB.
    pub capacity: Decimal,
    pub selling_price: Decimal,
    #[serde(default)]
    pub sale_price: Option<Decimal>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

const fn default_in_stock() -> bool {
    true
}

impl Product {
    /// Price the customer pays: the sale price when it undercuts the selling price.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        match self.sale_price {
            Some(sale) if sale < self.selling_price => sale,
            _ => self.selling_price,
        }
    }

    /// Whether a sale price is in effect.
    #[must_use]
    pub fn on_sale(&self) -> bool {
        self.effective_price() < self.selling_price
    }

    /// Effective price in cedis.
    #[must_use]
    pub fn price(&self) -> Price {
        Price::cedis(self.effective_price())
    }

    /// Capacity without trailing zeros, e.g. `5` or `1.5`.
    #[must_use]
    pub fn capacity_label(&self) -> String {
        self.capacity.normalize().to_string()
    }

    /// Display title, e.g. `MTN 5GB`.
    #[must_use]
    pub fn title(&self) -> String {
        format!("{} {}GB", self.network.display_name(), self.capacity_label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(json: &str) -> Product {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_decodes_mongo_id_and_numbers() {
        let p = product(
            r#"{"_id":"p1","network":"YELLO","capacity":5,"sellingPrice":25,"inStock":true}"#,
        );
        assert_eq!(p.id.as_str(), "p1");
        assert_eq!(p.capacity_label(), "5");
        assert_eq!(p.price().display(), "GH₵25.00");
        assert_eq!(p.title(), "MTN 5GB");
    }

    #[test]
    fn test_stock_defaults_to_true() {
        let p = product(r#"{"id":"p2","network":"TELECEL","capacity":1.5,"sellingPrice":9.5}"#);
        assert!(p.in_stock);
        assert_eq!(p.capacity_label(), "1.5");
    }

    #[test]
    fn test_sale_price_only_applies_when_lower() {
        let mut p = product(
            r#"{"id":"p3","network":"AT_PREMIUM","capacity":10,"sellingPrice":40,"salePrice":35}"#,
        );
        assert_eq!(p.effective_price(), Decimal::new(35, 0));
        assert!(p.on_sale());

        p.sale_price = Some(Decimal::new(45, 0));
        assert_eq!(p.effective_price(), Decimal::new(40, 0));
        assert!(!p.on_sale());
    }
}
