//! Catalog filtering and sorting.
//!
//! Produces the product view shown on a store page from the full product list,
//! a network selection, a free-text search term and a sort key. Sorting is
//! stable: products that compare equal keep their API order.

use std::cmp::Reverse;

use crate::types::{Network, NetworkFilter, Product};

/// Catalog sort order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSort {
    /// Order returned by the API.
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    CapacityAsc,
    CapacityDesc,
}

impl CatalogSort {
    /// Every sort option, in the order shown in the sort menu.
    pub const ALL: [Self; 5] = [
        Self::Default,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::CapacityAsc,
        Self::CapacityDesc,
    ];

    /// Parse from URL parameter value.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "price-asc" | "price_asc" | "price-ascending" => Self::PriceAsc,
            "price-desc" | "price_desc" | "price-descending" => Self::PriceDesc,
            "capacity-asc" | "capacity_asc" => Self::CapacityAsc,
            "capacity-desc" | "capacity_desc" => Self::CapacityDesc,
            _ => Self::Default,
        }
    }

    /// Convert to URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::CapacityAsc => "capacity-asc",
            Self::CapacityDesc => "capacity-desc",
        }
    }

    /// Label for the sort menu.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "Featured",
            Self::PriceAsc => "Price: low to high",
            Self::PriceDesc => "Price: high to low",
            Self::CapacityAsc => "Size: small to large",
            Self::CapacityDesc => "Size: large to small",
        }
    }
}

/// Catalog query: what the visitor selected on the store page.
#[derive(Debug, Default, Clone)]
pub struct CatalogQuery {
    pub network: NetworkFilter,
    pub search: String,
    pub sort: CatalogSort,
}

impl CatalogQuery {
    /// Build a query from raw URL parameters, tolerating missing or unknown values.
    #[must_use]
    pub fn from_params(network: Option<&str>, search: Option<&str>, sort: Option<&str>) -> Self {
        Self {
            network: network.map_or(NetworkFilter::All, NetworkFilter::parse),
            search: search.unwrap_or_default().trim().to_string(),
            sort: sort.map_or(CatalogSort::Default, CatalogSort::parse),
        }
    }

    /// Apply the query to a product list.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let needle = self.search.to_lowercase();
        let mut view: Vec<&Product> = products
            .iter()
            .filter(|p| self.network.matches(p.network))
            .filter(|p| needle.is_empty() || matches_search(p, &needle))
            .collect();

        // `sort_by_key` is stable, so ties keep API order.
        match self.sort {
            CatalogSort::Default => {}
            CatalogSort::PriceAsc => view.sort_by_key(|p| p.effective_price()),
            CatalogSort::PriceDesc => view.sort_by_key(|p| Reverse(p.effective_price())),
            CatalogSort::CapacityAsc => view.sort_by_key(|p| p.capacity),
            CatalogSort::CapacityDesc => view.sort_by_key(|p| Reverse(p.capacity)),
        }

        view
    }
}

/// Case-insensitive match on capacity-as-string and network names.
///
/// `needle` must already be lowercase.
fn matches_search(product: &Product, needle: &str) -> bool {
    product.capacity_label().contains(needle)
        || network_matches(product.network, needle)
}

fn network_matches(network: Network, needle: &str) -> bool {
    network.code().to_lowercase().contains(needle)
        || network.display_name().to_lowercase().contains(needle)
}

/// Count of products per network, for the filter tabs.
#[must_use]
pub fn network_counts(products: &[Product]) -> Vec<(Network, usize)> {
    Network::ALL
        .iter()
        .map(|&network| {
            let count = products.iter().filter(|p| p.network == network).count();
            (network, count)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::ProductId;

    fn product(id: &str, network: Network, capacity: i64, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            network,
            capacity: Decimal::new(capacity, 0),
            selling_price: Decimal::new(price, 0),
            sale_price: None,
            in_stock: true,
        }
    }

    fn fixture() -> Vec<Product> {
        vec![
            product("a", Network::Yello, 5, 25),
            product("b", Network::Telecel, 50, 180),
            product("c", Network::Yello, 2, 10),
            product("d", Network::AtPremium, 10, 25),
            product("e", Network::Telecel, 1, 5),
        ]
    }

    fn ids(view: &[&Product]) -> Vec<String> {
        view.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_search_matches_capacity_substring() {
        let products = vec![
            product("a", Network::Yello, 5, 25),
            product("b", Network::Yello, 50, 180),
            product("c", Network::Yello, 2, 10),
        ];
        let query = CatalogQuery::from_params(None, Some("5"), None);
        assert_eq!(ids(&query.apply(&products)), ["a", "b"]);
    }

    #[test]
    fn test_search_matches_network_names_case_insensitively() {
        let products = fixture();
        let by_display = CatalogQuery::from_params(None, Some("mtn"), None);
        assert_eq!(ids(&by_display.apply(&products)), ["a", "c"]);

        let by_code = CatalogQuery::from_params(None, Some("at_prem"), None);
        assert_eq!(ids(&by_code.apply(&products)), ["d"]);

        let by_name = CatalogQuery::from_params(None, Some("AIRTEL"), None);
        assert_eq!(ids(&by_name.apply(&products)), ["d"]);
    }

    #[test]
    fn test_network_filter_returns_only_that_network() {
        let products = fixture();
        for network in Network::ALL {
            let query = CatalogQuery::from_params(Some(network.code()), None, None);
            let view = query.apply(&products);
            assert!(!view.is_empty());
            assert!(view.iter().all(|p| p.network == network));
        }
    }

    #[test]
    fn test_all_filter_keeps_everything() {
        let products = fixture();
        let query = CatalogQuery::from_params(Some("all"), Some("  "), Some("bogus"));
        assert_eq!(ids(&query.apply(&products)), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_price_ascending_is_non_decreasing_and_stable() {
        let products = fixture();
        let query = CatalogQuery::from_params(None, None, Some("price-asc"));
        let view = query.apply(&products);
        assert!(
            view.windows(2)
                .all(|w| w[0].effective_price() <= w[1].effective_price())
        );
        // a and d both cost 25; API order is a then d.
        assert_eq!(ids(&view), ["e", "c", "a", "d", "b"]);
    }

    #[test]
    fn test_price_descending_is_non_increasing_and_stable() {
        let products = fixture();
        let query = CatalogQuery::from_params(None, None, Some("price_desc"));
        let view = query.apply(&products);
        assert!(
            view.windows(2)
                .all(|w| w[0].effective_price() >= w[1].effective_price())
        );
        assert_eq!(ids(&view), ["b", "a", "d", "c", "e"]);
    }

    #[test]
    fn test_price_sort_uses_sale_price() {
        let mut products = fixture();
        products[1].sale_price = Some(Decimal::new(1, 0));
        let query = CatalogQuery::from_params(None, None, Some("price-asc"));
        assert_eq!(ids(&query.apply(&products))[0], "b");
    }

    #[test]
    fn test_capacity_sorts() {
        let products = fixture();
        let asc = CatalogQuery::from_params(None, None, Some("capacity-asc"));
        assert_eq!(ids(&asc.apply(&products)), ["e", "c", "a", "d", "b"]);
        let desc = CatalogQuery::from_params(None, None, Some("capacity-desc"));
        assert_eq!(ids(&desc.apply(&products)), ["b", "d", "a", "c", "e"]);
    }

    #[test]
    fn test_filter_and_sort_combine() {
        let products = fixture();
        let query = CatalogQuery::from_params(Some("TELECEL"), None, Some("price-desc"));
        assert_eq!(ids(&query.apply(&products)), ["b", "e"]);
    }

    #[test]
    fn test_sort_round_trips_through_param() {
        for sort in CatalogSort::ALL {
            assert_eq!(CatalogSort::parse(sort.as_str()), sort);
        }
    }

    #[test]
    fn test_network_counts() {
        let counts = network_counts(&fixture());
        assert_eq!(
            counts,
            vec![
                (Network::Yello, 2),
                (Network::Telecel, 2),
                (Network::AtPremium, 1)
            ]
        );
    }
}
