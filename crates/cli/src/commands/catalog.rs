//! Catalog listing.
//!
//! Applies the storefront's network filter, search and sort to a store's
//! products and prints one line per bundle.

use databundle_core::Product;
use databundle_core::catalog::CatalogQuery;
use databundle_storefront::commerce::CommerceClient;

use super::CliError;

/// Fetch, filter and print a store's products.
///
/// # Errors
///
/// Returns `CliError` if the store or its products cannot be fetched.
pub async fn list(
    client: &CommerceClient,
    slug: &str,
    network: Option<&str>,
    search: Option<&str>,
    sort: Option<&str>,
) -> Result<(), CliError> {
    let store = client.get_store(slug).await?;
    let products = client.get_products(slug).await?;
    let query = CatalogQuery::from_params(network, search, sort);
    let shown = query.apply(&products);

    #[allow(clippy::print_stdout)]
    {
        println!(
            "{} ({}): {} of {} bundles",
            store.name,
            store.slug,
            shown.len(),
            products.len()
        );
        for product in shown {
            println!("{}", format_line(product));
        }
    }
    Ok(())
}

fn format_line(product: &Product) -> String {
    let stock = if product.in_stock { "" } else { "  (out of stock)" };
    let sale = if product.on_sale() { "  (sale)" } else { "" };
    format!(
        "{:<12} {:<18} {:>10}{sale}{stock}",
        product.id,
        product.title(),
        product.price().display()
    )
}

#[cfg(test)]
mod tests {
    use databundle_core::{Network, ProductId};
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_format_line_marks_sale_and_stock() {
        let product = Product {
            id: ProductId::new("p1"),
            network: Network::Telecel,
            capacity: Decimal::new(2, 0),
            selling_price: Decimal::new(9, 0),
            sale_price: Some(Decimal::new(8, 0)),
            in_stock: false,
        };
        let line = format_line(&product);
        assert!(line.starts_with("p1"));
        assert!(line.contains("Telecel 2GB"));
        assert!(line.contains("GH₵8.00"));
        assert!(line.ends_with("(sale)  (out of stock)"));
    }
}
