//! Order tracking.

use databundle_core::{Order, OrderLookup};
use databundle_storefront::commerce::CommerceClient;

use super::CliError;

/// Look up orders by phone number or reference and print them.
///
/// With `store`, searches that store's orders; otherwise tracks mobile-money
/// purchases across all stores.
///
/// # Errors
///
/// Returns `CliError` if the query is blank or the API call fails.
pub async fn run(
    client: &CommerceClient,
    query: &str,
    store: Option<&str>,
) -> Result<(), CliError> {
    let lookup = OrderLookup::parse(query).ok_or(CliError::InvalidQuery)?;
    let orders = match store {
        Some(slug) => client.search_orders(slug, &lookup).await?,
        None => client.track_momo(&lookup).await?,
    };

    #[allow(clippy::print_stdout)]
    {
        if orders.is_empty() {
            println!("No orders found");
        }
        for order in &orders {
            println!("{}", format_line(order));
        }
    }
    Ok(())
}

fn format_line(order: &Order) -> String {
    format!(
        "{:<20} {:<16} {:>10}  {:<10} {}  {}",
        order.reference,
        order.bundle_label(),
        order.price().display(),
        order.status,
        order.phone_number,
        order.created_label()
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        let order: Order = serde_json::from_str(
            r#"{"id":"o1","reference":"REF-1","phoneNumber":"0241234567","amount":25,"status":"completed"}"#,
        )
        .unwrap();
        let line = format_line(&order);
        assert!(line.starts_with("REF-1"));
        assert!(line.contains("Completed"));
        assert!(line.contains("GH₵25.00"));
    }
}
