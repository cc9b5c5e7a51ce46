//! Phone number check.
//!
//! # Usage
//!
//! ```bash
//! bundle-cli phone TELECEL "050 123 4567"
//! ```

use databundle_core::{Network, accepted_prefixes, validate_phone};

use super::CliError;

/// Validate `number` for `network` and print the cleaned number.
///
/// # Errors
///
/// Returns `CliError` if the network is unknown or the number is rejected.
pub fn check(network: &str, number: &str) -> Result<(), CliError> {
    let (network, cleaned) = validate(network, number)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{cleaned} is a valid {} number", network.display_name());
    }
    Ok(())
}

fn validate(network: &str, number: &str) -> Result<(Network, String), CliError> {
    let network =
        Network::parse(network).ok_or_else(|| CliError::UnknownNetwork(network.to_string()))?;
    match validate_phone(network, number) {
        Ok(phone) => Ok((network, phone.into_inner())),
        Err(e) => {
            tracing::debug!(
                network = network.code(),
                accepted = accepted_prefixes(network),
                "Number rejected"
            );
            Err(e.into())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_number_is_cleaned() {
        let (network, cleaned) = validate("yello", "024-123 4567").unwrap();
        assert_eq!(network, Network::Yello);
        assert_eq!(cleaned, "0241234567");
    }

    #[test]
    fn test_unknown_network() {
        assert!(matches!(
            validate("glo", "0231234567"),
            Err(CliError::UnknownNetwork(_))
        ));
    }

    #[test]
    fn test_wrong_prefix() {
        assert!(matches!(
            validate("TELECEL", "0241234567"),
            Err(CliError::Phone(_))
        ));
    }
}
