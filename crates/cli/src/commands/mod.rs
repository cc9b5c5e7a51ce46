//! Command implementations.

pub mod catalog;
pub mod phone;
pub mod track;
pub mod verify;

use databundle_core::PhoneError;
use databundle_storefront::commerce::{CommerceClient, CommerceError};
use databundle_storefront::config::{CommerceApiConfig, ConfigError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// No API URL from `--api-url` or the environment.
    #[error("Missing commerce API URL: pass --api-url or set COMMERCE_API_URL")]
    MissingApiUrl,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Commerce API error: {0}")]
    Commerce(#[from] CommerceError),

    #[error("Unknown network: {0}. Valid networks: YELLO, TELECEL, AT_PREMIUM")]
    UnknownNetwork(String),

    #[error("Invalid phone number: {0}")]
    Phone(#[from] PhoneError),

    #[error("Enter a phone number or payment reference")]
    InvalidQuery,

    #[error("Payment failed: {0}")]
    Verification(String),
}

/// Build a commerce client for `api_url`.
///
/// # Errors
///
/// Returns `CliError` if the URL is missing or invalid.
pub fn client(api_url: Option<&str>) -> Result<CommerceClient, CliError> {
    let api_url = api_url.ok_or(CliError::MissingApiUrl)?;
    let config = CommerceApiConfig::with_base_url(api_url)?;
    Ok(CommerceClient::new(&config)?)
}
