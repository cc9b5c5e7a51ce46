//! Ghanaian mobile number validation.
//!
//! Every carrier uses 10-digit local numbers starting with `0`. MTN accepts any
//! such number; Telecel and AirtelTigo are restricted to their own prefixes.
//! Input is normalised by removing whitespace and hyphens before matching.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::network::Network;

static LOCAL_NUMBER: LazyLock<Regex> = LazyLock::new(|| compile(r"^0\d{9}$"));
static TELECEL_NUMBER: LazyLock<Regex> = LazyLock::new(|| compile(r"^0(20|50)\d{7}$"));
static AIRTELTIGO_NUMBER: LazyLock<Regex> = LazyLock::new(|| compile(r"^0(26|27|56|57)\d{7}$"));

#[allow(clippy::expect_used)] // patterns are string literals checked by the tests below
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("phone pattern is a valid regex")
}

/// Errors that can occur when validating a phone number.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// Nothing was entered.
    #[error("Please enter a phone number")]
    Empty,
    /// Not a 10-digit local number.
    #[error("Enter a valid 10-digit phone number starting with 0")]
    NotLocal,
    /// A local number, but not on the selected network.
    #[error("Enter a valid {network} number ({prefixes})")]
    WrongNetwork {
        /// Network the number was checked against.
        network: Network,
        /// Human-readable list of accepted prefixes.
        prefixes: &'static str,
    },
}

/// A phone number that passed validation, with separators removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CleanPhone(String);

impl CleanPhone {
    /// Validate a number against a network's prefix rules.
    ///
    /// # Errors
    ///
    /// Returns `PhoneError` if the number is empty, is not a 10-digit local
    /// number, or does not carry one of the network's prefixes.
    pub fn for_network(network: Network, raw: &str) -> Result<Self, PhoneError> {
        let local = Self::local(raw)?;
        let pattern = match network {
            Network::Yello => return Ok(local),
            Network::Telecel => &*TELECEL_NUMBER,
            Network::AtPremium => &*AIRTELTIGO_NUMBER,
        };
        if pattern.is_match(&local.0) {
            Ok(local)
        } else {
            Err(PhoneError::WrongNetwork {
                network,
                prefixes: accepted_prefixes(network),
            })
        }
    }

    /// Validate a number as any 10-digit local number.
    ///
    /// # Errors
    ///
    /// Returns `PhoneError` if the number is empty or not a local number.
    pub fn local(raw: &str) -> Result<Self, PhoneError> {
        let cleaned = normalize_phone(raw);
        if cleaned.is_empty() {
            return Err(PhoneError::Empty);
        }
        if LOCAL_NUMBER.is_match(&cleaned) {
            Ok(Self(cleaned))
        } else {
            Err(PhoneError::NotLocal)
        }
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the number and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Masked form for logs, e.g. `024****567`.
    #[must_use]
    pub fn masked(&self) -> String {
        let head: String = self.0.chars().take(3).collect();
        let tail: String = self.0.chars().skip(7).collect();
        format!("{head}****{tail}")
    }
}

impl fmt::Display for CleanPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CleanPhone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strip whitespace and hyphens from user input.
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Validate `raw` for `network`, returning the cleaned number.
///
/// # Errors
///
/// See [`CleanPhone::for_network`].
pub fn validate_phone(network: Network, raw: &str) -> Result<CleanPhone, PhoneError> {
    CleanPhone::for_network(network, raw)
}

/// Whether `raw` is a valid number for `network`.
#[must_use]
pub fn is_valid_phone(network: Network, raw: &str) -> bool {
    validate_phone(network, raw).is_ok()
}

/// Prefixes accepted for a network, for error messages.
#[must_use]
pub const fn accepted_prefixes(network: Network) -> &'static str {
    match network {
        Network::Yello => "10 digits starting with 0",
        Network::Telecel => "020 or 050",
        Network::AtPremium => "026, 027, 056 or 057",
    }
}

/// Build a `wa.me` deep link for a contact number.
///
/// Local numbers (`0XXXXXXXXX`) are rewritten to the `233` country code;
/// anything else keeps its digits as entered. Returns `None` if the input has
/// no digits.
#[must_use]
pub fn whatsapp_link(number: &str) -> Option<String> {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let international = match digits.strip_prefix('0') {
        Some(rest) if digits.len() == 10 => format!("233{rest}"),
        _ => digits,
    };
    Some(format!("https://wa.me/{international}"))
}
