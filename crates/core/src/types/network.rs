//! Mobile carrier networks sold by agent stores.

use core::fmt;

use serde::de::{self, Deserialize, Deserializer};
use serde::Serialize;

/// A mobile carrier, as identified by the commerce API.
///
/// The wire codes are the API's own: `YELLO` is MTN and `AT_PREMIUM` is
/// AirtelTigo. Decoding also accepts the names [`Network::parse`] knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Network {
    Yello,
    Telecel,
    AtPremium,
}

impl Network {
    /// All networks in display order.
    pub const ALL: [Self; 3] = [Self::Yello, Self::Telecel, Self::AtPremium];

    const CODES: &'static [&'static str] = &["YELLO", "TELECEL", "AT_PREMIUM"];

    /// Wire code used by the commerce API.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Yello => "YELLO",
            Self::Telecel => "TELECEL",
            Self::AtPremium => "AT_PREMIUM",
        }
    }

    /// Customer-facing carrier name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Yello => "MTN",
            Self::Telecel => "Telecel",
            Self::AtPremium => "AirtelTigo",
        }
    }

    /// Parse a network from a wire code or a display name (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "YELLO" | "MTN" => Some(Self::Yello),
            "TELECEL" | "VODAFONE" => Some(Self::Telecel),
            "AT_PREMIUM" | "AIRTELTIGO" | "AT" => Some(Self::AtPremium),
            _ => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| de::Error::unknown_variant(&raw, Self::CODES))
    }
}

impl std::str::FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown network: {s}"))
    }
}

/// Network selection on the catalog page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkFilter {
    #[default]
    All,
    Only(Network),
}

impl NetworkFilter {
    /// Parse from a query-string value. Anything unrecognised means "all".
    #[must_use]
    pub fn parse(s: &str) -> Self {
        Network::parse(s).map_or(Self::All, Self::Only)
    }

    /// Whether a product on `network` passes this filter.
    #[must_use]
    pub fn matches(self, network: Network) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == network,
        }
    }

    /// Query-string value for links (`all` or the wire code).
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(network) => network.code(),
        }
    }
}
