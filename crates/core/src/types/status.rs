//! Order status as reported by the commerce API.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Order/transaction lifecycle status.
///
/// Statuses the storefront does not know about decode as `Unknown` so a new
/// backend state never breaks a whole order list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
    Refunded,
    Waiting,
    Accepted,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Label shown on status badges.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Refunded => "Refunded",
            Self::Waiting => "Waiting",
            Self::Accepted => "Accepted",
            Self::Unknown => "Unknown",
        }
    }

    /// CSS modifier for the status badge.
    #[must_use]
    pub const fn tone(self) -> &'static str {
        match self {
            Self::Completed => "success",
            Self::Failed => "danger",
            Self::Refunded => "muted",
            Self::Pending | Self::Waiting => "warning",
            Self::Processing | Self::Accepted => "info",
            Self::Unknown => "muted",
        }
    }

    /// Whether the order has reached a final state.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Refunded)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
