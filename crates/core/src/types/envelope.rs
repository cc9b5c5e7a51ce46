//! Response envelope used by every commerce API endpoint.

use serde::{Deserialize, Serialize};

/// `{ "status": "success", "data": ..., "message": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// `"success"` or `"error"` (some endpoints use `"fail"`).
    #[serde(default)]
    pub status: String,
    /// Payload, absent on errors.
    pub data: Option<T>,
    /// Human-readable message, mostly present on errors.
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Whether the API reported success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }

    /// Take the payload if the API reported success.
    ///
    /// On failure returns the API's message (or a generic one).
    ///
    /// # Errors
    ///
    /// Returns the error message when `status` is not success or `data` is
    /// missing.
    pub fn into_data(self) -> Result<T, String> {
        let success = self.is_success();
        match (success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(self
                .message
                .unwrap_or_else(|| "Response contained no data".to_string())),
            (false, _) => Err(self
                .message
                .unwrap_or_else(|| "Request was not successful".to_string())),
        }
    }
}

/// A list payload that some endpoints return bare and others wrap in an
/// object (`{"products": [...]}`, `{"orders": [...]}`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Bare(Vec<T>),
    Products { products: Vec<T> },
    Orders { orders: Vec<T> },
}

impl<T> Listing<T> {
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items)
            | Self::Products { products: items }
            | Self::Orders { orders: items } => items,
        }
    }
}
