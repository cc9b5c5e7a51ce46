//! Session-related types.
//!
//! Visitor state that a browser-only storefront would keep in local storage
//! lives in the server-side session under the same key names.

use core::fmt;

use databundle_core::signup::ResellerAccount;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

/// Colour scheme preference.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a form value; anything unknown is `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session keys.
pub mod keys {
    /// Slug of the store the visitor last browsed.
    pub const LAST_VISITED_STORE_SLUG: &str = "lastVisitedStoreSlug";

    /// Colour scheme preference.
    pub const THEME: &str = "theme";

    /// Summary of a submitted reseller application (never the password).
    pub const RESELLER_ACCOUNT: &str = "resellerAccount";

    /// ID of the last verified transaction.
    pub const LAST_TRANSACTION_ID: &str = "lastTransactionId";
}

/// Slug of the last visited store.
pub async fn last_visited_store(session: &Session) -> Option<String> {
    session
        .get::<String>(keys::LAST_VISITED_STORE_SLUG)
        .await
        .ok()
        .flatten()
}

/// Remember the store the visitor is browsing.
///
/// # Errors
///
/// Returns the session store error.
pub async fn set_last_visited_store(
    session: &Session,
    slug: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::LAST_VISITED_STORE_SLUG, slug).await
}

/// The visitor's theme, defaulting to light.
pub async fn theme(session: &Session) -> Theme {
    session
        .get::<Theme>(keys::THEME)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Store the visitor's theme.
///
/// # Errors
///
/// Returns the session store error.
pub async fn set_theme(
    session: &Session,
    theme: Theme,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::THEME, theme).await
}

/// The reseller application summary, if any.
pub async fn reseller_account(session: &Session) -> Option<ResellerAccount> {
    session
        .get::<ResellerAccount>(keys::RESELLER_ACCOUNT)
        .await
        .ok()
        .flatten()
}

/// Remember a submitted reseller application.
///
/// # Errors
///
/// Returns the session store error.
pub async fn set_reseller_account(
    session: &Session,
    account: &ResellerAccount,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::RESELLER_ACCOUNT, account).await
}

/// ID of the last verified transaction.
pub async fn last_transaction_id(session: &Session) -> Option<String> {
    session
        .get::<String>(keys::LAST_TRANSACTION_ID)
        .await
        .ok()
        .flatten()
}

/// Remember the last verified transaction.
///
/// # Errors
///
/// Returns the session store error.
pub async fn set_last_transaction_id(
    session: &Session,
    id: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::LAST_TRANSACTION_ID, id).await
}
