//! Agent store (tenant) profile.

use serde::{Deserialize, Serialize};

use super::phone::whatsapp_link;

/// An agent store's public profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub customization: StoreCustomization,
    #[serde(default)]
    pub policies: StorePolicies,
    #[serde(default)]
    pub metrics: StoreMetrics,
}

impl Store {
    /// WhatsApp deep link for the store, preferring the dedicated WhatsApp number.
    #[must_use]
    pub fn whatsapp_url(&self) -> Option<String> {
        self.contact_info
            .whatsapp
            .as_deref()
            .or(self.contact_info.phone.as_deref())
            .and_then(whatsapp_link)
    }
}

/// Store contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Branding colours chosen by the store owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCustomization {
    #[serde(default = "default_primary_color")]
    pub primary_color: String,
    #[serde(default = "default_secondary_color")]
    pub secondary_color: String,
}

fn default_primary_color() -> String {
    "#1d4ed8".to_string()
}

fn default_secondary_color() -> String {
    "#f59e0b".to_string()
}

impl Default for StoreCustomization {
    fn default() -> Self {
        Self {
            primary_color: default_primary_color(),
            secondary_color: default_secondary_color(),
        }
    }
}

impl StoreCustomization {
    /// Colours are interpolated into a `style` attribute, so only `#rgb` /
    /// `#rrggbb` values are let through.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        Self {
            primary_color: sanitize_color(&self.primary_color)
                .unwrap_or(defaults.primary_color),
            secondary_color: sanitize_color(&self.secondary_color)
                .unwrap_or(defaults.secondary_color),
        }
    }
}

fn sanitize_color(value: &str) -> Option<String> {
    let hex = value.trim().strip_prefix('#')?;
    let valid = matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());
    valid.then(|| format!("#{hex}"))
}

/// Store policies shown in the footer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePolicies {
    #[serde(default)]
    pub refund: Option<String>,
    #[serde(default)]
    pub terms: Option<String>,
}

/// Display-only store statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreMetrics {
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// Reseller programme details for a store (`/sub-agent/store/{slug}/join-info`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinInfo {
    #[serde(default)]
    pub store_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub registration_fee: Option<f64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_store_uses_defaults() {
        let store: Store = serde_json::from_str(r#"{"name":"Ama Data","slug":"ama"}"#).unwrap();
        assert!(!store.is_verified);
        assert_eq!(store.customization, StoreCustomization::default());
        assert_eq!(store.metrics.total_orders, 0);
        assert!(store.whatsapp_url().is_none());
    }

    #[test]
    fn test_whatsapp_prefers_dedicated_number() {
        let store: Store = serde_json::from_str(
            r#"{"name":"A","slug":"a","contactInfo":{"phone":"0201111111","whatsapp":"0552222222"}}"#,
        )
        .unwrap();
        assert_eq!(
            store.whatsapp_url().as_deref(),
            Some("https://wa.me/233552222222")
        );
    }

    #[test]
    fn test_customization_sanitizes_colors() {
        let custom = StoreCustomization {
            primary_color: "#abc".to_string(),
            secondary_color: "red;background:url(x)".to_string(),
        };
        let clean = custom.sanitized();
        assert_eq!(clean.primary_color, "#abc");
        assert_eq!(clean.secondary_color, "#f59e0b");
    }
}
