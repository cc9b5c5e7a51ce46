//! Newtype IDs for type-safe entity references.
//!
//! The commerce API issues opaque string identifiers (document ids and payment
//! references). Use the `define_id!` macro to create wrappers that prevent
//! accidentally mixing them up.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use databundle_core::define_id;
/// define_id!(StoreId);
/// define_id!(ReceiptId);
///
/// let store_id = StoreId::new("abc");
/// let receipt_id = ReceiptId::new("abc");
///
/// // These are different types, so this won't compile:
/// // let _: StoreId = receipt_id;
/// assert_eq!(store_id.as_str(), "abc");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(OrderId);
define_id!(PaymentReference);

impl PaymentReference {
    /// Build a reference from a raw query-string value.
    ///
    /// Payment providers sometimes append `:<suffix>` to the reference they
    /// echo back; everything from the first colon on is dropped. Returns
    /// `None` when nothing usable remains.
    #[must_use]
    pub fn from_query(raw: &str) -> Option<Self> {
        let head = raw.split(':').next().unwrap_or_default().trim();
        if head.is_empty() {
            None
        } else {
            Some(Self(head.to_owned()))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_strips_colon_suffix() {
        let reference = PaymentReference::from_query("T123456:retry-2").unwrap();
        assert_eq!(reference.as_str(), "T123456");
    }

    #[test]
    fn test_reference_without_colon() {
        let reference = PaymentReference::from_query("  T999 ").unwrap();
        assert_eq!(reference.as_str(), "T999");
    }

    #[test]
    fn test_reference_empty_head() {
        assert!(PaymentReference::from_query(":abc").is_none());
        assert!(PaymentReference::from_query("").is_none());
    }

    #[test]
    fn test_id_serde_transparent() {
        let id: ProductId = serde_json::from_str("\"64f0c2\"").unwrap();
        assert_eq!(id, ProductId::new("64f0c2"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"64f0c2\"");
    }

    #[test]
    fn test_display_honours_width() {
        assert_eq!(format!("{:<6}|", ProductId::new("y5")), "y5    |");
        assert_eq!(format!("{:>4}", OrderId::new("o1")), "  o1");
    }
}
