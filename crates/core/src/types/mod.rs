//! Core types for the storefront.
//!
//! Type-safe wrappers for domain concepts plus the DTOs exchanged with the
//! commerce API.

pub mod email;
pub mod envelope;
pub mod id;
pub mod lenient;
pub mod network;
pub mod order;
pub mod phone;
pub mod price;
pub mod product;
pub mod status;
pub mod store;

pub use email::{Email, EmailError};
pub use envelope::{ApiEnvelope, Listing};
pub use id::*;
pub use network::{Network, NetworkFilter};
pub use order::{Order, OrderLookup, ProductSnapshot};
pub use phone::{
    CleanPhone, PhoneError, accepted_prefixes, is_valid_phone, normalize_phone, validate_phone,
    whatsapp_link,
};
pub use price::{CurrencyCode, Price};
pub use product::Product;
pub use status::OrderStatus;
pub use store::{ContactInfo, JoinInfo, Store, StoreCustomization, StoreMetrics, StorePolicies};
