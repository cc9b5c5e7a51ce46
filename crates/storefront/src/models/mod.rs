//! Session-backed visitor models for the storefront.

pub mod session;

pub use session::{Theme, keys as session_keys};
