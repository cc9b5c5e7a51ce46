//! Cache types for commerce API responses.

use std::sync::Arc;

use databundle_core::{Product, Store};

/// Cache key for store profiles and catalogs.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Store(String),
    Products(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Store(Box<Store>),
    Products(Arc<Vec<Product>>),
}
