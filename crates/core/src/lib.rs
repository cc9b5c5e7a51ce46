//! Databundle Core - Domain types and business rules.
//!
//! This crate provides the types and rules shared by all storefront components:
//! - `storefront` - Multi-tenant agent storefront (axum)
//! - `cli` - Operator command-line tools
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no sessions. Every rule that decides what a page shows lives here
//! so it can be tested without a network.
//!
//! # Modules
//!
//! - [`types`] - Wire DTOs (store, product, order) and newtypes (network, phone, price, email)
//! - [`catalog`] - Product filtering and sorting
//! - [`checkout`] - Per-product purchase card state machine
//! - [`verification`] - Payment verification outcome classification
//! - [`signup`] - Reseller signup form validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod checkout;
pub mod signup;
pub mod types;
pub mod verification;

pub use types::*;
