//! Per-product purchase card state machine.
//!
//! ```text
//! Closed -> Expanded -> (validate) -> Confirming -> Processing -> Redirected
//!              ^             |             |             |
//!              +-- error ----+---- back ---+---- error --+
//! ```
//!
//! Validation and initialization failures put the card back in `Expanded`
//! with a message for that card only.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CleanPhone, Network, PhoneError, Product, ProductId};

/// Longest customer name accepted.
pub const MAX_NAME_LENGTH: usize = 100;

/// Errors surfaced on a purchase card.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("This bundle is currently out of stock")]
    OutOfStock,
    #[error("Please enter your name")]
    MissingName,
    #[error("Name must be at most 100 characters")]
    NameTooLong,
    #[error("{0}")]
    Phone(#[from] PhoneError),
    #[error("Could not start payment: {0}")]
    Initialize(String),
    #[error("Action not allowed while the card is {0}")]
    InvalidTransition(&'static str),
}

/// Raw purchase form input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchaseForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

/// A validated purchase, ready to send to the initialize endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub product_id: ProductId,
    pub network: Network,
    pub capacity: Decimal,
    pub amount: Decimal,
    #[serde(rename = "phoneNumber")]
    pub phone: CleanPhone,
    pub customer_name: String,
}

/// Where a purchase card is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardState {
    Closed,
    Expanded { error: Option<CheckoutError> },
    Confirming(PurchaseRequest),
    Processing(PurchaseRequest),
    Redirected { authorization_url: String },
}

impl CardState {
    /// Short state name for logs and error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Expanded { .. } => "expanded",
            Self::Confirming(_) => "confirming",
            Self::Processing(_) => "processing",
            Self::Redirected { .. } => "redirected",
        }
    }
}

/// The purchase card for one product.
#[derive(Debug, Clone)]
pub struct CheckoutCard {
    product: Product,
    state: CardState,
}

impl CheckoutCard {
    /// A closed card for `product`.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self {
            product,
            state: CardState::Closed,
        }
    }

    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    #[must_use]
    pub const fn state(&self) -> &CardState {
        &self.state
    }

    /// Error to show on the card, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&CheckoutError> {
        match &self.state {
            CardState::Expanded { error } => error.as_ref(),
            _ => None,
        }
    }

    /// Reveal the name/phone inputs. Allowed from any state but `Processing`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` while a payment is being initialized.
    pub fn expand(&mut self) -> Result<(), CheckoutError> {
        self.guard_not_processing()?;
        self.state = CardState::Expanded { error: None };
        Ok(())
    }

    /// Collapse the card.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` while a payment is being initialized.
    pub fn close(&mut self) -> Result<(), CheckoutError> {
        self.guard_not_processing()?;
        self.state = CardState::Closed;
        Ok(())
    }

    /// Validate the form and move to the confirmation step.
    ///
    /// On a validation failure the card stays expanded and carries the error.
    ///
    /// # Errors
    ///
    /// Returns the validation error, or `InvalidTransition` if the card is
    /// not expanded.
    pub fn submit(&mut self, form: &PurchaseForm) -> Result<&PurchaseRequest, CheckoutError> {
        if !matches!(self.state, CardState::Expanded { .. }) {
            return Err(CheckoutError::InvalidTransition(self.state.name()));
        }

        match validate(&self.product, form) {
            Ok(request) => {
                self.state = CardState::Confirming(request);
                match &self.state {
                    CardState::Confirming(request) => Ok(request),
                    _ => Err(CheckoutError::InvalidTransition("confirming")),
                }
            }
            Err(err) => {
                self.state = CardState::Expanded {
                    error: Some(err.clone()),
                };
                Err(err)
            }
        }
    }

    /// Go back from the confirmation step to edit the details.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the card is not confirming.
    pub fn back(&mut self) -> Result<(), CheckoutError> {
        if !matches!(self.state, CardState::Confirming(_)) {
            return Err(CheckoutError::InvalidTransition(self.state.name()));
        }
        self.state = CardState::Expanded { error: None };
        Ok(())
    }

    /// Confirm the purchase. Returns the request to send to the API.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the card is not confirming.
    pub fn confirm(&mut self) -> Result<PurchaseRequest, CheckoutError> {
        let CardState::Confirming(request) = &self.state else {
            return Err(CheckoutError::InvalidTransition(self.state.name()));
        };
        let request = request.clone();
        self.state = CardState::Processing(request.clone());
        Ok(request)
    }

    /// Record the outcome of the initialize call.
    ///
    /// `Ok(url)` moves to `Redirected`; `Err(message)` returns the card to
    /// `Expanded` with the message.
    ///
    /// # Errors
    ///
    /// Returns the initialization error, or `InvalidTransition` if no
    /// payment was being initialized.
    pub fn complete(&mut self, outcome: Result<String, String>) -> Result<&str, CheckoutError> {
        if !matches!(self.state, CardState::Processing(_)) {
            return Err(CheckoutError::InvalidTransition(self.state.name()));
        }

        match outcome {
            Ok(authorization_url) => {
                self.state = CardState::Redirected { authorization_url };
                match &self.state {
                    CardState::Redirected { authorization_url } => Ok(authorization_url.as_str()),
                    _ => Err(CheckoutError::InvalidTransition("redirected")),
                }
            }
            Err(message) => {
                let err = CheckoutError::Initialize(message);
                self.state = CardState::Expanded {
                    error: Some(err.clone()),
                };
                Err(err)
            }
        }
    }

    fn guard_not_processing(&self) -> Result<(), CheckoutError> {
        if matches!(self.state, CardState::Processing(_)) {
            Err(CheckoutError::InvalidTransition(self.state.name()))
        } else {
            Ok(())
        }
    }
}

/// Check stock, name and phone, in that order.
///
/// # Errors
///
/// Returns the first failing rule.
pub fn validate(product: &Product, form: &PurchaseForm) -> Result<PurchaseRequest, CheckoutError> {
    if !product.in_stock {
        return Err(CheckoutError::OutOfStock);
    }

    let name = form.name.trim();
    if name.is_empty() {
        return Err(CheckoutError::MissingName);
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CheckoutError::NameTooLong);
    }

    let phone = CleanPhone::for_network(product.network, &form.phone)?;

    Ok(PurchaseRequest {
        product_id: product.id.clone(),
        network: product.network,
        capacity: product.capacity,
        amount: product.effective_price(),
        phone,
        customer_name: name.to_string(),
    })
}
