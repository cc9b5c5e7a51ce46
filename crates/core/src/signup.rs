//! Reseller (sub-agent) signup validation.
//!
//! The password is kept in a [`SecretString`] from the moment the form is
//! validated. It is exposed only while building the apply request body and
//! never stored: the account summary kept after a successful application has
//! no password field.

use core::fmt;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::types::{CleanPhone, Email, PhoneError};

/// Shortest password accepted.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Form fields, used to attach errors to inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignupField {
    FullName,
    Email,
    Phone,
    Password,
    ConfirmPassword,
}

/// A single validation failure.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SignupError {
    #[error("Full name is required")]
    MissingName,
    #[error("Email is required")]
    MissingEmail,
    #[error("Enter a valid email address")]
    InvalidEmail,
    #[error("Phone number is required")]
    MissingPhone,
    #[error("Enter a valid 10-digit phone number starting with 0")]
    InvalidPhone,
    #[error("Password is required")]
    MissingPassword,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl SignupError {
    /// Field the error belongs to.
    #[must_use]
    pub const fn field(&self) -> SignupField {
        match self {
            Self::MissingName => SignupField::FullName,
            Self::MissingEmail | Self::InvalidEmail => SignupField::Email,
            Self::MissingPhone | Self::InvalidPhone => SignupField::Phone,
            Self::MissingPassword | Self::PasswordTooShort => SignupField::Password,
            Self::PasswordMismatch => SignupField::ConfirmPassword,
        }
    }
}

/// Raw signup form input.
///
/// Implements `Debug` manually to redact the passwords.
#[derive(Clone, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupForm")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("business_name", &self.business_name)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .finish()
    }
}

/// A validated application, ready to submit.
#[derive(Debug)]
pub struct SignupApplication {
    pub full_name: String,
    pub email: Email,
    pub phone: CleanPhone,
    pub business_name: Option<String>,
    password: SecretString,
}

impl SignupApplication {
    /// JSON body for `POST /sub-agent/store/{slug}/apply`.
    ///
    /// This is the only place the password leaves its `SecretString`.
    #[must_use]
    pub fn to_request_body(&self) -> serde_json::Value {
        serde_json::json!({
            "fullName": self.full_name,
            "email": self.email,
            "phoneNumber": self.phone,
            "businessName": self.business_name,
            "password": self.password.expose_secret(),
        })
    }

    /// Account summary kept after a successful application.
    #[must_use]
    pub fn account(&self, store_slug: &str, applied_at: DateTime<Utc>) -> ResellerAccount {
        ResellerAccount {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            store_slug: store_slug.to_string(),
            applied_at,
        }
    }
}

/// What the storefront remembers about a reseller application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResellerAccount {
    pub full_name: String,
    pub email: Email,
    pub phone: CleanPhone,
    pub store_slug: String,
    pub applied_at: DateTime<Utc>,
}

impl SignupForm {
    /// Validate every field, collecting all errors.
    ///
    /// # Errors
    ///
    /// Returns every failing rule, at most one per field.
    pub fn validate(&self) -> Result<SignupApplication, Vec<SignupError>> {
        let mut errors = Vec::new();

        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            errors.push(SignupError::MissingName);
        }

        let email = if self.email.trim().is_empty() {
            errors.push(SignupError::MissingEmail);
            None
        } else {
            Email::parse(&self.email)
                .map_err(|_| errors.push(SignupError::InvalidEmail))
                .ok()
        };

        let phone = match CleanPhone::local(&self.phone) {
            Ok(phone) => Some(phone),
            Err(PhoneError::Empty) => {
                errors.push(SignupError::MissingPhone);
                None
            }
            Err(_) => {
                errors.push(SignupError::InvalidPhone);
                None
            }
        };

        if self.password.is_empty() {
            errors.push(SignupError::MissingPassword);
        } else if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.push(SignupError::PasswordTooShort);
        }

        if !self.password.is_empty() && self.password != self.confirm_password {
            errors.push(SignupError::PasswordMismatch);
        }

        match (email, phone) {
            (Some(email), Some(phone)) if errors.is_empty() => {
                let business_name = self.business_name.trim();
                Ok(SignupApplication {
                    full_name: full_name.to_string(),
                    email,
                    phone,
                    business_name: (!business_name.is_empty()).then(|| business_name.to_string()),
                    password: SecretString::from(self.password.clone()),
                })
            }
            _ => Err(errors),
        }
    }
}

/// Errors keyed by field, for templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl FieldErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.password.is_none()
            && self.confirm_password.is_none()
    }
}

impl From<&[SignupError]> for FieldErrors {
    fn from(errors: &[SignupError]) -> Self {
        let mut fields = Self::default();
        for err in errors {
            let slot = match err.field() {
                SignupField::FullName => &mut fields.full_name,
                SignupField::Email => &mut fields.email,
                SignupField::Phone => &mut fields.phone,
                SignupField::Password => &mut fields.password,
                SignupField::ConfirmPassword => &mut fields.confirm_password,
            };
            slot.get_or_insert_with(|| err.to_string());
        }
        fields
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> SignupForm {
        SignupForm {
            full_name: "Kwame Mensah".to_string(),
            email: "kwame@example.com".to_string(),
            phone: "024 123 4567".to_string(),
            business_name: String::new(),
            password: "s3cret!".to_string(),
            confirm_password: "s3cret!".to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        let app = valid_form().validate().unwrap();
        assert_eq!(app.full_name, "Kwame Mensah");
        assert_eq!(app.phone.as_str(), "0241234567");
        assert!(app.business_name.is_none());
    }

    #[test]
    fn test_empty_form_reports_each_field() {
        let errors = SignupForm::default().validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                SignupError::MissingName,
                SignupError::MissingEmail,
                SignupError::MissingPhone,
                SignupError::MissingPassword,
            ]
        );
    }

    #[test]
    fn test_invalid_email_and_phone() {
        let mut form = valid_form();
        form.email = "kwame@localhost".to_string();
        form.phone = "24123456".to_string();
        let errors = form.validate().unwrap_err();
        assert!(errors.contains(&SignupError::InvalidEmail));
        assert!(errors.contains(&SignupError::InvalidPhone));
    }

    #[test]
    fn test_password_rules() {
        let mut form = valid_form();
        form.password = "abc".to_string();
        form.confirm_password = "abd".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors,
            vec![SignupError::PasswordTooShort, SignupError::PasswordMismatch]
        );
    }

    #[test]
    fn test_six_character_password_is_enough() {
        let mut form = valid_form();
        form.password = "abcdef".to_string();
        form.confirm_password = "abcdef".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let output = format!("{:?}", valid_form());
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("s3cret!"));

        let app = valid_form().validate().unwrap();
        assert!(!format!("{app:?}").contains("s3cret!"));
    }

    #[test]
    fn test_request_body_contains_password_but_account_does_not() {
        let app = valid_form().validate().unwrap();
        let body = app.to_request_body();
        assert_eq!(body["password"], "s3cret!");
        assert_eq!(body["phoneNumber"], "0241234567");

        let account = app.account("ama-data", Utc::now());
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("s3cret!"));
        assert!(json.contains("\"storeSlug\":\"ama-data\""));
    }

    #[test]
    fn test_field_errors_keep_first_message_per_field() {
        let errors = [SignupError::MissingEmail, SignupError::InvalidEmail];
        let fields = FieldErrors::from(&errors[..]);
        assert_eq!(fields.email.as_deref(), Some("Email is required"));
        assert!(fields.full_name.is_none());
        assert!(!fields.is_empty());
    }
}
