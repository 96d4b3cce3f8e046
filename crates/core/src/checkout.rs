//! Checkout Validation
//!
//! Field-level validation of the checkout payload. Every problem is collected
//! before anything is reported so the caller can show all of them at once.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the user prefix in manual order tokens.
const MANUAL_TOKEN_USER_PREFIX: usize = 8;

/// Contact details supplied at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Contact {
    /// Full name.
    pub name: String,

    /// E-mail address.
    pub email: String,

    /// Phone number.
    pub phone: String,
}

/// Shipping address supplied at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Street and house number.
    pub line1: String,

    /// Additional address line.
    #[serde(default)]
    pub line2: Option<String>,

    /// City
    pub city: String,

    /// Postal code
    pub postal_code: String,

    /// ISO country code.
    pub country: String,
}

/// A single invalid field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted field path, e.g. `shipping.city`.
    pub field: String,

    /// Human readable problem.
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// All field errors found in a checkout payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    /// Whether no errors were collected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The collected errors.
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    fn push(&mut self, field: &str, message: &str) {
        self.0.push(FieldError::new(field, message));
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self
            .0
            .iter()
            .map(|error| error.field.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        write!(f, "invalid checkout fields: {fields}")
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate contact details.
///
/// # Errors
///
/// Returns every missing or malformed contact field.
pub fn validate_contact(contact: &Contact) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    check_contact(contact, &mut errors);

    errors.into_result()
}

/// Validate a shipping address when one is required.
///
/// Returns the trimmed address snapshot to store with the order, or `None`
/// when shipping is not required.
///
/// # Errors
///
/// Returns every missing field when shipping is required.
pub fn validate_shipping(
    shipping: Option<&ShippingAddress>,
    required: bool,
) -> Result<Option<ShippingAddress>, ValidationErrors> {
    if !required {
        return Ok(None);
    }

    let mut errors = ValidationErrors::default();

    let snapshot = check_shipping(shipping, &mut errors);

    errors.into_result().map(|()| snapshot)
}

/// Validate contact and shipping together so every field error is reported
/// in one go.
///
/// # Errors
///
/// Returns all contact and shipping field errors.
pub fn validate_checkout(
    contact: &Contact,
    shipping: Option<&ShippingAddress>,
    shipping_required: bool,
) -> Result<Option<ShippingAddress>, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    check_contact(contact, &mut errors);

    let snapshot = if shipping_required {
        check_shipping(shipping, &mut errors)
    } else {
        None
    };

    errors.into_result().map(|()| snapshot)
}

/// Idempotency token for an order that needs no payment.
pub fn manual_order_token(now: Timestamp, user: Uuid) -> String {
    let simple = user.simple().to_string();
    let prefix: String = simple.chars().take(MANUAL_TOKEN_USER_PREFIX).collect();

    format!("manual_{}_{prefix}", now.as_millisecond())
}

fn check_contact(contact: &Contact, errors: &mut ValidationErrors) {
    if contact.name.trim().is_empty() {
        errors.push("contact.name", "is required");
    }

    let email = contact.email.trim();

    if email.is_empty() {
        errors.push("contact.email", "is required");
    } else if !looks_like_email(email) {
        errors.push("contact.email", "is not a valid e-mail address");
    }

    if contact.phone.trim().is_empty() {
        errors.push("contact.phone", "is required");
    }
}

fn check_shipping(
    shipping: Option<&ShippingAddress>,
    errors: &mut ValidationErrors,
) -> Option<ShippingAddress> {
    let Some(shipping) = shipping else {
        errors.push("shipping", "is required");

        return None;
    };

    let required = [
        ("shipping.line1", &shipping.line1),
        ("shipping.city", &shipping.city),
        ("shipping.postal_code", &shipping.postal_code),
        ("shipping.country", &shipping.country),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(field, "is required");
        }
    }

    Some(ShippingAddress {
        line1: shipping.line1.trim().to_string(),
        line2: shipping
            .line2
            .as_deref()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string),
        city: shipping.city.trim().to_string(),
        postal_code: shipping.postal_code.trim().to_string(),
        country: shipping.country.trim().to_uppercase(),
    })
}

fn looks_like_email(email: &str) -> bool {
    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
}
