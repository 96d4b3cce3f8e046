//! Contact and shipping payloads shared by checkout, orders and profiles.

use driftworks::checkout::{Contact, ShippingAddress};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

/// Contact details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ContactBody {
    /// Full name
    pub name: String,

    /// E-mail address
    pub email: String,

    /// Phone number
    pub phone: String,
}

impl From<ContactBody> for Contact {
    fn from(body: ContactBody) -> Self {
        Self {
            name: body.name,
            email: body.email,
            phone: body.phone,
        }
    }
}

impl From<Contact> for ContactBody {
    fn from(contact: Contact) -> Self {
        Self {
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
        }
    }
}

/// Shipping address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShippingAddressBody {
    /// First address line
    pub line1: String,

    /// Second address line
    #[serde(default)]
    pub line2: Option<String>,

    /// City
    pub city: String,

    /// Postal code
    pub postal_code: String,

    /// ISO country code
    pub country: String,
}

impl From<ShippingAddressBody> for ShippingAddress {
    fn from(body: ShippingAddressBody) -> Self {
        Self {
            line1: body.line1,
            line2: body.line2,
            city: body.city,
            postal_code: body.postal_code,
            country: body.country,
        }
    }
}

impl From<ShippingAddress> for ShippingAddressBody {
    fn from(address: ShippingAddress) -> Self {
        Self {
            line1: address.line1,
            line2: address.line2,
            city: address.city,
            postal_code: address.postal_code,
            country: address.country,
        }
    }
}
