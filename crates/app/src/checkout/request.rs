//! Checkout requests and outcomes.

use std::collections::BTreeMap;

use driftworks::{
    catalog::{AddonUuid, Product, ProductUuid},
    checkout::{Contact, ShippingAddress},
    selection::{
        ExperienceSelection, LineSelection, PhysicalSelection, RecipientName, SelectionError,
    },
};
use jiff::civil::Date;

use crate::{auth::UserUuid, domain::orders::records::CreatedOrder};

/// A cart line as held by the client. Prices are never taken from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedLine {
    pub product: ProductUuid,
    pub quantity: u32,
    pub choice: LineChoice,
}

/// What the customer picked for a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineChoice {
    Physical {
        options: BTreeMap<String, String>,
    },
    Experience {
        addons: Vec<AddonUuid>,
        preferred_date: Option<Date>,
        recipient_name: Option<String>,
    },
}

impl LineChoice {
    /// Build the selection for `product`.
    ///
    /// # Errors
    ///
    /// Fails on addons the product does not offer and on recipient names
    /// longer than 16 characters.
    pub fn into_selection(self, product: &Product) -> Result<LineSelection, SelectionError> {
        match self {
            Self::Physical { options } => Ok(LineSelection::Physical(PhysicalSelection { options })),
            Self::Experience {
                addons,
                preferred_date,
                recipient_name,
            } => {
                let mut selection = ExperienceSelection::from_addon_ids(product, addons)?;

                selection.set_preferred_date(preferred_date);
                selection.set_recipient_name(
                    recipient_name
                        .as_deref()
                        .map(RecipientName::parse)
                        .transpose()?
                        .flatten(),
                );

                Ok(LineSelection::Experience(selection))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub user: UserUuid,
    pub lines: Vec<RequestedLine>,
    pub contact: Contact,
    pub shipping: Option<ShippingAddress>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    /// The order is created once the provider confirms `payment_reference`.
    PaymentRequired {
        client_secret: String,
        payment_reference: String,
        total: u64,
    },

    /// Nothing to pay; the order exists.
    Completed(CreatedOrder),
}
