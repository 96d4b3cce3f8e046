//! Cart payloads

use driftworks::{
    cart::{Cart, CartLine},
    pricing::Advisory,
};
use rusty_money::iso::Currency;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, money::MoneyResponse};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// Priced lines in request order
    pub lines: Vec<CartLineResponse>,

    /// Sum of all line totals
    pub subtotal: MoneyResponse,

    /// Whether checkout needs a shipping address
    pub requires_shipping: bool,
}

impl CartResponse {
    pub(crate) fn new(cart: &Cart, currency: &'static Currency) -> Result<Self, StatusError> {
        let lines = cart
            .lines()
            .iter()
            .map(|line| CartLineResponse::new(line, currency))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            lines,
            subtotal: MoneyResponse::new(cart.subtotal(), currency)?,
            requires_shipping: cart.requires_shipping(),
        })
    }
}

/// Cart Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineResponse {
    /// Product on this line
    pub product_uuid: Uuid,

    /// Product title
    pub title: String,

    /// `physical` or `experience`
    pub kind: String,

    /// Units on this line
    pub quantity: u32,

    /// Matched variant SKU
    pub sku: Option<String>,

    /// Matched variant, e.g. `color: black, size: M`
    pub variant: Option<String>,

    /// Price of one unit
    pub unit_price: MoneyResponse,

    /// Unit price times quantity
    pub line_total: MoneyResponse,

    /// Non-fatal pricing notices
    pub advisories: Vec<AdvisoryResponse>,
}

impl CartLineResponse {
    fn new(line: &CartLine, currency: &'static Currency) -> Result<Self, StatusError> {
        let line_total = line
            .line_total()
            .ok_or("line total overflows")
            .or_500("failed to render cart line")?;

        Ok(Self {
            product_uuid: line.product().into_uuid(),
            title: line.title().to_string(),
            kind: line.kind().as_str().to_string(),
            quantity: line.quantity(),
            sku: line.variant().map(|variant| variant.sku.clone()),
            variant: line.variant().map(|variant| variant.description.clone()),
            unit_price: MoneyResponse::new(line.unit_price(), currency)?,
            line_total: MoneyResponse::new(line_total, currency)?,
            advisories: line.advisories().iter().map(AdvisoryResponse::from).collect(),
        })
    }
}

/// Advisory Response
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct AdvisoryResponse {
    /// `low_stock` or `price_on_request`
    pub kind: String,

    /// Variant running low
    pub sku: Option<String>,

    /// Units left
    pub remaining: Option<u32>,
}

impl From<&Advisory> for AdvisoryResponse {
    fn from(advisory: &Advisory) -> Self {
        match advisory {
            Advisory::LowStock { sku, remaining } => Self {
                kind: "low_stock".to_string(),
                sku: Some(sku.clone()),
                remaining: Some(*remaining),
            },
            Advisory::PriceOnRequest => Self {
                kind: "price_on_request".to_string(),
                sku: None,
                remaining: None,
            },
        }
    }
}
