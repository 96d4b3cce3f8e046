//! Driftworks prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine, LineUuid, MAX_LINE_QUANTITY},
    catalog::{
        Addon, AddonGroup, AddonUuid, Catalog, DeliveryMode, ExperienceDetails, LineKind,
        OptionDimension, PhysicalDetails, Product, ProductKind, ProductLookup, ProductUuid,
        UnknownValue, Variant, VariantUuid,
    },
    checkout::{
        Contact, FieldError, ShippingAddress, ValidationErrors, manual_order_token,
        validate_checkout, validate_contact, validate_shipping,
    },
    fixtures::{Fixture, FixtureError},
    money::{MoneyError, format_minor},
    orders::{OrderStatus, OrderTransitionError},
    pricing::{Advisory, PriceResolution, PricingError, ResolvedVariant, resolve_line, resolve_price},
    selection::{
        ExperienceSelection, LineSelection, PhysicalSelection, RecipientName, SelectionError,
    },
    uuids::TypedUuid,
    vouchers::{DisplayStatus, ValidityWindow, VoucherStateError, VoucherStatus},
};
