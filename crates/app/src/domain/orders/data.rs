//! Orders Data

use driftworks::{
    cart::CartLine,
    catalog::{DeliveryMode, LineKind, Product, ProductUuid},
    checkout::{Contact, ShippingAddress},
    selection::LineSelection,
};
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::{
    auth::UserUuid,
    domain::orders::records::{OrderItemUuid, OrderUuid},
};

/// New Order Data
///
/// Also stored as the pending checkout snapshot while a payment is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub user: UserUuid,
    pub total: u64,
    pub contact: Contact,
    pub shipping: Option<ShippingAddress>,
    pub idempotency_token: String,
    pub items: Vec<NewOrderItem>,
}

impl NewOrder {
    /// Sum of the item totals, `None` on overflow.
    pub fn items_total(&self) -> Option<u64> {
        self.items.iter().try_fold(0_u64, |total, item| {
            item.unit_price
                .checked_mul(u64::from(item.quantity))
                .and_then(|line| total.checked_add(line))
        })
    }
}

/// New Order Item Data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub uuid: OrderItemUuid,
    pub product: ProductUuid,
    pub product_slug: String,
    pub title: String,
    pub kind: LineKind,
    pub unit_price: u64,
    pub quantity: u32,
    pub variant_description: Option<String>,
    pub sku: Option<String>,
    pub location: Option<String>,
    pub addons: Vec<String>,
    pub delivery: Option<DeliveryMode>,
    pub recipient_name: Option<String>,
    pub preferred_date: Option<Date>,
}

impl NewOrderItem {
    /// Snapshot a priced cart line. `product` must be the product the line
    /// was priced against.
    pub fn snapshot(line: &CartLine, product: &Product) -> Self {
        let mut item = Self {
            uuid: OrderItemUuid::random(),
            product: product.uuid,
            product_slug: product.slug.clone(),
            title: line.title().to_string(),
            kind: line.kind(),
            unit_price: line.unit_price(),
            quantity: line.quantity(),
            variant_description: None,
            sku: None,
            location: None,
            addons: Vec::new(),
            delivery: None,
            recipient_name: None,
            preferred_date: None,
        };

        match line.selection() {
            LineSelection::Physical(_) => {
                if let Some(variant) = line.variant() {
                    item.variant_description = Some(variant.description.clone());
                    item.sku = Some(variant.sku.clone());
                }
            }
            LineSelection::Experience(selection) => {
                let name = |uuid| product.addon(uuid).map(|addon| addon.name.clone());

                item.location = selection.location().and_then(name);
                item.addons = selection
                    .addon_ids()
                    .filter(|uuid| Some(*uuid) != selection.location())
                    .filter_map(name)
                    .collect();
                item.delivery = selection
                    .delivery()
                    .and_then(|uuid| product.addon(uuid))
                    .and_then(|addon| addon.delivery);
                item.recipient_name = selection
                    .recipient_name()
                    .map(|recipient| recipient.as_str().to_string());
                item.preferred_date = selection.preferred_date();
            }
        }

        item
    }
}

#[cfg(test)]
mod tests {
    use driftworks::{
        cart::{Cart, CartError, LineUuid},
        fixtures::Fixture,
        selection::{ExperienceSelection, PhysicalSelection, RecipientName},
    };
    use jiff::civil::date;
    use testresult::TestResult;

    use crate::test::helpers::drift_fixture;

    use super::*;

    fn priced(
        fixture: &Fixture,
        product: &str,
        selection: LineSelection,
        quantity: u32,
    ) -> TestResult<(Cart, LineUuid)> {
        let product = fixture.product(product)?;
        let uuid = LineUuid::new();
        let mut cart = Cart::new();

        cart.add_line(fixture.catalog(), uuid, product.uuid, selection, quantity)?;

        Ok((cart, uuid))
    }

    #[test]
    fn experience_snapshot_keeps_names_and_date() -> TestResult {
        let fixture = drift_fixture()?;
        let taxi = fixture.product("drift-taxi")?;

        let mut selection = ExperienceSelection::from_addon_ids(
            taxi,
            [
                fixture.addon("drift-taxi", "gopro")?,
                fixture.addon("drift-taxi", "ring")?,
                fixture.addon("drift-taxi", "post")?,
            ],
        )?;

        selection.set_preferred_date(Some(date(2025, 6, 1)));
        selection.set_recipient_name(RecipientName::parse("Sam")?);

        let (cart, line) = priced(&fixture, "drift-taxi", LineSelection::Experience(selection), 1)?;
        let line = cart.line(line).ok_or(CartError::UnknownLine(line))?;

        let item = NewOrderItem::snapshot(line, taxi);

        assert_eq!(item.kind, LineKind::Experience);
        assert_eq!(item.product_slug, "drift-taxi");
        assert_eq!(item.location.as_deref(), Some("Nürburgring"));
        assert!(item.addons.iter().any(|name| name == "GoPro footage"));
        assert!(!item.addons.iter().any(|name| name == "Nürburgring"));
        assert_eq!(item.delivery, Some(DeliveryMode::Physical));
        assert_eq!(item.recipient_name.as_deref(), Some("Sam"));
        assert_eq!(item.preferred_date, Some(date(2025, 6, 1)));
        assert_eq!(item.uuid.into_uuid().get_version_num(), 4);

        Ok(())
    }

    #[test]
    fn physical_snapshot_keeps_variant() -> TestResult {
        let fixture = drift_fixture()?;
        let tshirt = fixture.product("team-tshirt")?;
        let selection = PhysicalSelection::from_pairs([("color", "black"), ("size", "M")]);

        let (cart, line) = priced(&fixture, "team-tshirt", LineSelection::Physical(selection), 2)?;
        let line = cart.line(line).ok_or(CartError::UnknownLine(line))?;

        let item = NewOrderItem::snapshot(line, tshirt);

        assert_eq!(item.sku.as_deref(), Some("TEE-BLK-M"));
        assert_eq!(item.variant_description.as_deref(), Some("color: black, size: M"));
        assert_eq!(item.quantity, 2);
        assert!(item.addons.is_empty());

        Ok(())
    }
}
