//! Cart
//!
//! The client-held cart aggregate. Each mutation re-prices the touched line and
//! recomputes the subtotal before anything is written back, so a failed
//! mutation leaves the cart untouched and the subtotal is never stale.

use jiff::civil::Date;
use thiserror::Error;

use crate::{
    catalog::{AddonUuid, LineKind, Product, ProductLookup, ProductUuid},
    pricing::{Advisory, PriceResolution, PricingError, ResolvedVariant, resolve_line},
    selection::{LineSelection, RecipientName, SelectionError},
    uuids::TypedUuid,
};

/// Largest quantity a single line may hold.
pub const MAX_LINE_QUANTITY: u32 = 10;

/// Cart line UUID. Distinct from the product: one product may appear on
/// several lines with different selections.
pub type LineUuid = TypedUuid<CartLine>;

/// Errors related to cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The referenced product is not in the catalog.
    #[error("product {0} not found")]
    UnknownProduct(ProductUuid),

    /// The referenced line is not in the cart.
    #[error("line {0} not found")]
    UnknownLine(LineUuid),

    /// A line with this identity already exists.
    #[error("line {0} already exists")]
    DuplicateLine(LineUuid),

    /// Quantity outside `1..=MAX_LINE_QUANTITY`.
    #[error("quantity {0} is outside 1..={MAX_LINE_QUANTITY}")]
    QuantityOutOfBounds(u32),

    /// The mutation only applies to experience lines.
    #[error("line {0} is not an experience line")]
    NotAnExperience(LineUuid),

    /// A physical line keeps the variant it was added with; remove the line
    /// and add a new one instead.
    #[error("line {0} cannot change its variant")]
    VariantLocked(LineUuid),

    /// The selection could not be edited.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// The line could not be priced.
    #[error("line {line} cannot be priced: {source}")]
    Pricing {
        /// Offending line.
        line: LineUuid,
        /// Pricing failure.
        #[source]
        source: PricingError,
    },
}

/// A priced cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    uuid: LineUuid,
    product: ProductUuid,
    title: String,
    quantity: u32,
    selection: LineSelection,
    resolution: PriceResolution,
}

impl CartLine {
    /// Line identity.
    pub fn uuid(&self) -> LineUuid {
        self.uuid
    }

    /// Product reference.
    pub fn product(&self) -> ProductUuid {
        self.product
    }

    /// Product title at pricing time.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Line kind.
    pub fn kind(&self) -> LineKind {
        self.selection.kind()
    }

    /// Units on this line.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Kind-specific selection.
    pub fn selection(&self) -> &LineSelection {
        &self.selection
    }

    /// Resolved unit price in minor units.
    pub fn unit_price(&self) -> u64 {
        self.resolution.unit_price
    }

    /// Matched variant of a physical line.
    pub fn variant(&self) -> Option<&ResolvedVariant> {
        self.resolution.variant.as_ref()
    }

    /// Advisories raised while pricing.
    pub fn advisories(&self) -> &[Advisory] {
        &self.resolution.advisories
    }

    /// Whether this line needs a shipping address.
    pub fn requires_shipping(&self) -> bool {
        self.resolution.requires_shipping
    }

    /// Unit price times quantity, `None` on overflow.
    pub fn line_total(&self) -> Option<u64> {
        self.resolution
            .unit_price
            .checked_mul(u64::from(self.quantity))
    }
}

/// Cart
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
    subtotal: u64,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Find a line.
    pub fn line(&self, uuid: LineUuid) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.uuid == uuid)
    }

    /// Sum of unit price times quantity over all lines, in minor units.
    pub fn subtotal(&self) -> u64 {
        self.subtotal
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether any line needs a shipping address.
    pub fn requires_shipping(&self) -> bool {
        self.lines.iter().any(CartLine::requires_shipping)
    }

    /// Add a new line.
    ///
    /// # Errors
    ///
    /// Fails when the line identity is taken, the product is unknown, the
    /// quantity is out of bounds or the line cannot be priced.
    pub fn add_line(
        &mut self,
        catalog: &impl ProductLookup,
        uuid: LineUuid,
        product: ProductUuid,
        selection: LineSelection,
        quantity: u32,
    ) -> Result<&CartLine, CartError> {
        if self.line(uuid).is_some() {
            return Err(CartError::DuplicateLine(uuid));
        }

        let product = catalog
            .product(product)
            .ok_or(CartError::UnknownProduct(product))?;

        let line = price_line(product, uuid, selection, quantity)?;

        let mut lines = self.lines.clone();
        lines.push(line);

        self.commit(lines)?;

        self.lines
            .last()
            .ok_or(CartError::UnknownLine(uuid))
    }

    /// Remove a line entirely.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownLine`] when the line is not in the cart.
    pub fn remove_line(&mut self, uuid: LineUuid) -> Result<CartLine, CartError> {
        let index = self
            .lines
            .iter()
            .position(|line| line.uuid == uuid)
            .ok_or(CartError::UnknownLine(uuid))?;

        let mut lines = self.lines.clone();
        let removed = lines.remove(index);

        self.commit(lines)?;

        Ok(removed)
    }

    /// Add one unit to a line.
    ///
    /// # Errors
    ///
    /// Fails when the line is unknown, the bound is reached or stock runs out.
    pub fn increment(&mut self, catalog: &impl ProductLookup, uuid: LineUuid) -> Result<(), CartError> {
        let quantity = self.quantity_of(uuid)?;

        self.set_quantity(catalog, uuid, quantity.saturating_add(1))
    }

    /// Remove one unit from a line; removing the last unit removes the line.
    ///
    /// # Errors
    ///
    /// Fails when the line is unknown or can no longer be priced.
    pub fn decrement(&mut self, catalog: &impl ProductLookup, uuid: LineUuid) -> Result<(), CartError> {
        let quantity = self.quantity_of(uuid)?;

        self.set_quantity(catalog, uuid, quantity.saturating_sub(1))
    }

    /// Set a line's quantity; zero removes the line.
    ///
    /// # Errors
    ///
    /// Fails when the line is unknown, the quantity exceeds the bound or stock
    /// runs out.
    pub fn set_quantity(
        &mut self,
        catalog: &impl ProductLookup,
        uuid: LineUuid,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove_line(uuid).map(|_removed| ());
        }

        self.update_line(catalog, uuid, |line_quantity, _selection| {
            *line_quantity = quantity;

            Ok(())
        })
    }

    /// Set or clear the voucher recipient of an experience line.
    ///
    /// # Errors
    ///
    /// Fails for physical lines and names longer than 16 characters.
    pub fn update_recipient_name(
        &mut self,
        catalog: &impl ProductLookup,
        uuid: LineUuid,
        name: &str,
    ) -> Result<(), CartError> {
        let name = RecipientName::parse(name)?;

        self.update_experience(catalog, uuid, |_product, selection| {
            selection.set_recipient_name(name);

            Ok(())
        })
    }

    /// Set or clear the preferred date of an experience line.
    ///
    /// # Errors
    ///
    /// Fails for physical lines.
    pub fn set_preferred_date(
        &mut self,
        catalog: &impl ProductLookup,
        uuid: LineUuid,
        date: Option<Date>,
    ) -> Result<(), CartError> {
        self.update_experience(catalog, uuid, |_product, selection| {
            selection.set_preferred_date(date);

            Ok(())
        })
    }

    /// Select an addon on an experience line. Selecting a member of an
    /// exclusive group replaces the current member.
    ///
    /// # Errors
    ///
    /// Fails for physical lines and addons the product does not offer.
    pub fn select_addon(
        &mut self,
        catalog: &impl ProductLookup,
        uuid: LineUuid,
        addon: AddonUuid,
    ) -> Result<(), CartError> {
        self.update_experience(catalog, uuid, |product, selection| {
            let addon = product
                .addon(addon)
                .ok_or(SelectionError::UnknownAddon(addon))?;

            selection.select(addon);

            Ok(())
        })
    }

    /// Deselect an addon on an experience line.
    ///
    /// # Errors
    ///
    /// Fails for physical lines.
    pub fn deselect_addon(
        &mut self,
        catalog: &impl ProductLookup,
        uuid: LineUuid,
        addon: AddonUuid,
    ) -> Result<(), CartError> {
        self.update_experience(catalog, uuid, |_product, selection| {
            selection.deselect(addon);

            Ok(())
        })
    }

    /// Re-price every line against the given catalog.
    ///
    /// # Errors
    ///
    /// Fails with the first line that can no longer be priced; the cart is
    /// left unchanged in that case.
    pub fn reprice(&mut self, catalog: &impl ProductLookup) -> Result<(), CartError> {
        let lines = self
            .lines
            .iter()
            .map(|line| {
                let product = catalog
                    .product(line.product)
                    .ok_or(CartError::UnknownProduct(line.product))?;

                price_line(product, line.uuid, line.selection.clone(), line.quantity)
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.commit(lines)
    }

    fn quantity_of(&self, uuid: LineUuid) -> Result<u32, CartError> {
        self.line(uuid)
            .map(CartLine::quantity)
            .ok_or(CartError::UnknownLine(uuid))
    }

    fn update_experience(
        &mut self,
        catalog: &impl ProductLookup,
        uuid: LineUuid,
        edit: impl FnOnce(
            &Product,
            &mut crate::selection::ExperienceSelection,
        ) -> Result<(), CartError>,
    ) -> Result<(), CartError> {
        let product_uuid = self
            .line(uuid)
            .map(CartLine::product)
            .ok_or(CartError::UnknownLine(uuid))?;

        let product = catalog
            .product(product_uuid)
            .ok_or(CartError::UnknownProduct(product_uuid))?;

        self.update_line(catalog, uuid, |_quantity, selection| match selection {
            LineSelection::Experience(selection) => edit(product, selection),
            LineSelection::Physical(_) => Err(CartError::NotAnExperience(uuid)),
        })
    }

    fn update_line(
        &mut self,
        catalog: &impl ProductLookup,
        uuid: LineUuid,
        edit: impl FnOnce(&mut u32, &mut LineSelection) -> Result<(), CartError>,
    ) -> Result<(), CartError> {
        let index = self
            .lines
            .iter()
            .position(|line| line.uuid == uuid)
            .ok_or(CartError::UnknownLine(uuid))?;

        let mut lines = self.lines.clone();

        let line = lines.get_mut(index).ok_or(CartError::UnknownLine(uuid))?;

        let mut quantity = line.quantity;
        let mut selection = line.selection.clone();

        edit(&mut quantity, &mut selection)?;

        if matches!(line.selection, LineSelection::Physical(_)) && selection != line.selection {
            return Err(CartError::VariantLocked(uuid));
        }

        let product = catalog
            .product(line.product)
            .ok_or(CartError::UnknownProduct(line.product))?;

        *line = price_line(product, uuid, selection, quantity)?;

        self.commit(lines)
    }

    fn commit(&mut self, lines: Vec<CartLine>) -> Result<(), CartError> {
        let mut subtotal: u64 = 0;

        for line in &lines {
            subtotal = line
                .line_total()
                .and_then(|total| subtotal.checked_add(total))
                .ok_or(CartError::Pricing {
                    line: line.uuid,
                    source: PricingError::PriceOutOfRange,
                })?;
        }

        self.lines = lines;
        self.subtotal = subtotal;

        Ok(())
    }
}

fn price_line(
    product: &Product,
    uuid: LineUuid,
    selection: LineSelection,
    quantity: u32,
) -> Result<CartLine, CartError> {
    if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
        return Err(CartError::QuantityOutOfBounds(quantity));
    }

    let resolution = resolve_line(product, &selection, quantity)
        .map_err(|source| CartError::Pricing { line: uuid, source })?;

    Ok(CartLine {
        uuid,
        product: product.uuid,
        title: product.title.clone(),
        quantity,
        selection,
        resolution,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use testresult::TestResult;

    use crate::{
        catalog::{
            Addon, AddonGroup, Catalog, ExperienceDetails, OptionDimension, PhysicalDetails,
            ProductKind, Variant, VariantUuid,
        },
        selection::{ExperienceSelection, PhysicalSelection},
    };

    use super::*;

    struct Fixture {
        catalog: Catalog,
        taxi: ProductUuid,
        tshirt: ProductUuid,
        gopro: AddonUuid,
        ring: AddonUuid,
        airfield: AddonUuid,
    }

    fn fixture(stock: u32) -> Fixture {
        let gopro = Addon {
            uuid: AddonUuid::new(),
            name: "GoPro".to_string(),
            group: AddonGroup::Standard,
            price: Some(50_00),
            delivery: None,
        };

        let ring = Addon {
            uuid: AddonUuid::new(),
            name: "Ring".to_string(),
            group: AddonGroup::Location,
            price: None,
            delivery: None,
        };

        let airfield = Addon {
            uuid: AddonUuid::new(),
            name: "Airfield".to_string(),
            group: AddonGroup::Location,
            price: None,
            delivery: None,
        };

        let taxi = Product {
            uuid: ProductUuid::new(),
            slug: "drift-taxi".to_string(),
            title: "Drift Taxi".to_string(),
            base_price: Some(325_00),
            kind: ProductKind::Experience(ExperienceDetails {
                addons: vec![gopro.clone(), ring.clone(), airfield.clone()],
            }),
        };

        let tshirt = Product {
            uuid: ProductUuid::new(),
            slug: "tshirt".to_string(),
            title: "Team T-Shirt".to_string(),
            base_price: Some(20_00),
            kind: ProductKind::Physical(PhysicalDetails {
                options: vec![OptionDimension {
                    name: "size".to_string(),
                    values: vec!["M".to_string()],
                }],
                variants: vec![Variant {
                    uuid: VariantUuid::new(),
                    sku: "TEE-M".to_string(),
                    options: BTreeMap::from([("size".to_string(), "M".to_string())]),
                    price_modifier: 5_00,
                    stock,
                }],
                low_stock_threshold: 0,
            }),
        };

        Fixture {
            taxi: taxi.uuid,
            tshirt: tshirt.uuid,
            gopro: gopro.uuid,
            ring: ring.uuid,
            airfield: airfield.uuid,
            catalog: Catalog::new([taxi, tshirt]),
        }
    }

    fn size_m() -> LineSelection {
        LineSelection::Physical(PhysicalSelection::from_pairs([("size", "M")]))
    }

    fn no_addons() -> LineSelection {
        LineSelection::Experience(ExperienceSelection::default())
    }

    #[test]
    fn mixed_cart_subtotal() -> TestResult {
        let fx = fixture(10);
        let mut cart = Cart::new();
        let taxi_line = LineUuid::new();

        cart.add_line(&fx.catalog, taxi_line, fx.taxi, no_addons(), 1)?;
        cart.select_addon(&fx.catalog, taxi_line, fx.gopro)?;
        cart.add_line(&fx.catalog, LineUuid::new(), fx.tshirt, size_m(), 2)?;

        assert_eq!(cart.subtotal(), 425_00);

        Ok(())
    }

    #[test]
    fn same_product_on_two_lines() -> TestResult {
        let fx = fixture(10);
        let mut cart = Cart::new();

        cart.add_line(&fx.catalog, LineUuid::new(), fx.taxi, no_addons(), 1)?;
        cart.add_line(&fx.catalog, LineUuid::new(), fx.taxi, no_addons(), 1)?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.subtotal(), 650_00);

        Ok(())
    }

    #[test]
    fn decrementing_last_unit_removes_line() -> TestResult {
        let fx = fixture(10);
        let mut cart = Cart::new();
        let line = LineUuid::new();

        cart.add_line(&fx.catalog, line, fx.tshirt, size_m(), 1)?;
        cart.decrement(&fx.catalog, line)?;

        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), 0);

        Ok(())
    }

    #[test]
    fn increment_recomputes_subtotal() -> TestResult {
        let fx = fixture(10);
        let mut cart = Cart::new();
        let line = LineUuid::new();

        cart.add_line(&fx.catalog, line, fx.tshirt, size_m(), 1)?;
        cart.increment(&fx.catalog, line)?;

        assert_eq!(cart.line(line).map(CartLine::quantity), Some(2));
        assert_eq!(cart.subtotal(), 50_00);

        Ok(())
    }

    #[test]
    fn increment_beyond_stock_leaves_cart_untouched() -> TestResult {
        let fx = fixture(1);
        let mut cart = Cart::new();
        let line = LineUuid::new();

        cart.add_line(&fx.catalog, line, fx.tshirt, size_m(), 1)?;

        let before = cart.clone();
        let result = cart.increment(&fx.catalog, line);

        assert!(
            matches!(
                result,
                Err(CartError::Pricing {
                    source: PricingError::OutOfStock { .. },
                    ..
                })
            ),
            "expected OutOfStock, got {result:?}"
        );
        assert_eq!(cart, before);

        Ok(())
    }

    #[test]
    fn quantity_is_bounded() -> TestResult {
        let fx = fixture(100);
        let mut cart = Cart::new();
        let line = LineUuid::new();

        cart.add_line(&fx.catalog, line, fx.tshirt, size_m(), MAX_LINE_QUANTITY)?;

        let result = cart.increment(&fx.catalog, line);

        assert_eq!(
            result,
            Err(CartError::QuantityOutOfBounds(MAX_LINE_QUANTITY + 1))
        );

        Ok(())
    }

    #[test]
    fn second_location_replaces_first() -> TestResult {
        let fx = fixture(1);
        let mut cart = Cart::new();
        let line = LineUuid::new();

        cart.add_line(&fx.catalog, line, fx.taxi, no_addons(), 1)?;
        cart.select_addon(&fx.catalog, line, fx.ring)?;
        cart.select_addon(&fx.catalog, line, fx.airfield)?;

        let Some(LineSelection::Experience(selection)) = cart.line(line).map(CartLine::selection)
        else {
            return Err("expected an experience line".into());
        };

        assert_eq!(selection.location(), Some(fx.airfield));

        Ok(())
    }

    #[test]
    fn recipient_name_is_limited() -> TestResult {
        let fx = fixture(1);
        let mut cart = Cart::new();
        let line = LineUuid::new();

        cart.add_line(&fx.catalog, line, fx.taxi, no_addons(), 1)?;

        let result = cart.update_recipient_name(&fx.catalog, line, "Bartholomew Smith");

        assert_eq!(
            result,
            Err(CartError::Selection(SelectionError::RecipientNameTooLong))
        );

        Ok(())
    }

    #[test]
    fn recipient_name_on_physical_line_is_rejected() -> TestResult {
        let fx = fixture(1);
        let mut cart = Cart::new();
        let line = LineUuid::new();

        cart.add_line(&fx.catalog, line, fx.tshirt, size_m(), 1)?;

        let result = cart.update_recipient_name(&fx.catalog, line, "Kim");

        assert_eq!(result, Err(CartError::NotAnExperience(line)));

        Ok(())
    }

    #[test]
    fn physical_variant_cannot_change_after_add() -> TestResult {
        let fx = fixture(10);
        let mut cart = Cart::new();
        let line = LineUuid::new();

        cart.add_line(&fx.catalog, line, fx.tshirt, size_m(), 1)?;

        let result = cart.update_line(&fx.catalog, line, |_quantity, selection| {
            if let LineSelection::Physical(selection) = selection {
                selection.options.insert("size".to_string(), "L".to_string());
            }

            Ok(())
        });

        assert_eq!(result, Err(CartError::VariantLocked(line)));
        assert_eq!(
            cart.line(line).and_then(CartLine::variant).map(|v| v.sku.as_str()),
            Some("TEE-M")
        );
        assert_eq!(cart.subtotal(), 25_00);

        Ok(())
    }

    #[test]
    fn physical_quantity_still_changes() -> TestResult {
        let fx = fixture(10);
        let mut cart = Cart::new();
        let line = LineUuid::new();

        cart.add_line(&fx.catalog, line, fx.tshirt, size_m(), 1)?;
        cart.increment(&fx.catalog, line)?;

        assert_eq!(cart.line(line).map(CartLine::quantity), Some(2));
        assert_eq!(cart.subtotal(), 50_00);

        Ok(())
    }

    #[test]
    fn unknown_product_is_rejected() {
        let fx = fixture(1);
        let mut cart = Cart::new();
        let product = ProductUuid::new();

        let result = cart
            .add_line(&fx.catalog, LineUuid::new(), product, no_addons(), 1)
            .map(CartLine::uuid);

        assert_eq!(result, Err(CartError::UnknownProduct(product)));
    }

    #[test]
    fn reprice_picks_up_catalog_changes() -> TestResult {
        let mut fx = fixture(10);
        let mut cart = Cart::new();

        cart.add_line(&fx.catalog, LineUuid::new(), fx.tshirt, size_m(), 2)?;

        let mut tshirt = fx
            .catalog
            .product(fx.tshirt)
            .cloned()
            .ok_or("tshirt missing")?;

        tshirt.base_price = Some(30_00);
        fx.catalog.insert(tshirt);

        cart.reprice(&fx.catalog)?;

        assert_eq!(cart.subtotal(), 70_00);

        Ok(())
    }
}
