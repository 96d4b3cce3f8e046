//! Line Selections
//!
//! What a customer picked for a cart line. Physical and experience lines carry
//! different payloads, so the selection is a tagged enum and the pricing
//! resolver matches on it exhaustively.

use std::collections::BTreeMap;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::catalog::{Addon, AddonGroup, AddonUuid, LineKind, Product};

/// Maximum length of a voucher recipient name, in characters.
pub const RECIPIENT_NAME_MAX_CHARS: usize = 16;

/// Selection errors raised while building or editing a selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// The addon does not belong to the product.
    #[error("addon {0} is not offered for this product")]
    UnknownAddon(AddonUuid),

    /// Recipient names are limited to 16 characters.
    #[error("recipient name exceeds {RECIPIENT_NAME_MAX_CHARS} characters")]
    RecipientNameTooLong,

    /// A stored recipient name must not be blank.
    #[error("recipient name is blank")]
    BlankRecipientName,
}

/// Kind-specific selection payload of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineSelection {
    /// Variant selection for physical goods.
    Physical(PhysicalSelection),

    /// Addon, date and recipient selection for experiences.
    Experience(ExperienceSelection),
}

impl LineSelection {
    /// The kind of line this selection belongs to.
    pub fn kind(&self) -> LineKind {
        match self {
            Self::Physical(_) => LineKind::Physical,
            Self::Experience(_) => LineKind::Experience,
        }
    }
}

/// Option values chosen for a physical product.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhysicalSelection {
    /// Option name to chosen value.
    pub options: BTreeMap<String, String>,
}

impl PhysicalSelection {
    /// Build a selection from `(name, value)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            options: pairs
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }
}

/// A validated voucher recipient name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecipientName(String);

impl RecipientName {
    /// Validate and trim a recipient name. Blank input yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::RecipientNameTooLong`] when the trimmed name
    /// exceeds [`RECIPIENT_NAME_MAX_CHARS`].
    pub fn parse(name: &str) -> Result<Option<Self>, SelectionError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Ok(None);
        }

        if trimmed.chars().count() > RECIPIENT_NAME_MAX_CHARS {
            return Err(SelectionError::RecipientNameTooLong);
        }

        Ok(Some(Self(trimmed.to_string())))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RecipientName {
    type Error = SelectionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)?.ok_or(SelectionError::BlankRecipientName)
    }
}

impl From<RecipientName> for String {
    fn from(value: RecipientName) -> Self {
        value.0
    }
}

/// Choices made for an experience line.
///
/// Exclusive addon groups are stored in single slots, so a selection holding
/// two locations cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExperienceSelection {
    standard: SmallVec<[AddonUuid; 4]>,
    location: Option<AddonUuid>,
    duration: Option<AddonUuid>,
    delivery: Option<AddonUuid>,
    preferred_date: Option<Date>,
    recipient_name: Option<RecipientName>,
}

impl ExperienceSelection {
    /// Build a selection from a flat list of addon ids, applying them in
    /// order. A later member of an exclusive group replaces an earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::UnknownAddon`] when an id does not belong to
    /// the product.
    pub fn from_addon_ids(
        product: &Product,
        addons: impl IntoIterator<Item = AddonUuid>,
    ) -> Result<Self, SelectionError> {
        let mut selection = Self::default();

        for uuid in addons {
            let addon = product
                .addon(uuid)
                .ok_or(SelectionError::UnknownAddon(uuid))?;

            selection.select(addon);
        }

        Ok(selection)
    }

    /// Select an addon. Standard addons accumulate; members of exclusive
    /// groups replace the current member of their group.
    pub fn select(&mut self, addon: &Addon) {
        match addon.group {
            AddonGroup::Standard => {
                if !self.standard.contains(&addon.uuid) {
                    self.standard.push(addon.uuid);
                }
            }
            AddonGroup::Location => self.location = Some(addon.uuid),
            AddonGroup::Duration => self.duration = Some(addon.uuid),
            AddonGroup::VoucherDelivery => self.delivery = Some(addon.uuid),
        }
    }

    /// Remove an addon from the selection, whatever its group.
    pub fn deselect(&mut self, uuid: AddonUuid) {
        self.standard.retain(|selected| *selected != uuid);

        for slot in [&mut self.location, &mut self.duration, &mut self.delivery] {
            if *slot == Some(uuid) {
                *slot = None;
            }
        }
    }

    /// Every selected addon id: standard ones first, then location, duration
    /// and delivery.
    pub fn addon_ids(&self) -> impl Iterator<Item = AddonUuid> + '_ {
        self.standard
            .iter()
            .copied()
            .chain(self.location)
            .chain(self.duration)
            .chain(self.delivery)
    }

    /// Whether the addon is selected.
    pub fn is_selected(&self, uuid: AddonUuid) -> bool {
        self.addon_ids().any(|selected| selected == uuid)
    }

    /// Selected location addon.
    pub fn location(&self) -> Option<AddonUuid> {
        self.location
    }

    /// Selected duration addon.
    pub fn duration(&self) -> Option<AddonUuid> {
        self.duration
    }

    /// Selected voucher delivery addon.
    pub fn delivery(&self) -> Option<AddonUuid> {
        self.delivery
    }

    /// Preferred experience date.
    pub fn preferred_date(&self) -> Option<Date> {
        self.preferred_date
    }

    /// Set or clear the preferred date.
    pub fn set_preferred_date(&mut self, date: Option<Date>) {
        self.preferred_date = date;
    }

    /// Voucher recipient.
    pub fn recipient_name(&self) -> Option<&RecipientName> {
        self.recipient_name.as_ref()
    }

    /// Set or clear the recipient.
    pub fn set_recipient_name(&mut self, name: Option<RecipientName>) {
        self.recipient_name = name;
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::catalog::{ExperienceDetails, ProductKind, ProductUuid};

    use super::*;

    fn addon(name: &str, group: AddonGroup) -> Addon {
        Addon {
            uuid: AddonUuid::new(),
            name: name.to_string(),
            group,
            price: None,
            delivery: None,
        }
    }

    fn experience(addons: Vec<Addon>) -> Product {
        Product {
            uuid: ProductUuid::new(),
            slug: "drift-taxi".to_string(),
            title: "Drift Taxi".to_string(),
            base_price: Some(325_00),
            kind: ProductKind::Experience(ExperienceDetails { addons }),
        }
    }

    #[test]
    fn second_location_replaces_first() {
        let ring = addon("Ring", AddonGroup::Location);
        let airfield = addon("Airfield", AddonGroup::Location);

        let mut selection = ExperienceSelection::default();

        selection.select(&ring);
        selection.select(&airfield);

        assert_eq!(selection.location(), Some(airfield.uuid));
        assert!(!selection.is_selected(ring.uuid));
    }

    #[test]
    fn standard_addons_accumulate_without_duplicates() {
        let gopro = addon("GoPro", AddonGroup::Standard);
        let photos = addon("Photos", AddonGroup::Standard);

        let mut selection = ExperienceSelection::default();

        selection.select(&gopro);
        selection.select(&photos);
        selection.select(&gopro);

        assert_eq!(
            selection.addon_ids().collect::<Vec<_>>(),
            vec![gopro.uuid, photos.uuid]
        );
    }

    #[test]
    fn deselect_clears_exclusive_slot() {
        let long = addon("30 minutes", AddonGroup::Duration);

        let mut selection = ExperienceSelection::default();

        selection.select(&long);
        selection.deselect(long.uuid);

        assert_eq!(selection.duration(), None);
    }

    #[test]
    fn from_addon_ids_applies_last_write_wins() -> TestResult {
        let digital = addon("E-mail", AddonGroup::VoucherDelivery);
        let posted = addon("Post", AddonGroup::VoucherDelivery);
        let product = experience(vec![digital.clone(), posted.clone()]);

        let selection =
            ExperienceSelection::from_addon_ids(&product, [digital.uuid, posted.uuid])?;

        assert_eq!(selection.delivery(), Some(posted.uuid));

        Ok(())
    }

    #[test]
    fn from_addon_ids_rejects_foreign_addon() {
        let product = experience(vec![]);
        let stranger = AddonUuid::new();

        let result = ExperienceSelection::from_addon_ids(&product, [stranger]);

        assert_eq!(result, Err(SelectionError::UnknownAddon(stranger)));
    }

    #[test]
    fn recipient_name_allows_sixteen_characters() -> TestResult {
        let name = RecipientName::parse("  Åsa Lindqvist-B ")?;

        assert_eq!(name.map(String::from).as_deref(), Some("Åsa Lindqvist-B"));

        Ok(())
    }

    #[test]
    fn recipient_name_rejects_seventeen_characters() {
        let result = RecipientName::parse("Maximilian Müller");

        assert_eq!(result, Err(SelectionError::RecipientNameTooLong));
    }

    #[test]
    fn blank_recipient_name_is_none() -> TestResult {
        assert_eq!(RecipientName::parse("   ")?, None);

        Ok(())
    }
}
