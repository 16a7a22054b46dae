//! Line Items

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    money::{Price, times},
    pricing::AddonSet,
};

/// Line item identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(Uuid);

impl LineItemId {
    /// Wrap a UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The wrapped UUID.
    pub const fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Display for LineItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for LineItemId {
    fn from(value: Uuid) -> Self {
        Self::from_uuid(value)
    }
}

/// A resolved product configuration on its way into the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartCandidate {
    /// Product name
    pub name: String,

    /// Image snapshot
    pub image: String,

    /// Variant label, empty when not applicable
    pub variant: String,

    /// Flavor key, empty when not applicable
    pub flavor: String,

    /// Selected add-ons
    pub addons: AddonSet,

    /// Quantity to add
    pub quantity: u32,

    /// Resolved unit price including add-ons
    pub unit_price: Price,
}

impl CartCandidate {
    /// A candidate for one unit of `name` at `unit_price`, with no options.
    pub fn new(name: impl Into<String>, unit_price: Price) -> Self {
        CartCandidate {
            name: name.into(),
            image: String::new(),
            variant: String::new(),
            flavor: String::new(),
            addons: AddonSet::new(),
            quantity: 1,
            unit_price,
        }
    }

    /// Set the variant label.
    #[must_use]
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = variant.into();
        self
    }

    /// Set the flavor key.
    #[must_use]
    pub fn with_flavor(mut self, flavor: impl Into<String>) -> Self {
        self.flavor = flavor.into();
        self
    }

    /// Set the add-ons.
    #[must_use]
    pub fn with_addons<S: Into<String>>(mut self, addons: impl IntoIterator<Item = S>) -> Self {
        self.addons = addons.into_iter().collect();
        self
    }

    /// Set the quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Set the image.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}

/// One distinct cart entry: a product configuration and its quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    id: LineItemId,
    name: String,
    image: String,
    variant: String,
    flavor: String,
    addons: AddonSet,
    quantity: u32,
    unit_price: Price,
    total_price: Price,
}

impl LineItem {
    /// Create a line item; quantities below one become one.
    pub fn new(id: LineItemId, candidate: CartCandidate) -> Self {
        let quantity = candidate.quantity.max(1);

        LineItem {
            id,
            name: candidate.name,
            image: candidate.image,
            variant: candidate.variant,
            flavor: candidate.flavor,
            addons: candidate.addons,
            quantity,
            total_price: times(&candidate.unit_price, quantity),
            unit_price: candidate.unit_price,
        }
    }

    /// Whether the candidate describes the same configuration as this item.
    ///
    /// Name, variant, flavor and add-on set must match; add-on order is ignored.
    pub fn matches(&self, candidate: &CartCandidate) -> bool {
        self.name == candidate.name
            && self.variant == candidate.variant
            && self.flavor == candidate.flavor
            && self.addons == candidate.addons
    }

    /// Set the quantity and recompute the total; quantities below one become one.
    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
        self.total_price = times(&self.unit_price, self.quantity);
    }

    /// Line item id
    pub fn id(&self) -> LineItemId {
        self.id
    }

    /// Product name at the time of adding
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Image at the time of adding
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Variant label, empty when not applicable
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Flavor key, empty when not applicable
    pub fn flavor(&self) -> &str {
        &self.flavor
    }

    /// Selected add-ons
    pub fn addons(&self) -> &AddonSet {
        &self.addons
    }

    /// Quantity, always at least one
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price locked in when the item was first added
    pub fn unit_price(&self) -> &Price {
        &self.unit_price
    }

    /// Unit price times quantity
    pub fn total_price(&self) -> &Price {
        &self.total_price
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::PHP};

    use super::*;

    fn id(n: u128) -> LineItemId {
        LineItemId::from_uuid(Uuid::from_u128(n))
    }

    #[test]
    fn new_item_totals_price_times_quantity() {
        let candidate =
            CartCandidate::new("Hotsilog", Money::from_minor(7500, PHP)).with_quantity(2);

        let item = LineItem::new(id(1), candidate);

        assert_eq!(item.total_price(), &Money::from_minor(15000, PHP));
        assert_eq!(item.quantity(), 2);
    }

    #[test]
    fn zero_quantity_becomes_one() {
        let candidate =
            CartCandidate::new("Fries", Money::from_minor(2500, PHP)).with_quantity(0);

        let mut item = LineItem::new(id(1), candidate);

        assert_eq!(item.quantity(), 1);

        item.set_quantity(0);

        assert_eq!(item.quantity(), 1);
        assert_eq!(item.total_price(), &Money::from_minor(2500, PHP));
    }

    #[test]
    fn matching_ignores_addon_order_and_price() {
        let item = LineItem::new(
            id(1),
            CartCandidate::new("Hotsilog", Money::from_minor(8000, PHP))
                .with_addons(["egg", "sauce"]),
        );

        let same = CartCandidate::new("Hotsilog", Money::from_minor(9999, PHP))
            .with_addons(["sauce", "egg"]);
        let other_flavor = CartCandidate::new("Hotsilog", Money::from_minor(8000, PHP))
            .with_addons(["egg", "sauce"])
            .with_flavor("lemon");

        assert!(item.matches(&same));
        assert!(!item.matches(&other_flavor));
    }

    #[test]
    fn id_displays_as_uuid() {
        assert_eq!(id(1).to_string(), "00000000-0000-0000-0000-000000000001");
    }
}
