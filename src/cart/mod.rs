//! Cart
//!
//! [`Cart`] is the pure state container: an ordered list of line items and the
//! rule deciding when an addition merges into an existing item. [`CartStore`]
//! wraps it with id allocation and persistence.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::warn;

use crate::money::Price;

pub mod ids;
pub mod line_item;
pub mod storage;
pub mod store;

pub use ids::{IdAllocator, RandomIds, SequentialIds};
pub use line_item::{CartCandidate, LineItem, LineItemId};
pub use storage::{CartStorage, JsonFileStorage, MemoryStorage, StorageError};
pub use store::{CartStore, StoreError};

/// Errors related to cart mutation.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// The candidate is priced in a different currency than the cart (candidate currency, cart currency).
    #[error("Candidate has currency {0}, but cart has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),
}

/// What an addition did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line item was appended.
    Added(LineItemId),

    /// The quantity of an identical line item was increased.
    Merged(LineItemId),
}

impl AddOutcome {
    /// Id of the affected line item.
    pub fn id(self) -> LineItemId {
        match self {
            AddOutcome::Added(id) | AddOutcome::Merged(id) => id,
        }
    }
}

/// Cart
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    items: Vec<LineItem>,
    currency: &'static Currency,
}

impl Cart {
    /// Create an empty cart in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
        }
    }

    /// Create a cart holding previously built line items.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if an item is priced in another currency.
    pub fn with_items(
        items: impl Into<Vec<LineItem>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let items = items.into();

        items
            .iter()
            .try_for_each(|item| check_currency(item.unit_price(), currency))?;

        Ok(Cart { items, currency })
    }

    /// Add a candidate, merging it into an identical line item if there is one.
    ///
    /// On a merge the quantities are summed and the existing item's unit price is kept.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the candidate is priced in another currency.
    pub fn add_item(
        &mut self,
        candidate: CartCandidate,
        ids: &mut impl IdAllocator,
    ) -> Result<AddOutcome, CartError> {
        check_currency(&candidate.unit_price, self.currency)?;

        if let Some(existing) = self.items.iter_mut().find(|item| item.matches(&candidate)) {
            let quantity = existing
                .quantity()
                .saturating_add(candidate.quantity.max(1));

            existing.set_quantity(quantity);

            return Ok(AddOutcome::Merged(existing.id()));
        }

        let item = LineItem::new(ids.next_id(), candidate);
        let id = item.id();

        self.items.push(item);

        Ok(AddOutcome::Added(id))
    }

    /// Remove a line item; returns `false` if there was none with that id.
    pub fn remove_item(&mut self, id: LineItemId) -> bool {
        let before = self.items.len();

        self.items.retain(|item| item.id() != id);

        self.items.len() != before
    }

    /// Set a line item's quantity; returns `false` if there was none with that id.
    ///
    /// Quantities below one are clamped to one.
    pub fn update_quantity(&mut self, id: LineItemId, quantity: u32) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id() == id) else {
            return false;
        };

        if quantity == 0 {
            warn!(%id, "quantity below one clamped to one");
        }

        item.set_quantity(quantity);

        true
    }

    /// Remove every line item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of all quantities.
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Sum of all line totals.
    pub fn total_price(&self) -> Price {
        let minor = self
            .items
            .iter()
            .map(|item| item.total_price().to_minor_units())
            .fold(0_i64, i64::saturating_add);

        Money::from_minor(minor, self.currency)
    }

    /// Get a line item by id.
    pub fn get(&self, id: LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Line items in display order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterate over the line items in display order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    /// Number of line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

fn check_currency(price: &Price, currency: &'static Currency) -> Result<(), CartError> {
    let price_currency = price.currency();

    if price_currency == currency {
        Ok(())
    } else {
        Err(CartError::CurrencyMismatch(
            price_currency.iso_alpha_code,
            currency.iso_alpha_code,
        ))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{PHP, USD};
    use testresult::TestResult;

    use super::*;

    fn php(major: i64) -> Price {
        Money::from_minor(major * 100, PHP)
    }

    #[test]
    fn adding_identical_items_merges_them() -> TestResult {
        let mut cart = Cart::new(PHP);
        let mut ids = SequentialIds::new();

        let hotsilog = CartCandidate::new("Hotsilog", php(75)).with_addons(["egg"]);

        let first = cart.add_item(hotsilog.clone(), &mut ids)?;
        let second = cart.add_item(hotsilog, &mut ids)?;

        assert!(matches!(first, AddOutcome::Added(_)));
        assert_eq!(second, AddOutcome::Merged(first.id()));
        assert_eq!(cart.len(), 1);

        let item = cart.get(first.id()).ok_or("missing item")?;

        assert_eq!(item.quantity(), 2);
        assert_eq!(item.total_price(), &php(150));
        assert_eq!(item.unit_price(), &php(75));

        Ok(())
    }

    #[test]
    fn addon_order_does_not_split_items() -> TestResult {
        let mut cart = Cart::new(PHP);
        let mut ids = SequentialIds::new();

        cart.add_item(
            CartCandidate::new("Hotsilog", php(80)).with_addons(["egg", "sauce"]),
            &mut ids,
        )?;
        cart.add_item(
            CartCandidate::new("Hotsilog", php(80)).with_addons(["sauce", "egg"]),
            &mut ids,
        )?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_items(), 2);

        Ok(())
    }

    #[test]
    fn different_configurations_stay_separate() -> TestResult {
        let mut cart = Cart::new(PHP);
        let mut ids = SequentialIds::new();

        let soda = |price, variant, flavor| {
            CartCandidate::new("Fruit Soda", php(price))
                .with_variant(variant)
                .with_flavor(flavor)
        };

        cart.add_item(soda(29, "16oz", "lemon"), &mut ids)?;
        cart.add_item(soda(39, "22oz", "lemon"), &mut ids)?;
        cart.add_item(soda(29, "16oz", "lychee"), &mut ids)?;

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.total_price(), php(97));

        Ok(())
    }

    #[test]
    fn first_unit_price_wins_on_merge() -> TestResult {
        let mut cart = Cart::new(PHP);
        let mut ids = SequentialIds::new();

        let id = cart.add_item(CartCandidate::new("Silog", php(35)), &mut ids)?.id();
        cart.add_item(CartCandidate::new("Silog", php(40)).with_quantity(2), &mut ids)?;

        let item = cart.get(id).ok_or("missing item")?;

        assert_eq!(item.quantity(), 3);
        assert_eq!(item.unit_price(), &php(35));
        assert_eq!(item.total_price(), &php(105));

        Ok(())
    }

    #[test]
    fn remove_missing_item_is_a_no_op() -> TestResult {
        let mut cart = Cart::new(PHP);
        let mut ids = SequentialIds::new();

        let id = cart.add_item(CartCandidate::new("Goto", php(35)), &mut ids)?.id();

        let before = cart.clone();

        assert!(!cart.remove_item(ids.next_id()));
        assert_eq!(cart, before);

        assert!(cart.remove_item(id));
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn update_quantity_recomputes_total() -> TestResult {
        let mut cart = Cart::new(PHP);
        let mut ids = SequentialIds::new();

        let id = cart.add_item(CartCandidate::new("Graham Bar", php(20)), &mut ids)?.id();

        assert!(cart.update_quantity(id, 3));
        assert_eq!(cart.get(id).map(LineItem::total_price), Some(&php(60)));

        assert!(cart.update_quantity(id, 0));
        assert_eq!(cart.get(id).map(LineItem::quantity), Some(1));

        assert!(!cart.update_quantity(ids.next_id(), 5));

        Ok(())
    }

    #[test]
    fn totals_sum_over_items() -> TestResult {
        let mut cart = Cart::new(PHP);
        let mut ids = SequentialIds::new();

        cart.add_item(CartCandidate::new("Pares", php(60)).with_quantity(2), &mut ids)?;
        cart.add_item(CartCandidate::new("Fries", php(25)), &mut ids)?;

        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), php(145));

        for item in cart.iter() {
            assert_eq!(
                item.total_price().to_minor_units(),
                item.unit_price().to_minor_units() * i64::from(item.quantity())
            );
        }

        cart.clear();

        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), php(0));

        Ok(())
    }

    #[test]
    fn candidate_in_other_currency_is_rejected() {
        let mut cart = Cart::new(PHP);
        let mut ids = SequentialIds::new();

        let result = cart.add_item(
            CartCandidate::new("Fries", Money::from_minor(250, USD)),
            &mut ids,
        );

        assert_eq!(result, Err(CartError::CurrencyMismatch("USD", "PHP")));
        assert!(cart.is_empty());
    }
}
