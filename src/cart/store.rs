//! Cart Store

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cart::{
        AddOutcome, Cart, CartError,
        ids::{IdAllocator, SequentialIds},
        line_item::{CartCandidate, LineItem, LineItemId},
        storage::{CartStorage, PersistedCart, StorageError},
    },
    money::Price,
};

/// Cart store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Wrapped storage error; the cart was left unchanged.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Wrapped cart error; the cart was left unchanged.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Owns the cart and persists it after every mutation.
///
/// A mutation is applied to a copy of the cart, the copy is saved, and only then
/// does it replace the in-memory cart. If saving fails, memory and storage both
/// keep the previous cart.
#[derive(Debug)]
pub struct CartStore<S: CartStorage, I: IdAllocator = SequentialIds> {
    cart: Cart,
    storage: S,
    ids: I,
}

impl<S: CartStorage> CartStore<S> {
    /// Open the stored cart with sequential ids.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the stored cart cannot be read or restored.
    pub fn open(storage: S, currency: &'static Currency) -> Result<Self, StoreError> {
        Self::open_with_ids(storage, SequentialIds::new(), currency)
    }
}

impl<S: CartStorage, I: IdAllocator> CartStore<S, I> {
    /// Open the stored cart, or start an empty one if nothing is stored.
    ///
    /// Ids of restored line items are reserved so new items never reuse them.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the stored cart cannot be read or restored.
    pub fn open_with_ids(
        storage: S,
        mut ids: I,
        currency: &'static Currency,
    ) -> Result<Self, StoreError> {
        let cart = match storage.load()? {
            Some(persisted) => persisted.into_cart(currency)?,
            None => Cart::new(currency),
        };

        for item in cart.iter() {
            ids.reserve(item.id());
        }

        debug!(
            items = cart.len(),
            quantity = cart.total_items(),
            "opened cart"
        );

        Ok(CartStore { cart, storage, ids })
    }

    /// Add a candidate, merging it into an identical line item if there is one.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the candidate's currency differs from the cart's
    /// or the cart cannot be saved.
    pub fn add_item(&mut self, candidate: CartCandidate) -> Result<AddOutcome, StoreError> {
        let mut next = self.cart.clone();
        let name = candidate.name.clone();

        let outcome = next.add_item(candidate, &mut self.ids)?;

        self.commit(next)?;

        match outcome {
            AddOutcome::Added(id) => debug!(%id, %name, "added line item"),
            AddOutcome::Merged(id) => debug!(%id, %name, "merged into existing line item"),
        }

        Ok(outcome)
    }

    /// Remove a line item. Removing an unknown id changes nothing and writes nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the cart cannot be saved.
    pub fn remove_item(&mut self, id: LineItemId) -> Result<bool, StoreError> {
        let mut next = self.cart.clone();

        if !next.remove_item(id) {
            return Ok(false);
        }

        self.commit(next)?;

        debug!(%id, "removed line item");

        Ok(true)
    }

    /// Set a line item's quantity, clamped to at least one.
    /// Updating an unknown id changes nothing and writes nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the cart cannot be saved.
    pub fn update_quantity(&mut self, id: LineItemId, quantity: u32) -> Result<bool, StoreError> {
        let mut next = self.cart.clone();

        if !next.update_quantity(id, quantity) {
            return Ok(false);
        }

        self.commit(next)?;

        debug!(%id, quantity, "updated quantity");

        Ok(true)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the cart cannot be saved.
    pub fn clear_cart(&mut self) -> Result<(), StoreError> {
        let mut next = self.cart.clone();

        next.clear();

        self.commit(next)?;

        info!("cleared cart");

        Ok(())
    }

    /// Sum of all quantities.
    pub fn total_items(&self) -> u64 {
        self.cart.total_items()
    }

    /// Sum of all line totals.
    pub fn total_price(&self) -> Price {
        self.cart.total_price()
    }

    /// Line items in display order.
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn commit(&mut self, next: Cart) -> Result<(), StoreError> {
        self.storage.save(&PersistedCart::from(&next))?;
        self.cart = next;

        Ok(())
    }
}
