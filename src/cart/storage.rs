//! Cart Storage
//!
//! The cart is persisted as a single record under a fixed key, laid out as
//! `{ "state": { "currency": "PHP", "items": [...] }, "version": 0 }`.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{
    cart::{
        Cart, CartError,
        line_item::{CartCandidate, LineItem, LineItemId},
    },
    money::{currency_from_code, times},
    pricing::AddonSet,
};

/// Key the cart is stored under.
pub const STORAGE_KEY: &str = "cart-storage";

/// Layout version written by this crate.
pub const STORAGE_VERSION: u32 = 0;

/// Cart storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error reading or writing the cart
    #[error("Failed to access cart storage: {0}")]
    Io(#[from] io::Error),

    /// JSON encoding or decoding error
    #[error("Failed to encode or decode cart: {0}")]
    Json(#[from] serde_json::Error),

    /// The stored layout version is not understood
    #[error("Unsupported cart storage version: {0}")]
    UnsupportedVersion(u32),

    /// The stored currency code is not recognised
    #[error("Unknown currency code in stored cart: {0}")]
    UnknownCurrency(String),

    /// The stored cart is in a different currency than the catalog (stored, expected)
    #[error("Stored cart has currency {0}, but catalog has currency {1}")]
    CurrencyMismatch(String, &'static str),

    /// Two stored line items share an id
    #[error("Stored cart has more than one line item with id {0}")]
    DuplicateId(LineItemId),

    /// A stored unit price is below zero (line item id, price in minor units)
    #[error("Stored line item {0} has negative price {1}")]
    NegativePrice(LineItemId, i64),

    /// The restored items do not form a valid cart
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Persistence port for the cart.
pub trait CartStorage {
    /// Read the stored cart, if there is one.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the stored cart cannot be read or decoded.
    fn load(&self) -> Result<Option<PersistedCart>, StorageError>;

    /// Replace the stored cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the cart cannot be written.
    fn save(&mut self, cart: &PersistedCart) -> Result<(), StorageError>;
}

/// Persisted cart record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedCart {
    /// Cart state
    pub state: PersistedState,

    /// Layout version
    pub version: u32,
}

/// Persisted cart state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    /// ISO code of the cart currency
    pub currency: String,

    /// Line items in display order
    pub items: Vec<LineItemRecord>,
}

/// Persisted line item; prices are in minor units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRecord {
    /// Line item id
    pub id: LineItemId,

    /// Product name
    pub name: String,

    /// Unit price
    pub price: i64,

    /// Quantity
    pub quantity: u32,

    /// Image snapshot
    #[serde(default)]
    pub image: String,

    /// Variant label
    #[serde(default)]
    pub variant: String,

    /// Flavor key
    #[serde(default)]
    pub flavor: String,

    /// Add-on keys
    #[serde(default)]
    pub addons: AddonSet,

    /// Unit price times quantity
    pub total_price: i64,
}

impl From<&Cart> for PersistedCart {
    fn from(cart: &Cart) -> Self {
        PersistedCart {
            state: PersistedState {
                currency: cart.currency().iso_alpha_code.to_string(),
                items: cart.iter().map(LineItemRecord::from).collect(),
            },
            version: STORAGE_VERSION,
        }
    }
}

impl From<&LineItem> for LineItemRecord {
    fn from(item: &LineItem) -> Self {
        LineItemRecord {
            id: item.id(),
            name: item.name().to_string(),
            price: item.unit_price().to_minor_units(),
            quantity: item.quantity(),
            image: item.image().to_string(),
            variant: item.variant().to_string(),
            flavor: item.flavor().to_string(),
            addons: item.addons().clone(),
            total_price: item.total_price().to_minor_units(),
        }
    }
}

impl PersistedCart {
    /// Rebuild the cart, expecting it to be in `currency`.
    ///
    /// Quantities below one are raised to one and totals are recomputed from the
    /// unit price, so a restored cart always satisfies `total = price * quantity`.
    /// Records describing the same configuration are merged into the first one,
    /// keeping its unit price.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] for an unknown version, an unknown currency, a
    /// currency other than `currency`, a repeated id or a negative price.
    pub fn into_cart(self, currency: &'static Currency) -> Result<Cart, StorageError> {
        if self.version != STORAGE_VERSION {
            return Err(StorageError::UnsupportedVersion(self.version));
        }

        let stored_currency = currency_from_code(&self.state.currency)
            .ok_or_else(|| StorageError::UnknownCurrency(self.state.currency.clone()))?;

        if stored_currency != currency {
            return Err(StorageError::CurrencyMismatch(
                self.state.currency,
                currency.iso_alpha_code,
            ));
        }

        let mut seen = FxHashSet::default();
        let mut items: Vec<LineItem> = Vec::with_capacity(self.state.items.len());

        for record in self.state.items {
            if !seen.insert(record.id) {
                return Err(StorageError::DuplicateId(record.id));
            }

            let (id, candidate) = record.into_candidate(currency)?;

            if let Some(existing) = items.iter_mut().find(|item| item.matches(&candidate)) {
                warn!(
                    id = %id,
                    into = %existing.id(),
                    "stored line item duplicates an earlier one; merged"
                );

                let quantity = existing
                    .quantity()
                    .saturating_add(candidate.quantity.max(1));

                existing.set_quantity(quantity);

                continue;
            }

            items.push(LineItem::new(id, candidate));
        }

        Ok(Cart::with_items(items, currency)?)
    }
}

impl LineItemRecord {
    fn into_candidate(
        self,
        currency: &'static Currency,
    ) -> Result<(LineItemId, CartCandidate), StorageError> {
        if self.price < 0 {
            return Err(StorageError::NegativePrice(self.id, self.price));
        }

        if self.quantity == 0 {
            warn!(id = %self.id, "stored quantity below one raised to one");
        }

        let unit_price = Money::from_minor(self.price, currency);
        let expected_total = times(&unit_price, self.quantity.max(1)).to_minor_units();

        if expected_total != self.total_price {
            warn!(
                id = %self.id,
                stored = self.total_price,
                expected = expected_total,
                "stored line total disagrees with price * quantity; recomputed"
            );
        }

        let candidate = CartCandidate {
            name: self.name,
            image: self.image,
            variant: self.variant,
            flavor: self.flavor,
            addons: self.addons,
            quantity: self.quantity,
            unit_price,
        };

        Ok((self.id, candidate))
    }
}

/// In-process storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    stored: Option<PersistedCart>,
    writes: usize,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage already holding a cart.
    pub fn with_cart(cart: PersistedCart) -> Self {
        MemoryStorage {
            stored: Some(cart),
            writes: 0,
        }
    }

    /// The stored cart, if any.
    pub fn stored(&self) -> Option<&PersistedCart> {
        self.stored.as_ref()
    }

    /// Number of successful saves.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Result<Option<PersistedCart>, StorageError> {
        Ok(self.stored.clone())
    }

    fn save(&mut self, cart: &PersistedCart) -> Result<(), StorageError> {
        self.stored = Some(cart.clone());
        self.writes += 1;

        Ok(())
    }
}

/// JSON file storage at `<dir>/cart-storage.json`.
///
/// Saves go to a temporary sibling file which is flushed to disk and then renamed
/// over the target, so readers see either the old cart or the new one.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Storage in the given directory.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        JsonFileStorage {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    /// Path of the cart file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl CartStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<PersistedCart>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&mut self, cart: &PersistedCart) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        let mut file = File::create(&temp)?;

        {
            let mut writer = BufWriter::new(&mut file);
            serde_json::to_writer_pretty(&mut writer, cart)?;
            writer.flush()?;
        }

        file.sync_all()?;
        drop(file);

        fs::rename(&temp, &self.path)?;

        // Make the rename itself durable.
        #[cfg(unix)]
        if let Some(parent) = self.path.parent() {
            File::open(parent)?.sync_all()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{PHP, USD};
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::cart::{IdAllocator, SequentialIds};

    use super::*;

    fn sample_cart() -> TestResult<Cart> {
        let mut cart = Cart::new(PHP);
        let mut ids = SequentialIds::new();

        cart.add_item(
            CartCandidate::new("Hotsilog", Money::from_minor(7500, PHP))
                .with_addons(["egg"])
                .with_quantity(2),
            &mut ids,
        )?;

        Ok(cart)
    }

    #[test]
    fn record_layout_uses_camel_case() -> TestResult {
        let persisted = PersistedCart::from(&sample_cart()?);

        let json = serde_json::to_value(&persisted)?;

        assert_eq!(json["version"], 0);
        assert_eq!(json["state"]["currency"], "PHP");
        assert_eq!(json["state"]["items"][0]["totalPrice"], 15000);
        assert_eq!(json["state"]["items"][0]["addons"][0], "egg");

        Ok(())
    }

    #[test]
    fn round_trip_restores_the_same_cart() -> TestResult {
        let cart = sample_cart()?;

        let restored = PersistedCart::from(&cart).into_cart(PHP)?;

        assert_eq!(restored, cart);

        Ok(())
    }

    #[test]
    fn restore_repairs_quantity_and_total() -> TestResult {
        let mut persisted = PersistedCart::from(&sample_cart()?);

        if let Some(record) = persisted.state.items.first_mut() {
            record.quantity = 0;
            record.total_price = 1;
        }

        let cart = persisted.into_cart(PHP)?;
        let item = cart.items().first().ok_or("missing item")?;

        assert_eq!(item.quantity(), 1);
        assert_eq!(item.total_price(), &Money::from_minor(7500, PHP));

        Ok(())
    }

    #[test]
    fn restore_rejects_unknown_version() -> TestResult {
        let mut persisted = PersistedCart::from(&sample_cart()?);
        persisted.version = 3;

        assert!(matches!(
            persisted.into_cart(PHP),
            Err(StorageError::UnsupportedVersion(3))
        ));

        Ok(())
    }

    #[test]
    fn restore_rejects_other_currency() -> TestResult {
        let persisted = PersistedCart::from(&sample_cart()?);

        assert!(matches!(
            persisted.into_cart(USD),
            Err(StorageError::CurrencyMismatch(stored, "USD")) if stored == "PHP"
        ));

        Ok(())
    }

    #[test]
    fn restore_rejects_duplicate_ids() -> TestResult {
        let mut persisted = PersistedCart::from(&sample_cart()?);
        let mut copy = persisted.state.items.first().cloned().ok_or("missing record")?;
        copy.name = "Tapsilog".to_string();
        persisted.state.items.push(copy);

        let id = SequentialIds::new().next_id();

        assert!(matches!(
            persisted.into_cart(PHP),
            Err(StorageError::DuplicateId(dup)) if dup == id
        ));

        Ok(())
    }

    #[test]
    fn restore_rejects_negative_prices() -> TestResult {
        let mut persisted = PersistedCart::from(&sample_cart()?);

        if let Some(record) = persisted.state.items.first_mut() {
            record.price = -3500;
        }

        assert!(matches!(
            persisted.into_cart(PHP),
            Err(StorageError::NegativePrice(_, -3500))
        ));

        Ok(())
    }

    #[test]
    fn restore_merges_records_with_the_same_configuration() -> TestResult {
        let mut persisted = PersistedCart::from(&sample_cart()?);
        let mut copy = persisted.state.items.first().cloned().ok_or("missing record")?;
        copy.id = LineItemId::from_uuid(Uuid::from_u128(99));
        copy.price = 9900;
        copy.quantity = 3;
        persisted.state.items.push(copy);

        let cart = persisted.into_cart(PHP)?;
        let item = cart.items().first().ok_or("missing item")?;

        assert_eq!(cart.len(), 1);
        assert_eq!(item.quantity(), 5);
        assert_eq!(item.unit_price(), &Money::from_minor(7500, PHP));
        assert_eq!(cart.total_price(), Money::from_minor(37500, PHP));

        Ok(())
    }

    #[test]
    fn json_file_storage_replaces_stale_temp_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut storage = JsonFileStorage::new(dir.path());

        fs::write(storage.temp_path(), "{ half written")?;

        let persisted = PersistedCart::from(&sample_cart()?);

        storage.save(&persisted)?;
        storage.save(&persisted)?;

        assert!(!storage.temp_path().exists());
        assert_eq!(storage.load()?, Some(persisted));

        Ok(())
    }

    #[test]
    fn json_file_storage_round_trip() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut storage = JsonFileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.load()?, None);

        let persisted = PersistedCart::from(&sample_cart()?);

        storage.save(&persisted)?;

        assert!(storage.path().ends_with("cart-storage.json"));
        assert!(!storage.temp_path().exists());
        assert_eq!(storage.load()?, Some(persisted));

        Ok(())
    }

    #[test]
    fn json_file_storage_reports_corrupt_files() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = JsonFileStorage::new(dir.path());

        fs::write(storage.path(), "{ not json")?;

        assert!(matches!(storage.load(), Err(StorageError::Json(_))));

        Ok(())
    }

    #[test]
    fn memory_storage_counts_writes() -> TestResult {
        let mut storage = MemoryStorage::new();
        let persisted = PersistedCart::from(&sample_cart()?);

        storage.save(&persisted)?;
        storage.save(&persisted)?;

        assert_eq!(storage.writes(), 2);
        assert_eq!(storage.stored(), Some(&persisted));

        Ok(())
    }

    #[test]
    fn ids_survive_serialization() -> TestResult {
        let id = SequentialIds::new().next_id();

        let json = serde_json::to_string(&id)?;

        assert_eq!(json, format!("\"{}\"", Uuid::from_u128(1)));

        Ok(())
    }
}
