//! Catalog
//!
//! Read-only menu data: categories, products with optional variants and flavors,
//! and the global add-on list.

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use slotmap::SlotMap;
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::{
        addons::Addon,
        fixtures::MenuFixture,
        products::{AddonPolicy, Product, ProductKey},
    },
    money::currency_from_code,
};

pub mod addons;
pub mod fixtures;
pub mod products;

/// The menu shipped with the storefront.
const STOREFRONT_MENU: &str = include_str!("../../fixtures/menus/storefront.yml");

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the menu file
    #[error("Failed to read menu file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Two categories share a key
    #[error("Duplicate category: {0}")]
    DuplicateCategory(String),

    /// Two products share a key
    #[error("Duplicate product: {0}")]
    DuplicateProduct(String),

    /// Two add-ons share a key
    #[error("Duplicate add-on: {0}")]
    DuplicateAddon(String),

    /// A product offers an add-on that is not in the global list
    #[error("Product {product} offers unknown add-on {addon}")]
    UnknownAddon {
        /// Product key
        product: String,
        /// Add-on key
        addon: String,
    },

    /// A product requires add-ons but offers none
    #[error("Product {0} requires add-ons but offers none")]
    NoAddonsOffered(String),

    /// A product has neither a price nor variants
    #[error("Product {0} has no price and no variants")]
    MissingPrice(String),

    /// A product has both a price and variants
    #[error("Product {0} has both a price and variants")]
    AmbiguousPricing(String),

    /// A product lists an empty set of variants
    #[error("Product {0} has an empty variant list")]
    NoVariants(String),

    /// Two variants of a product share a label
    #[error("Product {product} has more than one variant labelled {variant}")]
    DuplicateVariant {
        /// Product key
        product: String,
        /// Variant label
        variant: String,
    },

    /// Two flavors of a variant share a key
    #[error("Variant {variant} of product {product} has more than one flavor {flavor}")]
    DuplicateFlavor {
        /// Product key
        product: String,
        /// Variant label
        variant: String,
        /// Flavor key
        flavor: String,
    },
}

/// A menu category
#[derive(Debug, Clone)]
pub struct Category {
    /// Category key
    pub key: String,

    /// Category name
    pub name: String,

    /// Category description
    pub description: String,

    /// Category image, if any
    pub image: Option<String>,

    products: Vec<ProductKey>,
}

impl Category {
    /// Keys of the products in this category, in display order.
    pub fn product_keys(&self) -> &[ProductKey] {
        &self.products
    }
}

/// Catalog
#[derive(Debug)]
pub struct Catalog {
    currency: &'static Currency,

    categories: Vec<Category>,

    /// `SlotMap` storing products with generated keys
    products: SlotMap<ProductKey, Product>,

    /// String key -> `SlotMap` key mappings for lookups
    product_keys: FxHashMap<String, ProductKey>,

    addons: Vec<Addon>,
    addon_index: FxHashMap<String, usize>,
}

impl Catalog {
    /// The storefront's own menu.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded menu is invalid.
    pub fn storefront() -> Result<Self, CatalogError> {
        Self::from_yaml_str(STOREFRONT_MENU)
    }

    /// Load a menu from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path.as_ref())?;

        Self::from_yaml_str(&contents)
    }

    /// Parse a menu from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed or fails validation.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: MenuFixture = serde_norway::from_str(yaml)?;

        Self::try_from(fixture)
    }

    /// Currency of every price in the catalog.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Categories in display order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Get a category by key.
    pub fn category(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.key == key)
    }

    /// Products of a category in display order; empty for an unknown category.
    pub fn products_in(&self, category: &str) -> impl Iterator<Item = &Product> {
        self.category(category)
            .map(Category::product_keys)
            .unwrap_or_default()
            .iter()
            .filter_map(|key| self.products.get(*key))
    }

    /// Get a product by category and product key.
    pub fn product(&self, category: &str, key: &str) -> Option<&Product> {
        self.find_product(key)
            .filter(|product| product.category == category)
    }

    /// Get a product by its catalog-wide key.
    pub fn find_product(&self, key: &str) -> Option<&Product> {
        self.product_keys
            .get(key)
            .and_then(|product_key| self.products.get(*product_key))
    }

    /// Get a product by its `SlotMap` key.
    pub fn get(&self, key: ProductKey) -> Option<&Product> {
        self.products.get(key)
    }

    /// Get an add-on by key.
    pub fn addon(&self, key: &str) -> Option<&Addon> {
        self.addon_index
            .get(key)
            .and_then(|idx| self.addons.get(*idx))
    }

    /// All add-ons in menu order.
    pub fn addons(&self) -> &[Addon] {
        &self.addons
    }

    /// Number of products in the catalog.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl TryFrom<MenuFixture> for Catalog {
    type Error = CatalogError;

    fn try_from(fixture: MenuFixture) -> Result<Self, Self::Error> {
        let currency = currency_from_code(&fixture.currency)
            .ok_or_else(|| CatalogError::UnknownCurrency(fixture.currency.clone()))?;

        let mut addons = Vec::with_capacity(fixture.addons.len());
        let mut addon_index = FxHashMap::default();

        for addon_fixture in fixture.addons {
            let addon = addon_fixture.into_addon(currency)?;

            if addon_index.insert(addon.key.clone(), addons.len()).is_some() {
                return Err(CatalogError::DuplicateAddon(addon.key));
            }

            addons.push(addon);
        }

        let mut categories: Vec<Category> = Vec::with_capacity(fixture.categories.len());
        let mut products = SlotMap::with_key();
        let mut product_keys = FxHashMap::default();

        for category_fixture in fixture.categories {
            if categories.iter().any(|c| c.key == category_fixture.key) {
                return Err(CatalogError::DuplicateCategory(category_fixture.key));
            }

            let mut category_products = Vec::with_capacity(category_fixture.products.len());

            for product_fixture in category_fixture.products {
                let product = product_fixture.into_product(&category_fixture.key, currency)?;

                validate_addons(&product, &addon_index)?;

                if product_keys.contains_key(&product.key) {
                    return Err(CatalogError::DuplicateProduct(product.key));
                }

                let key = product.key.clone();
                let product_key = products.insert(product);

                product_keys.insert(key, product_key);
                category_products.push(product_key);
            }

            categories.push(Category {
                key: category_fixture.key,
                name: category_fixture.name,
                description: category_fixture.description,
                image: category_fixture.image,
                products: category_products,
            });
        }

        debug!(
            currency = currency.iso_alpha_code,
            categories = categories.len(),
            products = products.len(),
            addons = addons.len(),
            "loaded catalog"
        );

        Ok(Catalog {
            currency,
            categories,
            products,
            product_keys,
            addons,
            addon_index,
        })
    }
}

fn validate_addons(
    product: &Product,
    addon_index: &FxHashMap<String, usize>,
) -> Result<(), CatalogError> {
    if let Some(unknown) = product
        .addons
        .iter()
        .find(|key| !addon_index.contains_key(*key))
    {
        return Err(CatalogError::UnknownAddon {
            product: product.key.clone(),
            addon: unknown.clone(),
        });
    }

    if product.addon_policy == AddonPolicy::Required && product.addons.is_empty() {
        return Err(CatalogError::NoAddonsOffered(product.key.clone()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::PHP};
    use testresult::TestResult;

    use crate::catalog::products::Pricing;

    use super::*;

    const SMALL_MENU: &str = r#"
currency: PHP
addons:
  - key: egg
    name: Extra Egg
    price: "15"
categories:
  - key: budget_meals
    name: Budget Meals
    products:
      - key: hotsilog
        name: Hotsilog
        price: "60"
        addons:
          policy: optional
          available: [egg]
  - key: beverages
    name: Beverages
    products:
      - key: hot_coffee
        name: Hot Coffee
        price: "25"
"#;

    #[test]
    fn loads_small_menu() -> TestResult {
        let catalog = Catalog::from_yaml_str(SMALL_MENU)?;

        assert_eq!(catalog.currency(), PHP);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.categories().len(), 2);
        assert_eq!(
            catalog.addon("egg").map(|addon| addon.price),
            Some(Money::from_minor(1500, PHP))
        );

        Ok(())
    }

    #[test]
    fn product_lookup_checks_category() -> TestResult {
        let catalog = Catalog::from_yaml_str(SMALL_MENU)?;

        assert!(catalog.product("budget_meals", "hotsilog").is_some());
        assert!(catalog.product("beverages", "hotsilog").is_none());
        assert!(catalog.find_product("hotsilog").is_some());
        assert!(catalog.find_product("nope").is_none());

        Ok(())
    }

    #[test]
    fn products_in_keeps_menu_order() -> TestResult {
        let catalog = Catalog::storefront()?;

        let names: Vec<&str> = catalog
            .products_in("beverages")
            .map(|product| product.name.as_str())
            .collect();

        assert_eq!(
            names,
            vec!["Coke Float", "Iced Coffee", "Hot Coffee", "Fruit Soda"]
        );
        assert_eq!(catalog.products_in("desserts").count(), 0);

        Ok(())
    }

    #[test]
    fn storefront_menu_has_expected_shape() -> TestResult {
        let catalog = Catalog::storefront()?;

        let soda = catalog
            .product("beverages", "fruit_soda")
            .ok_or("missing fruit soda")?;

        assert!(matches!(soda.pricing, Pricing::Variants { .. }));
        assert_eq!(soda.variants().len(), 2);

        let chaofan = catalog
            .find_product("pork_chaofan")
            .ok_or("missing pork chaofan")?;

        assert_eq!(chaofan.addon_policy, AddonPolicy::Required);
        assert_eq!(catalog.addons().len(), 6);

        Ok(())
    }

    #[test]
    fn unknown_currency_is_rejected() {
        let yaml = "currency: XYZ\ncategories: []\n";

        assert!(matches!(
            Catalog::from_yaml_str(yaml),
            Err(CatalogError::UnknownCurrency(code)) if code == "XYZ"
        ));
    }

    #[test]
    fn offering_unknown_addon_is_rejected() {
        let yaml = r#"
currency: PHP
categories:
  - key: budget_meals
    name: Budget Meals
    products:
      - key: silog
        name: Silog
        price: "35"
        addons:
          policy: optional
          available: [bacon]
"#;

        assert!(matches!(
            Catalog::from_yaml_str(yaml),
            Err(CatalogError::UnknownAddon { product, addon }) if product == "silog" && addon == "bacon"
        ));
    }

    #[test]
    fn required_policy_without_addons_is_rejected() {
        let yaml = r#"
currency: PHP
categories:
  - key: budget_meals
    name: Budget Meals
    products:
      - key: pork_chaofan
        name: Pork Chaofan
        price: "45"
        addons:
          policy: required
"#;

        assert!(matches!(
            Catalog::from_yaml_str(yaml),
            Err(CatalogError::NoAddonsOffered(_))
        ));
    }

    #[test]
    fn duplicate_product_keys_are_rejected() {
        let yaml = r#"
currency: PHP
categories:
  - key: a
    name: A
    products:
      - key: fries
        name: Fries
        price: "25"
  - key: b
    name: B
    products:
      - key: fries
        name: Fries
        price: "30"
"#;

        assert!(matches!(
            Catalog::from_yaml_str(yaml),
            Err(CatalogError::DuplicateProduct(key)) if key == "fries"
        ));
    }

    #[test]
    fn load_reads_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("menu.yml");

        fs::write(&path, SMALL_MENU)?;

        let catalog = Catalog::load(&path)?;

        assert_eq!(catalog.len(), 2);

        Ok(())
    }
}
