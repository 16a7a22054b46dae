//! Menu Fixtures
//!
//! Serde shapes of the YAML menu file. Prices are strings in major units of the
//! menu currency, e.g. `"60"` or `"29.50"`.

use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    catalog::{
        CatalogError,
        addons::Addon,
        products::{AddonPolicy, Flavor, Pricing, Product, VariantSpec},
    },
    money::{Price, parse_major_units},
};

/// Top-level menu document
#[derive(Debug, Deserialize)]
pub struct MenuFixture {
    /// ISO code of the menu currency
    pub currency: String,

    /// Global add-ons
    #[serde(default)]
    pub addons: Vec<AddonFixture>,

    /// Categories in display order
    pub categories: Vec<CategoryFixture>,
}

/// Add-on fixture
#[derive(Debug, Deserialize)]
pub struct AddonFixture {
    /// Add-on key
    pub key: String,

    /// Add-on name
    pub name: String,

    /// Add-on price
    pub price: String,

    /// Add-on image
    #[serde(default)]
    pub image: Option<String>,
}

/// Category fixture
#[derive(Debug, Deserialize)]
pub struct CategoryFixture {
    /// Category key
    pub key: String,

    /// Category name
    pub name: String,

    /// Category description
    #[serde(default)]
    pub description: String,

    /// Category image
    #[serde(default)]
    pub image: Option<String>,

    /// Products in display order
    #[serde(default)]
    pub products: Vec<ProductFixture>,
}

/// Product fixture
///
/// Exactly one of `price` or `variants` must be given.
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product key
    pub key: String,

    /// Product name
    pub name: String,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Product image
    #[serde(default)]
    pub image: Option<String>,

    /// Base price of a simply priced product
    #[serde(default)]
    pub price: Option<String>,

    /// Variants of a variant-priced product
    #[serde(default)]
    pub variants: Option<Vec<VariantFixture>>,

    /// Add-on settings
    #[serde(default)]
    pub addons: Option<AddonsFixture>,
}

/// Product add-on settings
#[derive(Debug, Deserialize)]
pub struct AddonsFixture {
    /// Add-on policy
    pub policy: AddonPolicyFixture,

    /// Offered add-on keys
    #[serde(default)]
    pub available: Vec<String>,
}

/// Add-on policy as written in YAML
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddonPolicyFixture {
    /// No add-ons
    None,

    /// Optional add-ons
    Optional,

    /// At least one add-on
    Required,
}

impl From<AddonPolicyFixture> for AddonPolicy {
    fn from(policy: AddonPolicyFixture) -> Self {
        match policy {
            AddonPolicyFixture::None => AddonPolicy::None,
            AddonPolicyFixture::Optional => AddonPolicy::Optional,
            AddonPolicyFixture::Required => AddonPolicy::Required,
        }
    }
}

/// Variant fixture
#[derive(Debug, Deserialize)]
pub struct VariantFixture {
    /// Variant label
    pub label: String,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// Variant price
    pub price: String,

    /// Variant image
    #[serde(default)]
    pub image: Option<String>,

    /// Flavors in display order
    #[serde(default)]
    pub flavors: Vec<FlavorFixture>,
}

/// Flavor fixture
#[derive(Debug, Deserialize)]
pub struct FlavorFixture {
    /// Flavor key
    pub key: String,

    /// Flavor name
    pub name: String,

    /// Flavor image
    #[serde(default)]
    pub image: Option<String>,
}

/// Parse a major-unit price string in the given currency.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidPrice`] if the string is not a non-negative decimal.
pub fn parse_price(s: &str, currency: &'static Currency) -> Result<Price, CatalogError> {
    let minor_units =
        parse_major_units(s).ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))?;

    Ok(Money::from_minor(minor_units, currency))
}

impl AddonFixture {
    /// Convert into a catalog add-on priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidPrice`] if the price cannot be parsed.
    pub fn into_addon(self, currency: &'static Currency) -> Result<Addon, CatalogError> {
        Ok(Addon {
            price: parse_price(&self.price, currency)?,
            key: self.key,
            name: self.name,
            image: non_empty(self.image),
        })
    }
}

impl ProductFixture {
    /// Convert into a catalog product of `category`, priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pricing is missing, ambiguous or unparseable, or if
    /// variant labels or flavor keys repeat.
    pub fn into_product(
        self,
        category: &str,
        currency: &'static Currency,
    ) -> Result<Product, CatalogError> {
        let pricing = match (self.price, self.variants) {
            (Some(price), None) => Pricing::Simple {
                base_price: parse_price(&price, currency)?,
            },
            (None, Some(variants)) if variants.is_empty() => {
                return Err(CatalogError::NoVariants(self.key));
            }
            (None, Some(variants)) => {
                let variants = variants
                    .into_iter()
                    .map(|variant| variant.into_variant(currency))
                    .collect::<Result<Vec<_>, _>>()?;

                ensure_unique_options(&self.key, &variants)?;

                Pricing::Variants { variants }
            }
            (Some(_), Some(_)) => return Err(CatalogError::AmbiguousPricing(self.key)),
            (None, None) => return Err(CatalogError::MissingPrice(self.key)),
        };

        let (addon_policy, addons) = self.addons.map_or((AddonPolicy::None, Vec::new()), |a| {
            (a.policy.into(), a.available)
        });

        Ok(Product {
            key: self.key,
            name: self.name,
            description: self.description,
            image: non_empty(self.image),
            category: category.to_string(),
            pricing,
            addon_policy,
            addons,
        })
    }
}

impl VariantFixture {
    fn into_variant(self, currency: &'static Currency) -> Result<VariantSpec, CatalogError> {
        Ok(VariantSpec {
            price: parse_price(&self.price, currency)?,
            label: self.label,
            name: self.name,
            image: non_empty(self.image),
            flavors: self
                .flavors
                .into_iter()
                .map(|flavor| Flavor {
                    key: flavor.key,
                    name: flavor.name,
                    image: non_empty(flavor.image),
                })
                .collect(),
        })
    }
}

/// Variant labels must be unique within a product, and flavor keys within a variant.
fn ensure_unique_options(product: &str, variants: &[VariantSpec]) -> Result<(), CatalogError> {
    let mut labels = FxHashSet::default();

    for variant in variants {
        if !labels.insert(variant.label.as_str()) {
            return Err(CatalogError::DuplicateVariant {
                product: product.to_string(),
                variant: variant.label.clone(),
            });
        }

        let mut flavors = FxHashSet::default();

        for flavor in &variant.flavors {
            if !flavors.insert(flavor.key.as_str()) {
                return Err(CatalogError::DuplicateFlavor {
                    product: product.to_string(),
                    variant: variant.label.clone(),
                    flavor: flavor.key.clone(),
                });
            }
        }
    }

    Ok(())
}

/// Blank image paths are treated as missing.
fn non_empty(image: Option<String>) -> Option<String> {
    image.filter(|path| !path.trim().is_empty())
}
