//! Pricing
//!
//! Resolves the unit price of a product configuration: the variant price (or the
//! product's base price) plus the flat price of every selected add-on.

use rusty_money::MoneyError;
use thiserror::Error;

use crate::{
    catalog::{
        Catalog,
        products::{Pricing, Product},
    },
    money::Price,
};

pub mod addons;
pub mod selection;

pub use addons::AddonSet;

/// Catalog integrity errors raised while resolving a price.
///
/// These point at a bad key coming from code or data, never at a customer mistake.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The product has no variant with this label.
    #[error("product {product} has no variant {variant}")]
    UnknownVariant {
        /// Product key
        product: String,
        /// Requested variant label
        variant: String,
    },

    /// The product is priced per variant but no variant was given.
    #[error("product {0} is priced per variant; a variant must be chosen")]
    VariantRequired(String),

    /// The variant has no flavor with this key.
    #[error("variant {variant} of {product} has no flavor {flavor}")]
    UnknownFlavor {
        /// Product key
        product: String,
        /// Variant label
        variant: String,
        /// Requested flavor key
        flavor: String,
    },

    /// The add-on is not in the global add-on list.
    #[error("unknown add-on {0}")]
    UnknownAddon(String),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Resolve the unit price of `product` with the given variant and add-ons.
///
/// # Errors
///
/// - [`PricingError::VariantRequired`]: the product is priced per variant and `variant` is `None`.
/// - [`PricingError::UnknownVariant`]: `variant` is not a variant of the product.
/// - [`PricingError::UnknownAddon`]: an add-on key is not in the catalog.
/// - [`PricingError::Money`]: wrapped money arithmetic or currency mismatch error.
pub fn resolve_price(
    catalog: &Catalog,
    product: &Product,
    variant: Option<&str>,
    addons: &AddonSet,
) -> Result<Price, PricingError> {
    let base = match (&product.pricing, variant) {
        (Pricing::Simple { base_price }, None) => *base_price,
        (Pricing::Simple { .. }, Some(label)) => {
            return Err(PricingError::UnknownVariant {
                product: product.key.clone(),
                variant: label.to_string(),
            });
        }
        (Pricing::Variants { .. }, None) => {
            return Err(PricingError::VariantRequired(product.key.clone()));
        }
        (Pricing::Variants { .. }, Some(label)) => {
            product
                .variant(label)
                .ok_or_else(|| PricingError::UnknownVariant {
                    product: product.key.clone(),
                    variant: label.to_string(),
                })?
                .price
        }
    };

    let total = addons.iter().try_fold(base, |acc, key| {
        let addon = catalog
            .addon(key)
            .ok_or_else(|| PricingError::UnknownAddon(key.to_string()))?;

        Ok::<_, PricingError>(acc.add(addon.price)?)
    })?;

    Ok(total)
}
