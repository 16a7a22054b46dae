//! Product Selections
//!
//! A customer's in-progress customization of one product: variant, flavor,
//! add-ons and quantity. Confirming a selection validates it and produces the
//! [`CartCandidate`] handed to the cart.

use thiserror::Error;

use crate::{
    cart::CartCandidate,
    catalog::{
        Catalog,
        products::{AddonPolicy, Product, VariantSpec},
    },
    money::{Price, times},
    pricing::{AddonSet, PricingError, resolve_price},
};

/// Placeholder shown when neither flavor, variant nor product has an image.
const PLACEHOLDER_TEXT: &str = "Image Coming Soon";

/// Selection errors
#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    /// The product requires at least one add-on.
    #[error("Please select at least one add-on")]
    AddonsRequired(String),

    /// The product takes no add-ons.
    #[error("{0} does not take add-ons")]
    AddonsNotAllowed(String),

    /// The add-on exists but this product does not offer it.
    #[error("{product} does not offer add-on {addon}")]
    AddonNotOffered {
        /// Product key
        product: String,
        /// Add-on key
        addon: String,
    },

    /// The chosen variant comes in flavors and none was chosen.
    #[error("Please choose a flavor for {variant}")]
    FlavorRequired {
        /// Product key
        product: String,
        /// Variant label
        variant: String,
    },

    /// Catalog integrity error
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

impl SelectionError {
    /// Whether the error is a customer mistake that can be fixed by changing the selection.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, SelectionError::Pricing(_))
    }
}

/// A product customization in progress.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    product: &'a Product,
    variant: Option<String>,
    flavor: Option<String>,
    addons: AddonSet,
    quantity: u32,
}

impl<'a> Selection<'a> {
    /// Start a selection with the first variant and its first flavor preselected.
    pub fn new(product: &'a Product) -> Self {
        let first = product.variants().first();

        Selection {
            product,
            variant: first.map(|variant| variant.label.clone()),
            flavor: first.and_then(first_flavor),
            addons: AddonSet::new(),
            quantity: 1,
        }
    }

    /// Choose a variant; the flavor resets to the variant's first flavor.
    #[must_use]
    pub fn with_variant(mut self, label: impl Into<String>) -> Self {
        let label = label.into();

        self.flavor = self.product.variant(&label).and_then(first_flavor);
        self.variant = Some(label);

        self
    }

    /// Choose a flavor of the current variant.
    #[must_use]
    pub fn with_flavor(mut self, key: impl Into<String>) -> Self {
        self.flavor = Some(key.into());
        self
    }

    /// Replace the selected add-ons.
    #[must_use]
    pub fn with_addons<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.addons = keys.into_iter().collect();
        self
    }

    /// Set the quantity, never below one.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    /// Select the add-on if unselected, unselect it otherwise.
    pub fn toggle_addon(&mut self, key: &str) {
        if !self.addons.remove(key) {
            self.addons.insert(key);
        }
    }

    /// Increase the quantity by one.
    pub fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    /// Decrease the quantity by one, stopping at one.
    pub fn decrement(&mut self) {
        self.quantity = self.quantity.saturating_sub(1).max(1);
    }

    /// The product being customized.
    pub fn product(&self) -> &'a Product {
        self.product
    }

    /// The chosen variant label.
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// The chosen flavor key.
    pub fn flavor(&self) -> Option<&str> {
        self.flavor.as_deref()
    }

    /// The selected add-ons.
    pub fn addons(&self) -> &AddonSet {
        &self.addons
    }

    /// The chosen quantity.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price of the current selection.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the variant or an add-on is not in the catalog.
    pub fn unit_price(&self, catalog: &Catalog) -> Result<Price, PricingError> {
        resolve_price(catalog, self.product, self.variant(), &self.addons)
    }

    /// Price of the current selection times its quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the variant or an add-on is not in the catalog.
    pub fn total_price(&self, catalog: &Catalog) -> Result<Price, PricingError> {
        Ok(times(&self.unit_price(catalog)?, self.quantity))
    }

    /// Image to show for the current selection.
    ///
    /// Flavor image first, then variant image, then product image, then a placeholder.
    pub fn image(&self) -> String {
        let variant = self.variant().and_then(|label| self.product.variant(label));

        let flavor_image = variant
            .zip(self.flavor())
            .and_then(|(variant, key)| variant.flavor(key))
            .and_then(|flavor| flavor.image.clone());

        flavor_image
            .or_else(|| variant.and_then(|variant| variant.image.clone()))
            .or_else(|| self.product.image.clone())
            .unwrap_or_else(|| placeholder_image(PLACEHOLDER_TEXT))
    }

    /// Validate the selection and turn it into a cart candidate.
    ///
    /// # Errors
    ///
    /// Returns a user-facing [`SelectionError`] if the add-ons or flavor do not fit
    /// the product, or [`SelectionError::Pricing`] for catalog integrity errors.
    pub fn into_candidate(self, catalog: &Catalog) -> Result<CartCandidate, SelectionError> {
        self.validate_addons(catalog)?;
        self.validate_flavor()?;

        let unit_price = self.unit_price(catalog)?;
        let image = self.image();

        Ok(CartCandidate {
            name: self.product.name.clone(),
            image,
            variant: self.variant.unwrap_or_default(),
            flavor: self.flavor.unwrap_or_default(),
            addons: self.addons,
            quantity: self.quantity,
            unit_price,
        })
    }

    fn validate_addons(&self, catalog: &Catalog) -> Result<(), SelectionError> {
        let product = self.product;

        match product.addon_policy {
            AddonPolicy::Required if self.addons.is_empty() => {
                return Err(SelectionError::AddonsRequired(product.key.clone()));
            }
            AddonPolicy::None if !self.addons.is_empty() => {
                return Err(SelectionError::AddonsNotAllowed(product.key.clone()));
            }
            _ => {}
        }

        for key in self.addons.iter() {
            if catalog.addon(key).is_none() {
                return Err(PricingError::UnknownAddon(key.to_string()).into());
            }

            if !product.offers_addon(key) {
                return Err(SelectionError::AddonNotOffered {
                    product: product.key.clone(),
                    addon: key.to_string(),
                });
            }
        }

        Ok(())
    }

    fn validate_flavor(&self) -> Result<(), SelectionError> {
        let variant = self.variant().and_then(|label| self.product.variant(label));

        match (variant, self.flavor()) {
            (Some(variant), None) if !variant.flavors.is_empty() => {
                Err(SelectionError::FlavorRequired {
                    product: self.product.key.clone(),
                    variant: variant.label.clone(),
                })
            }
            (Some(variant), Some(flavor)) if variant.flavor(flavor).is_some() => Ok(()),
            (_, Some(flavor)) => Err(PricingError::UnknownFlavor {
                product: self.product.key.clone(),
                variant: self.variant.clone().unwrap_or_default(),
                flavor: flavor.to_string(),
            }
            .into()),
            (_, None) => Ok(()),
        }
    }
}

fn first_flavor(variant: &VariantSpec) -> Option<String> {
    variant.flavors.first().map(|flavor| flavor.key.clone())
}

/// URL of a generated placeholder image showing `text`.
pub fn placeholder_image(text: &str) -> String {
    format!(
        "https://placehold.co/600x400/1f2937/f97316?text={}&font=montserrat",
        urlencoding::encode(text)
    )
}
