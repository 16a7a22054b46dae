//! Products

use slotmap::new_key_type;

use crate::money::Price;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Whether, and how, a product takes add-ons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddonPolicy {
    /// The product takes no add-ons.
    #[default]
    None,

    /// Add-ons may be selected.
    Optional,

    /// At least one add-on must be selected.
    Required,
}

/// Product
#[derive(Debug, Clone)]
pub struct Product {
    /// Product key, unique across the catalog
    pub key: String,

    /// Product name
    pub name: String,

    /// Product description
    pub description: String,

    /// Product image, if any
    pub image: Option<String>,

    /// Key of the category the product belongs to
    pub category: String,

    /// How the product is priced
    pub pricing: Pricing,

    /// Add-on policy
    pub addon_policy: AddonPolicy,

    /// Keys of the add-ons this product offers
    pub addons: Vec<String>,
}

impl Product {
    /// Find a variant by its label.
    ///
    /// Always `None` for simply priced products.
    pub fn variant(&self, label: &str) -> Option<&VariantSpec> {
        match &self.pricing {
            Pricing::Simple { .. } => None,
            Pricing::Variants { variants } => variants.iter().find(|v| v.label == label),
        }
    }

    /// The variants of this product, empty for simply priced products.
    pub fn variants(&self) -> &[VariantSpec] {
        match &self.pricing {
            Pricing::Simple { .. } => &[],
            Pricing::Variants { variants } => variants,
        }
    }

    /// Whether the product offers the given add-on.
    pub fn offers_addon(&self, key: &str) -> bool {
        self.addons.iter().any(|addon| addon == key)
    }

    /// Lowest unit price the product can be bought at, before add-ons.
    pub fn starting_price(&self) -> Option<Price> {
        match &self.pricing {
            Pricing::Simple { base_price } => Some(*base_price),
            Pricing::Variants { variants } => variants
                .iter()
                .map(|variant| variant.price)
                .min_by_key(Price::to_minor_units),
        }
    }
}

/// How a product is priced.
#[derive(Debug, Clone)]
pub enum Pricing {
    /// A single base price.
    Simple {
        /// Base price
        base_price: Price,
    },

    /// Priced per variant; at least one variant is always present.
    Variants {
        /// Variants in display order
        variants: Vec<VariantSpec>,
    },
}

/// A priced alternative of a product, such as a size.
#[derive(Debug, Clone)]
pub struct VariantSpec {
    /// Variant label (e.g. `16oz`)
    pub label: String,

    /// Display name, if different from the label
    pub name: Option<String>,

    /// Variant price, replacing the product's base price
    pub price: Price,

    /// Variant image, if any
    pub image: Option<String>,

    /// Flavors in display order
    pub flavors: Vec<Flavor>,
}

impl VariantSpec {
    /// Find a flavor by key.
    pub fn flavor(&self, key: &str) -> Option<&Flavor> {
        self.flavors.iter().find(|flavor| flavor.key == key)
    }

    /// Name to show for this variant.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.label)
    }
}

/// A display-only refinement of a variant.
#[derive(Debug, Clone)]
pub struct Flavor {
    /// Flavor key
    pub key: String,

    /// Flavor name
    pub name: String,

    /// Flavor image, if any
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::PHP};

    use super::*;

    fn variant(label: &str, minor: i64) -> VariantSpec {
        VariantSpec {
            label: label.to_string(),
            name: None,
            price: Money::from_minor(minor, PHP),
            image: None,
            flavors: vec![Flavor {
                key: "lemon".to_string(),
                name: "Lemon".to_string(),
                image: None,
            }],
        }
    }

    fn product(pricing: Pricing) -> Product {
        Product {
            key: "fruit_soda".to_string(),
            name: "Fruit Soda".to_string(),
            description: String::new(),
            image: None,
            category: "beverages".to_string(),
            pricing,
            addon_policy: AddonPolicy::None,
            addons: Vec::new(),
        }
    }

    #[test]
    fn variant_lookup_by_label() {
        let soda = product(Pricing::Variants {
            variants: vec![variant("16oz", 2900), variant("22oz", 3900)],
        });

        assert_eq!(
            soda.variant("22oz").map(|v| v.price),
            Some(Money::from_minor(3900, PHP))
        );
        assert!(soda.variant("32oz").is_none());
    }

    #[test]
    fn simple_product_has_no_variants() {
        let fries = product(Pricing::Simple {
            base_price: Money::from_minor(2500, PHP),
        });

        assert!(fries.variants().is_empty());
        assert!(fries.variant("16oz").is_none());
        assert_eq!(fries.starting_price(), Some(Money::from_minor(2500, PHP)));
    }

    #[test]
    fn starting_price_is_cheapest_variant() {
        let soda = product(Pricing::Variants {
            variants: vec![variant("22oz", 3900), variant("16oz", 2900)],
        });

        assert_eq!(soda.starting_price(), Some(Money::from_minor(2900, PHP)));
    }

    #[test]
    fn display_name_falls_back_to_label() {
        let mut spec = variant("16oz", 2900);

        assert_eq!(spec.display_name(), "16oz");

        spec.name = Some("16oz Coke Float".to_string());

        assert_eq!(spec.display_name(), "16oz Coke Float");
    }
}
