//! Add-ons

use crate::money::Price;

/// A flat-priced modifier from the global add-on list, applied per unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Addon {
    /// Add-on key
    pub key: String,

    /// Add-on name
    pub name: String,

    /// Flat price added to each unit
    pub price: Price,

    /// Add-on image, if any
    pub image: Option<String>,
}
