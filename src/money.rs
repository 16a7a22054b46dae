//! Money

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, PHP, USD},
};

/// A monetary amount in the storefront currency.
pub type Price = Money<'static, Currency>;

/// Currency used when nothing else is configured.
pub const DEFAULT_CURRENCY: &Currency = PHP;

/// Look up a supported currency by its ISO alpha code.
pub fn currency_from_code(code: &str) -> Option<&'static Currency> {
    match code.trim() {
        "PHP" => Some(PHP),
        "USD" => Some(USD),
        "GBP" => Some(GBP),
        "EUR" => Some(EUR),
        _ => None,
    }
}

/// Parse an amount in major units (e.g. `"60"` or `"29.50"`) into minor units.
///
/// Returns `None` if the string is not a decimal number or does not fit in an `i64`.
pub fn parse_major_units(s: &str) -> Option<i64> {
    let amount = s.trim().parse::<Decimal>().ok()?;

    if amount.is_sign_negative() {
        return None;
    }

    amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
}

/// Multiply a unit price by a quantity.
pub fn times(price: &Price, quantity: u32) -> Price {
    let minor = price.to_minor_units().saturating_mul(i64::from(quantity));

    Money::from_minor(minor, price.currency())
}

/// Zero in the given currency.
pub fn zero(currency: &'static Currency) -> Price {
    Money::from_minor(0, currency)
}
