//! Summary
//!
//! Plain text tables for the menu, the cart and placed orders.

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, LineItem},
    catalog::{
        Catalog,
        products::{AddonPolicy, Pricing, Product},
    },
    checkout::OrderSubmission,
    money::Price,
};

/// Errors that can occur when writing a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// IO error
    #[error("Failed to write summary: {0}")]
    Io(#[from] io::Error),
}

/// Write every category of the menu with its products and prices.
///
/// # Errors
///
/// Returns a [`SummaryError`] if the output cannot be written.
pub fn write_menu(mut out: impl io::Write, catalog: &Catalog) -> Result<(), SummaryError> {
    for category in catalog.categories() {
        let mut builder = Builder::default();

        builder.push_record(["Key", "Product", "Options", "Price"]);

        for product in catalog.products_in(&category.key) {
            builder.push_record([
                product.key.clone(),
                product.name.clone(),
                product_options(product),
                product_price(product),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(3..4), Alignment::right());

        writeln!(out, "\n{}\n{table}", category.name)?;
    }

    if !catalog.addons().is_empty() {
        let mut builder = Builder::default();

        builder.push_record(["Key", "Add-on", "Price"]);

        for addon in catalog.addons() {
            builder.push_record([addon.key.clone(), addon.name.clone(), addon.price.to_string()]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..3), Alignment::right());

        writeln!(out, "\nAdd-ons\n{table}")?;
    }

    Ok(())
}

/// Write the cart's line items and totals.
///
/// # Errors
///
/// Returns a [`SummaryError`] if the output cannot be written.
pub fn write_cart(mut out: impl io::Write, cart: &Cart) -> Result<(), SummaryError> {
    if cart.is_empty() {
        writeln!(out, "Your cart is empty")?;

        return Ok(());
    }

    write_items(&mut out, cart.items())?;
    write_totals(&mut out, cart.total_items(), &cart.total_price())?;

    Ok(())
}

/// Write a placed order: delivery details, payment steps and items.
///
/// # Errors
///
/// Returns a [`SummaryError`] if the output cannot be written.
pub fn write_order(mut out: impl io::Write, order: &OrderSubmission) -> Result<(), SummaryError> {
    let details = &order.details;

    writeln!(out, "Delivery details")?;
    writeln!(out, "  {}", details.name)?;
    writeln!(out, "  {}", details.phone)?;
    writeln!(out, "  {}", details.email)?;
    writeln!(out, "  {}", details.address)?;

    writeln!(out, "\nPayment method: {}", order.payment)?;

    for (n, step) in order.payment_instructions().iter().enumerate() {
        writeln!(out, "  {}. {step}", n + 1)?;
    }

    write_items(&mut out, &order.summary.items)?;
    write_totals(&mut out, order.summary.total_items, &order.summary.total)?;

    Ok(())
}

fn write_items(out: &mut impl io::Write, items: &[LineItem]) -> Result<(), SummaryError> {
    let mut builder = Builder::default();

    builder.push_record(["#", "Id", "Item", "Options", "Qty", "Price", "Total"]);

    for (n, item) in items.iter().enumerate() {
        builder.push_record([
            (n + 1).to_string(),
            item.id().to_string(),
            item.name().to_string(),
            line_item_options(item),
            item.quantity().to_string(),
            item.unit_price().to_string(),
            item.total_price().to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(4..7), Alignment::right());
    table.modify(Rows::first(), Alignment::center());

    writeln!(out, "\n{table}")?;

    Ok(())
}

fn write_totals(
    out: &mut impl io::Write,
    total_items: u64,
    total: &Price,
) -> Result<(), SummaryError> {
    writeln!(out, " Items: {total_items}")?;
    writeln!(out, " Total: {total}")?;

    Ok(())
}

fn product_options(product: &Product) -> String {
    let mut lines: Vec<String> = product
        .variants()
        .iter()
        .map(|variant| {
            let flavors: Vec<&str> = variant.flavors.iter().map(|f| f.name.as_str()).collect();

            if flavors.is_empty() {
                format!("{} ({})", variant.display_name(), variant.price)
            } else {
                format!(
                    "{} ({}): {}",
                    variant.display_name(),
                    variant.price,
                    flavors.join(", ")
                )
            }
        })
        .collect();

    match product.addon_policy {
        AddonPolicy::None => {}
        AddonPolicy::Optional => lines.push(format!("add-ons: {}", product.addons.join(", "))),
        AddonPolicy::Required => {
            lines.push(format!("add-ons (pick one or more): {}", product.addons.join(", ")));
        }
    }

    lines.join("\n")
}

fn product_price(product: &Product) -> String {
    match &product.pricing {
        Pricing::Simple { base_price } => base_price.to_string(),
        Pricing::Variants { .. } => product
            .starting_price()
            .map(|price| format!("from {price}"))
            .unwrap_or_default(),
    }
}

fn line_item_options(item: &LineItem) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !item.variant().is_empty() {
        parts.push(item.variant().to_string());
    }

    if !item.flavor().is_empty() {
        parts.push(item.flavor().to_string());
    }

    if !item.addons().is_empty() {
        parts.push(format!("+ {}", item.addons().sorted().join(", ")));
    }

    parts.join("\n")
}
