//! Cart commands

use std::{io, str::FromStr};

use anyhow::{Context, Result};
use clap::Args;
use kusina::{
    cart::{AddOutcome, Cart, LineItem, LineItemId},
    catalog::Catalog,
    pricing::selection::Selection,
    summary,
};
use uuid::Uuid;

use crate::cli::config::Store;

#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    /// Product key, as listed by `kusina menu`
    product: String,

    /// Variant label; the first variant when omitted
    #[arg(long)]
    variant: Option<String>,

    /// Flavor key; the variant's first flavor when omitted
    #[arg(long)]
    flavor: Option<String>,

    /// Add-on key; repeat for several
    #[arg(long = "addon")]
    addons: Vec<String>,

    /// Number of units
    #[arg(short, long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Debug, Args)]
pub(crate) struct ItemArgs {
    /// Line number in the cart, or line item id
    item: ItemRef,
}

#[derive(Debug, Args)]
pub(crate) struct QuantityArgs {
    /// Line number in the cart, or line item id
    item: ItemRef,

    /// New quantity
    quantity: u32,
}

/// A line item picked by its position in the cart (1-based) or by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ItemRef {
    Position(usize),
    Id(Uuid),
}

impl FromStr for ItemRef {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(position) = s.parse::<usize>() {
            return Ok(ItemRef::Position(position));
        }

        Uuid::parse_str(s).map(ItemRef::Id)
    }
}

impl ItemRef {
    fn resolve(self, cart: &Cart) -> Option<LineItemId> {
        match self {
            ItemRef::Position(position) => position
                .checked_sub(1)
                .and_then(|idx| cart.items().get(idx))
                .map(LineItem::id),
            ItemRef::Id(uuid) => Some(LineItemId::from_uuid(uuid)),
        }
    }
}

pub(crate) fn add(
    catalog: &Catalog,
    store: &mut Store,
    args: AddArgs,
    mut out: impl io::Write,
) -> Result<()> {
    let product = catalog
        .find_product(&args.product)
        .with_context(|| format!("No product named {} on the menu", args.product))?;

    let mut selection = Selection::new(product);

    if let Some(variant) = args.variant {
        selection = selection.with_variant(variant);
    }

    if let Some(flavor) = args.flavor {
        selection = selection.with_flavor(flavor);
    }

    let candidate = selection
        .with_addons(args.addons)
        .with_quantity(args.quantity)
        .into_candidate(catalog)?;

    let name = candidate.name.clone();

    match store.add_item(candidate)? {
        AddOutcome::Added(_) => writeln!(out, "Added {name} to your cart")?,
        AddOutcome::Merged(_) => writeln!(out, "Added more {name} to your cart")?,
    }

    summary::write_cart(out, store.cart())?;

    Ok(())
}

pub(crate) fn remove(store: &mut Store, args: &ItemArgs, mut out: impl io::Write) -> Result<()> {
    let removed = match args.item.resolve(store.cart()) {
        Some(id) => store.remove_item(id)?,
        None => false,
    };

    if !removed {
        writeln!(out, "No such item in your cart")?;
    }

    summary::write_cart(out, store.cart())?;

    Ok(())
}

pub(crate) fn update_quantity(
    store: &mut Store,
    args: &QuantityArgs,
    mut out: impl io::Write,
) -> Result<()> {
    let updated = match args.item.resolve(store.cart()) {
        Some(id) => store.update_quantity(id, args.quantity)?,
        None => false,
    };

    if !updated {
        writeln!(out, "No such item in your cart")?;
    }

    summary::write_cart(out, store.cart())?;

    Ok(())
}

pub(crate) fn clear(store: &mut Store, mut out: impl io::Write) -> Result<()> {
    store.clear_cart()?;

    writeln!(out, "Your cart is now empty")?;

    Ok(())
}
