//! Command line interface

use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kusina::summary;

use crate::cli::config::{LoggingConfig, StoreConfig};

mod cart;
mod checkout;
pub(crate) mod config;
pub(crate) mod logging;

#[derive(Debug, Parser)]
#[command(name = "kusina", about = "Kusina storefront", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    store: StoreConfig,

    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the menu
    Menu,

    /// Add a product to the cart
    Add(cart::AddArgs),

    /// Show the cart
    Cart,

    /// Remove a line item
    Remove(cart::ItemArgs),

    /// Change a line item's quantity
    Qty(cart::QuantityArgs),

    /// Empty the cart
    Clear,

    /// Place an order for the cart
    Checkout(checkout::CheckoutArgs),
}

impl Cli {
    pub(crate) fn run(self) -> Result<()> {
        let catalog = self.store.catalog()?;
        let out = io::stdout().lock();

        match self.command {
            Commands::Menu => Ok(summary::write_menu(out, &catalog)?),
            Commands::Add(args) => {
                cart::add(&catalog, &mut self.store.open_cart(&catalog)?, args, out)
            }
            Commands::Cart => Ok(summary::write_cart(
                out,
                self.store.open_cart(&catalog)?.cart(),
            )?),
            Commands::Remove(args) => cart::remove(&mut self.store.open_cart(&catalog)?, &args, out),
            Commands::Qty(args) => {
                cart::update_quantity(&mut self.store.open_cart(&catalog)?, &args, out)
            }
            Commands::Clear => cart::clear(&mut self.store.open_cart(&catalog)?, out),
            Commands::Checkout(args) => {
                checkout::run(&mut self.store.open_cart(&catalog)?, args, out)
            }
        }
    }
}
