//! Kusina storefront CLI

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, logging};

mod cli;

fn main() -> Result<()> {
    // Load .env file if present (ignore if missing)
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    logging::init_subscriber(&cli.logging)?;

    cli.run()
}
