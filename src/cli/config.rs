//! CLI configuration

use std::path::PathBuf;

use clap::Args;
use kusina::{
    cart::{CartStore, JsonFileStorage, RandomIds, StoreError},
    catalog::{Catalog, CatalogError},
};

/// Cart store used by the CLI: a JSON file with random ids.
pub(crate) type Store = CartStore<JsonFileStorage, RandomIds>;

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub(crate) log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub(crate) log_format: LogFormat,
}

/// Where the menu comes from and where the cart is kept.
#[derive(Debug, Args)]
pub(crate) struct StoreConfig {
    /// Menu YAML file; the built-in storefront menu when omitted
    #[arg(long, env = "KUSINA_MENU", global = true)]
    pub(crate) menu: Option<PathBuf>,

    /// Directory holding the saved cart
    #[arg(long, env = "KUSINA_STORAGE_DIR", default_value = ".kusina", global = true)]
    pub(crate) storage_dir: PathBuf,
}

impl StoreConfig {
    /// Load the configured menu.
    pub(crate) fn catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.menu {
            Some(path) => Catalog::load(path),
            None => Catalog::storefront(),
        }
    }

    /// Open the saved cart, priced in the catalog's currency.
    pub(crate) fn open_cart(&self, catalog: &Catalog) -> Result<Store, StoreError> {
        CartStore::open_with_ids(
            JsonFileStorage::new(&self.storage_dir),
            RandomIds,
            catalog.currency(),
        )
    }
}
