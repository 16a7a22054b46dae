//! Kusina prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        AddOutcome, Cart, CartCandidate, CartError, CartStorage, CartStore, IdAllocator,
        JsonFileStorage, LineItem, LineItemId, MemoryStorage, RandomIds, SequentialIds,
        StorageError, StoreError,
    },
    catalog::{
        Catalog, CatalogError, Category,
        addons::Addon,
        products::{AddonPolicy, Flavor, Pricing, Product, ProductKey, VariantSpec},
    },
    checkout::{
        Checkout, CheckoutError, CheckoutStep, CustomerDetails, OrderSubmission, OrderSummary,
        PaymentMethod,
    },
    money::Price,
    pricing::{
        AddonSet, PricingError, resolve_price,
        selection::{Selection, SelectionError},
    },
    summary::SummaryError,
};
