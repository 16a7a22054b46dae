//! Checkout command

use std::io;

use anyhow::Result;
use clap::{Args, ValueEnum};
use kusina::{
    checkout::{Checkout, CheckoutStep, CustomerDetails, PaymentMethod},
    summary,
};

use crate::cli::config::Store;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum PaymentArg {
    /// Pay with GCash
    Gcash,

    /// Cash on delivery
    Cod,
}

impl From<PaymentArg> for PaymentMethod {
    fn from(value: PaymentArg) -> Self {
        match value {
            PaymentArg::Gcash => PaymentMethod::GCash,
            PaymentArg::Cod => PaymentMethod::CashOnDelivery,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Full name
    #[arg(long)]
    name: String,

    /// Email address
    #[arg(long)]
    email: String,

    /// Phone number
    #[arg(long)]
    phone: String,

    /// Delivery address
    #[arg(long)]
    address: String,

    /// Payment method
    #[arg(long, value_enum, default_value_t = PaymentArg::Gcash)]
    payment: PaymentArg,

    /// Empty the cart once the order is placed
    #[arg(long)]
    clear: bool,
}

pub(crate) fn run(store: &mut Store, args: CheckoutArgs, mut out: impl io::Write) -> Result<()> {
    let mut checkout = Checkout::new()
        .with_details(CustomerDetails {
            name: args.name,
            email: args.email,
            phone: args.phone,
            address: args.address,
        })
        .with_payment(args.payment.into());

    while checkout.step() != CheckoutStep::Confirmation {
        checkout.advance();
    }

    let order = checkout.submit(store.cart())?;

    summary::write_order(&mut out, &order)?;

    if args.clear {
        store.clear_cart()?;
    }

    Ok(())
}
