//! Checkout
//!
//! Walks a customer from the cart through delivery details and payment to a
//! final confirmation. Checkout only reads the cart; nothing here mutates it.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{
    cart::{Cart, LineItem},
    money::Price,
};

/// Number customers send GCash payments to.
pub const GCASH_NUMBER: &str = "0917 123 4567";

/// Errors that can occur when placing an order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// There is nothing in the cart to order.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// The order was submitted before reaching the confirmation step.
    #[error("Order can only be placed from the confirmation step, not {0}")]
    NotConfirmed(CheckoutStep),
}

/// Steps shown in the checkout progress bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckoutStep {
    /// Reviewing the cart; precedes checkout proper.
    Cart,

    /// Entering delivery details.
    #[default]
    Details,

    /// Choosing how to pay.
    Payment,

    /// Reviewing the order before placing it.
    Confirmation,
}

impl CheckoutStep {
    /// Every step, in progress bar order.
    pub const ALL: [CheckoutStep; 4] = [
        CheckoutStep::Cart,
        CheckoutStep::Details,
        CheckoutStep::Payment,
        CheckoutStep::Confirmation,
    ];

    /// The step after this one; the last step stays put.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            CheckoutStep::Cart => CheckoutStep::Details,
            CheckoutStep::Details => CheckoutStep::Payment,
            CheckoutStep::Payment | CheckoutStep::Confirmation => CheckoutStep::Confirmation,
        }
    }

    /// The step before this one. Going back from details stays on details;
    /// returning to the cart means leaving checkout.
    #[must_use]
    pub fn back(self) -> Self {
        match self {
            CheckoutStep::Confirmation => CheckoutStep::Payment,
            CheckoutStep::Cart | CheckoutStep::Details | CheckoutStep::Payment => {
                CheckoutStep::Details
            }
        }
    }

    /// Progress bar label.
    pub fn label(self) -> &'static str {
        match self {
            CheckoutStep::Cart => "Cart",
            CheckoutStep::Details => "Details",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Confirmation => "Confirmation",
        }
    }

    /// Whether `step` is highlighted in the progress bar while on this step.
    pub fn has_reached(self, step: CheckoutStep) -> bool {
        self >= step
    }
}

impl Display for CheckoutStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Delivery details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    /// Full name
    pub name: String,

    /// Email address
    pub email: String,

    /// Phone number
    pub phone: String,

    /// Delivery address
    pub address: String,
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Mobile wallet transfer, confirmed by the customer's receipt.
    #[default]
    #[serde(rename = "gcash")]
    GCash,

    /// Cash handed over on delivery.
    #[serde(rename = "cod")]
    CashOnDelivery,
}

impl PaymentMethod {
    /// Short code used in forms and storage.
    pub fn code(self) -> &'static str {
        match self {
            PaymentMethod::GCash => "gcash",
            PaymentMethod::CashOnDelivery => "cod",
        }
    }

    /// Steps the customer follows to pay `total`.
    pub fn instructions(self, total: &Price) -> Vec<String> {
        match self {
            PaymentMethod::GCash => vec![
                "Open your GCash app".to_string(),
                format!("Scan the QR code or send to {GCASH_NUMBER}"),
                format!("Enter the exact amount: {total}"),
                "Complete the payment in the GCash app".to_string(),
                "Keep a screenshot of the receipt".to_string(),
            ],
            PaymentMethod::CashOnDelivery => {
                vec![format!("Prepare {total} in cash for the rider")]
            }
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::GCash => f.write_str("GCash Payment"),
            PaymentMethod::CashOnDelivery => f.write_str("Cash on Delivery"),
        }
    }
}

/// Snapshot of the cart as shown on the confirmation step.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    /// Line items in display order
    pub items: Vec<LineItem>,

    /// Sum of all quantities
    pub total_items: u64,

    /// Amount due
    pub total: Price,
}

impl OrderSummary {
    /// Snapshot the cart.
    pub fn of(cart: &Cart) -> Self {
        OrderSummary {
            items: cart.items().to_vec(),
            total_items: cart.total_items(),
            total: cart.total_price(),
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSubmission {
    /// Delivery details
    pub details: CustomerDetails,

    /// Payment method
    pub payment: PaymentMethod,

    /// What was ordered
    pub summary: OrderSummary,
}

impl OrderSubmission {
    /// Payment steps for the order total.
    pub fn payment_instructions(&self) -> Vec<String> {
        self.payment.instructions(&self.summary.total)
    }
}

/// Checkout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checkout {
    step: CheckoutStep,
    details: CustomerDetails,
    payment: PaymentMethod,
}

impl Checkout {
    /// Start on the details step with GCash preselected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delivery details.
    #[must_use]
    pub fn with_details(mut self, details: CustomerDetails) -> Self {
        self.details = details;
        self
    }

    /// Set the payment method.
    #[must_use]
    pub fn with_payment(mut self, payment: PaymentMethod) -> Self {
        self.payment = payment;
        self
    }

    /// Move to the next step.
    pub fn advance(&mut self) -> CheckoutStep {
        self.step = self.step.next();
        self.step
    }

    /// Move to the previous step.
    pub fn go_back(&mut self) -> CheckoutStep {
        self.step = self.step.back();
        self.step
    }

    /// Current step
    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Delivery details
    pub fn details(&self) -> &CustomerDetails {
        &self.details
    }

    /// Mutable delivery details, for filling in the form.
    pub fn details_mut(&mut self) -> &mut CustomerDetails {
        &mut self.details
    }

    /// Payment method
    pub fn payment(&self) -> PaymentMethod {
        self.payment
    }

    /// Choose a payment method.
    pub fn set_payment(&mut self, payment: PaymentMethod) {
        self.payment = payment;
    }

    /// What the confirmation step shows for `cart`.
    pub fn summary(&self, cart: &Cart) -> OrderSummary {
        OrderSummary::of(cart)
    }

    /// Place the order.
    ///
    /// The cart is left as it is; clearing it afterwards is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart is empty, or
    /// [`CheckoutError::NotConfirmed`] before the confirmation step.
    pub fn submit(&self, cart: &Cart) -> Result<OrderSubmission, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        if self.step != CheckoutStep::Confirmation {
            return Err(CheckoutError::NotConfirmed(self.step));
        }

        let summary = self.summary(cart);

        info!(
            items = summary.total_items,
            total = %summary.total,
            payment = self.payment.code(),
            "order submitted"
        );

        Ok(OrderSubmission {
            details: self.details.clone(),
            payment: self.payment,
            summary,
        })
    }
}
