//! Receipt
//!
//! Printable summary of a cart or a placed order.

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    pricing::{PricingError, line_total, money, order_total, surcharge_rate},
};

/// Errors that can occur when building or printing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// A price could not be converted to money.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Writing the receipt failed.
    #[error("failed to write receipt")]
    IO(#[from] io::Error),
}

/// One printed line.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine {
    /// Item name
    pub name: String,

    /// Number of units
    pub quantity: u32,

    /// Price per unit
    pub unit_price: Money<'static, Currency>,

    /// Unit price × quantity
    pub total: Money<'static, Currency>,
}

impl ReceiptLine {
    /// Build a line from a unit price.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if either amount cannot be represented.
    pub fn new(
        name: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
        currency: &'static Currency,
    ) -> Result<Self, PricingError> {
        Ok(Self {
            name: name.into(),
            quantity,
            unit_price: money(unit_price, currency)?,
            total: money(line_total(unit_price, quantity)?, currency)?,
        })
    }
}

/// Receipt for a cart or order.
#[derive(Debug, Clone)]
pub struct Receipt {
    lines: SmallVec<[ReceiptLine; 8]>,
    subtotal: Money<'static, Currency>,
    total: Money<'static, Currency>,
}

impl Receipt {
    /// Create a receipt with the given details.
    pub fn new(
        lines: impl IntoIterator<Item = ReceiptLine>,
        subtotal: Money<'static, Currency>,
        total: Money<'static, Currency>,
    ) -> Self {
        Self {
            lines: lines.into_iter().collect(),
            subtotal,
            total,
        }
    }

    /// Receipt for the current cart contents, with the total checkout would charge.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if any amount cannot be represented in the cart currency.
    pub fn from_cart(cart: &Cart) -> Result<Self, ReceiptError> {
        let currency = cart.currency();

        let lines = cart
            .iter()
            .map(|line| {
                ReceiptLine::new(
                    line.product().name.clone(),
                    line.quantity(),
                    line.product().price,
                    currency,
                )
            })
            .collect::<Result<SmallVec<[ReceiptLine; 8]>, PricingError>>()?;

        let subtotal = cart.subtotal()?;
        let total = order_total(subtotal, currency)?;

        Ok(Self {
            lines,
            subtotal,
            total,
        })
    }

    /// Printed lines.
    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// Amount charged.
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Difference between total and subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn surcharge(&self) -> Result<Money<'static, Currency>, MoneyError> {
        self.total.sub(self.subtotal)
    }

    /// Prints the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["#", "Item", "Qty", "Unit Price", "Total"]);

        for (idx, line) in self.lines.iter().enumerate() {
            builder.push_record([
                format!("{}", idx + 1),
                line.name.clone(),
                line.quantity.to_string(),
                format!("{}", line.unit_price),
                format!("{}", line.total),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..5), Alignment::right());

        writeln!(out, "\n{table}")?;

        let surcharge_points = (surcharge_rate() * Decimal::ONE_HUNDRED).normalize();

        writeln!(out, " Subtotal: {}", self.subtotal)?;
        writeln!(out, " Surcharge ({surcharge_points}%): {}", self.surcharge()?)?;
        writeln!(out, " Total: {}", self.total)?;

        Ok(())
    }
}
