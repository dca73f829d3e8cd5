//! Cart
//!
//! The shopping cart: one line per product or restaurant menu item, each holding a
//! snapshot of the catalog entry taken when it was first added.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::pricing::{PricingError, money, sum_totals};

mod lines;
pub mod storage;

pub use lines::{CartLine, CartLineId, CartProduct, LineSource, RESTAURANT_FOOD_PREFIX};

/// Errors related to cart mutations.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// No line with this identifier is in the cart.
    #[error("cart has no line {0}")]
    UnknownLine(CartLineId),

    /// Two lines share an identifier.
    #[error("cart line {0} appears more than once")]
    DuplicateLine(CartLineId),

    /// A stored line has a quantity of zero.
    #[error("cart line {0} has a quantity of zero")]
    ZeroQuantity(CartLineId),
}

/// Shopping cart
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency: &'static Currency,
}

impl Cart {
    /// Create an empty cart priced in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Create a cart from previously stored lines.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if two lines share an identifier or a line has no units.
    pub fn with_lines(
        lines: impl Into<Vec<CartLine>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let lines = lines.into();

        for (idx, line) in lines.iter().enumerate() {
            if line.quantity() == 0 {
                return Err(CartError::ZeroQuantity(line.id().clone()));
            }

            if lines
                .iter()
                .skip(idx + 1)
                .any(|other| other.id() == line.id())
            {
                return Err(CartError::DuplicateLine(line.id().clone()));
            }
        }

        Ok(Cart { lines, currency })
    }

    /// Add one unit to the cart and return the line's new quantity.
    ///
    /// An existing line keeps the snapshot it was created with.
    pub fn add(&mut self, id: CartLineId, product: CartProduct) -> u32 {
        if let Some(line) = self.line_mut(&id) {
            let quantity = line.quantity().saturating_add(1);
            line.set_quantity(quantity);

            return quantity;
        }

        self.lines.push(CartLine::new(id, product));

        1
    }

    /// Set a line's quantity. Zero removes the line.
    ///
    /// Returns the remaining quantity, or `None` when the line was removed.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownLine`] if the line is not in the cart.
    pub fn update_quantity(
        &mut self,
        id: &CartLineId,
        quantity: u32,
    ) -> Result<Option<u32>, CartError> {
        if quantity == 0 {
            return if self.remove(id) {
                Ok(None)
            } else {
                Err(CartError::UnknownLine(id.clone()))
            };
        }

        let line = self
            .line_mut(id)
            .ok_or_else(|| CartError::UnknownLine(id.clone()))?;

        line.set_quantity(quantity);

        Ok(Some(quantity))
    }

    /// Add one unit to an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownLine`] if the line is not in the cart.
    pub fn increment(&mut self, id: &CartLineId) -> Result<Option<u32>, CartError> {
        let quantity = self.quantity_of(id)?;

        self.update_quantity(id, quantity.saturating_add(1))
    }

    /// Take one unit off an existing line, removing it at zero.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownLine`] if the line is not in the cart.
    pub fn decrement(&mut self, id: &CartLineId) -> Result<Option<u32>, CartError> {
        let quantity = self.quantity_of(id)?;

        self.update_quantity(id, quantity.saturating_sub(1))
    }

    /// Remove a line. Returns whether anything was removed.
    pub fn remove(&mut self, id: &CartLineId) -> bool {
        let before = self.lines.len();

        self.lines.retain(|line| line.id() != id);

        self.lines.len() != before
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of price × quantity over all lines.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the subtotal cannot be represented in the cart currency.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, PricingError> {
        money(self.subtotal_amount()?, self.currency)
    }

    /// Unrounded subtotal.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the sum does not fit in a decimal.
    pub fn subtotal_amount(&self) -> Result<Decimal, PricingError> {
        sum_totals(self.lines.iter().map(CartLine::total))
    }

    /// Look up a line.
    pub fn get(&self, id: &CartLineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    /// Lines in the order they were added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Iterate over the lines.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity())).sum()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn line_mut(&mut self, id: &CartLineId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.id() == id)
    }

    fn quantity_of(&self, id: &CartLineId) -> Result<u32, CartError> {
        self.get(id)
            .map(CartLine::quantity)
            .ok_or_else(|| CartError::UnknownLine(id.clone()))
    }
}
