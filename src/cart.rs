//! Cart
//!
//! The cart holds at most one line per product id; re-adding a product
//! increments its quantity instead of duplicating the line. Insertion order
//! is display order.

use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::products::{Product, ProductId};

/// Errors related to cart mutation or totals.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A product's currency differs from the cart currency.
    #[error("Product {id} has currency {item}, but cart has currency {cart}")]
    CurrencyMismatch {
        /// The product that was rejected.
        id: ProductId,
        /// Currency of the rejected product.
        item: &'static str,
        /// Currency of the cart.
        cart: &'static str,
    },

    /// Quantities below one are rejected rather than clamped.
    #[error("Quantity must be at least 1")]
    ZeroQuantity,

    /// A line total exceeded the representable amount in minor units.
    #[error("Line total exceeds the representable amount")]
    AmountOverflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A product plus the quantity of it in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    product: Product,
    quantity: u32,
}

impl CartItem {
    fn new(product: Product) -> Self {
        CartItem {
            product,
            quantity: 1,
        }
    }

    /// The product this line refers to.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Units of the product in the cart, always at least 1.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price times quantity for this line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::AmountOverflow`] if the multiplication overflows
    /// the minor-unit representation.
    pub fn line_total(&self) -> Result<Money<'static, Currency>, CartError> {
        let minor = self
            .product
            .price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity))
            .ok_or(CartError::AmountOverflow)?;

        Ok(Money::from_minor(minor, self.product.price.currency()))
    }
}

/// Cart
#[derive(Debug)]
pub struct Cart {
    items: SmallVec<[CartItem; 8]>,
    currency: &'static Currency,
}

impl Cart {
    /// Create a new empty cart with the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: SmallVec::new(),
            currency,
        }
    }

    /// Add one unit of a product.
    ///
    /// If the product is already in the cart its quantity is incremented;
    /// otherwise a new line is appended at the end of iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the product is priced in a
    /// currency other than the cart currency.
    pub fn add(&mut self, product: Product) -> Result<(), CartError> {
        let item_currency = product.price.currency();
        if item_currency != self.currency {
            return Err(CartError::CurrencyMismatch {
                id: product.id.clone(),
                item: item_currency.iso_alpha_code,
                cart: self.currency.iso_alpha_code,
            });
        }

        if let Some(existing) = self.items.iter_mut().find(|item| item.product.id == product.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            return Ok(());
        }

        self.items.push(CartItem::new(product));

        Ok(())
    }

    /// Remove a line by product id. Removing an absent id is a no-op.
    pub fn remove(&mut self, id: &ProductId) {
        self.items.retain(|item| &item.product.id != id);
    }

    /// Set the quantity of an existing line. An absent id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] for a quantity of zero; the cart
    /// is left unchanged.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        if let Some(item) = self.items.iter_mut().find(|item| &item.product.id == id) {
            item.quantity = quantity;
        }

        Ok(())
    }

    /// Calculate the subtotal of the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if there was a money arithmetic or overflow
    /// error.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, CartError> {
        self.items
            .iter()
            .try_fold(Money::from_minor(0, self.currency), |acc, item| {
                let line = item.line_total()?;
                Ok(acc.add(line)?)
            })
    }

    /// Total units across all lines (the badge count).
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |acc, item| acc.saturating_add(item.quantity))
    }

    /// The lines in display order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Empty the cart. Called exactly once per successful checkout.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
