//! Orders
//!
//! The append-only ledger of placed orders. Checkout snapshots the cart into
//! an immutable [`Order`]; nothing in this core advances an order's status
//! after creation.

use std::io;

use jiff::Timestamp;
use rand::{Rng, distributions::Alphanumeric, thread_rng};
use rusty_money::{Money, iso::Currency};
use tabled::{builder::Builder, settings::Style};
use thiserror::Error;
use tracing::info;

use crate::{
    cart::{Cart, CartError, CartItem},
    session::User,
};

/// Length of generated order ids.
const ORDER_ID_LEN: usize = 9;

/// Prefix of generated tracking numbers.
const TRACKING_PREFIX: &str = "ITZ";

/// Errors related to placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout of an empty cart is rejected. Unreachable through the gated
    /// UI, checked here anyway.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// Checkout requires an active user. The navigation gate is the primary
    /// enforcement; this is the fallback for direct callers.
    #[error("checkout requires an authenticated user")]
    NotAuthenticated,

    /// Wrapped cart subtotal error.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Fulfilment status of an order. Orders are created as [`Preparing`] and
/// never transitioned by this core.
///
/// [`Preparing`]: OrderStatus::Preparing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    /// Awaiting payment confirmation.
    Pending,

    /// Being prepared for dispatch.
    Preparing,

    /// Handed to the carrier.
    Shipped,

    /// Delivered to the customer.
    Delivered,

    /// Cancelled.
    Cancelled,
}

impl OrderStatus {
    /// Lowercase label used in display.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A placed order: a deep snapshot of the cart at checkout time, plus
/// payment and shipping details. Immutable after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: String,
    items: Vec<CartItem>,
    total: Money<'static, Currency>,
    status: OrderStatus,
    placed_at: Timestamp,
    tracking_number: String,
    address: String,
    payment_method: String,
}

impl Order {
    /// Opaque order token, unique within the ledger.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Snapshot of the cart lines at checkout time.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Cart subtotal at the moment of checkout.
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Current fulfilment status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Creation instant.
    pub fn placed_at(&self) -> Timestamp {
        self.placed_at
    }

    /// Process-unique tracking token derived from the creation instant.
    pub fn tracking_number(&self) -> &str {
        &self.tracking_number
    }

    /// Shipping destination, copied from the customer at checkout.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Payment method label recorded at checkout.
    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    /// Render a line-item summary table for terminal output.
    ///
    /// # Errors
    ///
    /// Returns any error from writing to `out`.
    pub fn write_summary(&self, mut out: impl io::Write) -> io::Result<()> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Qty", "Unit price", "Line total"]);

        for item in &self.items {
            let line = item
                .line_total()
                .map_or_else(|_err| "-".to_string(), |total| total.to_string());

            builder.push_record([
                item.product().title.clone(),
                item.quantity().to_string(),
                item.product().price.to_string(),
                line,
            ]);
        }

        let mut table = builder.build();
        table.with(Style::sharp());

        writeln!(out, "{table}")?;
        writeln!(out, "Order {} ({}) total {}", self.id, self.status, self.total)?;
        writeln!(
            out,
            "Tracking {} / payment {} / ship to {}",
            self.tracking_number, self.payment_method, self.address
        )
    }
}

/// The session's placed orders, most recent first.
#[derive(Debug, Default)]
pub struct OrderLedger {
    orders: Vec<Order>,
    sequence: u64,
}

impl OrderLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        OrderLedger {
            orders: Vec::new(),
            sequence: 0,
        }
    }

    /// Convert a cart into a placed order and prepend it to the ledger.
    ///
    /// The order carries a deep snapshot of the cart lines; later cart
    /// mutation never alters a placed order. The caller is responsible for
    /// clearing the cart afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] for an empty cart, or a wrapped
    /// [`CartError`] if the subtotal cannot be calculated.
    pub fn place(
        &mut self,
        cart: &Cart,
        customer: &User,
        payment_method: &str,
    ) -> Result<Order, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let total = cart.subtotal()?;
        let placed_at = Timestamp::now();

        self.sequence = self.sequence.saturating_add(1);

        let order = Order {
            id: self.unique_order_id(),
            items: cart.items().to_vec(),
            total,
            status: OrderStatus::Preparing,
            placed_at,
            tracking_number: tracking_number(placed_at, self.sequence),
            address: customer.address.clone(),
            payment_method: payment_method.to_string(),
        };

        info!(order_id = %order.id, total = %order.total, "order placed");

        self.orders.insert(0, order.clone());

        Ok(order)
    }

    /// Placed orders, most recent first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// The most recently placed order.
    pub fn latest(&self) -> Option<&Order> {
        self.orders.first()
    }

    /// Get the number of placed orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Check if the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Draw random order ids until one does not collide with the ledger.
    fn unique_order_id(&self) -> String {
        loop {
            let candidate = random_order_id();

            if !self.orders.iter().any(|order| order.id == candidate) {
                return candidate;
            }
        }
    }
}

/// Random 9-character uppercase alphanumeric token.
fn random_order_id() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ORDER_ID_LEN)
        .map(|byte| char::from(byte).to_ascii_uppercase())
        .collect()
}

/// Tracking token derived from the creation instant. The ledger sequence
/// disambiguates orders placed within the same millisecond.
fn tracking_number(placed_at: Timestamp, sequence: u64) -> String {
    let millis = placed_at.as_millisecond();

    format!("{TRACKING_PREFIX}{millis}{sequence:04}")
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::BRL;
    use testresult::TestResult;

    use crate::products::{Condition, Product, ProductId};

    use super::*;

    fn product(id: &str, minor: i64) -> Product {
        Product {
            id: ProductId::from_raw(id),
            title: format!("Produto {id}"),
            price: Money::from_minor(minor, BRL),
            description: String::new(),
            category: "Diversos".to_string(),
            image: String::new(),
            rating: Decimal::from(4),
            reviews_count: 0,
            condition: Condition::New,
            flash_deal: false,
            free_shipping: false,
            full_delivery: false,
            seller_id: None,
        }
    }

    fn customer() -> User {
        User {
            id: "u-123".to_string(),
            name: "Usuário ITZ".to_string(),
            email: "demo@example.com".to_string(),
            address: "Centro, Imperatriz - MA".to_string(),
            phone: "(99) 99123-4567".to_string(),
        }
    }

    fn filled_cart() -> TestResult<Cart> {
        let mut cart = Cart::new(BRL);

        cart.add(product("a", 1_000))?;
        cart.add(product("a", 1_000))?;
        cart.add(product("b", 500))?;

        Ok(cart)
    }

    #[test]
    fn place_snapshots_cart_and_prepends() -> TestResult {
        let mut ledger = OrderLedger::new();
        let mut cart = filled_cart()?;

        let order = ledger.place(&cart, &customer(), "pix")?;

        assert_eq!(order.total(), Money::from_minor(2_500, BRL));
        assert_eq!(order.status(), OrderStatus::Preparing);
        assert_eq!(order.items(), cart.items());
        assert_eq!(order.payment_method(), "pix");
        assert_eq!(order.address(), "Centro, Imperatriz - MA");

        // Later cart mutation must not alter the placed order.
        cart.clear();

        let placed = ledger.latest().expect("expected a placed order");

        assert_eq!(placed.items().len(), 2);
        assert_eq!(placed.total(), Money::from_minor(2_500, BRL));

        Ok(())
    }

    #[test]
    fn place_rejects_empty_cart() {
        let mut ledger = OrderLedger::new();
        let cart = Cart::new(BRL);

        let result = ledger.place(&cart, &customer(), "pix");

        assert!(
            matches!(result, Err(CheckoutError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn orders_are_listed_most_recent_first() -> TestResult {
        let mut ledger = OrderLedger::new();
        let cart = filled_cart()?;

        let first = ledger.place(&cart, &customer(), "pix")?;
        let second = ledger.place(&cart, &customer(), "card")?;

        let ids: Vec<&str> = ledger.orders().iter().map(Order::id).collect();

        assert_eq!(ids, [second.id(), first.id()]);
        assert_eq!(ledger.len(), 2);

        Ok(())
    }

    #[test]
    fn order_ids_are_nine_uppercase_alphanumerics() -> TestResult {
        let mut ledger = OrderLedger::new();
        let cart = filled_cart()?;

        let order = ledger.place(&cart, &customer(), "pix")?;

        assert_eq!(order.id().chars().count(), 9);
        assert!(
            order
                .id()
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
            "unexpected order id {}",
            order.id()
        );

        Ok(())
    }

    #[test]
    fn tracking_numbers_are_unique_within_a_ledger() -> TestResult {
        let mut ledger = OrderLedger::new();
        let cart = filled_cart()?;

        let first = ledger.place(&cart, &customer(), "pix")?;
        let second = ledger.place(&cart, &customer(), "pix")?;

        assert!(first.tracking_number().starts_with("ITZ"));
        assert_ne!(first.tracking_number(), second.tracking_number());

        Ok(())
    }

    #[test]
    fn write_summary_renders_lines_and_totals() -> TestResult {
        let mut ledger = OrderLedger::new();
        let cart = filled_cart()?;

        let order = ledger.place(&cart, &customer(), "pix")?;

        let mut rendered = Vec::new();
        order.write_summary(&mut rendered)?;

        let text = String::from_utf8(rendered)?;

        assert!(text.contains("Produto a"), "missing line item in {text}");
        assert!(text.contains(order.id()), "missing order id in {text}");
        assert!(text.contains("pix"), "missing payment method in {text}");

        Ok(())
    }
}
