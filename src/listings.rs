//! Listings
//!
//! Seller-created products. Creation validates required fields explicitly,
//! surfacing a [`ListingError`] instead of silently dropping the form, and
//! prepends the new product so the seller's latest listing is shown first.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::info;

use crate::{
    products::{Condition, Product, ProductId},
    session::User,
};

/// Image used when a listing is submitted without a photo.
const PLACEHOLDER_IMAGE: &str = "https://picsum.photos/seed/placeholder/400/400";

/// Errors related to listing creation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListingError {
    /// A listing requires a non-blank title.
    #[error("A listing requires a title")]
    MissingTitle,

    /// A listing requires a price.
    #[error("A listing requires a price")]
    MissingPrice,

    /// The price could not be parsed as a non-negative decimal amount.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),
}

/// Fields submitted by the new-listing form.
#[derive(Debug, Clone, Default)]
pub struct ListingForm {
    /// Listing title. Required.
    pub title: String,

    /// Price as typed into the form, e.g. `"9.99"`. Required.
    pub price: String,

    /// Long-form description.
    pub description: String,

    /// Category label.
    pub category: String,

    /// New or used.
    pub condition: Condition,

    /// Whether the seller offers free local shipping.
    pub free_shipping: bool,

    /// Uploaded image URI, if any.
    pub image: Option<String>,
}

/// The seller's own listings, most recent first.
#[derive(Debug)]
pub struct ListingManager {
    own: Vec<Product>,
    currency: &'static Currency,
}

impl ListingManager {
    /// Create an empty listing set priced in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        ListingManager {
            own: Vec::new(),
            currency,
        }
    }

    /// Validate a listing form and prepend the resulting product.
    ///
    /// Defaults for fields the form does not carry: rating 5, zero reviews,
    /// no flash deal, no full delivery, placeholder image.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::MissingTitle`] or [`ListingError::MissingPrice`]
    /// for blank required fields, and [`ListingError::InvalidPrice`] when the
    /// price does not parse as a non-negative decimal amount. The listing set
    /// is left unchanged on error.
    pub fn create(
        &mut self,
        form: ListingForm,
        seller: Option<&User>,
    ) -> Result<ProductId, ListingError> {
        let title = form.title.trim();
        if title.is_empty() {
            return Err(ListingError::MissingTitle);
        }

        let raw_price = form.price.trim();
        if raw_price.is_empty() {
            return Err(ListingError::MissingPrice);
        }

        let minor_units = parse_amount(raw_price)?;

        let product = Product {
            id: ProductId::generate(),
            title: title.to_string(),
            price: Money::from_minor(minor_units, self.currency),
            description: form.description,
            category: form.category,
            image: form.image.unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            rating: Decimal::from(5),
            reviews_count: 0,
            condition: form.condition,
            flash_deal: false,
            free_shipping: form.free_shipping,
            full_delivery: false,
            seller_id: seller.map(|user| user.id.clone()),
        };

        info!(product_id = %product.id, title = %product.title, "listing created");

        let id = product.id.clone();
        self.own.insert(0, product);

        Ok(id)
    }

    /// The seller's listings, most recent first.
    pub fn listings(&self) -> &[Product] {
        &self.own
    }

    /// Look up a listing by id.
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.own.iter().find(|product| &product.id == id)
    }

    /// Get the number of listings.
    pub fn len(&self) -> usize {
        self.own.len()
    }

    /// Check if there are no listings.
    pub fn is_empty(&self) -> bool {
        self.own.is_empty()
    }
}

/// Parse a bare decimal amount (e.g. `"9.99"`) into minor units.
fn parse_amount(raw: &str) -> Result<i64, ListingError> {
    let amount = raw
        .parse::<Decimal>()
        .map_err(|_err| ListingError::InvalidPrice(raw.to_string()))?;

    if amount.is_sign_negative() {
        return Err(ListingError::InvalidPrice(raw.to_string()));
    }

    amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| ListingError::InvalidPrice(raw.to_string()))
}
