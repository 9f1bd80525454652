//! Products

use std::fmt;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique, opaque product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Generate a fresh unique id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing raw id (seed data, fixtures).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw string form of the id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a product is sold new or second-hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// Brand new.
    #[default]
    New,

    /// Second-hand.
    Used,
}

impl Condition {
    /// Lowercase label used in fixtures and display.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::Used => "used",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog record. Immutable once created; seller-created products are
/// prepended to the catalog view, never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier.
    pub id: ProductId,

    /// Listing title.
    pub title: String,

    /// Unit price.
    pub price: Money<'static, Currency>,

    /// Long-form description.
    pub description: String,

    /// Category label used for browsing and search.
    pub category: String,

    /// Image URI.
    pub image: String,

    /// Average review rating, 0 to 5.
    pub rating: Decimal,

    /// Number of reviews behind the rating.
    pub reviews_count: u32,

    /// New or used.
    pub condition: Condition,

    /// Included in the flash-deals rail.
    pub flash_deal: bool,

    /// Ships free within the marketplace's city.
    pub free_shipping: bool,

    /// Fulfilled end-to-end by the marketplace.
    pub full_delivery: bool,

    /// Owning seller, when the product is a seller listing.
    pub seller_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let first = ProductId::generate();
        let second = ProductId::generate();

        assert_ne!(first, second);
    }

    #[test]
    fn from_raw_round_trips() {
        let id = ProductId::from_raw("seed-01");

        assert_eq!(id.as_str(), "seed-01");
        assert_eq!(id.to_string(), "seed-01");
    }

    #[test]
    fn condition_labels() {
        assert_eq!(Condition::New.as_str(), "new");
        assert_eq!(Condition::Used.to_string(), "used");
    }
}
