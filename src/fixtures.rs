//! Fixtures
//!
//! YAML-backed seed catalogs for demos and tests. A fixture directory holds
//! `catalog/<name>.yml` files; each file is an ordered product list whose
//! order is the catalog's display order.

use std::{fs, path::PathBuf};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{BRL, Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use thiserror::Error;

use crate::{
    catalog::CatalogError,
    products::{Condition, Product, ProductId},
    storefront::Storefront,
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Rating outside the 0–5 range
    #[error("Rating out of range: {0}")]
    InvalidRating(String),

    /// Two products in one fixture share an id
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products in the fixture, so a storefront currency cannot be chosen
    #[error("Fixture contains no products")]
    NoProducts,

    /// Catalog construction error
    #[error("Failed to build catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Wrapper for a catalog in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Products in display order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Stable product id, unique within the fixture
    pub id: String,

    /// Listing title
    pub title: String,

    /// Product price (e.g., "129.90 BRL")
    pub price: String,

    /// Long-form description
    #[serde(default)]
    pub description: String,

    /// Category label
    pub category: String,

    /// Image URI; a seeded placeholder is derived from the id when absent
    #[serde(default)]
    pub image: Option<String>,

    /// Average review rating, 0 to 5
    #[serde(default = "default_rating")]
    pub rating: Decimal,

    /// Number of reviews behind the rating
    #[serde(default)]
    pub reviews_count: u32,

    /// New or used
    pub condition: Condition,

    /// Included in the flash-deals rail
    #[serde(default)]
    pub flash_deal: bool,

    /// Ships free within the marketplace's city
    #[serde(default)]
    pub free_shipping: bool,

    /// Fulfilled end-to-end by the marketplace
    #[serde(default)]
    pub full_delivery: bool,

    /// Owning seller, when the product is a seller listing
    #[serde(default)]
    pub seller_id: Option<String>,
}

fn default_rating() -> Decimal {
    Decimal::from(5)
}

impl TryFrom<ProductFixture> for Product {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;

        if fixture.rating < Decimal::ZERO || fixture.rating > Decimal::from(5) {
            return Err(FixtureError::InvalidRating(fixture.rating.to_string()));
        }

        let image = fixture.image.unwrap_or_else(|| {
            let id = &fixture.id;
            format!("https://picsum.photos/seed/{id}/400/400")
        });

        Ok(Product {
            id: ProductId::from_raw(fixture.id),
            title: fixture.title,
            price: Money::from_minor(minor_units, currency),
            description: fixture.description,
            category: fixture.category,
            image,
            rating: fixture.rating,
            reviews_count: fixture.reviews_count,
            condition: fixture.condition,
            flash_deal: fixture.flash_deal,
            free_shipping: fixture.free_shipping,
            full_delivery: fixture.full_delivery,
            seller_id: fixture.seller_id,
        })
    }
}

/// Parse price string (e.g., "2.99 BRL") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "BRL" => BRL,
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl Fixture {
    /// Create a fixture loader with the default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a fixture loader with a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Load a seed catalog from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a product
    /// id repeats, or if products mix currencies.
    pub fn load_catalog(&self, name: &str) -> Result<Vec<Product>, FixtureError> {
        let file_path = self.base_path.join("catalog").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CatalogFixture = serde_norway::from_str(&contents)?;

        let mut seen: FxHashMap<String, usize> = FxHashMap::default();
        let mut currency: Option<&'static Currency> = None;
        let mut products = Vec::with_capacity(fixture.products.len());

        for (idx, product_fixture) in fixture.products.into_iter().enumerate() {
            if seen.insert(product_fixture.id.clone(), idx).is_some() {
                return Err(FixtureError::DuplicateProduct(product_fixture.id));
            }

            let product: Product = product_fixture.try_into()?;
            let product_currency = product.price.currency();

            if let Some(existing) = currency {
                if existing != product_currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        product_currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                currency = Some(product_currency);
            }

            products.push(product);
        }

        Ok(products)
    }

    /// Build a storefront seeded from a catalog fixture
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or is empty.
    pub fn storefront(&self, name: &str) -> Result<Storefront, FixtureError> {
        let products = self.load_catalog(name)?;

        let currency = products
            .first()
            .map(|product| product.price.currency())
            .ok_or(FixtureError::NoProducts)?;

        Ok(Storefront::with_catalog(products, currency)?)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
