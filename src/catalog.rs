//! Catalog
//!
//! The static seed catalog plus the search predicate shared by every
//! product-browsing view.

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::products::{Product, ProductId};

/// Errors related to catalog construction.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A product's currency differs from the catalog currency (index, product currency, catalog currency).
    #[error("Product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),
}

/// The static seed catalog. Seller listings are layered on top of this by the
/// storefront; the seed itself never changes after construction.
#[derive(Debug)]
pub struct Catalog {
    products: Vec<Product>,
    currency: &'static Currency,
}

impl Catalog {
    /// Create an empty catalog with the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Catalog {
            products: Vec::new(),
            currency,
        }
    }

    /// Create a catalog with the given seed products.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if any product is priced in a currency
    /// other than the catalog currency.
    pub fn with_products(
        products: impl Into<Vec<Product>>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let products = products.into();

        products.iter().enumerate().try_for_each(|(i, product)| {
            let product_currency = product.price.currency();
            if product_currency == currency {
                Ok(())
            } else {
                Err(CatalogError::CurrencyMismatch(
                    i,
                    product_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ))
            }
        })?;

        Ok(Catalog { products, currency })
    }

    /// The seed products in display order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a seed product by id.
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Get the number of seed products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Get the currency of the catalog.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

/// Case-insensitive substring match against a product's title or category.
///
/// The empty query matches every product.
#[must_use]
pub fn matches_query(product: &Product, query: &str) -> bool {
    let needle = query.to_lowercase();

    product.title.to_lowercase().contains(&needle)
        || product.category.to_lowercase().contains(&needle)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::{
        Money,
        iso::{self, BRL},
    };
    use testresult::TestResult;

    use crate::products::{Condition, ProductId};

    use super::*;

    fn product(id: &str, title: &str, category: &str, minor: i64) -> Product {
        Product {
            id: ProductId::from_raw(id),
            title: title.to_string(),
            price: Money::from_minor(minor, BRL),
            description: String::new(),
            category: category.to_string(),
            image: String::new(),
            rating: Decimal::from(4),
            reviews_count: 10,
            condition: Condition::New,
            flash_deal: false,
            free_shipping: false,
            full_delivery: false,
            seller_id: None,
        }
    }

    #[test]
    fn with_products_same_currency_succeeds() -> TestResult {
        let catalog = Catalog::with_products(
            [
                product("a", "Tênis de corrida", "Calçados", 19_990),
                product("b", "Notebook", "Informática", 349_900),
            ],
            BRL,
        )?;

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.currency(), BRL);
        assert!(!catalog.is_empty());

        Ok(())
    }

    #[test]
    fn with_products_currency_mismatch_errors() {
        let mut foreign = product("b", "Imported watch", "Relógios", 50_000);
        foreign.price = Money::from_minor(50_000, iso::USD);

        let result = Catalog::with_products(
            [product("a", "Tênis", "Calçados", 19_990), foreign],
            BRL,
        );

        match result {
            Err(CatalogError::CurrencyMismatch(idx, product_currency, catalog_currency)) => {
                assert_eq!(idx, 1);
                assert_eq!(product_currency, iso::USD.iso_alpha_code);
                assert_eq!(catalog_currency, BRL.iso_alpha_code);
            }
            other => panic!("expected CurrencyMismatch error, got {other:?}"),
        }
    }

    #[test]
    fn find_returns_matching_product() -> TestResult {
        let catalog = Catalog::with_products([product("a", "Tênis", "Calçados", 19_990)], BRL)?;

        assert!(catalog.find(&ProductId::from_raw("a")).is_some());
        assert!(catalog.find(&ProductId::from_raw("zz")).is_none());

        Ok(())
    }

    #[test]
    fn query_matches_title_case_insensitively() {
        let shoes = product("a", "Tênis Corrida Masculino", "Calçados", 19_990);

        assert!(matches_query(&shoes, "tênis"));
        assert!(matches_query(&shoes, "CORRIDA"));
        assert!(!matches_query(&shoes, "notebook"));
    }

    #[test]
    fn query_matches_category() {
        let shoes = product("a", "Air Max 42", "Calçados", 19_990);

        assert!(matches_query(&shoes, "calçados"));
    }

    #[test]
    fn empty_query_matches_everything() {
        let shoes = product("a", "Tênis", "Calçados", 19_990);

        assert!(matches_query(&shoes, ""));
    }
}
