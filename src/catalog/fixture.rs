//! Catalog Fixtures
//!
//! YAML representation of a catalog document and its conversion into [`Product`]s.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    catalog::CatalogError,
    products::{Product, ProductId},
};

/// Top-level catalog document
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Category vocabulary, in display order
    pub categories: Vec<CategoryFixture>,

    /// Products, in display order
    pub products: Vec<ProductFixture>,
}

/// Category Fixture
#[derive(Debug, Deserialize)]
pub struct CategoryFixture {
    /// Category name
    pub name: String,

    /// Marketing description shown on the category page
    #[serde(default)]
    pub description: Option<String>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product price (e.g., "89 USD")
    pub price: String,

    /// Pre-discount price (e.g., "129 USD")
    #[serde(default)]
    pub original_price: Option<String>,

    /// Image URL
    #[serde(default)]
    pub image: Option<String>,

    /// Rating in `[0, 5]`
    pub rating: f64,

    /// Review count
    #[serde(default)]
    pub reviews: u32,

    /// Category name
    pub category: String,

    /// "New" flag
    #[serde(default)]
    pub is_new: Option<bool>,

    /// "Sale" flag
    #[serde(default)]
    pub is_sale: Option<bool>,
}

impl TryFrom<ProductFixture> for Product {
    type Error = CatalogError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;
        let price = Money::from_minor(minor_units, currency);

        let original_price = fixture
            .original_price
            .as_deref()
            .map(parse_price)
            .transpose()?
            .map(|(minor, original_currency)| Money::from_minor(minor, original_currency));

        Ok(Product {
            id: fixture.id,
            name: fixture.name,
            price,
            original_price,
            category: fixture.category,
            rating: parse_rating(fixture.id, fixture.rating)?,
            reviews: fixture.reviews,
            is_new: fixture.is_new,
            is_sale: fixture.is_sale,
            image: fixture.image,
        })
    }
}

/// Parse price string (e.g., "29.99 USD") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal with at most as many places as
/// the currency's minor unit, or if the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), CatalogError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(CatalogError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency = match currency_code {
        "USD" => USD,
        "GBP" => GBP,
        "EUR" => EUR,
        other => return Err(CatalogError::UnknownCurrency(other.to_string())),
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| CatalogError::InvalidPrice(s.to_string()))?
        .normalize();

    if amount.is_sign_negative() || amount.scale() > currency.exponent {
        return Err(CatalogError::InvalidPrice(s.to_string()));
    }

    let minor_units = 10_i64
        .checked_pow(currency.exponent)
        .and_then(|factor| amount.checked_mul(Decimal::from(factor)))
        .and_then(|value| value.to_i64())
        .ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

fn parse_rating(id: ProductId, rating: f64) -> Result<Decimal, CatalogError> {
    rating
        .to_string()
        .parse::<Decimal>()
        .map_err(|_err| CatalogError::InvalidRating(id, rating.to_string()))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn fixture(id: u32) -> Result<ProductFixture, CatalogError> {
        Ok(ProductFixture {
            id: ProductId::try_from(id)?,
            name: "LED Desk Lamp".to_string(),
            price: "79 USD".to_string(),
            original_price: Some("99 USD".to_string()),
            image: None,
            rating: 4.6,
            reviews: 156,
            category: "Lamps".to_string(),
            is_new: None,
            is_sale: Some(true),
        })
    }

    #[test]
    fn parse_price_accepts_whole_and_fractional_amounts() -> TestResult {
        let (whole, currency) = parse_price("89 USD")?;
        let (fractional, _) = parse_price("29.99 USD")?;

        assert_eq!(whole, 8_900);
        assert_eq!(fractional, 2_999);
        assert_eq!(currency, USD);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_invalid_format() {
        assert!(matches!(
            parse_price("89USD"),
            Err(CatalogError::InvalidPrice(_))
        ));
        assert!(matches!(
            parse_price("89 USD extra"),
            Err(CatalogError::InvalidPrice(_))
        ));
    }

    #[test]
    fn parse_price_rejects_negative_amounts() {
        assert!(matches!(
            parse_price("-1 USD"),
            Err(CatalogError::InvalidPrice(_))
        ));
    }

    #[test]
    fn parse_price_rejects_sub_minor_unit_amounts() -> TestResult {
        assert!(matches!(
            parse_price("29.999 USD"),
            Err(CatalogError::InvalidPrice(_))
        ));

        let (trailing_zeros, _) = parse_price("29.9900 USD")?;
        assert_eq!(trailing_zeros, 2_999);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(CatalogError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn product_from_fixture() -> TestResult {
        let product = Product::try_from(fixture(3)?)?;

        assert_eq!(product.id.get(), 3);
        assert_eq!(product.price, Money::from_minor(7_900, USD));
        assert_eq!(product.original_price, Some(Money::from_minor(9_900, USD)));
        assert_eq!(product.rating, Decimal::new(46, 1));
        assert!(product.shows_sale_badge());
        assert!(!product.shows_new_badge());

        Ok(())
    }

    #[test]
    fn product_keeps_fractional_rating() -> TestResult {
        let mut fixture = fixture(3)?;
        fixture.rating = 4.25;

        assert_eq!(Product::try_from(fixture)?.rating, Decimal::new(425, 2));

        Ok(())
    }
}
