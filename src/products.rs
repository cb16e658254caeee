//! Products

use std::{fmt, num::NonZeroU32, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::catalog::CatalogError;

/// Product identifier, unique across a catalog and always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "u32")]
pub struct ProductId(NonZeroU32);

impl ProductId {
    /// Returns the raw identifier value.
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for ProductId {
    type Error = CatalogError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        NonZeroU32::new(value)
            .map(ProductId)
            .ok_or(CatalogError::InvalidProductId(value))
    }
}

impl FromStr for ProductId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u32>()
            .map_err(|_err| CatalogError::UnparseableProductId(s.to_string()))?;

        Self::try_from(value)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product price
    pub price: Money<'static, Currency>,

    /// Price before any sale discount, never below `price`
    pub original_price: Option<Money<'static, Currency>>,

    /// Category name, one of the owning catalog's categories
    pub category: String,

    /// Average customer rating in `[0, 5]`
    pub rating: Decimal,

    /// Number of customer reviews
    pub reviews: u32,

    /// "New" flag; unset renders the same as `false`
    pub is_new: Option<bool>,

    /// "Sale" flag; unset renders the same as `false`
    pub is_sale: Option<bool>,

    /// Image URL for the rendering layer
    pub image: Option<String>,
}

impl Product {
    /// Create a product with no rating, reviews, flags, image or original price.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Money<'static, Currency>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            original_price: None,
            category: category.into(),
            rating: Decimal::ZERO,
            reviews: 0,
            is_new: None,
            is_sale: None,
            image: None,
        }
    }

    /// Set the rating.
    #[must_use]
    pub fn with_rating(mut self, rating: Decimal) -> Self {
        self.rating = rating;
        self
    }

    /// Set the review count.
    #[must_use]
    pub fn with_reviews(mut self, reviews: u32) -> Self {
        self.reviews = reviews;
        self
    }

    /// Set the pre-discount price.
    #[must_use]
    pub fn with_original_price(mut self, original_price: Money<'static, Currency>) -> Self {
        self.original_price = Some(original_price);
        self
    }

    /// Whether the "new" badge should be shown.
    pub fn shows_new_badge(&self) -> bool {
        self.is_new.unwrap_or(false)
    }

    /// Whether the "sale" badge should be shown.
    pub fn shows_sale_badge(&self) -> bool {
        self.is_sale.unwrap_or(false)
    }

    /// Amount saved against the original price, if there is one.
    pub fn savings(&self) -> Option<Money<'static, Currency>> {
        let original = self.original_price?;
        let minor = original
            .to_minor_units()
            .checked_sub(self.price.to_minor_units())?;

        Some(Money::from_minor(minor, self.price.currency()))
    }

    /// Savings as a whole-number percentage of the original price.
    pub fn discount_percentage(&self) -> Option<Decimal> {
        let original = self.original_price?.to_minor_units();

        if original <= 0 {
            return None;
        }

        let savings = Decimal::from(self.savings()?.to_minor_units());
        let percent = savings.checked_mul(Decimal::ONE_HUNDRED)? / Decimal::from(original);

        Some(percent.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn product_id_rejects_zero() {
        assert!(matches!(
            ProductId::try_from(0),
            Err(CatalogError::InvalidProductId(0))
        ));
    }

    #[test]
    fn product_id_parses_from_str() -> TestResult {
        let id: ProductId = " 12 ".parse()?;

        assert_eq!(id.get(), 12);
        assert_eq!(id.to_string(), "12");

        Ok(())
    }

    #[test]
    fn product_id_rejects_non_numeric_str() {
        assert!(matches!(
            "abc".parse::<ProductId>(),
            Err(CatalogError::UnparseableProductId(value)) if value == "abc"
        ));
    }

    #[test]
    fn unset_flags_render_off() -> TestResult {
        let product = Product::new(
            ProductId::try_from(1)?,
            "Ionic Hair Dryer",
            Money::from_minor(14_900, USD),
            "Dryers",
        );

        assert!(!product.shows_new_badge());
        assert!(!product.shows_sale_badge());
        assert_eq!(product.is_new, None);

        Ok(())
    }

    #[test]
    fn savings_and_discount_from_original_price() -> TestResult {
        let product = Product::new(
            ProductId::try_from(1)?,
            "Professional Hair Trimmer",
            Money::from_minor(8_900, USD),
            "Trimmers",
        )
        .with_original_price(Money::from_minor(12_900, USD));

        assert_eq!(product.savings(), Some(Money::from_minor(4_000, USD)));
        assert_eq!(product.discount_percentage(), Some(Decimal::from(31)));

        Ok(())
    }

    #[test]
    fn no_savings_without_original_price() -> TestResult {
        let product = Product::new(
            ProductId::try_from(4)?,
            "Remote Control Car",
            Money::from_minor(4_500, USD),
            "Toys",
        );

        assert_eq!(product.savings(), None);
        assert_eq!(product.discount_percentage(), None);

        Ok(())
    }
}
