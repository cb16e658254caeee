//! Prices

use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::products::Product;

/// Errors that can occur while calculating totals.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// A line total does not fit in minor units.
    #[error("line total overflows: {quantity} x {unit_minor}")]
    Overflow {
        /// Price of one unit in minor units
        unit_minor: i64,

        /// Number of units
        quantity: usize,
    },
}

/// Sum the prices of `products`, counting repeated products once per occurrence.
///
/// Returns zero in `currency` when there are no products.
///
/// # Errors
///
/// - [`PricingError::Money`]: a price is in a different currency.
pub fn total_price<'a>(
    products: impl IntoIterator<Item = &'a Product>,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let total = products
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, product| {
            acc.add(product.price)
        })?;

    Ok(total)
}

/// Price of `quantity` units at `unit`.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: the total does not fit in minor units.
pub fn line_total(
    unit: Money<'static, Currency>,
    quantity: usize,
) -> Result<Money<'static, Currency>, PricingError> {
    let unit_minor = unit.to_minor_units();

    let total = i64::try_from(quantity)
        .ok()
        .and_then(|quantity| unit_minor.checked_mul(quantity))
        .ok_or(PricingError::Overflow {
            unit_minor,
            quantity,
        })?;

    Ok(Money::from_minor(total, unit.currency()))
}

/// Format a price for display, e.g. `$89.00`.
///
/// Currencies without a known symbol fall back to a trailing ISO code, e.g. `12.50 CHF`.
pub fn format_price(price: &Money<'_, Currency>) -> String {
    let currency = price.currency();
    let amount = Decimal::new(price.to_minor_units(), currency.exponent);
    let places = usize::try_from(currency.exponent).unwrap_or_default();

    let symbol = match currency.iso_alpha_code {
        "GBP" => Some("£"),
        "USD" => Some("$"),
        "EUR" => Some("€"),
        _ => None,
    };

    match symbol {
        Some(symbol) if amount.is_sign_negative() => format!("-{symbol}{:.places$}", amount.abs()),
        Some(symbol) => format!("{symbol}{amount:.places$}"),
        None => format!("{amount:.places$} {}", currency.iso_alpha_code),
    }
}
