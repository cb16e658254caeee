//! Summary
//!
//! Text rendering of the cart and wishlist panels.

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    basket::{Basket, BasketError},
    pricing::{PricingError, format_price},
    products::Product,
    views::ViewStats,
};

/// Errors that can occur when writing a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Error calculating basket totals.
    #[error(transparent)]
    Basket(#[from] BasketError),

    /// Error calculating line totals.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Write the cart panel: one row per distinct product, then the total.
///
/// # Errors
///
/// Returns an error if totals cannot be calculated or the output cannot be written.
pub fn write_cart(mut out: impl io::Write, basket: &Basket<'_>) -> Result<(), SummaryError> {
    writeln!(out, "Cart ({})", basket.cart_item_count()).map_err(|_err| SummaryError::IO)?;

    if basket.cart_is_empty() {
        return writeln!(out, "Your cart is empty").map_err(|_err| SummaryError::IO);
    }

    let mut builder = Builder::default();

    builder.push_record(["#", "Item", "Qty", "Price", "Line Total"]);

    for line in basket.unique_cart_items() {
        builder.push_record([
            line.product.id.to_string(),
            line.product.name.clone(),
            line.quantity.to_string(),
            format_price(&line.product.price),
            format_price(&line.line_total()?),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..5), Alignment::right());

    writeln!(out, "{table}").map_err(|_err| SummaryError::IO)?;

    writeln!(out, "Total: {}", format_price(&basket.cart_total()?))
        .map_err(|_err| SummaryError::IO)
}

/// Write the wishlist panel in the order products were liked.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_wishlist(mut out: impl io::Write, basket: &Basket<'_>) -> Result<(), SummaryError> {
    writeln!(out, "Liked ({})", basket.liked_count()).map_err(|_err| SummaryError::IO)?;

    if basket.liked_is_empty() {
        return writeln!(out, "No liked items yet").map_err(|_err| SummaryError::IO);
    }

    let liked = basket.liked_items();

    write_product_table(&mut out, &liked, |_product| "♥".to_string())
}

/// Write a product listing with badges, prices and ratings.
///
/// `marker` supplies the first column, e.g. a liked indicator.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_product_table(
    out: &mut impl io::Write,
    products: &[&Product],
    marker: impl Fn(&Product) -> String,
) -> Result<(), SummaryError> {
    let mut builder = Builder::default();

    builder.push_record(["", "#", "Item", "Category", "Price", "Was", "Rating", "Badges"]);

    for product in products {
        builder.push_record([
            marker(product),
            product.id.to_string(),
            product.name.clone(),
            product.category.clone(),
            format_price(&product.price),
            product
                .original_price
                .as_ref()
                .map(format_price)
                .unwrap_or_default(),
            format!("{:.1} ({})", product.rating, product.reviews),
            badges(product),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(4..7), Alignment::right());

    writeln!(out, "{table}").map_err(|_err| SummaryError::IO)
}

/// Write the statistics strip shown under category and search results.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_stats(out: &mut impl io::Write, stats: &ViewStats) -> Result<(), SummaryError> {
    writeln!(
        out,
        "Products: {}  Reviews: {}  Categories: {}  Avg rating: {}",
        stats.count,
        stats.total_reviews,
        stats.distinct_category_count,
        stats.average_rating_display()
    )
    .map_err(|_err| SummaryError::IO)
}

fn badges(product: &Product) -> String {
    let mut badges = Vec::new();

    if product.shows_new_badge() {
        badges.push("NEW".to_string());
    }

    if product.shows_sale_badge() {
        badges.push(
            product
                .discount_percentage()
                .map_or_else(|| "SALE".to_string(), |percent| format!("SALE -{percent}%")),
        );
    }

    badges.join(" ")
}
