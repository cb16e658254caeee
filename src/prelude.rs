//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{Basket, BasketError, CartLine},
    catalog::{ALL_CATEGORIES, Catalog, CatalogError, Category},
    pricing::{PricingError, format_price},
    products::{Product, ProductId},
    summary::{SummaryError, write_cart, write_wishlist},
    views::{
        CategoryConstraint, SearchTerm, ViewStats, aggregate_stats, filter, filter_category,
        results_label, search, search_preview,
    },
};
