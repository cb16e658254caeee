//! Storefront
//!
//! Catalog, basket and wishlist engine for a static storefront: a fixed product catalog,
//! the filtered views each screen shows over it, and the per-session cart and liked set.

pub mod basket;
pub mod catalog;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod summary;
pub mod views;
