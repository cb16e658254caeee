//! Basket
//!
//! Session state for one shopper: the cart, a multiset of products where every add
//! appends one occurrence, and the liked set, a wishlist holding each product at most
//! once. Everything else (unique lines, quantities, totals, counts) is derived from
//! those two collections on every call.

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::Catalog,
    pricing::{PricingError, line_total, total_price},
    products::{Product, ProductId},
};

/// Errors related to basket mutations or totals.
#[derive(Debug, Error, PartialEq)]
pub enum BasketError {
    /// The product id is not in the catalog.
    #[error("Product {0} is not in the catalog")]
    InvalidProduct(ProductId),

    /// The product is not in the liked set.
    #[error("Product {0} is not liked")]
    NotLiked(ProductId),

    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// One distinct product in the cart and how many times it was added.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartLine<'a> {
    /// The product
    pub product: &'a Product,

    /// Occurrences of the product in the cart, at least one
    pub quantity: usize,
}

impl CartLine<'_> {
    /// Price of every occurrence of this line.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the total overflows.
    pub fn line_total(&self) -> Result<Money<'static, Currency>, PricingError> {
        line_total(self.product.price, self.quantity)
    }
}

/// Basket
#[derive(Debug, Clone)]
pub struct Basket<'a> {
    catalog: &'a Catalog,
    cart: Vec<&'a Product>,
    liked: Vec<&'a Product>,
}

impl<'a> Basket<'a> {
    /// Create an empty basket for a session browsing `catalog`.
    pub fn new(catalog: &'a Catalog) -> Self {
        Basket {
            catalog,
            cart: Vec::new(),
            liked: Vec::new(),
        }
    }

    /// The catalog this basket draws products from.
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Add one occurrence of a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::InvalidProduct`] if the id is not in the catalog.
    pub fn add_to_cart(&mut self, id: ProductId) -> Result<(), BasketError> {
        let product = self.product(id)?;

        self.cart.push(product);

        debug!(product = %id, items = self.cart.len(), "added to cart");

        Ok(())
    }

    /// Remove one occurrence of a product from the cart.
    ///
    /// Returns whether an occurrence was removed; removing an absent product does nothing.
    pub fn remove_one_from_cart(&mut self, id: ProductId) -> bool {
        let Some(position) = self.cart.iter().rposition(|product| product.id == id) else {
            return false;
        };

        self.cart.remove(position);

        debug!(product = %id, items = self.cart.len(), "removed from cart");

        true
    }

    /// Like a product if it isn't liked, otherwise unlike it.
    ///
    /// Returns whether the product is liked afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::InvalidProduct`] if liking an id that is not in the catalog.
    pub fn toggle_like(&mut self, id: ProductId) -> Result<bool, BasketError> {
        if self.remove_from_liked(id) {
            return Ok(false);
        }

        let product = self.product(id)?;

        self.liked.push(product);

        debug!(product = %id, liked = self.liked.len(), "liked");

        Ok(true)
    }

    /// Remove a product from the liked set.
    ///
    /// Returns whether it was liked; removing an unliked product does nothing.
    pub fn remove_from_liked(&mut self, id: ProductId) -> bool {
        let before = self.liked.len();

        self.liked.retain(|product| product.id != id);

        let removed = self.liked.len() != before;

        if removed {
            debug!(product = %id, liked = self.liked.len(), "unliked");
        }

        removed
    }

    /// Add one occurrence of a liked product to the cart, keeping it liked.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::NotLiked`] if the product is not liked.
    pub fn move_liked_to_cart(&mut self, id: ProductId) -> Result<(), BasketError> {
        if !self.is_liked(id) {
            return Err(BasketError::NotLiked(id));
        }

        self.add_to_cart(id)
    }

    /// Distinct cart products with their quantities, in the order each was first added.
    pub fn unique_cart_items(&self) -> Vec<CartLine<'a>> {
        let mut lines: Vec<CartLine<'a>> = Vec::new();
        let mut positions: FxHashMap<ProductId, usize> = FxHashMap::default();

        for &product in &self.cart {
            if let Some(line) = positions
                .get(&product.id)
                .and_then(|&position| lines.get_mut(position))
            {
                line.quantity += 1;
            } else {
                positions.insert(product.id, lines.len());
                lines.push(CartLine {
                    product,
                    quantity: 1,
                });
            }
        }

        lines
    }

    /// Sum of prices over every occurrence in the cart; zero when empty.
    ///
    /// # Errors
    ///
    /// Returns a [`BasketError::Pricing`] if there was a money arithmetic error.
    pub fn cart_total(&self) -> Result<Money<'static, Currency>, BasketError> {
        Ok(total_price(
            self.cart.iter().copied(),
            self.catalog.currency(),
        )?)
    }

    /// Total occurrences in the cart, as shown on the cart badge.
    pub fn cart_item_count(&self) -> usize {
        self.cart.len()
    }

    /// Occurrences of one product in the cart.
    pub fn quantity_of(&self, id: ProductId) -> usize {
        self.cart.iter().filter(|product| product.id == id).count()
    }

    /// Whether the cart is empty.
    pub fn cart_is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Whether a product is liked.
    pub fn is_liked(&self, id: ProductId) -> bool {
        self.liked.iter().any(|product| product.id == id)
    }

    /// Liked products, in the order they were liked.
    pub fn liked_items(&self) -> Vec<&'a Product> {
        self.liked.clone()
    }

    /// Number of liked products.
    pub fn liked_count(&self) -> usize {
        self.liked.len()
    }

    /// Whether nothing is liked.
    pub fn liked_is_empty(&self) -> bool {
        self.liked.is_empty()
    }

    fn product(&self, id: ProductId) -> Result<&'a Product, BasketError> {
        self.catalog
            .by_id(id)
            .map_err(|_err| BasketError::InvalidProduct(id))
    }
}
