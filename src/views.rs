//! Views
//!
//! Pure filters producing the product lists shown by each screen, and the statistics
//! shown alongside them. Every function here is total: no inputs make them fail, and
//! the input order of products is always preserved.
//!
//! The screens match differently:
//!
//! - home: category constraint AND name match
//! - category page: one fixed category AND name match
//! - search page: name OR category match, with no category constraint

use rust_decimal::{Decimal, RoundingStrategy};
use rustc_hash::FxHashSet;

use crate::{catalog::ALL_CATEGORIES, products::Product};

/// Number of results shown in the home page search dropdown.
pub const SEARCH_PREVIEW_LIMIT: usize = 5;

/// Category constraint applied by the home view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryConstraint<'a> {
    /// Matches every product
    All,

    /// Matches products in exactly this category
    Only(&'a str),
}

impl<'a> CategoryConstraint<'a> {
    /// Interpret a category selector, treating [`ALL_CATEGORIES`] as the sentinel.
    pub fn parse(value: &'a str) -> Self {
        if value == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Only(value)
        }
    }

    /// Whether `product` satisfies the constraint.
    pub fn admits(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => product.category == *category,
        }
    }
}

/// Case-insensitive substring matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    needle: String,
}

impl SearchTerm {
    /// Create a matcher for `term`.
    pub fn new(term: &str) -> Self {
        Self {
            needle: term.to_lowercase(),
        }
    }

    /// Whether the term is empty and so matches everything.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Whether `haystack` contains the term, ignoring case.
    pub fn matches(&self, haystack: &str) -> bool {
        self.is_empty() || haystack.to_lowercase().contains(&self.needle)
    }
}

/// Home view: products admitted by `constraint` whose name contains `term`.
pub fn filter<'p>(
    products: &'p [Product],
    constraint: CategoryConstraint<'_>,
    term: &str,
) -> Vec<&'p Product> {
    let term = SearchTerm::new(term);

    products
        .iter()
        .filter(|product| constraint.admits(product) && term.matches(&product.name))
        .collect()
}

/// Category page: products in `category` whose name contains `term`.
pub fn filter_category<'p>(products: &'p [Product], category: &str, term: &str) -> Vec<&'p Product> {
    let term = SearchTerm::new(term);

    products
        .iter()
        .filter(|product| product.category == category && term.matches(&product.name))
        .collect()
}

/// Search page: products whose name or category contains `term`.
pub fn search<'p>(products: &'p [Product], term: &str) -> Vec<&'p Product> {
    let term = SearchTerm::new(term);

    products
        .iter()
        .filter(|product| term.matches(&product.name) || term.matches(&product.category))
        .collect()
}

/// Home page search dropdown: the first few results of the home view under `constraint`.
///
/// Empty while nothing has been typed.
pub fn search_preview<'p>(
    products: &'p [Product],
    constraint: CategoryConstraint<'_>,
    term: &str,
) -> Vec<&'p Product> {
    if term.is_empty() {
        return Vec::new();
    }

    let mut results = filter(products, constraint, term);
    results.truncate(SEARCH_PREVIEW_LIMIT);

    results
}

/// Search page heading, e.g. `3 results for "lamp"`.
pub fn results_label(count: usize, term: &str) -> String {
    let plural = if count == 1 { "" } else { "s" };

    format!("{count} result{plural} for \"{term}\"")
}

/// Statistics over a filtered product list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewStats {
    /// Number of products
    pub count: usize,

    /// Sum of review counts
    pub total_reviews: u64,

    /// Mean rating rounded to one decimal place, zero for no products
    pub average_rating: Decimal,

    /// Number of distinct categories
    pub distinct_category_count: usize,
}

impl ViewStats {
    /// Average rating formatted with one decimal place, e.g. `4.7`.
    pub fn average_rating_display(&self) -> String {
        format!("{:.1}", self.average_rating)
    }
}

/// Compute [`ViewStats`] over `products`.
pub fn aggregate_stats<'p>(products: impl IntoIterator<Item = &'p Product>) -> ViewStats {
    let mut count = 0usize;
    let mut total_reviews = 0u64;
    let mut rating_sum = Decimal::ZERO;
    let mut categories = FxHashSet::default();

    for product in products {
        count += 1;
        total_reviews += u64::from(product.reviews);
        rating_sum = rating_sum.saturating_add(product.rating);
        categories.insert(product.category.as_str());
    }

    let average_rating = if count == 0 {
        Decimal::ZERO
    } else {
        (rating_sum / Decimal::from(count))
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    };

    ViewStats {
        count,
        total_reviews,
        average_rating,
        distinct_category_count: categories.len(),
    }
}
