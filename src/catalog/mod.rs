//! Catalog
//!
//! The fixed product list and category vocabulary every view and basket reads from.
//! A catalog is validated once when it is built and never changes afterwards.

use std::{fs, path::Path};

use rust_decimal::Decimal;
use rustc_hash::{FxHashMap, FxHashSet};
use rusty_money::iso::Currency;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::info;

use crate::{
    catalog::fixture::CatalogFixture,
    products::{Product, ProductId},
    views::{self, CategoryConstraint},
};

pub mod fixture;

/// Sentinel category that matches every product.
pub const ALL_CATEGORIES: &str = "All";

/// Description used for categories without their own copy.
pub const DEFAULT_CATEGORY_DESCRIPTION: &str = "Discover our premium collection of products.";

/// Highest rating a product can carry.
pub const MAX_RATING: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

const BUILTIN_CATALOG: &str = include_str!("../../fixtures/catalog.yml");

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product has the requested id
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// IO error reading a catalog file
    #[error("Failed to read catalog file: {0}")]
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

    /// Currency mismatch between prices
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Product ids must be positive
    #[error("Invalid product id {0}; ids must be positive")]
    InvalidProductId(u32),

    /// Product id could not be parsed
    #[error("Invalid product id: {0:?}")]
    UnparseableProductId(String),

    /// Two products share an id
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    /// A category is listed twice, or uses the reserved sentinel name
    #[error("Duplicate or reserved category: {0}")]
    DuplicateCategory(String),

    /// A product references a category outside the vocabulary
    #[error("Product {0} has unknown category {1:?}")]
    UnknownCategory(ProductId, String),

    /// Rating outside `[0, 5]` or not a number
    #[error("Product {0} has invalid rating {1}")]
    InvalidRating(ProductId, String),

    /// Original price is lower than the selling price
    #[error("Product {0} has an original price below its price")]
    OriginalPriceBelowPrice(ProductId),

    /// No products were supplied, so the currency is unknown
    #[error("Catalog has no products; currency unknown")]
    Empty,
}

/// A category in the catalog vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Category name, as referenced by [`Product::category`]
    pub name: String,

    /// Category page description
    pub description: Option<String>,
}

impl Category {
    /// Create a category without a description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Route slug for the category page, e.g. `trimmers`.
    pub fn slug(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
    categories: SmallVec<[Category; 8]>,
    currency: &'static Currency,
}

impl Catalog {
    /// Build a catalog from a category vocabulary and products in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no products, if ids or categories are duplicated,
    /// if a product references an unknown category, if prices use more than one currency,
    /// if a rating is outside `[0, 5]`, or if an original price is below the price.
    pub fn new(
        categories: impl IntoIterator<Item = Category>,
        products: impl IntoIterator<Item = Product>,
    ) -> Result<Self, CatalogError> {
        let mut vocabulary: SmallVec<[Category; 8]> = SmallVec::new();
        let mut names = FxHashSet::default();

        for category in categories {
            if category.name == ALL_CATEGORIES || !names.insert(category.name.clone()) {
                return Err(CatalogError::DuplicateCategory(category.name));
            }

            vocabulary.push(category);
        }

        let products: Vec<Product> = products.into_iter().collect();
        let currency = products
            .first()
            .map(|product| product.price.currency())
            .ok_or(CatalogError::Empty)?;

        let mut index = FxHashMap::default();

        for (position, product) in products.iter().enumerate() {
            if product.price.currency() != currency {
                return Err(CatalogError::CurrencyMismatch(
                    currency.iso_alpha_code.to_string(),
                    product.price.currency().iso_alpha_code.to_string(),
                ));
            }

            if let Some(original) = &product.original_price {
                if original.currency() != currency {
                    return Err(CatalogError::CurrencyMismatch(
                        currency.iso_alpha_code.to_string(),
                        original.currency().iso_alpha_code.to_string(),
                    ));
                }

                if original.to_minor_units() < product.price.to_minor_units() {
                    return Err(CatalogError::OriginalPriceBelowPrice(product.id));
                }
            }

            if product.rating < Decimal::ZERO || product.rating > MAX_RATING {
                return Err(CatalogError::InvalidRating(
                    product.id,
                    product.rating.to_string(),
                ));
            }

            if !names.contains(&product.category) {
                return Err(CatalogError::UnknownCategory(
                    product.id,
                    product.category.clone(),
                ));
            }

            if index.insert(product.id, position).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id));
            }
        }

        Ok(Self {
            products,
            index,
            categories: vocabulary,
            currency,
        })
    }

    /// Parse a catalog from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be parsed or fails validation.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        let categories = fixture.categories.into_iter().map(|category| Category {
            name: category.name,
            description: category.description,
        });

        let products = fixture
            .products
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let catalog = Self::new(categories, products)?;

        info!(
            products = catalog.products.len(),
            categories = catalog.categories.len(),
            currency = catalog.currency.iso_alpha_code,
            "catalog loaded"
        );

        Ok(catalog)
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// The catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled document fails to parse, which indicates a broken build.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml(BUILTIN_CATALOG)
    }

    /// Every product, in catalog order.
    pub fn all_products(&self) -> &[Product] {
        &self.products
    }

    /// Category names with the [`ALL_CATEGORIES`] sentinel first.
    pub fn categories(&self) -> Vec<&str> {
        std::iter::once(ALL_CATEGORIES)
            .chain(self.categories.iter().map(|category| category.name.as_str()))
            .collect()
    }

    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no product has this id.
    pub fn by_id(&self, id: ProductId) -> Result<&Product, CatalogError> {
        self.index
            .get(&id)
            .and_then(|&position| self.products.get(position))
            .ok_or(CatalogError::NotFound(id))
    }

    /// Whether a product with this id exists.
    pub fn contains(&self, id: ProductId) -> bool {
        self.index.contains_key(&id)
    }

    /// Products in `category`, in catalog order. The sentinel returns everything.
    pub fn by_category(&self, category: &str) -> Vec<&Product> {
        views::filter(&self.products, CategoryConstraint::parse(category), "")
    }

    /// Products whose name or category contains `term`, ignoring case.
    pub fn matching(&self, term: &str) -> Vec<&Product> {
        views::search(&self.products, term)
    }

    /// Resolve a category page slug such as `trimmers` to its category name.
    pub fn category_from_slug(&self, slug: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|category| category.name.eq_ignore_ascii_case(slug.trim()))
            .map(|category| category.name.as_str())
    }

    /// Category page copy, falling back to [`DEFAULT_CATEGORY_DESCRIPTION`].
    pub fn category_description(&self, category: &str) -> &str {
        self.categories
            .iter()
            .find(|candidate| candidate.name == category)
            .and_then(|candidate| candidate.description.as_deref())
            .unwrap_or(DEFAULT_CATEGORY_DESCRIPTION)
    }

    /// Currency shared by every price in the catalog.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rusty_money::{
        Money,
        iso::{GBP, USD},
    };
    use testresult::TestResult;

    use super::*;

    fn product(id: u32, name: &str, category: &str) -> Result<Product, CatalogError> {
        Ok(Product::new(
            ProductId::try_from(id)?,
            name,
            Money::from_minor(1_000, USD),
            category,
        ))
    }

    #[test]
    fn builtin_catalog_loads_in_order() -> TestResult {
        let catalog = Catalog::builtin()?;

        let ids: Vec<u32> = catalog.all_products().iter().map(|p| p.id.get()).collect();

        assert_eq!(ids, (1..=12).collect::<Vec<_>>());
        assert_eq!(catalog.currency(), USD);

        Ok(())
    }

    #[test]
    fn categories_start_with_sentinel() -> TestResult {
        let catalog = Catalog::builtin()?;

        assert_eq!(
            catalog.categories(),
            vec!["All", "Trimmers", "Dryers", "Toys", "Lamps"]
        );

        Ok(())
    }

    #[test]
    fn by_id_finds_product() -> TestResult {
        let catalog = Catalog::builtin()?;

        let product = catalog.by_id(ProductId::try_from(9)?)?;

        assert_eq!(product.name, "Precision Nose Trimmer");
        assert_eq!(product.rating, Decimal::new(44, 1));

        Ok(())
    }

    #[test]
    fn by_id_missing_is_not_found() -> TestResult {
        let catalog = Catalog::builtin()?;

        let result = catalog.by_id(ProductId::try_from(99)?);

        assert!(matches!(result, Err(CatalogError::NotFound(id)) if id.get() == 99));

        Ok(())
    }

    #[test]
    fn by_category_and_sentinel() -> TestResult {
        let catalog = Catalog::builtin()?;

        let lamps: Vec<&str> = catalog
            .by_category("Lamps")
            .iter()
            .map(|p| p.name.as_str())
            .collect();

        assert_eq!(
            lamps,
            vec!["LED Desk Lamp", "Smart Floor Lamp", "RGB Gaming Lamp"]
        );
        assert_eq!(catalog.by_category(ALL_CATEGORIES).len(), catalog.len());

        Ok(())
    }

    #[test]
    fn category_slug_resolution() -> TestResult {
        let catalog = Catalog::builtin()?;

        assert_eq!(catalog.category_from_slug("trimmers"), Some("Trimmers"));
        assert_eq!(catalog.category_from_slug("DRYERS"), Some("Dryers"));
        assert_eq!(catalog.category_from_slug("all"), None);
        assert_eq!(catalog.category_from_slug("shoes"), None);

        Ok(())
    }

    #[test]
    fn category_description_falls_back() -> TestResult {
        let catalog = Catalog::builtin()?;

        assert_eq!(
            catalog.category_description("Toys"),
            "Fun and educational toys that spark creativity and imagination."
        );
        assert_eq!(
            catalog.category_description("Shoes"),
            DEFAULT_CATEGORY_DESCRIPTION
        );

        Ok(())
    }

    #[test]
    fn rejects_duplicate_ids() -> TestResult {
        let result = Catalog::new(
            [Category::new("Toys")],
            [product(1, "Car", "Toys")?, product(1, "Robot", "Toys")?],
        );

        assert!(matches!(result, Err(CatalogError::DuplicateProduct(id)) if id.get() == 1));

        Ok(())
    }

    #[test]
    fn rejects_unknown_category() -> TestResult {
        let result = Catalog::new([Category::new("Toys")], [product(1, "Lamp", "Lamps")?]);

        assert!(matches!(
            result,
            Err(CatalogError::UnknownCategory(_, category)) if category == "Lamps"
        ));

        Ok(())
    }

    #[test]
    fn rejects_reserved_category_name() -> TestResult {
        let result = Catalog::new(
            [Category::new(ALL_CATEGORIES)],
            [product(1, "Car", ALL_CATEGORIES)?],
        );

        assert!(matches!(result, Err(CatalogError::DuplicateCategory(_))));

        Ok(())
    }

    #[test]
    fn rejects_mixed_currencies() -> TestResult {
        let pound_product = Product::new(
            ProductId::try_from(2)?,
            "Robot",
            Money::from_minor(1_000, GBP),
            "Toys",
        );

        let result = Catalog::new(
            [Category::new("Toys")],
            [product(1, "Car", "Toys")?, pound_product],
        );

        assert!(matches!(result, Err(CatalogError::CurrencyMismatch(..))));

        Ok(())
    }

    #[test]
    fn rejects_rating_out_of_range() -> TestResult {
        let result = Catalog::new(
            [Category::new("Toys")],
            [product(1, "Car", "Toys")?.with_rating(Decimal::from(7))],
        );

        assert!(matches!(result, Err(CatalogError::InvalidRating(id, _)) if id.get() == 1));

        let negative = Catalog::new(
            [Category::new("Toys")],
            [product(1, "Car", "Toys")?.with_rating(Decimal::new(-1, 1))],
        );

        assert!(matches!(negative, Err(CatalogError::InvalidRating(..))));

        Ok(())
    }

    #[test]
    fn accepts_boundary_ratings() -> TestResult {
        let catalog = Catalog::new(
            [Category::new("Toys")],
            [
                product(1, "Car", "Toys")?.with_rating(Decimal::ZERO),
                product(2, "Robot", "Toys")?.with_rating(MAX_RATING),
            ],
        )?;

        assert_eq!(catalog.len(), 2);

        Ok(())
    }

    #[test]
    fn rejects_original_price_below_price() -> TestResult {
        let result = Catalog::new(
            [Category::new("Toys")],
            [product(1, "Car", "Toys")?.with_original_price(Money::from_minor(500, USD))],
        );

        assert!(matches!(
            result,
            Err(CatalogError::OriginalPriceBelowPrice(id)) if id.get() == 1
        ));

        Ok(())
    }

    #[test]
    fn rejects_original_price_in_other_currency() -> TestResult {
        let result = Catalog::new(
            [Category::new("Toys")],
            [product(1, "Car", "Toys")?.with_original_price(Money::from_minor(2_000, GBP))],
        );

        assert!(matches!(
            result,
            Err(CatalogError::CurrencyMismatch(expected, found)) if expected == "USD" && found == "GBP"
        ));

        Ok(())
    }

    #[test]
    fn yaml_rating_out_of_range_is_rejected() {
        let result = Catalog::from_yaml(
            "categories:\n  - name: Toys\nproducts:\n  - id: 4\n    name: Remote Control Car\n    price: 45 USD\n    rating: 5.5\n    category: Toys\n",
        );

        assert!(matches!(result, Err(CatalogError::InvalidRating(..))));
    }

    #[test]
    fn rejects_empty_catalog() {
        let result = Catalog::new([Category::new("Toys")], Vec::<Product>::new());

        assert!(matches!(result, Err(CatalogError::Empty)));
    }

    #[test]
    fn loads_from_path() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;

        writeln!(
            file,
            "categories:\n  - name: Toys\nproducts:\n  - id: 4\n    name: Remote Control Car\n    price: 45 USD\n    rating: 4.9\n    reviews: 278\n    category: Toys\n"
        )?;

        let catalog = Catalog::from_path(file.path())?;

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.category_description("Toys"), DEFAULT_CATEGORY_DESCRIPTION);

        Ok(())
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = Catalog::from_path("/nonexistent/catalog.yml");

        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
