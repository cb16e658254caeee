//! Screen rendering for the CLI

use std::io;

use anyhow::{Context, Result, bail};
use tracing::info;

use storefront::{
    basket::Basket,
    catalog::Catalog,
    pricing::format_price,
    summary::{write_cart, write_product_table, write_stats, write_wishlist},
    views::{self, CategoryConstraint, aggregate_stats, results_label},
};

use crate::config::{CartAction, Command};

/// Render `command` against `catalog`.
pub fn run(command: &Command, catalog: &Catalog, out: &mut impl io::Write) -> Result<()> {
    match command {
        Command::Products { category, search } => products(catalog, category, search, out),
        Command::Category { slug, search } => category(catalog, slug, search, out),
        Command::Search { term } => search(catalog, term, out),
        Command::Cart { actions, .. } => cart(catalog, actions, out),
        Command::Categories => categories(catalog, out),
    }
}

fn products(catalog: &Catalog, category: &str, term: &str, out: &mut impl io::Write) -> Result<()> {
    let constraint = CategoryConstraint::parse(category);
    let preview = views::search_preview(catalog.all_products(), constraint, term);

    if !preview.is_empty() {
        let names: Vec<String> = preview
            .iter()
            .map(|product| format!("{} ({})", product.name, format_price(&product.price)))
            .collect();

        writeln!(out, "Quick results: {}", names.join(", "))?;
    }

    let products = views::filter(catalog.all_products(), constraint, term);

    if products.is_empty() {
        writeln!(out, "No products found matching your criteria.")?;
        return Ok(());
    }

    write_product_table(out, &products, |_product| String::new())?;

    Ok(())
}

fn category(catalog: &Catalog, slug: &str, term: &str, out: &mut impl io::Write) -> Result<()> {
    let Some(name) = catalog.category_from_slug(slug) else {
        bail!("Unknown category: {slug}");
    };

    writeln!(out, "{name}")?;
    writeln!(out, "{}", catalog.category_description(name))?;

    let products = views::filter_category(catalog.all_products(), name, term);
    let lowercase = name.to_lowercase();

    if products.is_empty() {
        if term.is_empty() {
            writeln!(out, "No {lowercase} available at the moment.")?;
        } else {
            writeln!(out, "No {lowercase} found matching \"{term}\"")?;
        }
    } else {
        write_product_table(out, &products, |_product| String::new())?;
    }

    write_stats(out, &aggregate_stats(products))?;

    Ok(())
}

fn search(catalog: &Catalog, term: &str, out: &mut impl io::Write) -> Result<()> {
    let products = views::search(catalog.all_products(), term);

    if term.is_empty() {
        writeln!(out, "Start typing to search products")?;
        writeln!(out, "Search by product name or category")?;
    } else {
        writeln!(out, "{}", results_label(products.len(), term))?;
    }

    if products.is_empty() {
        writeln!(out, "No products found matching \"{term}\"")?;
        writeln!(
            out,
            "Try searching for different keywords or browse our categories"
        )?;
        return Ok(());
    }

    write_product_table(out, &products, |_product| String::new())?;

    if !term.is_empty() {
        write_stats(out, &aggregate_stats(products))?;
    }

    Ok(())
}

fn cart(catalog: &Catalog, actions: &[CartAction], out: &mut impl io::Write) -> Result<()> {
    let mut basket = Basket::new(catalog);

    for &action in actions {
        match action {
            CartAction::Add(id) => {
                basket
                    .add_to_cart(id)
                    .with_context(|| format!("cannot add product {id} to the cart"))?;
            }
            CartAction::Remove(id) => {
                if !basket.remove_one_from_cart(id) {
                    info!(product = %id, "not in cart; nothing removed");
                }
            }
            CartAction::Like(id) => {
                basket
                    .toggle_like(id)
                    .with_context(|| format!("cannot like product {id}"))?;
            }
        }
    }

    write_cart(&mut *out, &basket)?;
    writeln!(out)?;
    write_wishlist(&mut *out, &basket)?;

    Ok(())
}

fn categories(catalog: &Catalog, out: &mut impl io::Write) -> Result<()> {
    for name in catalog.categories() {
        let count = catalog.by_category(name).len();

        writeln!(out, "{name} ({count})")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use storefront::products::ProductId;
    use testresult::TestResult;

    use crate::config::Config;

    use super::*;

    fn render(command: &Command) -> Result<String> {
        let catalog = Catalog::builtin()?;
        let mut out = Vec::new();

        run(command, &catalog, &mut out)?;

        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn products_lists_filtered_grid_with_preview() -> TestResult {
        let output = render(&Command::Products {
            category: "All".to_string(),
            search: "dryer".to_string(),
        })?;

        assert!(output.starts_with("Quick results: Ionic Hair Dryer ($149.00)"));
        assert!(output.contains("Ceramic Hair Dryer"));
        assert!(output.contains("Travel Hair Dryer"));
        assert!(!output.contains("LED Desk Lamp"));

        Ok(())
    }

    #[test]
    fn products_without_matches_says_so() -> TestResult {
        let output = render(&Command::Products {
            category: "Toys".to_string(),
            search: "dryer".to_string(),
        })?;

        assert!(output.contains("No products found matching your criteria."));
        assert!(!output.contains("Quick results"));

        Ok(())
    }

    #[test]
    fn category_page_shows_description_and_stats() -> TestResult {
        let output = render(&Command::Category {
            slug: "lamps".to_string(),
            search: String::new(),
        })?;

        assert!(output.starts_with("Lamps\nModern lighting solutions"));
        assert!(output.contains("RGB Gaming Lamp"));
        assert!(output.contains("Products: 3"));
        assert!(output.contains("Avg rating: 4.7"));

        Ok(())
    }

    #[test]
    fn category_page_empty_search() -> TestResult {
        let output = render(&Command::Category {
            slug: "toys".to_string(),
            search: "dryer".to_string(),
        })?;

        assert!(output.contains("No toys found matching \"dryer\""));
        assert!(output.contains("Avg rating: 0.0"));

        Ok(())
    }

    #[test]
    fn unknown_category_errors() {
        let result = render(&Command::Category {
            slug: "shoes".to_string(),
            search: String::new(),
        });

        assert!(result.is_err());
    }

    #[test]
    fn search_matches_category_text() -> TestResult {
        let output = render(&Command::Search {
            term: "toys".to_string(),
        })?;

        assert!(output.starts_with("3 results for \"toys\""));
        assert!(output.contains("Remote Control Car"));
        assert!(output.contains("Categories: 1"));

        Ok(())
    }

    fn render_args(args: &[&str]) -> Result<String> {
        let config = Config::try_load_from(args.iter().copied())?;

        render(&config.command)
    }

    #[test]
    fn cart_replays_actions() -> TestResult {
        let output = render_args(&[
            "storefront", "cart", "--add", "1", "--add", "1", "--remove", "5", "--like", "8",
        ])?;

        assert!(output.contains("Cart (2)"));
        assert!(output.contains("Total: $178.00"));
        assert!(output.contains("Liked (1)"));
        assert!(output.contains("Educational Building Blocks"));

        Ok(())
    }

    #[test]
    fn cart_replays_actions_in_command_line_order() -> TestResult {
        let output = render_args(&[
            "storefront", "cart", "--add", "1", "--remove", "1", "--add", "1",
        ])?;

        assert!(output.contains("Cart (1)"));
        assert!(output.contains("Total: $89.00"));

        Ok(())
    }

    #[test]
    fn cart_rejects_unknown_product() -> TestResult {
        let id = ProductId::try_from(404)?;

        let result = render(&Command::Cart {
            add: vec![id],
            remove: Vec::new(),
            like: Vec::new(),
            actions: vec![CartAction::Add(id)],
        });

        assert!(result.is_err());

        Ok(())
    }

    #[test]
    fn categories_lists_counts() -> TestResult {
        let output = render(&Command::Categories)?;

        assert_eq!(
            output,
            "All (12)\nTrimmers (3)\nDryers (3)\nToys (3)\nLamps (3)\n"
        );

        Ok(())
    }
}
