//! CLI configuration

use std::{ffi::OsString, path::PathBuf};

use clap::{ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand};

use storefront::{catalog::ALL_CATEGORIES, products::ProductId};

/// Storefront CLI configuration
#[derive(Debug, Parser)]
#[command(
    name = "storefront",
    about = "Browse the storefront catalog, cart and wishlist",
    long_about = None
)]
pub struct Config {
    /// Catalog YAML file; the bundled catalog is used when not set
    #[arg(long, env = "STOREFRONT_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Screen to render
    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    pub fn load() -> Self {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_load_from(std::env::args_os()).unwrap_or_else(|err| err.exit())
    }

    /// Parse `args`, recording cart actions in the order they were given.
    ///
    /// # Errors
    ///
    /// Returns a clap error for invalid arguments, `--help` or `--version`.
    pub fn try_load_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command().try_get_matches_from(args)?;
        let mut config = Self::from_arg_matches(&matches)?;

        if let (Command::Cart { actions, .. }, Some(("cart", cart))) =
            (&mut config.command, matches.subcommand())
        {
            *actions = cart_actions(cart);
        }

        Ok(config)
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Screens and actions.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Home page product grid
    Products {
        /// Category to show, or "All"
        #[arg(short, long, default_value = ALL_CATEGORIES)]
        category: String,

        /// Only show products whose name contains this text
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Category page, e.g. `category trimmers`
    Category {
        /// Category slug
        slug: String,

        /// Only show products whose name contains this text
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Search page, matching product names and categories
    Search {
        /// Search text
        #[arg(default_value = "")]
        term: String,
    },

    /// Apply cart and wishlist actions, then show both panels
    Cart {
        /// Add one of this product to the cart (repeatable)
        #[arg(short, long, value_parser = parse_product_id)]
        add: Vec<ProductId>,

        /// Remove one of this product from the cart (repeatable)
        #[arg(short, long, value_parser = parse_product_id)]
        remove: Vec<ProductId>,

        /// Toggle the like on this product (repeatable)
        #[arg(long, value_parser = parse_product_id)]
        like: Vec<ProductId>,

        /// Every action above, in command-line order
        #[arg(skip)]
        actions: Vec<CartAction>,
    },

    /// Category vocabulary
    Categories,
}

/// A single cart or wishlist action from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CartAction {
    /// Add one occurrence to the cart
    Add(ProductId),

    /// Remove one occurrence from the cart
    Remove(ProductId),

    /// Toggle the like
    Like(ProductId),
}

fn cart_actions(matches: &ArgMatches) -> Vec<CartAction> {
    let kinds: [(&str, fn(ProductId) -> CartAction); 3] = [
        ("add", CartAction::Add),
        ("remove", CartAction::Remove),
        ("like", CartAction::Like),
    ];

    let mut actions: Vec<(usize, CartAction)> = Vec::new();

    for (arg, action) in kinds {
        if let (Some(indices), Some(ids)) =
            (matches.indices_of(arg), matches.get_many::<ProductId>(arg))
        {
            actions.extend(indices.zip(ids.copied().map(action)));
        }
    }

    actions.sort_by_key(|&(index, _)| index);

    actions.into_iter().map(|(_, action)| action).collect()
}

fn parse_product_id(value: &str) -> Result<ProductId, String> {
    value.parse::<ProductId>().map_err(|err| err.to_string())
}
