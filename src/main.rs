//! Storefront CLI

use std::io;

use anyhow::Result;
use tracing::debug;

use storefront::catalog::Catalog;

use crate::config::Config;

mod cli;
mod config;
mod logging;

/// Storefront CLI entry point
pub fn main() -> Result<()> {
    let config = Config::load();

    logging::init_subscriber(&config.logging)?;

    let catalog = match &config.catalog {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::builtin()?,
    };

    debug!(command = ?config.command, "rendering");

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    cli::run(&config.command, &catalog, &mut handle)
}
