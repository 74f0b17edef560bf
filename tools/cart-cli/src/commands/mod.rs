//! CLI command implementations.

pub mod cart;
pub mod config;

use cart_core::ProductId;
use clap::{Args, Subcommand};
use thiserror::Error;

/// A failure the user has already been told about.
///
/// `main` exits non-zero on it without printing anything else.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct AlreadyReported(pub String);

/// Arguments for commands that target one product.
#[derive(Args)]
pub struct ProductArgs {
    /// Product ID.
    pub id: ProductId,
}

/// Arguments for the set command.
#[derive(Args)]
pub struct SetArgs {
    /// Product ID.
    pub id: ProductId,

    /// New quantity (must be at least 1).
    #[arg(allow_hyphen_values = true)]
    pub amount: i64,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a default cart.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
