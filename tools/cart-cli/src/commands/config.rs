//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;

    println!("\n[api]");
    ctx.output.kv("base_url", &config.api.base_url);
    ctx.output.kv("stock_path", &config.api.stock_path);
    ctx.output.kv("products_path", &config.api.products_path);

    println!("\n[storage]");
    ctx.output.kv("dir", &config.storage.dir);

    if let Some(ref fixture) = config.catalog.fixture {
        println!("\n[catalog]");
        ctx.output.kv("fixture", fixture);
    }

    println!("\n[cart]");
    ctx.output.kv("storage_key", &config.cart.storage_key);
    ctx.output.kv("messages.out_of_stock", &config.cart.messages.out_of_stock);
    ctx.output.kv("messages.add_failed", &config.cart.messages.add_failed);
    ctx.output.kv("messages.remove_failed", &config.cart.messages.remove_failed);
    ctx.output.kv("messages.update_failed", &config.cart.messages.update_failed);

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}
