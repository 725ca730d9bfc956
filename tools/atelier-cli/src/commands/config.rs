//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use atelier_commerce::catalog::SortOption;
use tracing_subscriber::EnvFilter;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Current Configuration");

    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    match &ctx.config_file {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    // Store section
    ctx.output.info("");
    ctx.output.info("[store]");
    ctx.output.kv("path", &ctx.config.store.path);
    ctx.output.kv("key", &ctx.config.store.key);
    if let Some(ref session) = ctx.config.store.session {
        ctx.output.kv("session", session);
    }
    ctx.output.kv("cart slot", &ctx.cart_key());

    // Catalog section
    ctx.output.info("");
    ctx.output.info("[catalog]");
    ctx.output.kv("path", &ctx.config.catalog.path);
    ctx.output.kv("default_sort", &ctx.config.catalog.default_sort);

    // Log section
    ctx.output.info("");
    ctx.output.info("[log]");
    ctx.output.kv("level", &ctx.config.log.level);

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("atelier.toml");

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

/// Check a configuration, returning errors and warnings.
fn check_config(config: &CliConfig) -> (Vec<String>, Vec<String>) {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if config.store.path.trim().is_empty() {
        errors.push("store.path is required".to_string());
    }

    if config.store.key.trim().is_empty() {
        errors.push("store.key is required".to_string());
    } else if config.store.key.contains(':') {
        warnings.push(format!(
            "store.key '{}' contains ':', which is reserved for session slots",
            config.store.key
        ));
    }

    if let Some(ref session) = config.store.session {
        if session.trim().is_empty() {
            warnings.push("store.session is blank and will be ignored".to_string());
        }
    }

    if config.catalog.path.trim().is_empty() {
        errors.push("catalog.path is required".to_string());
    } else if !config.catalog.path.ends_with(".json") {
        warnings.push(format!(
            "catalog.path '{}' is expected to be a JSON file",
            config.catalog.path
        ));
    }

    if let Err(e) = config.catalog.default_sort.parse::<SortOption>() {
        errors.push(format!("catalog.default_sort: {}", e));
    }

    if EnvFilter::try_new(&config.log.level).is_err() {
        errors.push(format!("log.level '{}' is not a valid filter", config.log.level));
    }

    (errors, warnings)
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, mut warnings) = check_config(&ctx.config);

    let catalog_path = ctx.resolve_path(&ctx.config.catalog.path);
    if !catalog_path.exists() {
        warnings.push(format!("catalog file not found: {}", catalog_path.display()));
    }

    // Print results
    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}
