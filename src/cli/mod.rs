//! CLI module for the model registry front-end
//!
//! Provides subcommands for each view plus a local backend:
//! - `register`: registration form (default)
//! - `inventory`: searchable, sortable, editable model list
//! - `open`: resolve a route path to one of the views
//! - `serve`: in-memory registry backend for development

pub mod inventory;
pub mod register;
pub mod serve;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::app::Route;
use crate::config::AppConfig;
use crate::domain::ModelRegistryClient;
use crate::infrastructure::{logging, HttpModelRegistryClient};

/// Model Registry - register and browse risk models
#[derive(Parser)]
#[command(name = "model-registry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the registry API (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Register a new model
    Register(register::RegisterArgs),

    /// Browse, search, sort and edit registered models
    Inventory(inventory::InventoryArgs),

    /// Open the view a route path points at (`/register`, `/inventory`)
    Open {
        #[arg(default_value = "")]
        path: String,
    },

    /// Run an in-memory registry API
    Serve(serve::ServeArgs),
}

/// Load `.env` and configuration, then install logging
pub fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&logging::LoggingConfig::from(&config.logging));

    config
}

/// Build the HTTP registry client from config and the `--api-url` override
pub fn build_client(
    config: &AppConfig,
    api_url: Option<String>,
) -> anyhow::Result<Arc<dyn ModelRegistryClient>> {
    let mut api = config.api.clone();
    if let Some(url) = api_url {
        api.base_url = url;
    }

    let client = HttpModelRegistryClient::from_config(&api)?;
    tracing::debug!(base_url = %client.base_url(), "Using registry API");

    Ok(Arc::new(client))
}

/// Parse arguments and run the selected command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = bootstrap();

    let command = cli.command.unwrap_or(Command::Open {
        path: String::new(),
    });

    match command {
        Command::Serve(args) => serve::run(&config, args).await,
        Command::Register(args) => {
            let client = build_client(&config, cli.api_url)?;
            register::run(&config, client, args).await
        }
        Command::Inventory(args) => {
            let client = build_client(&config, cli.api_url)?;
            inventory::run(client, args).await
        }
        Command::Open { path } => {
            let client = build_client(&config, cli.api_url)?;
            match Route::resolve(&path) {
                Route::Register => {
                    register::run(&config, client, register::RegisterArgs::default()).await
                }
                Route::Inventory => {
                    inventory::run(client, inventory::InventoryArgs::default()).await
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_register_flags() {
        let cli = Cli::try_parse_from([
            "model-registry",
            "--api-url",
            "http://registry:9000",
            "register",
            "--name",
            "PD Model",
            "--risk-rating",
            "HIGH",
        ])
        .unwrap();

        assert_eq!(cli.api_url.as_deref(), Some("http://registry:9000"));
        match cli.command {
            Some(Command::Register(args)) => {
                assert_eq!(args.name.as_deref(), Some("PD Model"));
                assert_eq!(args.risk_rating.as_deref(), Some("HIGH"));
                assert!(args.version.is_none());
            }
            _ => panic!("expected register"),
        }
    }

    #[test]
    fn test_no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["model-registry"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_build_client_prefers_override() {
        let config = AppConfig::default();
        assert!(build_client(&config, Some("http://registry:9000".into())).is_ok());
    }
}
