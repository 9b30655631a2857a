//! Command-line interface for ride-sharing administration.
//!
//! Global flags (or `RIDESHARE_CMDS_STORE_*` variables, or the `[cmds.store]`
//! table of a configuration file) pick the storage family; the subcommands
//! drive the entity services over it.
#![forbid(unsafe_code)]

use std::io;

use camino::Utf8PathBuf;
use chrono::Local;
use clap::Parser;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rideshare_core::Services;
use rideshare_store::{BackendKind, StoreConfig, open_repositories};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, fmt};

mod commands;
mod error;

pub use error::CliError;

use commands::{Command, execute};

const ARG_BACKEND: &str = "backend";
const ARG_DATA_DIR: &str = "data-dir";
const ARG_SQLITE_PATH: &str = "sqlite-path";
const ARG_MONGODB_URI: &str = "mongodb-uri";
const ARG_MONGODB_DATABASE: &str = "mongodb-database";

/// Filter applied when `RUST_LOG` is unset or unparsable.
const DEFAULT_LOG_FILTER: &str = "info";

/// Run the ride-sharing CLI with the current process arguments and
/// environment.
///
/// # Errors
///
/// Returns [`CliError`] when the arguments or configuration are invalid,
/// the storage family cannot be opened, or the command itself fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    init_logging()?;
    let config = cli.store.into_config()?;
    let services = open_services(&config)?;
    let stdout = io::stdout();
    execute(
        &services,
        cli.command,
        Local::now().date_naive(),
        &mut stdout.lock(),
    )
}

fn init_logging() -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(CliError::Logging)
}

fn open_services(config: &StoreConfig) -> Result<Services, CliError> {
    debug!("store configuration: {config:?}");
    let repositories = open_repositories(config)?;
    Ok(Services::new(repositories))
}

#[derive(Debug, Parser)]
#[command(
    name = "rideshare",
    about = "Administer users, trips, bookings and ratings",
    version
)]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,
    #[command(subcommand)]
    command: Command,
}

// Flattened into `Cli`, so only `name` may be set here: it names the
// `[cmds.store]` configuration table and the `RIDESHARE_CMDS_STORE_*`
// variables without touching the parent command.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "store")]
#[ortho_config(prefix = "RIDESHARE")]
struct StoreArgs {
    /// Storage family: csv, json, mongodb or sqlite.
    #[arg(long = ARG_BACKEND, value_name = "name", global = true)]
    #[serde(default)]
    backend: Option<String>,
    /// Directory holding the CSV and JSON collection files.
    #[arg(long = ARG_DATA_DIR, value_name = "dir", global = true)]
    #[serde(default)]
    data_dir: Option<Utf8PathBuf>,
    /// SQLite database file.
    #[arg(long = ARG_SQLITE_PATH, value_name = "path", global = true)]
    #[serde(default)]
    sqlite_path: Option<Utf8PathBuf>,
    /// MongoDB connection string.
    #[arg(long = ARG_MONGODB_URI, value_name = "uri", global = true)]
    #[serde(default)]
    mongodb_uri: Option<String>,
    /// MongoDB database name.
    #[arg(long = ARG_MONGODB_DATABASE, value_name = "name", global = true)]
    #[serde(default)]
    mongodb_database: Option<String>,
}

impl StoreArgs {
    fn into_config(self) -> Result<StoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        StoreConfig::try_from(merged)
    }
}

impl TryFrom<StoreArgs> for StoreConfig {
    type Error = CliError;

    fn try_from(args: StoreArgs) -> Result<Self, Self::Error> {
        let defaults = Self::default();
        let backend = args
            .backend
            .as_deref()
            .map(str::parse::<BackendKind>)
            .transpose()?
            .unwrap_or(defaults.backend);
        Ok(Self {
            backend,
            data_dir: args.data_dir.unwrap_or(defaults.data_dir),
            sqlite_path: args.sqlite_path.unwrap_or(defaults.sqlite_path),
            mongodb_uri: args.mongodb_uri.unwrap_or(defaults.mongodb_uri),
            mongodb_database: args.mongodb_database.unwrap_or(defaults.mongodb_database),
        })
    }
}

#[cfg(test)]
mod tests;
