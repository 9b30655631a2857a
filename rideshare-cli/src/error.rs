//! Error types emitted by the ride-sharing CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::{error::Error as StdError, io, sync::Arc};

use rideshare_core::{Entity, ServiceError};
use rideshare_store::{SelectorError, UnknownBackend};
use thiserror::Error;

/// Errors emitted by the ride-sharing CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// The configured backend name matches no storage family.
    #[error(transparent)]
    InvalidBackend(#[from] UnknownBackend),
    /// The selected storage family could not be opened.
    #[error("failed to open storage: {0}")]
    OpenBackend(#[from] SelectorError),
    /// An entity service rejected the command.
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// A `show` or `update` command named an identifier nothing is stored under.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Collection that was searched.
        entity: Entity,
        /// Identifier as supplied.
        id: String,
    },
    /// Writing the command output failed.
    #[error("failed to write command output: {0}")]
    Output(#[source] io::Error),
    /// The log subscriber could not be installed.
    #[error("failed to install the log subscriber: {0}")]
    Logging(#[source] Box<dyn StdError + Send + Sync + 'static>),
}
