//! Backend selection: one configuration value picks the family behind every
//! entity contract.
//!
//! Switching families never migrates data between media.

use std::fmt;
use std::str::FromStr;

use camino::Utf8PathBuf;
use log::info;
use rideshare_core::{Repositories, StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage families the selector can wire up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum BackendKind {
    /// One CSV file per collection.
    #[default]
    DelimitedFile,
    /// One JSON file per collection.
    TreeFile,
    /// One MongoDB collection per entity.
    DocumentStore,
    /// One SQLite table per entity.
    Relational,
}

impl BackendKind {
    /// Every family, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::DelimitedFile,
        Self::TreeFile,
        Self::DocumentStore,
        Self::Relational,
    ];

    /// Canonical configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DelimitedFile => "csv",
            Self::TreeFile => "json",
            Self::DocumentStore => "mongodb",
            Self::Relational => "sqlite",
        }
    }

    /// Cargo feature that must be enabled for this family, if any.
    #[must_use]
    pub const fn required_feature(self) -> Option<&'static str> {
        match self {
            Self::DelimitedFile | Self::TreeFile => None,
            Self::DocumentStore => Some("store-mongodb"),
            Self::Relational => Some("store-sqlite"),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A backend name that matches no family.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown backend {0:?}; expected csv, json, mongodb or sqlite")]
pub struct UnknownBackend(pub String);

impl FromStr for BackendKind {
    type Err = UnknownBackend;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "csv" | "delimited" => Ok(Self::DelimitedFile),
            "json" | "tree" => Ok(Self::TreeFile),
            "mongodb" | "mongo" | "document" => Ok(Self::DocumentStore),
            "sqlite" | "relational" => Ok(Self::Relational),
            _ => Err(UnknownBackend(raw.to_owned())),
        }
    }
}

impl TryFrom<String> for BackendKind {
    type Error = UnknownBackend;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<BackendKind> for &'static str {
    fn from(kind: BackendKind) -> Self {
        kind.as_str()
    }
}

/// Everything the selector needs to open a family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Family backing every entity contract.
    pub backend: BackendKind,
    /// Directory holding the CSV and JSON collection files.
    pub data_dir: Utf8PathBuf,
    /// SQLite database file.
    pub sqlite_path: Utf8PathBuf,
    /// MongoDB connection string.
    pub mongodb_uri: String,
    /// MongoDB database name.
    pub mongodb_database: String,
}

/// Default directory for file-backed collections.
pub const DEFAULT_DATA_DIR: &str = "data";
/// Default SQLite database file.
pub const DEFAULT_SQLITE_PATH: &str = "data/rideshare.db";
/// Default MongoDB connection string.
pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
/// Default MongoDB database name.
pub const DEFAULT_MONGODB_DATABASE: &str = "rideshare";

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            data_dir: Utf8PathBuf::from(DEFAULT_DATA_DIR),
            sqlite_path: Utf8PathBuf::from(DEFAULT_SQLITE_PATH),
            mongodb_uri: DEFAULT_MONGODB_URI.to_owned(),
            mongodb_database: DEFAULT_MONGODB_DATABASE.to_owned(),
        }
    }
}

/// Errors raised while opening a backend family.
#[derive(Debug, Error)]
pub enum SelectorError {
    /// The family was compiled out.
    #[error("the {backend} backend requires the `{feature}` feature")]
    BackendUnavailable {
        /// Requested family.
        backend: BackendKind,
        /// Feature that would enable it.
        feature: &'static str,
    },
    /// A collection file could not be prepared.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The SQLite database could not be opened.
    #[cfg(feature = "store-sqlite")]
    #[error(transparent)]
    Relational(#[from] crate::relational::OpenDatabaseError),
    /// The MongoDB connection string was rejected.
    #[cfg(feature = "store-mongodb")]
    #[error("failed to connect to MongoDB at {uri}: {source}")]
    DocumentStore {
        /// Connection string as configured.
        uri: String,
        /// Driver error.
        #[source]
        source: Box<mongodb::error::Error>,
    },
}

/// Wire every entity contract to the family named by `config.backend`.
///
/// # Errors
///
/// Returns [`SelectorError`] when the family is unavailable in this build
/// or its medium cannot be opened.
pub fn open_repositories(config: &StoreConfig) -> Result<Repositories, SelectorError> {
    info!("opening {} backend", config.backend);
    match config.backend {
        BackendKind::DelimitedFile => Ok(crate::delimited::open_repositories(&config.data_dir)?),
        BackendKind::TreeFile => Ok(crate::tree::open_repositories(&config.data_dir)),
        BackendKind::DocumentStore => open_document_store(config),
        BackendKind::Relational => open_relational(config),
    }
}

#[cfg(feature = "store-mongodb")]
fn open_document_store(config: &StoreConfig) -> Result<Repositories, SelectorError> {
    let database = crate::document::mongo::connect(&config.mongodb_uri, &config.mongodb_database)
        .map_err(|source| SelectorError::DocumentStore {
            uri: config.mongodb_uri.clone(),
            source: Box::new(source),
        })?;
    Ok(crate::document::mongo::mongo_repositories(&database))
}

#[cfg(not(feature = "store-mongodb"))]
fn open_document_store(config: &StoreConfig) -> Result<Repositories, SelectorError> {
    Err(unavailable(config.backend))
}

#[cfg(feature = "store-sqlite")]
fn open_relational(config: &StoreConfig) -> Result<Repositories, SelectorError> {
    let connection = crate::relational::open_connection(&config.sqlite_path)?;
    Ok(crate::relational::open_repositories(&connection))
}

#[cfg(not(feature = "store-sqlite"))]
fn open_relational(config: &StoreConfig) -> Result<Repositories, SelectorError> {
    Err(unavailable(config.backend))
}

#[cfg(not(all(feature = "store-sqlite", feature = "store-mongodb")))]
fn unavailable(backend: BackendKind) -> SelectorError {
    SelectorError::BackendUnavailable {
        backend,
        feature: backend.required_feature().unwrap_or("default"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_data_dir;
    use rideshare_core::ErrorKind;
    use rideshare_core::mapper::RecordMapping;
    use rideshare_core::test_support::{sample_date, sample_route};
    use rstest::rstest;

    #[rstest]
    #[case("csv", BackendKind::DelimitedFile)]
    #[case("Delimited", BackendKind::DelimitedFile)]
    #[case("JSON", BackendKind::TreeFile)]
    #[case("tree", BackendKind::TreeFile)]
    #[case("mongodb", BackendKind::DocumentStore)]
    #[case("document", BackendKind::DocumentStore)]
    #[case(" SQLite ", BackendKind::Relational)]
    #[case("relational", BackendKind::Relational)]
    fn names_parse_case_insensitively(#[case] raw: &str, #[case] expected: BackendKind) {
        assert_eq!(raw.parse::<BackendKind>(), Ok(expected));
    }

    #[rstest]
    fn unknown_names_are_rejected() {
        let err = "postgres".parse::<BackendKind>().expect_err("unknown backend");
        assert_eq!(err, UnknownBackend("postgres".to_owned()));
    }

    #[rstest]
    fn canonical_names_round_trip() {
        for kind in BackendKind::ALL {
            assert_eq!(kind.as_str().parse::<BackendKind>(), Ok(kind));
        }
    }

    #[rstest]
    fn config_deserialises_with_defaults() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"backend": "Tree"}"#).expect("parse config");
        assert_eq!(config.backend, BackendKind::TreeFile);
        assert_eq!(config.data_dir, Utf8PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.mongodb_database, DEFAULT_MONGODB_DATABASE);
    }

    #[rstest]
    #[case(BackendKind::DelimitedFile)]
    #[case(BackendKind::TreeFile)]
    fn file_families_share_a_data_directory(#[case] backend: BackendKind) {
        let (_guard, dir) = temp_data_dir();
        let config = StoreConfig {
            backend,
            data_dir: dir,
            ..StoreConfig::default()
        };
        let repositories = open_repositories(&config).expect("open backend");
        let id = repositories
            .routes
            .create(&sample_route().to_record().expect("map route"))
            .expect("create route");
        assert!(repositories.routes.get_by_id(&id).expect("read").is_some());
        assert_eq!(
            repositories
                .routes
                .find_by_date_range(sample_date(), sample_date())
                .expect_err("finder is unsupported")
                .kind(),
            ErrorKind::NotSupported
        );
    }

    #[cfg(feature = "store-sqlite")]
    #[rstest]
    fn relational_family_opens_its_database_file() {
        let (_guard, dir) = temp_data_dir();
        let config = StoreConfig {
            backend: BackendKind::Relational,
            sqlite_path: dir.join("db/rideshare.db"),
            ..StoreConfig::default()
        };
        let repositories = open_repositories(&config).expect("open sqlite");
        repositories
            .routes
            .create(&sample_route().to_record().expect("map route"))
            .expect("create route");
        assert!(config.sqlite_path.exists());
    }

    #[cfg(not(feature = "store-sqlite"))]
    #[rstest]
    fn relational_family_reports_missing_feature() {
        let config = StoreConfig {
            backend: BackendKind::Relational,
            ..StoreConfig::default()
        };
        let err = open_repositories(&config).expect_err("sqlite compiled out");
        assert!(matches!(
            err,
            SelectorError::BackendUnavailable { feature: "store-sqlite", .. }
        ));
    }
}
