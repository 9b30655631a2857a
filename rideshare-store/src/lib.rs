//! Storage backends for the ride-sharing entity contracts.
//!
//! Four families implement every contract from [`rideshare_core`]:
//!
//! - [`delimited`]: CSV files, one per collection.
//! - [`tree`]: JSON files, one per collection.
//! - [`document`]: a document store keyed by `ObjectId`, with a MongoDB
//!   implementation behind the `store-mongodb` feature.
//! - `relational`: SQLite tables over one shared connection, behind the
//!   `store-sqlite` feature.
//!
//! [`selector::open_repositories`] picks one family for every entity from a
//! [`selector::StoreConfig`].
#![forbid(unsafe_code)]

pub mod delimited;
pub mod document;
#[cfg(feature = "store-sqlite")]
pub mod relational;
pub mod selector;
pub mod tree;
mod whole_file;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use delimited::CsvRepository;
pub use document::{DocumentCollection, DocumentRepository};
#[cfg(feature = "store-sqlite")]
pub use relational::SqliteRepository;
pub use selector::{BackendKind, SelectorError, StoreConfig, UnknownBackend, open_repositories};
pub use tree::JsonRepository;
