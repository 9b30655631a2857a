//! Helpers for exercising the adapters without external services.

use std::cell::Cell;

use rideshare_core::{IdGenerator, Repositories};

pub use crate::document::MemoryCollection;

/// Identifier generator issuing `prefix-1`, `prefix-2`, and so on.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    issued: Cell<u32>,
}

impl SequentialIds {
    /// Start a sequence whose identifiers begin with `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            issued: Cell::new(0),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let next = self.issued.get().saturating_add(1);
        self.issued.set(next);
        format!("{}-{next}", self.prefix)
    }
}

/// Document-family contracts over fresh in-memory collections.
#[must_use]
pub fn memory_document_repositories() -> Repositories {
    crate::document::open_repositories(|_| MemoryCollection::default())
}

#[cfg(test)]
pub(crate) fn temp_data_dir() -> (tempfile::TempDir, camino::Utf8PathBuf) {
    let dir = tempfile::TempDir::new().expect("create temp dir");
    let path = camino::Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .expect("temp dir path should be UTF-8");
    (dir, path)
}
