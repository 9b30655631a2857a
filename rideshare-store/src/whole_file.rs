//! Collections persisted as one file that is decoded and re-encoded in full
//! on every operation.
//!
//! No handle survives between calls and no lock is taken, so two writers
//! working on the same file can silently overwrite each other's changes.

use std::marker::PhantomData;

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use rideshare_core::error::BoxError;
use rideshare_core::{IdGenerator, Record, StoreError, StoreResult};

/// Text encoding of a whole collection.
pub(crate) trait Codec<R: Record> {
    /// Decode every record in `text`.
    fn decode(text: &str) -> Result<Vec<R>, BoxError>;

    /// Encode `records`, in order, as the complete file contents.
    fn encode(records: &[R]) -> Result<Vec<u8>, BoxError>;
}

/// What reading an absent file means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Absent {
    /// The file must exist; absence is a data access failure.
    Fails,
    /// The collection is empty until the first write creates the file.
    IsEmpty,
}

pub(crate) struct WholeFile<R, C> {
    path: Utf8PathBuf,
    absent: Absent,
    codec: PhantomData<fn() -> (R, C)>,
}

impl<R, C> std::fmt::Debug for WholeFile<R, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WholeFile")
            .field("path", &self.path)
            .field("absent", &self.absent)
            .finish()
    }
}

impl<R: Record, C: Codec<R>> WholeFile<R, C> {
    pub(crate) fn new(path: Utf8PathBuf, absent: Absent) -> Self {
        Self {
            path,
            absent,
            codec: PhantomData,
        }
    }

    pub(crate) fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub(crate) fn load(&self) -> StoreResult<Vec<R>> {
        let text = match self.absent {
            Absent::Fails => rideshare_fs::read_all(&self.path)
                .map_err(|source| StoreError::data_access(R::ENTITY, "read file", source))?,
            Absent::IsEmpty => {
                match rideshare_fs::read_if_exists(&self.path)
                    .map_err(|source| StoreError::data_access(R::ENTITY, "read file", source))?
                {
                    Some(text) => text,
                    None => return Ok(Vec::new()),
                }
            }
        };
        C::decode(&text).map_err(|source| StoreError::data_access(R::ENTITY, "decode file", source))
    }

    pub(crate) fn save(&self, records: &[R]) -> StoreResult<()> {
        let bytes = C::encode(records)
            .map_err(|source| StoreError::data_access(R::ENTITY, "encode file", source))?;
        rideshare_fs::overwrite(&self.path, &bytes)
            .map_err(|source| StoreError::data_access(R::ENTITY, "rewrite file", source))?;
        debug!("rewrote {} with {} {} records", self.path, records.len(), R::ENTITY);
        Ok(())
    }

    pub(crate) fn create(&self, record: &R, ids: &dyn IdGenerator) -> StoreResult<String> {
        let mut records = self.load()?;
        let id = ids.next_id();
        let mut stored = record.clone();
        stored.set_id(id.clone());
        records.push(stored);
        self.save(&records)?;
        Ok(id)
    }

    pub(crate) fn get_by_id(&self, id: &str) -> StoreResult<Option<R>> {
        Ok(self.load()?.into_iter().find(|record| record.id() == id))
    }

    pub(crate) fn update(&self, record: &R) -> StoreResult<()> {
        let mut records = self.load()?;
        let slot = records
            .iter_mut()
            .find(|stored| stored.id() == record.id())
            .ok_or_else(|| StoreError::not_found(R::ENTITY, record.id()))?;
        slot.clone_from(record);
        self.save(&records)
    }

    pub(crate) fn delete(&self, id: &str) -> StoreResult<()> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            return Err(StoreError::not_found(R::ENTITY, id));
        }
        self.save(&records)
    }
}
