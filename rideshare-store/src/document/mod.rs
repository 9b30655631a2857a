//! Document-store backend: one collection per entity, keyed by the store's
//! native [`ObjectId`].
//!
//! Records are written without their `id` field; the store assigns `_id`
//! and its 24-digit hex form becomes the external identifier. Identifiers
//! that do not parse as an [`ObjectId`] are rejected as invalid before any
//! round trip. Before writing, the adapter rejects rating scores outside
//! 1 to 5 and bookings for zero seats.

use std::marker::PhantomData;

use bson::oid::ObjectId;
use bson::{Bson, Document};
use log::{debug, warn};
use rideshare_core::domain::RATING_SCORE_RANGE;
use rideshare_core::{
    BookingRecord, BookingRepository, Entity, RatingRecord, RatingRepository, Record,
    Repositories, Repository, RouteRecord, RouteRepository, StoreError, StoreResult, TripRecord,
    TripRepository, UserRecord, UserRepository,
};
use thiserror::Error;

mod collection;
#[cfg(any(test, feature = "test-support"))]
mod memory;
#[cfg(feature = "store-mongodb")]
pub mod mongo;

pub use collection::DocumentCollection;
#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryCollection;

const ID_FIELD: &str = "id";
const KEY_FIELD: &str = "_id";

/// A record value the document adapter refuses to write.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("constraint violation: {0}")]
pub struct ConstraintViolation(pub String);

/// Write-time checks applied by the document family.
pub trait DocumentRecord: Record {
    /// Describe why `self` must not be written, if it must not.
    fn violation(&self) -> Option<ConstraintViolation> {
        None
    }
}

impl DocumentRecord for UserRecord {}
impl DocumentRecord for RouteRecord {}
impl DocumentRecord for TripRecord {}

impl DocumentRecord for BookingRecord {
    fn violation(&self) -> Option<ConstraintViolation> {
        (self.seat_count == 0).then(|| ConstraintViolation("a booking must reserve at least one seat".to_owned()))
    }
}

impl DocumentRecord for RatingRecord {
    fn violation(&self) -> Option<ConstraintViolation> {
        (!RATING_SCORE_RANGE.contains(&self.score)).then(|| {
            ConstraintViolation(format!(
                "rating score {} is outside {}..={}",
                self.score,
                RATING_SCORE_RANGE.start(),
                RATING_SCORE_RANGE.end()
            ))
        })
    }
}

/// Contract implementation over one document collection.
pub struct DocumentRepository<R, C> {
    collection: C,
    record: PhantomData<fn() -> R>,
}

impl<R, C: std::fmt::Debug> std::fmt::Debug for DocumentRepository<R, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentRepository")
            .field("collection", &self.collection)
            .finish()
    }
}

impl<R: DocumentRecord, C: DocumentCollection> DocumentRepository<R, C> {
    /// Store `R` records in `collection`.
    pub const fn new(collection: C) -> Self {
        Self {
            collection,
            record: PhantomData,
        }
    }

    fn parse_id(id: &str) -> StoreResult<ObjectId> {
        ObjectId::parse_str(id).map_err(|err| StoreError::invalid_identifier(R::ENTITY, id, err))
    }

    fn to_document(record: &R, operation: &'static str) -> StoreResult<Document> {
        if let Some(violation) = record.violation() {
            warn!("refusing to {operation} {}: {violation}", R::ENTITY);
            return Err(StoreError::data_access(R::ENTITY, operation, violation));
        }
        let mut document = bson::to_document(record)
            .map_err(|source| StoreError::data_access(R::ENTITY, "encode document", source))?;
        document.remove(ID_FIELD);
        Ok(document)
    }

    fn from_document(mut document: Document) -> StoreResult<R> {
        let key = document.remove(KEY_FIELD);
        let id = match key {
            Some(Bson::ObjectId(oid)) => oid.to_hex(),
            Some(Bson::String(text)) => text,
            other => {
                return Err(StoreError::data_access(
                    R::ENTITY,
                    "decode document",
                    format!("document key {other:?} is not an object id"),
                ));
            }
        };
        document.insert(ID_FIELD, id);
        bson::from_document(document)
            .map_err(|source| StoreError::data_access(R::ENTITY, "decode document", source))
    }
}

impl<R: DocumentRecord, C: DocumentCollection> Repository<R> for DocumentRepository<R, C> {
    fn create(&self, record: &R) -> StoreResult<String> {
        let document = Self::to_document(record, "insert")?;
        let id = self
            .collection
            .insert_one(document)
            .map_err(|source| StoreError::data_access(R::ENTITY, "insert", source))?;
        debug!("inserted {} document {id}", R::ENTITY);
        Ok(id.to_hex())
    }

    fn get_by_id(&self, id: &str) -> StoreResult<Option<R>> {
        let key = Self::parse_id(id)?;
        self.collection
            .find_by_id(key)
            .map_err(|source| StoreError::data_access(R::ENTITY, "find", source))?
            .map(Self::from_document)
            .transpose()
    }

    fn update(&self, record: &R) -> StoreResult<()> {
        let key = Self::parse_id(record.id())?;
        let document = Self::to_document(record, "replace")?;
        let matched = self
            .collection
            .replace_by_id(key, document)
            .map_err(|source| StoreError::data_access(R::ENTITY, "replace", source))?;
        if matched == 0 {
            return Err(StoreError::not_found(R::ENTITY, record.id()));
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        let key = Self::parse_id(id)?;
        let deleted = self
            .collection
            .delete_by_id(key)
            .map_err(|source| StoreError::data_access(R::ENTITY, "delete", source))?;
        if deleted == 0 {
            return Err(StoreError::not_found(R::ENTITY, id));
        }
        Ok(())
    }
}

impl<C: DocumentCollection> UserRepository for DocumentRepository<UserRecord, C> {}
impl<C: DocumentCollection> RouteRepository for DocumentRepository<RouteRecord, C> {}
impl<C: DocumentCollection> TripRepository for DocumentRepository<TripRecord, C> {}
impl<C: DocumentCollection> BookingRepository for DocumentRepository<BookingRecord, C> {}
impl<C: DocumentCollection> RatingRepository for DocumentRepository<RatingRecord, C> {}

/// Wire every entity contract to the collection `open` returns for it.
pub fn open_repositories<C, F>(open: F) -> Repositories
where
    C: DocumentCollection + 'static,
    F: Fn(Entity) -> C,
{
    Repositories {
        users: Box::new(DocumentRepository::<UserRecord, C>::new(open(Entity::User))),
        routes: Box::new(DocumentRepository::<RouteRecord, C>::new(open(Entity::Route))),
        trips: Box::new(DocumentRepository::<TripRecord, C>::new(open(Entity::Trip))),
        bookings: Box::new(DocumentRepository::<BookingRecord, C>::new(open(Entity::Booking))),
        ratings: Box::new(DocumentRepository::<RatingRecord, C>::new(open(Entity::Rating))),
    }
}
