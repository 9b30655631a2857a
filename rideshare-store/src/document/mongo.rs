//! `DocumentCollection` over the synchronous MongoDB driver.

use bson::oid::ObjectId;
use bson::{Document, doc};
use mongodb::sync::{Client, Collection, Database};
use rideshare_core::error::BoxError;
use rideshare_core::{Entity, Repositories};

use super::{DocumentCollection, open_repositories};

impl DocumentCollection for Collection<Document> {
    fn insert_one(&self, document: Document) -> Result<ObjectId, BoxError> {
        let inserted = Collection::insert_one(self, document, None)?;
        inserted
            .inserted_id
            .as_object_id()
            .ok_or_else(|| format!("store assigned a non-ObjectId key {}", inserted.inserted_id).into())
    }

    fn find_by_id(&self, id: ObjectId) -> Result<Option<Document>, BoxError> {
        Ok(self.find_one(doc! { "_id": id }, None)?)
    }

    fn replace_by_id(&self, id: ObjectId, document: Document) -> Result<u64, BoxError> {
        let outcome = self.replace_one(doc! { "_id": id }, document, None)?;
        Ok(outcome.matched_count)
    }

    fn delete_by_id(&self, id: ObjectId) -> Result<u64, BoxError> {
        let outcome = self.delete_one(doc! { "_id": id }, None)?;
        Ok(outcome.deleted_count)
    }
}

/// Connect to `uri` and return the named database handle.
///
/// The driver connects lazily; the first operation reports an unreachable
/// server.
///
/// # Errors
///
/// Fails when `uri` is not a valid connection string.
pub fn connect(uri: &str, database: &str) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_uri_str(uri)?;
    Ok(client.database(database))
}

/// Wire every entity contract to a collection of `database`.
#[must_use]
pub fn mongo_repositories(database: &Database) -> Repositories {
    open_repositories(|entity: Entity| database.collection::<Document>(entity.collection_name()))
}
