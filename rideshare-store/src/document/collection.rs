use bson::Document;
use bson::oid::ObjectId;
use rideshare_core::error::BoxError;

/// Single-document operations the document adapters need from a store.
///
/// Each call is atomic at the store level; nothing spans two documents.
pub trait DocumentCollection {
    /// Insert `document` and return the identifier the store assigned.
    ///
    /// # Errors
    ///
    /// Propagates driver failures.
    fn insert_one(&self, document: Document) -> Result<ObjectId, BoxError>;

    /// Fetch the document whose `_id` is `id`.
    ///
    /// # Errors
    ///
    /// Propagates driver failures.
    fn find_by_id(&self, id: ObjectId) -> Result<Option<Document>, BoxError>;

    /// Replace the document whose `_id` is `id`, returning how many matched.
    ///
    /// # Errors
    ///
    /// Propagates driver failures.
    fn replace_by_id(&self, id: ObjectId, document: Document) -> Result<u64, BoxError>;

    /// Delete the document whose `_id` is `id`, returning how many were
    /// removed.
    ///
    /// # Errors
    ///
    /// Propagates driver failures.
    fn delete_by_id(&self, id: ObjectId) -> Result<u64, BoxError>;
}
