use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use bson::Document;
use bson::oid::ObjectId;
use rideshare_core::error::BoxError;

use super::DocumentCollection;

/// Document collection held in memory. Clones share the same documents.
#[derive(Debug, Default, Clone)]
pub struct MemoryCollection {
    documents: Rc<RefCell<BTreeMap<ObjectId, Document>>>,
}

impl MemoryCollection {
    /// Number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.borrow().len()
    }

    /// Whether the collection holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.borrow().is_empty()
    }

    /// Raw stored form of the document under `id`, including `_id`.
    #[must_use]
    pub fn raw(&self, id: ObjectId) -> Option<Document> {
        self.documents.borrow().get(&id).cloned()
    }
}

impl DocumentCollection for MemoryCollection {
    fn insert_one(&self, mut document: Document) -> Result<ObjectId, BoxError> {
        let id = ObjectId::new();
        document.insert("_id", id);
        self.documents.borrow_mut().insert(id, document);
        Ok(id)
    }

    fn find_by_id(&self, id: ObjectId) -> Result<Option<Document>, BoxError> {
        Ok(self.raw(id))
    }

    fn replace_by_id(&self, id: ObjectId, mut document: Document) -> Result<u64, BoxError> {
        let mut documents = self.documents.borrow_mut();
        let Some(slot) = documents.get_mut(&id) else {
            return Ok(0);
        };
        document.insert("_id", id);
        *slot = document;
        Ok(1)
    }

    fn delete_by_id(&self, id: ObjectId) -> Result<u64, BoxError> {
        Ok(u64::from(self.documents.borrow_mut().remove(&id).is_some()))
    }
}
