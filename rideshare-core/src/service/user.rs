use crate::domain::User;
use crate::error::ServiceResult;
use crate::record::UserRecord;
use crate::repository::UserRepository;

use super::{create_entity, delete_entity, fetch_entity, update_entity};

/// User registration and maintenance.
pub struct UserService {
    users: Box<dyn UserRepository>,
}

impl UserService {
    /// Wrap a user contract.
    #[must_use]
    pub fn new(users: Box<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Register `user` and return its new identifier.
    ///
    /// # Errors
    ///
    /// Propagates the backend failure, translated to a service error.
    pub fn create_user(&self, user: &User) -> ServiceResult<String> {
        create_entity(self.users.as_ref(), user)
    }

    /// Fetch a user by identifier; `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Fails on malformed identifiers or unreadable storage.
    pub fn get_user(&self, id: &str) -> ServiceResult<Option<User>> {
        fetch_entity(self.users.as_ref(), id)
    }

    /// Replace the stored user carrying `user.id`.
    ///
    /// # Errors
    ///
    /// Fails when the user has no identifier or is not stored.
    pub fn update_user(&self, user: &User) -> ServiceResult<()> {
        update_entity(self.users.as_ref(), user, user.id.as_ref())
    }

    /// Remove the user stored under `id`.
    ///
    /// # Errors
    ///
    /// Fails when no such user is stored.
    pub fn delete_user(&self, id: &str) -> ServiceResult<()> {
        delete_entity::<UserRecord, _>(self.users.as_ref(), id)
    }
}
