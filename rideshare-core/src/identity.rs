//! Identifier generation for backends that do not assign identity in the
//! storage medium.

use uuid::Uuid;

/// Produce a fresh identifier: a random v4 UUID in hyphenated lowercase.
///
/// # Examples
///
/// ```
/// use rideshare_core::new_record_id;
///
/// let first = new_record_id();
/// let second = new_record_id();
/// assert_eq!(first.len(), 36);
/// assert_ne!(first, second);
/// ```
#[must_use]
pub fn new_record_id() -> String {
    Uuid::new_v4().hyphenated().to_string()
}

/// Source of identifiers for newly created records.
pub trait IdGenerator {
    /// Return an identifier that has never been issued before.
    fn next_id(&self) -> String;
}

/// Default generator backed by [`new_record_id`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        new_record_id()
    }
}
