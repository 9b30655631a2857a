use crate::domain::Rating;
use crate::error::ServiceResult;
use crate::record::RatingRecord;
use crate::repository::RatingRepository;

use super::{create_entity, delete_entity, fetch_entity, found_entities, update_entity};

/// Trip rating maintenance.
pub struct RatingService {
    ratings: Box<dyn RatingRepository>,
}

impl RatingService {
    /// Wrap a rating contract.
    #[must_use]
    pub fn new(ratings: Box<dyn RatingRepository>) -> Self {
        Self { ratings }
    }

    /// Store `rating` and return its new identifier.
    ///
    /// Out-of-range scores are accepted or rejected depending on the backend.
    ///
    /// # Errors
    ///
    /// Propagates the backend failure.
    pub fn create_rating(&self, rating: &Rating) -> ServiceResult<String> {
        create_entity(self.ratings.as_ref(), rating)
    }

    /// Fetch a rating by identifier; `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Fails on malformed identifiers or unreadable storage.
    pub fn get_rating(&self, id: &str) -> ServiceResult<Option<Rating>> {
        fetch_entity(self.ratings.as_ref(), id)
    }

    /// Replace the stored rating carrying `rating.id`.
    ///
    /// # Errors
    ///
    /// Fails when the rating has no identifier or is not stored.
    pub fn update_rating(&self, rating: &Rating) -> ServiceResult<()> {
        update_entity(self.ratings.as_ref(), rating, rating.id.as_ref())
    }

    /// Remove the rating stored under `id`.
    ///
    /// # Errors
    ///
    /// Fails when no such rating is stored, or with `NotSupported` on the
    /// tree-file backend.
    pub fn delete_rating(&self, id: &str) -> ServiceResult<()> {
        delete_entity::<RatingRecord, _>(self.ratings.as_ref(), id)
    }

    /// Ratings left for `trip_id`.
    ///
    /// # Errors
    ///
    /// Fails with `NotSupported` unless the relational backend is active.
    pub fn find_ratings_by_trip(&self, trip_id: &str) -> ServiceResult<Vec<Rating>> {
        found_entities(self.ratings.find_by_trip(trip_id), "find by trip")
    }
}
