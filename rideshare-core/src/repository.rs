//! Entity contracts implemented by every storage backend.
//!
//! [`Repository`] carries the create/read/update/delete operations every
//! backend provides. The per-entity traits add finders, which are optional
//! capabilities: their default bodies fail with
//! [`StoreError::NotSupported`] and most backends keep those defaults.
//! Callers must be prepared for that outcome.
//!
//! Contracts are synchronous and blocking. No operation takes a lock;
//! whatever atomicity exists comes from the medium itself.

use chrono::NaiveDate;

use crate::error::{StoreError, StoreResult};
use crate::record::{BookingRecord, Entity, RatingRecord, Record, RouteRecord, TripRecord, UserRecord};

/// Operations every backend provides for a record type.
pub trait Repository<R: Record> {
    /// Persist `record` under a fresh identifier and return that identifier.
    ///
    /// Any identifier already present on `record` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DataAccess`] when the medium rejects the write.
    fn create(&self, record: &R) -> StoreResult<String>;

    /// Fetch the record stored under `id`.
    ///
    /// A missing identifier yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidIdentifier`] when `id` cannot be parsed
    /// by the medium, or [`StoreError::DataAccess`] when reading fails.
    fn get_by_id(&self, id: &str) -> StoreResult<Option<R>>;

    /// Replace the stored record carrying `record.id()` in full.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no record has that identifier.
    fn update(&self, record: &R) -> StoreResult<()>;

    /// Remove the record stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no record has that identifier.
    fn delete(&self, id: &str) -> StoreResult<()>;
}

/// Contract for user storage.
pub trait UserRepository: Repository<UserRecord> {}

/// Contract for route storage.
pub trait RouteRepository: Repository<RouteRecord> {
    /// Routes whose date lies within `from..=to`.
    ///
    /// # Errors
    ///
    /// Not supported by any shipped backend.
    fn find_by_date_range(&self, from: NaiveDate, to: NaiveDate) -> StoreResult<Vec<RouteRecord>> {
        let _ = (from, to);
        Err(StoreError::not_supported(Entity::Route, "find_by_date_range"))
    }
}

/// Contract for trip storage.
pub trait TripRepository: Repository<TripRecord> {
    /// Trips organised by `user_id`.
    ///
    /// # Errors
    ///
    /// Not supported by any shipped backend.
    fn find_by_user(&self, user_id: &str) -> StoreResult<Vec<TripRecord>> {
        let _ = user_id;
        Err(StoreError::not_supported(Entity::Trip, "find_by_user"))
    }

    /// Trips whose status equals `status`.
    ///
    /// # Errors
    ///
    /// Not supported by any shipped backend.
    fn find_by_status(&self, status: &str) -> StoreResult<Vec<TripRecord>> {
        let _ = status;
        Err(StoreError::not_supported(Entity::Trip, "find_by_status"))
    }
}

/// Contract for booking storage.
pub trait BookingRepository: Repository<BookingRecord> {
    /// Bookings made by `user_id`.
    ///
    /// # Errors
    ///
    /// Not supported by any shipped backend.
    fn find_by_user(&self, user_id: &str) -> StoreResult<Vec<BookingRecord>> {
        let _ = user_id;
        Err(StoreError::not_supported(Entity::Booking, "find_by_user"))
    }

    /// Bookings against `trip_id`.
    ///
    /// # Errors
    ///
    /// Supported only by the relational backend.
    fn find_by_trip(&self, trip_id: &str) -> StoreResult<Vec<BookingRecord>> {
        let _ = trip_id;
        Err(StoreError::not_supported(Entity::Booking, "find_by_trip"))
    }
}

/// Contract for rating storage.
pub trait RatingRepository: Repository<RatingRecord> {
    /// Ratings left for `trip_id`.
    ///
    /// # Errors
    ///
    /// Supported only by the relational backend.
    fn find_by_trip(&self, trip_id: &str) -> StoreResult<Vec<RatingRecord>> {
        let _ = trip_id;
        Err(StoreError::not_supported(Entity::Rating, "find_by_trip"))
    }
}

/// One contract implementation per entity, all from the same backend family.
pub struct Repositories {
    /// User storage.
    pub users: Box<dyn UserRepository>,
    /// Route storage.
    pub routes: Box<dyn RouteRepository>,
    /// Trip storage.
    pub trips: Box<dyn TripRepository>,
    /// Booking storage.
    pub bookings: Box<dyn BookingRepository>,
    /// Rating storage.
    pub ratings: Box<dyn RatingRepository>,
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}
