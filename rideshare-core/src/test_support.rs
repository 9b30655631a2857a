//! Test-only contract implementations and sample entities.
//!
//! [`MemoryRepository`] keeps records in a shared vector so clones observe
//! each other's writes, which lets a test hand one clone to a service and
//! inspect another. [`FailingTrips`] injects trip-write failures for the
//! composite trip scenarios.

use std::{cell::RefCell, io, rc::Rc};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::domain::{Route, Trip};
use crate::error::{StoreError, StoreResult};
use crate::identity::new_record_id;
use crate::record::{BookingRecord, RatingRecord, Record, RouteRecord, TripRecord, UserRecord};
use crate::repository::{
    BookingRepository, RatingRepository, Repositories, Repository, RouteRepository,
    TripRepository, UserRepository,
};

/// In-memory contract implementation with the same not-found semantics as
/// the file backends.
#[derive(Debug)]
pub struct MemoryRepository<R> {
    records: Rc<RefCell<Vec<R>>>,
}

impl<R> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self {
            records: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<R> Clone for MemoryRepository<R> {
    fn clone(&self) -> Self {
        Self {
            records: Rc::clone(&self.records),
        }
    }
}

impl<R: Record> MemoryRepository<R> {
    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl<R: Record> Repository<R> for MemoryRepository<R> {
    fn create(&self, record: &R) -> StoreResult<String> {
        let id = new_record_id();
        let mut stored = record.clone();
        stored.set_id(id.clone());
        self.records.borrow_mut().push(stored);
        Ok(id)
    }

    fn get_by_id(&self, id: &str) -> StoreResult<Option<R>> {
        Ok(self
            .records
            .borrow()
            .iter()
            .find(|record| record.id() == id)
            .cloned())
    }

    fn update(&self, record: &R) -> StoreResult<()> {
        let mut records = self.records.borrow_mut();
        let slot = records
            .iter_mut()
            .find(|stored| stored.id() == record.id())
            .ok_or_else(|| StoreError::not_found(R::ENTITY, record.id()))?;
        *slot = record.clone();
        Ok(())
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        let mut records = self.records.borrow_mut();
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            return Err(StoreError::not_found(R::ENTITY, id));
        }
        Ok(())
    }
}

impl UserRepository for MemoryRepository<UserRecord> {}
impl RouteRepository for MemoryRepository<RouteRecord> {}
impl TripRepository for MemoryRepository<TripRecord> {}
impl BookingRepository for MemoryRepository<BookingRecord> {}
impl RatingRepository for MemoryRepository<RatingRecord> {}

/// Shared in-memory stores for every entity.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    /// Stored users.
    pub users: MemoryRepository<UserRecord>,
    /// Stored routes.
    pub routes: MemoryRepository<RouteRecord>,
    /// Stored trips.
    pub trips: MemoryRepository<TripRecord>,
    /// Stored bookings.
    pub bookings: MemoryRepository<BookingRecord>,
    /// Stored ratings.
    pub ratings: MemoryRepository<RatingRecord>,
}

impl MemoryBackend {
    /// Contracts over these stores.
    #[must_use]
    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Box::new(self.users.clone()),
            routes: Box::new(self.routes.clone()),
            trips: Box::new(self.trips.clone()),
            bookings: Box::new(self.bookings.clone()),
            ratings: Box::new(self.ratings.clone()),
        }
    }

    /// Contracts over these stores whose trip writes always fail.
    #[must_use]
    pub fn repositories_with_failing_trips(&self) -> Repositories {
        Repositories {
            trips: Box::new(FailingTrips::new(self.trips.clone())),
            ..self.repositories()
        }
    }
}

/// Trip contract whose writes fail with a data access error while reads
/// are served by the wrapped store.
#[derive(Debug, Clone)]
pub struct FailingTrips {
    inner: MemoryRepository<TripRecord>,
}

impl FailingTrips {
    /// Wrap `inner`, rejecting every write.
    #[must_use]
    pub const fn new(inner: MemoryRepository<TripRecord>) -> Self {
        Self { inner }
    }

    fn rejected(operation: &'static str) -> StoreError {
        StoreError::data_access(
            TripRecord::ENTITY,
            operation,
            io::Error::other("trip storage rejected the write"),
        )
    }
}

impl Repository<TripRecord> for FailingTrips {
    fn create(&self, _record: &TripRecord) -> StoreResult<String> {
        Err(Self::rejected("insert"))
    }

    fn get_by_id(&self, id: &str) -> StoreResult<Option<TripRecord>> {
        self.inner.get_by_id(id)
    }

    fn update(&self, _record: &TripRecord) -> StoreResult<()> {
        Err(Self::rejected("update"))
    }

    fn delete(&self, _id: &str) -> StoreResult<()> {
        Err(Self::rejected("delete"))
    }
}

impl TripRepository for FailingTrips {}

/// Fixed travel date used by the samples.
#[must_use]
pub fn sample_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default()
}

/// Moscow to Saint-Petersburg, 600 minutes.
#[must_use]
pub fn sample_route() -> Route {
    Route::new(
        "Moscow",
        "Saint-Petersburg",
        sample_date(),
        TimeDelta::minutes(600),
    )
}

/// Scheduled trip for four passengers departing a day after the sample date.
#[must_use]
pub fn sample_trip() -> Trip {
    let departure: NaiveDateTime = sample_date()
        .and_hms_opt(9, 0, 0)
        .unwrap_or_default()
        + TimeDelta::days(1);
    Trip::new(departure, 4, sample_date())
}
