use crate::domain::Booking;
use crate::error::ServiceResult;
use crate::record::BookingRecord;
use crate::repository::BookingRepository;

use super::{create_entity, delete_entity, fetch_entity, found_entities, update_entity};

/// Seat booking maintenance.
pub struct BookingService {
    bookings: Box<dyn BookingRepository>,
}

impl BookingService {
    /// Wrap a booking contract.
    #[must_use]
    pub fn new(bookings: Box<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    /// Store `booking` and return its new identifier.
    ///
    /// # Errors
    ///
    /// Propagates the backend failure, including seat-count rejections on
    /// backends that validate them.
    pub fn create_booking(&self, booking: &Booking) -> ServiceResult<String> {
        create_entity(self.bookings.as_ref(), booking)
    }

    /// Fetch a booking by identifier; `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Fails on malformed identifiers or unreadable storage.
    pub fn get_booking(&self, id: &str) -> ServiceResult<Option<Booking>> {
        fetch_entity(self.bookings.as_ref(), id)
    }

    /// Replace the stored booking carrying `booking.id`.
    ///
    /// # Errors
    ///
    /// Fails when the booking has no identifier or is not stored.
    pub fn update_booking(&self, booking: &Booking) -> ServiceResult<()> {
        update_entity(self.bookings.as_ref(), booking, booking.id.as_ref())
    }

    /// Remove the booking stored under `id`.
    ///
    /// # Errors
    ///
    /// Fails when no such booking is stored.
    pub fn delete_booking(&self, id: &str) -> ServiceResult<()> {
        delete_entity::<BookingRecord, _>(self.bookings.as_ref(), id)
    }

    /// Bookings made by `user_id`.
    ///
    /// # Errors
    ///
    /// Fails with `NotSupported` on every shipped backend.
    pub fn find_bookings_by_user(&self, user_id: &str) -> ServiceResult<Vec<Booking>> {
        found_entities(self.bookings.find_by_user(user_id), "find by user")
    }

    /// Bookings against `trip_id`.
    ///
    /// # Errors
    ///
    /// Fails with `NotSupported` unless the relational backend is active.
    pub fn find_bookings_by_trip(&self, trip_id: &str) -> ServiceResult<Vec<Booking>> {
        found_entities(self.bookings.find_by_trip(trip_id), "find by trip")
    }
}
