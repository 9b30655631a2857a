//! Core domain types, storage contracts and services for ride-sharing
//! administration.
//!
//! Callers work with the domain entities in [`domain`] through the services
//! in [`service`]. Services map those entities to the flat storage shapes in
//! [`record`] and hand them to whichever backend implements the contracts in
//! [`repository`]. Backends live in separate crates; this crate never touches
//! a storage medium directly.
#![forbid(unsafe_code)]

pub mod domain;
pub mod error;
pub mod identity;
pub mod mapper;
pub mod record;
pub mod repository;
pub mod service;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use domain::{Booking, BookingStatus, Rating, Route, Trip, TripStatus, User};
pub use error::{ErrorKind, ServiceError, ServiceResult, StoreError, StoreResult};
pub use identity::{IdGenerator, UuidGenerator, new_record_id};
pub use mapper::MappingError;
pub use record::{BookingRecord, Entity, RatingRecord, Record, RouteRecord, TripRecord, UserRecord};
pub use repository::{
    BookingRepository, RatingRepository, Repositories, Repository, RouteRepository,
    TripRepository, UserRepository,
};
pub use service::{
    BookingService, CompositeOperation, RatingService, RouteService, Services, TripService,
    UserService,
};
