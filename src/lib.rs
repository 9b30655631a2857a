//! Facade crate for ride-sharing administration.
//!
//! This crate re-exports the domain types, entity services and storage
//! contracts, and exposes the backend families behind feature flags.
//!
//! ```no_run
//! use rideshare::{Services, StoreConfig, open_repositories};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let services = Services::new(open_repositories(&StoreConfig::default())?);
//! let user = services.users.get_user("5b2ff1a0-5e4c-4d8e-9c53-3f1b0a2f8c11")?;
//! assert!(user.is_none());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub use rideshare_core::{
    Booking, BookingRepository, BookingService, BookingStatus, CompositeOperation, Entity,
    ErrorKind, RatingRepository, RatingService, Rating, Repositories, Repository, Route,
    RouteRepository, RouteService, ServiceError, ServiceResult, Services, StoreError,
    StoreResult, Trip, TripRepository, TripService, TripStatus, User, UserRepository,
    UserService,
};

pub use rideshare_store::{
    BackendKind, CsvRepository, DocumentCollection, DocumentRepository, JsonRepository,
    SelectorError, StoreConfig, UnknownBackend, open_repositories,
};

#[cfg(feature = "store-sqlite")]
pub use rideshare_store::SqliteRepository;

#[cfg(feature = "store-mongodb")]
pub use rideshare_store::document::mongo::{connect as connect_mongodb, mongo_repositories};
