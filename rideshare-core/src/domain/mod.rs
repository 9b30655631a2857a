//! Domain entities handed to and returned from the services.
//!
//! These are richer than the storage records: identifiers are optional
//! until the storage layer assigns one, durations are typed and statuses are
//! enumerated. Conversions to and from records live in [`crate::mapper`].

mod booking;
mod rating;
mod route;
mod trip;
mod user;

pub use booking::{Booking, BookingStatus};
pub use rating::{RATING_SCORE_RANGE, Rating};
pub use route::Route;
pub use trip::{Trip, TripStatus};
pub use user::User;
