//! Storage-oriented record shapes.
//!
//! Records are the flat form every backend persists. They carry identifiers
//! and references as plain strings so each medium can decide how to encode
//! them. A record whose `id` is empty has not been created yet; `create`
//! ignores whatever identifier it carries.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// The five entity collections managed by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    /// Registered users.
    User,
    /// Start/end point pairs owned by trips.
    Route,
    /// Published trips.
    Trip,
    /// Seat bookings against trips.
    Booking,
    /// Ratings left for completed trips.
    Rating,
}

impl Entity {
    /// Every entity, in dependency order.
    pub const ALL: [Self; 5] = [
        Self::User,
        Self::Route,
        Self::Trip,
        Self::Booking,
        Self::Rating,
    ];

    /// Name of the collection, file stem or table holding this entity.
    #[must_use]
    pub const fn collection_name(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Route => "routes",
            Self::Trip => "trips",
            Self::Booking => "bookings",
            Self::Rating => "ratings",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::User => "user",
            Self::Route => "route",
            Self::Trip => "trip",
            Self::Booking => "booking",
            Self::Rating => "rating",
        };
        f.write_str(name)
    }
}

/// Behaviour shared by every storage record.
pub trait Record: Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + 'static {
    /// Collection this record belongs to.
    const ENTITY: Entity;

    /// Serialised field names in declaration order, `id` first.
    const FIELDS: &'static [&'static str];

    /// Identifier of the record; empty before creation.
    fn id(&self) -> &str;

    /// Replace the identifier, typically with the one `create` returned.
    fn set_id(&mut self, id: String);
}

macro_rules! impl_record {
    ($record:ty, $entity:expr, [$($field:literal),+ $(,)?]) => {
        impl Record for $record {
            const ENTITY: Entity = $entity;
            const FIELDS: &'static [&'static str] = &[$($field),+];

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        }
    };
}

/// Flat storage form of a user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Password, stored as given.
    pub password: String,
    /// Free-text gender.
    pub gender: String,
    /// Contact phone number.
    pub phone: String,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Postal address.
    pub address: String,
    /// Free-text travel preferences.
    pub preferences: String,
}

/// Flat storage form of a route.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RouteRecord {
    /// Unique identifier.
    pub id: String,
    /// Where the trip starts.
    pub start_point: String,
    /// Where the trip ends.
    pub end_point: String,
    /// Travel date.
    pub date: NaiveDate,
    /// Estimated travel time in minutes.
    pub estimated_duration_minutes: i64,
}

/// Flat storage form of a trip.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TripRecord {
    /// Unique identifier.
    pub id: String,
    /// Scheduled departure.
    pub departure_time: NaiveDateTime,
    /// Seats offered to passengers.
    pub max_passengers: u32,
    /// Date the trip was published.
    pub creation_date: NaiveDate,
    /// Free-text status, e.g. `SCHEDULED`.
    pub status: String,
    /// Whether the organiser may still edit the trip.
    pub editable: bool,
    /// Identifier of the trip's route.
    pub route_id: String,
    /// Identifier of the organising user.
    pub user_id: String,
}

/// Flat storage form of a booking.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookingRecord {
    /// Unique identifier.
    pub id: String,
    /// Seats reserved.
    pub seat_count: u32,
    /// Free-text status, e.g. `CONFIRMED`.
    pub status: String,
    /// Date the booking was made.
    pub booking_date: NaiveDate,
    /// Passenger passport number.
    pub passport_number: String,
    /// Passenger passport expiry.
    pub passport_expiry_date: NaiveDate,
    /// Identifier of the booked trip.
    pub trip_id: String,
    /// Identifier of the passenger.
    pub user_id: String,
}

/// Flat storage form of a rating.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RatingRecord {
    /// Unique identifier.
    pub id: String,
    /// Score, nominally between 1 and 5.
    pub score: i32,
    /// Free-text comment.
    pub comment: String,
    /// Date the rating was left.
    pub date: NaiveDate,
    /// Identifier of the rated trip.
    pub trip_id: String,
}

impl_record!(
    UserRecord,
    Entity::User,
    [
        "id",
        "name",
        "email",
        "password",
        "gender",
        "phone",
        "birth_date",
        "address",
        "preferences",
    ]
);
impl_record!(
    RouteRecord,
    Entity::Route,
    [
        "id",
        "start_point",
        "end_point",
        "date",
        "estimated_duration_minutes",
    ]
);
impl_record!(
    TripRecord,
    Entity::Trip,
    [
        "id",
        "departure_time",
        "max_passengers",
        "creation_date",
        "status",
        "editable",
        "route_id",
        "user_id",
    ]
);
impl_record!(
    BookingRecord,
    Entity::Booking,
    [
        "id",
        "seat_count",
        "status",
        "booking_date",
        "passport_number",
        "passport_expiry_date",
        "trip_id",
        "user_id",
    ]
);
impl_record!(
    RatingRecord,
    Entity::Rating,
    ["id", "score", "comment", "date", "trip_id"]
);
