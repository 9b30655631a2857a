use std::fmt;

use chrono::NaiveDate;

/// State of a seat booking.
///
/// An `Other` spelling one of the known states is stored and compared as
/// that state.
#[derive(Debug, Clone, Eq, Default)]
pub enum BookingStatus {
    /// Requested but not yet accepted.
    #[default]
    Pending,
    /// Accepted by the organiser.
    Confirmed,
    /// Withdrawn by either side.
    Cancelled,
    /// Any status this version does not recognise.
    Other(String),
}

const KNOWN: [&str; 3] = ["PENDING", "CONFIRMED", "CANCELLED"];

fn known(raw: &str) -> Option<&'static str> {
    let upper = raw.trim().to_ascii_uppercase();
    KNOWN.into_iter().find(|name| *name == upper)
}

impl BookingStatus {
    /// Stored text for this status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Other(raw) => known(raw).unwrap_or(raw),
        }
    }
}

impl PartialEq for BookingStatus {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl From<&str> for BookingStatus {
    fn from(raw: &str) -> Self {
        match known(raw) {
            Some("PENDING") => Self::Pending,
            Some("CONFIRMED") => Self::Confirmed,
            Some("CANCELLED") => Self::Cancelled,
            _ => Self::Other(raw.to_owned()),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seats reserved by a passenger on a trip.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Booking {
    /// Identifier assigned at creation.
    pub id: Option<String>,
    /// Seats reserved.
    pub seat_count: u32,
    /// Booking state.
    pub status: BookingStatus,
    /// Date the booking was made.
    pub booking_date: NaiveDate,
    /// Passenger passport number.
    pub passport_number: String,
    /// Passenger passport expiry.
    pub passport_expiry_date: NaiveDate,
    /// Booked trip.
    pub trip_id: String,
    /// Passenger.
    pub user_id: String,
}

impl Booking {
    /// Return the booking with its identifier set.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}
