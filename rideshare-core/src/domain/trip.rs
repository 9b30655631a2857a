use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// Lifecycle state of a trip.
///
/// Statuses are stored as free text, so unknown values survive a round trip
/// through [`TripStatus::Other`]. An `Other` spelling one of the known
/// statuses is stored and compared as that status.
#[derive(Debug, Clone, Eq, Default)]
pub enum TripStatus {
    /// Published and awaiting departure.
    #[default]
    Scheduled,
    /// Under way.
    InProgress,
    /// Finished; ratings may be left.
    Completed,
    /// Called off by the organiser.
    Cancelled,
    /// Any status this version does not recognise.
    Other(String),
}

const KNOWN: [&str; 4] = ["SCHEDULED", "IN_PROGRESS", "COMPLETED", "CANCELLED"];

fn known(raw: &str) -> Option<&'static str> {
    let upper = raw.trim().to_ascii_uppercase();
    KNOWN.into_iter().find(|name| *name == upper)
}

impl TripStatus {
    /// Stored text for this status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Other(raw) => known(raw).unwrap_or(raw),
        }
    }
}

impl PartialEq for TripStatus {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl From<&str> for TripStatus {
    fn from(raw: &str) -> Self {
        match known(raw) {
            Some("SCHEDULED") => Self::Scheduled,
            Some("IN_PROGRESS") => Self::InProgress,
            Some("COMPLETED") => Self::Completed,
            Some("CANCELLED") => Self::Cancelled,
            _ => Self::Other(raw.to_owned()),
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A published trip.
///
/// `route_id` and `user_id` are filled in by the trip service: the route is
/// created alongside the trip and the organiser is passed explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trip {
    /// Identifier assigned at creation.
    pub id: Option<String>,
    /// Scheduled departure.
    pub departure_time: NaiveDateTime,
    /// Seats offered to passengers.
    pub max_passengers: u32,
    /// Date the trip was published.
    pub creation_date: NaiveDate,
    /// Lifecycle state.
    pub status: TripStatus,
    /// Whether the organiser may still edit the trip.
    pub editable: bool,
    /// Route the trip follows.
    pub route_id: Option<String>,
    /// Organising user.
    pub user_id: Option<String>,
}

impl Trip {
    /// Create an unsaved, editable, scheduled trip.
    #[must_use]
    pub fn new(departure_time: NaiveDateTime, max_passengers: u32, creation_date: NaiveDate) -> Self {
        Self {
            id: None,
            departure_time,
            max_passengers,
            creation_date,
            status: TripStatus::Scheduled,
            editable: true,
            route_id: None,
            user_id: None,
        }
    }

    /// Return the trip with its identifier set.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("SCHEDULED", TripStatus::Scheduled)]
    #[case("completed", TripStatus::Completed)]
    #[case(" In_Progress ", TripStatus::InProgress)]
    #[case("CANCELLED", TripStatus::Cancelled)]
    fn parses_known_statuses(#[case] raw: &str, #[case] expected: TripStatus) {
        assert_eq!(TripStatus::from(raw), expected);
    }

    #[rstest]
    fn keeps_unknown_status_verbatim() {
        let status = TripStatus::from("Delayed by snow");
        assert_eq!(status, TripStatus::Other("Delayed by snow".to_owned()));
        assert_eq!(status.to_string(), "Delayed by snow");
    }

    #[rstest]
    #[case("scheduled", TripStatus::Scheduled)]
    #[case(" completed", TripStatus::Completed)]
    fn other_spelling_a_known_status_is_that_status(
        #[case] raw: &str,
        #[case] expected: TripStatus,
    ) {
        let status = TripStatus::Other(raw.to_owned());
        assert_eq!(status.as_str(), expected.as_str());
        assert_eq!(status, expected);
        assert_eq!(TripStatus::from(status.as_str()), status);
    }
}
