//! Conversions between domain entities and storage records.
//!
//! Every backend shares these conversions; none of them touches storage.
//! An absent identifier maps to an empty string and back.

use chrono::TimeDelta;
use thiserror::Error;

use crate::domain::{Booking, BookingStatus, Rating, Route, Trip, TripStatus, User};
use crate::record::{BookingRecord, RatingRecord, Record, RouteRecord, TripRecord, UserRecord};

/// Errors raised when a stored record cannot be represented in the domain.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    /// The stored duration does not fit a [`TimeDelta`].
    #[error("route {route_id} has an out-of-range duration of {minutes} minutes")]
    DurationOutOfRange {
        /// Route carrying the duration.
        route_id: String,
        /// Stored minutes.
        minutes: i64,
    },
    /// Routes are stored in whole minutes and this duration is not one.
    #[error("route {route_id} duration of {seconds}s is not a whole number of minutes")]
    FractionalDuration {
        /// Route carrying the duration; empty before creation.
        route_id: String,
        /// Whole seconds of the rejected duration.
        seconds: i64,
    },
}

/// Pairs a domain entity with its storage record.
pub trait RecordMapping: Sized {
    /// Storage shape of the entity.
    type Record: Record;

    /// Flatten the entity into its record.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError`] when a value has no exact stored form.
    fn to_record(&self) -> Result<Self::Record, MappingError>;

    /// Rebuild the entity from a stored record.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError`] when the record holds a value the domain
    /// type cannot represent.
    fn from_record(record: Self::Record) -> Result<Self, MappingError>;
}

fn id_from_record(id: String) -> Option<String> {
    if id.is_empty() { None } else { Some(id) }
}

fn id_to_record(id: Option<&String>) -> String {
    id.cloned().unwrap_or_default()
}

fn whole_minutes(route: &Route) -> Result<i64, MappingError> {
    let duration = route.estimated_duration;
    let minutes = duration.num_minutes();
    if TimeDelta::try_minutes(minutes) == Some(duration) {
        Ok(minutes)
    } else {
        Err(MappingError::FractionalDuration {
            route_id: id_to_record(route.id.as_ref()),
            seconds: duration.num_seconds(),
        })
    }
}

impl RecordMapping for User {
    type Record = UserRecord;

    fn to_record(&self) -> Result<UserRecord, MappingError> {
        Ok(UserRecord {
            id: id_to_record(self.id.as_ref()),
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            gender: self.gender.clone(),
            phone: self.phone.clone(),
            birth_date: self.birth_date,
            address: self.address.clone(),
            preferences: self.preferences.clone(),
        })
    }

    fn from_record(record: UserRecord) -> Result<Self, MappingError> {
        Ok(Self {
            id: id_from_record(record.id),
            name: record.name,
            email: record.email,
            password: record.password,
            gender: record.gender,
            phone: record.phone,
            birth_date: record.birth_date,
            address: record.address,
            preferences: record.preferences,
        })
    }
}

impl RecordMapping for Route {
    type Record = RouteRecord;

    fn to_record(&self) -> Result<RouteRecord, MappingError> {
        Ok(RouteRecord {
            id: id_to_record(self.id.as_ref()),
            start_point: self.start_point.clone(),
            end_point: self.end_point.clone(),
            date: self.date,
            estimated_duration_minutes: whole_minutes(self)?,
        })
    }

    fn from_record(record: RouteRecord) -> Result<Self, MappingError> {
        let minutes = record.estimated_duration_minutes;
        let Some(estimated_duration) = TimeDelta::try_minutes(minutes) else {
            return Err(MappingError::DurationOutOfRange {
                route_id: record.id,
                minutes,
            });
        };
        Ok(Self {
            id: id_from_record(record.id),
            start_point: record.start_point,
            end_point: record.end_point,
            date: record.date,
            estimated_duration,
        })
    }
}

impl RecordMapping for Trip {
    type Record = TripRecord;

    fn to_record(&self) -> Result<TripRecord, MappingError> {
        Ok(TripRecord {
            id: id_to_record(self.id.as_ref()),
            departure_time: self.departure_time,
            max_passengers: self.max_passengers,
            creation_date: self.creation_date,
            status: self.status.as_str().to_owned(),
            editable: self.editable,
            route_id: id_to_record(self.route_id.as_ref()),
            user_id: id_to_record(self.user_id.as_ref()),
        })
    }

    fn from_record(record: TripRecord) -> Result<Self, MappingError> {
        Ok(Self {
            id: id_from_record(record.id),
            departure_time: record.departure_time,
            max_passengers: record.max_passengers,
            creation_date: record.creation_date,
            status: TripStatus::from(record.status.as_str()),
            editable: record.editable,
            route_id: id_from_record(record.route_id),
            user_id: id_from_record(record.user_id),
        })
    }
}

impl RecordMapping for Booking {
    type Record = BookingRecord;

    fn to_record(&self) -> Result<BookingRecord, MappingError> {
        Ok(BookingRecord {
            id: id_to_record(self.id.as_ref()),
            seat_count: self.seat_count,
            status: self.status.as_str().to_owned(),
            booking_date: self.booking_date,
            passport_number: self.passport_number.clone(),
            passport_expiry_date: self.passport_expiry_date,
            trip_id: self.trip_id.clone(),
            user_id: self.user_id.clone(),
        })
    }

    fn from_record(record: BookingRecord) -> Result<Self, MappingError> {
        Ok(Self {
            id: id_from_record(record.id),
            seat_count: record.seat_count,
            status: BookingStatus::from(record.status.as_str()),
            booking_date: record.booking_date,
            passport_number: record.passport_number,
            passport_expiry_date: record.passport_expiry_date,
            trip_id: record.trip_id,
            user_id: record.user_id,
        })
    }
}

impl RecordMapping for Rating {
    type Record = RatingRecord;

    fn to_record(&self) -> Result<RatingRecord, MappingError> {
        Ok(RatingRecord {
            id: id_to_record(self.id.as_ref()),
            score: self.score,
            comment: self.comment.clone(),
            date: self.date,
            trip_id: self.trip_id.clone(),
        })
    }

    fn from_record(record: RatingRecord) -> Result<Self, MappingError> {
        Ok(Self {
            id: id_from_record(record.id),
            score: record.score,
            comment: record.comment,
            date: record.date,
            trip_id: record.trip_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use rstest::{fixture, rstest};

    #[fixture]
    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date")
    }

    #[rstest]
    fn unsaved_route_maps_to_empty_identifier(date: NaiveDate) {
        let route = Route::new("Moscow", "Saint-Petersburg", date, TimeDelta::minutes(600));
        let record = route.to_record().expect("whole minutes");
        assert!(record.id.is_empty());
        assert_eq!(record.estimated_duration_minutes, 600);

        let back = Route::from_record(record).expect("map route back");
        assert_eq!(back, route);
    }

    #[rstest]
    #[case(TimeDelta::seconds(90))]
    #[case(TimeDelta::milliseconds(600 * 60 * 1000 + 1))]
    #[case(TimeDelta::seconds(-30))]
    fn sub_minute_route_durations_are_rejected(date: NaiveDate, #[case] duration: TimeDelta) {
        let route = Route::new("A", "B", date, duration).with_id("r9");
        let err = route.to_record().expect_err("duration is not whole minutes");
        assert_eq!(
            err,
            MappingError::FractionalDuration {
                route_id: "r9".to_owned(),
                seconds: duration.num_seconds(),
            }
        );
    }

    #[rstest]
    fn whole_minute_durations_read_back_unchanged(date: NaiveDate) {
        let route = Route::new("A", "B", date, TimeDelta::minutes(-15) + TimeDelta::hours(2));
        let back = Route::from_record(route.to_record().expect("whole minutes")).expect("map back");
        assert_eq!(back.estimated_duration, TimeDelta::minutes(105));
    }

    #[rstest]
    fn route_duration_out_of_range_is_rejected(date: NaiveDate) {
        let record = RouteRecord {
            id: "r1".to_owned(),
            start_point: "A".to_owned(),
            end_point: "B".to_owned(),
            date,
            estimated_duration_minutes: i64::MAX,
        };
        let err = Route::from_record(record).expect_err("duration should overflow");
        assert!(matches!(err, MappingError::DurationOutOfRange { minutes: i64::MAX, .. }));
    }

    #[rstest]
    fn trip_status_is_stored_as_text(date: NaiveDate) {
        let departure: NaiveDateTime = date.and_hms_opt(8, 30, 0).expect("valid time");
        let mut trip = Trip::new(departure, 3, date).with_id("t1");
        trip.status = TripStatus::Completed;
        trip.route_id = Some("r1".to_owned());
        trip.user_id = Some("u1".to_owned());

        let record = trip.to_record().expect("map trip");
        assert_eq!(record.status, "COMPLETED");
        assert_eq!(record.route_id, "r1");
        assert_eq!(Trip::from_record(record).expect("map trip back"), trip);
    }

    #[rstest]
    fn status_spelled_in_lowercase_round_trips(date: NaiveDate) {
        let departure = date.and_hms_opt(7, 0, 0).expect("valid time");
        let mut trip = Trip::new(departure, 2, date);
        trip.status = TripStatus::Other("scheduled".to_owned());

        let record = trip.to_record().expect("map trip");
        assert_eq!(record.status, "SCHEDULED");
        assert_eq!(Trip::from_record(record).expect("map trip back"), trip);
    }

    #[rstest]
    fn unknown_booking_status_survives(date: NaiveDate) {
        let record = BookingRecord {
            id: "b1".to_owned(),
            seat_count: 2,
            status: "waitlisted".to_owned(),
            booking_date: date,
            passport_number: "AB123".to_owned(),
            passport_expiry_date: date,
            trip_id: "t1".to_owned(),
            user_id: "u1".to_owned(),
        };
        let booking = Booking::from_record(record.clone()).expect("map booking");
        assert_eq!(booking.status, BookingStatus::Other("waitlisted".to_owned()));
        assert_eq!(booking.to_record().expect("map booking"), record);
    }
}
