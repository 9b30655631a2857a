//! Backend harness shared by the store integration tests.

use bson::oid::ObjectId;
use camino::Utf8PathBuf;
use chrono::NaiveDate;
use rideshare_core::test_support::sample_date;
use rideshare_core::{
    BookingRecord, RatingRecord, Repositories, Repository, RouteRecord, TripRecord, UserRecord,
    new_record_id,
};
use rideshare_store::BackendKind;
use rideshare_store::test_support::memory_document_repositories;
use tempfile::TempDir;

/// Contracts for one family plus whatever keeps its medium alive.
pub struct Backend {
    pub kind: BackendKind,
    pub repositories: Repositories,
    _dir: Option<TempDir>,
}

impl Backend {
    pub fn open(kind: BackendKind) -> Self {
        match kind {
            BackendKind::DelimitedFile => {
                let (dir, path) = temp_dir();
                let repositories =
                    rideshare_store::delimited::open_repositories(&path).expect("open csv files");
                Self::with_dir(kind, repositories, dir)
            }
            BackendKind::TreeFile => {
                let (dir, path) = temp_dir();
                let repositories = rideshare_store::tree::open_repositories(&path);
                Self::with_dir(kind, repositories, dir)
            }
            BackendKind::DocumentStore => Self {
                kind,
                repositories: memory_document_repositories(),
                _dir: None,
            },
            BackendKind::Relational => {
                let connection =
                    rideshare_store::relational::open_in_memory().expect("open sqlite");
                Self {
                    kind,
                    repositories: rideshare_store::relational::open_repositories(&connection),
                    _dir: None,
                }
            }
        }
    }

    fn with_dir(kind: BackendKind, repositories: Repositories, dir: TempDir) -> Self {
        Self {
            kind,
            repositories,
            _dir: Some(dir),
        }
    }

    /// A well-formed identifier this backend has never issued.
    pub fn fresh_id(&self) -> String {
        match self.kind {
            BackendKind::DocumentStore => ObjectId::new().to_hex(),
            _ => new_record_id(),
        }
    }

    /// Whether identifiers are parsed into a native key type.
    pub const fn parses_identifiers(&self) -> bool {
        matches!(
            self.kind,
            BackendKind::DocumentStore | BackendKind::Relational
        )
    }

    /// Store one record of every entity, linked to each other, and return
    /// them with their assigned identifiers.
    pub fn seed(&self) -> Seeded {
        let mut user = sample_user();
        user.id = self.repositories.users.create(&user).expect("create user");

        let mut route = sample_route_record();
        route.id = self.repositories.routes.create(&route).expect("create route");

        let mut trip = TripRecord {
            route_id: route.id.clone(),
            user_id: user.id.clone(),
            ..sample_trip_record()
        };
        trip.id = self.repositories.trips.create(&trip).expect("create trip");

        let mut booking = BookingRecord {
            trip_id: trip.id.clone(),
            user_id: user.id.clone(),
            ..sample_booking()
        };
        booking.id = self
            .repositories
            .bookings
            .create(&booking)
            .expect("create booking");

        let mut rating = RatingRecord {
            trip_id: trip.id.clone(),
            ..sample_rating()
        };
        rating.id = self.repositories.ratings.create(&rating).expect("create rating");

        Seeded {
            user,
            route,
            trip,
            booking,
            rating,
        }
    }
}

/// One stored record per entity.
pub struct Seeded {
    pub user: UserRecord,
    pub route: RouteRecord,
    pub trip: TripRecord,
    pub booking: BookingRecord,
    pub rating: RatingRecord,
}

pub fn temp_dir() -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
    (dir, path)
}

fn day(offset: u64) -> NaiveDate {
    sample_date()
        .checked_add_days(chrono::Days::new(offset))
        .expect("date in range")
}

pub fn sample_user() -> UserRecord {
    UserRecord {
        id: String::new(),
        name: "Anna Petrova".to_owned(),
        email: "anna@example.org".to_owned(),
        password: "hunter2".to_owned(),
        gender: "female".to_owned(),
        phone: "+7 900 000 00 00".to_owned(),
        birth_date: NaiveDate::from_ymd_opt(1990, 4, 12).expect("valid date"),
        address: "Nevsky Prospekt 1, Saint-Petersburg".to_owned(),
        preferences: "no smoking, music ok".to_owned(),
    }
}

pub fn sample_route_record() -> RouteRecord {
    RouteRecord {
        id: String::new(),
        start_point: "Moscow".to_owned(),
        end_point: "Saint-Petersburg".to_owned(),
        date: sample_date(),
        estimated_duration_minutes: 600,
    }
}

pub fn sample_trip_record() -> TripRecord {
    TripRecord {
        id: String::new(),
        departure_time: day(1).and_hms_opt(9, 0, 0).expect("valid time"),
        max_passengers: 4,
        creation_date: sample_date(),
        status: "SCHEDULED".to_owned(),
        editable: true,
        route_id: String::new(),
        user_id: String::new(),
    }
}

pub fn sample_booking() -> BookingRecord {
    BookingRecord {
        id: String::new(),
        seat_count: 2,
        status: "CONFIRMED".to_owned(),
        booking_date: sample_date(),
        passport_number: "4510 123456".to_owned(),
        passport_expiry_date: day(3650),
        trip_id: String::new(),
        user_id: String::new(),
    }
}

pub fn sample_rating() -> RatingRecord {
    RatingRecord {
        id: String::new(),
        score: 4,
        comment: "Punctual driver, \"great\" playlist".to_owned(),
        date: day(2),
        trip_id: String::new(),
    }
}
