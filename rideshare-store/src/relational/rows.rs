//! Row binding for each record type.
//!
//! Identifiers are stored as 16-byte UUID blobs. Dates are ISO-8601 text and
//! departure times use `YYYY-MM-DD HH:MM:SS` so they sort lexically. An empty
//! reference is stored as `NULL`.

use chrono::{NaiveDate, NaiveDateTime};
use rideshare_core::{
    BookingRecord, Entity, RatingRecord, Record, RouteRecord, StoreError, StoreResult, TripRecord,
    UserRecord,
};
use rusqlite::Row;
use rusqlite::types::Value;
use uuid::Uuid;

/// Record types the relational adapters can bind and read back.
pub trait SqlRecord: Record {
    /// Values for every column after `id`, in [`Record::FIELDS`] order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidIdentifier`] when a reference to
    /// another record is not a UUID.
    fn values(&self) -> StoreResult<Vec<Value>>;

    /// Rebuild a record from a row selected in [`Record::FIELDS`] order.
    ///
    /// # Errors
    ///
    /// Propagates `rusqlite` conversion failures.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

pub(crate) fn parse_key(entity: Entity, id: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(id).map_err(|err| StoreError::invalid_identifier(entity, id, err))
}

pub(crate) fn key_value(key: Uuid) -> Value {
    Value::Blob(key.as_bytes().to_vec())
}

fn reference(entity: Entity, id: &str) -> StoreResult<Value> {
    if id.is_empty() {
        return Ok(Value::Null);
    }
    parse_key(entity, id).map(key_value)
}

fn text(value: &str) -> Value {
    Value::Text(value.to_owned())
}

fn date(value: NaiveDate) -> Value {
    Value::Text(value.format("%Y-%m-%d").to_string())
}

fn timestamp(value: NaiveDateTime) -> Value {
    Value::Text(value.format("%Y-%m-%d %H:%M:%S%.f").to_string())
}

fn read_key(row: &Row<'_>, index: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Uuid>(index)?.hyphenated().to_string())
}

fn read_reference(row: &Row<'_>, index: usize) -> rusqlite::Result<String> {
    Ok(row
        .get::<_, Option<Uuid>>(index)?
        .map(|key| key.hyphenated().to_string())
        .unwrap_or_default())
}

impl SqlRecord for UserRecord {
    fn values(&self) -> StoreResult<Vec<Value>> {
        Ok(vec![
            text(&self.name),
            text(&self.email),
            text(&self.password),
            text(&self.gender),
            text(&self.phone),
            date(self.birth_date),
            text(&self.address),
            text(&self.preferences),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: read_key(row, 0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            password: row.get(3)?,
            gender: row.get(4)?,
            phone: row.get(5)?,
            birth_date: row.get(6)?,
            address: row.get(7)?,
            preferences: row.get(8)?,
        })
    }
}

impl SqlRecord for RouteRecord {
    fn values(&self) -> StoreResult<Vec<Value>> {
        Ok(vec![
            text(&self.start_point),
            text(&self.end_point),
            date(self.date),
            Value::Integer(self.estimated_duration_minutes),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: read_key(row, 0)?,
            start_point: row.get(1)?,
            end_point: row.get(2)?,
            date: row.get(3)?,
            estimated_duration_minutes: row.get(4)?,
        })
    }
}

impl SqlRecord for TripRecord {
    fn values(&self) -> StoreResult<Vec<Value>> {
        Ok(vec![
            timestamp(self.departure_time),
            Value::Integer(i64::from(self.max_passengers)),
            date(self.creation_date),
            text(&self.status),
            Value::Integer(i64::from(self.editable)),
            reference(Entity::Route, &self.route_id)?,
            reference(Entity::User, &self.user_id)?,
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: read_key(row, 0)?,
            departure_time: row.get(1)?,
            max_passengers: row.get(2)?,
            creation_date: row.get(3)?,
            status: row.get(4)?,
            editable: row.get(5)?,
            route_id: read_reference(row, 6)?,
            user_id: read_reference(row, 7)?,
        })
    }
}

impl SqlRecord for BookingRecord {
    fn values(&self) -> StoreResult<Vec<Value>> {
        Ok(vec![
            Value::Integer(i64::from(self.seat_count)),
            text(&self.status),
            date(self.booking_date),
            text(&self.passport_number),
            date(self.passport_expiry_date),
            reference(Entity::Trip, &self.trip_id)?,
            reference(Entity::User, &self.user_id)?,
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: read_key(row, 0)?,
            seat_count: row.get(1)?,
            status: row.get(2)?,
            booking_date: row.get(3)?,
            passport_number: row.get(4)?,
            passport_expiry_date: row.get(5)?,
            trip_id: read_reference(row, 6)?,
            user_id: read_reference(row, 7)?,
        })
    }
}

impl SqlRecord for RatingRecord {
    fn values(&self) -> StoreResult<Vec<Value>> {
        Ok(vec![
            Value::Integer(i64::from(self.score)),
            text(&self.comment),
            date(self.date),
            reference(Entity::Trip, &self.trip_id)?,
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: read_key(row, 0)?,
            score: row.get(1)?,
            comment: row.get(2)?,
            date: row.get(3)?,
            trip_id: read_reference(row, 4)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rideshare_core::ErrorKind;
    use rstest::rstest;

    #[rstest]
    fn value_count_matches_columns() {
        let expected = |fields: &[&str]| fields.len() - 1;
        assert_eq!(
            UserRecord::default().values().expect("bind").len(),
            expected(UserRecord::FIELDS)
        );
        assert_eq!(
            RouteRecord::default().values().expect("bind").len(),
            expected(RouteRecord::FIELDS)
        );
        assert_eq!(
            TripRecord::default().values().expect("bind").len(),
            expected(TripRecord::FIELDS)
        );
        assert_eq!(
            BookingRecord::default().values().expect("bind").len(),
            expected(BookingRecord::FIELDS)
        );
        assert_eq!(
            RatingRecord::default().values().expect("bind").len(),
            expected(RatingRecord::FIELDS)
        );
    }

    #[rstest]
    fn malformed_reference_is_an_invalid_identifier() {
        let record = TripRecord {
            route_id: "route-7".to_owned(),
            ..TripRecord::default()
        };
        let err = record.values().expect_err("reference should be rejected");
        assert_eq!(err.kind(), ErrorKind::InvalidIdentifier);
        assert!(matches!(err, StoreError::InvalidIdentifier { entity: Entity::Route, .. }));
    }

    #[rstest]
    fn empty_reference_binds_null() {
        let record = RatingRecord::default();
        let values = record.values().expect("bind");
        assert_eq!(values.last(), Some(&Value::Null));
    }
}
