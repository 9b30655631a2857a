//! Schema for the relational backend.

use rusqlite::{Connection, Error as SqliteError, OptionalExtension, Transaction};
use thiserror::Error;

/// Version recorded in `rideshare_schema_version` by this build.
pub const SCHEMA_VERSION: i64 = 1;

/// Errors raised while preparing a database for the relational backend.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Enabling foreign key enforcement failed.
    #[error("failed to enable foreign keys: {source}")]
    ForeignKeys {
        /// Error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// A migration step failed.
    #[error("schema step `{step}` failed: {source}")]
    Migration {
        /// Description of the failed step.
        step: &'static str,
        /// Error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// The database was created by an incompatible build.
    #[error("database schema version {found} does not match expected {expected}")]
    VersionMismatch {
        /// Version recorded in the database.
        found: i64,
        /// Version this build writes.
        expected: i64,
    },
}

/// Enable foreign keys and create every table the relational adapters use.
///
/// Running it against an already initialised database is a no-op apart
/// from the version check.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use rideshare_store::relational::initialise_schema;
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create schema");
/// let version: i64 = conn
///     .query_row("SELECT version FROM rideshare_schema_version", [], |row| row.get(0))
///     .expect("read version");
/// assert_eq!(version, 1);
/// ```
///
/// # Errors
///
/// Returns [`SchemaError`] when a statement fails or the recorded version
/// differs from [`SCHEMA_VERSION`].
pub fn initialise_schema(connection: &mut Connection) -> Result<(), SchemaError> {
    connection
        .pragma_update(None, "foreign_keys", true)
        .map_err(|source| SchemaError::ForeignKeys { source })?;

    let transaction = connection
        .transaction()
        .map_err(|source| SchemaError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    create_tables(&transaction)?;
    create_indexes(&transaction)?;
    ensure_schema_version(&transaction)?;

    transaction
        .commit()
        .map_err(|source| SchemaError::Migration {
            step: "commit schema transaction",
            source,
        })
}

fn create_tables(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create users",
        "CREATE TABLE IF NOT EXISTS users (
            id BLOB PRIMARY KEY CHECK (length(id) = 16),
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            password TEXT NOT NULL,
            gender TEXT NOT NULL,
            phone TEXT NOT NULL,
            birth_date TEXT NOT NULL,
            address TEXT NOT NULL,
            preferences TEXT NOT NULL
        )",
    )?;
    run_migration_step(
        transaction,
        "create routes",
        "CREATE TABLE IF NOT EXISTS routes (
            id BLOB PRIMARY KEY CHECK (length(id) = 16),
            start_point TEXT NOT NULL CHECK (length(trim(start_point)) > 0),
            end_point TEXT NOT NULL CHECK (length(trim(end_point)) > 0),
            date TEXT NOT NULL,
            estimated_duration_minutes INTEGER NOT NULL
        )",
    )?;
    run_migration_step(
        transaction,
        "create trips",
        "CREATE TABLE IF NOT EXISTS trips (
            id BLOB PRIMARY KEY CHECK (length(id) = 16),
            departure_time TEXT NOT NULL,
            max_passengers INTEGER NOT NULL CHECK (max_passengers >= 0),
            creation_date TEXT NOT NULL,
            status TEXT NOT NULL,
            editable INTEGER NOT NULL CHECK (editable IN (0, 1)),
            route_id BLOB NOT NULL REFERENCES routes(id),
            user_id BLOB
        )",
    )?;
    run_migration_step(
        transaction,
        "create bookings",
        "CREATE TABLE IF NOT EXISTS bookings (
            id BLOB PRIMARY KEY CHECK (length(id) = 16),
            seat_count INTEGER NOT NULL CHECK (seat_count > 0),
            status TEXT NOT NULL,
            booking_date TEXT NOT NULL,
            passport_number TEXT NOT NULL,
            passport_expiry_date TEXT NOT NULL,
            trip_id BLOB,
            user_id BLOB
        )",
    )?;
    run_migration_step(
        transaction,
        "create ratings",
        "CREATE TABLE IF NOT EXISTS ratings (
            id BLOB PRIMARY KEY CHECK (length(id) = 16),
            score INTEGER NOT NULL CHECK (score BETWEEN 1 AND 5),
            comment TEXT NOT NULL,
            date TEXT NOT NULL,
            trip_id BLOB
        )",
    )
}

fn create_indexes(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "index trips by route",
        "CREATE INDEX IF NOT EXISTS idx_trips_route ON trips(route_id)",
    )?;
    run_migration_step(
        transaction,
        "index bookings by trip",
        "CREATE INDEX IF NOT EXISTS idx_bookings_trip ON bookings(trip_id)",
    )?;
    run_migration_step(
        transaction,
        "index ratings by trip",
        "CREATE INDEX IF NOT EXISTS idx_ratings_trip ON ratings(trip_id)",
    )
}

fn ensure_schema_version(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS rideshare_schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0),
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        ) WITHOUT ROWID",
    )?;

    let existing: Option<i64> = transaction
        .query_row(
            "SELECT version FROM rideshare_schema_version LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|source| SchemaError::Migration {
            step: "read schema version",
            source,
        })?;

    match existing {
        Some(found) if found == SCHEMA_VERSION => Ok(()),
        Some(found) => Err(SchemaError::VersionMismatch {
            found,
            expected: SCHEMA_VERSION,
        }),
        None => transaction
            .execute(
                "INSERT INTO rideshare_schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )
            .map(|_| ())
            .map_err(|source| SchemaError::Migration {
                step: "record schema version",
                source,
            }),
    }
}

fn run_migration_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), SchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SchemaError::Migration { step, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn connection() -> Connection {
        Connection::open_in_memory().expect("open in-memory database")
    }

    #[rstest]
    fn initialisation_is_repeatable(mut connection: Connection) {
        initialise_schema(&mut connection).expect("first run");
        initialise_schema(&mut connection).expect("second run");
        let rows: i64 = connection
            .query_row("SELECT COUNT(*) FROM rideshare_schema_version", [], |row| {
                row.get(0)
            })
            .expect("count versions");
        assert_eq!(rows, 1);
    }

    #[rstest]
    fn foreign_keys_are_enabled(mut connection: Connection) {
        initialise_schema(&mut connection).expect("initialise");
        let enabled: i64 = connection
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .expect("read pragma");
        assert_eq!(enabled, 1);
    }

    #[rstest]
    fn unknown_versions_are_rejected(mut connection: Connection) {
        initialise_schema(&mut connection).expect("initialise");
        connection
            .execute("UPDATE rideshare_schema_version SET version = 7", [])
            .expect("bump version");
        let err = initialise_schema(&mut connection).expect_err("version should mismatch");
        assert!(matches!(err, SchemaError::VersionMismatch { found: 7, expected: 1 }));
    }
}
