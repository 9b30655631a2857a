//! Relational backend over SQLite: one table per entity, all sharing one
//! connection.
//!
//! Identifiers are client-generated UUIDs. Identifier strings, including
//! references inside a record being written, must parse as UUIDs or the
//! call fails with [`StoreError::InvalidIdentifier`]. The schema enforces
//! what the other families cannot: trips reference existing routes, route
//! end points are not blank, bookings reserve at least one seat and rating
//! scores lie between 1 and 5. Violations surface as data access failures.
//!
//! Trip and route writes issued by the trip service are independent
//! statements; no transaction spans them.

use std::io;
use std::marker::PhantomData;
use std::rc::Rc;

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use rideshare_core::{
    BookingRecord, BookingRepository, Entity, RatingRecord, RatingRepository, Repositories,
    Repository, RouteRecord, RouteRepository, StoreError, StoreResult, TripRecord,
    TripRepository, UserRecord, UserRepository,
};
use rusqlite::{Connection, OptionalExtension, params_from_iter};
use thiserror::Error;
use uuid::Uuid;

mod rows;
mod schema;

pub use rows::SqlRecord;
pub use schema::{SCHEMA_VERSION, SchemaError, initialise_schema};

use rows::{key_value, parse_key};

/// Errors raised while opening a database for the relational backend.
#[derive(Debug, Error)]
pub enum OpenDatabaseError {
    /// The directory holding the database could not be created.
    #[error("failed to create directory for {path}: {source}")]
    Directory {
        /// Database location.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// SQLite refused to open the database.
    #[error("failed to open SQLite database at {path}: {source}")]
    Open {
        /// Database location.
        path: Utf8PathBuf,
        /// Error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// The schema could not be prepared.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Open (or create) the database at `path` and prepare its schema.
///
/// # Errors
///
/// Returns [`OpenDatabaseError`] when the file cannot be opened or the
/// schema cannot be initialised.
pub fn open_connection(path: &Utf8Path) -> Result<Rc<Connection>, OpenDatabaseError> {
    rideshare_fs::ensure_parent_dir(path).map_err(|source| OpenDatabaseError::Directory {
        path: path.to_path_buf(),
        source,
    })?;
    let mut connection = Connection::open(path).map_err(|source| OpenDatabaseError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    initialise_schema(&mut connection)?;
    info!("opened relational store at {path}");
    Ok(Rc::new(connection))
}

/// Open a private in-memory database with the schema prepared.
///
/// # Errors
///
/// Returns [`OpenDatabaseError`] when SQLite cannot allocate the database
/// or the schema cannot be initialised.
pub fn open_in_memory() -> Result<Rc<Connection>, OpenDatabaseError> {
    let mut connection = Connection::open_in_memory().map_err(|source| OpenDatabaseError::Open {
        path: Utf8PathBuf::from(":memory:"),
        source,
    })?;
    initialise_schema(&mut connection)?;
    Ok(Rc::new(connection))
}

/// Contract implementation over one table.
pub struct SqliteRepository<R> {
    connection: Rc<Connection>,
    record: PhantomData<fn() -> R>,
}

impl<R> std::fmt::Debug for SqliteRepository<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRepository").finish_non_exhaustive()
    }
}

impl<R: SqlRecord> SqliteRepository<R> {
    /// Store `R` records in its table over `connection`.
    ///
    /// The connection must already carry the schema; see
    /// [`initialise_schema`].
    #[must_use]
    pub const fn new(connection: Rc<Connection>) -> Self {
        Self {
            connection,
            record: PhantomData,
        }
    }

    fn table() -> &'static str {
        R::ENTITY.collection_name()
    }

    fn columns() -> &'static [&'static str] {
        R::FIELDS.get(1..).unwrap_or_default()
    }

    fn select_sql(filter_column: &str) -> String {
        format!(
            "SELECT {} FROM {} WHERE {filter_column} = ?1",
            R::FIELDS.join(", "),
            Self::table()
        )
    }

    fn failure(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> StoreError {
        move |source| StoreError::data_access(R::ENTITY, operation, source)
    }

    fn execute(&self, sql: &str, values: Vec<rusqlite::types::Value>, operation: &'static str) -> StoreResult<usize> {
        let mut statement = self
            .connection
            .prepare_cached(sql)
            .map_err(Self::failure(operation))?;
        statement
            .execute(params_from_iter(values))
            .map_err(Self::failure(operation))
    }

    fn select_where(&self, column: &str, key: Uuid, operation: &'static str) -> StoreResult<Vec<R>> {
        let mut statement = self
            .connection
            .prepare_cached(&Self::select_sql(column))
            .map_err(Self::failure(operation))?;
        let rows = statement
            .query_map([key_value(key)], R::from_row)
            .map_err(Self::failure(operation))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(Self::failure(operation))
    }
}

impl<R: SqlRecord> Repository<R> for SqliteRepository<R> {
    fn create(&self, record: &R) -> StoreResult<String> {
        let key = Uuid::new_v4();
        let mut values = vec![key_value(key)];
        values.extend(record.values()?);
        let placeholders = (1..=R::FIELDS.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            Self::table(),
            R::FIELDS.join(", ")
        );
        let inserted = self.execute(&sql, values, "insert")?;
        if inserted == 0 {
            return Err(StoreError::data_access(
                R::ENTITY,
                "insert",
                "no row was inserted",
            ));
        }
        let id = key.hyphenated().to_string();
        debug!("inserted {} row {id}", R::ENTITY);
        Ok(id)
    }

    fn get_by_id(&self, id: &str) -> StoreResult<Option<R>> {
        let key = parse_key(R::ENTITY, id)?;
        self.connection
            .query_row(&Self::select_sql("id"), [key_value(key)], R::from_row)
            .optional()
            .map_err(Self::failure("select"))
    }

    fn update(&self, record: &R) -> StoreResult<()> {
        let key = parse_key(R::ENTITY, record.id())?;
        let assignments = Self::columns()
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{column} = ?{}", index + 2))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE {} SET {assignments} WHERE id = ?1", Self::table());
        let mut values = vec![key_value(key)];
        values.extend(record.values()?);
        if self.execute(&sql, values, "update")? == 0 {
            return Err(StoreError::not_found(R::ENTITY, record.id()));
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        let key = parse_key(R::ENTITY, id)?;
        let sql = format!("DELETE FROM {} WHERE id = ?1", Self::table());
        if self.execute(&sql, vec![key_value(key)], "delete")? == 0 {
            return Err(StoreError::not_found(R::ENTITY, id));
        }
        Ok(())
    }
}

impl UserRepository for SqliteRepository<UserRecord> {}
impl RouteRepository for SqliteRepository<RouteRecord> {}
impl TripRepository for SqliteRepository<TripRecord> {}

impl BookingRepository for SqliteRepository<BookingRecord> {
    fn find_by_trip(&self, trip_id: &str) -> StoreResult<Vec<BookingRecord>> {
        let key = parse_key(Entity::Trip, trip_id)?;
        self.select_where("trip_id", key, "select by trip")
    }
}

impl RatingRepository for SqliteRepository<RatingRecord> {
    fn find_by_trip(&self, trip_id: &str) -> StoreResult<Vec<RatingRecord>> {
        let key = parse_key(Entity::Trip, trip_id)?;
        self.select_where("trip_id", key, "select by trip")
    }
}

/// Wire every entity contract to its table over `connection`.
#[must_use]
pub fn open_repositories(connection: &Rc<Connection>) -> Repositories {
    Repositories {
        users: Box::new(SqliteRepository::<UserRecord>::new(Rc::clone(connection))),
        routes: Box::new(SqliteRepository::<RouteRecord>::new(Rc::clone(connection))),
        trips: Box::new(SqliteRepository::<TripRecord>::new(Rc::clone(connection))),
        bookings: Box::new(SqliteRepository::<BookingRecord>::new(Rc::clone(connection))),
        ratings: Box::new(SqliteRepository::<RatingRecord>::new(Rc::clone(connection))),
    }
}
