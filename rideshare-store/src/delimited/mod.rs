//! Delimited-file backend: one CSV file per entity collection.
//!
//! The first line of a non-empty file is a header naming every record
//! field; each following line is one record. Values are quoted by the CSV
//! writer whenever they contain a delimiter, a quote or a line break, so
//! free text survives a rewrite unchanged. The adapters accept any value:
//! seat counts and rating scores are not checked.

use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use rideshare_core::error::BoxError;
use rideshare_core::{
    BookingRecord, BookingRepository, IdGenerator, RatingRecord, RatingRepository, Record,
    Repositories, Repository, RouteRecord, RouteRepository, StoreError, StoreResult, TripRecord,
    TripRepository, UserRecord, UserRepository, UuidGenerator,
};

use crate::whole_file::{Absent, Codec, WholeFile};

/// File extension used for every collection.
pub const EXTENSION: &str = "csv";

struct CsvCodec;

impl<R: Record> Codec<R> for CsvCodec {
    fn decode(text: &str) -> Result<Vec<R>, BoxError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }
        Ok(records)
    }

    fn encode(records: &[R]) -> Result<Vec<u8>, BoxError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(R::FIELDS)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.into_inner().map_err(|err| err.into_error().into())
    }
}

/// Contract implementation over a single CSV file.
///
/// Every call opens, reads and (for mutations) rewrites the whole file.
pub struct CsvRepository<R, G = UuidGenerator> {
    file: WholeFile<R, CsvCodec>,
    ids: G,
}

impl<R, G> std::fmt::Debug for CsvRepository<R, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvRepository")
            .field("file", &self.file)
            .finish_non_exhaustive()
    }
}

impl<R: Record> CsvRepository<R> {
    /// Open the collection stored at `path`, creating an empty file (and its
    /// parent directories) when nothing exists there yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DataAccess`] when the file cannot be created.
    pub fn open(path: impl Into<Utf8PathBuf>) -> StoreResult<Self> {
        Self::with_generator(path, UuidGenerator)
    }
}

impl<R: Record, G: IdGenerator> CsvRepository<R, G> {
    /// Open the collection at `path`, issuing identifiers from `ids`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DataAccess`] when the file cannot be created.
    pub fn with_generator(path: impl Into<Utf8PathBuf>, ids: G) -> StoreResult<Self> {
        let path = path.into();
        let created = rideshare_fs::create_empty_if_absent(&path)
            .map_err(|source| StoreError::data_access(R::ENTITY, "create file", source))?;
        if created {
            info!("created empty {} collection at {path}", R::ENTITY);
        }
        Ok(Self {
            file: WholeFile::new(path, Absent::Fails),
            ids,
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        self.file.path()
    }
}

impl<R: Record, G: IdGenerator> Repository<R> for CsvRepository<R, G> {
    fn create(&self, record: &R) -> StoreResult<String> {
        self.file.create(record, &self.ids)
    }

    fn get_by_id(&self, id: &str) -> StoreResult<Option<R>> {
        self.file.get_by_id(id)
    }

    fn update(&self, record: &R) -> StoreResult<()> {
        self.file.update(record)
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        self.file.delete(id)
    }
}

impl<G: IdGenerator> UserRepository for CsvRepository<UserRecord, G> {}
impl<G: IdGenerator> RouteRepository for CsvRepository<RouteRecord, G> {}
impl<G: IdGenerator> TripRepository for CsvRepository<TripRecord, G> {}
impl<G: IdGenerator> BookingRepository for CsvRepository<BookingRecord, G> {}
impl<G: IdGenerator> RatingRepository for CsvRepository<RatingRecord, G> {}

/// Path of the file holding `R` inside `data_dir`.
#[must_use]
pub fn collection_path<R: Record>(data_dir: &Utf8Path) -> Utf8PathBuf {
    data_dir.join(format!("{}.{EXTENSION}", R::ENTITY.collection_name()))
}

/// Wire every entity contract to a CSV file inside `data_dir`.
///
/// # Errors
///
/// Fails when any collection file cannot be created.
pub fn open_repositories(data_dir: &Utf8Path) -> StoreResult<Repositories> {
    Ok(Repositories {
        users: Box::new(CsvRepository::<UserRecord>::open(collection_path::<UserRecord>(data_dir))?),
        routes: Box::new(CsvRepository::<RouteRecord>::open(collection_path::<RouteRecord>(data_dir))?),
        trips: Box::new(CsvRepository::<TripRecord>::open(collection_path::<TripRecord>(data_dir))?),
        bookings: Box::new(CsvRepository::<BookingRecord>::open(
            collection_path::<BookingRecord>(data_dir),
        )?),
        ratings: Box::new(CsvRepository::<RatingRecord>::open(
            collection_path::<RatingRecord>(data_dir),
        )?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{SequentialIds, temp_data_dir};
    use rideshare_core::ErrorKind;
    use rideshare_core::mapper::RecordMapping;
    use rideshare_core::test_support::sample_route;
    use rstest::rstest;

    #[rstest]
    fn construction_creates_an_empty_file() {
        let (_guard, dir) = temp_data_dir();
        let repo = CsvRepository::<RouteRecord>::open(collection_path::<RouteRecord>(&dir))
            .expect("open routes");
        let text = rideshare_fs::read_all(repo.path()).expect("read file");
        assert!(text.is_empty());
        assert_eq!(repo.get_by_id("anything").expect("scan"), None);
    }

    #[rstest]
    fn first_line_is_the_header() {
        let (_guard, dir) = temp_data_dir();
        let repo = CsvRepository::with_generator(
            collection_path::<RouteRecord>(&dir),
            SequentialIds::new("route"),
        )
        .expect("open routes");
        repo.create(&sample_route().to_record().expect("map route")).expect("create");

        let text = rideshare_fs::read_all(repo.path()).expect("read file");
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("id,start_point,end_point,date,estimated_duration_minutes")
        );
        assert_eq!(
            lines.next(),
            Some("route-1,Moscow,Saint-Petersburg,2025-06-01,600")
        );
    }

    #[rstest]
    fn emptied_collection_keeps_its_header() {
        let (_guard, dir) = temp_data_dir();
        let repo = CsvRepository::<RouteRecord>::open(collection_path::<RouteRecord>(&dir))
            .expect("open routes");
        let id = repo.create(&sample_route().to_record().expect("map route")).expect("create");
        repo.delete(&id).expect("delete");

        let text = rideshare_fs::read_all(repo.path()).expect("read file");
        assert_eq!(text.lines().count(), 1);
    }

    #[rstest]
    fn malformed_content_is_a_data_access_failure() {
        let (_guard, dir) = temp_data_dir();
        let path = collection_path::<RouteRecord>(&dir);
        rideshare_fs::overwrite(&path, b"id,start_point\nr1,A,B,C,D,E\n").expect("corrupt file");
        let repo = CsvRepository::<RouteRecord>::open(path).expect("open routes");

        let err = repo.get_by_id("r1").expect_err("decoding should fail");
        assert_eq!(err.kind(), ErrorKind::DataAccess);
    }

    #[rstest]
    fn removed_file_is_a_data_access_failure() {
        let (_guard, dir) = temp_data_dir();
        let repo = CsvRepository::<RouteRecord>::open(collection_path::<RouteRecord>(&dir))
            .expect("open routes");
        std::fs::remove_file(repo.path()).expect("remove file");

        let err = repo.get_by_id("r1").expect_err("missing file should fail");
        assert!(matches!(err, StoreError::DataAccess { operation: "read file", .. }));
    }

    #[rstest]
    fn invalid_rating_scores_are_accepted() {
        let (_guard, dir) = temp_data_dir();
        let repo = CsvRepository::<RatingRecord>::open(collection_path::<RatingRecord>(&dir))
            .expect("open ratings");
        let record = RatingRecord {
            score: 42,
            ..RatingRecord::default()
        };
        let id = repo.create(&record).expect("no validation in csv files");
        let stored = repo.get_by_id(&id).expect("read").expect("stored");
        assert_eq!(stored.score, 42);
    }
}
