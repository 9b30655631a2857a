//! Tree-file backend: one JSON document per entity collection holding the
//! encoded list of records.
//!
//! An absent file reads as an empty collection and is created by the first
//! successful write. Ratings cannot be deleted through this family.

use camino::{Utf8Path, Utf8PathBuf};
use rideshare_core::error::BoxError;
use rideshare_core::{
    BookingRecord, BookingRepository, IdGenerator, RatingRecord, RatingRepository, Record,
    Repositories, Repository, RouteRecord, RouteRepository, StoreError, StoreResult, TripRecord,
    TripRepository, UserRecord, UserRepository, UuidGenerator,
};

use crate::whole_file::{Absent, Codec, WholeFile};

/// File extension used for every collection.
pub const EXTENSION: &str = "json";

/// Per-record capabilities of the tree-file family.
pub trait TreeRecord: Record {
    /// Whether `delete` is offered for this collection.
    const SUPPORTS_DELETE: bool = true;
}

impl TreeRecord for UserRecord {}
impl TreeRecord for RouteRecord {}
impl TreeRecord for TripRecord {}
impl TreeRecord for BookingRecord {}
impl TreeRecord for RatingRecord {
    const SUPPORTS_DELETE: bool = false;
}

struct JsonCodec;

impl<R: Record> Codec<R> for JsonCodec {
    fn decode(text: &str) -> Result<Vec<R>, BoxError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(text)?)
    }

    fn encode(records: &[R]) -> Result<Vec<u8>, BoxError> {
        let mut bytes = serde_json::to_vec_pretty(records)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

/// Contract implementation over a single JSON file.
pub struct JsonRepository<R, G = UuidGenerator> {
    file: WholeFile<R, JsonCodec>,
    ids: G,
}

impl<R, G> std::fmt::Debug for JsonRepository<R, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRepository")
            .field("file", &self.file)
            .finish_non_exhaustive()
    }
}

impl<R: TreeRecord> JsonRepository<R> {
    /// Use the collection stored at `path`. Nothing is touched on disk until
    /// the first write.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self::with_generator(path, UuidGenerator)
    }
}

impl<R: TreeRecord, G: IdGenerator> JsonRepository<R, G> {
    /// Use the collection at `path`, issuing identifiers from `ids`.
    #[must_use]
    pub fn with_generator(path: impl Into<Utf8PathBuf>, ids: G) -> Self {
        Self {
            file: WholeFile::new(path.into(), Absent::IsEmpty),
            ids,
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        self.file.path()
    }
}

impl<R: TreeRecord, G: IdGenerator> Repository<R> for JsonRepository<R, G> {
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
        if !R::SUPPORTS_DELETE {
            return Err(StoreError::not_supported(R::ENTITY, "delete"));
        }
        self.file.delete(id)
    }
}

impl<G: IdGenerator> UserRepository for JsonRepository<UserRecord, G> {}
impl<G: IdGenerator> RouteRepository for JsonRepository<RouteRecord, G> {}
impl<G: IdGenerator> TripRepository for JsonRepository<TripRecord, G> {}
impl<G: IdGenerator> BookingRepository for JsonRepository<BookingRecord, G> {}
impl<G: IdGenerator> RatingRepository for JsonRepository<RatingRecord, G> {}

/// Path of the file holding `R` inside `data_dir`.
#[must_use]
pub fn collection_path<R: Record>(data_dir: &Utf8Path) -> Utf8PathBuf {
    data_dir.join(format!("{}.{EXTENSION}", R::ENTITY.collection_name()))
}

/// Wire every entity contract to a JSON file inside `data_dir`.
#[must_use]
pub fn open_repositories(data_dir: &Utf8Path) -> Repositories {
    Repositories {
        users: Box::new(JsonRepository::<UserRecord>::new(collection_path::<UserRecord>(data_dir))),
        routes: Box::new(JsonRepository::<RouteRecord>::new(collection_path::<RouteRecord>(
            data_dir,
        ))),
        trips: Box::new(JsonRepository::<TripRecord>::new(collection_path::<TripRecord>(data_dir))),
        bookings: Box::new(JsonRepository::<BookingRecord>::new(collection_path::<
            BookingRecord,
        >(data_dir))),
        ratings: Box::new(JsonRepository::<RatingRecord>::new(collection_path::<RatingRecord>(
            data_dir,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_data_dir;
    use rideshare_core::ErrorKind;
    use rideshare_core::mapper::RecordMapping;
    use rideshare_core::test_support::sample_trip;
    use rstest::rstest;

    #[rstest]
    fn absent_file_reads_as_empty_and_is_not_created() {
        let (_guard, dir) = temp_data_dir();
        let repo = JsonRepository::<TripRecord>::new(collection_path::<TripRecord>(&dir));
        assert_eq!(repo.get_by_id("t1").expect("read"), None);
        assert!(!repo.path().exists());
    }

    #[rstest]
    fn first_write_creates_the_file() {
        let (_guard, dir) = temp_data_dir();
        let repo = JsonRepository::<TripRecord>::new(collection_path::<TripRecord>(&dir.join("nested")));
        let id = repo.create(&sample_trip().to_record().expect("map trip")).expect("create");

        let text = rideshare_fs::read_all(repo.path()).expect("read file");
        let decoded: Vec<TripRecord> = serde_json::from_str(&text).expect("valid json list");
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.first().map(Record::id), Some(id.as_str()));
    }

    #[rstest]
    fn update_of_missing_record_on_absent_file_is_not_found() {
        let (_guard, dir) = temp_data_dir();
        let repo = JsonRepository::<TripRecord>::new(collection_path::<TripRecord>(&dir));
        let record = TripRecord {
            id: "ghost".to_owned(),
            ..sample_trip().to_record().expect("map trip")
        };
        let err = repo.update(&record).expect_err("nothing to update");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(!repo.path().exists());
    }

    #[rstest]
    fn rating_delete_is_not_supported() {
        let (_guard, dir) = temp_data_dir();
        let repo = JsonRepository::<RatingRecord>::new(collection_path::<RatingRecord>(&dir));
        let id = repo.create(&RatingRecord::default()).expect("create rating");

        let err = repo.delete(&id).expect_err("delete is unsupported");
        assert_eq!(err.kind(), ErrorKind::NotSupported);
        assert!(repo.get_by_id(&id).expect("read").is_some());
    }

    #[rstest]
    fn malformed_json_is_a_data_access_failure() {
        let (_guard, dir) = temp_data_dir();
        let path = collection_path::<TripRecord>(&dir);
        rideshare_fs::overwrite(&path, b"{not json").expect("corrupt file");
        let repo = JsonRepository::<TripRecord>::new(path);

        let err = repo.get_by_id("t1").expect_err("decode should fail");
        assert!(matches!(err, StoreError::DataAccess { operation: "decode file", .. }));
    }
}
