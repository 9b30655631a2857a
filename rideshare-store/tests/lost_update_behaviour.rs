//! Behavioural tests documenting the lost-update hazard of the file
//! families.
//!
//! The first writer's identifier generator runs between its read and its
//! rewrite of the collection, which is exactly where a second process can
//! slip in. The second writer is injected at that point.

mod support;

use std::cell::RefCell;
use std::rc::Rc;

use camino::Utf8PathBuf;
use rideshare_core::{IdGenerator, RouteRecord, RouteRepository, UuidGenerator};
use rideshare_store::{BackendKind, CsvRepository, JsonRepository, delimited, tree};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

use support::{sample_route_record, temp_dir};

/// Runs a pending write the first time an identifier is requested.
struct InterleavedWriter {
    pending: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl IdGenerator for InterleavedWriter {
    fn next_id(&self) -> String {
        let pending = self.pending.borrow_mut().take();
        if let Some(write) = pending {
            write();
        }
        UuidGenerator.next_id()
    }
}

fn open_routes<G: IdGenerator + 'static>(
    kind: BackendKind,
    dir: &Utf8PathBuf,
    ids: G,
) -> Box<dyn RouteRepository> {
    match kind {
        BackendKind::DelimitedFile => Box::new(
            CsvRepository::with_generator(delimited::collection_path::<RouteRecord>(dir), ids)
                .expect("open csv routes"),
        ),
        BackendKind::TreeFile => Box::new(JsonRepository::with_generator(
            tree::collection_path::<RouteRecord>(dir),
            ids,
        )),
        other => panic!("{other} is not a file family"),
    }
}

struct RaceWorld {
    _guard: TempDir,
    dir: Utf8PathBuf,
    kind: RefCell<Option<BackendKind>>,
    first_id: RefCell<Option<String>>,
    second_id: Rc<RefCell<Option<String>>>,
}

impl RaceWorld {
    fn new() -> Self {
        let (guard, dir) = temp_dir();
        Self {
            _guard: guard,
            dir,
            kind: RefCell::new(None),
            first_id: RefCell::new(None),
            second_id: Rc::new(RefCell::new(None)),
        }
    }

    fn kind(&self) -> BackendKind {
        self.kind.borrow().expect("a given step selects the family")
    }

    fn reader(&self) -> Box<dyn RouteRepository> {
        open_routes(self.kind(), &self.dir, UuidGenerator)
    }

    fn stored(&self, slot: &RefCell<Option<String>>) -> Option<RouteRecord> {
        let id = slot.borrow().clone().expect("route identifier recorded");
        self.reader().get_by_id(&id).expect("read routes")
    }
}

#[fixture]
fn world() -> RaceWorld {
    RaceWorld::new()
}

#[given("a delimited-file route collection")]
fn given_delimited(world: &RaceWorld) {
    world.kind.replace(Some(BackendKind::DelimitedFile));
}

#[given("a tree-file route collection")]
fn given_tree(world: &RaceWorld) {
    world.kind.replace(Some(BackendKind::TreeFile));
}

#[when("a second writer creates a route while the first writer is creating another")]
fn when_interleaved(world: &RaceWorld) {
    let kind = world.kind();
    let dir = world.dir.clone();
    let second_slot = Rc::clone(&world.second_id);
    let second_write: Box<dyn FnOnce()> = Box::new(move || {
        let second = open_routes(kind, &dir, UuidGenerator);
        let record = RouteRecord {
            start_point: "Kazan".to_owned(),
            end_point: "Sochi".to_owned(),
            ..sample_route_record()
        };
        let id = second.create(&record).expect("second writer creates");
        second_slot.replace(Some(id));
    });
    let first = open_routes(
        kind,
        &world.dir,
        InterleavedWriter {
            pending: RefCell::new(Some(second_write)),
        },
    );
    let id = first
        .create(&sample_route_record())
        .expect("first writer creates");
    world.first_id.replace(Some(id));
}

#[when("two writers create routes one after the other")]
fn when_sequential(world: &RaceWorld) {
    let first = world.reader();
    let second = world.reader();
    let first_id = first.create(&sample_route_record()).expect("first create");
    let second_id = second.create(&sample_route_record()).expect("second create");
    world.first_id.replace(Some(first_id));
    world.second_id.replace(Some(second_id));
}

#[then("the first writer's route is stored")]
fn then_first_stored(world: &RaceWorld) {
    let route = world.stored(&world.first_id).expect("first route stored");
    assert_eq!(route.start_point, "Moscow");
}

#[then("the second writer's route has been lost")]
fn then_second_lost(world: &RaceWorld) {
    assert_eq!(world.stored(&world.second_id), None);
}

#[then("both routes are stored")]
fn then_both_stored(world: &RaceWorld) {
    assert!(world.stored(&world.first_id).is_some());
    assert!(world.stored(&world.second_id).is_some());
}

#[scenario(path = "tests/features/lost_update.feature", index = 0)]
fn delimited_lost_update(world: RaceWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/lost_update.feature", index = 1)]
fn tree_lost_update(world: RaceWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/lost_update.feature", index = 2)]
fn sequential_writers(world: RaceWorld) {
    let _ = world;
}
