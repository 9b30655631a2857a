//! Entity services: the only layer callers talk to.
//!
//! Each service maps domain entities to records, calls its contract, logs
//! the outcome and translates [`StoreError`](crate::StoreError) into
//! [`ServiceError`]. The trip service additionally drives the route service
//! so a trip and its route are written together, without any atomicity
//! across the two.

use std::rc::Rc;

use log::{debug, error, info};

use crate::error::{ServiceError, ServiceResult};
use crate::mapper::RecordMapping;
use crate::record::{Entity, Record};
use crate::repository::{Repositories, Repository};

mod booking;
mod rating;
mod route;
mod trip;
mod user;

pub use crate::error::CompositeOperation;
pub use booking::BookingService;
pub use rating::RatingService;
pub use route::RouteService;
pub use trip::TripService;
pub use user::UserService;

/// Every entity service, wired over one backend family.
pub struct Services {
    /// User operations.
    pub users: UserService,
    /// Route operations, shared with the trip service.
    pub routes: Rc<RouteService>,
    /// Trip operations, including the trip/route composites.
    pub trips: TripService,
    /// Booking operations.
    pub bookings: BookingService,
    /// Rating operations.
    pub ratings: RatingService,
}

impl Services {
    /// Build the services over `repositories`.
    #[must_use]
    pub fn new(repositories: Repositories) -> Self {
        let Repositories {
            users,
            routes,
            trips,
            bookings,
            ratings,
        } = repositories;
        let routes = Rc::new(RouteService::new(routes));
        Self {
            users: UserService::new(users),
            trips: TripService::new(trips, Rc::clone(&routes)),
            routes,
            bookings: BookingService::new(bookings),
            ratings: RatingService::new(ratings),
        }
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

fn entity_of<D: RecordMapping>() -> Entity {
    <D::Record as Record>::ENTITY
}

fn log_failure(entity: Entity, operation: &str, err: &ServiceError) {
    error!("{operation} {entity} failed: {err}");
}

fn into_domain<D: RecordMapping>(record: D::Record) -> ServiceResult<D> {
    D::from_record(record).map_err(|source| ServiceError::DataAccess {
        entity: entity_of::<D>(),
        source: Box::new(source),
    })
}

fn require_id(id: Option<&String>, entity: Entity) -> ServiceResult<&str> {
    id.map(String::as_str)
        .ok_or_else(|| ServiceError::missing_identifier(entity))
}

fn into_record<D: RecordMapping>(value: &D) -> ServiceResult<D::Record> {
    value.to_record().map_err(|source| ServiceError::DataAccess {
        entity: entity_of::<D>(),
        source: Box::new(source),
    })
}

fn create_entity<D, S>(store: &S, value: &D) -> ServiceResult<String>
where
    D: RecordMapping,
    S: Repository<D::Record> + ?Sized,
{
    let entity = entity_of::<D>();
    debug!("creating {entity}");
    let created = into_record(value)
        .and_then(|record| store.create(&record).map_err(ServiceError::from));
    match &created {
        Ok(id) => info!("created {entity} {id}"),
        Err(err) => log_failure(entity, "create", err),
    }
    created
}

fn fetch_entity<D, S>(store: &S, id: &str) -> ServiceResult<Option<D>>
where
    D: RecordMapping,
    S: Repository<D::Record> + ?Sized,
{
    let entity = entity_of::<D>();
    debug!("fetching {entity} {id}");
    let fetched = store
        .get_by_id(id)
        .map_err(ServiceError::from)
        .and_then(|found| found.map(into_domain::<D>).transpose());
    if let Err(err) = &fetched {
        log_failure(entity, "fetch", err);
    }
    fetched
}

fn update_entity<D, S>(store: &S, value: &D, id: Option<&String>) -> ServiceResult<()>
where
    D: RecordMapping,
    S: Repository<D::Record> + ?Sized,
{
    let entity = entity_of::<D>();
    let result = require_id(id, entity).and_then(|target| {
        debug!("updating {entity} {target}");
        let record = into_record(value)?;
        store.update(&record).map_err(ServiceError::from)?;
        info!("updated {entity} {target}");
        Ok(())
    });
    if let Err(err) = &result {
        log_failure(entity, "update", err);
    }
    result
}

fn delete_entity<R, S>(store: &S, id: &str) -> ServiceResult<()>
where
    R: Record,
    S: Repository<R> + ?Sized,
{
    let entity = R::ENTITY;
    debug!("deleting {entity} {id}");
    match store.delete(id) {
        Ok(()) => {
            info!("deleted {entity} {id}");
            Ok(())
        }
        Err(store_err) => {
            let err = ServiceError::from(store_err);
            log_failure(entity, "delete", &err);
            Err(err)
        }
    }
}

fn found_entities<D: RecordMapping>(
    found: crate::StoreResult<Vec<D::Record>>,
    operation: &str,
) -> ServiceResult<Vec<D>> {
    let entity = entity_of::<D>();
    let result = found
        .map_err(ServiceError::from)
        .and_then(|records| records.into_iter().map(into_domain::<D>).collect());
    if let Err(err) = &result {
        log_failure(entity, operation, err);
    }
    result
}
