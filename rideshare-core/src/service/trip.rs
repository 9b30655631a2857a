use std::rc::Rc;

use log::{debug, error, info, warn};

use crate::domain::{Route, Trip, TripStatus};
use crate::error::{CompositeOperation, ServiceError, ServiceResult};
use crate::record::{Entity, TripRecord};
use crate::repository::TripRepository;

use super::{RouteService, delete_entity, fetch_entity, found_entities, into_record, require_id};

/// Trip publication and maintenance.
///
/// A trip is always written together with its route, through the
/// [`RouteService`]. The two writes go to separate contracts and nothing
/// makes them atomic: a route written by a failed composite stays in
/// storage, and no compensating delete is attempted.
pub struct TripService {
    trips: Box<dyn TripRepository>,
    routes: Rc<RouteService>,
}

impl TripService {
    /// Wrap a trip contract, writing routes through `routes`.
    #[must_use]
    pub fn new(trips: Box<dyn TripRepository>, routes: Rc<RouteService>) -> Self {
        Self { trips, routes }
    }

    /// Create `route`, then a trip organised by `user_id` that follows it.
    ///
    /// Returns the new trip identifier.
    ///
    /// # Errors
    ///
    /// A route failure is wrapped in [`ServiceError::Aborted`] and no trip is
    /// written. A trip failure is wrapped in [`ServiceError::Composite`]
    /// naming the route that was already written and is now orphaned.
    pub fn create_trip(&self, trip: &Trip, route: &Route, user_id: &str) -> ServiceResult<String> {
        debug!("creating trip for user {user_id}");
        let operation = CompositeOperation::CreateTrip;
        let (template, route_id) = into_record(trip)
            .and_then(|template| Ok((template, self.routes.create_route(route)?)))
            .map_err(|err| aborted(operation, err))?;

        let record = TripRecord {
            route_id: route_id.clone(),
            user_id: user_id.to_owned(),
            ..template
        };
        match self.trips.create(&record) {
            Ok(trip_id) => {
                info!("created trip {trip_id} on route {route_id}");
                Ok(trip_id)
            }
            Err(store_err) => {
                warn!("route {route_id} left without a trip");
                Err(composite_failure(operation, route_id, store_err.into()))
            }
        }
    }

    /// Update the trip carrying `trip.id` and the route it already follows.
    ///
    /// The stored trip is read first to recover its route identifier, which
    /// is then assigned to `route` before the route is rewritten. The trip
    /// keeps that route identifier and is reassigned to `user_id`.
    ///
    /// # Errors
    ///
    /// Fails with [`ServiceError::NotFound`] before touching the route when
    /// the trip is not stored. A route failure is wrapped in
    /// [`ServiceError::Aborted`]. A trip failure after the route was
    /// rewritten is wrapped in [`ServiceError::Composite`].
    pub fn update_trip(&self, trip: &Trip, route: &Route, user_id: &str) -> ServiceResult<()> {
        let trip_id = require_id(trip.id.as_ref(), Entity::Trip)?;
        debug!("updating trip {trip_id}");
        let operation = CompositeOperation::UpdateTrip;

        let existing = self
            .trips
            .get_by_id(trip_id)
            .map_err(ServiceError::from)
            .and_then(|found| {
                found.ok_or_else(|| ServiceError::NotFound {
                    entity: Entity::Trip,
                    id: trip_id.to_owned(),
                })
            })
            .inspect_err(|err| error!("update trip aborted before touching the route: {err}"))?;

        let route_id = existing.route_id;
        let mut routed = route.clone();
        routed.id = Some(route_id.clone());
        let template = into_record(trip)
            .and_then(|template| {
                self.routes.update_route(&routed)?;
                Ok(template)
            })
            .map_err(|err| aborted(operation, err))?;

        let record = TripRecord {
            id: trip_id.to_owned(),
            route_id: route_id.clone(),
            user_id: user_id.to_owned(),
            ..template
        };
        match self.trips.update(&record) {
            Ok(()) => {
                info!("updated trip {trip_id} on route {route_id}");
                Ok(())
            }
            Err(store_err) => {
                warn!("route {route_id} rewritten but trip {trip_id} unchanged");
                Err(composite_failure(operation, route_id, store_err.into()))
            }
        }
    }

    /// Fetch a trip by identifier; `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Fails on malformed identifiers or unreadable storage.
    pub fn get_trip(&self, id: &str) -> ServiceResult<Option<Trip>> {
        fetch_entity(self.trips.as_ref(), id)
    }

    /// Remove the trip stored under `id`. Its route is left in place.
    ///
    /// # Errors
    ///
    /// Fails when no such trip is stored.
    pub fn delete_trip(&self, id: &str) -> ServiceResult<()> {
        delete_entity::<TripRecord, _>(self.trips.as_ref(), id)
    }

    /// Trips organised by `user_id`.
    ///
    /// # Errors
    ///
    /// Fails with `NotSupported` on every shipped backend.
    pub fn find_trips_by_user(&self, user_id: &str) -> ServiceResult<Vec<Trip>> {
        found_entities(self.trips.find_by_user(user_id), "find by user")
    }

    /// Trips in `status`.
    ///
    /// # Errors
    ///
    /// Fails with `NotSupported` on every shipped backend.
    pub fn find_trips_by_status(&self, status: &TripStatus) -> ServiceResult<Vec<Trip>> {
        found_entities(self.trips.find_by_status(status.as_str()), "find by status")
    }
}

fn aborted(operation: CompositeOperation, source: ServiceError) -> ServiceError {
    let err = ServiceError::Aborted {
        operation,
        source: Box::new(source),
    };
    error!("{err}");
    err
}

fn composite_failure(
    operation: CompositeOperation,
    route_id: String,
    source: ServiceError,
) -> ServiceError {
    let err = ServiceError::Composite {
        operation,
        route_id,
        source: Box::new(source),
    };
    error!("{err}");
    err
}
