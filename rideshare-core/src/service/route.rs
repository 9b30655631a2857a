use chrono::NaiveDate;

use crate::domain::Route;
use crate::error::ServiceResult;
use crate::record::RouteRecord;
use crate::repository::RouteRepository;

use super::{create_entity, delete_entity, fetch_entity, found_entities, update_entity};

/// Route maintenance. Trips drive most route writes through this service.
pub struct RouteService {
    routes: Box<dyn RouteRepository>,
}

impl RouteService {
    /// Wrap a route contract.
    #[must_use]
    pub fn new(routes: Box<dyn RouteRepository>) -> Self {
        Self { routes }
    }

    /// Store `route` and return its new identifier.
    ///
    /// # Errors
    ///
    /// Propagates the backend failure, including constraint violations on
    /// backends that validate routes.
    pub fn create_route(&self, route: &Route) -> ServiceResult<String> {
        create_entity(self.routes.as_ref(), route)
    }

    /// Fetch a route by identifier; `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Fails on malformed identifiers or unreadable storage.
    pub fn get_route(&self, id: &str) -> ServiceResult<Option<Route>> {
        fetch_entity(self.routes.as_ref(), id)
    }

    /// Replace the stored route carrying `route.id`.
    ///
    /// # Errors
    ///
    /// Fails when the route has no identifier or is not stored.
    pub fn update_route(&self, route: &Route) -> ServiceResult<()> {
        update_entity(self.routes.as_ref(), route, route.id.as_ref())
    }

    /// Remove the route stored under `id`.
    ///
    /// # Errors
    ///
    /// Fails when no such route is stored, or when a trip still references
    /// it on backends that enforce the reference.
    pub fn delete_route(&self, id: &str) -> ServiceResult<()> {
        delete_entity::<RouteRecord, _>(self.routes.as_ref(), id)
    }

    /// Routes dated within `from..=to`.
    ///
    /// # Errors
    ///
    /// Fails with `NotSupported` on every shipped backend.
    pub fn find_routes_by_date_range(&self, from: NaiveDate, to: NaiveDate) -> ServiceResult<Vec<Route>> {
        found_entities(
            self.routes.find_by_date_range(from, to),
            "find by date range",
        )
    }
}
