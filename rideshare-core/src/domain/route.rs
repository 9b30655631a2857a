use chrono::{NaiveDate, TimeDelta};

/// The path a trip follows.
///
/// Routes are stored independently of trips. Nothing prevents a route from
/// being shared by several trips or from outliving the trip that created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Identifier assigned at creation.
    pub id: Option<String>,
    /// Where the trip starts.
    pub start_point: String,
    /// Where the trip ends.
    pub end_point: String,
    /// Travel date.
    pub date: NaiveDate,
    /// Expected travel time.
    pub estimated_duration: TimeDelta,
}

impl Route {
    /// Create an unsaved route.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{NaiveDate, TimeDelta};
    /// use rideshare_core::Route;
    ///
    /// let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default();
    /// let route = Route::new("Moscow", "Saint-Petersburg", date, TimeDelta::minutes(600));
    /// assert_eq!(route.estimated_duration.num_hours(), 10);
    /// ```
    pub fn new(
        start_point: impl Into<String>,
        end_point: impl Into<String>,
        date: NaiveDate,
        estimated_duration: TimeDelta,
    ) -> Self {
        Self {
            id: None,
            start_point: start_point.into(),
            end_point: end_point.into(),
            date,
            estimated_duration,
        }
    }

    /// Return the route with its identifier set.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}
