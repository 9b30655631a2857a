use std::ops::RangeInclusive;

use chrono::NaiveDate;

/// Scores a rating is meant to carry.
///
/// Not every backend enforces this range; see the backend documentation.
pub const RATING_SCORE_RANGE: RangeInclusive<i32> = 1..=5;

/// A passenger's rating of a trip.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rating {
    /// Identifier assigned at creation.
    pub id: Option<String>,
    /// Score, nominally within [`RATING_SCORE_RANGE`].
    pub score: i32,
    /// Free-text comment.
    pub comment: String,
    /// Date the rating was left.
    pub date: NaiveDate,
    /// Rated trip.
    pub trip_id: String,
}

impl Rating {
    /// Whether the score lies within [`RATING_SCORE_RANGE`].
    #[must_use]
    pub fn has_valid_score(&self) -> bool {
        RATING_SCORE_RANGE.contains(&self.score)
    }

    /// Return the rating with its identifier set.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}
