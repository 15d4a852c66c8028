//! Diesel row structs. Internal to the persistence layer.

use chrono::{DateTime, NaiveTime, Utc};
use diesel::prelude::*;

use super::schema::{availability, cached_matches, preference_vectors};

/// Row read from `availability`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = availability)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AvailabilityRow {
    pub id: i64,
    pub user_id: String,
    pub day_of_week: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Row read from `preference_vectors`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = preference_vectors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PreferenceVectorRow {
    pub user_id: String,
    pub components: Vec<Option<i32>>,
}

/// Row read from or written to `cached_matches`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = cached_matches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CachedMatchRow {
    pub user1_id: String,
    pub user2_id: String,
    pub rank: i32,
    pub score: f64,
    pub overlaps: serde_json::Value,
    pub refreshed_at: DateTime<Utc>,
}
