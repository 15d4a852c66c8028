//! PostgreSQL-backed `AvailabilityRepository`.
//!
//! `find_overlapping` narrows the candidate rows in SQL (other users, same
//! days as the seed) and computes the intervals in Rust with
//! [`overlaps_between`], so the overlap rule lives in exactly one place.
//!
//! There is no users table in this schema, so an unknown user and a user
//! without slots are indistinguishable here; both yield no slots.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    AvailabilityRepository, AvailabilityRepositoryError, OverlapsByUser,
};
use crate::domain::{AvailabilitySlot, DayOfWeek, UserId, overlaps_between};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::AvailabilityRow;
use super::pool::{DbPool, PoolError};
use super::schema::availability;

/// Diesel implementation of [`AvailabilityRepository`].
#[derive(Clone)]
pub struct DieselAvailabilityRepository {
    pool: DbPool,
}

impl DieselAvailabilityRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> AvailabilityRepositoryError {
    map_pool_error(error, AvailabilityRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> AvailabilityRepositoryError {
    map_diesel_error(
        error,
        "availability",
        AvailabilityRepositoryError::query,
        AvailabilityRepositoryError::connection,
    )
}

fn row_to_slot(row: AvailabilityRow) -> Result<AvailabilitySlot, AvailabilityRepositoryError> {
    let user_id = UserId::new(&row.user_id).map_err(|err| {
        AvailabilityRepositoryError::query(format!("availability row {}: {err}", row.id))
    })?;
    let day: DayOfWeek = row.day_of_week.parse().map_err(|err| {
        AvailabilityRepositoryError::query(format!("availability row {}: {err}", row.id))
    })?;
    AvailabilitySlot::new(row.id, user_id, day, row.start_time, row.end_time).map_err(|err| {
        AvailabilityRepositoryError::query(format!("availability row {}: {err}", row.id))
    })
}

fn rows_to_slots(
    rows: Vec<AvailabilityRow>,
) -> Result<Vec<AvailabilitySlot>, AvailabilityRepositoryError> {
    let mut slots = rows
        .into_iter()
        .map(row_to_slot)
        .collect::<Result<Vec<_>, _>>()?;
    slots.sort_by_key(|slot| (slot.day(), slot.start(), slot.end(), slot.id()));
    Ok(slots)
}

#[async_trait]
impl AvailabilityRepository for DieselAvailabilityRepository {
    async fn slots_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<AvailabilitySlot>, AvailabilityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<AvailabilityRow> = availability::table
            .filter(availability::user_id.eq(user_id.as_str()))
            .select(AvailabilityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_slots(rows)
    }

    async fn find_overlapping(
        &self,
        user_id: &UserId,
    ) -> Result<OverlapsByUser, AvailabilityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let seed_rows: Vec<AvailabilityRow> = availability::table
            .filter(availability::user_id.eq(user_id.as_str()))
            .select(AvailabilityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        let seed = rows_to_slots(seed_rows)?;
        if seed.is_empty() {
            return Ok(OverlapsByUser::new());
        }

        let days: Vec<&'static str> = seed
            .iter()
            .map(|slot| slot.day().as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let candidate_rows: Vec<AvailabilityRow> = availability::table
            .filter(availability::user_id.ne(user_id.as_str()))
            .filter(availability::day_of_week.eq_any(days))
            .select(AvailabilityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        let mut by_user: BTreeMap<UserId, Vec<AvailabilitySlot>> = BTreeMap::new();
        for slot in rows_to_slots(candidate_rows)? {
            by_user.entry(slot.user_id().clone()).or_default().push(slot);
        }

        Ok(by_user
            .into_iter()
            .filter_map(|(other, slots)| {
                let intervals = overlaps_between(&seed, &slots);
                (!intervals.is_empty()).then_some((other, intervals))
            })
            .collect())
    }
}
