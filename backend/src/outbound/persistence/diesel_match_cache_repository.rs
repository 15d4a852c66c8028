//! PostgreSQL-backed `MatchCacheRepository`.
//!
//! `replace` deletes the owner's rows and inserts the new list inside one
//! transaction. Concurrent readers keep seeing the committed list until the
//! commit; a failure or a dropped future rolls the whole replace back.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use tracing::debug;

use crate::domain::ports::{MatchCacheRepository, MatchCacheRepositoryError};
use crate::domain::{CachedMatch, OverlapInterval, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::CachedMatchRow;
use super::pool::{DbPool, PoolError};
use super::schema::cached_matches;

/// Diesel implementation of [`MatchCacheRepository`].
#[derive(Clone)]
pub struct DieselMatchCacheRepository {
    pool: DbPool,
}

impl DieselMatchCacheRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> MatchCacheRepositoryError {
    map_pool_error(error, MatchCacheRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> MatchCacheRepositoryError {
    map_diesel_error(
        error,
        "cached_matches",
        MatchCacheRepositoryError::query,
        MatchCacheRepositoryError::connection,
    )
}

fn row_to_cached(row: CachedMatchRow) -> Result<CachedMatch, MatchCacheRepositoryError> {
    let owner = UserId::new(&row.user1_id)
        .map_err(|err| MatchCacheRepositoryError::query(format!("user1_id: {err}")))?;
    let candidate = UserId::new(&row.user2_id)
        .map_err(|err| MatchCacheRepositoryError::query(format!("user2_id: {err}")))?;
    let rank = u32::try_from(row.rank)
        .map_err(|_| MatchCacheRepositoryError::query(format!("negative rank {}", row.rank)))?;
    let overlaps: Vec<OverlapInterval> = serde_json::from_value(row.overlaps)
        .map_err(|err| MatchCacheRepositoryError::serialization(err.to_string()))?;
    Ok(CachedMatch {
        owner,
        candidate,
        rank,
        score: row.score,
        overlaps,
        refreshed_at: row.refreshed_at,
    })
}

fn cached_to_row(
    user_id: &UserId,
    cached: CachedMatch,
) -> Result<CachedMatchRow, MatchCacheRepositoryError> {
    if &cached.owner != user_id {
        return Err(MatchCacheRepositoryError::query(format!(
            "row owned by {} cannot be stored for {user_id}",
            cached.owner
        )));
    }
    let rank = i32::try_from(cached.rank)
        .map_err(|_| MatchCacheRepositoryError::query(format!("rank {} overflows", cached.rank)))?;
    let overlaps = serde_json::to_value(&cached.overlaps)
        .map_err(|err| MatchCacheRepositoryError::serialization(err.to_string()))?;
    Ok(CachedMatchRow {
        user1_id: cached.owner.into(),
        user2_id: cached.candidate.into(),
        rank,
        score: cached.score,
        overlaps,
        refreshed_at: cached.refreshed_at,
    })
}

#[async_trait]
impl MatchCacheRepository for DieselMatchCacheRepository {
    async fn cached_matches(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CachedMatch>, MatchCacheRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<CachedMatchRow> = cached_matches::table
            .filter(cached_matches::user1_id.eq(user_id.as_str()))
            .order_by(cached_matches::rank.asc())
            .select(CachedMatchRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_cached).collect()
    }

    async fn replace(
        &self,
        user_id: &UserId,
        rows: Vec<CachedMatch>,
    ) -> Result<(), MatchCacheRepositoryError> {
        // Encode everything before opening the transaction.
        let new_rows = rows
            .into_iter()
            .map(|cached| cached_to_row(user_id, cached))
            .collect::<Result<Vec<_>, _>>()?;
        let stored = new_rows.len();
        let owner = user_id.as_str().to_owned();

        let mut conn = self.pool.get().await.map_err(pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::delete(cached_matches::table.filter(cached_matches::user1_id.eq(&owner)))
                    .execute(conn)
                    .await?;
                if !new_rows.is_empty() {
                    diesel::insert_into(cached_matches::table)
                        .values(&new_rows)
                        .execute(conn)
                        .await?;
                }
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(diesel_error)?;

        debug!(user_id = %user_id, stored, "replaced cached matches");
        Ok(())
    }

    async fn clear(&self, user_id: &UserId) -> Result<(), MatchCacheRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::delete(cached_matches::table.filter(cached_matches::user1_id.eq(user_id.as_str())))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }
}
