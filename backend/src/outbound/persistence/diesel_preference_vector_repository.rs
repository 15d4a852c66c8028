//! PostgreSQL-backed `PreferenceVectorRepository`.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PreferenceVectorRepository, PreferenceVectorRepositoryError};
use crate::domain::{PreferenceVector, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::PreferenceVectorRow;
use super::pool::{DbPool, PoolError};
use super::schema::preference_vectors;

/// Diesel implementation of [`PreferenceVectorRepository`].
#[derive(Clone)]
pub struct DieselPreferenceVectorRepository {
    pool: DbPool,
}

impl DieselPreferenceVectorRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> PreferenceVectorRepositoryError {
    map_pool_error(error, PreferenceVectorRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> PreferenceVectorRepositoryError {
    map_diesel_error(
        error,
        "preference_vectors",
        PreferenceVectorRepositoryError::query,
        PreferenceVectorRepositoryError::connection,
    )
}

fn row_to_vector(
    row: PreferenceVectorRow,
) -> Result<PreferenceVector, PreferenceVectorRepositoryError> {
    let decode = |message: String| PreferenceVectorRepositoryError::decode(&row.user_id, message);
    let user_id = UserId::new(&row.user_id).map_err(|err| decode(err.to_string()))?;
    let values = row
        .components
        .iter()
        .copied()
        .collect::<Option<Vec<i32>>>()
        .ok_or_else(|| decode("vector contains a NULL component".to_owned()))?;
    PreferenceVector::new(user_id, values).map_err(|err| decode(err.to_string()))
}

#[async_trait]
impl PreferenceVectorRepository for DieselPreferenceVectorRepository {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<PreferenceVector>, PreferenceVectorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<PreferenceVectorRow> = preference_vectors::table
            .filter(preference_vectors::user_id.eq(user_id.as_str()))
            .select(PreferenceVectorRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_vector).transpose()
    }

    async fn find_by_user_ids(
        &self,
        user_ids: &[UserId],
    ) -> Result<HashMap<UserId, PreferenceVector>, PreferenceVectorRepositoryError> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let ids: Vec<&str> = user_ids.iter().map(UserId::as_str).collect();
        let rows: Vec<PreferenceVectorRow> = preference_vectors::table
            .filter(preference_vectors::user_id.eq_any(ids))
            .select(PreferenceVectorRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter()
            .map(|row| row_to_vector(row).map(|v| (v.user_id().clone(), v)))
            .collect()
    }
}
