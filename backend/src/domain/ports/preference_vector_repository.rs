//! Port for preference vector reads.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{PreferenceVector, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by preference vector adapters.
    pub enum PreferenceVectorRepositoryError {
        /// Store could not be reached.
        Connection { message: String } =>
            "preference vector store connection failed: {message}"; retryable,
        /// Query failed during execution.
        Query { message: String } =>
            "preference vector query failed: {message}",
        /// A stored row could not be turned into a vector.
        Decode { user_id: String, message: String } =>
            "preference vector for {user_id} is malformed: {message}",
    }
}

/// Read access to per-user preference vectors.
///
/// `None` from [`find_by_user_id`](Self::find_by_user_id) means the user
/// never set a vector, which is distinct from an all-zero vector.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreferenceVectorRepository: Send + Sync {
    /// Vector for a single user.
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<PreferenceVector>, PreferenceVectorRepositoryError>;

    /// Vectors for many users. Users without a vector are absent from the
    /// map; that is not an error.
    async fn find_by_user_ids(
        &self,
        user_ids: &[UserId],
    ) -> Result<HashMap<UserId, PreferenceVector>, PreferenceVectorRepositoryError>;
}

/// Vector source where nobody has a vector.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePreferenceVectorRepository;

#[async_trait]
impl PreferenceVectorRepository for FixturePreferenceVectorRepository {
    async fn find_by_user_id(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<PreferenceVector>, PreferenceVectorRepositoryError> {
        Ok(None)
    }

    async fn find_by_user_ids(
        &self,
        _user_ids: &[UserId],
    ) -> Result<HashMap<UserId, PreferenceVector>, PreferenceVectorRepositoryError> {
        Ok(HashMap::new())
    }
}
