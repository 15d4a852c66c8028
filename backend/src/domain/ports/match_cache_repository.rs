//! Port for the persisted top-N match list.
//!
//! The cache table is the only long-lived mutable state the matching core
//! touches. Adapters must make [`MatchCacheRepository::replace`] atomic: a
//! concurrent reader observes either the complete previous list or the
//! complete new one, and a failed or abandoned replace leaves the previous
//! list untouched.

use async_trait::async_trait;

use crate::domain::{CachedMatch, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by match cache adapters.
    pub enum MatchCacheRepositoryError {
        /// Store could not be reached.
        Connection { message: String } =>
            "match cache connection failed: {message}"; retryable,
        /// Query or write failed during execution.
        Query { message: String } =>
            "match cache query failed: {message}",
        /// Overlap metadata could not be encoded or decoded.
        Serialization { message: String } =>
            "match cache row could not be (de)serialised: {message}",
    }
}

/// Storage for each user's materialised match list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchCacheRepository: Send + Sync {
    /// Rows owned by `user_id`, ordered by rank. Empty when never refreshed
    /// or cleared.
    async fn cached_matches(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CachedMatch>, MatchCacheRepositoryError>;

    /// Remove every row owned by `user_id` and insert `rows` as one atomic
    /// unit.
    async fn replace(
        &self,
        user_id: &UserId,
        rows: Vec<CachedMatch>,
    ) -> Result<(), MatchCacheRepositoryError>;

    /// Remove every row owned by `user_id`.
    async fn clear(&self, user_id: &UserId) -> Result<(), MatchCacheRepositoryError>;
}

/// Cache that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMatchCacheRepository;

#[async_trait]
impl MatchCacheRepository for FixtureMatchCacheRepository {
    async fn cached_matches(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<CachedMatch>, MatchCacheRepositoryError> {
        Ok(Vec::new())
    }

    async fn replace(
        &self,
        _user_id: &UserId,
        _rows: Vec<CachedMatch>,
    ) -> Result<(), MatchCacheRepositoryError> {
        Ok(())
    }

    async fn clear(&self, _user_id: &UserId) -> Result<(), MatchCacheRepositoryError> {
        Ok(())
    }
}
