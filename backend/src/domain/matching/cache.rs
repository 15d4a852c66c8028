//! Materialised top-N match lists.
//!
//! The cache is pull-based. Nothing invalidates a user's list when a
//! counterpart edits availability or preferences; the list is rebuilt only
//! when the query service decides to refresh it, so other users may see
//! stale rows until their next refresh.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::ports::{
    AvailabilityRepository, MatchCacheRepository, PreferenceVectorRepository,
};
use crate::domain::{CachedMatch, UserId};

use super::{GateOutcome, MatchError, MatchRanker, RefreshGate};

/// Default number of rows kept per user.
pub const MATCH_CACHE_CAPACITY: usize = 50;

/// Cache over a [`MatchCacheRepository`] with single-flight refreshes.
pub struct MatchCache<A, V, C> {
    ranker: MatchRanker<A, V>,
    store: Arc<C>,
    gate: RefreshGate,
    capacity: usize,
}

impl<A, V, C> MatchCache<A, V, C> {
    /// Create a cache holding at most `capacity` rows per user.
    pub fn new(ranker: MatchRanker<A, V>, store: Arc<C>, capacity: usize) -> Self {
        Self {
            ranker,
            store,
            gate: RefreshGate::new(),
            capacity,
        }
    }

    /// Maximum rows kept per user.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Ranker used to rebuild lists.
    pub fn ranker(&self) -> &MatchRanker<A, V> {
        &self.ranker
    }
}

impl<A, V, C> MatchCache<A, V, C>
where
    A: AvailabilityRepository,
    V: PreferenceVectorRepository,
    C: MatchCacheRepository,
{
    /// Current rows for `user_id` in rank order.
    pub async fn get(&self, user_id: &UserId) -> Result<Vec<CachedMatch>, MatchError> {
        Ok(self.store.cached_matches(user_id).await?)
    }

    /// Drop every row for `user_id`.
    pub async fn clear(&self, user_id: &UserId) -> Result<(), MatchError> {
        self.store.clear(user_id).await?;
        debug!(user_id = %user_id, "match cache cleared");
        Ok(())
    }

    /// Rebuild the list for `user_id` and return the rows now stored.
    ///
    /// At most one rebuild per user runs at a time. A caller arriving while a
    /// rebuild is in flight waits for it and then reads its result instead of
    /// issuing a second replace. On failure the previous rows stay in place.
    pub async fn refresh(&self, user_id: &UserId) -> Result<Vec<CachedMatch>, MatchError> {
        match self
            .gate
            .run(user_id, || self.rebuild(user_id))
            .await?
        {
            GateOutcome::Led(rows) => Ok(rows),
            GateOutcome::Joined => {
                debug!(user_id = %user_id, "joined in-flight match refresh");
                self.get(user_id).await
            }
        }
    }

    async fn rebuild(&self, user_id: &UserId) -> Result<Vec<CachedMatch>, MatchError> {
        let mut ranked = self.ranker.rank(user_id).await?;
        let candidates = ranked.len();
        ranked.truncate(self.capacity);

        let refreshed_at = Utc::now();
        let rows: Vec<CachedMatch> = ranked
            .into_iter()
            .zip(0_u32..)
            .map(|(candidate, rank)| candidate.into_cached(rank, refreshed_at))
            .collect();

        self.store.replace(user_id, rows.clone()).await?;
        info!(
            user_id = %user_id,
            candidates,
            stored = rows.len(),
            "match cache refreshed"
        );
        Ok(rows)
    }
}
