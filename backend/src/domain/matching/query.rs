//! Page serving: cache first, refresh when thin, recompute when out of reach.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageWindow;
use tracing::debug;

use crate::domain::ports::{
    AvailabilityRepository, MatchCacheRepository, MatchEntry, MatchPage, MatchPageRequest,
    MatchPageSource, MatchQuery, PreferenceVectorRepository,
};
use crate::domain::{CachedMatch, CandidateMatch};

use super::{MatchCache, MatchError, MatchRanker};

/// Implements [`MatchQuery`] over a [`MatchCache`].
///
/// Each call walks `validate -> consult cache -> (serve | refresh | recompute)
/// -> paginate`; nothing is remembered between calls.
pub struct MatchQueryService<A, V, C> {
    cache: MatchCache<A, V, C>,
}

impl<A, V, C> MatchQueryService<A, V, C> {
    /// Create the service around a cache.
    pub fn new(cache: MatchCache<A, V, C>) -> Self {
        Self { cache }
    }

    /// Wire resolver, ranker and cache over the three driven ports.
    pub fn from_ports(
        availability: Arc<A>,
        vectors: Arc<V>,
        store: Arc<C>,
        capacity: usize,
    ) -> Self {
        let ranker = MatchRanker::new(availability, vectors);
        Self::new(MatchCache::new(ranker, store, capacity))
    }
}

impl<A, V, C> MatchQueryService<A, V, C>
where
    A: AvailabilityRepository,
    V: PreferenceVectorRepository,
    C: MatchCacheRepository,
{
    /// Rows from the cache path, or `None` when the window reaches past
    /// the cache's capacity.
    async fn from_cache(
        &self,
        request: &MatchPageRequest,
        window: &PageWindow,
    ) -> Result<Option<(Vec<CandidateMatch>, MatchPageSource)>, MatchError> {
        let capacity = self.cache.capacity();
        if !window.fits_within(capacity) {
            debug!(
                user_id = %request.user_id,
                end = window.end(),
                capacity,
                "window exceeds cache capacity"
            );
            return Ok(None);
        }

        let mut rows = self.cache.get(&request.user_id).await?;
        let mut source = MatchPageSource::Cache;
        if rows.len() < capacity {
            debug!(user_id = %request.user_id, cached = rows.len(), "cache thin; refreshing");
            // A refresh shorter than capacity is the whole ranking; a full one
            // covers any window that fits.
            rows = self.cache.refresh(&request.user_id).await?;
            source = MatchPageSource::Refreshed;
        }

        let ranked = rows.iter().map(CachedMatch::to_candidate).collect();
        Ok(Some((ranked, source)))
    }
}

#[async_trait]
impl<A, V, C> MatchQuery for MatchQueryService<A, V, C>
where
    A: AvailabilityRepository,
    V: PreferenceVectorRepository,
    C: MatchCacheRepository,
{
    async fn get_page(&self, request: MatchPageRequest) -> Result<MatchPage, MatchError> {
        let window = PageWindow::new(request.count, request.offset)?;

        let (ranked, source) = match self.from_cache(&request, &window).await? {
            Some(found) => found,
            None => {
                let ranked = self.cache.ranker().rank(&request.user_id).await?;
                (ranked, MatchPageSource::Recomputed)
            }
        };

        let matches = window
            .slice(&ranked)?
            .iter()
            .cloned()
            .map(MatchEntry::from)
            .collect();
        Ok(MatchPage {
            matches,
            source,
            window,
        })
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
