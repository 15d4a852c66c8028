//! Candidate discovery by shared weekly availability.
//!
//! Overlap is a hard filter: a user without at least one non-empty interval
//! shared with the seed is never ranked, however similar their preferences.

use std::sync::Arc;

use tracing::debug;

use crate::domain::UserId;
use crate::domain::ports::{AvailabilityRepository, OverlapsByUser};

use super::MatchError;

/// Resolves the candidate set for a seed user.
pub struct OverlapResolver<A> {
    availability: Arc<A>,
}

impl<A> OverlapResolver<A> {
    /// Create a resolver over the given availability source.
    pub fn new(availability: Arc<A>) -> Self {
        Self { availability }
    }
}

impl<A> OverlapResolver<A>
where
    A: AvailabilityRepository,
{
    /// Other users overlapping `seed`, each with a sorted, non-empty list of
    /// intervals.
    ///
    /// An unknown seed fails with [`MatchError::InvalidArgument`]; a seed
    /// with no slots simply has no candidates.
    pub async fn resolve(&self, seed: &UserId) -> Result<OverlapsByUser, MatchError> {
        let seed_slots = self.availability.slots_for_user(seed).await?;
        if seed_slots.is_empty() {
            debug!(user_id = %seed, "seed has no availability; no candidates");
            return Ok(OverlapsByUser::new());
        }

        let mut candidates = self.availability.find_overlapping(seed).await?;
        candidates.remove(seed);
        candidates.retain(|_, intervals| {
            intervals.sort_unstable();
            !intervals.is_empty()
        });
        debug!(user_id = %seed, candidates = candidates.len(), "resolved overlap candidates");
        Ok(candidates)
    }
}
