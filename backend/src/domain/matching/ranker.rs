//! Scores overlap candidates and orders them.

use std::sync::Arc;

use tracing::{debug, error};

use crate::domain::ports::{AvailabilityRepository, PreferenceVectorRepository};
use crate::domain::{CandidateMatch, UserId};

use super::{MatchError, OverlapResolver, cosine_similarity};

/// Produces the full, uncapped ranking for a seed user.
///
/// Ordering is descending by score with ties broken by ascending candidate
/// id, which makes the output a total order and repeated passes over the
/// same data identical.
pub struct MatchRanker<A, V> {
    resolver: OverlapResolver<A>,
    vectors: Arc<V>,
}

impl<A, V> MatchRanker<A, V> {
    /// Create a ranker from its two read sources.
    pub fn new(availability: Arc<A>, vectors: Arc<V>) -> Self {
        Self {
            resolver: OverlapResolver::new(availability),
            vectors,
        }
    }
}

impl<A, V> MatchRanker<A, V>
where
    A: AvailabilityRepository,
    V: PreferenceVectorRepository,
{
    /// Rank every overlap candidate of `seed`.
    ///
    /// Fails with [`MatchError::MissingVector`] when the seed has no vector,
    /// even if there are no candidates. Candidates without a vector are
    /// skipped. A length mismatch aborts the pass.
    pub async fn rank(&self, seed: &UserId) -> Result<Vec<CandidateMatch>, MatchError> {
        let seed_vector = self
            .vectors
            .find_by_user_id(seed)
            .await?
            .ok_or_else(|| MatchError::MissingVector {
                user_id: seed.clone(),
            })?;

        let candidates = self.resolver.resolve(seed).await?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<UserId> = candidates.keys().cloned().collect();
        let vectors = self.vectors.find_by_user_ids(&ids).await?;

        let mut ranked = Vec::with_capacity(candidates.len());
        for (candidate, overlaps) in candidates {
            let Some(vector) = vectors.get(&candidate) else {
                debug!(user_id = %seed, candidate = %candidate, "candidate has no vector; skipped");
                continue;
            };
            let score = cosine_similarity(seed_vector.values(), vector.values()).inspect_err(
                |err| {
                    error!(
                        user_id = %seed,
                        candidate = %candidate,
                        error = %err,
                        "preference vectors are not comparable"
                    );
                },
            )?;
            ranked.push(CandidateMatch::new(seed.clone(), candidate, score, overlaps));
        }

        ranked.sort_by(|a, b| {
            b.score()
                .total_cmp(&a.score())
                .then_with(|| a.candidate().cmp(b.candidate()))
        });
        Ok(ranked)
    }
}
