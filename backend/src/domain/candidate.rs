//! Ranked candidates and their cached form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{OverlapInterval, UserId};

/// A scored candidate produced by a single ranking pass.
///
/// Instances are built fresh for every pass and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateMatch {
    seed: UserId,
    candidate: UserId,
    score: f64,
    overlaps: Vec<OverlapInterval>,
}

impl CandidateMatch {
    /// Assemble a candidate for `seed`.
    pub fn new(
        seed: UserId,
        candidate: UserId,
        score: f64,
        overlaps: Vec<OverlapInterval>,
    ) -> Self {
        Self {
            seed,
            candidate,
            score,
            overlaps,
        }
    }

    /// User the ranking was computed for.
    pub fn seed(&self) -> &UserId {
        &self.seed
    }

    /// Ranked counterpart.
    pub fn candidate(&self) -> &UserId {
        &self.candidate
    }

    /// Cosine similarity between the two preference vectors.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Every overlap interval found for the pair.
    pub fn overlaps(&self) -> &[OverlapInterval] {
        &self.overlaps
    }

    /// Convert into a cache row at `rank`.
    pub fn into_cached(self, rank: u32, refreshed_at: DateTime<Utc>) -> CachedMatch {
        CachedMatch {
            owner: self.seed,
            candidate: self.candidate,
            rank,
            score: self.score,
            overlaps: self.overlaps,
            refreshed_at,
        }
    }
}

/// One row of a user's materialised top-N match list.
///
/// `rank` is zero-based and dense within a single refresh; rows for an owner
/// are always read back ordered by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedMatch {
    /// User the list belongs to.
    pub owner: UserId,
    /// Ranked counterpart.
    pub candidate: UserId,
    /// Zero-based position in the list.
    pub rank: u32,
    /// Similarity score at the time of the refresh.
    pub score: f64,
    /// Overlap intervals at the time of the refresh.
    pub overlaps: Vec<OverlapInterval>,
    /// When the refresh that produced this row ran.
    pub refreshed_at: DateTime<Utc>,
}

impl CachedMatch {
    /// Rebuild the candidate this row was derived from.
    pub fn to_candidate(&self) -> CandidateMatch {
        CandidateMatch::new(
            self.owner.clone(),
            self.candidate.clone(),
            self.score,
            self.overlaps.clone(),
        )
    }
}
