//! Mock populations shared by the matching unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveTime, Utc};

use crate::domain::ports::{
    MockAvailabilityRepository, MockPreferenceVectorRepository, OverlapsByUser,
};
use crate::domain::{
    AvailabilitySlot, CachedMatch, CandidateMatch, DayOfWeek, OverlapInterval, PreferenceVector,
    UserId,
};

use super::MatchRanker;

pub(crate) type MockRanker =
    MatchRanker<MockAvailabilityRepository, MockPreferenceVectorRepository>;

pub(crate) fn user(raw: &str) -> UserId {
    UserId::new(raw).expect("valid id")
}

/// `user-000`, `user-001`, ... in rank order.
pub(crate) fn candidate_ids(count: usize) -> Vec<UserId> {
    (0..count).map(|i| user(&format!("user-{i:03}"))).collect()
}

pub(crate) fn friday_evening() -> OverlapInterval {
    OverlapInterval {
        day: DayOfWeek::Friday,
        start: NaiveTime::from_hms_opt(18, 0, 0).expect("time"),
        end: NaiveTime::from_hms_opt(19, 0, 0).expect("time"),
    }
}

/// Availability where every candidate overlaps the seed once.
///
/// With `passes` set, resolving overlaps more often than that fails the test.
pub(crate) fn overlapping_availability(
    candidates: &[UserId],
    passes: Option<usize>,
) -> MockAvailabilityRepository {
    let mut availability = MockAvailabilityRepository::new();
    let seed_slots = availability.expect_slots_for_user();
    if let Some(passes) = passes {
        seed_slots.times(passes);
    }
    seed_slots.returning(|seed| {
        Ok(vec![
            AvailabilitySlot::parse(1, seed.clone(), DayOfWeek::Friday, "18:00", "19:00")
                .expect("slot"),
        ])
    });
    let overlaps: OverlapsByUser = candidates
        .iter()
        .map(|id| (id.clone(), vec![friday_evening()]))
        .collect();
    availability
        .expect_find_overlapping()
        .returning(move |_| Ok(overlaps.clone()));
    availability
}

/// Vectors where later candidate ids lean further from the seed, so the
/// ranking follows id order with strictly decreasing scores.
pub(crate) fn graded_vectors(candidates: &[UserId]) -> MockPreferenceVectorRepository {
    let mut vectors = MockPreferenceVectorRepository::new();
    vectors.expect_find_by_user_id().returning(|seed| {
        Ok(Some(PreferenceVector::new(seed.clone(), vec![1, 0]).expect("vector")))
    });
    let by_id: HashMap<UserId, PreferenceVector> = candidates
        .iter()
        .cloned()
        .zip(1_i32..)
        .map(|(id, weight)| {
            let vector = PreferenceVector::new(id.clone(), vec![100, weight]).expect("vector");
            (id, vector)
        })
        .collect();
    vectors
        .expect_find_by_user_ids()
        .returning(move |_| Ok(by_id.clone()));
    vectors
}

/// Ranker over `count` graded candidates.
pub(crate) fn graded_ranker(count: usize) -> MockRanker {
    let ids = candidate_ids(count);
    MatchRanker::new(
        Arc::new(overlapping_availability(&ids, None)),
        Arc::new(graded_vectors(&ids)),
    )
}

/// Like [`graded_ranker`], but ranking more than once fails the test.
pub(crate) fn single_pass_ranker(count: usize) -> MockRanker {
    let ids = candidate_ids(count);
    MatchRanker::new(
        Arc::new(overlapping_availability(&ids, Some(1))),
        Arc::new(graded_vectors(&ids)),
    )
}

/// Ranker whose collaborators must never be reached.
pub(crate) fn untouched_ranker() -> MockRanker {
    let mut availability = MockAvailabilityRepository::new();
    availability.expect_slots_for_user().never();
    availability.expect_find_overlapping().never();
    let mut vectors = MockPreferenceVectorRepository::new();
    vectors.expect_find_by_user_id().never();
    vectors.expect_find_by_user_ids().never();
    MatchRanker::new(Arc::new(availability), Arc::new(vectors))
}

/// `count` cache rows for `owner`, ranked in id order.
pub(crate) fn cached_rows(owner: &UserId, count: usize) -> Vec<CachedMatch> {
    let refreshed_at = Utc::now();
    candidate_ids(count)
        .into_iter()
        .zip(0_u32..)
        .map(|(candidate, rank)| {
            let score = 1.0 - f64::from(rank) / 100.0;
            CandidateMatch::new(owner.clone(), candidate, score, vec![friday_evening()])
                .into_cached(rank, refreshed_at)
        })
        .collect()
}
