//! Concurrency guarantees of the match cache over the in-process store.
//!
//! Time is paused, so the store's replace delay advances only when every
//! task is idle. That makes interleavings deterministic without real sleeps.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use matchmaking::domain::matching::{
    MATCH_CACHE_CAPACITY, MatchCache, MatchError, MatchQueryService, MatchRanker,
};
use matchmaking::domain::ports::{MatchPageRequest, MatchPageSource, MatchQuery};
use matchmaking::domain::{DayOfWeek, PreferenceVector, UserId};
use matchmaking::outbound::memory::{InMemoryMatchStore, StoreOperation};
use rstest::{fixture, rstest};

const REPLACE_DELAY: Duration = Duration::from_millis(200);

type Cache = MatchCache<InMemoryMatchStore, InMemoryMatchStore, InMemoryMatchStore>;

fn user(raw: &str) -> UserId {
    UserId::new(raw).expect("valid id")
}

/// Give `seed` `count` candidates who all overlap on Friday evening, with
/// scores falling as the index grows.
fn seed_candidates(store: &InMemoryMatchStore, seed: &str, count: usize) {
    let seed = user(seed);
    store.set_vector(PreferenceVector::new(seed.clone(), vec![1, 0]).expect("seed vector"));
    store
        .add_slot(&seed, DayOfWeek::Friday, "18:00", "21:00")
        .expect("seed slot");
    for i in 0..count {
        let candidate = user(&format!("{seed}-match-{i:03}"));
        let tail = i32::try_from(i + 1).expect("small index");
        store.set_vector(
            PreferenceVector::new(candidate.clone(), vec![100, tail]).expect("vector"),
        );
        store
            .add_slot(&candidate, DayOfWeek::Friday, "19:00", "20:00")
            .expect("candidate slot");
    }
}

fn cache_over(store: &Arc<InMemoryMatchStore>) -> Cache {
    let ranker = MatchRanker::new(Arc::clone(store), Arc::clone(store));
    MatchCache::new(ranker, Arc::clone(store), MATCH_CACHE_CAPACITY)
}

#[fixture]
fn slow_store() -> Arc<InMemoryMatchStore> {
    Arc::new(InMemoryMatchStore::new().with_replace_delay(REPLACE_DELAY))
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn concurrent_pages_for_one_user_refresh_once(slow_store: Arc<InMemoryMatchStore>) {
    seed_candidates(&slow_store, "ada", 8);
    let service = MatchQueryService::from_ports(
        Arc::clone(&slow_store),
        Arc::clone(&slow_store),
        Arc::clone(&slow_store),
        MATCH_CACHE_CAPACITY,
    );
    let ada = user("ada");

    let pages = join_all((0..8).map(|_| {
        service.get_page(MatchPageRequest {
            user_id: ada.clone(),
            count: 5,
            offset: 0,
        })
    }))
    .await;

    assert_eq!(slow_store.replace_count(&ada), 1);
    let first = pages[0].as_ref().expect("page served");
    for page in &pages {
        let page = page.as_ref().expect("page served");
        assert_eq!(page.matches, first.matches);
    }
    assert!(pages.iter().any(|page| {
        page.as_ref()
            .is_ok_and(|page| page.source == MatchPageSource::Refreshed)
    }));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn refreshes_for_different_users_overlap(slow_store: Arc<InMemoryMatchStore>) {
    seed_candidates(&slow_store, "ada", 3);
    seed_candidates(&slow_store, "bob", 3);
    let cache = cache_over(&slow_store);
    let (ada, bob) = (user("ada"), user("bob"));

    let started = tokio::time::Instant::now();
    let (left, right) = tokio::join!(cache.refresh(&ada), cache.refresh(&bob));

    left.expect("ada refreshed");
    right.expect("bob refreshed");
    assert!(
        started.elapsed() < REPLACE_DELAY * 2,
        "refreshes for different users were serialised: {:?}",
        started.elapsed()
    );
    assert_eq!(slow_store.replace_count(&ada), 1);
    assert_eq!(slow_store.replace_count(&bob), 1);
}

#[rstest]
#[tokio::test]
async fn failed_replace_keeps_the_previous_rows() {
    let store = Arc::new(InMemoryMatchStore::new());
    seed_candidates(&store, "ada", 4);
    let cache = cache_over(&store);
    let ada = user("ada");

    let before = cache.refresh(&ada).await.expect("initial refresh");
    assert_eq!(before.len(), 4);

    let newcomer = user("ada-match-new");
    store.set_vector(PreferenceVector::new(newcomer.clone(), vec![1, 0]).expect("vector"));
    store
        .add_slot(&newcomer, DayOfWeek::Friday, "18:30", "19:30")
        .expect("slot");
    store.fail_next(StoreOperation::Replace, "disk full");

    let err = cache.refresh(&ada).await.expect_err("replace fails");

    assert!(matches!(err, MatchError::Storage { retryable: false, .. }));
    assert_eq!(cache.get(&ada).await.expect("read"), before);
    assert_eq!(store.replace_count(&ada), 1);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn cancelled_refresh_leaves_cache_untouched_and_gate_free(
    slow_store: Arc<InMemoryMatchStore>,
) {
    seed_candidates(&slow_store, "ada", 3);
    let cache = cache_over(&slow_store);
    let ada = user("ada");

    let timed_out = tokio::time::timeout(REPLACE_DELAY / 2, cache.refresh(&ada)).await;
    assert!(timed_out.is_err(), "refresh should still be in flight");
    assert!(cache.get(&ada).await.expect("read").is_empty());
    assert_eq!(slow_store.replace_count(&ada), 0);

    let rows = cache.refresh(&ada).await.expect("refresh after cancellation");
    assert_eq!(rows.len(), 3);
    assert_eq!(slow_store.replace_count(&ada), 1);
}
