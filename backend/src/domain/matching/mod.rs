//! Match computation and caching engine.
//!
//! Data flows leaf-first: availability and vectors feed the
//! [`OverlapResolver`], whose candidates the [`MatchRanker`] scores with
//! [`cosine_similarity`]. The [`MatchCache`] materialises the top of that
//! ranking per user and the [`MatchQueryService`] serves pages from it.

mod cache;
mod error;
mod overlap;
mod query;
mod ranker;
mod refresh_gate;
mod similarity;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::{MATCH_CACHE_CAPACITY, MatchCache};
pub use error::{MatchError, ScoreContractError};
pub use overlap::OverlapResolver;
pub use query::MatchQueryService;
pub use ranker::MatchRanker;
pub use refresh_gate::{GateOutcome, RefreshGate};
pub use similarity::cosine_similarity;
