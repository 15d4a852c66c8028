//! Driving port for paginated match reads.
//!
//! This is the only matching operation inbound adapters may call.

use async_trait::async_trait;
use pagination::PageWindow;
use serde::Serialize;

use crate::domain::matching::MatchError;
use crate::domain::{CandidateMatch, OverlapInterval, UserId};

/// Raw page request as received from the boundary.
///
/// `count` and `offset` are left unvalidated so the service owns the
/// `InvalidArgument` decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPageRequest {
    /// Seed user, taken from the authenticated session.
    pub user_id: UserId,
    /// Requested page size.
    pub count: i64,
    /// Zero-based position of the first requested match.
    pub offset: i64,
}

/// One entry of a served page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchEntry {
    /// Matched user.
    pub user_id: UserId,
    /// Cosine similarity with the seed.
    pub score: f64,
    /// Overlapping availability.
    pub overlaps: Vec<OverlapInterval>,
}

impl From<CandidateMatch> for MatchEntry {
    fn from(value: CandidateMatch) -> Self {
        Self {
            user_id: value.candidate().clone(),
            score: value.score(),
            overlaps: value.overlaps().to_vec(),
        }
    }
}

/// Which path produced a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPageSource {
    /// Served from a full cache without refreshing.
    Cache,
    /// Served from the cache after a synchronous refresh.
    Refreshed,
    /// Served from an uncapped ranking pass.
    Recomputed,
}

/// A served page of matches.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPage {
    /// Matches in rank order.
    pub matches: Vec<MatchEntry>,
    /// Path that produced the page.
    pub source: MatchPageSource,
    /// Validated window the page was cut with.
    pub window: PageWindow,
}

/// Use-case port serving pages of ranked matches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchQuery: Send + Sync {
    /// Serve `[offset, offset + count)` of the caller's ranked matches.
    async fn get_page(&self, request: MatchPageRequest) -> Result<MatchPage, MatchError>;
}

/// Query that validates the window and always serves an empty page.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMatchQuery;

#[async_trait]
impl MatchQuery for FixtureMatchQuery {
    async fn get_page(&self, request: MatchPageRequest) -> Result<MatchPage, MatchError> {
        let window = PageWindow::new(request.count, request.offset)?;
        let matches = window.slice::<MatchEntry>(&[])?.to_vec();
        Ok(MatchPage {
            matches,
            source: MatchPageSource::Cache,
            window,
        })
    }
}
