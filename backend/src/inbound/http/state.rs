//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on the driving port and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{FixtureMatchQuery, MatchQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Paginated match reads.
    pub matches: Arc<dyn MatchQuery>,
}

impl HttpState {
    /// Bundle the ports.
    pub fn new(matches: Arc<dyn MatchQuery>) -> Self {
        Self { matches }
    }
}

impl Default for HttpState {
    /// State backed by [`FixtureMatchQuery`], serving empty pages.
    fn default() -> Self {
        Self::new(Arc::new(FixtureMatchQuery))
    }
}
