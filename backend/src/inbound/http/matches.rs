//! Paginated match reads for the authenticated caller.
//!
//! ```text
//! GET /api/v1/matches?count=10&offset=0
//! ```

use actix_web::{HttpResponse, get, web};
use pagination::{DEFAULT_COUNT, DEFAULT_OFFSET};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{MatchEntry, MatchPage, MatchPageRequest, MatchPageSource};
use crate::domain::{Error, OverlapInterval};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::Caller;
use crate::inbound::http::state::HttpState;

const PRIVATE_NO_CACHE: (&str, &str) = ("Cache-Control", "private, no-cache, must-revalidate");

/// Query string accepted by [`get_matches`].
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MatchesQuery {
    /// Page size; defaults to 10.
    #[param(example = 10, minimum = 1)]
    pub count: Option<i64>,
    /// Zero-based position of the first match; defaults to 0.
    #[param(example = 0, minimum = 0)]
    pub offset: Option<i64>,
}

/// Path that produced a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PageSourceDto {
    /// Served straight from the match cache.
    Cache,
    /// Served after a synchronous cache refresh.
    Refreshed,
    /// Served from a full ranking pass beyond the cached window.
    Recomputed,
}

impl From<MatchPageSource> for PageSourceDto {
    fn from(value: MatchPageSource) -> Self {
        match value {
            MatchPageSource::Cache => Self::Cache,
            MatchPageSource::Refreshed => Self::Refreshed,
            MatchPageSource::Recomputed => Self::Recomputed,
        }
    }
}

/// One matched user.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchDto {
    /// Matched user id.
    #[schema(example = "user-bob")]
    pub user_id: String,
    /// Cosine similarity with the caller, in `[-1, 1]`.
    #[schema(example = 0.87)]
    pub score: f64,
    /// Weekly windows both users are free.
    pub overlaps: Vec<OverlapInterval>,
}

impl From<MatchEntry> for MatchDto {
    fn from(value: MatchEntry) -> Self {
        Self {
            user_id: value.user_id.into(),
            score: value.score,
            overlaps: value.overlaps,
        }
    }
}

/// Response payload for a page of matches.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchPageResponse {
    /// Matches in rank order.
    pub matches: Vec<MatchDto>,
    /// Path that produced the page.
    pub source: PageSourceDto,
    /// Requested page size.
    pub count: usize,
    /// Requested offset.
    pub offset: usize,
}

impl From<MatchPage> for MatchPageResponse {
    fn from(page: MatchPage) -> Self {
        Self {
            count: page.window.count(),
            offset: page.window.offset(),
            source: page.source.into(),
            matches: page.matches.into_iter().map(MatchDto::from).collect(),
        }
    }
}

/// Query extractor configuration turning malformed query strings into the
/// JSON `invalid_request` envelope instead of Actix's plain-text 400.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| Error::invalid_request(err.to_string()).into())
}

/// Fetch a page of the caller's ranked matches.
#[utoipa::path(
    get,
    path = "/api/v1/matches",
    description = "Return `[offset, offset + count)` of the caller's matches, ordered by descending similarity. Pages inside the top 50 are served from the match cache.",
    params(MatchesQuery),
    responses(
        (
            status = 200,
            description = "Page of matches",
            headers(("Cache-Control" = String, description = "Cache control header")),
            body = MatchPageResponse
        ),
        (status = 400, description = "Invalid count or offset", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 412, description = "Caller has no preference vector", body = Error),
        (status = 503, description = "Storage temporarily unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["matches"],
    operation_id = "getMatches",
    security(("SessionCookie" = []))
)]
#[get("/matches")]
pub async fn get_matches(
    state: web::Data<HttpState>,
    caller: Caller,
    query: web::Query<MatchesQuery>,
) -> ApiResult<HttpResponse> {
    let MatchesQuery { count, offset } = query.into_inner();
    let page = state
        .matches
        .get_page(MatchPageRequest {
            user_id: caller.into_user_id(),
            count: count.unwrap_or(DEFAULT_COUNT),
            offset: offset.unwrap_or(DEFAULT_OFFSET),
        })
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(PRIVATE_NO_CACHE)
        .json(MatchPageResponse::from(page)))
}
