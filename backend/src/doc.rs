//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the match page endpoint, the health probes, their
//! response schemas and the session cookie security scheme. The document is
//! served by Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{DayOfWeek, Error, ErrorCode, OverlapInterval};
use crate::inbound::http::matches::{MatchDto, MatchPageResponse, PageSourceDto};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by the authentication service.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Matchmaking API",
        description = "Ranked, availability-aware match pages for session-authenticated users."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::matches::get_matches,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        MatchPageResponse,
        MatchDto,
        PageSourceDto,
        OverlapInterval,
        DayOfWeek,
        Error,
        ErrorCode
    )),
    tags(
        (name = "matches", description = "Ranked match pages"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
