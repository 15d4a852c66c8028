//! Availability-aware match ranking and caching.
//!
//! The crate is laid out hexagonally: [`domain`] holds the entities, the
//! matching engine and the ports; [`outbound`] implements the driven ports
//! over PostgreSQL or process memory; [`inbound`] exposes the driving port
//! over HTTP.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI.
pub use doc::ApiDoc;
pub use middleware::Trace;
