//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters; the
//! driving port [`MatchQuery`] is what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod availability_repository;
mod match_cache_repository;
mod match_query;
mod preference_vector_repository;

#[cfg(test)]
pub use availability_repository::MockAvailabilityRepository;
pub use availability_repository::{
    AvailabilityRepository, AvailabilityRepositoryError, FixtureAvailabilityRepository,
    OverlapsByUser,
};
#[cfg(test)]
pub use match_cache_repository::MockMatchCacheRepository;
pub use match_cache_repository::{
    FixtureMatchCacheRepository, MatchCacheRepository, MatchCacheRepositoryError,
};
#[cfg(test)]
pub use match_query::MockMatchQuery;
pub use match_query::{
    FixtureMatchQuery, MatchEntry, MatchPage, MatchPageRequest, MatchPageSource, MatchQuery,
};
#[cfg(test)]
pub use preference_vector_repository::MockPreferenceVectorRepository;
pub use preference_vector_repository::{
    FixturePreferenceVectorRepository, PreferenceVectorRepository,
    PreferenceVectorRepositoryError,
};
