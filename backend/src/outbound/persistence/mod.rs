//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the matching ports backed by PostgreSQL via
//! `diesel-async` with `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Overlap and ranking rules stay in the domain.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: Diesel and pool failures are mapped to each port's
//!   error enum; connection loss is retryable, query failures are not.
//!
//! # Example
//!
//! ```ignore
//! use matchmaking::outbound::persistence::{DbPool, DieselMatchCacheRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/matchmaking")).await?;
//! let cache = DieselMatchCacheRepository::new(pool);
//! ```

mod diesel_availability_repository;
mod diesel_match_cache_repository;
mod diesel_preference_vector_repository;
mod error_mapping;
mod models;
mod pool;
mod schema;

pub use diesel_availability_repository::DieselAvailabilityRepository;
pub use diesel_match_cache_repository::DieselMatchCacheRepository;
pub use diesel_preference_vector_repository::DieselPreferenceVectorRepository;
pub use pool::{DEFAULT_POOL_MAX_SIZE, DbPool, PoolConfig, PoolError};
