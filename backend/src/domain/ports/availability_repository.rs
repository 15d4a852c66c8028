//! Port for weekly availability reads.
//!
//! Availability is owned by the profile CRUD layer; the matching core only
//! reads it. Overlap computation may happen in the store (a self-join) or in
//! the adapter, but the result must follow [`AvailabilitySlot::overlap_with`].

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::{AvailabilitySlot, OverlapInterval, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by availability adapters.
    pub enum AvailabilityRepositoryError {
        /// Store could not be reached.
        Connection { message: String } =>
            "availability store connection failed: {message}"; retryable,
        /// Query failed or returned malformed rows.
        Query { message: String } =>
            "availability query failed: {message}",
        /// The user is not known to the store.
        UnknownUser { user_id: String } =>
            "unknown user: {user_id}",
    }
}

/// Overlap intervals grouped by the counterpart's identifier.
pub type OverlapsByUser = BTreeMap<UserId, Vec<OverlapInterval>>;

/// Read access to per-user recurring weekly availability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Slots belonging to `user_id`, ordered by day then start time.
    ///
    /// A known user without slots yields an empty vector.
    async fn slots_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<AvailabilitySlot>, AvailabilityRepositoryError>;

    /// Every other user sharing at least one non-empty interval with
    /// `user_id`, with all intervals retained (one per slot pair).
    async fn find_overlapping(
        &self,
        user_id: &UserId,
    ) -> Result<OverlapsByUser, AvailabilityRepositoryError>;
}

/// Availability source with no data.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAvailabilityRepository;

#[async_trait]
impl AvailabilityRepository for FixtureAvailabilityRepository {
    async fn slots_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<AvailabilitySlot>, AvailabilityRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_overlapping(
        &self,
        _user_id: &UserId,
    ) -> Result<OverlapsByUser, AvailabilityRepositoryError> {
        Ok(OverlapsByUser::new())
    }
}
