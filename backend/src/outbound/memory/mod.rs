//! In-process store implementing every driven port.
//!
//! Used when no database is configured and by the integration tests. Each
//! user's cache rows sit behind a single map entry, so a replace is one
//! insert: readers see the old list or the new one, never a mix. The
//! optional replace delay and one-shot fault injection exist so tests can
//! widen race windows and simulate a replace that fails after staging.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use crate::domain::ports::{
    AvailabilityRepository, AvailabilityRepositoryError, MatchCacheRepository,
    MatchCacheRepositoryError, OverlapsByUser, PreferenceVectorRepository,
    PreferenceVectorRepositoryError,
};
use crate::domain::{
    AvailabilitySlot, CachedMatch, DayOfWeek, PreferenceVector, SlotValidationError, UserId,
    overlaps_between,
};

/// Store operations that can be made to fail once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// [`AvailabilityRepository::slots_for_user`].
    SlotsForUser,
    /// [`AvailabilityRepository::find_overlapping`].
    FindOverlapping,
    /// Both vector lookups.
    FindVectors,
    /// [`MatchCacheRepository::cached_matches`].
    CachedMatches,
    /// [`MatchCacheRepository::replace`], after the new rows are staged.
    Replace,
}

/// Availability, vectors and cached matches held in memory.
#[derive(Debug, Default)]
pub struct InMemoryMatchStore {
    slots: DashMap<UserId, Vec<AvailabilitySlot>>,
    vectors: DashMap<UserId, PreferenceVector>,
    cache: DashMap<UserId, Vec<CachedMatch>>,
    replaces: DashMap<UserId, usize>,
    faults: DashMap<StoreOperation, String>,
    next_slot_id: AtomicI64,
    replace_delay: Option<Duration>,
}

impl InMemoryMatchStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep for `delay` inside every replace, before the swap.
    #[must_use]
    pub fn with_replace_delay(mut self, delay: Duration) -> Self {
        self.replace_delay = Some(delay);
        self
    }

    /// Make `user_id` known without giving them any slots.
    pub fn register_user(&self, user_id: &UserId) {
        self.slots.entry(user_id.clone()).or_default();
    }

    /// Add a weekly slot for `user_id` and return its identifier.
    pub fn add_slot(
        &self,
        user_id: &UserId,
        day: DayOfWeek,
        start: &str,
        end: &str,
    ) -> Result<i64, SlotValidationError> {
        let id = self.next_slot_id.fetch_add(1, Ordering::Relaxed) + 1;
        let slot = AvailabilitySlot::parse(id, user_id.clone(), day, start, end)?;
        self.slots.entry(user_id.clone()).or_default().push(slot);
        Ok(id)
    }

    /// Store or overwrite a user's vector.
    pub fn set_vector(&self, vector: PreferenceVector) {
        self.register_user(vector.user_id());
        self.vectors.insert(vector.user_id().clone(), vector);
    }

    /// Remove a user's vector.
    pub fn remove_vector(&self, user_id: &UserId) {
        self.vectors.remove(user_id);
    }

    /// Make the next call to `operation` fail with a query error.
    pub fn fail_next(&self, operation: StoreOperation, message: impl Into<String>) {
        self.faults.insert(operation, message.into());
    }

    /// Number of completed replaces for `user_id`.
    pub fn replace_count(&self, user_id: &UserId) -> usize {
        self.replaces.get(user_id).map_or(0, |count| *count)
    }

    fn take_fault(&self, operation: StoreOperation) -> Option<String> {
        self.faults.remove(&operation).map(|(_, message)| message)
    }

    fn known_slots(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<AvailabilitySlot>, AvailabilityRepositoryError> {
        self.slots
            .get(user_id)
            .map(|slots| slots.clone())
            .ok_or_else(|| AvailabilityRepositoryError::unknown_user(user_id.as_str()))
    }
}

#[async_trait]
impl AvailabilityRepository for InMemoryMatchStore {
    async fn slots_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<AvailabilitySlot>, AvailabilityRepositoryError> {
        if let Some(message) = self.take_fault(StoreOperation::SlotsForUser) {
            return Err(AvailabilityRepositoryError::query(message));
        }
        let mut slots = self.known_slots(user_id)?;
        slots.sort_by_key(|slot| (slot.day(), slot.start(), slot.end(), slot.id()));
        Ok(slots)
    }

    async fn find_overlapping(
        &self,
        user_id: &UserId,
    ) -> Result<OverlapsByUser, AvailabilityRepositoryError> {
        if let Some(message) = self.take_fault(StoreOperation::FindOverlapping) {
            return Err(AvailabilityRepositoryError::query(message));
        }
        let seed = self.known_slots(user_id)?;
        let mut found = OverlapsByUser::new();
        for entry in self.slots.iter() {
            if entry.key() == user_id {
                continue;
            }
            let intervals = overlaps_between(&seed, entry.value());
            if !intervals.is_empty() {
                found.insert(entry.key().clone(), intervals);
            }
        }
        Ok(found)
    }
}

#[async_trait]
impl PreferenceVectorRepository for InMemoryMatchStore {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<PreferenceVector>, PreferenceVectorRepositoryError> {
        if let Some(message) = self.take_fault(StoreOperation::FindVectors) {
            return Err(PreferenceVectorRepositoryError::query(message));
        }
        Ok(self.vectors.get(user_id).map(|vector| vector.clone()))
    }

    async fn find_by_user_ids(
        &self,
        user_ids: &[UserId],
    ) -> Result<HashMap<UserId, PreferenceVector>, PreferenceVectorRepositoryError> {
        if let Some(message) = self.take_fault(StoreOperation::FindVectors) {
            return Err(PreferenceVectorRepositoryError::query(message));
        }
        Ok(user_ids
            .iter()
            .filter_map(|id| self.vectors.get(id).map(|v| (id.clone(), v.clone())))
            .collect())
    }
}

#[async_trait]
impl MatchCacheRepository for InMemoryMatchStore {
    async fn cached_matches(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CachedMatch>, MatchCacheRepositoryError> {
        if let Some(message) = self.take_fault(StoreOperation::CachedMatches) {
            return Err(MatchCacheRepositoryError::query(message));
        }
        Ok(self
            .cache
            .get(user_id)
            .map(|rows| rows.clone())
            .unwrap_or_default())
    }

    async fn replace(
        &self,
        user_id: &UserId,
        mut rows: Vec<CachedMatch>,
    ) -> Result<(), MatchCacheRepositoryError> {
        if let Some(foreign) = rows.iter().find(|row| &row.owner != user_id) {
            return Err(MatchCacheRepositoryError::query(format!(
                "row owned by {} cannot be stored for {user_id}",
                foreign.owner
            )));
        }
        rows.sort_by_key(|row| row.rank);

        if let Some(delay) = self.replace_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = self.take_fault(StoreOperation::Replace) {
            debug!(user_id = %user_id, "injected replace failure; previous rows kept");
            return Err(MatchCacheRepositoryError::query(message));
        }

        let stored = rows.len();
        self.cache.insert(user_id.clone(), rows);
        *self.replaces.entry(user_id.clone()).or_default() += 1;
        debug!(user_id = %user_id, stored, "replaced cached matches");
        Ok(())
    }

    async fn clear(&self, user_id: &UserId) -> Result<(), MatchCacheRepositoryError> {
        self.cache.remove(user_id);
        Ok(())
    }
}
