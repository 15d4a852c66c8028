//! Per-user single-flight coordination for cache refreshes.
//!
//! Callers for the same user queue on one async mutex. Each slot counts the
//! refreshes that completed successfully; a caller that observes the count
//! move while it waited knows somebody else already refreshed and does not
//! run its own. Callers for different users never share a slot.
//!
//! Slots live only while someone holds them, so the map does not grow with
//! the user population.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::domain::UserId;

#[derive(Debug, Default)]
struct GateSlot {
    lock: Mutex<()>,
    completed: AtomicU64,
}

/// How a caller got through the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome<T> {
    /// This caller ran the work and produced `T`.
    Led(T),
    /// Another caller completed the work while this one waited.
    Joined,
}

/// Keyed single-flight gate.
#[derive(Debug, Default)]
pub struct RefreshGate {
    slots: DashMap<UserId, Arc<GateSlot>>,
}

/// Holds a slot for the duration of one pass and releases it on drop, so a
/// cancelled caller cannot leak its entry.
struct SlotLease<'a> {
    gate: &'a RefreshGate,
    key: &'a UserId,
    slot: Arc<GateSlot>,
}

impl Drop for SlotLease<'_> {
    fn drop(&mut self) {
        // One reference is the map's, one is ours.
        self.gate
            .slots
            .remove_if(self.key, |_, slot| Arc::strong_count(slot) <= 2);
    }
}

impl RefreshGate {
    /// Create an empty gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `work` for `key` unless a concurrent caller completes it first.
    ///
    /// A failed run does not count as completed, so the next waiter retries.
    pub async fn run<F, Fut, T, E>(&self, key: &UserId, work: F) -> Result<GateOutcome<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let lease = SlotLease {
            gate: self,
            key,
            slot: Arc::clone(self.slots.entry(key.clone()).or_default().value()),
        };
        let slot = &lease.slot;
        let observed = slot.completed.load(Ordering::Acquire);

        let outcome = {
            let _guard = slot.lock.lock().await;
            if slot.completed.load(Ordering::Acquire) == observed {
                let value = work().await?;
                slot.completed.fetch_add(1, Ordering::AcqRel);
                GateOutcome::Led(value)
            } else {
                GateOutcome::Joined
            }
        };

        Ok(outcome)
    }

    /// Number of users with a caller currently inside the gate.
    pub fn active_keys(&self) -> usize {
        self.slots.len()
    }
}
