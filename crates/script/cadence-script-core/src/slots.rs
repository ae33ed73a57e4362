//! Bounded in-flight action lists used by [`TweenActor`](crate::TweenActor).

use tracing::debug;

use crate::action::ActionRef;

/// In-flight actions for one animatable property.
///
/// Capacity is logical: the list starts at `initial_capacity` on first use,
/// grows by two only when every slot holds an incomplete action, and is
/// compacted on insert by swap-removing completed entries.
#[derive(Default)]
pub struct ActionSlots {
    entries: Vec<ActionRef>,
    capacity: usize,
}

/// Slots added when a full list needs room
pub const SLOT_GROWTH: usize = 2;

impl ActionSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live entries
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current logical capacity; zero until the first insert
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn actions(&self) -> &[ActionRef] {
        &self.entries
    }

    /// Add `action`.
    ///
    /// With `cancel_prev` every existing entry is cancelled and the action
    /// takes slot 0. Otherwise completed entries are culled first.
    pub fn insert(&mut self, action: ActionRef, cancel_prev: bool, initial_capacity: usize) {
        if self.capacity == 0 {
            self.capacity = initial_capacity.max(1);
            self.entries.reserve_exact(self.capacity);
        }
        if cancel_prev {
            self.cancel_entries();
        } else {
            self.cull_complete();
            if self.entries.len() >= self.capacity {
                self.capacity += SLOT_GROWTH;
                self.entries.reserve_exact(self.capacity - self.entries.len());
            }
        }
        self.entries.push(action);
    }

    /// Cancel and remove every entry. Lists that grew past
    /// `release_capacity` give their storage back.
    pub fn cancel_all(&mut self, release_capacity: usize) {
        self.cancel_entries();
        if self.capacity > release_capacity {
            debug!(
                "slots: releasing list of capacity {} (limit {})",
                self.capacity, release_capacity
            );
            self.entries = Vec::new();
            self.capacity = 0;
        }
    }

    /// Swap-remove every completed entry. Order of survivors is not kept.
    pub fn cull_complete(&mut self) {
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].is_complete() {
                self.entries.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    fn cancel_entries(&mut self) {
        for action in self.entries.drain(..) {
            action.cancel();
        }
    }
}
