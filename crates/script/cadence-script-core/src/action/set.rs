//! Live action set ordered by time range.

use std::collections::BTreeMap;

use super::ActionRef;

/// Sort key: start, then stop, then insertion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct ActionKey {
    start: i64,
    stop: i64,
    seq: u64,
}

impl ActionKey {
    /// Largest key whose action has started by `now`
    #[inline]
    fn started_by(now: i64) -> Self {
        Self {
            start: now,
            stop: i64::MAX,
            seq: u64::MAX,
        }
    }
}

/// Render-thread-owned set of scheduled actions.
///
/// Iteration order is `(start, stop, insertion)`, so a sweep only visits the
/// prefix of actions that have started.
#[derive(Default)]
pub(crate) struct ActionSet {
    entries: BTreeMap<ActionKey, ActionRef>,
    next_seq: u64,
    done: Vec<ActionKey>,
}

impl ActionSet {
    pub(crate) fn insert(&mut self, action: ActionRef) {
        let range = action.time_range();
        let key = ActionKey {
            start: range.start_micros,
            stop: range.stop_micros,
            seq: self.next_seq,
        };
        self.next_seq = self.next_seq.wrapping_add(1);
        self.entries.insert(key, action);
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Update every action that has started by `now` and drop those that
    /// report done. Returns the number retired.
    pub(crate) fn update_started(&mut self, now: i64) -> usize {
        self.done.clear();
        for (key, action) in self.entries.range(..=ActionKey::started_by(now)) {
            if action.update(now) {
                self.done.push(*key);
            }
        }
        for key in &self.done {
            self.entries.remove(key);
        }
        self.done.len()
    }

    /// Cancel and flush every action, then empty the set
    pub(crate) fn cancel_all(&mut self, now: i64) -> usize {
        let count = self.entries.len();
        for action in self.entries.values() {
            action.cancel();
            action.update(now);
        }
        self.entries.clear();
        count
    }
}
