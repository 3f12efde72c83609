//! # Ordered staging of pending-to-send tasks for one actor.
//!
//! [`SequentialSubmitQueue`] fixes the send order at *submit* time, before
//! dependency resolution completes. Resolution may finish out of order; the
//! queue only ever releases the lowest unsent slot, and only once everything
//! below it has been sent. Fixing the order early is what prevents deadlock
//! under backpressure: a late-resolving low-counter task can never be starved
//! behind higher-counter tasks that the actor refuses to execute first.
//!
//! The queue also keeps the bookkeeping needed by the restart protocol:
//! which slots were sent but not yet acknowledged (reset at reconnect so they
//! are re-sent from the head), and which tasks completed out of order (so a
//! restarted actor can be told to advance past them without re-executing).

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::ids::TaskId;
use crate::task_spec::TaskSpec;

/// One staged invocation, keyed by its caller-assigned position.
#[derive(Clone, Debug)]
struct Slot {
    spec: TaskSpec,
    resolved: bool,
    sent: bool,
}

/// Per-actor send-order queue.
///
/// Slots are dense up to the highest position the caller has issued; holes
/// appear only where a slot was removed (dependency failure or completion)
/// and are skipped when releasing tasks.
pub(crate) struct SequentialSubmitQueue {
    /// Staged tasks by send position. A slot stays here from emplace until it
    /// is completed or the queue is cleared; the `sent` bit alone decides
    /// whether it is (re-)sendable.
    requests: BTreeMap<u64, Slot>,
    /// Tasks acknowledged complete while an earlier sibling was still
    /// outstanding. Drained at reconnect for skip-execution resends; reaped
    /// once no earlier sibling remains.
    out_of_order_completed: BTreeMap<u64, TaskSpec>,
}

impl SequentialSubmitQueue {
    pub(crate) fn new() -> Self {
        Self {
            requests: BTreeMap::new(),
            out_of_order_completed: BTreeMap::new(),
        }
    }

    /// Stages a task at `send_pos`. Returns false if the slot is occupied
    /// (a retried submission of a task whose slot is still reserved).
    pub(crate) fn emplace(&mut self, send_pos: u64, spec: TaskSpec) -> bool {
        match self.requests.entry(send_pos) {
            Entry::Vacant(v) => {
                v.insert(Slot {
                    spec,
                    resolved: false,
                    sent: false,
                });
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub(crate) fn contains(&self, send_pos: u64) -> bool {
        self.requests.contains_key(&send_pos)
    }

    pub(crate) fn get(&self, send_pos: u64) -> Option<(&TaskSpec, bool)> {
        self.requests
            .get(&send_pos)
            .map(|slot| (&slot.spec, slot.resolved))
    }

    /// Marks the slot's dependencies as materialized. No-op if the slot was
    /// cleared in the meantime (late resolution after restart or death).
    pub(crate) fn mark_dependency_resolved(&mut self, send_pos: u64) {
        if let Some(slot) = self.requests.get_mut(&send_pos) {
            slot.resolved = true;
        }
    }

    /// Removes a slot whose dependencies cannot be materialized. Later slots
    /// are released as if the position was never issued.
    pub(crate) fn mark_dependency_failed(&mut self, send_pos: u64) {
        self.requests.remove(&send_pos);
    }

    /// Releases the lowest unsent slot, if it is resolved and every slot below
    /// it has already been sent. The returned flag is the transport-level
    /// `skip_queue` hint, always false for ordered sends.
    pub(crate) fn pop_next_task_to_send(&mut self) -> Option<(TaskSpec, bool)> {
        let slot = self.requests.values_mut().find(|slot| !slot.sent)?;
        if !slot.resolved {
            return None;
        }
        slot.sent = true;
        Some((slot.spec.clone(), false))
    }

    /// Drains the record of tasks that completed out of order, lowest first.
    pub(crate) fn pop_all_out_of_order_completed(&mut self) -> Vec<(u64, TaskSpec)> {
        std::mem::take(&mut self.out_of_order_completed)
            .into_iter()
            .collect()
    }

    /// Records that the task at `send_pos` was acknowledged complete.
    ///
    /// The slot is released. If an earlier sibling is still outstanding the
    /// completion is remembered as out-of-order; once the lowest outstanding
    /// position moves past a remembered completion it is reaped.
    pub(crate) fn mark_task_completed(&mut self, send_pos: u64, spec: TaskSpec) {
        let blocked = self
            .requests
            .keys()
            .next()
            .map_or(false, |&head| head < send_pos);
        self.requests.remove(&send_pos);
        if blocked {
            self.out_of_order_completed.insert(send_pos, spec);
        }
        match self.requests.keys().next().copied() {
            Some(watermark) => self.out_of_order_completed.retain(|&pos, _| pos > watermark),
            None => self.out_of_order_completed.clear(),
        }
    }

    /// The wire sequence number for a spec; equals its actor counter.
    pub(crate) fn sequence_number(&self, spec: &TaskSpec) -> u64 {
        spec.actor_counter()
    }

    /// Drains every staged task, returning their ids for failure reporting.
    pub(crate) fn clear_all(&mut self) -> Vec<TaskId> {
        self.out_of_order_completed.clear();
        std::mem::take(&mut self.requests)
            .into_values()
            .map(|slot| slot.spec.task_id().clone())
            .collect()
    }

    /// Resets every sent-but-unacknowledged slot so it is re-sent from the
    /// head after a reconnect. Replies owed by the previous incarnation were
    /// already evicted, so nothing will complete those slots otherwise.
    pub(crate) fn on_client_connected(&mut self) {
        for slot in self.requests.values_mut() {
            slot.sent = false;
        }
    }
}
