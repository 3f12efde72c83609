//! Per-actor aggregate state.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::error::CreationTaskError;
use crate::ids::{TaskId, WorkerId};
use crate::rpc::{ActorRpcClient, ClientPool, KillActorRequest, ReplyCallback};
use crate::submit_queue::SequentialSubmitQueue;
use crate::task_spec::TaskSpec;

/// Lifecycle of a remote actor as seen by the submitter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ActorState {
    /// Known but never connected; tasks are staged until the first connect.
    Pending,
    /// Connected; an RPC client is held and tasks flow.
    Alive,
    /// Disconnected after a failure; awaiting a new incarnation.
    Restarting,
    /// Permanently gone. Terminal: staged work was failed, later submissions
    /// fail immediately, later lifecycle events are ignored.
    Dead,
}

/// Everything the submitter tracks for one actor.
///
/// Created by `add_actor_queue_if_not_exists` and never removed; lifecycle
/// events only transition its internal state.
pub(crate) struct ClientQueue {
    pub(crate) state: ActorState,
    /// Highest observed restart epoch. Strictly newer epochs win; stale
    /// lifecycle notifications are dropped by comparing against this.
    pub(crate) num_restarts: i64,
    /// Identity of the connected incarnation. `Some` iff `rpc_client` is.
    pub(crate) worker_id: Option<WorkerId>,
    pub(crate) rpc_client: Option<Arc<dyn ActorRpcClient>>,
    pub(crate) submit_queue: SequentialSubmitQueue,
    /// Reply handlers for requests the transport has accepted but not yet
    /// answered. This map is the authority on whether a reply is still
    /// wanted: eviction here is what makes a late reply a no-op.
    pub(crate) inflight_task_callbacks: HashMap<TaskId, ReplyCallback>,
    /// Network-failed tasks held until the actor's death is confirmed or the
    /// deadline (ms) passes. FIFO by deadline.
    pub(crate) wait_for_death_info_tasks: VecDeque<(i64, TaskSpec)>,
    /// At most one coalesced kill request awaiting a connected client.
    pub(crate) pending_force_kill: Option<KillActorRequest>,
    /// Why the actor died, when it died during creation.
    pub(crate) creation_task_error: Option<Arc<CreationTaskError>>,
}

impl ClientQueue {
    pub(crate) fn new() -> Self {
        Self {
            state: ActorState::Pending,
            num_restarts: 0,
            worker_id: None,
            rpc_client: None,
            submit_queue: SequentialSubmitQueue::new(),
            inflight_task_callbacks: HashMap::new(),
            wait_for_death_info_tasks: VecDeque::new(),
            pending_force_kill: None,
            creation_task_error: None,
        }
    }

    /// Drops the RPC client, returning its pool share, and with it any kill
    /// request that was waiting on this connection.
    pub(crate) fn disconnect_rpc_client(&mut self, pool: &dyn ClientPool) {
        self.rpc_client = None;
        if let Some(worker_id) = self.worker_id.take() {
            pool.disconnect(&worker_id);
        }
        self.pending_force_kill = None;
    }

    /// Moves the inflight reply handlers out for post-lock failure delivery.
    pub(crate) fn take_inflight_callbacks(&mut self) -> HashMap<TaskId, ReplyCallback> {
        std::mem::take(&mut self.inflight_task_callbacks)
    }
}
