//! Task completion reporting seam.
//!
//! Every submitted task is reported here exactly once as completed, failed, or
//! canceled. The finisher owns retry policy: when
//! [`pending_task_failed`](TaskFinisher::pending_task_failed) returns `true`
//! the finisher will re-submit the task with the same actor counter, and the
//! submitter keeps the sequence slot reserved for it.

use std::sync::Arc;

use crate::error::{CreationTaskError, RpcError, TaskFailureKind};
use crate::ids::TaskId;
use crate::rpc::{ActorAddress, PushTaskReply};
use crate::task_spec::TaskSpec;

/// Records task outcomes and decides retries; supplied by the embedding process.
pub trait TaskFinisher: Send + Sync {
    /// Records a successful reply from the actor at `actor_addr`.
    fn complete_pending_task(&self, task_id: TaskId, reply: PushTaskReply, actor_addr: ActorAddress);

    /// Reports a failure and returns whether the task will be retried.
    ///
    /// `immediately_mark_object_fail` forces the task's result objects to be
    /// failed right away instead of awaiting death confirmation.
    fn pending_task_failed(
        &self,
        task_id: TaskId,
        kind: TaskFailureKind,
        status: Option<&RpcError>,
        creation_error: Option<Arc<CreationTaskError>>,
        immediately_mark_object_fail: bool,
    ) -> bool;

    /// Finalizes a failure that was previously deferred (no retry decision).
    fn mark_pending_task_failed(
        &self,
        spec: &TaskSpec,
        kind: TaskFailureKind,
        creation_error: Option<Arc<CreationTaskError>>,
    );

    /// Records that a task was canceled before reaching the actor.
    fn mark_task_canceled(&self, task_id: TaskId);
}
