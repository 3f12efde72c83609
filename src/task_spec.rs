use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{ActorId, TaskId};

/// Description of one actor-method invocation.
///
/// Immutable by contract once submitted; the single exception is
/// [`skip_execution`](TaskSpec::skip_execution), which is flipped on a *copy*
/// when a previously completed task is re-advertised to a restarted actor.
#[derive(Clone, Serialize, Deserialize)]
pub struct TaskSpec {
    task_id: TaskId,
    actor_id: ActorId,
    actor_counter: u64,
    method: Cow<'static, str>,
    args: Vec<u8>,
    skip_execution: bool,
}

impl TaskSpec {
    /// Creates a spec for `method` on `actor_id`.
    ///
    /// `actor_counter` is the caller-assigned sequence number for this actor:
    /// contiguous from 0 and strictly increasing across the caller's
    /// submissions to that actor. It defines the execution order on the remote
    /// side.
    pub fn new(
        task_id: TaskId,
        actor_id: ActorId,
        actor_counter: u64,
        method: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            task_id,
            actor_id,
            actor_counter,
            method: method.into(),
            args: Vec::new(),
            skip_execution: false,
        }
    }

    /// Attaches serialized call arguments.
    pub fn with_args(mut self, args: Vec<u8>) -> Self {
        self.args = args;
        self
    }

    /// Marks the spec as an already-completed resend.
    ///
    /// The remote actor advances its completion counter past this sequence
    /// number without re-executing the method.
    pub fn with_skip_execution(mut self, skip: bool) -> Self {
        self.skip_execution = skip;
        self
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    pub fn actor_id(&self) -> &ActorId {
        &self.actor_id
    }

    pub fn actor_counter(&self) -> u64 {
        self.actor_counter
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn args(&self) -> &[u8] {
        &self.args
    }

    pub fn skip_execution(&self) -> bool {
        self.skip_execution
    }
}

impl fmt::Debug for TaskSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSpec")
            .field("task_id", &self.task_id)
            .field("actor_id", &self.actor_id)
            .field("actor_counter", &self.actor_counter)
            .field("method", &self.method)
            .field("skip_execution", &self.skip_execution)
            .finish()
    }
}
