use std::time::SystemTime;

use crate::ids::{ActorId, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    ActorConnected,
    ActorRestarting,
    ActorDead,
    TaskQueued,
    KillRequested,
    ExcessQueueing,
    DeathInfoTimeout,
}

#[derive(Debug, Clone)]
pub struct Event {
    pub num_restarts: Option<i64>,
    pub queued: Option<i64>,
    pub error: Option<String>,
    pub actor: Option<ActorId>,
    pub task: Option<TaskId>,
    pub kind: EventKind,
    pub at: SystemTime,
}

impl Event {
    pub fn now(kind: EventKind) -> Self {
        Self {
            kind,
            at: SystemTime::now(),
            num_restarts: None,
            queued: None,
            error: None,
            actor: None,
            task: None,
        }
    }

    pub fn with_actor(mut self, actor: ActorId) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn with_task(mut self, task: TaskId) -> Self {
        self.task = Some(task);
        self
    }

    pub fn with_restarts(mut self, n: i64) -> Self {
        self.num_restarts = Some(n);
        self
    }

    pub fn with_queued(mut self, n: i64) -> Self {
        self.queued = Some(n);
        self
    }

    pub fn with_error(mut self, msg: impl Into<String>) -> Self {
        self.error = Some(msg.into());
        self
    }
}
