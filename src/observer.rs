use async_trait::async_trait;

use crate::event::{Event, EventKind};

#[async_trait]
pub trait Observer: Send + Sync {
    async fn on_event(&self, event: &Event);
}

/// Reference observer that forwards events to `tracing`.
pub struct LoggerObserver;

#[async_trait]
impl Observer for LoggerObserver {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::ActorConnected => {
                tracing::info!(actor = ?e.actor, restarts = ?e.num_restarts, "actor connected");
            }
            EventKind::ActorRestarting => {
                tracing::info!(actor = ?e.actor, restarts = ?e.num_restarts, "actor restarting");
            }
            EventKind::ActorDead => {
                tracing::warn!(actor = ?e.actor, error = ?e.error, "actor dead");
            }
            EventKind::TaskQueued => {
                tracing::debug!(actor = ?e.actor, task = ?e.task, "task queued");
            }
            EventKind::KillRequested => {
                tracing::info!(actor = ?e.actor, "kill requested");
            }
            EventKind::ExcessQueueing => {
                tracing::warn!(actor = ?e.actor, queued = ?e.queued, "excess queueing");
            }
            EventKind::DeathInfoTimeout => {
                tracing::warn!(actor = ?e.actor, task = ?e.task, "death info timeout");
            }
        }
    }
}
