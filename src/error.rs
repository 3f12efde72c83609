//! # Error types used by the submitter and its collaborators.
//!
//! This module defines the submitter's error surface:
//!
//! - [`SubmitError`] errors returned synchronously by the public API.
//! - [`RpcError`] the transport-status payload carried by reply callbacks.
//! - [`CreationTaskError`] the recorded reason an actor died during creation.
//! - [`TaskFailureKind`] the wire taxonomy used when reporting task failures.
//!
//! All types provide `as_label` helpers for logs/metrics. Task failures are
//! never surfaced through `Result` returns: they reach the caller
//! asynchronously via the [`TaskFinisher`](crate::finisher::TaskFinisher).

use std::sync::Arc;

use thiserror::Error;

use crate::ids::ActorId;

/// # Errors surfaced synchronously by the submitter API.
///
/// These represent caller contract violations, not task outcomes.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SubmitError {
    /// A task was submitted for an actor with no registered queue.
    #[error("actor '{actor_id}' has no submission queue; register it first")]
    UnknownActor {
        /// The unregistered actor.
        actor_id: ActorId,
    },
}

impl SubmitError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SubmitError::UnknownActor { .. } => "submit_unknown_actor",
        }
    }
}

/// # Transport-level status attached to failed replies.
///
/// Produced by the real transport for network failures, and synthesized by the
/// submitter when inflight callbacks are failed at a lifecycle transition.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum RpcError {
    /// A network-like failure; the request may or may not have reached the actor.
    #[error("io error: {message}")]
    Io {
        /// Human-readable description of the failure.
        message: String,
    },
}

impl RpcError {
    /// Builds an IO-flavored status from a message.
    pub fn io(message: impl Into<String>) -> Self {
        RpcError::Io {
            message: message.into(),
        }
    }

    /// Returns a short stable label.
    pub fn as_label(&self) -> &'static str {
        match self {
            RpcError::Io { .. } => "rpc_io",
        }
    }
}

/// The reason an actor died while executing its creation task.
///
/// Carried on the dead actor's queue and attached to every `ActorDied` report
/// so callers see the root cause rather than a bare death notice.
#[derive(Error, Debug, Clone)]
#[error("actor creation failed: {message}")]
pub struct CreationTaskError {
    /// Description of the creation failure, as published by the directory.
    pub message: String,
}

impl CreationTaskError {
    /// Wraps a creation failure description for sharing across reports.
    pub fn new(message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            message: message.into(),
        })
    }
}

/// How a task failure is classified when reported to the finisher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskFailureKind {
    /// The target actor restarted or died before the task completed.
    ActorDied,
    /// An object argument of the task could not be materialized.
    DependencyResolutionFailed,
}

impl TaskFailureKind {
    /// Returns a short stable label.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskFailureKind::ActorDied => "actor_died",
            TaskFailureKind::DependencyResolutionFailed => "dependency_resolution_failed",
        }
    }
}
