//! Dependency resolution seam.
//!
//! Object arguments of a task may not have materialized locally when the task
//! is submitted. The resolver waits for them and fires the completion callback
//! exactly once — possibly synchronously, on the submitting stack. The
//! submitter therefore never calls into the resolver while holding its lock.

use crate::error::RpcError;
use crate::task_spec::TaskSpec;

/// Completion callback for one resolution; `Err` carries the failure status.
pub type ResolveCallback = Box<dyn FnOnce(Result<(), RpcError>) + Send>;

/// Resolves the object arguments of a task before it is sent.
pub trait DependencyResolver: Send + Sync {
    fn resolve_dependencies(&self, spec: &TaskSpec, on_complete: ResolveCallback);
}

/// Resolver for tasks without object arguments: completes synchronously.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDependencies;

impl DependencyResolver for NoDependencies {
    fn resolve_dependencies(&self, _spec: &TaskSpec, on_complete: ResolveCallback) {
        on_complete(Ok(()));
    }
}
