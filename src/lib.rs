//! # actorq
//!
//! **Actorq** is a client-side actor task submitter.
//!
//! It accepts actor-method invocations from a local caller, enforces an exact
//! send order to each remote actor, resolves argument dependencies, and drives
//! the failure / restart / death protocol over pooled RPC clients. The crate
//! is designed as a building block for a worker process: the transport, the
//! dependency resolver, and the completion reporter plug in as traits.
//!
//! ## Features
//!
//! | Area               | Description                                                     | Key types / traits                                  |
//! |--------------------|-----------------------------------------------------------------|-----------------------------------------------------|
//! | **Submission**     | Strict per-actor send order, fixed at submit time.              | [`ActorTaskSubmitter`], [`TaskSpec`]                |
//! | **Lifecycle**      | Connect / restart / death reconciled by restart epoch.          | [`ActorTaskSubmitter`]                              |
//! | **Seams**          | Transport, resolution, and reporting supplied by the host.      | [`ActorRpcClient`], [`ClientPool`], [`DependencyResolver`], [`TaskFinisher`] |
//! | **Observer API**   | Hook into submitter events (logging, metrics, custom observers).| [`Observer`], [`Event`], [`EventKind`]              |
//! | **Errors**         | Typed API errors and the wire failure taxonomy.                 | [`SubmitError`], [`RpcError`], [`TaskFailureKind`]  |
//! | **Configuration**  | Centralized runtime settings.                                   | [`Config`]                                          |
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use actorq::{
//!     ActorAddress, ActorId, ActorRpcClient, ActorTaskSubmitter, ClientPool, Config,
//!     CreationTaskError, KillActorRequest, KillCallback, NoDependencies, PushTaskReply,
//!     PushTaskRequest, ReplyCallback, RpcError, TaskFailureKind, TaskFinisher, TaskId,
//!     TaskSpec, WorkerId,
//! };
//!
//! // A transport that completes every push immediately.
//! struct LoopbackClient(ActorAddress);
//!
//! impl ActorRpcClient for LoopbackClient {
//!     fn addr(&self) -> ActorAddress {
//!         self.0.clone()
//!     }
//!     fn push_actor_task(&self, _req: PushTaskRequest, _skip: bool, on_reply: ReplyCallback) {
//!         on_reply(Ok(PushTaskReply::default()));
//!     }
//!     fn kill_actor(&self, _req: KillActorRequest, _on_reply: Option<KillCallback>) {}
//!     fn processed_up_to_seqno(&self) -> i64 {
//!         -1
//!     }
//! }
//!
//! struct Pool;
//!
//! impl ClientPool for Pool {
//!     fn get_or_connect(&self, address: &ActorAddress) -> Arc<dyn ActorRpcClient> {
//!         Arc::new(LoopbackClient(address.clone()))
//!     }
//!     fn disconnect(&self, _worker_id: &WorkerId) {}
//! }
//!
//! struct Printer;
//!
//! impl TaskFinisher for Printer {
//!     fn complete_pending_task(&self, task_id: TaskId, _r: PushTaskReply, _a: ActorAddress) {
//!         println!("completed {task_id}");
//!     }
//!     fn pending_task_failed(
//!         &self,
//!         task_id: TaskId,
//!         kind: TaskFailureKind,
//!         _status: Option<&RpcError>,
//!         _creation_error: Option<Arc<CreationTaskError>>,
//!         _immediately_mark_object_fail: bool,
//!     ) -> bool {
//!         println!("failed {task_id}: {}", kind.as_label());
//!         false
//!     }
//!     fn mark_pending_task_failed(
//!         &self,
//!         _spec: &TaskSpec,
//!         _kind: TaskFailureKind,
//!         _creation_error: Option<Arc<CreationTaskError>>,
//!     ) {
//!     }
//!     fn mark_task_canceled(&self, _task_id: TaskId) {}
//! }
//!
//! let submitter = ActorTaskSubmitter::new(
//!     Arc::new(Pool),
//!     Arc::new(NoDependencies),
//!     Arc::new(Printer),
//!     Config::default(),
//! );
//!
//! let actor = ActorId::new("counter");
//! submitter.add_actor_queue_if_not_exists(&actor);
//! submitter.connect_actor(
//!     &actor,
//!     ActorAddress::new("10.0.0.7", 7199, WorkerId::new("worker-1")),
//!     0,
//! );
//! submitter
//!     .submit_task(TaskSpec::new(TaskId::new("t-0"), actor, 0, "increment"))
//!     .unwrap();
//! ```
//!
//! ---

mod client_queue;
mod clock;
mod config;
mod error;
mod event;
mod finisher;
mod ids;
mod observer;
mod resolver;
mod rpc;
mod submit_queue;
mod submitter;
mod task_spec;

// ---- Public re-exports ----

pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use error::{CreationTaskError, RpcError, SubmitError, TaskFailureKind};
pub use event::{Event, EventKind};
pub use finisher::TaskFinisher;
pub use ids::{ActorId, TaskId, WorkerId};
pub use observer::{LoggerObserver, Observer};
pub use resolver::{DependencyResolver, NoDependencies, ResolveCallback};
pub use rpc::{
    ActorAddress, ActorRpcClient, ClientPool, KillActorRequest, KillCallback, PushTaskReply,
    PushTaskRequest, ReplyCallback,
};
pub use submitter::ActorTaskSubmitter;
pub use task_spec::TaskSpec;
