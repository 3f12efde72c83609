//! # Wire-facing types and the transport seams.
//!
//! The submitter never owns a socket: it talks to remote actors through
//! [`ActorRpcClient`] handles checked out of a [`ClientPool`]. Both are
//! supplied by the embedding process. Requests and replies are plain data;
//! reply delivery is callback-based and a transport is allowed to invoke a
//! callback synchronously on the caller's stack.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::RpcError;
use crate::ids::{ActorId, WorkerId};
use crate::task_spec::TaskSpec;

/// Reply handler for a pushed task.
pub type ReplyCallback = Box<dyn FnOnce(Result<PushTaskReply, RpcError>) + Send>;

/// Reply handler for a kill request.
pub type KillCallback = Box<dyn FnOnce(Result<(), RpcError>) + Send>;

/// Network location of one actor incarnation.
///
/// The worker id changes on every restart; ip and port may or may not.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorAddress {
    pub ip_address: String,
    pub port: u16,
    pub worker_id: WorkerId,
}

impl ActorAddress {
    pub fn new(ip_address: impl Into<String>, port: u16, worker_id: WorkerId) -> Self {
        Self {
            ip_address: ip_address.into(),
            port,
            worker_id,
        }
    }

    /// Whether two addresses point at the same network endpoint.
    ///
    /// Worker ids are deliberately ignored: a connect notification for the
    /// endpoint we already talk to is a duplicate, not a new incarnation.
    pub fn same_endpoint(&self, other: &ActorAddress) -> bool {
        self.ip_address == other.ip_address && self.port == other.port
    }
}

impl fmt::Display for ActorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip_address, self.port)
    }
}

/// One task push as it goes on the wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PushTaskRequest {
    /// Copy of the submitted spec (possibly with `skip_execution` set).
    pub task_spec: TaskSpec,
    /// The incarnation this request is meant for; the remote side rejects
    /// requests addressed to a previous incarnation.
    pub intended_worker_id: WorkerId,
    /// Execution order on the remote actor; equals the spec's actor counter.
    pub sequence_number: u64,
}

/// Result payload of a completed task.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PushTaskReply {
    pub result: Vec<u8>,
}

/// Request that an actor exit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KillActorRequest {
    pub intended_actor_id: ActorId,
    /// Kill the process instead of letting the actor exit cleanly.
    pub force_kill: bool,
    /// Prevent the directory from restarting the killed actor.
    pub no_restart: bool,
}

/// A connected transport handle for one actor incarnation.
pub trait ActorRpcClient: Send + Sync {
    /// The address this client is connected to.
    fn addr(&self) -> ActorAddress;

    /// Sends a task. `skip_queue` bypasses the transport's own ordered queue;
    /// used only for skip-execution resends. `on_reply` fires exactly once.
    fn push_actor_task(&self, request: PushTaskRequest, skip_queue: bool, on_reply: ReplyCallback);

    /// Sends a kill request. A `None` callback makes it fire-and-forget.
    fn kill_actor(&self, request: KillActorRequest, on_reply: Option<KillCallback>);

    /// Highest sequence number the remote actor is known to have processed.
    fn processed_up_to_seqno(&self) -> i64;
}

/// Pool the submitter checks client handles out of.
///
/// The submitter holds at most one handle per actor queue and returns it via
/// [`disconnect`](ClientPool::disconnect) on every eviction.
pub trait ClientPool: Send + Sync {
    fn get_or_connect(&self, address: &ActorAddress) -> Arc<dyn ActorRpcClient>;
    fn disconnect(&self, worker_id: &WorkerId);
}
