//! # The client-side actor task submitter.
//!
//! [`ActorTaskSubmitter`] is a monitor over one [`ClientQueue`] per known
//! actor. Three event sources feed it: task submissions from the local caller,
//! dependency-resolution completions, and lifecycle notifications from the
//! actor directory. It reconciles them while keeping each actor's tasks in
//! strict actor-counter order on the wire.
//!
//! # High-level architecture:
//!
//! ```text
//!  caller ──► submit_task ─┐            ┌─► DependencyResolver
//!  directory ─► connect/   ├─► [ mutex ]┤
//!              disconnect ─┘   queues,  └─► outbound sends ──► ActorRpcClient
//!                              outbound           │
//!                                 ▲               ▼ replies / evictions
//!                                 └──── TaskFinisher reports ◄──┘
//! ```
//!
//! The mutex is held only for bookkeeping. Everything that can re-enter on the
//! same stack — the resolver, the finisher, the transport, and every reply
//! callback — is invoked with the lock released. Mutations queue their
//! outbound RPCs in a submitter-wide FIFO under the lock; a single-flusher
//! drain then performs them in queueing order, which keeps the per-actor wire
//! order intact even when several threads mutate concurrently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::client_queue::{ActorState, ClientQueue};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{CreationTaskError, RpcError, SubmitError, TaskFailureKind};
use crate::event::{Event, EventKind};
use crate::finisher::TaskFinisher;
use crate::ids::{ActorId, TaskId};
use crate::observer::Observer;
use crate::resolver::DependencyResolver;
use crate::rpc::{
    ActorAddress, ActorRpcClient, ClientPool, KillActorRequest, PushTaskReply, PushTaskRequest,
    ReplyCallback,
};
use crate::task_spec::TaskSpec;

/// An RPC queued under the lock, performed after release by the flusher.
enum Outbound {
    Push {
        client: Arc<dyn ActorRpcClient>,
        request: PushTaskRequest,
        skip_queue: bool,
        on_reply: ReplyCallback,
    },
    Kill {
        client: Arc<dyn ActorRpcClient>,
        request: KillActorRequest,
    },
}

/// State behind the submitter-wide mutex.
struct Inner {
    queues: HashMap<ActorId, ClientQueue>,
    /// Warn when an actor's unprocessed backlog reaches this; doubled after
    /// each warning.
    next_queueing_warn_threshold: i64,
    /// RPCs queued by the current lock holder(s), drained FIFO by whichever
    /// thread holds the flushing baton.
    outbound: Vec<Outbound>,
    flushing: bool,
}

/// Submits actor tasks in strict per-actor order through pooled RPC clients,
/// tracking each actor through connect, restart, and death.
///
/// All methods are safe to call from any thread. Failures of submitted tasks
/// are never returned from these methods; they are reported through the
/// [`TaskFinisher`].
pub struct ActorTaskSubmitter {
    inner: Mutex<Inner>,
    client_pool: Arc<dyn ClientPool>,
    resolver: Arc<dyn DependencyResolver>,
    finisher: Arc<dyn TaskFinisher>,
    clock: Arc<dyn Clock>,
    config: Config,
    /// Event fan-out to subscribers; publishing never blocks and events with
    /// no subscriber are dropped.
    events: broadcast::Sender<Event>,
}

impl ActorTaskSubmitter {
    /// Creates a submitter over the given collaborators, on the wall clock.
    pub fn new(
        client_pool: Arc<dyn ClientPool>,
        resolver: Arc<dyn DependencyResolver>,
        finisher: Arc<dyn TaskFinisher>,
        config: Config,
    ) -> Arc<Self> {
        Self::with_clock(client_pool, resolver, finisher, config, Arc::new(SystemClock))
    }

    /// Creates a submitter with an explicit clock (manual clocks in tests).
    pub fn with_clock(
        client_pool: Arc<dyn ClientPool>,
        resolver: Arc<dyn DependencyResolver>,
        finisher: Arc<dyn TaskFinisher>,
        config: Config,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(config.bus_capacity);
        Arc::new(Self {
            inner: Mutex::new(Inner {
                queues: HashMap::new(),
                next_queueing_warn_threshold: config.excess_queueing_warn_threshold,
                outbound: Vec::new(),
                flushing: false,
            }),
            client_pool,
            resolver,
            finisher,
            clock,
            config,
            events,
        })
    }

    /// Registers an actor. Idempotent: a worker may hold several references
    /// to the same actor and registers it once per reference.
    pub fn add_actor_queue_if_not_exists(&self, actor_id: &ActorId) {
        let mut inner = self.lock();
        inner
            .queues
            .entry(actor_id.clone())
            .or_insert_with(ClientQueue::new);
    }

    /// Submits a task for execution on its actor.
    ///
    /// Returns `Err` only when the actor was never registered. Every other
    /// outcome — including submission against a dead actor — returns `Ok`,
    /// with the task's fate reported asynchronously via the finisher.
    pub fn submit_task(self: &Arc<Self>, task_spec: TaskSpec) -> Result<(), SubmitError> {
        let task_id = task_spec.task_id().clone();
        let actor_id = task_spec.actor_id().clone();
        let send_pos = task_spec.actor_counter();
        tracing::debug!(%task_id, %actor_id, send_pos, "submitting actor task");

        let mut dead_actor_error = None;
        let task_queued;
        {
            let mut inner = self.lock();
            let queue =
                inner
                    .queues
                    .get_mut(&actor_id)
                    .ok_or_else(|| SubmitError::UnknownActor {
                        actor_id: actor_id.clone(),
                    })?;
            if queue.state != ActorState::Dead {
                // The send order is fixed here, before dependencies resolve,
                // which may happen out of order. The actor executes according
                // to this sequence number.
                if !queue.submit_queue.emplace(send_pos, task_spec.clone()) {
                    tracing::debug!(
                        %task_id,
                        send_pos,
                        "slot already staged; resubmission joins the reserved sequence"
                    );
                }
                task_queued = true;
            } else {
                dead_actor_error = queue.creation_task_error.clone();
                task_queued = false;
            }
        }

        if task_queued {
            // The resolver may complete on this same stack, so the lock must
            // be released before it gets the callback.
            let this = Arc::clone(self);
            let resolve_actor = actor_id.clone();
            self.resolver.resolve_dependencies(
                &task_spec,
                Box::new(move |status| {
                    this.on_dependencies_resolved(&resolve_actor, send_pos, status);
                }),
            );
            self.publish(
                Event::now(EventKind::TaskQueued)
                    .with_actor(actor_id)
                    .with_task(task_id),
            );
        } else {
            self.finisher.mark_task_canceled(task_id.clone());
            let status = RpcError::io("cancelling task of dead actor");
            let _ = self.finisher.pending_task_failed(
                task_id,
                TaskFailureKind::ActorDied,
                Some(&status),
                dead_actor_error,
                false,
            );
        }

        Ok(())
    }

    /// Connects the actor at `address`, adopting restart epoch `num_restarts`.
    ///
    /// Stale epochs and duplicate connects for the current endpoint are
    /// dropped. A newer connect while a previous client is held evicts that
    /// client and fails its inflight replies, then re-sends from the queue
    /// head in order.
    pub fn connect_actor(
        self: &Arc<Self>,
        actor_id: &ActorId,
        address: ActorAddress,
        num_restarts: i64,
    ) {
        tracing::debug!(%actor_id, worker_id = %address.worker_id, num_restarts, "connecting to actor");
        let mut evicted = HashMap::new();
        {
            let mut inner = self.lock();
            let Inner {
                queues,
                next_queueing_warn_threshold,
                outbound,
                ..
            } = &mut *inner;
            let queue = queues
                .get_mut(actor_id)
                .expect("connect for unknown actor queue");
            if num_restarts < queue.num_restarts {
                tracing::info!(
                    %actor_id,
                    num_restarts,
                    seen = queue.num_restarts,
                    "dropping connection for an already-restarted actor"
                );
                return;
            }
            if let Some(client) = &queue.rpc_client {
                if client.addr().same_endpoint(&address) {
                    tracing::debug!(%actor_id, "actor already connected at this endpoint");
                    return;
                }
            }
            if queue.state == ActorState::Dead {
                return;
            }

            queue.num_restarts = num_restarts;
            if queue.rpc_client.is_some() {
                // Still holding a client to the previous incarnation: drop it
                // and fail its outstanding replies once the lock is released.
                queue.disconnect_rpc_client(self.client_pool.as_ref());
                evicted = queue.take_inflight_callbacks();
            }

            queue.state = ActorState::Alive;
            queue.worker_id = Some(address.worker_id.clone());
            queue.rpc_client = Some(self.client_pool.get_or_connect(&address));
            queue.submit_queue.on_client_connected();
            tracing::info!(%actor_id, worker_id = %address.worker_id, "connected to actor");

            self.queue_out_of_order_resends(next_queueing_warn_threshold, queue, outbound);
            self.queue_pending_sends(next_queueing_warn_threshold, queue, outbound);
        }
        self.publish(
            Event::now(EventKind::ActorConnected)
                .with_actor(actor_id.clone())
                .with_restarts(num_restarts),
        );
        self.flush_outbound();
        Self::fail_inflight_tasks(evicted);
    }

    /// Disconnects from a failed actor.
    ///
    /// With `dead = false` the actor is expected back: state moves to
    /// restarting and staged tasks wait for the next connect. With
    /// `dead = true` the queue is terminally cleared: every staged task and
    /// every death-info waiter is failed exactly once.
    pub fn disconnect_actor(
        &self,
        actor_id: &ActorId,
        num_restarts: i64,
        dead: bool,
        creation_error: Option<Arc<CreationTaskError>>,
    ) {
        tracing::debug!(%actor_id, num_restarts, dead, "disconnecting from actor");
        let mut evicted = HashMap::new();
        let mut cleared: Vec<TaskId> = Vec::new();
        let mut death_waiters: Vec<TaskSpec> = Vec::new();
        {
            let mut inner = self.lock();
            let queue = inner
                .queues
                .get_mut(actor_id)
                .expect("disconnect for unknown actor queue");
            if num_restarts <= queue.num_restarts && !dead {
                tracing::info!(
                    %actor_id,
                    num_restarts,
                    seen = queue.num_restarts,
                    "dropping disconnection for an already-restarted actor"
                );
                return;
            }

            // Either the actor is permanently dead or a new client will be
            // inserted once it is restarted.
            queue.disconnect_rpc_client(self.client_pool.as_ref());
            evicted = queue.take_inflight_callbacks();

            if dead {
                queue.state = ActorState::Dead;
                queue.creation_task_error = creation_error.clone();
                cleared = queue.submit_queue.clear_all();
                // Slots with an inflight reply are failed through their
                // evicted callbacks; reporting them here too would
                // double-count.
                cleared.retain(|task_id| !evicted.contains_key(task_id));
                death_waiters = queue
                    .wait_for_death_info_tasks
                    .drain(..)
                    .map(|(_, spec)| spec)
                    .collect();
                if !cleared.is_empty() || !death_waiters.is_empty() {
                    tracing::info!(
                        %actor_id,
                        pending = cleared.len(),
                        waiting = death_waiters.len(),
                        "failing tasks of dead actor"
                    );
                }
                // Tasks already sent and awaiting replies are left to their
                // evicted callbacks; sequencing state is retained so anything
                // submitted after the death fails cleanly.
            } else if queue.state != ActorState::Dead {
                queue.state = ActorState::Restarting;
                queue.num_restarts = num_restarts;
            }
        }

        if dead {
            let status = RpcError::io("cancelling all pending tasks of dead actor");
            for task_id in cleared {
                self.finisher.mark_task_canceled(task_id.clone());
                let _ = self.finisher.pending_task_failed(
                    task_id,
                    TaskFailureKind::ActorDied,
                    Some(&status),
                    creation_error.clone(),
                    false,
                );
            }
            for spec in death_waiters {
                self.finisher.mark_pending_task_failed(
                    &spec,
                    TaskFailureKind::ActorDied,
                    creation_error.clone(),
                );
            }
            let mut event = Event::now(EventKind::ActorDead).with_actor(actor_id.clone());
            if let Some(err) = &creation_error {
                event = event.with_error(err.to_string());
            }
            self.publish(event);
        } else {
            self.publish(
                Event::now(EventKind::ActorRestarting)
                    .with_actor(actor_id.clone())
                    .with_restarts(num_restarts),
            );
        }
        Self::fail_inflight_tasks(evicted);
    }

    /// Asks the actor to exit. Requests coalesce: at most one kill RPC is
    /// pending per actor, and `force_kill` / `no_restart` are only ever
    /// upgraded, never downgraded.
    pub fn kill_actor(self: &Arc<Self>, actor_id: &ActorId, force_kill: bool, no_restart: bool) {
        {
            let mut inner = self.lock();
            let Inner {
                queues,
                next_queueing_warn_threshold,
                outbound,
                ..
            } = &mut *inner;
            let queue = queues
                .get_mut(actor_id)
                .expect("kill for unknown actor queue");
            if let Some(pending) = queue.pending_force_kill.as_mut() {
                if force_kill {
                    pending.force_kill = true;
                    if no_restart {
                        pending.no_restart = true;
                    }
                }
            } else {
                queue.pending_force_kill = Some(KillActorRequest {
                    intended_actor_id: actor_id.clone(),
                    force_kill,
                    no_restart,
                });
            }
            // Flush right away if a client is available; otherwise the kill
            // goes out at the next connect.
            self.queue_pending_sends(next_queueing_warn_threshold, queue, outbound);
        }
        self.publish(Event::now(EventKind::KillRequested).with_actor(actor_id.clone()));
        self.flush_outbound();
    }

    /// Fails every parked task whose death-info deadline has passed.
    ///
    /// Driven by [`spawn_timeout_sweeper`](Self::spawn_timeout_sweeper) or an
    /// external periodic timer.
    pub fn check_timeout_tasks(&self) {
        let now = self.clock.now_ms();
        let mut expired: Vec<TaskSpec> = Vec::new();
        {
            let mut inner = self.lock();
            for queue in inner.queues.values_mut() {
                while queue
                    .wait_for_death_info_tasks
                    .front()
                    .map_or(false, |(deadline, _)| *deadline < now)
                {
                    if let Some((_, spec)) = queue.wait_for_death_info_tasks.pop_front() {
                        expired.push(spec);
                    }
                }
            }
        }
        for spec in expired {
            tracing::info!(
                task_id = %spec.task_id(),
                "no death notification before the deadline; failing task"
            );
            self.publish(
                Event::now(EventKind::DeathInfoTimeout)
                    .with_actor(spec.actor_id().clone())
                    .with_task(spec.task_id().clone()),
            );
            self.finisher
                .mark_pending_task_failed(&spec, TaskFailureKind::ActorDied, None);
        }
    }

    /// Spawns the periodic timeout sweep; stops when `token` is cancelled.
    pub fn spawn_timeout_sweeper(self: &Arc<Self>, token: CancellationToken) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let mut tick = time::interval(this.config.sweep_interval);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tick.tick() => this.check_timeout_tasks(),
                }
            }
        })
    }

    /// Whether an RPC client to the actor is currently connected.
    pub fn is_actor_alive(&self, actor_id: &ActorId) -> bool {
        let inner = self.lock();
        inner
            .queues
            .get(actor_id)
            .map_or(false, |queue| queue.rpc_client.is_some())
    }

    /// Subscribes to submitter events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Spawns a listener forwarding events to `observer`.
    pub fn observe(&self, observer: Arc<dyn Observer>) -> JoinHandle<()> {
        let mut rx = self.events.subscribe();
        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                observer.on_event(&ev).await;
            }
        })
    }

    // ---- Internals ----

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: Event) {
        let _ = self.events.send(event);
    }

    /// Completion of dependency resolution for the slot at `send_pos`.
    fn on_dependencies_resolved(
        self: &Arc<Self>,
        actor_id: &ActorId,
        send_pos: u64,
        status: Result<(), RpcError>,
    ) {
        let mut dep_failed: Option<(TaskId, RpcError)> = None;
        {
            let mut inner = self.lock();
            let Inner {
                queues,
                next_queueing_warn_threshold,
                outbound,
                ..
            } = &mut *inner;
            let queue = queues
                .get_mut(actor_id)
                .expect("resolution for unknown actor queue");
            // The slot may have been cleared by a restart or death since the
            // resolution started; a late completion is a no-op.
            if !queue.submit_queue.contains(send_pos) {
                return;
            }
            match status {
                Ok(()) => {
                    queue.submit_queue.mark_dependency_resolved(send_pos);
                    self.queue_pending_sends(next_queueing_warn_threshold, queue, outbound);
                }
                Err(err) => {
                    let task_id = queue
                        .submit_queue
                        .get(send_pos)
                        .map(|(spec, _)| spec.task_id().clone())
                        .expect("staged slot has a spec");
                    queue.submit_queue.mark_dependency_failed(send_pos);
                    dep_failed = Some((task_id, err));
                }
            }
        }
        self.flush_outbound();
        if let Some((task_id, status)) = dep_failed {
            let _ = self.finisher.pending_task_failed(
                task_id,
                TaskFailureKind::DependencyResolutionFailed,
                Some(&status),
                None,
                false,
            );
        }
    }

    /// Queues the pending kill (if any) and every contiguous sendable task.
    /// Caller holds the lock; the queued RPCs go out at the next flush.
    fn queue_pending_sends(
        self: &Arc<Self>,
        warn_threshold: &mut i64,
        queue: &mut ClientQueue,
        outbound: &mut Vec<Outbound>,
    ) {
        let Some(client) = queue.rpc_client.clone() else {
            return;
        };

        // The kill goes first so it is not stuck behind task backpressure.
        if let Some(request) = queue.pending_force_kill.take() {
            tracing::info!(actor_id = %request.intended_actor_id, "sending kill request to actor");
            outbound.push(Outbound::Kill {
                client: client.clone(),
                request,
            });
        }

        while let Some((task_spec, skip_queue)) = queue.submit_queue.pop_next_task_to_send() {
            let send = self.build_push(warn_threshold, queue, task_spec, skip_queue);
            outbound.push(send);
        }
    }

    /// Re-advertises tasks that completed out of order in a previous
    /// incarnation, so the reconnected actor advances its completion counter
    /// without re-executing them. Caller holds the lock.
    fn queue_out_of_order_resends(
        self: &Arc<Self>,
        warn_threshold: &mut i64,
        queue: &mut ClientQueue,
        outbound: &mut Vec<Outbound>,
    ) {
        if queue.rpc_client.is_none() {
            return;
        }
        for (_, completed) in queue.submit_queue.pop_all_out_of_order_completed() {
            let resend = completed.with_skip_execution(true);
            let send = self.build_push(warn_threshold, queue, resend, /*skip_queue=*/ true);
            outbound.push(send);
        }
    }

    /// Builds one push and registers its reply shim. Caller holds the lock.
    ///
    /// Reply handling is two-layered: the inner callback (stored in the
    /// inflight map) decides what to do with the outcome; the wrapper handed
    /// to the transport only looks the inner one up and drops the reply if it
    /// was evicted by a restart in the meantime.
    fn build_push(
        self: &Arc<Self>,
        warn_threshold: &mut i64,
        queue: &mut ClientQueue,
        task_spec: TaskSpec,
        skip_queue: bool,
    ) -> Outbound {
        let client = queue
            .rpc_client
            .clone()
            .expect("push without a connected client");
        let worker_id = queue.worker_id.clone().expect("push without a worker id");
        let sequence_number = queue.submit_queue.sequence_number(&task_spec);
        let task_id = task_spec.task_id().clone();
        let actor_id = task_spec.actor_id().clone();
        let task_skipped = task_spec.skip_execution();

        let num_queued = sequence_number as i64 - client.processed_up_to_seqno();
        tracing::debug!(
            %task_id,
            %actor_id,
            seq = sequence_number,
            num_queued,
            "pushing task to actor"
        );
        if num_queued >= *warn_threshold {
            tracing::warn!(%actor_id, num_queued, "excess queueing of tasks to actor");
            self.publish(
                Event::now(EventKind::ExcessQueueing)
                    .with_actor(actor_id.clone())
                    .with_queued(num_queued),
            );
            *warn_threshold *= 2;
        }

        let request = PushTaskRequest {
            task_spec: task_spec.clone(),
            intended_worker_id: worker_id,
            sequence_number,
        };

        let addr = client.addr();
        // Weak: the inner callback is stored inside the submitter and a
        // strong handle would cycle.
        let this = Arc::downgrade(self);
        let reply_spec = task_spec;
        let inner_callback: ReplyCallback = Box::new(move |result| {
            if let Some(this) = this.upgrade() {
                this.on_task_reply(addr, reply_spec, task_skipped, result);
            }
        });
        queue
            .inflight_task_callbacks
            .insert(task_id.clone(), inner_callback);

        let this = Arc::clone(self);
        let wrapped: ReplyCallback = Box::new(move |result| {
            let callback = {
                let mut inner = this.lock();
                let queue = inner
                    .queues
                    .get_mut(&actor_id)
                    .expect("reply for unknown actor queue");
                match queue.inflight_task_callbacks.remove(&task_id) {
                    Some(cb) => cb,
                    None => {
                        // Evicted at a restart boundary and already failed.
                        tracing::debug!(%task_id, "reply for an already-failed task; ignoring");
                        return;
                    }
                }
            };
            callback(result);
        });

        Outbound::Push {
            client,
            request,
            skip_queue,
            on_reply: wrapped,
        }
    }

    /// Inner reply handler, invoked with the lock released.
    fn on_task_reply(
        self: &Arc<Self>,
        actor_addr: ActorAddress,
        task_spec: TaskSpec,
        task_skipped: bool,
        result: Result<PushTaskReply, RpcError>,
    ) {
        let task_id = task_spec.task_id().clone();
        let actor_id = task_spec.actor_id().clone();
        let actor_counter = task_spec.actor_counter();
        let mut release_slot = true;

        if task_skipped {
            // Reply to a skip-execution resend: the task completed in a
            // previous incarnation and was reported back then. Only the queue
            // bookkeeping advances, whatever the status.
        } else {
            match result {
                Ok(reply) => {
                    self.finisher
                        .complete_pending_task(task_id.clone(), reply, actor_addr);
                }
                Err(status) => {
                    // Network-flavored failure: the actor may be restarting or
                    // dead without a notification having arrived yet.
                    let (actor_dead, creation_error) = {
                        let inner = self.lock();
                        let queue = inner
                            .queues
                            .get(&actor_id)
                            .expect("reply for unknown actor queue");
                        (
                            queue.state == ActorState::Dead,
                            queue.creation_task_error.clone(),
                        )
                    };
                    let will_retry = self.finisher.pending_task_failed(
                        task_id.clone(),
                        TaskFailureKind::ActorDied,
                        Some(&status),
                        creation_error,
                        actor_dead,
                    );
                    if will_retry {
                        // The finisher resubmits with the same counter; keep
                        // the slot reserved so the sequence is preserved.
                        release_slot = false;
                    } else if !actor_dead {
                        self.park_for_death_info(&actor_id, &task_spec);
                    }
                    // Known dead: the failure above was final.
                }
            }
        }

        if release_slot {
            let mut inner = self.lock();
            let queue = inner
                .queues
                .get_mut(&actor_id)
                .expect("reply for unknown actor queue");
            queue.submit_queue.mark_task_completed(actor_counter, task_spec);
        }
    }

    /// Holds a network-failed task until the actor's death is confirmed or
    /// the configured deadline passes.
    fn park_for_death_info(&self, actor_id: &ActorId, task_spec: &TaskSpec) {
        let deadline =
            self.clock.now_ms() + self.config.wait_for_death_info_timeout.as_millis() as i64;
        let died_meanwhile = {
            let mut inner = self.lock();
            let queue = inner
                .queues
                .get_mut(actor_id)
                .expect("parking for unknown actor queue");
            if queue.state == ActorState::Dead {
                Some(queue.creation_task_error.clone())
            } else {
                queue
                    .wait_for_death_info_tasks
                    .push_back((deadline, task_spec.clone()));
                tracing::info!(
                    task_id = %task_spec.task_id(),
                    wait_queue = queue.wait_for_death_info_tasks.len(),
                    "push failed with a network error; holding task until actor death is confirmed"
                );
                None
            }
        };
        if let Some(creation_error) = died_meanwhile {
            // The death landed while the lock was released around the retry
            // decision, so the death handler missed this task.
            self.finisher.mark_pending_task_failed(
                task_spec,
                TaskFailureKind::ActorDied,
                creation_error,
            );
        }
    }

    /// Performs queued RPCs in queueing order.
    ///
    /// Exactly one thread drains at a time; latecomers append under the lock
    /// and leave. Serializing the drain is what extends the per-actor order
    /// guarantee from the queue to the transport.
    fn flush_outbound(&self) {
        let mut batch = {
            let mut inner = self.lock();
            if inner.flushing || inner.outbound.is_empty() {
                return;
            }
            inner.flushing = true;
            std::mem::take(&mut inner.outbound)
        };
        loop {
            for send in batch.drain(..) {
                match send {
                    Outbound::Push {
                        client,
                        request,
                        skip_queue,
                        on_reply,
                    } => client.push_actor_task(request, skip_queue, on_reply),
                    Outbound::Kill { client, request } => client.kill_actor(request, None),
                }
            }
            let mut inner = self.lock();
            if inner.outbound.is_empty() {
                inner.flushing = false;
                return;
            }
            batch = std::mem::take(&mut inner.outbound);
        }
    }

    /// Fails evicted reply handlers with a synthesized network status, so the
    /// normal reply path decides between retry, parking, and final failure.
    /// Never called with the lock held.
    fn fail_inflight_tasks(callbacks: HashMap<TaskId, ReplyCallback>) {
        let status = RpcError::io("fail all inflight tasks due to actor state change");
        for (_, callback) in callbacks {
            callback(Err(status.clone()));
        }
    }
}
