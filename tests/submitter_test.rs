//! End-to-end tests for the submitter.
//!
//! All collaborators are mocks driven by hand: the resolver can complete out
//! of order, the transport records pushes and lets tests fire replies, and the
//! clock is manual so death-info deadlines are deterministic.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use actorq::{
    ActorAddress, ActorId, ActorRpcClient, ActorTaskSubmitter, ClientPool, Clock, Config,
    CreationTaskError, DependencyResolver, EventKind, KillActorRequest, KillCallback,
    NoDependencies, PushTaskReply, PushTaskRequest, ReplyCallback, ResolveCallback, RpcError,
    TaskFailureKind, TaskFinisher, TaskId, TaskSpec, WorkerId,
};

// ---- Mock collaborators ----

/// Resolver that parks every resolution until the test releases it.
#[derive(Default)]
struct ManualResolver {
    pending: Mutex<Vec<(u64, ResolveCallback)>>,
}

impl DependencyResolver for ManualResolver {
    fn resolve_dependencies(&self, spec: &TaskSpec, on_complete: ResolveCallback) {
        self.pending
            .lock()
            .unwrap()
            .push((spec.actor_counter(), on_complete));
    }
}

impl ManualResolver {
    fn resolve(&self, counter: u64, status: Result<(), RpcError>) {
        let callback = {
            let mut pending = self.pending.lock().unwrap();
            let idx = pending
                .iter()
                .position(|(c, _)| *c == counter)
                .expect("no pending resolution for counter");
            pending.remove(idx).1
        };
        callback(status);
    }
}

/// Finisher that records every report and returns a configurable retry answer.
#[derive(Default)]
struct RecordingFinisher {
    completed: Mutex<Vec<TaskId>>,
    /// (task, failure label, immediately_mark_object_fail, creation message)
    failed: Mutex<Vec<(TaskId, &'static str, bool, Option<String>)>>,
    finalized: Mutex<Vec<TaskId>>,
    canceled: Mutex<Vec<TaskId>>,
    will_retry: Mutex<bool>,
}

impl TaskFinisher for RecordingFinisher {
    fn complete_pending_task(&self, task_id: TaskId, _reply: PushTaskReply, _addr: ActorAddress) {
        self.completed.lock().unwrap().push(task_id);
    }

    fn pending_task_failed(
        &self,
        task_id: TaskId,
        kind: TaskFailureKind,
        _status: Option<&RpcError>,
        creation_error: Option<Arc<CreationTaskError>>,
        immediately_mark_object_fail: bool,
    ) -> bool {
        self.failed.lock().unwrap().push((
            task_id,
            kind.as_label(),
            immediately_mark_object_fail,
            creation_error.map(|e| e.message.clone()),
        ));
        *self.will_retry.lock().unwrap()
    }

    fn mark_pending_task_failed(
        &self,
        spec: &TaskSpec,
        _kind: TaskFailureKind,
        _creation_error: Option<Arc<CreationTaskError>>,
    ) {
        self.finalized.lock().unwrap().push(spec.task_id().clone());
    }

    fn mark_task_canceled(&self, task_id: TaskId) {
        self.canceled.lock().unwrap().push(task_id);
    }
}

impl RecordingFinisher {
    fn set_will_retry(&self, retry: bool) {
        *self.will_retry.lock().unwrap() = retry;
    }

    fn completed_ids(&self) -> Vec<String> {
        self.completed
            .lock()
            .unwrap()
            .iter()
            .map(|id| id.as_str().to_string())
            .collect()
    }

    fn failure_count(&self) -> usize {
        self.failed.lock().unwrap().len()
    }
}

/// Transport client that records pushes and lets tests fire replies by hand.
struct MockClient {
    addr: ActorAddress,
    pushes: Mutex<Vec<(PushTaskRequest, bool)>>,
    replies: Mutex<Vec<(TaskId, ReplyCallback)>>,
    kills: Mutex<Vec<KillActorRequest>>,
}

impl MockClient {
    fn new(addr: ActorAddress) -> Self {
        Self {
            addr,
            pushes: Mutex::new(Vec::new()),
            replies: Mutex::new(Vec::new()),
            kills: Mutex::new(Vec::new()),
        }
    }

    fn sequence_numbers(&self) -> Vec<u64> {
        self.pushes
            .lock()
            .unwrap()
            .iter()
            .map(|(req, _)| req.sequence_number)
            .collect()
    }

    fn push_at(&self, idx: usize) -> (PushTaskRequest, bool) {
        self.pushes.lock().unwrap()[idx].clone()
    }

    fn push_count(&self) -> usize {
        self.pushes.lock().unwrap().len()
    }

    fn kill_requests(&self) -> Vec<KillActorRequest> {
        self.kills.lock().unwrap().clone()
    }

    fn reply(&self, task: &str, result: Result<PushTaskReply, RpcError>) {
        let callback = {
            let mut replies = self.replies.lock().unwrap();
            let idx = replies
                .iter()
                .position(|(id, _)| id.as_str() == task)
                .expect("no pending reply for task");
            replies.remove(idx).1
        };
        callback(result);
    }

    fn reply_all_ok(&self) {
        let callbacks: Vec<_> = self.replies.lock().unwrap().drain(..).collect();
        for (_, callback) in callbacks {
            callback(Ok(PushTaskReply::default()));
        }
    }
}

impl ActorRpcClient for MockClient {
    fn addr(&self) -> ActorAddress {
        self.addr.clone()
    }

    fn push_actor_task(&self, request: PushTaskRequest, skip_queue: bool, on_reply: ReplyCallback) {
        let task_id = request.task_spec.task_id().clone();
        self.pushes.lock().unwrap().push((request, skip_queue));
        self.replies.lock().unwrap().push((task_id, on_reply));
    }

    fn kill_actor(&self, request: KillActorRequest, _on_reply: Option<KillCallback>) {
        self.kills.lock().unwrap().push(request);
    }

    fn processed_up_to_seqno(&self) -> i64 {
        -1
    }
}

/// Pool keyed by endpoint; records returned shares.
#[derive(Default)]
struct MockPool {
    clients: Mutex<HashMap<String, Arc<MockClient>>>,
    connects: Mutex<usize>,
    disconnected: Mutex<Vec<WorkerId>>,
}

impl MockPool {
    fn client_for(&self, address: &ActorAddress) -> Arc<MockClient> {
        let key = format!("{}:{}", address.ip_address, address.port);
        self.clients
            .lock()
            .unwrap()
            .entry(key)
            .or_insert_with(|| Arc::new(MockClient::new(address.clone())))
            .clone()
    }

    fn connect_count(&self) -> usize {
        *self.connects.lock().unwrap()
    }

    fn disconnected_workers(&self) -> Vec<WorkerId> {
        self.disconnected.lock().unwrap().clone()
    }
}

impl ClientPool for MockPool {
    fn get_or_connect(&self, address: &ActorAddress) -> Arc<dyn ActorRpcClient> {
        *self.connects.lock().unwrap() += 1;
        self.client_for(address)
    }

    fn disconnect(&self, worker_id: &WorkerId) {
        self.disconnected.lock().unwrap().push(worker_id.clone());
    }
}

#[derive(Default)]
struct ManualClock(AtomicI64);

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

impl ManualClock {
    fn advance(&self, ms: i64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

// ---- Harness ----

struct Harness<R> {
    submitter: Arc<ActorTaskSubmitter>,
    pool: Arc<MockPool>,
    finisher: Arc<RecordingFinisher>,
    resolver: Arc<R>,
    clock: Arc<ManualClock>,
}

fn harness_with_config<R: DependencyResolver + 'static>(resolver: R, config: Config) -> Harness<R> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let pool = Arc::new(MockPool::default());
    let finisher = Arc::new(RecordingFinisher::default());
    let resolver = Arc::new(resolver);
    let clock = Arc::new(ManualClock::default());
    let submitter = ActorTaskSubmitter::with_clock(
        pool.clone(),
        resolver.clone(),
        finisher.clone(),
        config,
        clock.clone(),
    );
    Harness {
        submitter,
        pool,
        finisher,
        resolver,
        clock,
    }
}

fn harness<R: DependencyResolver + 'static>(resolver: R) -> Harness<R> {
    harness_with_config(resolver, Config::default())
}

fn actor() -> ActorId {
    ActorId::new("A")
}

fn addr(n: u16) -> ActorAddress {
    ActorAddress::new(format!("10.0.0.{n}"), 7000 + n, WorkerId::new(format!("w-{n}")))
}

fn spec(counter: u64) -> TaskSpec {
    TaskSpec::new(
        TaskId::new(format!("t-{counter}")),
        actor(),
        counter,
        "method",
    )
}

// ---- Scenarios ----

#[test]
fn happy_path_pushes_in_order_and_completes() {
    let h = harness(NoDependencies);
    h.submitter.add_actor_queue_if_not_exists(&actor());
    h.submitter.connect_actor(&actor(), addr(1), 0);

    h.submitter.submit_task(spec(0)).unwrap();
    h.submitter.submit_task(spec(1)).unwrap();

    let client = h.pool.client_for(&addr(1));
    assert_eq!(client.sequence_numbers(), vec![0, 1]);
    for idx in 0..2 {
        let (request, skip_queue) = client.push_at(idx);
        assert_eq!(request.intended_worker_id, addr(1).worker_id);
        assert!(!skip_queue);
        assert!(!request.task_spec.skip_execution());
    }

    client.reply_all_ok();
    assert_eq!(h.finisher.completed_ids(), vec!["t-0", "t-1"]);
    assert_eq!(h.finisher.failure_count(), 0);
}

#[test]
fn out_of_order_resolution_still_sends_in_counter_order() {
    let h = harness(ManualResolver::default());
    h.submitter.add_actor_queue_if_not_exists(&actor());
    h.submitter.connect_actor(&actor(), addr(1), 0);

    h.submitter.submit_task(spec(0)).unwrap();
    h.submitter.submit_task(spec(1)).unwrap();

    let client = h.pool.client_for(&addr(1));
    h.resolver.resolve(1, Ok(()));
    assert_eq!(client.push_count(), 0, "counter 1 must wait for counter 0");

    h.resolver.resolve(0, Ok(()));
    assert_eq!(client.sequence_numbers(), vec![0, 1]);
}

#[test]
fn middle_dependency_failure_releases_later_tasks() {
    let h = harness(ManualResolver::default());
    h.submitter.add_actor_queue_if_not_exists(&actor());
    h.submitter.connect_actor(&actor(), addr(1), 0);

    for counter in 0..3 {
        h.submitter.submit_task(spec(counter)).unwrap();
    }
    h.resolver.resolve(0, Ok(()));
    h.resolver.resolve(1, Err(RpcError::io("object lost")));
    h.resolver.resolve(2, Ok(()));

    let client = h.pool.client_for(&addr(1));
    assert_eq!(client.sequence_numbers(), vec![0, 2]);

    let failed = h.finisher.failed.lock().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].0.as_str(), "t-1");
    assert_eq!(failed[0].1, "dependency_resolution_failed");
}

#[test]
fn restart_evicts_inflight_and_resends_to_new_incarnation() {
    let h = harness(NoDependencies);
    h.finisher.set_will_retry(true);
    h.submitter.add_actor_queue_if_not_exists(&actor());
    h.submitter.connect_actor(&actor(), addr(1), 0);

    h.submitter.submit_task(spec(0)).unwrap();
    h.submitter.submit_task(spec(1)).unwrap();
    let old_client = h.pool.client_for(&addr(1));
    assert_eq!(old_client.sequence_numbers(), vec![0, 1]);

    // Both replies still outstanding when the actor goes down.
    h.submitter.disconnect_actor(&actor(), 1, false, None);
    assert!(!h.submitter.is_actor_alive(&actor()));
    assert_eq!(
        h.pool.disconnected_workers(),
        vec![addr(1).worker_id],
        "the evicted client share must be returned to the pool"
    );
    // The evicted callbacks were failed as network errors and chose retry.
    {
        let failed = h.finisher.failed.lock().unwrap();
        assert_eq!(failed.len(), 2);
        assert!(failed.iter().all(|f| f.1 == "actor_died" && !f.2));
    }

    h.submitter.connect_actor(&actor(), addr(2), 1);
    assert!(h.submitter.is_actor_alive(&actor()));
    let new_client = h.pool.client_for(&addr(2));
    assert_eq!(new_client.sequence_numbers(), vec![0, 1]);
    let (request, _) = new_client.push_at(0);
    assert_eq!(request.intended_worker_id, addr(2).worker_id);
}

#[test]
fn submission_to_dead_actor_fails_without_transport_call() {
    let h = harness(NoDependencies);
    h.submitter.add_actor_queue_if_not_exists(&actor());
    h.submitter.connect_actor(&actor(), addr(1), 0);
    h.submitter
        .disconnect_actor(&actor(), 1, true, Some(CreationTaskError::new("boom")));

    assert!(h.submitter.submit_task(spec(0)).is_ok());

    let client = h.pool.client_for(&addr(1));
    assert_eq!(client.push_count(), 0);
    assert_eq!(
        h.finisher
            .canceled
            .lock()
            .unwrap()
            .iter()
            .map(|id| id.as_str().to_string())
            .collect::<Vec<_>>(),
        vec!["t-0"]
    );
    let failed = h.finisher.failed.lock().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].0.as_str(), "t-0");
    assert_eq!(failed[0].1, "actor_died");
    assert_eq!(failed[0].3.as_deref(), Some("boom"));
}

#[test]
fn force_kill_requests_coalesce_into_one_rpc() {
    let h = harness(NoDependencies);
    h.submitter.add_actor_queue_if_not_exists(&actor());

    // No client yet: both requests coalesce in place.
    h.submitter.kill_actor(&actor(), false, false);
    h.submitter.kill_actor(&actor(), true, true);

    h.submitter.connect_actor(&actor(), addr(1), 0);
    let kills = h.pool.client_for(&addr(1)).kill_requests();
    assert_eq!(kills.len(), 1);
    assert!(kills[0].force_kill);
    assert!(kills[0].no_restart);
    assert_eq!(kills[0].intended_actor_id, actor());
}

#[test]
fn force_kill_is_never_downgraded() {
    let h = harness(NoDependencies);
    h.submitter.add_actor_queue_if_not_exists(&actor());

    h.submitter.kill_actor(&actor(), true, true);
    h.submitter.kill_actor(&actor(), false, false);
    h.submitter.kill_actor(&actor(), true, false);

    h.submitter.connect_actor(&actor(), addr(1), 0);
    let kills = h.pool.client_for(&addr(1)).kill_requests();
    assert_eq!(kills.len(), 1);
    assert!(kills[0].force_kill && kills[0].no_restart);
}

// ---- Lifecycle laws ----

#[test]
fn add_actor_queue_is_idempotent() {
    let h = harness(NoDependencies);
    h.submitter.add_actor_queue_if_not_exists(&actor());
    h.submitter.connect_actor(&actor(), addr(1), 0);
    h.submitter.submit_task(spec(0)).unwrap();

    // Re-registering must not reset the queue or the connection.
    h.submitter.add_actor_queue_if_not_exists(&actor());
    assert!(h.submitter.is_actor_alive(&actor()));
    h.submitter.submit_task(spec(1)).unwrap();
    assert_eq!(h.pool.client_for(&addr(1)).sequence_numbers(), vec![0, 1]);
}

#[test]
fn duplicate_and_stale_lifecycle_events_are_dropped() {
    let h = harness(NoDependencies);
    h.submitter.add_actor_queue_if_not_exists(&actor());
    h.submitter.connect_actor(&actor(), addr(1), 0);
    assert_eq!(h.pool.connect_count(), 1);

    // Same endpoint, same epoch: no-op.
    h.submitter.connect_actor(&actor(), addr(1), 0);
    assert_eq!(h.pool.connect_count(), 1);

    h.submitter.disconnect_actor(&actor(), 1, false, None);
    h.submitter.connect_actor(&actor(), addr(2), 1);
    assert_eq!(h.pool.connect_count(), 2);

    // A connect for the previous incarnation arrives late: dropped.
    h.submitter.connect_actor(&actor(), addr(1), 0);
    assert_eq!(h.pool.connect_count(), 2);
    assert!(h.submitter.is_actor_alive(&actor()));

    // A replayed disconnect for an already-handled epoch: dropped.
    h.submitter.disconnect_actor(&actor(), 1, false, None);
    assert!(h.submitter.is_actor_alive(&actor()));
}

#[test]
fn dead_disconnect_is_terminal_and_idempotent() {
    let h = harness(NoDependencies);
    h.submitter.add_actor_queue_if_not_exists(&actor());
    h.submitter.connect_actor(&actor(), addr(1), 0);
    h.submitter.submit_task(spec(0)).unwrap();
    let client = h.pool.client_for(&addr(1));
    assert_eq!(client.push_count(), 1);

    h.submitter.disconnect_actor(&actor(), 1, true, None);
    let failures_after_death = h.finisher.failure_count();

    // Replaying the death changes nothing.
    h.submitter.disconnect_actor(&actor(), 1, true, None);
    assert_eq!(h.finisher.failure_count(), failures_after_death);

    // A later connect cannot resurrect the actor.
    h.submitter.connect_actor(&actor(), addr(2), 2);
    assert!(!h.submitter.is_actor_alive(&actor()));
    assert_eq!(client.push_count(), 1);
}

#[test]
fn late_resolution_after_death_is_noop() {
    let h = harness(ManualResolver::default());
    h.submitter.add_actor_queue_if_not_exists(&actor());
    h.submitter.connect_actor(&actor(), addr(1), 0);
    h.submitter.submit_task(spec(0)).unwrap();

    h.submitter.disconnect_actor(&actor(), 1, true, None);
    let failures_after_death = h.finisher.failure_count();

    // The slot was cleared with the death; this resolution finds nothing.
    h.resolver.resolve(0, Ok(()));
    assert_eq!(h.pool.client_for(&addr(1)).push_count(), 0);
    assert_eq!(h.finisher.failure_count(), failures_after_death);
}

#[test]
fn submit_for_unregistered_actor_is_rejected() {
    let h = harness(NoDependencies);
    let err = h.submitter.submit_task(spec(0)).unwrap_err();
    assert_eq!(err.as_label(), "submit_unknown_actor");
}

// ---- Queueing across lifecycle ----

#[test]
fn first_task_dispatches_only_after_connect() {
    let h = harness(NoDependencies);
    h.submitter.add_actor_queue_if_not_exists(&actor());
    h.submitter.submit_task(spec(0)).unwrap();
    assert!(!h.submitter.is_actor_alive(&actor()));

    h.submitter.connect_actor(&actor(), addr(1), 0);
    assert_eq!(h.pool.client_for(&addr(1)).sequence_numbers(), vec![0]);
}

#[test]
fn tasks_submitted_while_restarting_dispatch_on_reconnect() {
    let h = harness(NoDependencies);
    h.submitter.add_actor_queue_if_not_exists(&actor());
    h.submitter.connect_actor(&actor(), addr(1), 0);
    h.submitter.disconnect_actor(&actor(), 1, false, None);

    h.submitter.submit_task(spec(0)).unwrap();
    h.submitter.submit_task(spec(1)).unwrap();
    assert_eq!(h.pool.client_for(&addr(1)).push_count(), 0);

    h.submitter.connect_actor(&actor(), addr(2), 1);
    assert_eq!(h.pool.client_for(&addr(2)).sequence_numbers(), vec![0, 1]);
}

#[test]
fn out_of_order_completions_are_resent_with_skip_execution() {
    let h = harness(NoDependencies);
    h.finisher.set_will_retry(true);
    h.submitter.add_actor_queue_if_not_exists(&actor());
    h.submitter.connect_actor(&actor(), addr(1), 0);
    h.submitter.submit_task(spec(0)).unwrap();
    h.submitter.submit_task(spec(1)).unwrap();

    // The actor acknowledged 1 while 0 was still outstanding, then restarted.
    let old_client = h.pool.client_for(&addr(1));
    old_client.reply("t-1", Ok(PushTaskReply::default()));
    assert_eq!(h.finisher.completed_ids(), vec!["t-1"]);

    h.submitter.disconnect_actor(&actor(), 1, false, None);
    h.submitter.connect_actor(&actor(), addr(2), 1);

    let new_client = h.pool.client_for(&addr(2));
    // First the skip-execution re-advertisement of 1, then the resend of 0.
    assert_eq!(new_client.sequence_numbers(), vec![1, 0]);
    let (resend, skip_queue) = new_client.push_at(0);
    assert!(skip_queue);
    assert!(resend.task_spec.skip_execution());
    let (regular, skip_queue) = new_client.push_at(1);
    assert!(!skip_queue);
    assert!(!regular.task_spec.skip_execution());

    // The skipped reply only advances bookkeeping; no duplicate completion.
    new_client.reply_all_ok();
    assert_eq!(h.finisher.completed_ids(), vec!["t-1", "t-0"]);
}

#[test]
fn pending_kill_dies_with_the_connection() {
    let h = harness(NoDependencies);
    h.submitter.add_actor_queue_if_not_exists(&actor());
    h.submitter.connect_actor(&actor(), addr(1), 0);
    h.submitter.disconnect_actor(&actor(), 1, false, None);

    // Killing a restarting actor parks the request until a client exists...
    h.submitter.kill_actor(&actor(), true, true);
    assert_eq!(h.pool.client_for(&addr(1)).kill_requests().len(), 0);

    // ...but a further restart of the target drops the parked request.
    h.submitter.disconnect_actor(&actor(), 2, false, None);
    h.submitter.connect_actor(&actor(), addr(2), 2);
    assert_eq!(h.pool.client_for(&addr(2)).kill_requests().len(), 0);
}

// ---- Death-info protocol ----

/// Parks one network-failed task in the death-info wait list.
fn park_one_task(h: &Harness<NoDependencies>) {
    h.submitter.add_actor_queue_if_not_exists(&actor());
    h.submitter.connect_actor(&actor(), addr(1), 0);
    h.submitter.submit_task(spec(0)).unwrap();
    // Network error while the actor is not known dead, no retry: parked.
    h.pool
        .client_for(&addr(1))
        .reply("t-0", Err(RpcError::io("connection reset")));
    assert_eq!(h.finisher.failure_count(), 1);
    assert_eq!(h.finisher.finalized.lock().unwrap().len(), 0);
}

#[test]
fn parked_task_fails_when_death_is_confirmed() {
    let h = harness(NoDependencies);
    park_one_task(&h);

    h.submitter
        .disconnect_actor(&actor(), 1, true, Some(CreationTaskError::new("oom")));
    let finalized = h.finisher.finalized.lock().unwrap();
    assert_eq!(finalized.len(), 1);
    assert_eq!(finalized[0].as_str(), "t-0");
}

#[test]
fn parked_task_fails_when_the_deadline_passes() {
    let h = harness(NoDependencies);
    park_one_task(&h);

    h.submitter.check_timeout_tasks();
    assert_eq!(h.finisher.finalized.lock().unwrap().len(), 0);

    h.clock.advance(1_001);
    h.submitter.check_timeout_tasks();
    assert_eq!(h.finisher.finalized.lock().unwrap().len(), 1);

    // The sweep drained the entry; nothing fires twice.
    h.submitter.check_timeout_tasks();
    assert_eq!(h.finisher.finalized.lock().unwrap().len(), 1);
}

#[test]
fn reply_arriving_after_eviction_is_dropped() {
    let h = harness(NoDependencies);
    h.submitter.add_actor_queue_if_not_exists(&actor());
    h.submitter.connect_actor(&actor(), addr(1), 0);
    h.submitter.submit_task(spec(0)).unwrap();

    // Eviction fails the task as a synthesized network error (it parks,
    // awaiting death info) and unregisters its reply handler.
    h.submitter.disconnect_actor(&actor(), 1, false, None);
    assert_eq!(h.finisher.failure_count(), 1);

    // The old incarnation's real reply surfaces afterwards: dropped.
    h.pool
        .client_for(&addr(1))
        .reply("t-0", Ok(PushTaskReply::default()));
    assert!(h.finisher.completed_ids().is_empty());
    assert_eq!(h.finisher.failure_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn timeout_sweeper_drives_the_sweep() {
    let mut config = Config::default();
    config.sweep_interval = Duration::from_millis(10);
    let h = harness_with_config(NoDependencies, config);
    park_one_task(&h);

    h.clock.advance(1_001);
    let token = CancellationToken::new();
    let sweeper = h.submitter.spawn_timeout_sweeper(token.clone());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(h.finisher.finalized.lock().unwrap().len(), 1);

    token.cancel();
    sweeper.await.unwrap();
}

#[tokio::test]
async fn connect_publishes_an_event() {
    let h = harness(NoDependencies);
    h.submitter.add_actor_queue_if_not_exists(&actor());
    let mut events = h.submitter.subscribe();

    h.submitter.connect_actor(&actor(), addr(1), 0);

    let event = events.recv().await.unwrap();
    assert_eq!(event.kind, EventKind::ActorConnected);
    assert_eq!(event.actor, Some(actor()));
    assert_eq!(event.num_restarts, Some(0));
}
