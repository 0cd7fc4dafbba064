//! HTTP bindings and polling driver.
//!
//! [`RemoteQueue`] is a thin blocking binding to the queue service REST
//! surface; [`SessionDriver`] owns the 2-second interval and executes
//! session actions in order. Protocol logic stays in the Sans-IO
//! [`QueueSession`] - this layer only moves bytes and time.

use std::{collections::VecDeque, time::Duration};

use paika_core::{QueueId, QueueStore};
use thiserror::Error;
use tokio::{sync::mpsc, time::MissedTickBehavior};

use crate::{
    event::{CallOutcome, Notice, QueueCall, SessionAction, SessionEvent},
    session::{POLL_INTERVAL, QueueSession},
};

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network, DNS, or protocol-level failure.
    #[error("http error: {0}")]
    Http(String),

    /// The service answered with a non-200 status.
    #[error("service rejected the call: status {status}")]
    Rejected {
        /// HTTP status code returned.
        status: u16,
    },
}

/// Remote service endpoints and limits.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the queue service API.
    pub base_url: String,

    /// Global request timeout.
    pub request_timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://mais.godserver.cn/api/mai/v1".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Blocking bindings to the Remote Queue Service.
///
/// Clones share the underlying agent and its connection pool.
#[derive(Debug, Clone)]
pub struct RemoteQueue {
    agent: ureq::Agent,
    config: RemoteConfig,
}

impl RemoteQueue {
    /// Build a client with the globally configured timeout.
    pub fn new(config: RemoteConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(config.request_timeout))
            .build()
            .into();
        Self { agent, config }
    }

    /// `GET /party` - fetch the raw comma-encoded roster for a queue.
    pub fn fetch_roster(&self, queue_id: &QueueId) -> Result<String, TransportError> {
        let response = self
            .agent
            .get(party_endpoint(&self.config.base_url))
            .query("party", queue_id.as_str())
            .call()
            .map_err(map_call_error)?;

        let mut body = response.into_body();
        body.read_to_string().map_err(|err| TransportError::Http(err.to_string()))
    }

    /// Execute a one-shot call. HTTP 200 means success; anything else is
    /// reported to the caller and never retried here.
    pub fn dispatch(&self, call: &QueueCall) -> Result<(), TransportError> {
        let base = &self.config.base_url;

        let result = match call {
            QueueCall::Join { queue_id, player } => self
                .agent
                .post(party_endpoint(base))
                .query("party", queue_id.as_str())
                .query("people", player)
                .header("Content-Type", "application/json")
                .send_empty(),
            QueueCall::Leave { queue_id, player } => self
                .agent
                .delete(party_endpoint(base))
                .query("party", queue_id.as_str())
                .query("people", player)
                .header("Content-Type", "application/json")
                .call(),
            QueueCall::Swap { queue_id, from, to } => self
                .agent
                .post(party_endpoint(base))
                .query("party", queue_id.as_str())
                .query("people", from)
                .query("changeToPeople", to)
                .header("Content-Type", "application/json")
                .send_empty(),
            QueueCall::Play { queue_id } => self
                .agent
                .post(party_play_endpoint(base))
                .query("party", queue_id.as_str())
                .header("Content-Type", "application/json")
                .send_empty(),
        };

        result.map(|_| ()).map_err(map_call_error)
    }
}

fn map_call_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::StatusCode(status) => TransportError::Rejected { status },
        other => TransportError::Http(other.to_string()),
    }
}

fn party_endpoint(base: &str) -> String {
    format!("{}/party", base.trim_end_matches('/'))
}

fn party_play_endpoint(base: &str) -> String {
    format!("{}/partyPlay", base.trim_end_matches('/'))
}

/// User commands accepted by the driver loop.
#[derive(Debug, Clone)]
pub enum Command {
    /// Start polling a queue.
    Start {
        /// Queue to poll.
        queue_id: QueueId,
    },
    /// Join the current queue.
    Join,
    /// Leave the current queue without stopping the watch.
    Leave,
    /// Manual advance-to-play check.
    Advance,
    /// Resume from persisted state.
    Resume,
    /// Stop polling, issue the final leave, and end the loop.
    Stop,
}

/// Handle to a running [`SessionDriver`] task.
pub struct DriverHandle {
    commands: mpsc::Sender<Command>,
    notices: mpsc::Receiver<Notice>,
    task: tokio::task::JoinHandle<()>,
}

impl DriverHandle {
    /// Send a command into the driver loop. Returns `false` if the loop
    /// has already ended.
    pub async fn send(&self, command: Command) -> bool {
        self.commands.send(command).await.is_ok()
    }

    /// Next user-visible notice. `None` once the loop has ended and all
    /// buffered notices were drained.
    pub async fn next_notice(&mut self) -> Option<Notice> {
        self.notices.recv().await
    }

    /// Stop polling, let the final leave call drain, and wait for the
    /// task to finish.
    pub async fn shutdown(self) {
        let _ = self.commands.send(Command::Stop).await;
        drop(self.commands);
        let _ = self.task.await;
    }

    /// Abort the task without the final leave. Last resort teardown.
    pub fn abort(&self) {
        self.task.abort();
    }
}

/// Drives a [`QueueSession`] with a real interval and real HTTP.
///
/// One task owns the session, so all state mutation happens on a single
/// logical thread: interval ticks and user commands are serialized through
/// the same loop, and the swap-then-play ordering falls out of processing
/// actions in order.
pub struct SessionDriver<S: QueueStore> {
    session: QueueSession<S>,
    remote: RemoteQueue,
}

impl<S: QueueStore> SessionDriver<S> {
    /// Pair a session with its remote service bindings.
    pub fn new(session: QueueSession<S>, remote: RemoteQueue) -> Self {
        Self { session, remote }
    }

    /// Spawn the driver loop on the current tokio runtime.
    pub fn spawn(self) -> DriverHandle {
        let (command_tx, command_rx) = mpsc::channel(16);
        let (notice_tx, notice_rx) = mpsc::channel(64);
        let task = tokio::spawn(self.run(command_rx, notice_tx));
        DriverHandle { commands: command_tx, notices: notice_rx, task }
    }

    async fn run(mut self, mut commands: mpsc::Receiver<Command>, notices: mpsc::Sender<Notice>) {
        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let event = tokio::select! {
                _ = ticker.tick() => SessionEvent::Tick,
                command = commands.recv() => match command {
                    Some(command) => command_event(command),
                    None => SessionEvent::StopPolling,
                },
            };

            let stopping = matches!(event, SessionEvent::StopPolling);
            self.step(event, &notices).await;
            if stopping {
                break;
            }
        }
    }

    /// Feed one event through the session, executing every resulting
    /// action and looping follow-up events (fetch results, call
    /// completions) back in until the session goes quiet.
    async fn step(&mut self, event: SessionEvent, notices: &mpsc::Sender<Notice>) {
        let mut pending = VecDeque::from([event]);

        while let Some(event) = pending.pop_front() {
            let actions = match self.session.handle(event) {
                Ok(actions) => actions,
                Err(err) => {
                    // Guard rejections are informational, not faults.
                    let _ = notices.send(Notice::Rejected { reason: err.to_string() }).await;
                    continue;
                },
            };

            for action in actions {
                match action {
                    SessionAction::Notify(notice) => {
                        let _ = notices.send(notice).await;
                    },
                    SessionAction::FetchRoster { queue_id } => {
                        pending.push_back(self.fetch(queue_id).await);
                    },
                    SessionAction::Dispatch(call) => {
                        pending.push_back(self.dispatch(call).await);
                    },
                }
            }
        }
    }

    async fn fetch(&self, queue_id: QueueId) -> SessionEvent {
        let remote = self.remote.clone();
        let result =
            tokio::task::spawn_blocking(move || remote.fetch_roster(&queue_id)).await;

        match result {
            Ok(Ok(raw)) => SessionEvent::RosterReceived { raw },
            Ok(Err(err)) => SessionEvent::RosterFetchFailed { reason: err.to_string() },
            Err(err) => SessionEvent::RosterFetchFailed { reason: err.to_string() },
        }
    }

    async fn dispatch(&self, call: QueueCall) -> SessionEvent {
        let kind = call.kind();
        let remote = self.remote.clone();
        let result = tokio::task::spawn_blocking(move || remote.dispatch(&call)).await;

        let outcome = match result {
            Ok(Ok(())) => CallOutcome::Succeeded,
            Ok(Err(err)) => {
                tracing::warn!(%err, ?kind, "one-shot queue call failed");
                CallOutcome::Failed { reason: err.to_string() }
            },
            Err(err) => CallOutcome::Failed { reason: err.to_string() },
        };

        SessionEvent::CallCompleted { call: kind, outcome }
    }
}

fn command_event(command: Command) -> SessionEvent {
    match command {
        Command::Start { queue_id } => SessionEvent::StartPolling { queue_id },
        Command::Join => SessionEvent::Join,
        Command::Leave => SessionEvent::Leave,
        Command::Advance => SessionEvent::Advance,
        Command::Resume => SessionEvent::Resume,
        Command::Stop => SessionEvent::StopPolling,
    }
}
