use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use uuid::Uuid;

use nta_core::logging::Logger;
use nta_core::{Error, NewsQuery, PhoneNumber, SynthesisFailurePolicy};

use crate::pipeline::{Pipeline, PipelineOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    Running,
    Completed {
        outcome: PipelineOutcome,
        finished_at: DateTime<Utc>,
    },
    Failed {
        error: String,
        outcome: Option<PipelineOutcome>,
        finished_at: DateTime<Utc>,
    },
}

impl RunState {
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running)
    }

    fn failed(error: String, outcome: Option<PipelineOutcome>) -> Self {
        RunState::Failed {
            error,
            outcome,
            finished_at: Utc::now(),
        }
    }
}

/// Number of finished runs kept for status queries unless configured otherwise.
pub const DEFAULT_FINISHED_RUNS_RETAINED: usize = 100;

/// Status of a run as reported by the status endpoint.
///
/// The registrant's name and phone are available to the server but never serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSnapshot {
    pub running: bool,
    pub completed: bool,
    pub error: Option<String>,
    pub run_id: Option<RunId>,
    #[serde(skip)]
    pub name: Option<String>,
    #[serde(skip)]
    pub phone: Option<String>,
    pub outcome: Option<PipelineOutcome>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelResult {
    Signalled,
    AlreadyFinished,
    Unknown,
}

struct RunRecord {
    sequence: u64,
    name: String,
    phone: PhoneNumber,
    started_at: DateTime<Utc>,
    state: watch::Sender<RunState>,
    cancel: CancellationToken,
}

impl RunRecord {
    fn snapshot(&self, id: RunId) -> RunSnapshot {
        let state = self.state.borrow().clone();
        let mut snapshot = RunSnapshot {
            run_id: Some(id),
            name: Some(self.name.clone()),
            phone: Some(self.phone.to_string()),
            started_at: Some(self.started_at),
            ..Default::default()
        };
        match state {
            RunState::Running => snapshot.running = true,
            RunState::Completed { outcome, finished_at } => {
                snapshot.completed = true;
                snapshot.outcome = Some(outcome);
                snapshot.finished_at = Some(finished_at);
            }
            RunState::Failed {
                error,
                outcome,
                finished_at,
            } => {
                snapshot.error = Some(error);
                snapshot.outcome = outcome;
                snapshot.finished_at = Some(finished_at);
            }
        }
        snapshot
    }
}

/// Tracks background pipeline runs by id.
///
/// Each run is a tokio task that can be cancelled and awaited. Its state is kept
/// after it finishes so the status endpoint can still report it, up to `retain`
/// finished runs; older finished runs are dropped first. Running runs are never dropped.
pub struct RunRegistry {
    pipeline: Arc<Pipeline>,
    policy: SynthesisFailurePolicy,
    runs: DashMap<RunId, RunRecord>,
    sequence: AtomicU64,
    retain: usize,
}

impl RunRegistry {
    pub fn new(pipeline: Arc<Pipeline>, policy: SynthesisFailurePolicy) -> Arc<Self> {
        Self::with_retention(pipeline, policy, DEFAULT_FINISHED_RUNS_RETAINED)
    }

    pub fn with_retention(pipeline: Arc<Pipeline>, policy: SynthesisFailurePolicy, retain: usize) -> Arc<Self> {
        Arc::new(Self {
            pipeline,
            policy,
            runs: DashMap::new(),
            sequence: AtomicU64::new(0),
            retain: retain.max(1),
        })
    }

    /// Number of runs currently tracked, running or finished.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Registers a run as running and starts it in the background.
    pub fn start(self: &Arc<Self>, name: &str, phone: PhoneNumber, query: NewsQuery) -> RunId {
        let id = RunId::new();
        let cancel = CancellationToken::new();
        let (state, _) = watch::channel(RunState::Running);
        self.runs.insert(
            id,
            RunRecord {
                sequence: self.sequence.fetch_add(1, Ordering::SeqCst),
                name: name.to_string(),
                phone: phone.clone(),
                started_at: Utc::now(),
                state,
                cancel: cancel.clone(),
            },
        );
        info!("🚀 Started run {} for {}", id, phone);

        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let pipeline = registry.pipeline.clone();
            let logger = Logger::new().with_prefix(format!("[run {}]", id.short()));
            let file_name = format!("news_audio_{}.mp3", id);
            let mut work = tokio::spawn(async move {
                pipeline.run(&phone, &query, &file_name, &logger).await
            });

            // A run that already finished keeps its outcome even if cancel fired at the same time.
            let state = tokio::select! {
                biased;
                joined = &mut work => match joined {
                    Ok(Ok(outcome)) => registry.classify(outcome),
                    Ok(Err(e)) => RunState::failed(e.to_string(), None),
                    Err(e) => RunState::failed(format!("Run aborted unexpectedly: {}", e), None),
                },
                _ = cancel.cancelled() => {
                    work.abort();
                    RunState::failed(Error::Cancelled.to_string(), None)
                }
            };
            registry.finish(id, state);
        });

        id
    }

    fn classify(&self, outcome: PipelineOutcome) -> RunState {
        match (&outcome, self.policy) {
            (PipelineOutcome::SynthesisFailed { reason }, SynthesisFailurePolicy::Error) => {
                RunState::failed(reason.clone(), Some(outcome))
            }
            _ => RunState::Completed {
                outcome,
                finished_at: Utc::now(),
            },
        }
    }

    fn finish(&self, id: RunId, state: RunState) {
        match &state {
            RunState::Failed { error: reason, .. } => error!("❌ Run {} failed: {}", id, reason),
            _ => info!("🏁 Run {} completed", id),
        }
        if let Some(entry) = self.runs.get(&id) {
            entry.state.send_replace(state);
        }
        self.prune();
    }

    fn prune(&self) {
        let mut finished: Vec<(u64, RunId)> = self
            .runs
            .iter()
            .filter(|entry| !entry.state.borrow().is_running())
            .map(|entry| (entry.sequence, *entry.key()))
            .collect();
        if finished.len() <= self.retain {
            return;
        }
        finished.sort_unstable_by_key(|(sequence, _)| *sequence);
        let excess = finished.len() - self.retain;
        for (_, id) in finished.into_iter().take(excess) {
            self.runs.remove(&id);
        }
        debug!("🧹 Dropped {} finished runs", excess);
    }

    pub fn snapshot(&self, id: &RunId) -> Option<RunSnapshot> {
        self.runs.get(id).map(|entry| entry.snapshot(*id))
    }

    /// Snapshot of the most recently started run, or an idle snapshot when there is none.
    pub fn latest(&self) -> RunSnapshot {
        self.runs
            .iter()
            .max_by_key(|entry| entry.sequence)
            .map(|entry| entry.snapshot(*entry.key()))
            .unwrap_or_default()
    }

    pub fn cancel(&self, id: &RunId) -> CancelResult {
        match self.runs.get(id) {
            None => CancelResult::Unknown,
            Some(entry) if !entry.state.borrow().is_running() => CancelResult::AlreadyFinished,
            Some(entry) => {
                entry.cancel.cancel();
                info!("🛑 Cancellation requested for run {}", id);
                CancelResult::Signalled
            }
        }
    }

    /// Waits until the run leaves the running state and returns its final snapshot.
    ///
    /// Returns `None` if the run is unknown, or was already dropped by retention.
    pub async fn wait(&self, id: &RunId) -> Option<RunSnapshot> {
        let mut receiver = self.runs.get(id)?.state.subscribe();
        // A closed channel cannot happen while the entry lives in the map.
        let _ = receiver.wait_for(|state| !state.is_running()).await;
        self.snapshot(id)
    }
}
