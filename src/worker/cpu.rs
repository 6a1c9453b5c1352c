//! CPU-based worker running one search invocation on its own thread.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;

use crate::config::SearchConfig;

use super::search::{MessageSink, Search, SearchMessage, SearchOutcome, SearchRequest};

/// Statistics shared by all CPU workers.
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Total keys generated, as reported by progress and success messages
    pub keys_generated: AtomicU64,
    /// Matches found
    pub matches_found: AtomicU64,
}

impl WorkerStats {
    /// Creates new worker stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total keys generated.
    pub fn total_keys(&self) -> u64 {
        self.keys_generated.load(Ordering::Relaxed)
    }

    /// Returns the total matches found.
    pub fn total_matches(&self) -> u64 {
        self.matches_found.load(Ordering::Relaxed)
    }
}

/// A message tagged with the worker that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerEvent {
    /// The ID of the worker that sent the message
    pub worker_id: usize,
    /// The message itself
    pub message: SearchMessage,
}

/// A CPU worker that runs one search with its own OS-seeded RNG.
pub struct CpuWorker {
    /// Worker ID
    id: usize,
    /// The request every worker searches for
    request: SearchRequest,
    /// Search constants
    config: SearchConfig,
    /// Channel to send events
    event_tx: Sender<WorkerEvent>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Worker statistics
    stats: Arc<WorkerStats>,
}

impl CpuWorker {
    /// Creates a new CPU worker.
    pub fn new(
        id: usize,
        request: SearchRequest,
        config: SearchConfig,
        event_tx: Sender<WorkerEvent>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> Self {
        Self {
            id,
            request,
            config,
            event_tx,
            stop_flag,
            stats,
        }
    }

    /// Runs the worker until its search finds a match, fails or is stopped.
    pub fn run(&self) {
        log::debug!("worker {} started", self.id);

        let mut search = Search::from_os_rng(&self.request, self.config);
        match search.dispatch(&self.stop_flag, self) {
            Some(SearchOutcome::Found(_)) => {
                log::debug!(
                    "worker {} found a match after {} attempts",
                    self.id,
                    search.total_attempts()
                );
            }
            Some(SearchOutcome::Cancelled) => {
                log::debug!(
                    "worker {} stopped after {} attempts",
                    self.id,
                    search.total_attempts()
                );
            }
            None => {
                log::debug!("worker {} aborted", self.id);
            }
        }
    }

    /// Returns the worker ID.
    pub fn id(&self) -> usize {
        self.id
    }
}

impl MessageSink for CpuWorker {
    fn deliver(&self, message: SearchMessage) -> bool {
        match &message {
            SearchMessage::Progress { attempts } => {
                self.stats.keys_generated.fetch_add(*attempts, Ordering::Relaxed);
            }
            SearchMessage::Success { attempts, .. } => {
                self.stats.keys_generated.fetch_add(*attempts, Ordering::Relaxed);
                self.stats.matches_found.fetch_add(1, Ordering::Relaxed);
            }
            SearchMessage::Failure { .. } => {}
        }

        self.event_tx
            .send(WorkerEvent {
                worker_id: self.id,
                message,
            })
            .is_ok()
    }
}
