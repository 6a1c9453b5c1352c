//! Worker pool management.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use crate::config::SearchConfig;

use super::cpu::{CpuWorker, WorkerEvent, WorkerStats};
use super::search::SearchRequest;

/// Runs independent search invocations in parallel, one per thread.
pub struct WorkerPool {
    /// Number of workers
    num_workers: usize,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<()>>>,
    /// Channel receiver for events
    event_rx: Receiver<WorkerEvent>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Shared statistics
    stats: Arc<WorkerStats>,
    /// Start time
    start_time: Instant,
}

impl WorkerPool {
    /// Creates a new worker pool with the specified number of workers.
    pub fn new(
        num_workers: usize,
        request: SearchRequest,
        config: SearchConfig,
    ) -> io::Result<Self> {
        let (event_tx, event_rx) = unbounded();
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(WorkerStats::new());

        let handles = Self::spawn_workers(
            num_workers,
            &request,
            config,
            event_tx,
            &stop_flag,
            &stats,
        );
        let handles = match handles {
            Ok(handles) => handles,
            Err(e) => {
                stop_flag.store(true, Ordering::Relaxed);
                return Err(e);
            }
        };

        Ok(Self {
            num_workers,
            handles: Some(handles),
            event_rx,
            stop_flag,
            stats,
            start_time: Instant::now(),
        })
    }

    /// Spawns worker threads.
    fn spawn_workers(
        num_workers: usize,
        request: &SearchRequest,
        config: SearchConfig,
        event_tx: Sender<WorkerEvent>,
        stop_flag: &Arc<AtomicBool>,
        stats: &Arc<WorkerStats>,
    ) -> io::Result<Vec<JoinHandle<()>>> {
        (0..num_workers)
            .map(|id| {
                let worker = CpuWorker::new(
                    id,
                    request.clone(),
                    config,
                    event_tx.clone(),
                    stop_flag.clone(),
                    stats.clone(),
                );

                thread::Builder::new()
                    .name(format!("vanity-worker-{}", id))
                    .spawn(move || worker.run())
            })
            .collect()
    }

    /// Waits for the next event from any worker.
    ///
    /// Returns `Timeout` if nothing arrived in time and `Disconnected` once
    /// every worker has exited.
    pub fn wait_for_event(&self, timeout: Duration) -> Result<WorkerEvent, RecvTimeoutError> {
        self.event_rx.recv_timeout(timeout)
    }

    /// Attempts to receive an event without blocking.
    pub fn try_recv(&self) -> Option<WorkerEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Waits for all workers to complete.
    pub fn join(mut self) {
        self.stop();
        self.join_handles();
    }

    fn join_handles(&mut self) {
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                if handle.join().is_err() {
                    log::error!("worker thread panicked");
                }
            }
        }
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Returns the total keys generated across all workers.
    pub fn total_keys(&self) -> u64 {
        self.stats.total_keys()
    }

    /// Returns the total matches found.
    pub fn total_matches(&self) -> u64 {
        self.stats.total_matches()
    }

    /// Returns the elapsed time since the pool was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the current generation rate (keys per second).
    pub fn keys_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_keys() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Returns a clone of the stop flag for external use (e.g., signal handlers).
    pub fn stop_flag_clone(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Returns true if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
        self.join_handles();
    }
}
