//! Search invocations and the worker pool that runs them in parallel.
//!
//! This module provides:
//! - The single-threaded search loop and its host messages
//! - Multi-threaded CPU workers, one search each
//! - Progress tracking and reporting

mod cpu;
mod pool;
mod search;

pub use cpu::{CpuWorker, WorkerEvent, WorkerStats};
pub use pool::WorkerPool;
pub use search::{
    dispatch, Found, MessageSink, Search, SearchMessage, SearchOutcome, SearchRequest,
};
