// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dedicated worker runtime for frame evaluation.
//
// The camera callback (or UI event loop) hands a frame over and awaits the
// verdict; the sorting and coverage maths run on these workers instead. If the
// caller stops waiting, the spawned task is aborted so nothing keeps running
// for a frame nobody wants anymore.

use std::future::Future;

use sheetguard_core::error::{Result, SheetGuardError};
use sheetguard_core::ScanConfig;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info};

/// Multi-threaded tokio runtime reserved for frame evaluation.
pub struct WorkerPool {
    runtime: Option<Runtime>,
    handle: Handle,
}

impl WorkerPool {
    /// Start a pool with `threads` worker threads named `sheetguard-worker`.
    pub fn new(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(SheetGuardError::Configuration(
                "worker pool needs at least one thread".into(),
            ));
        }

        let runtime = Builder::new_multi_thread()
            .worker_threads(threads)
            .thread_name("sheetguard-worker")
            .enable_all()
            .build()?;
        let handle = runtime.handle().clone();

        info!(threads, "frame worker pool started");
        Ok(Self {
            runtime: Some(runtime),
            handle,
        })
    }

    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        Self::new(config.worker_threads)
    }

    /// Handle for spawning onto the pool.
    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // A blocking shutdown panics inside an async context.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
            debug!("frame worker pool shut down");
        }
    }
}

/// Aborts the wrapped task when dropped.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Run `future` on `handle`, or inline when no handle is given.
///
/// When spawned, dropping the returned future aborts the task. A task that
/// panics yields `WorkerPanicked`; one that was aborted (for example because
/// its runtime shut down) yields `Cancelled`.
pub async fn run_on<F, T>(handle: Option<&Handle>, future: F) -> Result<T>
where
    F: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let Some(handle) = handle else {
        return future.await;
    };

    let mut task = AbortOnDrop(handle.spawn(future));
    match (&mut task.0).await {
        Ok(result) => result,
        Err(err) => Err(join_error(err)),
    }
}

fn join_error(err: JoinError) -> SheetGuardError {
    if err.is_panic() {
        let payload = err.into_panic();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".into());
        SheetGuardError::WorkerPanicked(message)
    } else {
        SheetGuardError::Cancelled
    }
}
