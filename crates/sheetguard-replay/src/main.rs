// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sheetguard replay — offline harness for the coverage pipeline.
//
// Entry point. Initialises logging, loads the scan config, starts the frame
// worker pool, and replays a recorded session.
//
// Usage: sheetguard-replay <frames.json> [config.json]

mod replay;

use std::process::ExitCode;
use std::sync::Arc;

use sheetguard_core::error::{Result, SheetGuardError};
use sheetguard_core::ScanConfig;
use sheetguard_pipeline::{CoverageCheckingDetector, TracingReporter, WorkerPool};

use replay::ReplayDetector;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Sheetguard replay starting");

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "replay failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<()> {
    let frames_path = args.first().ok_or_else(|| {
        SheetGuardError::Configuration("usage: sheetguard-replay <frames.json> [config.json]".into())
    })?;

    // Load config or use defaults
    let config = match args.get(1) {
        Some(path) => ScanConfig::load(path)?,
        None => ScanConfig::default(),
    };

    let frames = replay::load_frames(frames_path)?;
    tracing::info!(path = %frames_path, frames = frames.len(), "recording loaded");

    let pool = WorkerPool::from_config(&config)?;
    let detector = CoverageCheckingDetector::new(ReplayDetector::default(), &config)?
        .with_reporter(Arc::new(TracingReporter))
        .with_dispatcher(pool.handle());

    // The caller side stays on its own single-threaded runtime, the way a
    // camera callback would; frames are evaluated on the pool.
    let caller = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut stdout = std::io::stdout().lock();
    let summary = caller.block_on(replay::replay_all(&detector, frames, config.debug, &mut stdout))?;

    tracing::info!(
        total = summary.total(),
        accepted = summary.accepted,
        replayed = detector.inner().replayed(),
        "done"
    );
    Ok(())
}
