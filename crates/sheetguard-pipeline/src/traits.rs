// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Seams to the host application's collaborators.
//
// The contour model and the analytics back-end live outside this workspace
// (TFLite/Core ML runtimes, Firebase, ...). The pipeline only needs the two
// narrow capabilities below.

use std::future::Future;

use sheetguard_core::error::Result;
use sheetguard_core::{DetectionResult, SensorRotation};

use crate::metrics::MetricsEvent;

/// Finds a paper sheet in a camera frame.
///
/// Implementations may suspend (model inference usually runs on an
/// accelerator queue) and may fail; failures are returned as
/// `SheetGuardError::Detector` and are never retried by the pipeline.
pub trait Detector: Send + Sync {
    /// Whatever the host passes in as a frame (bitmap handle, pixel buffer,
    /// recorded fixture, ...).
    type Frame: Send + 'static;

    /// Detect the sheet corners in `frame`, captured with the sensor at
    /// `rotation`. `debug` asks the implementation for its diagnostic output.
    fn detect(
        &self,
        frame: Self::Frame,
        rotation: SensorRotation,
        debug: bool,
    ) -> impl Future<Output = Result<DetectionResult>> + Send;
}

/// Fire-and-forget analytics sink.
///
/// Called inline on the frame path, so implementations must return quickly.
/// Errors are logged by the caller and otherwise ignored.
pub trait MetricsReporter: Send + Sync {
    fn report(&self, event: &MetricsEvent) -> Result<()>;
}
