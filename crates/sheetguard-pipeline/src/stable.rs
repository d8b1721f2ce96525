// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Coverage-checking detector — stabilises realtime sheet detection.
//
// Wraps another detector. Its failures and empty results pass straight
// through; found corners are put into canonical order and kept only if the
// sheet covers enough of the frame. Each successful frame emits one timing
// event to the metrics reporter.
//
// Per frame:
//
//   CALL_DETECTOR ─┬─ error ────────────────────────────────► Failed
//                  ├─ no corners ───────────────────────────► Passthrough
//                  └─ corners ─► sort ─► coverage ─┬─ >= t ─► Accepted
//                                                  └─ <  t ─► Rejected

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use sheetguard_core::error::Result;
use sheetguard_core::{DetectionResult, FrameId, ScanConfig, SensorRotation};
use sheetguard_geometry::{CornerSorter, CoverageDecision, CoverageEvaluator};
use tracing::{Instrument, Span, debug, instrument, warn};

use crate::dispatch;
use crate::metrics::{MetricsEvent, NoopReporter, TIME_MODEL_EVENT};
use crate::traits::{Detector, MetricsReporter};

/// Terminal state of one frame evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The inner detector failed; its error was returned unchanged.
    Failed,
    /// The inner detector found nothing; its result was returned unchanged.
    Passthrough,
    /// Corners sorted and kept.
    Accepted,
    /// Corners found but too small; cleared from the result.
    Rejected,
}

impl FrameOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Failed => "failed",
            Self::Passthrough => "passthrough",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for FrameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detector that post-processes another detector's output.
///
/// Holds the inner detector by composition and implements [`Detector`]
/// itself, so it can be used anywhere a detector is expected. All state is
/// read-only after construction; concurrent frames share nothing mutable.
pub struct CoverageCheckingDetector<D: Detector> {
    inner: Arc<D>,
    sorter: CornerSorter,
    evaluator: CoverageEvaluator,
    reporter: Arc<dyn MetricsReporter>,
    dispatcher: Option<tokio::runtime::Handle>,
}

impl<D: Detector + 'static> CoverageCheckingDetector<D> {
    /// Wrap `inner`, gating on `config.coverage_threshold`.
    ///
    /// Metrics go nowhere and frames run on the caller's task until
    /// `with_reporter` / `with_dispatcher` say otherwise.
    pub fn new(inner: D, config: &ScanConfig) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(inner),
            sorter: CornerSorter::new(),
            evaluator: CoverageEvaluator::new(config.coverage_threshold)?,
            reporter: Arc::new(NoopReporter),
            dispatcher: None,
        })
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn MetricsReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_sorter(mut self, sorter: CornerSorter) -> Self {
        self.sorter = sorter;
        self
    }

    /// Run every frame on this runtime (typically a [`crate::WorkerPool`]).
    pub fn with_dispatcher(mut self, handle: tokio::runtime::Handle) -> Self {
        self.dispatcher = Some(handle);
        self
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn threshold(&self) -> f32 {
        self.evaluator.threshold()
    }

    /// Detect, sort and gate one frame.
    ///
    /// Detector errors come back verbatim. A frame size without usable area
    /// is a `Configuration` error. Dropping the returned future cancels the
    /// frame, including the inner detector call.
    pub async fn evaluate_frame(
        &self,
        frame: D::Frame,
        rotation: SensorRotation,
        debug: bool,
    ) -> Result<DetectionResult> {
        let (_, result) = self.evaluate_frame_with_outcome(frame, rotation, debug).await?;
        Ok(result)
    }

    /// Like [`Self::evaluate_frame`], also saying which way the frame went.
    ///
    /// A detector failure is the `Err` case; `FrameOutcome::Failed` is never
    /// returned here. `debug_output` is forwarded to the inner detector.
    #[instrument(
        name = "evaluate_frame",
        skip(self, frame, rotation),
        fields(frame_id = %FrameId::new(), rotation = rotation.degrees())
    )]
    pub async fn evaluate_frame_with_outcome(
        &self,
        frame: D::Frame,
        rotation: SensorRotation,
        debug_output: bool,
    ) -> Result<(FrameOutcome, DetectionResult)> {
        let pass = FramePass {
            inner: Arc::clone(&self.inner),
            sorter: self.sorter,
            evaluator: self.evaluator,
            reporter: Arc::clone(&self.reporter),
        };
        let work = pass.run(frame, rotation, debug_output).instrument(Span::current());
        dispatch::run_on(self.dispatcher.as_ref(), work).await
    }
}

impl<D: Detector + 'static> Detector for CoverageCheckingDetector<D> {
    type Frame = D::Frame;

    fn detect(
        &self,
        frame: Self::Frame,
        rotation: SensorRotation,
        debug: bool,
    ) -> impl Future<Output = Result<DetectionResult>> + Send {
        self.evaluate_frame(frame, rotation, debug)
    }
}

/// Owned snapshot of everything one frame needs, so it can move to a worker.
struct FramePass<D> {
    inner: Arc<D>,
    sorter: CornerSorter,
    evaluator: CoverageEvaluator,
    reporter: Arc<dyn MetricsReporter>,
}

impl<D: Detector> FramePass<D> {
    async fn run(
        self,
        frame: D::Frame,
        rotation: SensorRotation,
        debug: bool,
    ) -> Result<(FrameOutcome, DetectionResult)> {
        let started = Instant::now();
        let detected = self.inner.detect(frame, rotation, debug).await;
        let detect_time = started.elapsed();

        let result = match detected {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, outcome = %FrameOutcome::Failed, "contour detector failed");
                return Err(err);
            }
        };

        let (outcome, result) = self.gate(result)?;
        let total_time = started.elapsed();

        debug!(
            %outcome,
            detect_ms = detect_time.as_millis() as u64,
            total_ms = total_time.as_millis() as u64,
            "frame evaluated"
        );
        self.report(&result, outcome, detect_time, total_time);
        Ok((outcome, result))
    }

    /// Sort the corners and apply the coverage threshold.
    fn gate(&self, result: DetectionResult) -> Result<(FrameOutcome, DetectionResult)> {
        let Some(corners) = result.corners.as_ref() else {
            return Ok((FrameOutcome::Passthrough, result));
        };

        let sorted = self.sorter.sort(corners);
        let gated = match self.evaluator.evaluate(Some(&sorted), result.output_size)? {
            CoverageDecision::Accepted { corners, .. } => {
                (FrameOutcome::Accepted, result.with_corners(corners))
            }
            CoverageDecision::Rejected { coverage } => {
                debug!(
                    coverage,
                    threshold = self.evaluator.threshold(),
                    "sheet too small; clearing corners"
                );
                (FrameOutcome::Rejected, result.without_corners())
            }
            CoverageDecision::NoCorners => (FrameOutcome::Passthrough, result),
        };
        Ok(gated)
    }

    fn report(
        &self,
        result: &DetectionResult,
        outcome: FrameOutcome,
        detect_time: Duration,
        total_time: Duration,
    ) {
        let event = MetricsEvent::new(TIME_MODEL_EVENT)
            .param("infer_ms", result.timings.infer_time.as_millis())
            .param("find_contours_ms", result.timings.find_contours_time.as_millis())
            .param("detect_ms", detect_time.as_millis())
            .param("total_ms", total_time.as_millis())
            .param("outcome", outcome);

        if let Err(err) = self.reporter.report(&event) {
            warn!(error = %err, "metrics report failed; ignoring");
        }
    }
}
