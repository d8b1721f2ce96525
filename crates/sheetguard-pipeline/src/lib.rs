// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// sheetguard-pipeline — Per-frame orchestration around an external contour
// detector.
//
// The detector and the analytics sink are collaborators supplied by the host
// application through the traits in `traits`. `CoverageCheckingDetector`
// wraps any detector, sorts the corners it finds, and drops sheets that cover
// too little of the frame. Work can be pushed onto a dedicated `WorkerPool`
// so the caller's thread never runs the pipeline itself.

pub mod dispatch;
pub mod metrics;
pub mod stable;
pub mod traits;

pub use dispatch::WorkerPool;
pub use metrics::{MetricsEvent, NoopReporter, TracingReporter};
pub use stable::{CoverageCheckingDetector, FrameOutcome};
pub use traits::{Detector, MetricsReporter};
