// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Replays recorded detector output through the coverage pipeline.
//
// A recording is a JSON array of frames captured from a device session. Each
// frame holds what the on-device detector returned (or the error it raised),
// so threshold changes can be tried offline against real sessions.

use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sheetguard_core::error::{Result, SheetGuardError};
use sheetguard_core::human_errors::humanize_error;
use sheetguard_core::{Corners, DetectionResult, SensorRotation};
use sheetguard_pipeline::{CoverageCheckingDetector, Detector, FrameOutcome};
use tracing::{info, instrument};

/// One recorded camera frame.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordedFrame {
    /// Sensor rotation in degrees.
    #[serde(default)]
    pub rotation: SensorRotation,
    /// What the detector returned.
    #[serde(default)]
    pub result: Option<DetectionResult>,
    /// The detector's error message, if it failed.
    #[serde(default)]
    pub error: Option<String>,
    /// Simulated detector latency.
    #[serde(default)]
    pub latency_ms: u64,
}

/// Detector that plays back a recorded frame instead of running a model.
#[derive(Debug, Default)]
pub struct ReplayDetector {
    replayed: AtomicUsize,
}

impl ReplayDetector {
    pub fn replayed(&self) -> usize {
        self.replayed.load(Ordering::Relaxed)
    }
}

impl Detector for ReplayDetector {
    type Frame = RecordedFrame;

    async fn detect(
        &self,
        frame: RecordedFrame,
        _rotation: SensorRotation,
        _debug: bool,
    ) -> Result<DetectionResult> {
        self.replayed.fetch_add(1, Ordering::Relaxed);
        if frame.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(frame.latency_ms)).await;
        }
        match (frame.error, frame.result) {
            (Some(message), _) => Err(SheetGuardError::Detector(message)),
            (None, Some(result)) => Ok(result),
            (None, None) => Err(SheetGuardError::InvalidInput(
                "recorded frame has neither a result nor an error".into(),
            )),
        }
    }
}

/// One line of replay output.
#[derive(Debug, Serialize)]
pub struct ReplayLine {
    pub frame: usize,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corners: Option<Corners>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Totals per outcome.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub accepted: usize,
    pub rejected: usize,
    pub passthrough: usize,
    pub failed: usize,
}

impl ReplaySummary {
    fn record(&mut self, outcome: FrameOutcome) {
        match outcome {
            FrameOutcome::Accepted => self.accepted += 1,
            FrameOutcome::Rejected => self.rejected += 1,
            FrameOutcome::Passthrough => self.passthrough += 1,
            FrameOutcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.accepted + self.rejected + self.passthrough + self.failed
    }
}

/// Read a recording from disk.
pub fn load_frames(path: impl AsRef<Path>) -> Result<Vec<RecordedFrame>> {
    let data = std::fs::read_to_string(path.as_ref())?;
    parse_frames(&data)
}

pub fn parse_frames(json: &str) -> Result<Vec<RecordedFrame>> {
    Ok(serde_json::from_str(json)?)
}

/// Push every frame through `detector`, writing one JSON line per frame.
///
/// Frame failures are part of the output, not errors; only writing the output
/// can fail the replay.
#[instrument(skip_all, fields(frames = frames.len()))]
pub async fn replay_all<W: Write>(
    detector: &CoverageCheckingDetector<ReplayDetector>,
    frames: Vec<RecordedFrame>,
    debug: bool,
    out: &mut W,
) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for (index, frame) in frames.into_iter().enumerate() {
        let rotation = frame.rotation;

        let line = match detector
            .evaluate_frame_with_outcome(frame, rotation, debug)
            .await
        {
            Ok((outcome, result)) => {
                summary.record(outcome);
                ReplayLine {
                    frame: index,
                    outcome: outcome.as_str(),
                    corners: result.corners,
                    message: None,
                    suggestion: None,
                }
            }
            Err(err) => {
                summary.record(FrameOutcome::Failed);
                let human = humanize_error(&err);
                ReplayLine {
                    frame: index,
                    outcome: FrameOutcome::Failed.as_str(),
                    corners: None,
                    message: Some(human.message),
                    suggestion: Some(human.suggestion),
                }
            }
        };

        writeln!(out, "{}", serde_json::to_string(&line)?)?;
    }

    info!(
        accepted = summary.accepted,
        rejected = summary.rejected,
        passthrough = summary.passthrough,
        failed = summary.failed,
        "replay finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use sheetguard_core::ScanConfig;

    use super::*;

    const RECORDING: &str = r#"[
        {
            "rotation": 90,
            "result": {
                "corners": [{"x":10,"y":10},{"x":0,"y":0},{"x":0,"y":10},{"x":10,"y":0}],
                "output_size": {"width": 10, "height": 10},
                "timings": {"infer_ms": 14, "find_contours_ms": 2}
            }
        },
        {
            "result": {
                "corners": [{"x":0,"y":0},{"x":10,"y":0},{"x":10,"y":10},{"x":0,"y":10}],
                "output_size": {"width": 100, "height": 100}
            }
        },
        {
            "result": {"corners": null, "output_size": {"width": 100, "height": 100}}
        },
        {
            "error": "interpreter not initialised"
        }
    ]"#;

    fn detector(threshold: f32) -> CoverageCheckingDetector<ReplayDetector> {
        let config = ScanConfig {
            coverage_threshold: threshold,
            ..ScanConfig::default()
        };
        CoverageCheckingDetector::new(ReplayDetector::default(), &config).unwrap()
    }

    #[test]
    fn parses_recording() {
        let frames = parse_frames(RECORDING).unwrap();
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0].rotation, SensorRotation::Deg90);
        assert_eq!(frames[1].rotation, SensorRotation::Deg0);
        assert!(frames[3].error.is_some());
    }

    #[test]
    fn loads_recording_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, RECORDING).unwrap();
        assert_eq!(load_frames(&path).unwrap().len(), 4);

        assert!(matches!(
            load_frames(dir.path().join("missing.json")),
            Err(SheetGuardError::Io(_))
        ));
    }

    #[test]
    fn rejects_bad_corner_count() {
        let json = r#"[{"result": {"corners": [{"x":0,"y":0}], "output_size": {"width": 1, "height": 1}}}]"#;
        assert!(matches!(
            parse_frames(json),
            Err(SheetGuardError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn replays_every_outcome() {
        let detector = detector(0.5);
        let frames = parse_frames(RECORDING).unwrap();
        let mut out = Vec::new();

        let summary = replay_all(&detector, frames, false, &mut out).await.unwrap();
        assert_eq!(
            summary,
            ReplaySummary {
                accepted: 1,
                rejected: 1,
                passthrough: 1,
                failed: 1,
            }
        );
        assert_eq!(detector.inner().replayed(), 4);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0]["outcome"], "accepted");
        assert_eq!(lines[0]["corners"][0]["x"], 0.0);
        assert_eq!(lines[0]["corners"][2]["y"], 10.0);
        assert_eq!(lines[1]["outcome"], "rejected");
        assert!(lines[1].get("corners").is_none());
        assert_eq!(lines[2]["outcome"], "passthrough");
        assert_eq!(lines[3]["outcome"], "failed");
        assert_eq!(lines[3]["message"], "No document detected.");
    }

    #[tokio::test]
    async fn empty_frame_is_reported_as_failure() {
        let detector = detector(0.1);
        let frames = parse_frames("[{}]").unwrap();
        let mut out = Vec::new();

        let summary = replay_all(&detector, frames, false, &mut out).await.unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 1);
    }
}
