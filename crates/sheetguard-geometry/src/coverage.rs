// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Coverage gate — decides whether a detected sheet fills enough of the frame.
//
// Tiny quadrilaterals are almost always spurious contours (a label, a screen
// bezel, a shadow). Rejecting them makes the frame read as "nothing found"
// instead of flashing a wrong outline over the viewfinder.

use sheetguard_core::config::validate_threshold;
use sheetguard_core::error::{Result, SheetGuardError};
use sheetguard_core::{Corners, Size};
use tracing::debug;

use crate::area::polygon_area;

/// Outcome of a coverage check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoverageDecision {
    /// The detector found nothing; passed through without checking.
    NoCorners,
    /// The sheet covers at least the threshold fraction of the frame.
    Accepted { corners: Corners, coverage: f32 },
    /// The sheet is too small; the frame should be treated as empty.
    Rejected { coverage: f32 },
}

impl CoverageDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// Corners to keep on the detection result, if any.
    pub fn into_corners(self) -> Option<Corners> {
        match self {
            Self::Accepted { corners, .. } => Some(corners),
            Self::NoCorners | Self::Rejected { .. } => None,
        }
    }

    pub fn coverage(&self) -> Option<f32> {
        match self {
            Self::Accepted { coverage, .. } | Self::Rejected { coverage } => Some(*coverage),
            Self::NoCorners => None,
        }
    }
}

/// Compares sheet area against frame area with a fixed threshold.
///
/// The threshold is validated once at construction and never changes, so a
/// single evaluator can be shared freely across concurrent frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageEvaluator {
    threshold: f32,
}

impl CoverageEvaluator {
    /// Create an evaluator. Fails with `Configuration` unless
    /// `0.0 <= threshold <= 1.0`.
    pub fn new(threshold: f32) -> Result<Self> {
        validate_threshold(threshold)?;
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Fraction of the frame covered by the (already sorted) corners.
    ///
    /// Both frame dimensions must be positive and finite, otherwise this is a
    /// configuration error; the ratio is never allowed to become NaN or
    /// infinite, and two negative sides never multiply into a usable area.
    pub fn coverage(&self, corners: &Corners, frame: Size) -> Result<f32> {
        let usable = |side: f32| side.is_finite() && side > 0.0;
        let frame_area = frame.area();
        if !usable(frame.width) || !usable(frame.height) || !frame_area.is_finite() {
            return Err(SheetGuardError::Configuration(format!(
                "frame size {}x{} has no usable area",
                frame.width, frame.height
            )));
        }
        Ok(polygon_area(corners) / frame_area)
    }

    /// Accept or reject the corners for this frame.
    ///
    /// Absent corners always pass through as `NoCorners`, whatever the frame
    /// size. Coverage equal to the threshold is accepted.
    pub fn evaluate(&self, corners: Option<&Corners>, frame: Size) -> Result<CoverageDecision> {
        let Some(corners) = corners else {
            return Ok(CoverageDecision::NoCorners);
        };

        let coverage = self.coverage(corners, frame)?;
        let decision = if coverage >= self.threshold {
            CoverageDecision::Accepted {
                corners: *corners,
                coverage,
            }
        } else {
            CoverageDecision::Rejected { coverage }
        };

        debug!(
            coverage,
            threshold = self.threshold,
            accepted = decision.is_accepted(),
            "coverage evaluated"
        );
        Ok(decision)
    }
}
