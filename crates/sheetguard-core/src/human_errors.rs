// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable messages for frame failures.
//
// Whatever goes wrong inside the pipeline, the viewfinder only ever shows
// "no document detected" for that frame. The suggestion tells the user what
// to do about it, and `retriable` says whether the next frame may succeed.

use crate::error::SheetGuardError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The next frame may well succeed; keep scanning.
    Transient,
    /// The user must change something (framing, lighting, settings).
    ActionRequired,
    /// The app is misconfigured and scanning cannot work until it is fixed.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown over the viewfinder).
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether the next frame may succeed without intervention.
    pub retriable: bool,
    pub severity: Severity,
}

const NO_DOCUMENT: &str = "No document detected.";

/// Convert a `SheetGuardError` into a `HumanError`.
pub fn humanize_error(err: &SheetGuardError) -> HumanError {
    match err {
        SheetGuardError::Detector(detail) => humanize_detector_error(detail),

        SheetGuardError::InvalidInput(_) => HumanError {
            message: NO_DOCUMENT.into(),
            suggestion: "Hold the phone steady so all four corners of the page are visible.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        SheetGuardError::Configuration(detail) => HumanError {
            message: NO_DOCUMENT.into(),
            suggestion: format!(
                "The scanner is set up incorrectly. Check the scan settings. (Detail: {detail})"
            ),
            retriable: false,
            severity: Severity::Permanent,
        },

        SheetGuardError::Cancelled => HumanError {
            message: NO_DOCUMENT.into(),
            suggestion: "Scanning was stopped.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        SheetGuardError::WorkerPanicked(_) => HumanError {
            message: NO_DOCUMENT.into(),
            suggestion: "Something went wrong while looking for the page. Keep the camera pointed at it and we'll try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        SheetGuardError::Metrics(_) => HumanError {
            message: NO_DOCUMENT.into(),
            suggestion: "Keep the camera pointed at the page.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        SheetGuardError::Io(_) | SheetGuardError::Serialization(_) => HumanError {
            message: "We couldn't read the scanner settings.".into(),
            suggestion: "Reinstall the app or reset the scan settings to their defaults.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

fn humanize_detector_error(detail: &str) -> HumanError {
    let lower = detail.to_lowercase();

    if lower.contains("model") && (lower.contains("load") || lower.contains("missing")) {
        HumanError {
            message: NO_DOCUMENT.into(),
            suggestion: "The page finder isn't ready yet. Restart the scanner.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("too dark") || lower.contains("exposure") {
        HumanError {
            message: NO_DOCUMENT.into(),
            suggestion: "It's too dark to see the page. Turn on a light or the flash.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        }
    } else {
        HumanError {
            message: NO_DOCUMENT.into(),
            suggestion: "Place the page on a contrasting surface and fit it inside the frame.".into(),
            retriable: true,
            severity: Severity::Transient,
        }
    }
}
