// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Sheetguard.

use thiserror::Error;

/// Top-level error type for all Sheetguard operations.
#[derive(Debug, Error)]
pub enum SheetGuardError {
    // -- Detection --
    /// Raised by a contour detector. The pipeline forwards it untouched.
    #[error("contour detector failed: {0}")]
    Detector(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),

    // -- Worker dispatch --
    #[error("frame evaluation was cancelled")]
    Cancelled,

    #[error("frame worker panicked: {0}")]
    WorkerPanicked(String),

    // -- Reporting --
    #[error("metrics reporting failed: {0}")]
    Metrics(String),

    // -- Files --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SheetGuardError>;
