// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan pipeline configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, SheetGuardError};

/// Settings for the contour coverage pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Minimum fraction of the frame (0.0..=1.0) the detected sheet must cover.
    pub coverage_threshold: f32,
    /// Threads in the dedicated frame worker pool.
    pub worker_threads: usize,
    /// Ask the detector for its debug output.
    pub debug: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            coverage_threshold: 0.10,
            worker_threads: 2,
            debug: false,
        }
    }
}

impl ScanConfig {
    /// Load settings from a JSON file. Missing fields fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        info!(
            path = %path.display(),
            coverage_threshold = config.coverage_threshold,
            worker_threads = config.worker_threads,
            "scan config loaded"
        );
        Ok(config)
    }

    /// Write settings as pretty-printed JSON.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        debug!(path = %path.as_ref().display(), "scan config persisted");
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.coverage_threshold)?;
        if self.worker_threads == 0 {
            return Err(SheetGuardError::Configuration(
                "worker_threads must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Check that a coverage threshold lies in `[0.0, 1.0]`.
pub fn validate_threshold(threshold: f32) -> Result<()> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(SheetGuardError::Configuration(format!(
            "coverage threshold must be within [0, 1], got {}",
            threshold
        )))
    }
}
