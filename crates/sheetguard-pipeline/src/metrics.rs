// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Analytics events emitted by the frame pipeline, plus two stock reporters.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sheetguard_core::error::{Result, SheetGuardError};
use tracing::info;

use crate::traits::MetricsReporter;

/// Name of the per-frame timing event.
pub const TIME_MODEL_EVENT: &str = "time_model";

/// A named analytics event with string parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsEvent {
    pub name: String,
    pub params: Vec<(String, String)>,
    pub recorded_at: DateTime<Utc>,
}

impl MetricsEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            recorded_at: Utc::now(),
        }
    }

    /// Append a parameter (builder style).
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Look up a parameter by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Writes every event to the `tracing` log at `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl MetricsReporter for TracingReporter {
    fn report(&self, event: &MetricsEvent) -> Result<()> {
        let params = serde_json::to_string(&event.params)
            .map_err(|err| SheetGuardError::Metrics(err.to_string()))?;
        info!(
            event = %event.name,
            params = %params,
            recorded_at = %event.recorded_at.to_rfc3339(),
            "metrics event"
        );
        Ok(())
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl MetricsReporter for NoopReporter {
    fn report(&self, _event: &MetricsEvent) -> Result<()> {
        Ok(())
    }
}
