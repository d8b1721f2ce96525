// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// sheetguard-geometry — Pure geometry for paper-sheet contours.
//
// Provides quadrilateral area and centroid helpers, canonical corner ordering
// (top-left, top-right, bottom-right, bottom-left), and the coverage gate
// that decides whether a detected sheet fills enough of the frame. Nothing in
// this crate blocks or allocates shared state, so it is safe to call from any
// thread or task.

pub mod area;
pub mod coverage;
pub mod sort;

pub use area::{centroid, polygon_area, signed_area};
pub use coverage::{CoverageDecision, CoverageEvaluator};
pub use sort::CornerSorter;
