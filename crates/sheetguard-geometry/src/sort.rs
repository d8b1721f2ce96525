// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Canonical corner ordering for detected paper sheets.
//
// Detectors report the four sheet corners in whatever order the contour
// search found them. Downstream code (area, perspective warp, overlays) wants
// them as top-left, top-right, bottom-right, bottom-left. The ordering is a
// function of the point set alone, so sorting twice is the same as sorting
// once and the input permutation never matters.

use std::cmp::Ordering;

use sheetguard_core::error::Result;
use sheetguard_core::{Corners, Point2D};
use tracing::debug;

use crate::area::{centroid, cross};

/// Default tolerance for collinearity, relative to the squared extent of the
/// point set.
const DEFAULT_COLLINEAR_TOLERANCE: f32 = 1e-6;

/// Orders quadrilateral corners as top-left, top-right, bottom-right,
/// bottom-left (clockwise on screen).
///
/// ## Algorithm
///
/// 1. Degenerate sets (non-finite coordinates, coincident points, three or
///    more collinear points) are returned in their original order.
/// 2. Each point is bucketed into a quadrant relative to the centroid. If
///    every quadrant holds exactly one point, that is the answer.
/// 3. Otherwise (thin or strongly rotated sheets) the points are ordered by
///    polar angle around the centroid, ties broken by smaller x then smaller
///    y, and the cycle starts at the point with the smallest `x + y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerSorter {
    collinear_tolerance: f32,
}

impl Default for CornerSorter {
    fn default() -> Self {
        Self {
            collinear_tolerance: DEFAULT_COLLINEAR_TOLERANCE,
        }
    }
}

impl CornerSorter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the relative collinearity tolerance.
    pub fn with_tolerance(collinear_tolerance: f32) -> Self {
        Self {
            collinear_tolerance: collinear_tolerance.max(0.0),
        }
    }

    /// Sort an arbitrary slice of detector points.
    ///
    /// Fails with `InvalidInput` unless exactly four points are given.
    pub fn sort_points(&self, points: &[Point2D]) -> Result<Corners> {
        let corners = Corners::from_slice(points)?;
        Ok(self.sort(&corners))
    }

    /// Return the corners in canonical order.
    pub fn sort(&self, corners: &Corners) -> Corners {
        // Work on a lexicographically ordered copy so float rounding in the
        // centroid and cross products cannot depend on the input permutation.
        let mut points = *corners.points();
        points.sort_by(compare_xy);

        if self.is_degenerate(&points) {
            debug!(?points, "degenerate corner set; keeping detector order");
            return *corners;
        }

        let center = centroid(&points).unwrap_or_default();

        if let Some(sorted) = sort_by_quadrant(&points, center) {
            return Corners::new(sorted);
        }

        debug!(
            cx = center.x,
            cy = center.y,
            "quadrants ambiguous; ordering corners by angle"
        );
        Corners::new(sort_by_angle(&points, center))
    }

    /// Whether the set cannot be ordered meaningfully.
    pub fn is_degenerate(&self, points: &[Point2D; 4]) -> bool {
        if points.iter().any(|p| !p.is_finite()) {
            return true;
        }

        let (min_x, max_x, min_y, max_y) = points.iter().fold(
            (f32::MAX, f32::MIN, f32::MAX, f32::MIN),
            |(min_x, max_x, min_y, max_y), p| {
                (min_x.min(p.x), max_x.max(p.x), min_y.min(p.y), max_y.max(p.y))
            },
        );
        let extent = (max_x - min_x).max(max_y - min_y);
        let tolerance = self.collinear_tolerance * extent * extent;

        // Every triple; a coincident pair makes each triple containing it collinear.
        const TRIPLES: [(usize, usize, usize); 4] = [(0, 1, 2), (0, 1, 3), (0, 2, 3), (1, 2, 3)];
        TRIPLES
            .iter()
            .any(|&(a, b, c)| cross(points[a], points[b], points[c]).abs() <= tolerance)
    }
}

/// Quadrant slot of a point relative to the centroid: 0 = top-left,
/// 1 = top-right, 2 = bottom-right, 3 = bottom-left.
///
/// A point exactly on an axis counts as right of / below the centroid.
fn quadrant(point: Point2D, center: Point2D) -> usize {
    let is_left = point.x < center.x;
    let is_top = point.y < center.y;
    match (is_left, is_top) {
        (true, true) => 0,
        (false, true) => 1,
        (false, false) => 2,
        (true, false) => 3,
    }
}

fn sort_by_quadrant(points: &[Point2D; 4], center: Point2D) -> Option<[Point2D; 4]> {
    let mut slots: [Option<Point2D>; 4] = [None; 4];
    for &point in points {
        let slot = &mut slots[quadrant(point, center)];
        if slot.is_some() {
            return None;
        }
        *slot = Some(point);
    }
    Some([slots[0]?, slots[1]?, slots[2]?, slots[3]?])
}

fn sort_by_angle(points: &[Point2D; 4], center: Point2D) -> [Point2D; 4] {
    let mut ordered = *points;
    // y points down, so increasing atan2 runs clockwise on screen.
    ordered.sort_by(|a, b| {
        let angle_a = (a.y - center.y).atan2(a.x - center.x);
        let angle_b = (b.y - center.y).atan2(b.x - center.x);
        angle_a
            .total_cmp(&angle_b)
            .then_with(|| compare_xy(a, b))
    });

    let start = (0..4)
        .min_by(|&i, &j| {
            let (a, b) = (ordered[i], ordered[j]);
            (a.x + a.y)
                .total_cmp(&(b.x + b.y))
                .then_with(|| compare_xy(&a, &b))
        })
        .unwrap_or(0);
    ordered.rotate_left(start);
    ordered
}

fn compare_xy(a: &Point2D, b: &Point2D) -> Ordering {
    a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y))
}
