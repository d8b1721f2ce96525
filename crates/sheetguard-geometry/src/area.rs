// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Polygon area and centroid helpers.

use sheetguard_core::{Corners, Point2D};

/// Signed area of the polygon visiting `points` in the given order, using the
/// shoelace formula.
///
/// In image coordinates (y pointing down) a clockwise-on-screen traversal
/// yields a positive value. Reversing the order flips the sign; rotating the
/// starting vertex leaves it unchanged. Fewer than three points give `0.0`.
pub fn signed_area(points: &[Point2D]) -> f32 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    // Accumulate in f64: the products of pixel coordinates lose precision fast in f32.
    let mut twice_area = 0.0f64;
    for i in 0..n {
        let j = (i + 1) % n;
        twice_area += points[i].x as f64 * points[j].y as f64;
        twice_area -= points[j].x as f64 * points[i].y as f64;
    }
    (twice_area / 2.0) as f32
}

/// Area enclosed by the four corners, visited in the given order.
///
/// Always `>= 0`; collinear or coincident corners give `0.0`. The corners
/// should already be in canonical order, otherwise a self-intersecting
/// traversal under-reports the area.
pub fn polygon_area(corners: &Corners) -> f32 {
    signed_area(corners.points()).abs()
}

/// Arithmetic mean of the points, or `None` for an empty slice.
pub fn centroid(points: &[Point2D]) -> Option<Point2D> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f32;
    let sum_x: f32 = points.iter().map(|p| p.x).sum();
    let sum_y: f32 = points.iter().map(|p| p.y).sum();
    Some(Point2D::new(sum_x / n, sum_y / n))
}

/// Z component of `(a - o) x (b - o)`. Zero when the three points are collinear.
pub(crate) fn cross(o: Point2D, a: Point2D, b: Point2D) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}
