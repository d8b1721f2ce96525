// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for paper-sheet contour detection.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SheetGuardError;

/// Unique identifier for one evaluated camera frame (used to correlate logs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameId(pub Uuid);

impl FrameId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FrameId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FrameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A coordinate in image space (origin top-left, y pointing down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f32, f32)> for Point2D {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// The four corners of a candidate document boundary.
///
/// Detectors emit them in arbitrary order; after sorting the order is
/// top-left, top-right, bottom-right, bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point2D>", into = "Vec<Point2D>")]
pub struct Corners(pub [Point2D; 4]);

impl Corners {
    pub const fn new(points: [Point2D; 4]) -> Self {
        Self(points)
    }

    /// Build from a slice, failing unless it holds exactly four points.
    pub fn from_slice(points: &[Point2D]) -> Result<Self, SheetGuardError> {
        let points: [Point2D; 4] = points.try_into().map_err(|_| {
            SheetGuardError::InvalidInput(format!(
                "expected exactly 4 corner points, got {}",
                points.len()
            ))
        })?;
        Ok(Self(points))
    }

    pub fn points(&self) -> &[Point2D; 4] {
        &self.0
    }

    pub fn top_left(&self) -> Point2D {
        self.0[0]
    }

    pub fn top_right(&self) -> Point2D {
        self.0[1]
    }

    pub fn bottom_right(&self) -> Point2D {
        self.0[2]
    }

    pub fn bottom_left(&self) -> Point2D {
        self.0[3]
    }
}

impl TryFrom<Vec<Point2D>> for Corners {
    type Error = SheetGuardError;

    fn try_from(points: Vec<Point2D>) -> Result<Self, Self::Error> {
        Self::from_slice(&points)
    }
}

impl From<Corners> for Vec<Point2D> {
    fn from(corners: Corners) -> Self {
        corners.0.to_vec()
    }
}

/// Frame or model-output dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// Sensor orientation of the captured frame, forwarded to the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum SensorRotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl SensorRotation {
    /// Parse a rotation in degrees. Negative values and multiples of 360 are
    /// normalised first; anything that is not a right angle is rejected.
    pub fn from_degrees(degrees: i32) -> Result<Self, SheetGuardError> {
        match degrees.rem_euclid(360) {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            180 => Ok(Self::Deg180),
            270 => Ok(Self::Deg270),
            _ => Err(SheetGuardError::InvalidInput(format!(
                "sensor rotation must be a multiple of 90 degrees, got {}",
                degrees
            ))),
        }
    }

    pub fn degrees(&self) -> i32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }
}

impl TryFrom<i32> for SensorRotation {
    type Error = SheetGuardError;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        Self::from_degrees(degrees)
    }
}

impl From<SensorRotation> for i32 {
    fn from(rotation: SensorRotation) -> Self {
        rotation.degrees()
    }
}

/// Time spent inside the detector, reported alongside each result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DetectorTimings {
    /// Neural-network inference time.
    #[serde(rename = "infer_ms", with = "millis")]
    pub infer_time: Duration,
    /// Contour search time on the segmentation mask.
    #[serde(rename = "find_contours_ms", with = "millis")]
    pub find_contours_time: Duration,
}

/// Output of a contour detector for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Candidate document corners, or `None` when no sheet was found.
    pub corners: Option<Corners>,
    /// Size of the space the corners are expressed in.
    pub output_size: Size,
    #[serde(default)]
    pub timings: DetectorTimings,
}

impl DetectionResult {
    pub fn new(corners: Option<Corners>, output_size: Size) -> Self {
        Self {
            corners,
            output_size,
            timings: DetectorTimings::default(),
        }
    }

    pub fn with_timings(mut self, timings: DetectorTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Copy of this result with the corners replaced.
    pub fn with_corners(&self, corners: Corners) -> Self {
        Self {
            corners: Some(corners),
            ..self.clone()
        }
    }

    /// Copy of this result with the corners cleared ("nothing found").
    pub fn without_corners(&self) -> Self {
        Self {
            corners: None,
            ..self.clone()
        }
    }
}

/// Serde adapter storing a `Duration` as whole milliseconds.
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point2D> {
        vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(0.0, 10.0),
        ]
    }

    #[test]
    fn corners_require_four_points() {
        assert!(Corners::from_slice(&square()).is_ok());

        let three = &square()[..3];
        match Corners::from_slice(three) {
            Err(SheetGuardError::InvalidInput(msg)) => assert!(msg.contains("got 3")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn corners_json_is_a_plain_point_array() {
        let corners = Corners::from_slice(&square()).unwrap();
        let json = serde_json::to_string(&corners).unwrap();
        assert!(json.starts_with("[{"));

        let five = r#"[{"x":0,"y":0},{"x":1,"y":0},{"x":1,"y":1},{"x":0,"y":1},{"x":2,"y":2}]"#;
        assert!(serde_json::from_str::<Corners>(five).is_err());
    }

    #[test]
    fn size_area() {
        assert_eq!(Size::new(100.0, 50.0).area(), 5000.0);
        assert_eq!(Size::new(0.0, 50.0).area(), 0.0);
    }

    #[test]
    fn rotation_parsing() {
        assert_eq!(SensorRotation::from_degrees(90).unwrap(), SensorRotation::Deg90);
        assert_eq!(SensorRotation::from_degrees(-90).unwrap(), SensorRotation::Deg270);
        assert_eq!(SensorRotation::from_degrees(360).unwrap(), SensorRotation::Deg0);
        assert!(SensorRotation::from_degrees(45).is_err());
    }

    #[test]
    fn detection_result_from_recorded_json() {
        let json = r#"{
            "corners": [{"x":0,"y":0},{"x":10,"y":0},{"x":10,"y":10},{"x":0,"y":10}],
            "output_size": {"width": 10, "height": 10},
            "timings": {"infer_ms": 12, "find_contours_ms": 3}
        }"#;
        let result: DetectionResult = serde_json::from_str(json).unwrap();
        assert!(result.corners.is_some());
        assert_eq!(result.timings.infer_time, Duration::from_millis(12));
        assert_eq!(result.timings.find_contours_time, Duration::from_millis(3));

        let cleared = result.without_corners();
        assert!(cleared.corners.is_none());
        assert_eq!(cleared.output_size, result.output_size);
        assert_eq!(cleared.timings, result.timings);
    }

    #[test]
    fn detection_result_timings_default_when_missing() {
        let json = r#"{"corners": null, "output_size": {"width": 4, "height": 3}}"#;
        let result: DetectionResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.timings, DetectorTimings::default());
    }
}
