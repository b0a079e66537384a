//! Pose landmark models.
//!
//! Landmarks follow the 33-point BlazePose topology. Coordinates are
//! normalized to the full frame: (0.0, 0.0) is the top-left corner and
//! y grows downward.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of landmarks in a full-body pose.
pub const POSE_LANDMARK_COUNT: usize = 33;

pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;

/// Single normalized body keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Landmark {
    /// Horizontal position (0.0 = left, 1.0 = right)
    pub x: f64,
    /// Vertical position (0.0 = top, 1.0 = bottom)
    pub y: f64,
    /// Likelihood that the point is visible in the frame (0.0 to 1.0)
    pub visibility: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, visibility: f64) -> Self {
        Self { x, y, visibility }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Expected {POSE_LANDMARK_COUNT} pose landmarks, got {0}")]
pub struct LandmarkError(pub usize);

/// One detected pose: exactly [`POSE_LANDMARK_COUNT`] landmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct Landmarks(Vec<Landmark>);

impl Landmarks {
    /// Wrap a landmark list, rejecting anything but a full pose.
    pub fn new(points: Vec<Landmark>) -> Result<Self, LandmarkError> {
        if points.len() != POSE_LANDMARK_COUNT {
            return Err(LandmarkError(points.len()));
        }
        Ok(Self(points))
    }

    /// Get a landmark by BlazePose index.
    ///
    /// # Panics
    /// Panics if `idx >= POSE_LANDMARK_COUNT`.
    pub fn get(&self, idx: usize) -> Landmark {
        self.0[idx]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.0.iter()
    }

    /// Mean normalized y of both wrists.
    pub fn average_wrist_y(&self) -> f64 {
        (self.0[LEFT_WRIST].y + self.0[RIGHT_WRIST].y) / 2.0
    }
}

impl TryFrom<Vec<Landmark>> for Landmarks {
    type Error = LandmarkError;

    fn try_from(points: Vec<Landmark>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Landmarks> for Vec<Landmark> {
    fn from(landmarks: Landmarks) -> Self {
        landmarks.0
    }
}
