//! Pose estimation.
//!
//! The rest of the pipeline only sees [`PoseOracle`]: give it an RGB frame
//! and a timestamp, get back zero or one set of normalized landmarks.
//! [`OrtPoseOracle`] is the production implementation backed by a
//! BlazePose landmark model running on ONNX Runtime.

mod ort_oracle;
pub mod roi;

use image::RgbImage;
use serde::{Deserialize, Serialize};
use swing_models::{Landmarks, RunningMode};

use crate::error::{MediaError, MediaResult};

pub use ort_oracle::OrtPoseOracle;

/// Single-person 2D pose detector.
pub trait PoseOracle: Send {
    /// Detect a pose in one RGB frame.
    ///
    /// `timestamp_ms` must increase strictly between calls when the oracle
    /// runs in [`RunningMode::Video`].
    fn detect(&mut self, image: &RgbImage, timestamp_ms: u64) -> MediaResult<Option<Landmarks>>;
}

impl<T: PoseOracle + ?Sized> PoseOracle for Box<T> {
    fn detect(&mut self, image: &RgbImage, timestamp_ms: u64) -> MediaResult<Option<Landmarks>> {
        (**self).detect(image, timestamp_ms)
    }
}

/// Pose oracle configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseConfig {
    /// Stream (tracking) or independent-image inference (default: video)
    pub running_mode: RunningMode,
    /// Minimum pose presence score for a fresh detection (default: 0.5)
    pub min_detection_confidence: f32,
    /// Minimum pose presence score while tracking a previous pose (default: 0.5)
    pub min_tracking_confidence: f32,
    /// Landmarks below this visibility do not shape the tracking ROI (default: 0.5)
    pub min_landmark_visibility: f64,
    /// Tracking ROI side as a multiple of the landmark bounding box (default: 1.5)
    pub roi_scale: f64,
    /// Side of the model's square input canvas (default: 256)
    pub input_size: u32,
    /// ONNX Runtime intra-op threads, 0 = runtime default (default: 0)
    pub intra_threads: usize,
    /// Output holding the landmark tensor; `None` = first output
    pub landmarks_output: Option<String>,
    /// Output holding the pose presence score; `None` = second output
    pub presence_output: Option<String>,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            running_mode: RunningMode::Video,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
            min_landmark_visibility: 0.5,
            roi_scale: 1.5,
            input_size: 256,
            intra_threads: 0,
            landmarks_output: None,
            presence_output: None,
        }
    }
}

impl PoseConfig {
    /// Config for independent still images.
    pub fn image_mode() -> Self {
        Self {
            running_mode: RunningMode::Image,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> MediaResult<()> {
        for (name, value) in [
            ("min_detection_confidence", self.min_detection_confidence),
            ("min_tracking_confidence", self.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(MediaError::invalid_config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.roi_scale < 1.0 {
            return Err(MediaError::invalid_config(format!(
                "roi_scale must be at least 1.0, got {}",
                self.roi_scale
            )));
        }
        if self.input_size < 32 {
            return Err(MediaError::invalid_config(format!(
                "input_size {} is too small",
                self.input_size
            )));
        }
        Ok(())
    }
}
