//! Sampled frames and selected swing keyframes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::angles::BodyAngles;

/// Container-level facts about the analyzed video, as reported by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    /// Frame rate (fps)
    pub fps: f64,
    /// Total frame count
    pub total_frames: u64,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl VideoMetadata {
    /// Total duration in milliseconds, rounded to the nearest millisecond.
    ///
    /// Returns 0 when the frame rate is unknown.
    pub fn duration_ms(&self) -> u64 {
        if self.fps <= 0.0 {
            return 0;
        }
        (self.total_frames as f64 / self.fps * 1000.0).round() as u64
    }

    /// Presentation timestamp of a frame, truncated to whole milliseconds.
    pub fn timestamp_ms(&self, frame_index: u64) -> u64 {
        if self.fps <= 0.0 {
            return 0;
        }
        (frame_index as f64 / self.fps * 1000.0) as u64
    }
}

/// Measurements for one sampled frame with a detected pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FrameSample {
    /// Index of the frame in the decoded stream
    pub frame_index: u64,
    /// Presentation timestamp in milliseconds
    pub timestamp_ms: u64,
    /// Unrounded body angles
    pub angles: BodyAngles,
    /// Mean normalized y of both wrists (smaller = higher in frame)
    pub wrist_y: f64,
    /// Shoulder line angle, duplicated from `angles` for keyframe selection
    pub shoulder_turn: f64,
}

impl FrameSample {
    pub fn new(frame_index: u64, timestamp_ms: u64, angles: BodyAngles, wrist_y: f64) -> Self {
        Self {
            frame_index,
            timestamp_ms,
            angles,
            wrist_y,
            shoulder_turn: angles.shoulder_turn,
        }
    }
}

/// Canonical swing phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SwingPhase {
    Address,
    Top,
    Impact,
    Finish,
}

impl SwingPhase {
    pub const ALL: &'static [SwingPhase] = &[
        SwingPhase::Address,
        SwingPhase::Top,
        SwingPhase::Impact,
        SwingPhase::Finish,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SwingPhase::Address => "address",
            SwingPhase::Top => "top",
            SwingPhase::Impact => "impact",
            SwingPhase::Finish => "finish",
        }
    }
}

impl fmt::Display for SwingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The four selected keyframes plus the video facts needed for the response.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeSet {
    pub address: FrameSample,
    pub top: FrameSample,
    pub impact: FrameSample,
    pub finish: FrameSample,
    pub fps: f64,
    pub total_frames: u64,
    pub total_duration_ms: u64,
}

impl KeyframeSet {
    pub fn new(
        address: FrameSample,
        top: FrameSample,
        impact: FrameSample,
        finish: FrameSample,
        video: &VideoMetadata,
    ) -> Self {
        Self {
            address,
            top,
            impact,
            finish,
            fps: video.fps,
            total_frames: video.total_frames,
            total_duration_ms: video.duration_ms(),
        }
    }

    /// Get the sample selected for a phase.
    pub fn phase(&self, phase: SwingPhase) -> &FrameSample {
        match phase {
            SwingPhase::Address => &self.address,
            SwingPhase::Top => &self.top,
            SwingPhase::Impact => &self.impact,
            SwingPhase::Finish => &self.finish,
        }
    }
}
