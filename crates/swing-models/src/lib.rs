//! Shared data models for golf swing pose analysis.
//!
//! This crate provides Serde-serializable types for:
//! - Pose landmarks as returned by a pose-estimation model
//! - Per-frame body angle measurements
//! - Sampled frames and the selected swing keyframes
//! - The JSON response emitted by the analyzer

pub mod analysis;
pub mod angles;
pub mod landmark;
pub mod running_mode;
pub mod sample;

// Re-export common types
pub use analysis::{AnalysisMetadata, ErrorResponse, KeyframeTimestamps, SwingAnalysis};
pub use angles::{BodyAngles, Point2D};
pub use landmark::{Landmark, LandmarkError, Landmarks, POSE_LANDMARK_COUNT};
pub use running_mode::{RunningMode, RunningModeParseError};
pub use sample::{FrameSample, KeyframeSet, SwingPhase, VideoMetadata};
