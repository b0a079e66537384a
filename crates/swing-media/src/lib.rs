#![deny(unreachable_patterns)]
//! Golf swing pose analysis.
//!
//! This crate provides:
//! - Evenly spaced frame sampling over any [`FrameSource`] (OpenCV-backed by default)
//! - A [`PoseOracle`] abstraction with an ONNX Runtime BlazePose implementation
//! - Biomechanical angle extraction from pose landmarks
//! - Heuristic selection of the address, top, impact and finish keyframes
//! - Model provisioning as an explicit initialization step

pub mod angles;
pub mod error;
pub mod keyframes;
pub mod model;
pub mod pipeline;
pub mod pose;
pub mod sampler;
#[cfg(feature = "opencv")]
pub mod video;

pub use angles::{angle_2d, compute_angles, landmark_to_point};
pub use error::{MediaError, MediaResult};
pub use keyframes::{select_keyframe_indices, select_keyframes, KeyframeConfig, KeyframeIndices};
pub use model::{ensure_model, ModelConfig};
#[cfg(feature = "opencv")]
pub use pipeline::analyze_video_file;
pub use pipeline::{analyze_swing, collect_samples, PipelineConfig};
pub use pose::{OrtPoseOracle, PoseConfig, PoseOracle};
pub use sampler::{sample_stride, FrameSampler, FrameSource, SampledFrame};
#[cfg(feature = "opencv")]
pub use video::OpencvVideoSource;
