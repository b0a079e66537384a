//! End-to-end swing analysis.
//!
//! sampler → pose oracle → angle calculator, once per sampled frame, then
//! keyframe selection over the whole sequence and response assembly.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use swing_models::{FrameSample, SwingAnalysis, SwingPhase};
use tracing::{debug, info};

use crate::angles::compute_angles;
use crate::error::MediaResult;
use crate::keyframes::{select_keyframes, KeyframeConfig};
use crate::pose::PoseOracle;
use crate::sampler::{FrameSampler, FrameSource, DEFAULT_TARGET_SAMPLES};

/// Log progress every this many sampled frames.
const PROGRESS_INTERVAL: u64 = 20;

/// Sampling and keyframe settings for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Approximate number of frames to run pose inference on (default: 60)
    pub target_samples: u64,
    pub keyframes: KeyframeConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_samples: DEFAULT_TARGET_SAMPLES,
            keyframes: KeyframeConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> MediaResult<()> {
        if self.target_samples == 0 {
            return Err(crate::error::MediaError::invalid_config(
                "target_samples must be positive",
            ));
        }
        self.keyframes.validate()
    }
}

/// Run pose inference over the sampled frames of `source`.
///
/// Frames where the oracle finds no pose are skipped; the returned samples
/// are in increasing frame order.
pub fn collect_samples<S, O>(
    source: &mut S,
    oracle: &mut O,
    target_samples: u64,
) -> MediaResult<Vec<FrameSample>>
where
    S: FrameSource + ?Sized,
    O: PoseOracle + ?Sized,
{
    let start = Instant::now();
    let mut sampler = FrameSampler::new(source, target_samples);
    let stride = sampler.stride();
    let expected = sampler.metadata().total_frames / stride;

    info!(
        total_frames = sampler.metadata().total_frames,
        fps = sampler.metadata().fps,
        stride,
        "Sampling frames for pose analysis"
    );

    let mut samples = Vec::with_capacity(expected as usize + 1);
    let mut sampled: u64 = 0;

    while let Some(frame) = sampler.next_sample()? {
        sampled += 1;
        metrics::counter!("swing_frames_sampled_total").increment(1);

        match oracle.detect(&frame.image, frame.timestamp_ms)? {
            Some(landmarks) => {
                metrics::counter!("swing_poses_detected_total").increment(1);
                let (width, height) = frame.image.dimensions();
                let angles = compute_angles(&landmarks, width, height);
                samples.push(FrameSample::new(
                    frame.frame_index,
                    frame.timestamp_ms,
                    angles,
                    landmarks.average_wrist_y(),
                ));
            }
            None => {
                metrics::counter!("swing_pose_misses_total").increment(1);
                debug!(frame = frame.frame_index, "No pose detected");
            }
        }

        if sampled % PROGRESS_INTERVAL == 0 {
            info!(
                sampled,
                expected,
                detected = samples.len(),
                "Pose sampling progress"
            );
        }
    }

    info!(
        sampled,
        detected = samples.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Pose sampling complete"
    );

    Ok(samples)
}

/// Analyze a swing from any frame source and pose oracle.
pub fn analyze_swing<S, O>(
    source: &mut S,
    oracle: &mut O,
    config: &PipelineConfig,
) -> MediaResult<SwingAnalysis>
where
    S: FrameSource + ?Sized,
    O: PoseOracle + ?Sized,
{
    config.validate()?;

    let video = source.metadata();
    let samples = collect_samples(source, oracle, config.target_samples)?;
    let keyframes = select_keyframes(&samples, &video, &config.keyframes)?;

    for &phase in SwingPhase::ALL {
        let sample = keyframes.phase(phase);
        info!(
            phase = %phase,
            frame = sample.frame_index,
            timestamp_ms = sample.timestamp_ms,
            wrist_y = sample.wrist_y,
            "Selected keyframe"
        );
    }

    Ok(SwingAnalysis::from_keyframes(&keyframes))
}

/// Analyze a video file with the ONNX pose model at `model_path`.
///
/// The model must already be on disk; see [`crate::model::ensure_model`].
#[cfg(feature = "opencv")]
pub fn analyze_video_file(
    video_path: &std::path::Path,
    model_path: &std::path::Path,
    pose: crate::pose::PoseConfig,
    config: &PipelineConfig,
) -> MediaResult<SwingAnalysis> {
    let mut source = crate::video::OpencvVideoSource::open(video_path)?;
    let mut oracle = crate::pose::OrtPoseOracle::load(model_path, pose)?;
    analyze_swing(&mut source, &mut oracle, config)
}
