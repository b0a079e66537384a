//! Swing keyframe selection.
//!
//! Picks address, top, impact and finish from the sampled pose sequence
//! using wrist height and shoulder rotation. Each phase is searched in a
//! window expressed as a fraction of the sequence length:
//!
//! | phase   | signal          | window (default)        | fallback      |
//! |---------|-----------------|-------------------------|---------------|
//! | address | min shoulder    | `[0, max(1, N/8))`      | -             |
//! | top     | min wrist y     | `[N/10, N/2)`           | `N/4`         |
//! | impact  | max wrist y     | `[top, 3N/4)`           | `0.6N`        |
//! | finish  | min wrist y     | `[3N/4, N)`             | last sample   |
//!
//! Window bounds are floored. Ties resolve to the earliest sample.

use serde::{Deserialize, Serialize};
use swing_models::{FrameSample, KeyframeSet, VideoMetadata};
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Minimum number of detected poses needed to select keyframes.
pub const MIN_POSE_SAMPLES: usize = 4;

/// Window fractions for keyframe selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeConfig {
    /// End of the address window (default: 1/8)
    pub address_window: f64,
    /// Start of the top-of-backswing window (default: 0.1)
    pub top_window_start: f64,
    /// End of the top-of-backswing window (default: 0.5)
    pub top_window_end: f64,
    /// Top position used when its window is empty (default: 0.25)
    pub top_fallback: f64,
    /// End of the impact window; it starts at the top (default: 0.75)
    pub impact_window_end: f64,
    /// Impact position used when its window is empty (default: 0.6)
    pub impact_fallback: f64,
    /// Start of the finish window; it runs to the end (default: 0.75)
    pub finish_window_start: f64,
}

impl Default for KeyframeConfig {
    fn default() -> Self {
        Self {
            address_window: 0.125,
            top_window_start: 0.1,
            top_window_end: 0.5,
            top_fallback: 0.25,
            impact_window_end: 0.75,
            impact_fallback: 0.6,
            finish_window_start: 0.75,
        }
    }
}

impl KeyframeConfig {
    /// Reject fractions outside `[0, 1]` and inverted windows.
    pub fn validate(&self) -> MediaResult<()> {
        let fractions = [
            ("address_window", self.address_window),
            ("top_window_start", self.top_window_start),
            ("top_window_end", self.top_window_end),
            ("top_fallback", self.top_fallback),
            ("impact_window_end", self.impact_window_end),
            ("impact_fallback", self.impact_fallback),
            ("finish_window_start", self.finish_window_start),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(MediaError::invalid_config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.top_window_start > self.top_window_end {
            return Err(MediaError::invalid_config(format!(
                "top window start {} is after its end {}",
                self.top_window_start, self.top_window_end
            )));
        }
        Ok(())
    }
}

/// Positions of the four keyframes within the sample sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyframeIndices {
    pub address: usize,
    pub top: usize,
    pub impact: usize,
    pub finish: usize,
}

/// `floor(n * fraction)`, capped at `n`.
fn fraction_of(n: usize, fraction: f64) -> usize {
    ((n as f64 * fraction) as usize).min(n)
}

/// Index of the first smallest key in `samples[start..end]`.
fn first_min_by(
    samples: &[FrameSample],
    start: usize,
    end: usize,
    key: impl Fn(&FrameSample) -> f64,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, sample) in samples.iter().enumerate().take(end).skip(start) {
        let value = key(sample);
        match best {
            Some((_, current)) if value >= current => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Index of the first largest key in `samples[start..end]`.
fn first_max_by(
    samples: &[FrameSample],
    start: usize,
    end: usize,
    key: impl Fn(&FrameSample) -> f64,
) -> Option<usize> {
    first_min_by(samples, start, end, |s| -key(s))
}

/// Locate the four keyframes in a sample sequence.
pub fn select_keyframe_indices(
    samples: &[FrameSample],
    config: &KeyframeConfig,
) -> MediaResult<KeyframeIndices> {
    let n = samples.len();
    if n < MIN_POSE_SAMPLES {
        return Err(MediaError::InsufficientPoseData { detected: n });
    }
    if samples
        .windows(2)
        .any(|pair| pair[0].frame_index >= pair[1].frame_index)
    {
        return Err(MediaError::internal(
            "pose samples are not in increasing frame order",
        ));
    }

    let last = n - 1;

    let address_end = fraction_of(n, config.address_window).max(1);
    let address = first_min_by(samples, 0, address_end, |s| s.shoulder_turn).unwrap_or(0);

    let top = first_min_by(
        samples,
        fraction_of(n, config.top_window_start),
        fraction_of(n, config.top_window_end),
        |s| s.wrist_y,
    )
    .unwrap_or_else(|| fraction_of(n, config.top_fallback).min(last));

    let impact = first_max_by(
        samples,
        top,
        fraction_of(n, config.impact_window_end),
        |s| s.wrist_y,
    )
    .unwrap_or_else(|| fraction_of(n, config.impact_fallback).min(last));

    let finish = first_min_by(
        samples,
        fraction_of(n, config.finish_window_start),
        n,
        |s| s.wrist_y,
    )
    .unwrap_or(last);

    let indices = KeyframeIndices {
        address,
        top,
        impact,
        finish,
    };
    debug!(samples = n, ?indices, "Selected keyframe indices");
    Ok(indices)
}

/// Select keyframes and attach the video facts needed for the response.
pub fn select_keyframes(
    samples: &[FrameSample],
    video: &VideoMetadata,
    config: &KeyframeConfig,
) -> MediaResult<KeyframeSet> {
    let idx = select_keyframe_indices(samples, config)?;
    Ok(KeyframeSet::new(
        samples[idx.address],
        samples[idx.top],
        samples[idx.impact],
        samples[idx.finish],
        video,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use swing_models::BodyAngles;

    fn samples_from(wrist_y: &[f64], shoulder_turn: &[f64]) -> Vec<FrameSample> {
        wrist_y
            .iter()
            .zip(shoulder_turn)
            .enumerate()
            .map(|(i, (&wy, &turn))| {
                let angles = BodyAngles {
                    shoulder_turn: turn,
                    ..Default::default()
                };
                FrameSample::new(i as u64 * 5, i as u64 * 166, angles, wy)
            })
            .collect()
    }

    /// 40 samples: wrist peaks at 15, bottoms out at 28, recovers near 36.
    fn synthetic_swing() -> Vec<FrameSample> {
        let mut wrist_y = vec![0.5; 40];
        wrist_y[15] = 0.1;
        wrist_y[28] = 0.9;
        wrist_y[36] = 0.2;
        let mut shoulder_turn = vec![20.0; 40];
        shoulder_turn[0] = 1.0;
        samples_from(&wrist_y, &shoulder_turn)
    }

    #[test]
    fn test_synthetic_swing() {
        let idx = select_keyframe_indices(&synthetic_swing(), &KeyframeConfig::default()).unwrap();
        assert_eq!(idx.address, 0);
        assert_eq!(idx.top, 15);
        assert_eq!(idx.impact, 28);
        assert_eq!(idx.finish, 36);
    }

    #[test]
    fn test_too_few_samples() {
        let samples = samples_from(&[0.5; 3], &[0.0; 3]);
        let err = select_keyframe_indices(&samples, &KeyframeConfig::default()).unwrap_err();
        assert!(matches!(err, MediaError::InsufficientPoseData { detected: 3 }));
        assert!(err.to_string().contains("Insufficient pose data"));
    }

    #[test]
    fn test_empty_sequence() {
        let err = select_keyframe_indices(&[], &KeyframeConfig::default()).unwrap_err();
        assert!(matches!(err, MediaError::InsufficientPoseData { detected: 0 }));
    }

    #[test]
    fn test_minimum_sequence() {
        // N=4: address [0,1), top [0,2), impact [top,3), finish [3,4)
        let samples = samples_from(&[0.5, 0.3, 0.8, 0.6], &[5.0, 1.0, 1.0, 1.0]);
        let idx = select_keyframe_indices(&samples, &KeyframeConfig::default()).unwrap();
        assert_eq!(idx.address, 0);
        assert_eq!(idx.top, 1);
        assert_eq!(idx.impact, 2);
        assert_eq!(idx.finish, 3);
    }

    #[test]
    fn test_ties_pick_first() {
        let samples = samples_from(&[0.5; 20], &[3.0; 20]);
        let idx = select_keyframe_indices(&samples, &KeyframeConfig::default()).unwrap();
        assert_eq!(idx.address, 0);
        assert_eq!(idx.top, 2);
        assert_eq!(idx.impact, 2);
        assert_eq!(idx.finish, 15);
    }

    #[test]
    fn test_top_fallback_when_window_empty() {
        let config = KeyframeConfig {
            top_window_start: 0.5,
            top_window_end: 0.5,
            ..Default::default()
        };
        let samples = samples_from(&[0.5; 20], &[3.0; 20]);
        let idx = select_keyframe_indices(&samples, &config).unwrap();
        assert_eq!(idx.top, 5);
    }

    #[test]
    fn test_impact_fallback_when_top_is_late() {
        let config = KeyframeConfig {
            top_window_start: 0.8,
            top_window_end: 0.9,
            ..Default::default()
        };
        let samples = samples_from(&[0.5; 10], &[3.0; 10]);
        let idx = select_keyframe_indices(&samples, &config).unwrap();
        assert_eq!(idx.top, 8);
        assert_eq!(idx.impact, 6);
    }

    #[test]
    fn test_impact_searches_from_top() {
        // Deepest wrist before the top must not be picked as impact
        let mut wrist_y = vec![0.5; 20];
        wrist_y[3] = 0.95;
        wrist_y[6] = 0.1;
        wrist_y[12] = 0.8;
        let samples = samples_from(&wrist_y, &[3.0; 20]);
        let idx = select_keyframe_indices(&samples, &KeyframeConfig::default()).unwrap();
        assert_eq!(idx.top, 6);
        assert_eq!(idx.impact, 12);
    }

    #[test]
    fn test_rejects_unordered_samples() {
        let mut samples = samples_from(&[0.5; 6], &[3.0; 6]);
        samples.swap(1, 2);
        assert!(matches!(
            select_keyframe_indices(&samples, &KeyframeConfig::default()),
            Err(MediaError::Internal(_))
        ));
    }

    #[test]
    fn test_select_keyframes_carries_metadata() {
        let video = VideoMetadata {
            fps: 30.0,
            total_frames: 300,
            width: 1920,
            height: 1080,
        };
        let samples = synthetic_swing();
        let set = select_keyframes(&samples, &video, &KeyframeConfig::default()).unwrap();

        assert_eq!(set.top, samples[15]);
        assert_eq!(set.impact, samples[28]);
        assert_eq!(set.total_duration_ms, 10_000);
        assert_eq!(set.total_frames, 300);
    }

    #[test]
    fn test_config_validation() {
        assert!(KeyframeConfig::default().validate().is_ok());

        let out_of_range = KeyframeConfig {
            impact_fallback: 1.5,
            ..Default::default()
        };
        assert!(out_of_range.validate().is_err());

        let inverted = KeyframeConfig {
            top_window_start: 0.6,
            top_window_end: 0.4,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());
    }
}
