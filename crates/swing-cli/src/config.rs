//! Analyzer configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use swing_media::{KeyframeConfig, ModelConfig, PipelineConfig, PoseConfig};
use swing_models::RunningMode;
use tracing::warn;

/// Everything one analyzer run needs besides the video path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalyzerConfig {
    pub model: ModelConfig,
    pub pose: PoseConfig,
    pub pipeline: PipelineConfig,
}

impl AnalyzerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let model_defaults = ModelConfig::default();
        let pose_defaults = PoseConfig::default();
        let keyframe_defaults = KeyframeConfig::default();

        let model = ModelConfig {
            path: get("SWING_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(model_defaults.path),
            url: get("SWING_MODEL_URL").unwrap_or(model_defaults.url),
            download_timeout: match parse_or(&get, "SWING_MODEL_DOWNLOAD_TIMEOUT_SECS", 0u64) {
                0 => model_defaults.download_timeout,
                secs => Duration::from_secs(secs),
            },
        };

        let pose = PoseConfig {
            running_mode: parse_or(&get, "SWING_RUNNING_MODE", pose_defaults.running_mode),
            min_detection_confidence: parse_or(
                &get,
                "SWING_MIN_DETECTION_CONFIDENCE",
                pose_defaults.min_detection_confidence,
            ),
            min_tracking_confidence: parse_or(
                &get,
                "SWING_MIN_TRACKING_CONFIDENCE",
                pose_defaults.min_tracking_confidence,
            ),
            intra_threads: parse_or(&get, "SWING_INTRA_THREADS", pose_defaults.intra_threads),
            landmarks_output: get("SWING_LANDMARKS_OUTPUT"),
            presence_output: get("SWING_PRESENCE_OUTPUT"),
            ..pose_defaults
        };

        let keyframes = KeyframeConfig {
            address_window: parse_or(&get, "SWING_ADDRESS_WINDOW", keyframe_defaults.address_window),
            top_window_start: parse_or(
                &get,
                "SWING_TOP_WINDOW_START",
                keyframe_defaults.top_window_start,
            ),
            top_window_end: parse_or(&get, "SWING_TOP_WINDOW_END", keyframe_defaults.top_window_end),
            top_fallback: parse_or(&get, "SWING_TOP_FALLBACK", keyframe_defaults.top_fallback),
            impact_window_end: parse_or(
                &get,
                "SWING_IMPACT_WINDOW_END",
                keyframe_defaults.impact_window_end,
            ),
            impact_fallback: parse_or(
                &get,
                "SWING_IMPACT_FALLBACK",
                keyframe_defaults.impact_fallback,
            ),
            finish_window_start: parse_or(
                &get,
                "SWING_FINISH_WINDOW_START",
                keyframe_defaults.finish_window_start,
            ),
        };

        let pipeline = PipelineConfig {
            target_samples: parse_or(
                &get,
                "SWING_TARGET_SAMPLES",
                PipelineConfig::default().target_samples,
            ),
            keyframes,
        };

        Self {
            model,
            pose,
            pipeline,
        }
    }
}

/// Parse `key` if set, warning and keeping `default` when it does not parse.
fn parse_or<T: FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match get(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Ignoring unparseable config value");
            default
        }),
        None => default,
    }
}
