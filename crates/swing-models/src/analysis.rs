//! Analyzer response schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::angles::BodyAngles;
use crate::sample::KeyframeSet;

/// Millisecond timestamps of the four keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct KeyframeTimestamps {
    pub address: u64,
    pub top: u64,
    pub impact: u64,
    pub finish: u64,
}

/// Video facts echoed back in the response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub fps: f64,
    pub total_frames: u64,
    pub total_duration_ms: u64,
}

/// Successful analysis result, serialized as the analyzer's stdout line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwingAnalysis {
    pub timestamps_ms: KeyframeTimestamps,
    pub address_angles: BodyAngles,
    pub top_angles: BodyAngles,
    pub impact_angles: BodyAngles,
    pub finish_angles: BodyAngles,
    pub metadata: AnalysisMetadata,
}

impl SwingAnalysis {
    /// Assemble the response from the selected keyframes.
    ///
    /// Angles are rounded to one decimal here and nowhere earlier.
    pub fn from_keyframes(keyframes: &KeyframeSet) -> Self {
        Self {
            timestamps_ms: KeyframeTimestamps {
                address: keyframes.address.timestamp_ms,
                top: keyframes.top.timestamp_ms,
                impact: keyframes.impact.timestamp_ms,
                finish: keyframes.finish.timestamp_ms,
            },
            address_angles: keyframes.address.angles.rounded(),
            top_angles: keyframes.top.angles.rounded(),
            impact_angles: keyframes.impact.angles.rounded(),
            finish_angles: keyframes.finish.angles.rounded(),
            metadata: AnalysisMetadata {
                fps: keyframes.fps,
                total_frames: keyframes.total_frames,
                total_duration_ms: keyframes.total_duration_ms,
            },
        }
    }
}

impl From<&KeyframeSet> for SwingAnalysis {
    fn from(keyframes: &KeyframeSet) -> Self {
        Self::from_keyframes(keyframes)
    }
}

/// Failure response, serialized as the analyzer's stdout line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
