//! Pose oracle running modes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How the pose oracle treats consecutive frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunningMode {
    /// Frames form a stream with strictly increasing timestamps.
    /// The previous pose seeds the region of interest for the next frame.
    #[default]
    Video,

    /// Every frame is an independent still image.
    Image,
}

impl RunningMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunningMode::Video => "video",
            RunningMode::Image => "image",
        }
    }

    /// Returns true if the oracle carries state between frames.
    pub fn is_tracking(&self) -> bool {
        matches!(self, RunningMode::Video)
    }
}

impl fmt::Display for RunningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RunningMode {
    type Err = RunningModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "video" | "stream" => Ok(RunningMode::Video),
            "image" | "still" => Ok(RunningMode::Image),
            _ => Err(RunningModeParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown running mode: {0}")]
pub struct RunningModeParseError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!("video".parse::<RunningMode>().unwrap(), RunningMode::Video);
        assert_eq!("IMAGE".parse::<RunningMode>().unwrap(), RunningMode::Image);
        assert!("live".parse::<RunningMode>().is_err());
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(RunningMode::Video.to_string(), "video");
        assert_eq!(RunningMode::default(), RunningMode::Video);
    }
}
