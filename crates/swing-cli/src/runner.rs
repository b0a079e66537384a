//! Command-line entry point logic.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use swing_media::{ensure_model, MediaError};
use swing_models::{ErrorResponse, SwingAnalysis};
use tracing::info;

use crate::config::AnalyzerConfig;

pub const USAGE: &str = "Usage: swing-analyze <video_path>";

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Analyze(PathBuf),
    Schema,
}

impl Command {
    /// Parse arguments, excluding the program name.
    pub fn parse<I, S>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        match args.next() {
            Some(flag) if flag == "--schema" => Ok(Self::Schema),
            Some(path) if !path.starts_with("--") => Ok(Self::Analyze(PathBuf::from(path))),
            _ => bail!(USAGE),
        }
    }
}

/// JSON schema of the success output.
pub fn schema_json() -> anyhow::Result<String> {
    let schema = schemars::schema_for!(SwingAnalysis);
    Ok(serde_json::to_string_pretty(&schema)?)
}

/// Provision the model, then analyze the video on a blocking thread.
pub async fn analyze(video: &Path, config: AnalyzerConfig) -> anyhow::Result<SwingAnalysis> {
    if !video.exists() {
        return Err(MediaError::FileNotFound(video.to_path_buf()).into());
    }

    let model_path = ensure_model(&config.model).await?;
    info!(video = %video.display(), model = %model_path.display(), "Analyzing swing");

    let video = video.to_path_buf();
    let analysis = tokio::task::spawn_blocking(move || {
        swing_media::analyze_video_file(&video, &model_path, config.pose, &config.pipeline)
    })
    .await
    .context("analysis task panicked")??;

    Ok(analysis)
}

/// Execute a parsed command, returning the line to print on stdout.
pub async fn run(command: Command, config: AnalyzerConfig) -> anyhow::Result<String> {
    match command {
        Command::Schema => schema_json(),
        Command::Analyze(video) => {
            let analysis = analyze(&video, config).await?;
            Ok(serde_json::to_string(&analysis)?)
        }
    }
}

/// Render a failure as the single-line error object.
pub fn error_json(err: &anyhow::Error) -> String {
    let response = ErrorResponse::new(err.to_string());
    serde_json::to_string(&response)
        .unwrap_or_else(|_| r#"{"error":"failed to encode error"}"#.to_string())
}
