//! Pose model artifact provisioning.
//!
//! [`ensure_model`] is an explicit initialization step: it makes sure the
//! landmark model exists on disk and returns its path, which is then passed
//! to [`crate::pose::OrtPoseOracle::load`]. An existing file is trusted as-is;
//! versioning and cache invalidation are left to whoever owns the path.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{MediaError, MediaResult};

/// BlazePose landmark model (256x256, ONNX) from the OpenCV model zoo.
pub const DEFAULT_MODEL_URL: &str = "https://github.com/opencv/opencv_zoo/raw/main/models/pose_estimation_mediapipe/pose_estimation_mediapipe_2023mar.onnx";

/// Default local path for the downloaded model.
pub const DEFAULT_MODEL_PATH: &str = "models/pose_estimation_mediapipe_2023mar.onnx";

/// Where the model lives and where to fetch it from when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Local model file
    pub path: PathBuf,
    /// Download source used when `path` does not exist
    pub url: String,
    /// Timeout for the whole download
    pub download_timeout: Duration,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_MODEL_PATH),
            url: DEFAULT_MODEL_URL.to_string(),
            download_timeout: Duration::from_secs(300),
        }
    }
}

/// Make sure the model file exists locally, downloading it if needed.
///
/// The download is written next to the target and renamed into place, so an
/// interrupted transfer never leaves a truncated model at `config.path`.
pub async fn ensure_model(config: &ModelConfig) -> MediaResult<PathBuf> {
    if tokio::fs::try_exists(&config.path).await? {
        return Ok(config.path.clone());
    }

    info!(
        url = %config.url,
        path = %config.path.display(),
        "Pose model not found, downloading"
    );

    if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let client = reqwest::Client::builder()
        .timeout(config.download_timeout)
        .build()
        .map_err(|e| MediaError::download_failed(format!("HTTP client: {e}")))?;

    let response = client
        .get(&config.url)
        .send()
        .await
        .map_err(|e| MediaError::download_failed(format!("Request to {} failed: {e}", config.url)))?
        .error_for_status()
        .map_err(|e| MediaError::download_failed(e.to_string()))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| MediaError::download_failed(format!("Reading response body: {e}")))?;
    if bytes.is_empty() {
        return Err(MediaError::download_failed("Server returned an empty model file"));
    }

    let partial = config.path.with_extension("part");
    tokio::fs::write(&partial, &bytes).await?;
    tokio::fs::rename(&partial, &config.path).await?;

    info!(
        path = %config.path.display(),
        size = bytes.len(),
        "Pose model downloaded"
    );
    Ok(config.path.clone())
}
