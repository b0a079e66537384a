//! OpenCV-backed video decoding.

use std::path::Path;

use image::RgbImage;
use opencv::core::Mat;
use opencv::imgproc;
use opencv::prelude::*;
use opencv::videoio::{
    VideoCapture, CAP_ANY, CAP_PROP_FPS, CAP_PROP_FRAME_COUNT, CAP_PROP_FRAME_HEIGHT,
    CAP_PROP_FRAME_WIDTH,
};
use swing_models::VideoMetadata;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};
use crate::sampler::FrameSource;

/// [`FrameSource`] reading a video file through OpenCV's `videoio`.
///
/// The capture handle is released when the source is dropped.
pub struct OpencvVideoSource {
    cap: VideoCapture,
    metadata: VideoMetadata,
    bgr: Mat,
}

impl OpencvVideoSource {
    /// Open a video file and read its container properties.
    pub fn open(path: impl AsRef<Path>) -> MediaResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MediaError::FileNotFound(path.to_path_buf()));
        }
        let path_str = path.to_string_lossy();

        let cap = VideoCapture::from_file(&path_str, CAP_ANY)
            .map_err(|e| MediaError::VideoOpen(format!("{path_str}: {e}")))?;
        if !cap.is_opened().unwrap_or(false) {
            return Err(MediaError::VideoOpen(path_str.to_string()));
        }

        let prop = |id: i32| cap.get(id).unwrap_or(0.0);
        let fps = prop(CAP_PROP_FPS);
        let total_frames = prop(CAP_PROP_FRAME_COUNT).max(0.0) as u64;
        let width = prop(CAP_PROP_FRAME_WIDTH).max(0.0) as u32;
        let height = prop(CAP_PROP_FRAME_HEIGHT).max(0.0) as u32;

        if !(fps.is_finite() && fps > 0.0) {
            return Err(MediaError::InvalidVideo(format!(
                "{path_str}: decoder reports frame rate {fps}"
            )));
        }
        if width == 0 || height == 0 {
            return Err(MediaError::InvalidVideo(format!(
                "{path_str}: decoder reports frame size {width}x{height}"
            )));
        }

        debug!(
            path = %path_str,
            fps,
            total_frames,
            width,
            height,
            "Opened video"
        );

        Ok(Self {
            cap,
            metadata: VideoMetadata {
                fps,
                total_frames,
                width,
                height,
            },
            bgr: Mat::default(),
        })
    }
}

impl FrameSource for OpencvVideoSource {
    fn metadata(&self) -> VideoMetadata {
        self.metadata
    }

    fn grab(&mut self) -> MediaResult<bool> {
        self.cap
            .grab()
            .map_err(|e| MediaError::decode_failed(format!("grab: {e}")))
    }

    fn retrieve(&mut self) -> MediaResult<Option<RgbImage>> {
        let ok = match self.cap.retrieve(&mut self.bgr, 0) {
            Ok(ok) => ok,
            Err(e) => {
                warn!("Failed to retrieve frame: {}", e);
                false
            }
        };
        if !ok || self.bgr.empty() {
            return Ok(None);
        }

        let mut rgb = Mat::default();
        imgproc::cvt_color_def(&self.bgr, &mut rgb, imgproc::COLOR_BGR2RGB)
            .map_err(|e| MediaError::decode_failed(format!("BGR2RGB failed: {e}")))?;

        let width = rgb.cols() as u32;
        let height = rgb.rows() as u32;
        let data = rgb
            .data_bytes()
            .map_err(|e| MediaError::decode_failed(format!("Failed to get frame data: {e}")))?;

        RgbImage::from_raw(width, height, data.to_vec())
            .map(Some)
            .ok_or_else(|| MediaError::decode_failed("frame buffer size mismatch"))
    }
}

#[cfg(all(test, feature = "opencv"))]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = OpencvVideoSource::open(dir.path().join("missing.mp4")).err().unwrap();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }

    #[test]
    fn test_open_garbage_file_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
        file.write_all(b"definitely not a video container").unwrap();
        file.flush().unwrap();

        let err = OpencvVideoSource::open(file.path()).err().unwrap();
        assert!(
            matches!(err, MediaError::VideoOpen(_) | MediaError::InvalidVideo(_)),
            "unexpected error: {err:?}"
        );
    }
}
