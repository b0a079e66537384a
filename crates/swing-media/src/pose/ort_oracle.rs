//! ONNX Runtime pose oracle for the BlazePose landmark model.
//!
//! Model contract (BlazePose GHUM landmark, 256x256):
//! - input: `[1, S, S, 3]` float RGB in `[0, 1]`, NHWC
//! - landmarks output: `[1, 39 * 5]` as (x, y, z, visibility, presence) per
//!   point in canvas pixels; the first 33 points are the body topology and
//!   visibility is a logit
//! - presence output: `[1, 1]` pose score, already a probability
//!
//! In video mode the previous pose seeds a square ROI for the next frame and
//! the tracking threshold applies; when the tracked pose is lost the full
//! frame is searched again with the detection threshold.

use std::path::Path;
use std::time::Instant;

use image::RgbImage;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::{Tensor, Value};
use swing_models::{Landmark, Landmarks, POSE_LANDMARK_COUNT};
use tracing::{debug, info};

use super::roi::{CropRect, LetterboxMapping};
use super::{PoseConfig, PoseOracle};
use crate::error::{MediaError, MediaResult};

/// Values per landmark in the model output.
const LANDMARK_STRIDE: usize = 5;

/// A tracked pose needs at least this many visible landmarks to seed an ROI.
const MIN_TRACKED_LANDMARKS: usize = 4;

/// ONNX Runtime-backed [`PoseOracle`].
pub struct OrtPoseOracle {
    session: Session,
    config: PoseConfig,
    landmarks_output: String,
    presence_output: String,
    last_timestamp_ms: Option<u64>,
    tracked_roi: Option<CropRect>,
}

impl OrtPoseOracle {
    /// Load the landmark model from a local file.
    pub fn load(model_path: &Path, config: PoseConfig) -> MediaResult<Self> {
        config.validate()?;

        if !model_path.exists() {
            return Err(MediaError::ModelNotFound(model_path.to_path_buf()));
        }

        let mut builder = Session::builder()
            .map_err(|e| MediaError::inference_failed(format!("ORT session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| MediaError::inference_failed(format!("ORT opt level: {e}")))?;
        if config.intra_threads > 0 {
            builder = builder
                .with_intra_threads(config.intra_threads)
                .map_err(|e| MediaError::inference_failed(format!("ORT intra threads: {e}")))?;
        }
        let session = builder
            .commit_from_file(model_path)
            .map_err(|e| MediaError::inference_failed(format!("ORT load model: {e}")))?;

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        let landmarks_output =
            resolve_output(config.landmarks_output.as_deref(), &output_names, 0)?;
        let presence_output = resolve_output(config.presence_output.as_deref(), &output_names, 1)?;

        info!(
            model = %model_path.display(),
            mode = %config.running_mode,
            landmarks_output = %landmarks_output,
            presence_output = %presence_output,
            "Loaded pose landmark model"
        );

        Ok(Self {
            session,
            config,
            landmarks_output,
            presence_output,
            last_timestamp_ms: None,
            tracked_roi: None,
        })
    }

    /// Run the model on one region and decode the pose if it clears `threshold`.
    fn infer(
        &mut self,
        image: &RgbImage,
        crop: CropRect,
        threshold: f32,
    ) -> MediaResult<Option<Landmarks>> {
        let mapping = LetterboxMapping::compute(crop, self.config.input_size);
        let input = rgb_to_nhwc_tensor(&mapping.apply(image))?;

        let start = Instant::now();
        let (presence, raw_landmarks) = run_model(
            &mut self.session,
            input,
            &self.landmarks_output,
            &self.presence_output,
        )?;
        metrics::histogram!("swing_inference_ms").record(start.elapsed().as_secs_f64() * 1000.0);

        if presence < threshold {
            debug!(presence, threshold, "Pose score below threshold");
            return Ok(None);
        }

        let (width, height) = image.dimensions();
        decode_landmarks(&raw_landmarks, &mapping, width, height).map(Some)
    }

    fn update_tracking(&mut self, landmarks: Option<&Landmarks>, width: u32, height: u32) {
        if !self.config.running_mode.is_tracking() {
            return;
        }
        self.tracked_roi = landmarks.and_then(|l| {
            tracking_roi(
                l,
                width,
                height,
                self.config.min_landmark_visibility,
                self.config.roi_scale,
            )
        });
    }
}

impl PoseOracle for OrtPoseOracle {
    fn detect(&mut self, image: &RgbImage, timestamp_ms: u64) -> MediaResult<Option<Landmarks>> {
        if self.config.running_mode.is_tracking() {
            if let Some(previous) = self.last_timestamp_ms {
                if timestamp_ms <= previous {
                    return Err(MediaError::NonMonotonicTimestamp {
                        previous,
                        current: timestamp_ms,
                    });
                }
            }
            self.last_timestamp_ms = Some(timestamp_ms);
        }

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(MediaError::inference_failed("Empty frame provided"));
        }

        if let Some(roi) = self.tracked_roi.take() {
            let tracked = self.infer(image, roi, self.config.min_tracking_confidence)?;
            if tracked.is_some() {
                self.update_tracking(tracked.as_ref(), width, height);
                return Ok(tracked);
            }
            debug!(timestamp_ms, "Tracked pose lost, searching full frame");
        }

        let detected = self.infer(
            image,
            CropRect::full(width, height),
            self.config.min_detection_confidence,
        )?;
        self.update_tracking(detected.as_ref(), width, height);
        Ok(detected)
    }
}

/// Pick an output by configured name, or by position when unset.
fn resolve_output(configured: Option<&str>, available: &[String], position: usize) -> MediaResult<String> {
    match configured {
        Some(name) if available.iter().any(|n| n == name) => Ok(name.to_string()),
        Some(name) => Err(MediaError::inference_failed(format!(
            "Model has no output named {name:?} (available: {available:?})"
        ))),
        None => available.get(position).cloned().ok_or_else(|| {
            MediaError::inference_failed(format!(
                "Model has {} outputs, expected at least {}",
                available.len(),
                position + 1
            ))
        }),
    }
}

/// Convert an RGB canvas (HWC u8) to a `[1, H, W, 3]` tensor in `[0, 1]`.
fn rgb_to_nhwc_tensor(canvas: &RgbImage) -> MediaResult<Value> {
    let (w, h) = canvas.dimensions();
    let data: Vec<f32> = canvas.as_raw().iter().map(|&v| v as f32 / 255.0).collect();

    let shape = vec![1usize, h as usize, w as usize, 3];
    Tensor::from_array((shape, data.into_boxed_slice()))
        .map(Value::from)
        .map_err(|e| MediaError::inference_failed(format!("ORT tensor: {e}")))
}

/// Run one inference and copy out the presence score and raw landmark values.
fn run_model(
    session: &mut Session,
    input: Value,
    landmarks_output: &str,
    presence_output: &str,
) -> MediaResult<(f32, Vec<f32>)> {
    let outputs = session
        .run(ort::inputs![input])
        .map_err(|e| MediaError::inference_failed(format!("ORT run failed: {e}")))?;

    let presence = outputs
        .get(presence_output)
        .ok_or_else(|| MediaError::inference_failed("ORT returned no presence output"))?
        .try_extract_tensor::<f32>()
        .map_err(|e| MediaError::inference_failed(format!("ORT extract presence: {e}")))?
        .1
        .first()
        .copied()
        .ok_or_else(|| MediaError::inference_failed("Empty presence output"))?;

    let (_, landmarks) = outputs
        .get(landmarks_output)
        .ok_or_else(|| MediaError::inference_failed("ORT returned no landmark output"))?
        .try_extract_tensor::<f32>()
        .map_err(|e| MediaError::inference_failed(format!("ORT extract landmarks: {e}")))?;

    Ok((presence, landmarks.to_vec()))
}

fn sigmoid(x: f32) -> f64 {
    1.0 / (1.0 + (-(x as f64)).exp())
}

/// Map raw canvas-space landmarks to normalized full-frame coordinates.
fn decode_landmarks(
    raw: &[f32],
    mapping: &LetterboxMapping,
    frame_width: u32,
    frame_height: u32,
) -> MediaResult<Landmarks> {
    if raw.len() < POSE_LANDMARK_COUNT * LANDMARK_STRIDE {
        return Err(MediaError::inference_failed(format!(
            "Landmark output has {} values, expected at least {}",
            raw.len(),
            POSE_LANDMARK_COUNT * LANDMARK_STRIDE
        )));
    }

    let points = raw
        .chunks_exact(LANDMARK_STRIDE)
        .take(POSE_LANDMARK_COUNT)
        .map(|v| {
            let (x, y) = mapping.to_frame(v[0] as f64, v[1] as f64);
            Landmark::new(
                x / frame_width as f64,
                y / frame_height as f64,
                sigmoid(v[3]),
            )
        })
        .collect();

    Landmarks::new(points).map_err(|e| MediaError::inference_failed(e.to_string()))
}

/// Square ROI around the visible landmarks of a pose, in frame pixels.
fn tracking_roi(
    landmarks: &Landmarks,
    frame_width: u32,
    frame_height: u32,
    min_visibility: f64,
    roi_scale: f64,
) -> Option<CropRect> {
    let visible: Vec<(f64, f64)> = landmarks
        .iter()
        .filter(|l| l.visibility >= min_visibility)
        .map(|l| (l.x * frame_width as f64, l.y * frame_height as f64))
        .collect();
    if visible.len() < MIN_TRACKED_LANDMARKS {
        return None;
    }

    let (min_x, min_y, max_x, max_y) = visible.iter().fold(
        (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
        |(x0, y0, x1, y1), &(x, y)| (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
    );
    let side = (max_x - min_x).max(max_y - min_y) * roi_scale;

    CropRect::square_around(
        (min_x + max_x) / 2.0,
        (min_y + max_y) / 2.0,
        side,
        frame_width,
        frame_height,
    )
}
