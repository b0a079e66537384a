//! Evenly spaced frame sampling.
//!
//! Every frame is advanced through the decoder, but only every `stride`-th
//! frame is converted to RGB and handed on for pose inference.

use image::RgbImage;
use swing_models::VideoMetadata;
use tracing::warn;

use crate::error::MediaResult;

/// Default number of frames to sample across a video.
pub const DEFAULT_TARGET_SAMPLES: u64 = 60;

/// A sequential source of decoded video frames.
pub trait FrameSource {
    /// Container-level facts reported by the decoder.
    fn metadata(&self) -> VideoMetadata;

    /// Advance past the next frame without converting it.
    ///
    /// Returns `false` at end of stream.
    fn grab(&mut self) -> MediaResult<bool>;

    /// Convert the most recently grabbed frame to RGB.
    ///
    /// Returns `None` when the decoder produced no usable frame.
    fn retrieve(&mut self) -> MediaResult<Option<RgbImage>>;
}

/// Sampling stride that yields roughly `target_samples` frames.
pub fn sample_stride(total_frames: u64, target_samples: u64) -> u64 {
    (total_frames / target_samples.max(1)).max(1)
}

/// One frame selected for pose inference.
#[derive(Debug, Clone)]
pub struct SampledFrame {
    pub frame_index: u64,
    pub timestamp_ms: u64,
    pub image: RgbImage,
}

/// Iterates the sampled frames of a [`FrameSource`].
pub struct FrameSampler<'a, S: FrameSource + ?Sized> {
    source: &'a mut S,
    metadata: VideoMetadata,
    stride: u64,
    next_index: u64,
    finished: bool,
}

impl<'a, S: FrameSource + ?Sized> FrameSampler<'a, S> {
    pub fn new(source: &'a mut S, target_samples: u64) -> Self {
        let metadata = source.metadata();
        let stride = sample_stride(metadata.total_frames, target_samples);
        Self {
            source,
            metadata,
            stride,
            next_index: 0,
            finished: false,
        }
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }

    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Decode up to the next sampled frame.
    ///
    /// Returns `None` once the stream is exhausted. A frame the decoder
    /// cannot deliver ends the stream; frames sampled before it are kept.
    pub fn next_sample(&mut self) -> MediaResult<Option<SampledFrame>> {
        if self.finished {
            return Ok(None);
        }
        loop {
            if !self.source.grab()? {
                self.finished = true;
                return Ok(None);
            }
            let frame_index = self.next_index;
            self.next_index += 1;

            if frame_index % self.stride != 0 {
                continue;
            }

            let Some(image) = self.source.retrieve()? else {
                warn!(
                    frame = frame_index,
                    total_frames = self.metadata.total_frames,
                    "Decoder returned no frame, treating as end of stream"
                );
                self.finished = true;
                return Ok(None);
            };
            return Ok(Some(SampledFrame {
                frame_index,
                timestamp_ms: self.metadata.timestamp_ms(frame_index),
                image,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingSource {
        remaining: u64,
        grabbed: u64,
        retrieved: u64,
        fail_at: Option<u64>,
        meta: VideoMetadata,
    }

    impl CountingSource {
        fn new(total_frames: u64) -> Self {
            Self {
                remaining: total_frames,
                grabbed: 0,
                retrieved: 0,
                fail_at: None,
                meta: VideoMetadata {
                    fps: 30.0,
                    total_frames,
                    width: 4,
                    height: 2,
                },
            }
        }
    }

    impl FrameSource for CountingSource {
        fn metadata(&self) -> VideoMetadata {
            self.meta
        }

        fn grab(&mut self) -> MediaResult<bool> {
            if self.remaining == 0 {
                return Ok(false);
            }
            self.remaining -= 1;
            self.grabbed += 1;
            Ok(true)
        }

        fn retrieve(&mut self) -> MediaResult<Option<RgbImage>> {
            // `grabbed` is one past the current frame index
            if self.fail_at == Some(self.grabbed - 1) {
                return Ok(None);
            }
            self.retrieved += 1;
            Ok(Some(RgbImage::new(4, 2)))
        }
    }

    #[test]
    fn test_sample_stride() {
        assert_eq!(sample_stride(0, 60), 1);
        assert_eq!(sample_stride(59, 60), 1);
        assert_eq!(sample_stride(120, 60), 2);
        assert_eq!(sample_stride(300, 60), 5);
        assert_eq!(sample_stride(359, 60), 5);
        assert_eq!(sample_stride(100, 0), 100);
    }

    #[test]
    fn test_samples_every_stride() {
        let mut source = CountingSource::new(300);
        let mut sampler = FrameSampler::new(&mut source, 60);
        assert_eq!(sampler.stride(), 5);

        let mut indices = Vec::new();
        while let Some(frame) = sampler.next_sample().unwrap() {
            indices.push((frame.frame_index, frame.timestamp_ms));
        }

        assert_eq!(indices.len(), 60);
        assert_eq!(indices[0], (0, 0));
        assert_eq!(indices[1], (5, 166));
        assert_eq!(indices[59], (295, 9833));
        assert_eq!(source.grabbed, 300);
        assert_eq!(source.retrieved, 60);
    }

    #[test]
    fn test_short_video_samples_all() {
        let mut source = CountingSource::new(10);
        let mut sampler = FrameSampler::new(&mut source, 60);

        let mut count = 0;
        while sampler.next_sample().unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 10);
    }

    #[test]
    fn test_failed_retrieve_ends_stream_keeping_earlier_frames() {
        let mut source = CountingSource::new(40);
        source.fail_at = Some(37);
        let mut sampler = FrameSampler::new(&mut source, 60);

        let mut indices = Vec::new();
        while let Some(frame) = sampler.next_sample().unwrap() {
            indices.push(frame.frame_index);
        }
        assert!(sampler.next_sample().unwrap().is_none());

        assert_eq!(indices, (0..37).collect::<Vec<_>>());
        assert_eq!(source.grabbed, 38);
        assert_eq!(source.retrieved, 37);
    }
}
