//! Region-of-interest cropping and letterbox mapping for pose inference.
//!
//! The landmark model takes a fixed square canvas. A region of the frame
//! (the whole frame, or a square around the previously tracked pose) is
//! scaled to fit the canvas with aspect ratio preserved and centered
//! black padding. [`LetterboxMapping`] records the transform so landmarks
//! can be mapped back to the full frame.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

/// Regions smaller than this (in pixels) are not worth running the model on.
const MIN_ROI_SIZE: u32 = 8;

/// Axis-aligned pixel rectangle inside a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// The whole frame.
    pub fn full(frame_width: u32, frame_height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width: frame_width,
            height: frame_height,
        }
    }

    /// Square of side `side` centered on `(cx, cy)`, clamped to the frame.
    ///
    /// Returns `None` if the clamped region is degenerate.
    pub fn square_around(
        cx: f64,
        cy: f64,
        side: f64,
        frame_width: u32,
        frame_height: u32,
    ) -> Option<Self> {
        let half = side / 2.0;
        let x0 = (cx - half).max(0.0);
        let y0 = (cy - half).max(0.0);
        let x1 = (cx + half).min(frame_width as f64);
        let y1 = (cy + half).min(frame_height as f64);

        if x1 - x0 < MIN_ROI_SIZE as f64 || y1 - y0 < MIN_ROI_SIZE as f64 {
            return None;
        }

        let x = x0.round() as u32;
        let y = y0.round() as u32;
        Some(Self {
            x,
            y,
            width: (x1.round() as u32).saturating_sub(x).min(frame_width - x),
            height: (y1.round() as u32).saturating_sub(y).min(frame_height - y),
        })
    }
}

/// Transform between a frame region and the square model canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxMapping {
    /// Region of the frame that was scaled onto the canvas
    pub crop: CropRect,
    /// Side of the square canvas in pixels
    pub input_size: u32,
    /// Scale applied to the region (canvas px per frame px)
    pub scale: f64,
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub pad_left: u32,
    pub pad_top: u32,
}

impl LetterboxMapping {
    pub fn compute(crop: CropRect, input_size: u32) -> Self {
        let scale = (input_size as f64 / crop.width.max(1) as f64)
            .min(input_size as f64 / crop.height.max(1) as f64);

        let scaled_width = ((crop.width as f64 * scale).round() as u32).clamp(1, input_size);
        let scaled_height = ((crop.height as f64 * scale).round() as u32).clamp(1, input_size);

        Self {
            crop,
            input_size,
            scale,
            scaled_width,
            scaled_height,
            pad_left: (input_size - scaled_width) / 2,
            pad_top: (input_size - scaled_height) / 2,
        }
    }

    /// Map a canvas point back to frame pixel coordinates.
    pub fn to_frame(&self, x_canvas: f64, y_canvas: f64) -> (f64, f64) {
        (
            (x_canvas - self.pad_left as f64) / self.scale + self.crop.x as f64,
            (y_canvas - self.pad_top as f64) / self.scale + self.crop.y as f64,
        )
    }

    /// Produce the padded model input for this mapping.
    pub fn apply(&self, frame: &RgbImage) -> RgbImage {
        let region = imageops::crop_imm(
            frame,
            self.crop.x,
            self.crop.y,
            self.crop.width,
            self.crop.height,
        )
        .to_image();
        let scaled = imageops::resize(
            &region,
            self.scaled_width,
            self.scaled_height,
            FilterType::Triangle,
        );

        let mut canvas = RgbImage::from_pixel(self.input_size, self.input_size, Rgb([0, 0, 0]));
        imageops::overlay(
            &mut canvas,
            &scaled,
            self.pad_left as i64,
            self.pad_top as i64,
        );
        canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_letterbox() {
        let mapping = LetterboxMapping::compute(CropRect::full(1920, 1080), 256);

        assert_eq!(mapping.scaled_width, 256);
        assert_eq!(mapping.scaled_height, 144);
        assert_eq!(mapping.pad_left, 0);
        assert_eq!(mapping.pad_top, 56);
    }

    #[test]
    fn test_round_trip_center() {
        let mapping = LetterboxMapping::compute(CropRect::full(1920, 1080), 256);
        let (x, y) = mapping.to_frame(128.0, 128.0);

        assert!((x - 960.0).abs() < 1e-6);
        assert!((y - 540.0).abs() < 1e-6);
    }

    #[test]
    fn test_crop_offset_mapping() {
        let crop = CropRect {
            x: 100,
            y: 50,
            width: 400,
            height: 400,
        };
        let mapping = LetterboxMapping::compute(crop, 256);
        let (x, y) = mapping.to_frame(0.0, 256.0);

        assert!((x - 100.0).abs() < 1e-6);
        assert!((y - 450.0).abs() < 1e-6);
    }

    #[test]
    fn test_apply_pads_with_black() {
        let frame = RgbImage::from_pixel(200, 100, Rgb([255, 255, 255]));
        let mapping = LetterboxMapping::compute(CropRect::full(200, 100), 64);
        let canvas = mapping.apply(&frame);

        assert_eq!(canvas.dimensions(), (64, 64));
        assert_eq!(canvas.get_pixel(32, 0), &Rgb([0, 0, 0]));
        assert_eq!(canvas.get_pixel(32, 32), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_square_around_clamps() {
        let rect = CropRect::square_around(10.0, 10.0, 100.0, 640, 480).unwrap();
        assert_eq!(rect.x, 0);
        assert_eq!(rect.y, 0);
        assert_eq!(rect.width, 60);
        assert_eq!(rect.height, 60);

        let inside = CropRect::square_around(320.0, 240.0, 100.0, 640, 480).unwrap();
        assert_eq!(inside, CropRect { x: 270, y: 190, width: 100, height: 100 });
    }

    #[test]
    fn test_square_around_rejects_tiny() {
        assert!(CropRect::square_around(5.0, 5.0, 4.0, 640, 480).is_none());
        assert!(CropRect::square_around(-500.0, 10.0, 100.0, 640, 480).is_none());
    }
}
