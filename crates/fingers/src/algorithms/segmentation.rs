use image::{GrayImage, Luma, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use crate::{
    error::{FingerError, Result},
    traits::MaskSegmenter,
};

/// Inclusive HSV box. Hue is in half degrees (0-180), saturation and value
/// in 0-255, matching the usual 8-bit HSV layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl Default for HsvRange {
    fn default() -> Self {
        Self {
            lower: [0, 40, 60],
            upper: [25, 255, 255],
        }
    }
}

impl HsvRange {
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| self.lower[c] <= hsv[c] && hsv[c] <= self.upper[c])
    }
}

/// 8-bit RGB to HSV with hue halved into 0-180.
pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> [u8; 3] {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = max - min;

    let s = if max > 0.0 { diff / max * 255.0 } else { 0.0 };
    let mut h = if diff == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / diff
    } else if max == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }

    [
        ((h / 2.0).round() as u8).min(180),
        s.round() as u8,
        max as u8,
    ]
}

/// Smoothing applied to a frame before it is thresholded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Smoothing {
    None,
    /// Gaussian blur with the given sigma
    Gaussian { sigma: f32 },
    /// Mean over a `size` x `size` window (odd), edges replicated
    Box { size: u32 },
}

impl Default for Smoothing {
    fn default() -> Self {
        Smoothing::Box { size: 7 }
    }
}

impl Smoothing {
    pub fn validate(&self) -> Result<()> {
        match *self {
            Smoothing::Gaussian { sigma } if !(sigma >= 0.0) => Err(FingerError::InvalidConfig(
                "smoothing.sigma must be >= 0".into(),
            )),
            Smoothing::Box { size } if size % 2 == 0 => Err(FingerError::InvalidConfig(
                "smoothing.size must be odd".into(),
            )),
            _ => Ok(()),
        }
    }

    /// Smoothed copy of `frame`, or `None` when this is a no-op
    pub fn apply(&self, frame: &RgbImage) -> Option<RgbImage> {
        match *self {
            Smoothing::Gaussian { sigma } if sigma > 0.0 => Some(image::imageops::blur(frame, sigma)),
            Smoothing::Box { size } if size > 1 && frame.width() > 0 && frame.height() > 0 => {
                Some(box_blur(frame, size / 2))
            }
            _ => None,
        }
    }
}

/// Per-channel box filter; imageproc only filters single channel images.
fn box_blur(frame: &RgbImage, radius: u32) -> RgbImage {
    let (width, height) = frame.dimensions();
    let planes: Vec<GrayImage> = (0..3)
        .map(|c| {
            let plane = GrayImage::from_fn(width, height, |x, y| Luma([frame.get_pixel(x, y)[c]]));
            imageproc::filter::box_filter(&plane, radius, radius)
        })
        .collect();
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            planes[0].get_pixel(x, y)[0],
            planes[1].get_pixel(x, y)[0],
            planes[2].get_pixel(x, y)[0],
        ])
    })
}

/// Smooth, convert to HSV and keep the pixels inside `range`
#[derive(Debug, Clone, Default)]
pub struct HsvSegmenter {
    pub range: HsvRange,
    pub smoothing: Smoothing,
}

impl MaskSegmenter for HsvSegmenter {
    fn segment(&self, frame: &RgbImage) -> Result<GrayImage> {
        let smoothed = self.smoothing.apply(frame);
        let source = smoothed.as_ref().unwrap_or(frame);

        let mut mask = GrayImage::new(frame.width(), frame.height());
        for (x, y, pixel) in source.enumerate_pixels() {
            if self.range.contains(rgb_to_hsv(pixel.0)) {
                mask.put_pixel(x, y, Luma([255u8]));
            }
        }
        Ok(mask)
    }
}

/// Luma threshold for frames that already are masks
#[derive(Debug, Clone)]
pub struct ThresholdSegmenter {
    pub threshold: u8,
}

impl Default for ThresholdSegmenter {
    fn default() -> Self {
        Self { threshold: 128 }
    }
}

impl MaskSegmenter for ThresholdSegmenter {
    fn segment(&self, frame: &RgbImage) -> Result<GrayImage> {
        let luma = image::imageops::grayscale(frame);
        Ok(imageproc::contrast::threshold(&luma, self.threshold))
    }
}
