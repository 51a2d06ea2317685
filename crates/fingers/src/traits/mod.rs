use image::{GrayImage, RgbImage};
use crate::{error::Result, types::ContourSet};

/// Trait for turning a colour frame into a binary hand mask
pub trait MaskSegmenter: Send + Sync {
    /// Produce a mask the size of `frame`; non-zero pixels are hand.
    fn segment(&self, frame: &RgbImage) -> Result<GrayImage>;
}

/// Trait for contour extraction algorithms
pub trait ContourExtractor: Send + Sync {
    /// Extract the external contours of a binary mask
    fn extract_contours(&self, mask: &GrayImage) -> Result<ContourSet>;
}
