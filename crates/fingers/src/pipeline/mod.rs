pub mod builder;

use image::{GrayImage, RgbImage};
use crate::{
    algorithms::{count_fingers, Thresholds},
    error::{FingerError, Result},
    render::annotate,
    traits::{ContourExtractor, MaskSegmenter},
    types::{FrameResult, Palette},
};

/// Output of one processed frame
#[derive(Debug, Clone)]
pub struct Annotated {
    pub image: RgbImage,
    pub mask: GrayImage,
    pub result: FrameResult,
}

/// Frame-to-count pipeline. Holds configuration only; every call works on
/// fresh inputs and keeps nothing between frames.
pub struct Pipeline {
    segmenter: Box<dyn MaskSegmenter>,
    contour_extractor: Box<dyn ContourExtractor>,
    thresholds: Thresholds,
    palette: Palette,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    /// Create a new pipeline with the given components
    pub fn new(
        segmenter: Box<dyn MaskSegmenter>,
        contour_extractor: Box<dyn ContourExtractor>,
        thresholds: Thresholds,
        palette: Palette,
    ) -> Self {
        Self {
            segmenter,
            contour_extractor,
            thresholds,
            palette,
        }
    }

    /// Count fingers in a binary mask without drawing anything
    pub fn analyze(&self, mask: &GrayImage) -> Result<FrameResult> {
        let contours = self.contour_extractor.extract_contours(mask)?;
        let result = count_fingers(&contours, &self.thresholds, &self.palette);
        tracing::debug!(
            contours = contours.len(),
            selected = ?result.selected,
            fingers = result.finger_count,
            "analyzed mask"
        );
        Ok(result)
    }

    /// Analyse `mask` and draw the result onto a copy of `frame`.
    /// Both must have the same dimensions.
    pub fn process_mask(&self, mask: &GrayImage, frame: &RgbImage) -> Result<Annotated> {
        if mask.dimensions() != frame.dimensions() {
            return Err(FingerError::DimensionMismatch {
                mask_width: mask.width(),
                mask_height: mask.height(),
                frame_width: frame.width(),
                frame_height: frame.height(),
            });
        }

        let result = self.analyze(mask)?;
        Ok(Annotated {
            image: annotate(frame, &result),
            mask: mask.clone(),
            result,
        })
    }

    /// Segment the frame into a mask first, then process it
    pub fn process_frame(&self, frame: &RgbImage) -> Result<Annotated> {
        let mask = self.segmenter.segment(frame)?;
        self.process_mask(&mask, frame)
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!(
            "Pipeline: min depth {}, span 1/{}, angle < {} deg, wrist {}%, cap {}",
            self.thresholds.min_depth,
            self.thresholds.span_divisor,
            self.thresholds.max_angle_deg,
            self.thresholds.wrist_fraction * 100.0,
            self.thresholds.max_fingers
        )
    }
}
