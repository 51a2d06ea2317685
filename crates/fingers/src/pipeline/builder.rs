use crate::{
    error::Result,
    algorithms::{HsvSegmenter, ImageprocContourExtractor, Thresholds, ThresholdSegmenter},
    config::FingerConfig,
    pipeline::Pipeline,
    traits::{ContourExtractor, MaskSegmenter},
    types::Palette,
};

/// Builder for creating pipelines with a fluent API
pub struct PipelineBuilder {
    segmenter: Option<Box<dyn MaskSegmenter>>,
    contour_extractor: Option<Box<dyn ContourExtractor>>,
    thresholds: Thresholds,
    palette: Palette,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            segmenter: None,
            contour_extractor: None,
            thresholds: Thresholds::default(),
            palette: Palette::default(),
        }
    }

    /// Builder preloaded with the segmenter, thresholds and palette of `config`.
    /// Fails if the config does not validate.
    pub fn from_config(config: &FingerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new()
            .set_segmenter(config.segmenter())
            .with_thresholds(config.thresholds)?
            .with_palette(config.palette))
    }

    /// Set the mask segmenter (replaces any existing one)
    pub fn set_segmenter<S>(mut self, segmenter: S) -> Self
    where
        S: MaskSegmenter + 'static,
    {
        self.segmenter = Some(Box::new(segmenter));
        self
    }

    /// Treat incoming frames as ready-made masks, thresholded on luma
    pub fn with_luma_threshold(self, threshold: u8) -> Self {
        self.set_segmenter(ThresholdSegmenter { threshold })
    }

    /// Set the contour extractor (replaces any existing one)
    pub fn set_contour_extractor<E>(mut self, extractor: E) -> Self
    where
        E: ContourExtractor + 'static,
    {
        self.contour_extractor = Some(Box::new(extractor));
        self
    }

    /// Set the finger-valley limits; invalid limits are refused.
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Result<Self> {
        thresholds.validate()?;
        self.thresholds = thresholds;
        Ok(self)
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Build the pipeline with default components if not specified
    pub fn build(self) -> Pipeline {
        let segmenter = self.segmenter
            .unwrap_or_else(|| Box::new(HsvSegmenter::default()));

        let contour_extractor = self.contour_extractor
            .unwrap_or_else(|| Box::new(ImageprocContourExtractor));

        Pipeline::new(segmenter, contour_extractor, self.thresholds, self.palette)
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
