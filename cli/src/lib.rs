use fingers::{BoundingBox, DefectReport, FingerError, Pipeline};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Finger(#[from] FingerError),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// What the input image holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// A colour photo; the hand is found by HSV thresholding
    Frame,
    /// A ready-made binary mask; non-zero pixels are hand
    Mask,
}

/// Summary of one processed image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountReport {
    pub input: String,
    pub finger_count: u32,
    pub hand_found: bool,
    pub bounding_box: Option<BoundingBox>,
    pub defects: Vec<DefectReport>,
}

impl CountReport {
    /// Human readable one-liner
    pub fn summary(&self) -> String {
        if self.hand_found {
            format!("{}: {} finger(s) detected", self.input, self.finger_count)
        } else {
            format!("{}: no hand found", self.input)
        }
    }

    pub fn to_json(&self) -> Result<String, CliError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Where to put the by-products of a run
#[derive(Debug, Clone, Copy, Default)]
pub struct Outputs<'a> {
    pub annotated: Option<&'a Path>,
    pub mask: Option<&'a Path>,
}

/// Load `input`, count fingers and write any requested images.
pub fn count_file(
    pipeline: &Pipeline,
    input: &Path,
    kind: InputKind,
    outputs: Outputs<'_>,
) -> Result<CountReport, CliError> {
    let image = image::open(input)?;
    let frame = image.to_rgb8();

    let annotated = match kind {
        InputKind::Frame => pipeline.process_frame(&frame)?,
        InputKind::Mask => pipeline.process_mask(&image.to_luma8(), &frame)?,
    };
    tracing::debug!(input = %input.display(), "{}", pipeline.info());

    if let Some(path) = outputs.annotated {
        annotated.image.save(path)?;
    }
    if let Some(path) = outputs.mask {
        annotated.mask.save(path)?;
    }

    let result = annotated.result;
    Ok(CountReport {
        input: input.display().to_string(),
        finger_count: result.finger_count,
        hand_found: result.hand_found(),
        bounding_box: result.bounding_box,
        defects: result.defects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn scratch(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("finger_cli_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn test_count_mask_file() {
        let mut mask = GrayImage::new(80, 80);
        for y in 20..60 {
            for x in 20..60 {
                mask.put_pixel(x, y, Luma([255u8]));
            }
        }
        let input = scratch("square_mask.png");
        mask.save(&input).unwrap();
        let annotated = scratch("square_annotated.png");

        let pipeline = Pipeline::builder().build();
        let report = count_file(
            &pipeline,
            &input,
            InputKind::Mask,
            Outputs { annotated: Some(&annotated), mask: None },
        )
        .unwrap();

        assert!(report.hand_found);
        assert_eq!(report.finger_count, 1);
        assert!(report.summary().ends_with("1 finger(s) detected"));
        assert!(annotated.exists());
        assert!(report.to_json().unwrap().contains("\"finger_count\": 1"));
    }

    #[test]
    fn test_empty_mask_reports_no_hand() {
        let input = scratch("empty_mask.png");
        GrayImage::new(32, 32).save(&input).unwrap();

        let pipeline = Pipeline::builder().build();
        let report = count_file(&pipeline, &input, InputKind::Mask, Outputs::default()).unwrap();
        assert!(!report.hand_found);
        assert_eq!(report.finger_count, 0);
        assert!(report.summary().ends_with("no hand found"));
    }

    #[test]
    fn test_missing_input() {
        let pipeline = Pipeline::builder().build();
        let err = count_file(&pipeline, Path::new("/nonexistent/hand.png"), InputKind::Frame, Outputs::default())
            .unwrap_err();
        assert!(matches!(err, CliError::Image(_)));
    }
}
