//! # Finger Counting Library
//!
//! Counts extended fingers in a binary hand mask using contour geometry:
//! the biggest external contour is hulled, its convexity defects are measured
//! and each defect is tested for being the valley between two fingers.
//!
//! ## Stages
//!
//! - **Extraction**: external contours of the mask, chain-compressed
//! - **Selection**: the contour with the largest enclosed area
//! - **Hull**: convex hull as indices into the contour
//! - **Defects**: deepest contour point between hull neighbours
//! - **Classification**: depth, leg length, angle and wrist tests, then the count
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fingers::Pipeline;
//!
//! let pipeline = Pipeline::builder().build();
//!
//! let frame = image::open("hand.png")?.to_rgb8();
//! let annotated = pipeline.process_frame(&frame)?;
//!
//! println!("{} finger(s)", annotated.result.finger_count);
//! annotated.image.save("hand_annotated.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## From a mask
//!
//! ```rust,no_run
//! use fingers::{FingerConfig, PipelineBuilder};
//!
//! let config = FingerConfig::from_file("fingers.toml")?;
//! let pipeline = PipelineBuilder::from_config(&config)?.build();
//!
//! let mask = image::open("mask.png")?.to_luma8();
//! let result = pipeline.analyze(&mask)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod types;
pub mod geometry;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod render;
pub mod config;

pub use error::{FingerError, Result};
pub use types::{BoundingBox, Contour, ContourSet, Defect, DefectReport, DrawCommand, FrameResult, Hull, Palette, Point, Rgb};
pub use traits::*;
pub use algorithms::*;
pub use pipeline::{Annotated, Pipeline, builder::PipelineBuilder};
pub use render::{annotate, draw};
pub use config::FingerConfig;
