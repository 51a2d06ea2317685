pub mod segmentation;
pub mod extraction;
pub mod selection;
pub mod hull;
pub mod defects;
pub mod classification;

pub use segmentation::*;
pub use extraction::*;
pub use selection::*;
pub use hull::*;
pub use defects::*;
pub use classification::*;
