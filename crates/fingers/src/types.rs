use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use geo_types::{Coord, LineString, Polygon};

use crate::geometry::distance;

/// A position in pixel space. Contour points always sit on pixel centres,
/// but every downstream computation is done in `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<Point> for Coord<f64> {
    fn from(p: Point) -> Self {
        Coord { x: p.x, y: p.y }
    }
}

impl From<imageproc::point::Point<i32>> for Point {
    fn from(p: imageproc::point::Point<i32>) -> Self {
        Self::new(p.x as f64, p.y as f64)
    }
}

/// Axis-aligned rectangle in whole pixels. Extents are inclusive, so a single
/// pixel has width and height 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    /// Smallest box enclosing every point, `None` for an empty slice.
    pub fn of(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.x, first.y);

        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let (x, y) = (min_x.floor() as i32, min_y.floor() as i32);
        Some(Self {
            x,
            y,
            width: max_x.floor() as i32 - x + 1,
            height: max_y.floor() as i32 - y + 1,
        })
    }

    /// One past the last covered row.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// Closed boundary polyline of one mask region. The closing edge from the last
/// point back to the first is implicit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Convert to a geo-types polygon for area computations
    pub fn to_geo_polygon(&self) -> Polygon<f64> {
        let coords: Vec<Coord<f64>> = self.points.iter().copied().map(Coord::from).collect();
        Polygon::new(LineString::new(coords), vec![])
    }

    /// Shoelace area; its sign encodes the traversal direction.
    pub fn signed_area(&self) -> f64 {
        use geo::Area;
        if self.points.len() < 3 {
            return 0.0;
        }
        self.to_geo_polygon().signed_area()
    }

    /// Enclosed polygon area (not pixel count)
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::of(&self.points)
    }

    /// Length of the closed boundary
    pub fn perimeter(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        let closing = distance(self.points[self.points.len() - 1], self.points[0]);
        self.points
            .windows(2)
            .map(|w| distance(w[0], w[1]))
            .sum::<f64>()
            + closing
    }
}

/// External contours of one mask in extraction order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContourSet {
    pub contours: Vec<Contour>,
    /// Parallel to `contours`: whether the region encloses at least one hole.
    pub has_children: Vec<bool>,
}

impl ContourSet {
    pub fn len(&self) -> usize {
        self.contours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Contour> {
        self.contours.iter()
    }
}

/// Indices into one contour's points, in the contour's traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hull {
    pub indices: Vec<usize>,
}

impl Hull {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Resolve the hull indices against the contour they were built from.
    pub fn points(&self, contour: &Contour) -> Vec<Point> {
        self.indices.iter().map(|&i| contour.points[i]).collect()
    }
}

/// A concavity between two hull-adjacent contour points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Defect {
    pub start: usize,
    pub end: usize,
    pub far: usize,
    /// Distance in pixels from the start-end chord to the far point.
    pub depth: f64,
}

impl Defect {
    /// Depth in 8.8 fixed point, the convention OpenCV-style defect buffers use.
    pub fn fixed_point_depth(&self) -> i32 {
        (self.depth * 256.0).round() as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const RED: Rgb = Rgb([255, 0, 0]);
    pub const GREEN: Rgb = Rgb([0, 255, 0]);
    pub const BLUE: Rgb = Rgb([0, 0, 255]);
    pub const YELLOW: Rgb = Rgb([255, 255, 0]);
    pub const WHITE: Rgb = Rgb([255, 255, 255]);
}

impl From<Rgb> for image::Rgb<u8> {
    fn from(c: Rgb) -> Self {
        image::Rgb(c.0)
    }
}

/// Colours used for annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Palette {
    pub selected_contour: Rgb,
    pub finger: Rgb,
    pub rejected: Rgb,
    pub hull: Rgb,
    pub other_contour: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            selected_contour: Rgb::RED,
            finger: Rgb::WHITE,
            rejected: Rgb::BLUE,
            hull: Rgb::YELLOW,
            other_contour: Rgb::GREEN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Line {
        from: Point,
        to: Point,
        color: Rgb,
        thickness: u32,
    },
    Circle {
        center: Point,
        radius: u32,
        color: Rgb,
        thickness: u32,
    },
    /// Closed outline through all points
    Polyline {
        points: Vec<Point>,
        color: Rgb,
        thickness: u32,
    },
}

/// Measurements of one classified defect, kept for logging and reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectReport {
    pub defect: Defect,
    pub start: Point,
    pub end: Point,
    pub far: Point,
    pub start_to_far: f64,
    pub end_to_far: f64,
    pub angle_deg: f64,
    pub verdict: crate::algorithms::Verdict,
}

/// Per-frame output of the analysis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameResult {
    /// 0 when no hand was found, otherwise between 1 and the configured cap.
    pub finger_count: u32,
    /// Index of the analysed contour in the extracted set.
    pub selected: Option<usize>,
    pub bounding_box: Option<BoundingBox>,
    pub defects: Vec<DefectReport>,
    pub draw_commands: Vec<DrawCommand>,
}

impl FrameResult {
    /// Result for a mask without any foreground region.
    pub fn no_hand() -> Self {
        Self::default()
    }

    pub fn hand_found(&self) -> bool {
        self.selected.is_some()
    }
}
