use image::{GrayImage, Luma};
use imageproc::contours::BorderType;
use crate::{
    error::Result,
    traits::ContourExtractor,
    types::{Contour, ContourSet, Point},
};

/// Imageproc-based contour extractor returning external boundaries only
#[derive(Debug, Clone, Default)]
pub struct ImageprocContourExtractor;

impl ContourExtractor for ImageprocContourExtractor {
    fn extract_contours(&self, mask: &GrayImage) -> Result<ContourSet> {
        Ok(extract_contours(mask))
    }
}

/// Trace the outer boundary of every top-level region of `mask`. Any non-zero
/// pixel is foreground. Holes are not returned, but each contour records
/// whether it encloses one.
pub fn extract_contours(mask: &GrayImage) -> ContourSet {
    let traced = imageproc::contours::find_contours::<i32>(mask);

    let mut set = ContourSet::default();
    for (i, contour) in traced.iter().enumerate() {
        if contour.border_type != BorderType::Outer || contour.parent.is_some() {
            continue;
        }
        let has_children = traced.iter().any(|c| c.parent == Some(i));
        set.contours.push(Contour::new(compress_chain(&contour.points)));
        set.has_children.push(has_children);
    }

    tracing::trace!(
        traced = traced.len(),
        external = set.len(),
        "extracted contours"
    );
    set
}

/// Keep only the points where the boundary changes direction, so straight
/// horizontal, vertical and diagonal runs shrink to their two ends.
pub fn compress_chain(points: &[imageproc::point::Point<i32>]) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.iter().copied().map(Point::from).collect();
    }

    let step = |from: usize, to: usize| {
        let (a, b) = (points[from], points[to]);
        ((b.x - a.x).signum(), (b.y - a.y).signum())
    };

    let kept: Vec<Point> = (0..n)
        .filter(|&i| {
            let prev = (i + n - 1) % n;
            let next = (i + 1) % n;
            step(prev, i) != step(i, next)
        })
        .map(|i| Point::from(points[i]))
        .collect();

    // A closed run with no turns cannot happen for a traced boundary, but keep
    // the input rather than return nothing.
    if kept.is_empty() {
        return points.iter().copied().map(Point::from).collect();
    }
    kept
}

/// Fill a contour back into a `width` x `height` mask, boundary included.
pub fn rasterize(contour: &Contour, width: u32, height: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    let on = Luma([255u8]);

    let mut polygon: Vec<imageproc::point::Point<i32>> = contour
        .points
        .iter()
        .map(|p| imageproc::point::Point::new(p.x.round() as i32, p.y.round() as i32))
        .collect();
    polygon.dedup();
    if polygon.len() > 1 && polygon.first() == polygon.last() {
        polygon.pop();
    }

    if polygon.len() < 3 {
        for p in polygon {
            if p.x >= 0 && p.y >= 0 && (p.x as u32) < width && (p.y as u32) < height {
                mask.put_pixel(p.x as u32, p.y as u32, on);
            }
        }
        if let [a, b] = contour.points.as_slice() {
            imageproc::drawing::draw_line_segment_mut(
                &mut mask,
                (a.x as f32, a.y as f32),
                (b.x as f32, b.y as f32),
                on,
            );
        }
        return mask;
    }

    imageproc::drawing::draw_polygon_mut(&mut mask, &polygon, on);
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_rect(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> GrayImage {
        let mut img = GrayImage::new(w, h);
        for y in y0..y1 {
            for x in x0..x1 {
                img.put_pixel(x, y, Luma([255u8]));
            }
        }
        img
    }

    fn filled_circle(w: u32, h: u32, cx: f64, cy: f64, r: f64) -> GrayImage {
        let mut img = GrayImage::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let (dx, dy) = (x as f64 - cx, y as f64 - cy);
                if dx * dx + dy * dy <= r * r {
                    img.put_pixel(x, y, Luma([255u8]));
                }
            }
        }
        img
    }

    fn pixel_difference(a: &GrayImage, b: &GrayImage) -> usize {
        a.pixels()
            .zip(b.pixels())
            .filter(|(p, q)| (p[0] > 0) != (q[0] > 0))
            .count()
    }

    #[test]
    fn test_empty_mask() {
        let mask = GrayImage::new(40, 30);
        let set = extract_contours(&mask);
        assert!(set.is_empty());
        assert!(set.has_children.is_empty());
    }

    #[test]
    fn test_mask_is_not_mutated() {
        let mask = filled_rect(50, 50, 10, 10, 30, 40);
        let before = mask.clone();
        let _ = extract_contours(&mask);
        assert_eq!(mask, before);
    }

    #[test]
    fn test_rectangle_compresses_to_corners() {
        let mask = filled_rect(50, 50, 10, 10, 30, 40);
        let set = extract_contours(&mask);
        assert_eq!(set.len(), 1);

        let contour = &set.contours[0];
        assert_eq!(contour.len(), 4, "got {:?}", contour.points);
        for corner in [(10.0, 10.0), (29.0, 10.0), (29.0, 39.0), (10.0, 39.0)] {
            assert!(contour.points.contains(&Point::new(corner.0, corner.1)));
        }
        assert_eq!(contour.area(), 19.0 * 29.0);
    }

    #[test]
    fn test_holes_are_not_returned() {
        let mut mask = filled_rect(60, 60, 5, 5, 55, 55);
        for y in 20..40 {
            for x in 20..40 {
                mask.put_pixel(x, y, Luma([0u8]));
            }
        }
        let set = extract_contours(&mask);
        assert_eq!(set.len(), 1);
        assert_eq!(set.has_children, vec![true]);
    }

    #[test]
    fn test_region_inside_hole_is_skipped() {
        let mut mask = filled_rect(80, 80, 5, 5, 75, 75);
        for y in 15..65 {
            for x in 15..65 {
                mask.put_pixel(x, y, Luma([0u8]));
            }
        }
        for y in 30..50 {
            for x in 30..50 {
                mask.put_pixel(x, y, Luma([255u8]));
            }
        }
        let set = extract_contours(&mask);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_disjoint_regions() {
        let mut mask = filled_rect(100, 50, 5, 5, 25, 25);
        for y in 10..40 {
            for x in 50..90 {
                mask.put_pixel(x, y, Luma([255u8]));
            }
        }
        let set = extract_contours(&mask);
        assert_eq!(set.len(), 2);
        assert_eq!(set.has_children, vec![false, false]);
    }

    #[test]
    fn test_single_pixel() {
        let mut mask = GrayImage::new(10, 10);
        mask.put_pixel(4, 6, Luma([255u8]));
        let set = extract_contours(&mask);
        assert_eq!(set.len(), 1);
        assert_eq!(set.contours[0].points, vec![Point::new(4.0, 6.0)]);
    }

    #[test]
    fn test_rectangle_round_trip_is_exact() {
        let mask = filled_rect(50, 50, 10, 10, 30, 40);
        let set = extract_contours(&mask);
        let redrawn = rasterize(&set.contours[0], 50, 50);
        assert_eq!(pixel_difference(&mask, &redrawn), 0);
    }

    #[test]
    fn test_circle_round_trip_is_close() {
        let mask = filled_circle(120, 120, 60.0, 60.0, 40.0);
        let set = extract_contours(&mask);
        assert_eq!(set.len(), 1);

        let contour = &set.contours[0];
        let redrawn = rasterize(contour, 120, 120);
        let diff = pixel_difference(&mask, &redrawn);
        // Compression only drops collinear boundary pixels, so any drift stays
        // within a fraction of the boundary length.
        assert!(
            (diff as f64) < contour.perimeter() * 0.5,
            "diff {diff} vs perimeter {}",
            contour.perimeter()
        );

        let raw_boundary = 2.0 * std::f64::consts::PI * 40.0;
        assert!(contour.len() < raw_boundary as usize);
    }
}
