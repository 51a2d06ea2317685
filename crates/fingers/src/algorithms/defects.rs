use crate::{
    geometry::distance_to_line,
    types::{Contour, Defect, Hull},
};

/// Convexity defects of `contour` against its `hull`.
///
/// Every pair of hull-adjacent indices (the last pairs with the first) bounds a
/// stretch of contour; the point of that stretch farthest from the chord is
/// the far point. Stretches without interior points, or lying flat on the
/// chord, produce no defect.
pub fn convexity_defects(contour: &Contour, hull: &Hull) -> Vec<Defect> {
    let n = contour.len();
    if n < 3 || hull.len() < 3 {
        return Vec::new();
    }

    let mut defects = Vec::new();
    for (k, &start) in hull.indices.iter().enumerate() {
        let end = hull.indices[(k + 1) % hull.len()];
        if let Some(defect) = deepest_between(contour, start, end) {
            defects.push(defect);
        }
    }

    tracing::trace!(hull = hull.len(), defects = defects.len(), "computed convexity defects");
    defects
}

/// Walk the contour from `start` to `end` (wrapping) and return the point with
/// the largest distance to the start-end chord. First maximum wins.
fn deepest_between(contour: &Contour, start: usize, end: usize) -> Option<Defect> {
    let n = contour.len();
    let (a, b) = (contour.points[start], contour.points[end]);

    let mut deepest: Option<(usize, f64)> = None;
    let mut i = (start + 1) % n;
    while i != end {
        let depth = distance_to_line(contour.points[i], a, b);
        if deepest.is_none_or(|(_, best)| depth > best) {
            deepest = Some((i, depth));
        }
        i = (i + 1) % n;
    }

    match deepest {
        Some((far, depth)) if depth > 0.0 => Some(Defect { start, end, far, depth }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{algorithms::convex_hull, types::Point};

    fn contour(pts: &[(f64, f64)]) -> Contour {
        Contour::new(pts.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    #[test]
    fn test_single_notch() {
        let c = contour(&[(0.0, 0.0), (4.0, 0.0), (5.0, 6.0), (6.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let hull = convex_hull(&c);
        let defects = convexity_defects(&c, &hull);

        assert_eq!(defects.len(), 1);
        let d = defects[0];
        assert_eq!((d.start, d.end, d.far), (0, 4, 2));
        assert_eq!(d.depth, 6.0);
        assert_eq!(d.fixed_point_depth(), 6 * 256);
    }

    #[test]
    fn test_wrapping_pair() {
        // notch sits on the closing edge, between the last hull index and the first
        let c = contour(&[(10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0), (4.0, 0.0), (5.0, 3.0)]);
        let hull = convex_hull(&c);
        assert_eq!(hull.indices, vec![0, 1, 2, 3]);

        let defects = convexity_defects(&c, &hull);
        assert_eq!(defects.len(), 1);
        let d = defects[0];
        assert_eq!((d.start, d.end, d.far), (3, 0, 5));
        assert_eq!(d.depth, 3.0);
    }

    #[test]
    fn test_far_index_between_start_and_end() {
        let c = contour(&[
            (0.0, 0.0),
            (3.0, 5.0),
            (6.0, 0.0),
            (9.0, 4.0),
            (12.0, 0.0),
            (12.0, 10.0),
            (0.0, 10.0),
        ]);
        let hull = convex_hull(&c);
        let defects = convexity_defects(&c, &hull);
        assert!(!defects.is_empty());
        for d in &defects {
            assert!(d.depth >= 0.0);
            let pos = hull.indices.iter().position(|&h| h == d.start).unwrap();
            assert_eq!(hull.indices[(pos + 1) % hull.len()], d.end);
            if d.start < d.end {
                assert!(d.start < d.far && d.far < d.end);
            } else {
                assert!(d.far > d.start || d.far < d.end);
            }
        }
    }

    #[test]
    fn test_convex_polygon_has_no_defects() {
        let c = contour(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        assert!(convexity_defects(&c, &convex_hull(&c)).is_empty());
    }

    #[test]
    fn test_degenerate_inputs() {
        let c = contour(&[(0.0, 0.0), (10.0, 0.0)]);
        assert!(convexity_defects(&c, &convex_hull(&c)).is_empty());
        assert!(convexity_defects(&Contour::default(), &Hull::default()).is_empty());
    }

    #[test]
    fn test_revisited_hull_vertex() {
        use geo::{Area, ConvexHull};

        // the boundary runs out along a spur to (8,10) and back through (8,8)
        let c = contour(&[
            (2.0, 2.0),
            (2.0, 7.0),
            (7.0, 7.0),
            (8.0, 8.0),
            (8.0, 10.0),
            (8.0, 8.0),
            (7.0, 7.0),
            (7.0, 2.0),
        ]);
        let hull = convex_hull(&c);
        let hull_area = Contour::new(hull.points(&c)).area();
        assert!((hull_area - c.to_geo_polygon().convex_hull().unsigned_area()).abs() < 1e-9);

        let defects = convexity_defects(&c, &hull);
        let spans: Vec<_> = defects.iter().map(|d| (d.start, d.end, d.far)).collect();
        assert_eq!(spans, vec![(1, 4, 2), (5, 7, 6)]);
        assert!((defects[0].depth - 15.0 / 45f64.sqrt()).abs() < 1e-9);
        assert!((defects[1].depth - 5.0 / 37f64.sqrt()).abs() < 1e-9);
    }
}
