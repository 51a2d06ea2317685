use crate::types::ContourSet;

/// Index of the contour with the largest enclosed area. The earliest contour
/// wins ties, and only an empty set yields `None`.
pub fn biggest_contour(set: &ContourSet) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, contour) in set.iter().enumerate() {
        let area = contour.area();
        match best {
            Some((_, best_area)) if area <= best_area => {}
            _ => best = Some((i, area)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Contour, Point};

    fn square(x: f64, y: f64, side: f64) -> Contour {
        Contour::new(vec![
            Point::new(x, y),
            Point::new(x + side, y),
            Point::new(x + side, y + side),
            Point::new(x, y + side),
        ])
    }

    fn set_of(contours: Vec<Contour>) -> ContourSet {
        let has_children = vec![false; contours.len()];
        ContourSet { contours, has_children }
    }

    #[test]
    fn test_empty_set() {
        assert_eq!(biggest_contour(&ContourSet::default()), None);
    }

    #[test]
    fn test_largest_area_wins() {
        let set = set_of(vec![square(0.0, 0.0, 3.0), square(10.0, 10.0, 8.0), square(40.0, 0.0, 5.0)]);
        assert_eq!(biggest_contour(&set), Some(1));
    }

    #[test]
    fn test_area_not_point_count() {
        let mut dense = Vec::new();
        for i in 0..20 {
            dense.push(Point::new(i as f64 * 0.1, 0.0));
        }
        dense.push(Point::new(1.0, 1.0));
        let set = set_of(vec![Contour::new(dense), square(5.0, 5.0, 4.0)]);
        assert_eq!(biggest_contour(&set), Some(1));
    }

    #[test]
    fn test_first_wins_ties_and_is_idempotent() {
        let set = set_of(vec![square(0.0, 0.0, 2.0), square(10.0, 0.0, 6.0), square(20.0, 0.0, 6.0)]);
        let first = biggest_contour(&set);
        assert_eq!(first, Some(1));
        assert_eq!(biggest_contour(&set), first);
    }

    #[test]
    fn test_zero_area_contours_still_select() {
        let set = set_of(vec![Contour::new(vec![Point::new(3.0, 3.0)])]);
        assert_eq!(biggest_contour(&set), Some(0));
    }
}
