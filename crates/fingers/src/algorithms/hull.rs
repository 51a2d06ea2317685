use crate::{
    geometry::cross,
    types::{Contour, Hull, Point},
};

/// Convex hull of a contour as indices into its points.
///
/// Monotone chain over the contour points; collinear boundary points are not
/// hull vertices. Indices come back ascending, which is the contour's own
/// traversal order, so consecutive hull entries bound exactly one stretch of
/// contour and the hull turns the same way as the contour. A boundary that
/// passes the same pixel twice (spurs, one pixel necks) yields the occurrence
/// that keeps that order. Contours with fewer than 3 points hull to all of
/// their indices.
pub fn convex_hull(contour: &Contour) -> Hull {
    let points = &contour.points;
    if points.len() < 3 {
        return Hull {
            indices: (0..points.len()).collect(),
        };
    }

    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| {
        points[a]
            .x
            .total_cmp(&points[b].x)
            .then(points[a].y.total_cmp(&points[b].y))
            .then(a.cmp(&b))
    });
    order.dedup_by(|b, a| points[*a] == points[*b]);

    if order.len() < 3 {
        order.sort_unstable();
        return Hull { indices: order };
    }

    let mut chain: Vec<usize> = Vec::with_capacity(order.len() + 1);
    monotone_half(points, order.iter().copied(), &mut chain);
    monotone_half(points, order.iter().rev().copied(), &mut chain);

    if chain.len() < 3 {
        chain.sort_unstable();
        return Hull { indices: chain };
    }

    // the chain winds with positive signed area
    let reversed: Vec<usize> = chain.iter().rev().copied().collect();
    let (along, against) = if contour.signed_area() < 0.0 {
        (reversed, chain)
    } else {
        (chain, reversed)
    };

    let indices = traversal_order(points, &along)
        .or_else(|| traversal_order(points, &against))
        .unwrap_or_else(|| {
            tracing::trace!(hull = along.len(), "hull vertices not found in one lap of the contour");
            let mut fallback = along;
            fallback.sort_unstable();
            fallback
        });
    Hull { indices }
}

/// Pick one contour index per vertex of `cycle` so that the picks follow the
/// cycle within a single lap of the contour, then return them ascending.
/// Greedy matching from each occurrence of the rarest vertex finds such a
/// pick whenever one exists.
fn traversal_order(points: &[Point], cycle: &[usize]) -> Option<Vec<usize>> {
    let (n, k) = (points.len(), cycle.len());
    let anchor = (0..k).min_by_key(|&v| occurrences(points, points[cycle[v]]).count())?;

    for start in occurrences(points, points[cycle[anchor]]) {
        let mut picked = Vec::with_capacity(k);
        picked.push(start);
        for step in 1..n {
            if picked.len() == k {
                break;
            }
            let i = (start + step) % n;
            if points[i] == points[cycle[(anchor + picked.len()) % k]] {
                picked.push(i);
            }
        }
        if picked.len() == k {
            picked.sort_unstable();
            return Some(picked);
        }
    }
    None
}

fn occurrences(points: &[Point], target: Point) -> impl Iterator<Item = usize> + '_ {
    points
        .iter()
        .enumerate()
        .filter(move |(_, p)| **p == target)
        .map(|(i, _)| i)
}

/// Append one half (lower or upper) of the monotone chain to `chain`.
fn monotone_half(points: &[Point], order: impl Iterator<Item = usize>, chain: &mut Vec<usize>) {
    let floor = chain.len();
    for i in order {
        while chain.len() >= floor + 2
            && cross(points[chain[chain.len() - 2]], points[chain[chain.len() - 1]], points[i]) <= 0.0
        {
            chain.pop();
        }
        chain.push(i);
    }
    // the last point opens the other half
    chain.pop();
}
