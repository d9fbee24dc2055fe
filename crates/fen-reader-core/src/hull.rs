//! Convex hull of integer vote cells.
//!
//! Orientation is measured on raw coordinates. Pixel rasters grow `y`
//! downwards, so a hull reported as [`Winding::CounterClockwise`] looks
//! clockwise on screen; only the sign convention matters here.

use std::cmp::Ordering;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Twice the signed area of the triangle `o, a, b`.
///
/// Positive for a counter-clockwise turn, negative for clockwise, zero when
/// the three points are collinear.
#[inline]
pub fn cross(o: Point2<i32>, a: Point2<i32>, b: Point2<i32>) -> i64 {
    let (ox, oy) = (o.x as i64, o.y as i64);
    (a.x as i64 - ox) * (b.y as i64 - oy) - (a.y as i64 - oy) * (b.x as i64 - ox)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winding {
    CounterClockwise,
    Clockwise,
}

/// Axis-aligned bounds, inclusive on both ends.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

/// Strictly convex polygon with at least three vertices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HullPolygon {
    vertices: Vec<Point2<i32>>,
    winding: Winding,
}

impl HullPolygon {
    /// Wrap an ordered list of convex polygon vertices.
    ///
    /// Returns `None` when fewer than three vertices are given, when the
    /// polygon has zero area, or when the turns are not all in one direction.
    /// Either winding is accepted and recorded.
    pub fn from_vertices(vertices: Vec<Point2<i32>>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let area2 = signed_area2(&vertices);
        let winding = match area2.cmp(&0) {
            Ordering::Greater => Winding::CounterClockwise,
            Ordering::Less => Winding::Clockwise,
            Ordering::Equal => return None,
        };
        let hull = Self { vertices, winding };
        hull.is_convex().then_some(hull)
    }

    #[inline]
    pub fn vertices(&self) -> &[Point2<i32>] {
        &self.vertices
    }

    #[inline]
    pub fn winding(&self) -> Winding {
        self.winding
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Twice the signed polygon area (shoelace).
    pub fn signed_area2(&self) -> i64 {
        signed_area2(&self.vertices)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bb = BoundingBox {
            min_x: i32::MAX,
            min_y: i32::MAX,
            max_x: i32::MIN,
            max_y: i32::MIN,
        };
        for p in &self.vertices {
            bb.min_x = bb.min_x.min(p.x);
            bb.min_y = bb.min_y.min(p.y);
            bb.max_x = bb.max_x.max(p.x);
            bb.max_y = bb.max_y.max(p.y);
        }
        bb
    }

    /// Every consecutive triple turns the same way as the recorded winding.
    pub fn is_convex(&self) -> bool {
        let n = self.vertices.len();
        let sign = self.winding_sign();
        (0..n).all(|i| {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let c = self.vertices[(i + 2) % n];
            sign * cross(a, b, c) > 0
        })
    }

    /// Point-in-polygon test, boundary inclusive.
    ///
    /// The edge-side check follows the recorded winding, so a hull listed in
    /// either direction classifies interior points the same way.
    pub fn contains(&self, p: Point2<i32>) -> bool {
        let n = self.vertices.len();
        let sign = self.winding_sign();
        (0..n).all(|i| {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            sign * cross(a, b, p) >= 0
        })
    }

    /// Vertices as real-valued points, in hull order.
    pub fn to_points_f32(&self) -> Vec<Point2<f32>> {
        self.vertices
            .iter()
            .map(|p| Point2::new(p.x as f32, p.y as f32))
            .collect()
    }

    #[inline]
    fn winding_sign(&self) -> i64 {
        match self.winding {
            Winding::CounterClockwise => 1,
            Winding::Clockwise => -1,
        }
    }
}

fn signed_area2(vertices: &[Point2<i32>]) -> i64 {
    let n = vertices.len();
    (0..n)
        .map(|i| {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64
        })
        .sum()
}

/// Graham scan over integer points.
///
/// The pivot is the point with the lowest `y` (lowest `x` on ties); the rest
/// are swept in increasing polar angle around it, nearer points first on
/// equal angles. Collinear boundary points are dropped, so the result is
/// strictly convex and [`Winding::CounterClockwise`].
///
/// Returns `None` for degenerate input: fewer than three distinct points or
/// all points on one line.
pub fn convex_hull(points: &[Point2<i32>]) -> Option<HullPolygon> {
    let mut pts: Vec<Point2<i32>> = points.to_vec();
    pts.sort_unstable_by_key(|p| (p.y, p.x));
    pts.dedup();
    if pts.len() < 3 {
        return None;
    }

    // Sorted by (y, x), so the first point is the pivot.
    let pivot = pts[0];
    let mut rest = pts.split_off(1);

    // Every other point sits in the half-plane y >= pivot.y (and x > pivot.x
    // when y is equal), so polar order is a plain cross-product comparison.
    rest.sort_by(|a, b| match cross(pivot, *a, *b).cmp(&0) {
        Ordering::Greater => Ordering::Less,
        Ordering::Less => Ordering::Greater,
        Ordering::Equal => dist2(pivot, *a).cmp(&dist2(pivot, *b)),
    });

    let mut hull: Vec<Point2<i32>> = Vec::with_capacity(rest.len() + 1);
    hull.push(pivot);
    for p in rest {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }
    // Close the polygon: the edge back to the pivot must also turn left.
    while hull.len() >= 3 && cross(hull[hull.len() - 2], hull[hull.len() - 1], pivot) <= 0 {
        hull.pop();
    }

    HullPolygon::from_vertices(hull)
}

#[inline]
fn dist2(a: Point2<i32>, b: Point2<i32>) -> i64 {
    let dx = (a.x - b.x) as i64;
    let dy = (a.y - b.y) as i64;
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(i32, i32)]) -> Vec<Point2<i32>> {
        raw.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    #[test]
    fn square_with_interior_and_edge_points() {
        let input = pts(&[
            (0, 0),
            (4, 0),
            (4, 4),
            (0, 4),
            (2, 2),
            (2, 0),
            (4, 2),
            (1, 3),
        ]);
        let hull = convex_hull(&input).expect("hull");
        assert_eq!(hull.vertices(), pts(&[(0, 0), (4, 0), (4, 4), (0, 4)]).as_slice());
        assert_eq!(hull.winding(), Winding::CounterClockwise);
        for p in &input {
            assert!(hull.contains(*p), "{p:?} should be inside");
        }
    }

    #[test]
    fn every_input_point_is_covered_and_turns_are_ccw() {
        // Deterministic pseudo-random cloud.
        let mut state = 12345u32;
        let mut cloud = Vec::new();
        for _ in 0..400 {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
            let x = ((state >> 16) % 90) as i32;
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
            let y = ((state >> 16) % 70) as i32;
            cloud.push(Point2::new(x, y));
        }
        let hull = convex_hull(&cloud).expect("hull");
        assert!(hull.is_convex());
        let v = hull.vertices();
        for i in 0..v.len() {
            let turn = cross(v[i], v[(i + 1) % v.len()], v[(i + 2) % v.len()]);
            assert!(turn > 0, "clockwise or collinear turn at {i}");
        }
        for p in &cloud {
            assert!(hull.contains(*p));
        }
    }

    #[test]
    fn collinear_points_on_the_closing_ray_are_removed() {
        // (0,0) pivot; (0,3) and (0,6) lie on the final ray back to it.
        let input = pts(&[(0, 0), (6, 0), (6, 6), (0, 6), (0, 3)]);
        let hull = convex_hull(&input).expect("hull");
        assert_eq!(hull.len(), 4);
        assert!(!hull.vertices().contains(&Point2::new(0, 3)));
    }

    #[test]
    fn degenerate_inputs_yield_none() {
        assert!(convex_hull(&[]).is_none());
        assert!(convex_hull(&pts(&[(1, 1), (1, 1), (1, 1)])).is_none());
        assert!(convex_hull(&pts(&[(0, 0), (5, 5)])).is_none());
        assert!(convex_hull(&pts(&[(0, 0), (1, 1), (2, 2), (7, 7)])).is_none());
        assert!(convex_hull(&pts(&[(3, 0), (3, 9), (3, 4)])).is_none());
    }

    #[test]
    fn input_order_does_not_change_the_hull() {
        // Octagon-ish ring listed counter-clockwise, with interior cells mixed in.
        let ccw = pts(&[
            (10, 0),
            (20, 0),
            (30, 10),
            (30, 20),
            (20, 30),
            (10, 30),
            (0, 20),
            (0, 10),
            (15, 15),
            (12, 22),
            (25, 8),
        ]);
        let mut cw = ccw.clone();
        cw.reverse();

        let a = convex_hull(&ccw).expect("hull");
        let b = convex_hull(&cw).expect("hull");
        assert_eq!(a, b);
        assert_eq!(b.winding(), Winding::CounterClockwise);
        assert_eq!(
            b.vertices(),
            pts(&[
                (10, 0),
                (20, 0),
                (30, 10),
                (30, 20),
                (20, 30),
                (10, 30),
                (0, 20),
                (0, 10)
            ])
            .as_slice()
        );
    }

    #[test]
    fn containment_respects_either_winding() {
        let ccw = pts(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        let mut cw = ccw.clone();
        cw.reverse();

        let a = HullPolygon::from_vertices(ccw).expect("ccw");
        let b = HullPolygon::from_vertices(cw).expect("cw");
        assert_eq!(a.winding(), Winding::CounterClockwise);
        assert_eq!(b.winding(), Winding::Clockwise);

        for hull in [&a, &b] {
            assert!(hull.contains(Point2::new(5, 5)));
            assert!(hull.contains(Point2::new(0, 5)));
            assert!(!hull.contains(Point2::new(11, 5)));
            assert!(!hull.contains(Point2::new(5, -1)));
        }
    }

    #[test]
    fn from_vertices_rejects_non_convex_outline() {
        let dart = pts(&[(0, 0), (10, 0), (5, 2), (5, 10)]);
        assert!(HullPolygon::from_vertices(dart).is_none());
    }

    #[test]
    fn bounding_box_spans_vertices() {
        let hull = convex_hull(&pts(&[(2, 3), (9, 4), (5, 11), (4, 6)])).expect("hull");
        assert_eq!(
            hull.bounding_box(),
            BoundingBox {
                min_x: 2,
                min_y: 3,
                max_x: 9,
                max_y: 11
            }
        );
    }
}
