//! Per-row edge intersection for scanline triangle fill.
//!
//! # Algorithm Overview
//!
//! For every integer row `y` from `floor(box.y)` to `ceil(box.y + box.h)`
//! (inclusive), each of the three edges is tested against the horizontal line
//! at `y`:
//!
//! ```text
//!          p1
//!          /\
//!   y ----x--x----   <- two crossings: left and right end of the span
//!        /    \
//!       /______\
//!      p2      p3
//! ```
//!
//! Edges are stored left-to-right (`p1.x <= p2.x`) with slope
//! `m = (p2.y - p1.y) / (p2.x - p1.x)`. Per edge and row:
//!
//! | Edge kind | Condition | Points emitted |
//! |-----------|-----------|----------------|
//! | Horizontal (`m == 0`) | `y == p1.y` | both endpoints |
//! | Vertical (`m` infinite) | `y` within the edge | `(p1.x, y)` |
//! | General | `y` within the edge | `((y - p1.y + m * p1.x) / m, y)` |
//!
//! A row passing through a vertex hits two edges at the same point, so more
//! than two points are deduplicated (see [`dedup_crossings`]) before the
//! leftmost and rightmost are chosen.
//!
//! A horizontal edge on the row does not stop the other edges from being
//! tested. Their crossings land on the same endpoints and are removed by the
//! dedup pass, so the span is unchanged, but the surviving point may carry a
//! sloped edge's corners instead of the horizontal edge's.
//!
//! Each crossing remembers which two corners of its triangle the edge joins,
//! so the shaders can interpolate vertex attributes along that edge later.

use super::{BoundingBox, Triangle};
use crate::math::vec3::Vec3;

/// Two crossings closer than this in both x and y are the same point.
pub const DEDUP_EPSILON: f32 = 0.001;

/// Where a row crosses one triangle edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    pub x: f32,
    pub y: f32,
    /// Corner indices (into the triangle) of the crossed edge, left endpoint first.
    pub edge: [usize; 2],
}

impl Intersection {
    pub fn new(x: f32, y: f32, edge: [usize; 2]) -> Self {
        Self { x, y, edge }
    }

    #[inline]
    fn coincides_with(&self, other: &Intersection) -> bool {
        (self.x - other.x).abs() < DEDUP_EPSILON && (self.y - other.y).abs() < DEDUP_EPSILON
    }
}

/// Left and right end of one row's span.
///
/// A row touching the triangle at a single point has `left == right`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanRow {
    pub left: Intersection,
    pub right: Intersection,
}

impl ScanRow {
    #[inline]
    pub fn y(&self) -> f32 {
        self.left.y
    }
}

/// A triangle edge, ordered so `p1.x <= p2.x`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub p1: Vec3,
    pub p2: Vec3,
    pub corners: [usize; 2],
    pub slope: f32,
}

impl Edge {
    /// Edge between corners `a` and `b` of `positions`.
    pub fn new(positions: &[Vec3; 3], a: usize, b: usize) -> Self {
        let (first, second) = if positions[a].x >= positions[b].x {
            (b, a)
        } else {
            (a, b)
        };
        let (p1, p2) = (positions[first], positions[second]);
        Self {
            p1,
            p2,
            corners: [first, second],
            slope: (p2.y - p1.y) / (p2.x - p1.x),
        }
    }

    /// The three edges of `triangle`: (0, 1), (1, 2), (0, 2).
    pub fn of_triangle(triangle: &Triangle) -> [Edge; 3] {
        let positions = triangle.positions();
        [
            Edge::new(&positions, 0, 1),
            Edge::new(&positions, 1, 2),
            Edge::new(&positions, 0, 2),
        ]
    }

    #[inline]
    fn spans_row(&self, y: f32) -> bool {
        y >= self.p1.y.min(self.p2.y) && y <= self.p1.y.max(self.p2.y)
    }

    /// Pushes this edge's crossings of row `y` onto `out`.
    pub fn crossings(&self, y: f32, out: &mut Vec<Intersection>) {
        let m = self.slope;
        if m == 0.0 {
            if y == self.p1.y {
                out.push(Intersection::new(self.p1.x, y, self.corners));
                out.push(Intersection::new(self.p2.x, y, self.corners));
            }
        } else if m.is_infinite() {
            if self.spans_row(y) {
                out.push(Intersection::new(self.p1.x, y, self.corners));
            }
        } else if m.is_nan() {
            // Both endpoints coincide.
            if y == self.p1.y {
                out.push(Intersection::new(self.p1.x, y, self.corners));
            }
        } else if self.spans_row(y) {
            let x = (y - self.p1.y + m * self.p1.x) / m;
            out.push(Intersection::new(x, y, self.corners));
        }
    }
}

/// Reduces `points` to at most two.
///
/// While more than two remain: drop the first if it coincides with the second,
/// else drop the first if it coincides with the third, else drop the third.
pub fn dedup_crossings(points: &mut Vec<Intersection>) {
    while points.len() > 2 {
        if points[0].coincides_with(&points[1]) || points[0].coincides_with(&points[2]) {
            points.remove(0);
        } else {
            points.remove(2);
        }
    }
}

/// The span of row `y`, or `None` if no edge reaches it.
pub fn intersect_row(edges: &[Edge; 3], y: f32) -> Option<ScanRow> {
    let mut points = Vec::with_capacity(4);
    for edge in edges {
        edge.crossings(y, &mut points);
    }
    dedup_crossings(&mut points);

    match points.as_slice() {
        [] => None,
        [p] => Some(ScanRow { left: *p, right: *p }),
        [a, b, ..] => {
            let (left, right) = if a.x < b.x { (*a, *b) } else { (*b, *a) };
            Some(ScanRow { left, right })
        }
    }
}

/// Spans for every row covered by `bounds`, top to bottom. Rows no edge reaches are skipped.
pub fn scan_triangle(triangle: &Triangle, bounds: &BoundingBox) -> Vec<ScanRow> {
    let edges = Edge::of_triangle(triangle);
    let first = bounds.y.floor() as i32;
    let last = (bounds.y + bounds.h).ceil() as i32;

    (first..=last)
        .filter_map(|row| intersect_row(&edges, row as f32))
        .collect()
}
