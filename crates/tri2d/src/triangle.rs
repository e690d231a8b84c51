//! Triangle area, containment and overlap.
//!
//! All arithmetic is done on `i128` so that any pair of `i32` coordinates
//! produces an exact determinant.

use serde::{Deserialize, Serialize};

use crate::segment::Segment;
use crate::Point;

/// Where a point lies relative to a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Containment {
    /// Strictly inside the triangle
    Inside,
    /// On an edge or at a vertex
    Boundary,
    /// Outside the triangle
    Outside,
}

/// Twice the signed area of `abc` (the shoelace determinant).
///
/// Positive when `a -> b -> c` turns counter-clockwise, zero when collinear.
pub(crate) fn orient(a: Point, b: Point, c: Point) -> i128 {
    let (ax, ay) = (i128::from(a.x), i128::from(a.y));
    let (bx, by) = (i128::from(b.x), i128::from(b.y));
    let (cx, cy) = (i128::from(c.x), i128::from(c.y));
    ax * (by - cy) + bx * (cy - ay) + cx * (ay - by)
}

/// Signed shoelace area of `abc`, truncated toward zero.
///
/// `(a.x*(b.y-c.y) + b.x*(c.y-a.y) + c.x*(a.y-b.y)) / 2`
#[must_use]
pub fn signed_area(a: Point, b: Point, c: Point) -> i128 {
    orient(a, b, c) / 2
}

/// Absolute area of `abc`, truncated to an integer.
///
/// Saturates at `i64::MAX`, which no triangle on a 32-bit grid can reach
/// unless it spans most of the coordinate range.
#[must_use]
pub fn area(a: Point, b: Point, c: Point) -> i64 {
    i64::try_from(orient(a, b, c).abs() / 2).unwrap_or(i64::MAX)
}

/// Classify `p` against the triangle `abc`.
///
/// A degenerate (collinear) triangle has no interior: points on its hull
/// segment are [`Containment::Boundary`], everything else is outside.
#[must_use]
pub fn classify_point(p: Point, a: Point, b: Point, c: Point) -> Containment {
    let scale = |q: Point| [i128::from(q.x), i128::from(q.y)];
    classify_scaled(scale(p), scale(a), scale(b), scale(c))
}

/// True only if `p` lies strictly inside `abc`.
#[must_use]
pub fn point_in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    classify_point(p, a, b, c) == Containment::Inside
}

fn cross(o: [i128; 2], a: [i128; 2], b: [i128; 2]) -> i128 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

fn on_scaled_segment(p: [i128; 2], a: [i128; 2], b: [i128; 2]) -> bool {
    cross(a, b, p) == 0
        && p[0] >= a[0].min(b[0])
        && p[0] <= a[0].max(b[0])
        && p[1] >= a[1].min(b[1])
        && p[1] <= a[1].max(b[1])
}

// Works on pre-scaled coordinates so centroids (a+b+c)/3 can be tested
// exactly against a triangle scaled by 3.
fn classify_scaled(p: [i128; 2], a: [i128; 2], b: [i128; 2], c: [i128; 2]) -> Containment {
    if cross(a, b, c) == 0 {
        return if on_scaled_segment(p, a, b)
            || on_scaled_segment(p, b, c)
            || on_scaled_segment(p, c, a)
        {
            Containment::Boundary
        } else {
            Containment::Outside
        };
    }

    let d1 = cross(a, b, p);
    let d2 = cross(b, c, p);
    let d3 = cross(c, a, p);

    let has_neg = d1 < 0 || d2 < 0 || d3 < 0;
    let has_pos = d1 > 0 || d2 > 0 || d3 > 0;

    if has_neg && has_pos {
        Containment::Outside
    } else if d1 == 0 || d2 == 0 || d3 == 0 {
        Containment::Boundary
    } else {
        Containment::Inside
    }
}

/// A triangle on the integer grid.
///
/// Equality here is positional (`a`, `b`, `c` in order). Order-independent
/// identity is a concern of the field layer built on top of this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triangle {
    /// First vertex
    pub a: Point,
    /// Second vertex
    pub b: Point,
    /// Third vertex
    pub c: Point,
}

impl Triangle {
    /// Create a triangle from three vertices.
    #[must_use]
    pub const fn new(a: Point, b: Point, c: Point) -> Self {
        Self { a, b, c }
    }

    /// The three vertices in construction order.
    #[must_use]
    pub const fn vertices(&self) -> [Point; 3] {
        [self.a, self.b, self.c]
    }

    /// The three edges `ab`, `bc`, `ca`.
    #[must_use]
    pub const fn edges(&self) -> [Segment; 3] {
        [
            Segment::new(self.a, self.b),
            Segment::new(self.b, self.c),
            Segment::new(self.c, self.a),
        ]
    }

    /// Signed area (positive when counter-clockwise).
    #[must_use]
    pub fn signed_area(&self) -> i128 {
        signed_area(self.a, self.b, self.c)
    }

    /// Absolute area, truncated.
    #[must_use]
    pub fn area(&self) -> i64 {
        area(self.a, self.b, self.c)
    }

    /// True if the vertices are collinear (zero area).
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        orient(self.a, self.b, self.c) == 0
    }

    /// Classify a point against this triangle.
    #[must_use]
    pub fn classify(&self, p: Point) -> Containment {
        classify_point(p, self.a, self.b, self.c)
    }

    /// True only for points strictly inside.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        self.classify(p) == Containment::Inside
    }

    /// Check if the interiors of the two triangles share any area.
    ///
    /// Separating-axis test on the six edge lines: the interiors are
    /// disjoint exactly when every vertex of one triangle lies on or outside
    /// some edge line of the other. Triangles that only touch along an edge
    /// or at a vertex do not overlap. Degenerate triangles overlap nothing.
    #[must_use]
    pub fn overlaps(&self, other: &Triangle) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }

        let mine = self.counter_clockwise();
        let theirs = other.counter_clockwise();
        !(separates(&mine, &theirs) || separates(&theirs, &mine))
    }

    fn counter_clockwise(&self) -> [Point; 3] {
        if orient(self.a, self.b, self.c) < 0 {
            [self.a, self.c, self.b]
        } else {
            [self.a, self.b, self.c]
        }
    }
}

// `edges_of` must be counter-clockwise, so its interior is on the positive
// side of every edge.
fn separates(edges_of: &[Point; 3], other: &[Point; 3]) -> bool {
    (0..3).any(|i| {
        let (p, q) = (edges_of[i], edges_of[(i + 1) % 3]);
        other.iter().all(|&v| orient(p, q, v) <= 0)
    })
}
