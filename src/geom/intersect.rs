//! Segment–segment intersection kernel.
//!
//! Both segments are treated as parametrized lines:
//!
//! ```text
//! a(s) = a1 + s * (a2 - a1)
//! b(t) = b1 + t * (b2 - b1)
//! ```
//!
//! With `da = a2 - a1`, `db = b2 - b1` and `dap = perp(da)`, the lines meet at
//! `t = (dap · (a1 - b1)) / (dap · db)`. The denominator is zero exactly when
//! the segments are parallel, collinear or one of them has coincident
//! endpoints; that case is rejected before any division happens.
//!
//! Whether the line intersection is a *segment* crossing is decided by the
//! [`Containment`] policy.

use serde::{Deserialize, Serialize};

use super::point::Point;
use super::segment::Segment;

/// How the candidate intersection point is checked against the two segments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Containment {
    /// Exact check: the line parameters along both segments lie in `[0, 1]`.
    ///
    /// Robust for axis-aligned and very short segments, and exactly symmetric
    /// in the order of its arguments.
    #[default]
    Parametric,

    /// The candidate point must lie in the closed axis-aligned bounding
    /// rectangle of each segment.
    ///
    /// This is the legacy counting behavior. Rounding in the candidate point
    /// can push it just outside a zero-width rectangle, so crossings of
    /// axis-aligned segments at non-representable positions may be missed.
    BoundingBox,
}

/// Computes where segment `a1 → a2` crosses segment `b1 → b2`.
///
/// Returns `None` for parallel, collinear or zero-length segments, for any
/// non-finite coordinate, and when the lines meet outside either segment.
/// Never panics and never divides by zero.
pub fn intersect(a1: Point, a2: Point, b1: Point, b2: Point, containment: Containment) -> Option<Point> {
    if !(a1.is_finite() && a2.is_finite() && b1.is_finite() && b2.is_finite()) {
        return None;
    }

    let da = a2 - a1;
    let db = b2 - b1;
    let dp = a1 - b1;

    // perp(da) · db
    let denom = da.cross(db);
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }

    // Parameter along b; the parameter along a is db × dp / denom.
    let t = da.cross(dp) / denom;
    if !t.is_finite() {
        return None;
    }
    let candidate = b1 + db * t;
    if !candidate.is_finite() {
        return None;
    }

    let within = match containment {
        Containment::Parametric => {
            let s = db.cross(dp) / denom;
            in_unit_range(t) && in_unit_range(s)
        }
        Containment::BoundingBox => {
            Segment::new(a1, a2).bounds().contains(candidate)
                && Segment::new(b1, b2).bounds().contains(candidate)
        }
    };

    within.then_some(candidate)
}

/// Returns true if segment `a1 → a2` crosses segment `b1 → b2`.
#[inline]
pub fn crosses(a1: Point, a2: Point, b1: Point, b2: Point, containment: Containment) -> bool {
    intersect(a1, a2, b1, b2, containment).is_some()
}

#[inline]
fn in_unit_range(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

/// Fuzz-only entrypoint: runs the kernel under both policies on raw floats.
#[cfg(feature = "fuzzing")]
pub fn fuzz_intersect(coords: [f64; 8]) -> (bool, bool) {
    let [ax1, ay1, ax2, ay2, bx1, by1, bx2, by2] = coords;
    let (a1, a2) = (Point::new(ax1, ay1), Point::new(ax2, ay2));
    let (b1, b2) = (Point::new(bx1, by1), Point::new(bx2, by2));
    (
        crosses(a1, a2, b1, b2, Containment::Parametric),
        crosses(a1, a2, b1, b2, Containment::BoundingBox),
    )
}
