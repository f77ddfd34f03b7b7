//! Line segments and their axis-aligned bounding rectangles.

use serde::{Deserialize, Serialize};

use super::point::Point;

/// A directed line segment from `start` to `end`.
///
/// Like the rest of the geometry types, construction is permissive: a
/// zero-length or non-finite segment can be represented so that config
/// validation can report it instead of panicking while parsing.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    /// Creates a new segment between two points.
    #[inline]
    pub fn new(start: impl Into<Point>, end: impl Into<Point>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Direction vector `end - start`.
    #[inline]
    pub fn direction(&self) -> Point {
        self.end - self.start
    }

    /// Returns true if both endpoints are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }

    /// Returns true if both endpoints coincide.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// The closed axis-aligned rectangle spanned by the two endpoints.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::spanning(self.start, self.end)
    }
}

impl std::fmt::Debug for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} -> {:?}", self.start, self.end)
    }
}

// Serialized as `[[x1, y1], [x2, y2]]`.
impl Serialize for Segment {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.start, self.end].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Segment {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [start, end] = <[Point; 2]>::deserialize(deserializer)?;
        Ok(Segment { start, end })
    }
}

/// An axis-aligned rectangle in min/max form.
///
/// Always ordered: [`Rect::spanning`] sorts the corners, so `min <= max`
/// holds on both axes for finite input.
#[derive(Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// The smallest rectangle containing both points.
    #[inline]
    pub fn spanning(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Closed containment test: points on the border are inside.
    ///
    /// NaN coordinates are never contained.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

impl std::fmt::Debug for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rect")
            .field("xmin", &self.min.x)
            .field("ymin", &self.min.y)
            .field("xmax", &self.max.x)
            .field("ymax", &self.max.y)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_basics() {
        let seg = Segment::new((0, 0), (3, 4));
        assert_eq!(seg.direction(), Point::new(3.0, 4.0));
        assert!(!seg.is_degenerate());
        assert!(Segment::new((2, 2), (2, 2)).is_degenerate());
    }

    #[test]
    fn test_bounds_are_ordered() {
        let rect = Segment::new((10, 0), (0, 8)).bounds();
        assert_eq!(rect.min, Point::new(0.0, 0.0));
        assert_eq!(rect.max, Point::new(10.0, 8.0));
        assert_eq!(rect.width(), 10.0);
        assert_eq!(rect.height(), 8.0);
    }

    #[test]
    fn test_rect_contains_is_closed() {
        let rect = Rect::spanning(Point::new(0.0, 0.0), Point::new(0.0, 10.0));
        assert!(rect.contains(Point::new(0.0, 0.0)));
        assert!(rect.contains(Point::new(0.0, 5.0)));
        assert!(!rect.contains(Point::new(0.1, 5.0)));
        assert!(!rect.contains(Point::new(f64::NAN, 5.0)));
    }

    #[test]
    fn test_segment_serde_layout() {
        let seg: Segment = serde_json::from_str("[[0, 0], [0, 10]]").expect("parse segment");
        assert_eq!(seg, Segment::new((0, 0), (0, 10)));
        let json = serde_json::to_string(&seg).expect("serialize segment");
        assert_eq!(json, "[[0.0,0.0],[0.0,10.0]]");
    }
}
