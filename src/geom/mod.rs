//! Geometry kernel: points, segments and the crossing test.
//!
//! Everything in this module is a pure function of its inputs. Degenerate
//! geometry (parallel or collinear segments, zero-length segments, NaN
//! coordinates) is resolved locally as "no crossing" and never surfaces as
//! an error.
//!
//! # Example
//!
//! ```
//! use lanecount::geom::{crosses, Containment, Point};
//!
//! let hit = crosses(
//!     Point::new(-1.0, 5.0),
//!     Point::new(1.0, 5.0),
//!     Point::new(0.0, 0.0),
//!     Point::new(0.0, 10.0),
//!     Containment::Parametric,
//! );
//! assert!(hit);
//! ```

mod intersect;
mod point;
mod segment;

pub use intersect::{crosses, intersect, Containment};
#[cfg(feature = "fuzzing")]
pub use intersect::fuzz_intersect;
pub use point::Point;
pub use segment::{Rect, Segment};
