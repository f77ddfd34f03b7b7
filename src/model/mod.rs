//! Domain model: identifiers, lanes, object types and tracker input.
//!
//! # Example
//!
//! ```
//! use lanecount::geom::Segment;
//! use lanecount::model::{Lane, LaneRegistry, MotionSegment};
//!
//! let mut lanes = LaneRegistry::new();
//! lanes
//!     .add(Lane::neutral(1u64, "gate", Segment::new((0, 0), (0, 10))))
//!     .unwrap();
//!
//! let step = MotionSegment::new(7u64, 2u32, (-1, 5), (1, 5));
//! assert_eq!(lanes.len(), 1);
//! assert_eq!(step.object_id.as_u64(), 7);
//! ```

mod ids;
mod lane;
mod motion;
mod types;

pub use ids::{LaneId, ObjectId, TypeCode};
pub use lane::{Lane, LaneRegistry, LaneRole};
pub use motion::{Frame, MotionSegment};
pub use types::TypeDictionary;
