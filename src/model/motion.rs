//! Per-frame tracker output consumed by the counters.

use serde::{Deserialize, Serialize};

use super::ids::{ObjectId, TypeCode};
use crate::geom::Point;

/// One object's displacement between two consecutive frames.
///
/// Built by the external tracker and consumed within a single `process`
/// call; counters never retain it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionSegment {
    /// Tracker-assigned object identity.
    #[serde(rename = "id")]
    pub object_id: ObjectId,

    /// Detector class code.
    #[serde(rename = "type")]
    pub object_type: TypeCode,

    /// Position in the previous frame.
    #[serde(rename = "prev")]
    pub previous: Point,

    /// Position in the current frame.
    #[serde(rename = "curr")]
    pub current: Point,
}

impl MotionSegment {
    /// Creates a new motion segment.
    pub fn new(
        object_id: impl Into<ObjectId>,
        object_type: impl Into<TypeCode>,
        previous: impl Into<Point>,
        current: impl Into<Point>,
    ) -> Self {
        Self {
            object_id: object_id.into(),
            object_type: object_type.into(),
            previous: previous.into(),
            current: current.into(),
        }
    }
}

/// A batch of motion segments delivered for one video frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Optional frame index from the source stream.
    ///
    /// Counters ignore it and age objects once per `process` call. The
    /// `count` command reads it to replay empty frames over gaps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<u64>,

    /// Segments in tracker order.
    #[serde(default)]
    pub segments: Vec<MotionSegment>,
}

impl Frame {
    pub fn new(segments: Vec<MotionSegment>) -> Self {
        Self {
            frame: None,
            segments,
        }
    }

    pub fn with_index(mut self, frame: u64) -> Self {
        self.frame = Some(frame);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_segment_json_shape() {
        let seg: MotionSegment =
            serde_json::from_str(r#"{"id": 7, "type": 2, "prev": [-1, 5], "curr": [1, 5]}"#)
                .expect("parse segment");
        assert_eq!(seg, MotionSegment::new(7u64, 2u32, (-1, 5), (1, 5)));
    }

    #[test]
    fn test_frame_defaults() {
        let frame: Frame = serde_json::from_str("{}").expect("parse empty frame");
        assert_eq!(frame, Frame::default());
    }
}
