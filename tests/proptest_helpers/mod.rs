#![allow(dead_code)]

use lanecount::geom::{Point, Segment};
use lanecount::model::{MotionSegment, TypeCode, TypeDictionary};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

/// Type codes present in [`types`]; anything else is unclassified.
pub const KNOWN_TYPES: [u32; 3] = [1, 2, 5];

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn types() -> TypeDictionary {
    TypeDictionary::from_pairs([
        ("person", TypeCode(1)),
        ("car", TypeCode(2)),
        ("bus", TypeCode(5)),
    ])
    .expect("valid type dictionary")
}

/// Coordinates on a small integer grid, so that crossings are frequent.
pub fn arb_grid_point(extent: i32) -> BoxedStrategy<Point> {
    (-extent..=extent, -extent..=extent)
        .prop_map(|(x, y)| Point::new(x as f64, y as f64))
        .boxed()
}

/// Finite coordinates across many magnitudes.
pub fn arb_point() -> BoxedStrategy<Point> {
    let coord = prop_oneof![
        3 => -1000.0f64..1000.0,
        1 => -1e12f64..1e12,
        1 => -1e-6f64..1e-6,
        1 => (-50i32..50).prop_map(f64::from),
    ];
    (coord.clone(), coord)
        .prop_map(|(x, y)| Point::new(x, y))
        .boxed()
}

pub fn arb_segment() -> BoxedStrategy<Segment> {
    (arb_point(), arb_point())
        .prop_map(|(a, b)| Segment::new(a, b))
        .boxed()
}

/// One tracker observation: a known or unknown type, moving on the grid.
pub fn arb_motion(max_objects: u64, extent: i32) -> BoxedStrategy<MotionSegment> {
    let type_code = prop_oneof![
        4 => prop::sample::select(KNOWN_TYPES.to_vec()),
        1 => 90u32..100,
    ];
    (
        0..max_objects,
        type_code,
        arb_grid_point(extent),
        arb_grid_point(extent),
    )
        .prop_map(|(id, code, prev, curr)| MotionSegment::new(id, code, prev, curr))
        .boxed()
}

/// A sequence of frames; each frame holds at most one observation per object.
pub fn arb_frames(
    max_frames: usize,
    max_objects: u64,
    extent: i32,
) -> BoxedStrategy<Vec<Vec<MotionSegment>>> {
    let frame = prop::collection::vec(arb_motion(max_objects, extent), 0..=max_objects as usize)
        .prop_map(|mut segments| {
            segments.sort_by_key(|s| s.object_id);
            segments.dedup_by_key(|s| s.object_id);
            segments
        });
    prop::collection::vec(frame, 0..=max_frames).boxed()
}
