//! End-to-end counting scenarios over small hand-built scenes.

use std::sync::Arc;
use std::thread;

use lanecount::config::io::from_json_str;
use lanecount::counter::{
    Counter, CounterKind, CounterOptions, CrossingEvent, SharedCounter, SimpleCounter,
};
use lanecount::frames::from_jsonl_str;
use lanecount::geom::{Containment, Segment};
use lanecount::model::{Lane, LaneId, MotionSegment, ObjectId, TypeCode, TypeDictionary};
use lanecount::report::CountReport;

const CAR: TypeCode = TypeCode(2);

fn types() -> TypeDictionary {
    TypeDictionary::from_pairs([("car", CAR), ("bus", TypeCode(5))]).expect("types")
}

#[test]
fn single_lane_single_crossing() {
    let mut counter = SimpleCounter::new(types(), CounterOptions::default());
    counter
        .add_lane(Lane::neutral(1u64, "L1", Segment::new((0, 0), (0, 10))))
        .expect("add lane");
    counter.initialize();

    let outcome = counter
        .process(&[MotionSegment::new(1u64, CAR, (-1, 5), (1, 5))])
        .expect("process");

    assert_eq!(outcome.events.len(), 1);
    assert_eq!(counter.counts().get(LaneId(1), CAR), Some(1));
    assert_eq!(counter.counts().total(), 1);
}

#[test]
fn entry_then_exit_counts_one_trip() {
    let lanes = vec![
        Lane::entry(1u64, "E", Segment::new((0, 0), (0, 10))),
        Lane::exit(2u64, "X", Segment::new((20, 0), (20, 10))),
    ];
    let mut counter =
        Counter::from_lanes(lanes, types(), CounterOptions::default()).expect("counter");
    assert_eq!(counter.kind(), CounterKind::OriginDestination);

    let frames = [
        MotionSegment::new(7u64, CAR, (-1, 5), (1, 5)),
        MotionSegment::new(7u64, CAR, (1, 5), (10, 5)),
        MotionSegment::new(7u64, CAR, (19, 5), (21, 5)),
    ];
    for (idx, segment) in frames.iter().enumerate() {
        counter.process(&[*segment]).expect("process");
        if idx < 2 {
            assert_eq!(counter.counts().total(), 0, "no trip before exit");
        }
        if idx == 0 {
            let Counter::OriginDestination(od) = &counter else {
                panic!("expected an origin-destination counter");
            };
            let entered = od.membership(ObjectId(7)).expect("inside after entry");
            assert_eq!(entered.entry_lane, LaneId(1));
            assert_eq!(entered.entered_frame, 1);
        }
    }

    let Counter::OriginDestination(od) = &counter else {
        panic!("expected an origin-destination counter");
    };
    let counts = od.counts();
    assert_eq!(counts.get((LaneId(1), LaneId(2)), CAR), Some(1));
    assert!(!od.is_inside(ObjectId(7)));
    assert_eq!(od.inside_count(), 0);
}

#[test]
fn one_motion_crossing_two_lanes_counts_both() {
    let mut counter = SimpleCounter::new(types(), CounterOptions::default());
    counter
        .add_lane(Lane::neutral(1u64, "left", Segment::new((0, 0), (0, 10))))
        .expect("lane 1");
    counter
        .add_lane(Lane::neutral(2u64, "right", Segment::new((4, 0), (4, 10))))
        .expect("lane 2");
    counter.initialize();

    let outcome = counter
        .process(&[MotionSegment::new(3u64, CAR, (-1, 5), (6, 5))])
        .expect("process");

    assert_eq!(outcome.events.len(), 2);
    let counts = counter.counts();
    assert_eq!(counts.get(LaneId(1), CAR), Some(1));
    assert_eq!(counts.get(LaneId(2), CAR), Some(1));
}

#[test]
fn object_pausing_on_a_lane_is_counted_once() {
    for containment in [Containment::Parametric, Containment::BoundingBox] {
        let lanes = vec![Lane::neutral(1u64, "gate", Segment::new((0, 0), (0, 10)))];
        let options = CounterOptions {
            containment,
            ..Default::default()
        };
        let mut counter = Counter::from_lanes(lanes, types(), options).expect("counter");
        counter
            .process(&[MotionSegment::new(1u64, CAR, (-1, 5), (0, 5))])
            .expect("arrive");
        counter
            .process(&[MotionSegment::new(1u64, CAR, (0, 5), (1, 5))])
            .expect("leave");
        assert_eq!(counter.counts().total(), 1, "{:?}", containment);
    }
}

#[test]
fn unknown_type_is_reported_but_not_counted() {
    let mut counter = SimpleCounter::new(types(), CounterOptions::default());
    counter
        .add_lane(Lane::neutral(1u64, "L1", Segment::new((0, 0), (0, 10))))
        .expect("add lane");
    counter.initialize();

    let outcome = counter
        .process(&[MotionSegment::new(1u64, 42u32, (-1, 5), (1, 5))])
        .expect("process");

    assert_eq!(
        outcome.events,
        vec![CrossingEvent::Unclassified {
            object: ObjectId(1),
            object_type: TypeCode(42),
            entry: None,
            lane: LaneId(1),
        }]
    );
    assert_eq!(outcome.unclassified(), 1);
    assert_eq!(counter.counts().total(), 0);
    assert_eq!(counter.counts().get(LaneId(1), TypeCode(42)), None);
    assert_eq!(counter.unclassified(), 1);
}

#[test]
fn config_and_frames_replay() {
    let config = from_json_str(
        r#"{
            "id": 9,
            "name": "crossroads",
            "types": {"car": 2, "bus": 5},
            "lanes": [
                {"id": 1, "name": "west", "role": "entry", "boundary": [[0, 0], [0, 10]]},
                {"id": 2, "name": "east", "role": 2, "boundary": [[20, 0], [20, 10]]}
            ]
        }"#,
    )
    .expect("config");
    let frames = from_jsonl_str(
        r#"{"frame": 1, "segments": [{"id": 7, "type": 2, "prev": [-1, 5], "curr": [1, 5]}, {"id": 8, "type": 5, "prev": [-2, 2], "curr": [2, 2]}]}
{"frame": 2, "segments": [{"id": 7, "type": 2, "prev": [1, 5], "curr": [10, 5]}]}
{"frame": 3, "segments": [{"id": 7, "type": 2, "prev": [19, 5], "curr": [21, 5]}, {"id": 8, "type": 5, "prev": [19, 2], "curr": [21, 2]}]}
"#,
    )
    .expect("frames");

    let mut counter = config.build_counter().expect("build");
    for frame in &frames {
        counter.process(&frame.segments).expect("process");
    }

    let report = CountReport::from_counter(&counter, config.id, config.name.clone());
    assert_eq!(report.frames, 3);
    assert_eq!(report.total, 2);
    assert_eq!(report.count_for("west -> east", "car"), Some(1));
    assert_eq!(report.count_for("west -> east", "bus"), Some(1));
}

#[test]
fn both_containment_policies_count_a_plain_crossing() {
    for containment in [Containment::Parametric, Containment::BoundingBox] {
        let lanes = vec![Lane::neutral(1u64, "gate", Segment::new((0, 0), (0, 10)))];
        let options = CounterOptions {
            containment,
            ..Default::default()
        };
        let mut counter = Counter::from_lanes(lanes, types(), options).expect("counter");
        counter
            .process(&[MotionSegment::new(1u64, CAR, (-3, 1), (2, 9))])
            .expect("process");
        assert_eq!(counter.counts().total(), 1, "{:?}", containment);
    }
}

#[test]
fn shared_counter_across_threads() {
    let lanes = vec![Lane::neutral(1u64, "gate", Segment::new((0, 0), (0, 10)))];
    let counter = Counter::from_lanes(lanes, types(), CounterOptions::default()).expect("counter");
    let shared = Arc::new(SharedCounter::new(counter));

    let handles: Vec<_> = (0..4u64)
        .map(|worker| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for i in 0..10u64 {
                    let id = worker * 100 + i;
                    shared
                        .process(&[MotionSegment::new(id, CAR, (-1, 5), (1, 5))])
                        .expect("process");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker");
    }

    assert_eq!(shared.snapshot().expect("snapshot").total(), 40);
    shared.reset().expect("reset");
    assert_eq!(shared.snapshot().expect("snapshot").total(), 0);
}
