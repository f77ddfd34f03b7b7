//! Per-lane crossing counter.

use tracing::{debug, info, warn};

use super::tally::TallyTable;
use super::{CounterOptions, CrossingEvent, FrameOutcome};
use crate::error::LaneCountError;
use crate::geom::{crosses, Point, Segment};
use crate::model::{Lane, LaneId, LaneRegistry, MotionSegment, TypeDictionary};

/// Counts every crossing of every lane, per lane and object type.
///
/// Lane roles are ignored. A segment that crosses several lanes in one frame
/// increments each of them: an object can legitimately pass two boundaries
/// between consecutive frames.
///
/// Each motion is treated as half-open: a segment that ends exactly on a
/// lane counts there, and the next segment, which starts on that lane, does
/// not count it again.
///
/// Lifecycle: [`add_lane`](Self::add_lane) for each lane, then
/// [`initialize`](Self::initialize) once, then [`process`](Self::process)
/// per frame.
#[derive(Clone, Debug)]
pub struct SimpleCounter {
    lanes: LaneRegistry,
    types: TypeDictionary,
    options: CounterOptions,
    tally: Option<TallyTable<LaneId>>,
    frames: u64,
}

impl SimpleCounter {
    pub fn new(types: TypeDictionary, options: CounterOptions) -> Self {
        Self {
            lanes: LaneRegistry::new(),
            types,
            options,
            tally: None,
            frames: 0,
        }
    }

    /// Registers a lane. Its role is not inspected.
    ///
    /// # Errors
    /// - [`LaneCountError::AlreadyInitialized`] once counting has started
    /// - [`LaneCountError::DuplicateLane`] for a repeated lane ID
    pub fn add_lane(&mut self, lane: Lane) -> Result<(), LaneCountError> {
        if self.tally.is_some() {
            return Err(LaneCountError::AlreadyInitialized);
        }
        self.lanes.add(lane)
    }

    /// Builds the zeroed `(lane, type)` table. Calling it again is a no-op.
    pub fn initialize(&mut self) {
        if self.tally.is_some() {
            return;
        }
        self.tally = Some(TallyTable::new(self.lanes.ids(), &self.types));
        info!(
            lanes = self.lanes.len(),
            types = self.types.len(),
            "simple counter initialized"
        );
    }

    pub fn is_initialized(&self) -> bool {
        self.tally.is_some()
    }

    /// Tests every segment against every lane and tallies the crossings.
    ///
    /// # Errors
    /// Returns [`LaneCountError::NotInitialized`] before
    /// [`initialize`](Self::initialize); nothing is mutated in that case.
    pub fn process(&mut self, segments: &[MotionSegment]) -> Result<FrameOutcome, LaneCountError> {
        let tally = self.tally.as_mut().ok_or(LaneCountError::NotInitialized)?;
        self.frames += 1;

        let mut outcome = FrameOutcome::default();
        for segment in segments {
            for lane in &self.lanes {
                if !crosses(
                    segment.previous,
                    segment.current,
                    lane.boundary.start,
                    lane.boundary.end,
                    self.options.containment,
                ) || starts_on(&lane.boundary, segment.previous)
                {
                    continue;
                }

                if self.types.contains(segment.object_type) {
                    tally.increment(lane.id, segment.object_type);
                    debug!(
                        frame = self.frames,
                        object = %segment.object_id,
                        lane = %lane.id,
                        "crossing counted"
                    );
                    outcome.events.push(CrossingEvent::Counted {
                        object: segment.object_id,
                        object_type: segment.object_type,
                        lane: lane.id,
                    });
                } else {
                    tally.record_unclassified(lane.id);
                    warn!(
                        frame = self.frames,
                        object = %segment.object_id,
                        object_type = %segment.object_type,
                        lane = %lane.id,
                        "crossing by unclassified object type excluded from counts"
                    );
                    outcome.events.push(CrossingEvent::Unclassified {
                        object: segment.object_id,
                        object_type: segment.object_type,
                        entry: None,
                        lane: lane.id,
                    });
                }
            }
        }

        Ok(outcome)
    }

    /// Snapshot of the tally. Empty before initialization.
    pub fn counts(&self) -> TallyTable<LaneId> {
        self.tally.clone().unwrap_or_default()
    }

    /// Crossings excluded because of an unknown object type.
    pub fn unclassified(&self) -> u64 {
        self.tally
            .as_ref()
            .map_or(0, TallyTable::total_unclassified)
    }

    /// Zeroes all counts; lanes stay configured.
    pub fn reset(&mut self) {
        if let Some(tally) = self.tally.as_mut() {
            tally.reset();
        }
    }

    /// Lane geometry, for renderers.
    pub fn lanes(&self) -> &LaneRegistry {
        &self.lanes
    }

    pub fn types(&self) -> &TypeDictionary {
        &self.types
    }

    /// Number of frames processed since construction.
    pub fn frames_processed(&self) -> u64 {
        self.frames
    }
}

/// True if `point` lies on the line through `boundary`.
///
/// Same expression as the kernel's parameter along the motion, so this holds
/// exactly when a crossing sits at the motion's start.
fn starts_on(boundary: &Segment, point: Point) -> bool {
    boundary.direction().cross(point - boundary.start) == 0.0
}
