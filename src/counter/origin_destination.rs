//! Origin–destination counter: pairs each object's entry lane with its exit
//! lane and counts completed trips.
//!
//! Every object runs an independent two-state machine:
//!
//! ```text
//!            entry crossing                 exit crossing
//! Outside ------------------> Inside(E) -------------------> Outside
//!                                 |        (+1 on (E, X, type))
//!                                 | no exit crossing
//!                                 +--> Inside(E)
//! ```
//!
//! `Outside` is both the initial state of an unseen ID and the terminal
//! state of a trip. An exit crossing by an object that is `Outside` is
//! ignored: its entry was missed upstream, and nothing at this layer can
//! recover it.
//!
//! Objects whose track is lost while inside would otherwise stay in the
//! membership table forever. With `max_unseen_frames` set, an object that
//! has not been reported for more than that many frames is evicted without
//! producing a count.

use tracing::{debug, info, warn};

use super::membership::{Membership, MembershipState};
use super::tally::TallyTable;
use super::{CounterOptions, CrossingEvent, FrameOutcome};
use crate::error::LaneCountError;
use crate::geom::crosses;
use crate::model::{Lane, LaneId, LaneRegistry, LaneRole, MotionSegment, ObjectId, TypeDictionary};

/// An `(entry lane, exit lane)` combination key.
pub type LanePair = (LaneId, LaneId);

/// Counts completed entry → exit trips per lane pair and object type.
#[derive(Clone, Debug)]
pub struct OriginDestinationCounter {
    entry_lanes: LaneRegistry,
    exit_lanes: LaneRegistry,
    types: TypeDictionary,
    options: CounterOptions,
    tally: Option<TallyTable<LanePair>>,
    inside: MembershipState,
    frame: u64,
}

impl OriginDestinationCounter {
    pub fn new(types: TypeDictionary, options: CounterOptions) -> Self {
        Self {
            entry_lanes: LaneRegistry::new(),
            exit_lanes: LaneRegistry::new(),
            types,
            options,
            tally: None,
            inside: MembershipState::new(),
            frame: 0,
        }
    }

    /// Registers a lane with the entry or exit set according to its role.
    ///
    /// # Errors
    /// - [`LaneCountError::AlreadyInitialized`] once counting has started
    /// - [`LaneCountError::WrongRole`] for a neutral lane
    /// - [`LaneCountError::DuplicateLane`] if the ID is used by any entry or
    ///   exit lane already
    pub fn add_lane(&mut self, lane: Lane) -> Result<(), LaneCountError> {
        if self.tally.is_some() {
            return Err(LaneCountError::AlreadyInitialized);
        }
        if self.entry_lanes.contains(lane.id) || self.exit_lanes.contains(lane.id) {
            return Err(LaneCountError::DuplicateLane { id: lane.id });
        }
        match lane.role {
            LaneRole::Entry => self.entry_lanes.add(lane),
            LaneRole::Exit => self.exit_lanes.add(lane),
            LaneRole::Neutral => Err(LaneCountError::WrongRole {
                id: lane.id,
                role: lane.role,
                counter: "origin-destination",
            }),
        }
    }

    /// Builds the zeroed `entry × exit × type` table. Calling it again is a
    /// no-op.
    pub fn initialize(&mut self) {
        if self.tally.is_some() {
            return;
        }
        let pairs: Vec<LanePair> = self
            .entry_lanes
            .ids()
            .flat_map(|entry| self.exit_lanes.ids().map(move |exit| (entry, exit)))
            .collect();
        self.tally = Some(TallyTable::new(pairs, &self.types));
        info!(
            entry_lanes = self.entry_lanes.len(),
            exit_lanes = self.exit_lanes.len(),
            types = self.types.len(),
            "origin-destination counter initialized"
        );
    }

    pub fn is_initialized(&self) -> bool {
        self.tally.is_some()
    }

    /// Advances every object's state machine by one frame.
    ///
    /// # Errors
    /// Returns [`LaneCountError::NotInitialized`] before
    /// [`initialize`](Self::initialize); nothing is mutated in that case.
    pub fn process(&mut self, segments: &[MotionSegment]) -> Result<FrameOutcome, LaneCountError> {
        let tally = self.tally.as_mut().ok_or(LaneCountError::NotInitialized)?;
        self.frame += 1;
        let frame = self.frame;
        let containment = self.options.containment;

        let mut outcome = FrameOutcome::default();
        for segment in segments {
            let first_crossed = |lanes: &LaneRegistry| {
                lanes
                    .iter()
                    .find(|lane| {
                        crosses(
                            segment.previous,
                            segment.current,
                            lane.boundary.start,
                            lane.boundary.end,
                            containment,
                        )
                    })
                    .map(|lane| lane.id)
            };

            match self.inside.touch(segment.object_id, frame) {
                None => {
                    if let Some(entry) = first_crossed(&self.entry_lanes) {
                        self.inside.enter(segment.object_id, entry, frame);
                        debug!(frame, object = %segment.object_id, lane = %entry, "object entered");
                        outcome.events.push(CrossingEvent::Entered {
                            object: segment.object_id,
                            object_type: segment.object_type,
                            lane: entry,
                        });
                    }
                }
                Some(entry) => {
                    let Some(exit) = first_crossed(&self.exit_lanes) else {
                        continue;
                    };
                    self.inside.leave(segment.object_id);

                    if self.types.contains(segment.object_type) {
                        tally.increment((entry, exit), segment.object_type);
                        debug!(
                            frame,
                            object = %segment.object_id,
                            entry = %entry,
                            exit = %exit,
                            "trip completed"
                        );
                        outcome.events.push(CrossingEvent::Completed {
                            object: segment.object_id,
                            object_type: segment.object_type,
                            entry,
                            exit,
                        });
                    } else {
                        tally.record_unclassified((entry, exit));
                        warn!(
                            frame,
                            object = %segment.object_id,
                            object_type = %segment.object_type,
                            entry = %entry,
                            exit = %exit,
                            "trip by unclassified object type excluded from counts"
                        );
                        outcome.events.push(CrossingEvent::Unclassified {
                            object: segment.object_id,
                            object_type: segment.object_type,
                            entry: Some(entry),
                            lane: exit,
                        });
                    }
                }
            }
        }

        if let Some(max_unseen) = self.options.max_unseen_frames {
            let evicted = self.inside.evict_stale(frame, max_unseen);
            for id in &evicted {
                debug!(frame, object = %id, max_unseen, "evicted object after track loss");
            }
            outcome.evicted = evicted;
        }

        Ok(outcome)
    }

    /// Snapshot of the trip table. Empty before initialization.
    pub fn counts(&self) -> TallyTable<LanePair> {
        self.tally.clone().unwrap_or_default()
    }

    /// Completed trips excluded because of an unknown object type.
    pub fn unclassified(&self) -> u64 {
        self.tally
            .as_ref()
            .map_or(0, TallyTable::total_unclassified)
    }

    /// Zeroes all counts and forgets every object currently inside.
    pub fn reset(&mut self) {
        if let Some(tally) = self.tally.as_mut() {
            tally.reset();
        }
        self.inside.clear();
    }

    /// Returns true if `object` has entered and not yet exited.
    pub fn is_inside(&self, object: ObjectId) -> bool {
        self.inside.contains(object)
    }

    /// Membership record of an inside object.
    pub fn membership(&self, object: ObjectId) -> Option<&Membership> {
        self.inside.get(object)
    }

    /// Number of objects currently inside.
    pub fn inside_count(&self) -> usize {
        self.inside.len()
    }

    /// IDs currently inside, in ascending order.
    pub fn inside_ids(&self) -> Vec<ObjectId> {
        self.inside.ids()
    }

    pub fn entry_lanes(&self) -> &LaneRegistry {
        &self.entry_lanes
    }

    pub fn exit_lanes(&self) -> &LaneRegistry {
        &self.exit_lanes
    }

    pub fn types(&self) -> &TypeDictionary {
        &self.types
    }

    /// Number of frames processed since construction.
    pub fn frames_processed(&self) -> u64 {
        self.frame
    }
}
