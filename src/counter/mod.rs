//! Crossing counters.
//!
//! Two counting strategies share the geometry kernel:
//!
//! - [`SimpleCounter`] counts every crossing of every lane, per lane and type.
//! - [`OriginDestinationCounter`] pairs entry and exit crossings of the same
//!   object and counts completed trips per `(entry, exit, type)`.
//!
//! [`Counter`] selects one of them once, from the roles of the configured
//! lanes, and forwards the common operations. [`SharedCounter`] puts a
//! counter behind a single mutex for deployments that read counts from a
//! different thread than the one feeding frames.
//!
//! # Example
//!
//! ```
//! use lanecount::counter::{Counter, CounterKind, CounterOptions};
//! use lanecount::geom::Segment;
//! use lanecount::model::{Lane, LaneId, MotionSegment, TypeCode, TypeDictionary};
//!
//! let types = TypeDictionary::from_pairs([("car", TypeCode(2))]).unwrap();
//! let lanes = vec![Lane::neutral(1u64, "gate", Segment::new((0, 0), (0, 10)))];
//! let mut counter = Counter::from_lanes(lanes, types, CounterOptions::default()).unwrap();
//! assert_eq!(counter.kind(), CounterKind::Simple);
//!
//! counter
//!     .process(&[MotionSegment::new(7u64, 2u32, (-1, 5), (1, 5))])
//!     .unwrap();
//! assert_eq!(counter.counts().total(), 1);
//! ```

mod membership;
mod origin_destination;
mod simple;
mod tally;

pub use membership::{Membership, MembershipState};
pub use origin_destination::{LanePair, OriginDestinationCounter};
pub use simple::SimpleCounter;
pub use tally::TallyTable;

use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::LaneCountError;
use crate::geom::Containment;
use crate::model::{Lane, LaneId, LaneRole, MotionSegment, ObjectId, TypeCode, TypeDictionary};

/// Frames an inside object may go unreported before it is evicted
/// (three seconds at 30 fps).
pub const DEFAULT_MAX_UNSEEN_FRAMES: u64 = 90;

/// Tunables shared by both counter strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterOptions {
    /// Segment containment policy used by the crossing test.
    pub containment: Containment,

    /// Track-loss eviction threshold for the origin–destination counter.
    /// `None` keeps inside objects until they exit.
    pub max_unseen_frames: Option<u64>,
}

impl Default for CounterOptions {
    fn default() -> Self {
        Self {
            containment: Containment::default(),
            max_unseen_frames: Some(DEFAULT_MAX_UNSEEN_FRAMES),
        }
    }
}

/// Which counting strategy a configuration uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterKind {
    /// Per-lane counting over neutral lanes.
    Simple,
    /// Trip counting over entry and exit lanes.
    OriginDestination,
}

impl CounterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::OriginDestination => "origin-destination",
        }
    }

    /// Derives the strategy from lane roles.
    ///
    /// All-neutral (or empty) selects [`CounterKind::Simple`]; only entry and
    /// exit lanes select [`CounterKind::OriginDestination`].
    ///
    /// # Errors
    /// Returns [`LaneCountError::MixedRoles`] if neutral lanes are mixed with
    /// entry or exit lanes.
    pub fn infer<'a>(lanes: impl IntoIterator<Item = &'a Lane>) -> Result<Self, LaneCountError> {
        let mut neutral = false;
        let mut directed = false;
        for lane in lanes {
            match lane.role {
                LaneRole::Neutral => neutral = true,
                LaneRole::Entry | LaneRole::Exit => directed = true,
            }
        }
        match (neutral, directed) {
            (true, true) => Err(LaneCountError::MixedRoles),
            (_, true) => Ok(Self::OriginDestination),
            _ => Ok(Self::Simple),
        }
    }
}

impl fmt::Display for CounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that happened while processing one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrossingEvent {
    /// A lane crossing was counted by the simple counter.
    Counted {
        object: ObjectId,
        object_type: TypeCode,
        lane: LaneId,
    },
    /// An object crossed an entry lane and is now inside.
    Entered {
        object: ObjectId,
        object_type: TypeCode,
        lane: LaneId,
    },
    /// An inside object crossed an exit lane; one trip was counted.
    Completed {
        object: ObjectId,
        object_type: TypeCode,
        entry: LaneId,
        exit: LaneId,
    },
    /// A crossing (or completed trip, when `entry` is set) was detected but
    /// excluded from the counts because the type is not in the dictionary.
    Unclassified {
        object: ObjectId,
        object_type: TypeCode,
        entry: Option<LaneId>,
        lane: LaneId,
    },
}

/// Result of one `process` call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Crossing events in processing order.
    pub events: Vec<CrossingEvent>,
    /// Objects dropped from the inside set because their track was lost.
    pub evicted: Vec<ObjectId>,
}

impl FrameOutcome {
    /// Number of unclassified events in this frame.
    pub fn unclassified(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, CrossingEvent::Unclassified { .. }))
            .count()
    }
}

/// A point-in-time copy of a counter's tallies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CountSnapshot {
    Simple(TallyTable<LaneId>),
    OriginDestination(TallyTable<LanePair>),
}

impl CountSnapshot {
    pub fn kind(&self) -> CounterKind {
        match self {
            Self::Simple(_) => CounterKind::Simple,
            Self::OriginDestination(_) => CounterKind::OriginDestination,
        }
    }

    /// Sum of every typed cell.
    pub fn total(&self) -> u64 {
        match self {
            Self::Simple(table) => table.total(),
            Self::OriginDestination(table) => table.total(),
        }
    }

    /// Sum of the unclassified column.
    pub fn total_unclassified(&self) -> u64 {
        match self {
            Self::Simple(table) => table.total_unclassified(),
            Self::OriginDestination(table) => table.total_unclassified(),
        }
    }

    pub fn as_simple(&self) -> Option<&TallyTable<LaneId>> {
        match self {
            Self::Simple(table) => Some(table),
            Self::OriginDestination(_) => None,
        }
    }

    pub fn as_origin_destination(&self) -> Option<&TallyTable<LanePair>> {
        match self {
            Self::Simple(_) => None,
            Self::OriginDestination(table) => Some(table),
        }
    }
}

/// One of the two counting strategies, chosen once at construction.
#[derive(Clone, Debug)]
pub enum Counter {
    Simple(SimpleCounter),
    OriginDestination(OriginDestinationCounter),
}

impl Counter {
    /// Builds and initializes the strategy implied by the lane roles.
    ///
    /// # Errors
    /// Propagates role and duplicate-ID errors; see [`CounterKind::infer`].
    pub fn from_lanes(
        lanes: impl IntoIterator<Item = Lane>,
        types: TypeDictionary,
        options: CounterOptions,
    ) -> Result<Self, LaneCountError> {
        let lanes: Vec<Lane> = lanes.into_iter().collect();
        let kind = CounterKind::infer(&lanes)?;
        Self::with_kind(kind, lanes, types, options)
    }

    /// Builds and initializes a counter of an explicit kind.
    ///
    /// # Errors
    /// - [`LaneCountError::WrongRole`] if a lane's role does not fit `kind`
    /// - [`LaneCountError::DuplicateLane`] for repeated lane IDs
    pub fn with_kind(
        kind: CounterKind,
        lanes: impl IntoIterator<Item = Lane>,
        types: TypeDictionary,
        options: CounterOptions,
    ) -> Result<Self, LaneCountError> {
        let mut counter = match kind {
            CounterKind::Simple => {
                let mut simple = SimpleCounter::new(types, options);
                for lane in lanes {
                    if lane.role != LaneRole::Neutral {
                        return Err(LaneCountError::WrongRole {
                            id: lane.id,
                            role: lane.role,
                            counter: "simple",
                        });
                    }
                    simple.add_lane(lane)?;
                }
                Counter::Simple(simple)
            }
            CounterKind::OriginDestination => {
                let mut od = OriginDestinationCounter::new(types, options);
                for lane in lanes {
                    od.add_lane(lane)?;
                }
                Counter::OriginDestination(od)
            }
        };
        counter.initialize();
        info!(kind = %kind, "counter ready");
        Ok(counter)
    }

    pub fn kind(&self) -> CounterKind {
        match self {
            Self::Simple(_) => CounterKind::Simple,
            Self::OriginDestination(_) => CounterKind::OriginDestination,
        }
    }

    /// Initializes the underlying strategy. A no-op if already initialized.
    pub fn initialize(&mut self) {
        match self {
            Self::Simple(c) => c.initialize(),
            Self::OriginDestination(c) => c.initialize(),
        }
    }

    /// Processes one frame's motion segments.
    pub fn process(&mut self, segments: &[MotionSegment]) -> Result<FrameOutcome, LaneCountError> {
        match self {
            Self::Simple(c) => c.process(segments),
            Self::OriginDestination(c) => c.process(segments),
        }
    }

    /// Snapshot of the current tallies.
    pub fn counts(&self) -> CountSnapshot {
        match self {
            Self::Simple(c) => CountSnapshot::Simple(c.counts()),
            Self::OriginDestination(c) => CountSnapshot::OriginDestination(c.counts()),
        }
    }

    pub fn unclassified(&self) -> u64 {
        match self {
            Self::Simple(c) => c.unclassified(),
            Self::OriginDestination(c) => c.unclassified(),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Self::Simple(c) => c.reset(),
            Self::OriginDestination(c) => c.reset(),
        }
    }

    /// Every configured lane; entry lanes before exit lanes for the
    /// origin–destination strategy.
    pub fn lanes(&self) -> Vec<&Lane> {
        match self {
            Self::Simple(c) => c.lanes().iter().collect(),
            Self::OriginDestination(c) => c
                .entry_lanes()
                .iter()
                .chain(c.exit_lanes().iter())
                .collect(),
        }
    }

    pub fn types(&self) -> &TypeDictionary {
        match self {
            Self::Simple(c) => c.types(),
            Self::OriginDestination(c) => c.types(),
        }
    }

    pub fn frames_processed(&self) -> u64 {
        match self {
            Self::Simple(c) => c.frames_processed(),
            Self::OriginDestination(c) => c.frames_processed(),
        }
    }
}

/// A [`Counter`] behind a mutex.
///
/// Every `process` call runs to completion under the lock, so a concurrent
/// [`snapshot`](Self::snapshot) observes either all or none of a frame's
/// updates.
#[derive(Debug)]
pub struct SharedCounter {
    inner: Mutex<Counter>,
}

impl SharedCounter {
    pub fn new(counter: Counter) -> Self {
        Self {
            inner: Mutex::new(counter),
        }
    }

    pub fn process(&self, segments: &[MotionSegment]) -> Result<FrameOutcome, LaneCountError> {
        self.inner
            .lock()
            .map_err(|_| LaneCountError::Poisoned)?
            .process(segments)
    }

    /// A consistent copy of the tallies.
    pub fn snapshot(&self) -> Result<CountSnapshot, LaneCountError> {
        Ok(self
            .inner
            .lock()
            .map_err(|_| LaneCountError::Poisoned)?
            .counts())
    }

    pub fn reset(&self) -> Result<(), LaneCountError> {
        self.inner
            .lock()
            .map_err(|_| LaneCountError::Poisoned)?
            .reset();
        Ok(())
    }

    pub fn into_inner(self) -> Result<Counter, LaneCountError> {
        self.inner.into_inner().map_err(|_| LaneCountError::Poisoned)
    }
}

impl From<Counter> for SharedCounter {
    fn from(counter: Counter) -> Self {
        Self::new(counter)
    }
}
