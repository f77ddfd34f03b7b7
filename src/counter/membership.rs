//! Per-object "inside the monitored region" state for trip matching.

use std::collections::HashMap;

use crate::model::{LaneId, ObjectId};

/// Record kept for an object that crossed an entry lane and has not exited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Membership {
    /// The entry lane the object crossed.
    pub entry_lane: LaneId,
    /// Frame index of the entry crossing.
    pub entered_frame: u64,
    /// Last frame the tracker reported this object.
    pub last_seen_frame: u64,
}

/// Objects currently inside, keyed by tracker ID.
///
/// Each ID appears at most once: [`MembershipState::enter`] refuses an ID
/// that is already present.
#[derive(Clone, Debug, Default)]
pub struct MembershipState {
    inside: HashMap<ObjectId, Membership>,
}

impl MembershipState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entry. Returns false if the object is already inside.
    pub fn enter(&mut self, object: ObjectId, entry_lane: LaneId, frame: u64) -> bool {
        if self.inside.contains_key(&object) {
            return false;
        }
        self.inside.insert(
            object,
            Membership {
                entry_lane,
                entered_frame: frame,
                last_seen_frame: frame,
            },
        );
        true
    }

    /// Marks an inside object as seen in `frame`. Returns its entry lane.
    pub fn touch(&mut self, object: ObjectId, frame: u64) -> Option<LaneId> {
        self.inside.get_mut(&object).map(|membership| {
            membership.last_seen_frame = frame;
            membership.entry_lane
        })
    }

    /// Removes an object, returning its record if it was inside.
    pub fn leave(&mut self, object: ObjectId) -> Option<Membership> {
        self.inside.remove(&object)
    }

    pub fn get(&self, object: ObjectId) -> Option<&Membership> {
        self.inside.get(&object)
    }

    pub fn contains(&self, object: ObjectId) -> bool {
        self.inside.contains_key(&object)
    }

    /// Drops every object unseen for more than `max_unseen` frames as of
    /// `frame`. Returns the evicted IDs in ascending order.
    pub fn evict_stale(&mut self, frame: u64, max_unseen: u64) -> Vec<ObjectId> {
        let mut evicted: Vec<ObjectId> = self
            .inside
            .iter()
            .filter(|(_, m)| frame.saturating_sub(m.last_seen_frame) > max_unseen)
            .map(|(id, _)| *id)
            .collect();
        evicted.sort_unstable();
        for id in &evicted {
            self.inside.remove(id);
        }
        evicted
    }

    /// IDs currently inside, in ascending order.
    pub fn ids(&self) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self.inside.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn clear(&mut self) {
        self.inside.clear();
    }

    pub fn len(&self) -> usize {
        self.inside.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inside.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_is_insert_if_absent() {
        let mut state = MembershipState::new();
        assert!(state.enter(ObjectId(7), LaneId(1), 1));
        assert!(!state.enter(ObjectId(7), LaneId(2), 2));
        assert_eq!(state.len(), 1);
        assert_eq!(state.get(ObjectId(7)).map(|m| m.entry_lane), Some(LaneId(1)));
    }

    #[test]
    fn test_touch_and_leave() {
        let mut state = MembershipState::new();
        state.enter(ObjectId(7), LaneId(1), 1);
        assert_eq!(state.touch(ObjectId(7), 4), Some(LaneId(1)));
        assert_eq!(state.get(ObjectId(7)).map(|m| m.last_seen_frame), Some(4));
        assert_eq!(state.touch(ObjectId(8), 4), None);
        let left = state.leave(ObjectId(7)).expect("was inside");
        assert_eq!(left.entered_frame, 1);
        assert!(state.is_empty());
        assert!(state.leave(ObjectId(7)).is_none());
    }

    #[test]
    fn test_evict_stale_boundary() {
        let mut state = MembershipState::new();
        state.enter(ObjectId(1), LaneId(1), 10);
        state.enter(ObjectId(2), LaneId(1), 12);
        // 13 - 10 = 3, not more than 3
        assert!(state.evict_stale(13, 3).is_empty());
        // 14 - 10 = 4 > 3
        assert_eq!(state.evict_stale(14, 3), vec![ObjectId(1)]);
        assert!(state.contains(ObjectId(2)));
    }
}
