//! Newtype IDs for lanes, tracked objects and object types.
//!
//! Using newtypes prevents accidentally mixing up different kinds of IDs
//! (e.g., passing a tracker's object ID where a lane ID is expected).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A unique identifier for a lane within one counter configuration.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaneId(pub u64);

impl LaneId {
    /// Creates a new LaneId.
    #[inline]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value.
    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LaneId({})", self.0)
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for LaneId {
    fn from(id: u64) -> Self {
        LaneId::new(id)
    }
}

/// The tracker-assigned identity of a moving object.
///
/// Stable across frames for as long as the upstream tracker keeps the track.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl ObjectId {
    /// Creates a new ObjectId.
    #[inline]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value.
    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ObjectId {
    fn from(id: u64) -> Self {
        ObjectId::new(id)
    }
}

/// A detector class code (e.g. the index of "car" in the model's labels).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeCode(pub u32);

impl TypeCode {
    /// Creates a new TypeCode.
    #[inline]
    pub fn new(code: u32) -> Self {
        Self(code)
    }

    /// Returns the underlying u32 value.
    #[inline]
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeCode({})", self.0)
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TypeCode {
    fn from(code: u32) -> Self {
        TypeCode::new(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_equality() {
        assert_eq!(LaneId(1), LaneId(1));
        assert_ne!(LaneId(1), LaneId(2));
    }

    #[test]
    fn test_id_ordering() {
        assert!(LaneId(1) < LaneId(2));
        assert!(TypeCode(10) > TypeCode(5));
    }

    #[test]
    fn test_id_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(ObjectId(1));
        set.insert(ObjectId(2));
        set.insert(ObjectId(1)); // duplicate
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_ids_serialize_transparently() {
        assert_eq!(serde_json::to_string(&LaneId(7)).expect("serialize"), "7");
        let code: TypeCode = serde_json::from_str("3").expect("parse");
        assert_eq!(code, TypeCode(3));
    }
}
