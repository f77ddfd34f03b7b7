//! Lane definitions and the registry that owns them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::ids::LaneId;
use crate::error::LaneCountError;
use crate::geom::Segment;

/// The directional role of a lane.
///
/// Persisted configurations have historically encoded the role as a number
/// (`0` neutral, `1` entry, `2` exit); both that form and the lowercase name
/// are accepted when deserializing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LaneRole {
    /// Counted on its own by the simple counter.
    #[default]
    Neutral,
    /// Where an origin–destination trip starts.
    Entry,
    /// Where an origin–destination trip ends.
    Exit,
}

impl LaneRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Entry => "entry",
            Self::Exit => "exit",
        }
    }

    /// Maps the legacy numeric role code.
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Self::Neutral),
            1 => Some(Self::Entry),
            2 => Some(Self::Exit),
            _ => None,
        }
    }
}

impl fmt::Display for LaneRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LaneRole {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RoleData {
            Code(u64),
            Name(String),
        }

        match RoleData::deserialize(deserializer)? {
            RoleData::Code(code) => LaneRole::from_code(code)
                .ok_or_else(|| D::Error::custom(format!("invalid lane role code {code}"))),
            RoleData::Name(name) => match name.to_ascii_lowercase().as_str() {
                "neutral" => Ok(LaneRole::Neutral),
                "entry" | "in" => Ok(LaneRole::Entry),
                "exit" | "out" => Ok(LaneRole::Exit),
                other => Err(D::Error::custom(format!(
                    "invalid lane role '{other}' (expected neutral, entry or exit)"
                ))),
            },
        }
    }
}

/// A boundary line that objects are checked against for crossings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    /// Unique identifier for this lane.
    pub id: LaneId,

    /// Human-readable name (e.g. "north-in").
    #[serde(default)]
    pub name: String,

    /// Directional role.
    #[serde(default)]
    pub role: LaneRole,

    /// The boundary segment in image coordinates.
    pub boundary: Segment,
}

impl Lane {
    /// Creates a new lane.
    pub fn new(
        id: impl Into<LaneId>,
        name: impl Into<String>,
        role: LaneRole,
        boundary: Segment,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            boundary,
        }
    }

    /// Creates a lane with the [`LaneRole::Neutral`] role.
    pub fn neutral(id: impl Into<LaneId>, name: impl Into<String>, boundary: Segment) -> Self {
        Self::new(id, name, LaneRole::Neutral, boundary)
    }

    /// Creates a lane with the [`LaneRole::Entry`] role.
    pub fn entry(id: impl Into<LaneId>, name: impl Into<String>, boundary: Segment) -> Self {
        Self::new(id, name, LaneRole::Entry, boundary)
    }

    /// Creates a lane with the [`LaneRole::Exit`] role.
    pub fn exit(id: impl Into<LaneId>, name: impl Into<String>, boundary: Segment) -> Self {
        Self::new(id, name, LaneRole::Exit, boundary)
    }
}

/// An ordered collection of lanes with unique IDs.
///
/// Insertion order is preserved and is the order in which lanes are tested
/// against each motion segment.
#[derive(Clone, Debug, Default)]
pub struct LaneRegistry {
    lanes: Vec<Lane>,
    index: HashMap<LaneId, usize>,
}

impl LaneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a lane.
    ///
    /// # Errors
    /// Returns [`LaneCountError::DuplicateLane`] if a lane with the same ID
    /// is already registered; the registry is left unchanged.
    pub fn add(&mut self, lane: Lane) -> Result<(), LaneCountError> {
        if self.index.contains_key(&lane.id) {
            return Err(LaneCountError::DuplicateLane { id: lane.id });
        }
        self.index.insert(lane.id, self.lanes.len());
        self.lanes.push(lane);
        Ok(())
    }

    pub fn get(&self, id: LaneId) -> Option<&Lane> {
        self.index.get(&id).map(|&idx| &self.lanes[idx])
    }

    pub fn contains(&self, id: LaneId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Lane> {
        self.lanes.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = LaneId> + '_ {
        self.lanes.iter().map(|lane| lane.id)
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }
}

impl<'a> IntoIterator for &'a LaneRegistry {
    type Item = &'a Lane;
    type IntoIter = std::slice::Iter<'a, Lane>;

    fn into_iter(self) -> Self::IntoIter {
        self.lanes.iter()
    }
}
