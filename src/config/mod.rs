//! Persisted counter configuration.
//!
//! A configuration describes one counter: its lanes, the object type
//! dictionary, and the counting options. It is read from JSON, or from YAML
//! when the file extension is `.yaml`/`.yml`.
//!
//! ```json
//! {
//!   "id": 1,
//!   "name": "junction-north",
//!   "types": { "car": 2, "bus": 5 },
//!   "lanes": [
//!     { "id": 1, "name": "in-west",  "role": "entry", "boundary": [[0, 0], [0, 10]] },
//!     { "id": 2, "name": "out-east", "role": "exit",  "boundary": [[20, 0], [20, 10]] }
//!   ]
//! }
//! ```

pub mod io;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::counter::{Counter, CounterKind, CounterOptions, DEFAULT_MAX_UNSEEN_FRAMES};
use crate::error::LaneCountError;
use crate::geom::Containment;
use crate::model::{Lane, TypeCode, TypeDictionary};

/// The on-disk description of one counter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CounterConfig {
    /// Counter identifier, for reports.
    #[serde(default)]
    pub id: u64,

    /// Counter name, for reports.
    #[serde(default)]
    pub name: String,

    /// Explicit strategy. When absent it is inferred from the lane roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CounterKind>,

    /// Crossing containment policy.
    #[serde(default)]
    pub containment: Containment,

    /// Track-loss eviction threshold; `null` disables eviction.
    #[serde(default = "default_max_unseen_frames")]
    pub max_unseen_frames: Option<u64>,

    /// Detector class name -> type code.
    #[serde(default)]
    pub types: BTreeMap<String, TypeCode>,

    /// Lanes in test order.
    #[serde(default)]
    pub lanes: Vec<Lane>,
}

fn default_max_unseen_frames() -> Option<u64> {
    Some(DEFAULT_MAX_UNSEEN_FRAMES)
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            kind: None,
            containment: Containment::default(),
            max_unseen_frames: default_max_unseen_frames(),
            types: BTreeMap::new(),
            lanes: Vec::new(),
        }
    }
}

impl CounterConfig {
    /// The counting options described by this configuration.
    pub fn options(&self) -> CounterOptions {
        CounterOptions {
            containment: self.containment,
            max_unseen_frames: self.max_unseen_frames,
        }
    }

    /// Builds the immutable type dictionary.
    ///
    /// # Errors
    /// Returns [`LaneCountError::DuplicateTypeCode`] if two names share a code.
    pub fn type_dictionary(&self) -> Result<TypeDictionary, LaneCountError> {
        TypeDictionary::from_pairs(self.types.iter().map(|(name, code)| (name.clone(), *code)))
    }

    /// The strategy this configuration selects, explicit or inferred.
    pub fn resolved_kind(&self) -> Result<CounterKind, LaneCountError> {
        match self.kind {
            Some(kind) => Ok(kind),
            None => CounterKind::infer(&self.lanes),
        }
    }

    /// Builds an initialized counter from this configuration.
    ///
    /// # Errors
    /// Any configuration error: duplicate type codes, duplicate lane IDs,
    /// mixed roles, or roles that contradict an explicit `kind`.
    pub fn build_counter(&self) -> Result<Counter, LaneCountError> {
        let types = self.type_dictionary()?;
        let kind = self.resolved_kind()?;
        Counter::with_kind(kind, self.lanes.iter().cloned(), types, self.options())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Segment;
    use crate::model::LaneRole;

    fn od_config() -> CounterConfig {
        CounterConfig {
            id: 1,
            name: "junction".into(),
            types: BTreeMap::from([("car".to_string(), TypeCode(2))]),
            lanes: vec![
                Lane::entry(1u64, "in", Segment::new((0, 0), (0, 10))),
                Lane::exit(2u64, "out", Segment::new((20, 0), (20, 10))),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_when_fields_missing() {
        let config: CounterConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(config, CounterConfig::default());
        assert_eq!(config.max_unseen_frames, Some(DEFAULT_MAX_UNSEEN_FRAMES));
    }

    #[test]
    fn test_null_disables_eviction() {
        let config: CounterConfig =
            serde_json::from_str(r#"{"max_unseen_frames": null}"#).expect("parse");
        assert_eq!(config.options().max_unseen_frames, None);
    }

    #[test]
    fn test_build_counter_infers_kind() {
        let counter = od_config().build_counter().expect("build");
        assert_eq!(counter.kind(), CounterKind::OriginDestination);
    }

    #[test]
    fn test_explicit_kind_must_match_roles() {
        let mut config = od_config();
        config.kind = Some(CounterKind::Simple);
        let err = config.build_counter().unwrap_err();
        assert!(matches!(
            err,
            LaneCountError::WrongRole { role: LaneRole::Entry, .. }
        ));
    }

    #[test]
    fn test_legacy_numeric_roles() {
        let config: CounterConfig = serde_json::from_str(
            r#"{"lanes": [
                {"id": 1, "name": "a", "role": 1, "boundary": [[0, 0], [0, 10]]},
                {"id": 2, "name": "b", "role": 2, "boundary": [[9, 0], [9, 10]]}
            ]}"#,
        )
        .expect("parse");
        assert_eq!(config.resolved_kind().expect("kind"), CounterKind::OriginDestination);
    }
}
