//! Count reports for external reporting and rendering collaborators.
//!
//! A [`CountReport`] is a read-only, self-describing copy of a counter's
//! tallies: lane and type names are resolved, and rows are ordered by lane
//! key then type code. It renders as text (Display), JSON or CSV and makes no
//! claims about on-screen layout.

use serde::Serialize;
use std::fmt;

use crate::counter::{CountSnapshot, Counter, CounterKind};
use crate::error::LaneCountError;
use crate::model::{LaneId, TypeCode, TypeDictionary};

/// Type name used for rows that count crossings of unknown type.
pub const UNCLASSIFIED: &str = "unclassified";

/// A rendered snapshot of one counter.
#[derive(Clone, Debug, Serialize)]
pub struct CountReport {
    /// Counter identifier from the configuration.
    pub counter_id: u64,
    /// Counter name from the configuration.
    pub counter_name: String,
    /// Strategy that produced the counts.
    pub kind: CounterKind,
    /// Frames processed so far.
    pub frames: u64,
    /// Sum of all typed counts.
    pub total: u64,
    /// Crossings excluded because of an unknown type.
    pub unclassified: u64,
    /// One row per `(lane key, type)`, plus non-zero unclassified rows.
    pub entries: Vec<CountEntry>,
}

/// One row of a count report.
///
/// Exactly one of `lane` or the `entry_lane`/`exit_lane` pair is set,
/// depending on the counter kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub entry_lane: Option<u64>,
    pub exit_lane: Option<u64>,
    pub lane: Option<u64>,
    /// Human-readable lane key (`"north"` or `"west -> east"`).
    pub lane_name: String,
    /// `None` for the unclassified row.
    pub type_code: Option<u32>,
    pub type_name: String,
    pub count: u64,
}

impl CountReport {
    /// Builds a report from the counter's current state.
    pub fn from_counter(counter: &Counter, counter_id: u64, counter_name: impl Into<String>) -> Self {
        let lane_name = |id: LaneId| -> String {
            counter
                .lanes()
                .into_iter()
                .find(|lane| lane.id == id)
                .filter(|lane| !lane.name.is_empty())
                .map(|lane| lane.name.clone())
                .unwrap_or_else(|| format!("lane {}", id))
        };
        let types = counter.types();
        let snapshot = counter.counts();

        let mut entries = Vec::new();
        match &snapshot {
            CountSnapshot::Simple(table) => {
                for key in table.keys() {
                    let row = |type_code, type_name: String, count| CountEntry {
                        entry_lane: None,
                        exit_lane: None,
                        lane: Some(key.as_u64()),
                        lane_name: lane_name(key),
                        type_code,
                        type_name,
                        count,
                    };
                    for code in types.codes() {
                        let count = table.get(key, code).unwrap_or(0);
                        entries.push(row(Some(code.as_u32()), type_name(types, code), count));
                    }
                    let unclassified = table.unclassified(key).unwrap_or(0);
                    if unclassified > 0 {
                        entries.push(row(None, UNCLASSIFIED.to_string(), unclassified));
                    }
                }
            }
            CountSnapshot::OriginDestination(table) => {
                for key @ (entry, exit) in table.keys() {
                    let row = |type_code, type_name: String, count| CountEntry {
                        entry_lane: Some(entry.as_u64()),
                        exit_lane: Some(exit.as_u64()),
                        lane: None,
                        lane_name: format!("{} -> {}", lane_name(entry), lane_name(exit)),
                        type_code,
                        type_name,
                        count,
                    };
                    for code in types.codes() {
                        let count = table.get(key, code).unwrap_or(0);
                        entries.push(row(Some(code.as_u32()), type_name(types, code), count));
                    }
                    let unclassified = table.unclassified(key).unwrap_or(0);
                    if unclassified > 0 {
                        entries.push(row(None, UNCLASSIFIED.to_string(), unclassified));
                    }
                }
            }
        }

        Self {
            counter_id,
            counter_name: counter_name.into(),
            kind: counter.kind(),
            frames: counter.frames_processed(),
            total: snapshot.total(),
            unclassified: snapshot.total_unclassified(),
            entries,
        }
    }

    /// The count for a lane key and type name, if that row exists.
    pub fn count_for(&self, lane_name: &str, type_name: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.lane_name == lane_name && e.type_name == type_name)
            .map(|e| e.count)
    }

    /// Pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, LaneCountError> {
        serde_json::to_string_pretty(self).map_err(|source| LaneCountError::ReportJsonWrite { source })
    }

    /// CSV with a header row and one line per entry.
    pub fn to_csv_string(&self) -> Result<String, LaneCountError> {
        let mut csv_writer = csv::Writer::from_writer(Vec::new());
        for entry in &self.entries {
            csv_writer
                .serialize(entry)
                .map_err(|source| LaneCountError::ReportCsvWrite { source })?;
        }

        let bytes = csv_writer
            .into_inner()
            .map_err(|e| LaneCountError::Io(e.into_error()))?;

        String::from_utf8(bytes).map_err(|e| {
            LaneCountError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }
}

fn type_name(types: &TypeDictionary, code: TypeCode) -> String {
    types
        .name_of(code)
        .map(str::to_string)
        .unwrap_or_else(|| format!("type {}", code))
}

impl fmt::Display for CountReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = if self.counter_name.is_empty() {
            format!("Counter {}", self.counter_id)
        } else {
            format!("Counter {} '{}'", self.counter_id, self.counter_name)
        };
        writeln!(f, "{} ({}), {} frame(s)", title, self.kind, self.frames)?;
        writeln!(
            f,
            "Total: {} counted, {} unclassified",
            self.total, self.unclassified
        )?;

        let width = self
            .entries
            .iter()
            .map(|e| e.type_name.len())
            .max()
            .unwrap_or(0);

        let mut current: Option<&str> = None;
        for entry in &self.entries {
            if current != Some(entry.lane_name.as_str()) {
                writeln!(f)?;
                writeln!(f, "  {}", entry.lane_name)?;
                current = Some(entry.lane_name.as_str());
            }
            writeln!(
                f,
                "    {:<width$}  {:>6}",
                entry.type_name,
                entry.count,
                width = width
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::CounterOptions;
    use crate::geom::Segment;
    use crate::model::{Lane, MotionSegment};

    fn types() -> TypeDictionary {
        TypeDictionary::from_pairs([("car", TypeCode(2)), ("bus", TypeCode(5))]).expect("types")
    }

    fn od_counter() -> Counter {
        let lanes = vec![
            Lane::entry(1u64, "west", Segment::new((0, 0), (0, 10))),
            Lane::exit(2u64, "east", Segment::new((20, 0), (20, 10))),
        ];
        let mut counter =
            Counter::from_lanes(lanes, types(), CounterOptions::default()).expect("counter");
        counter
            .process(&[MotionSegment::new(7u64, 2u32, (-1, 5), (1, 5))])
            .expect("enter");
        counter
            .process(&[MotionSegment::new(7u64, 2u32, (19, 5), (21, 5))])
            .expect("exit");
        counter
    }

    #[test]
    fn test_origin_destination_rows() {
        let report = CountReport::from_counter(&od_counter(), 4, "junction");
        assert_eq!(report.kind, CounterKind::OriginDestination);
        assert_eq!(report.frames, 2);
        assert_eq!(report.total, 1);
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.count_for("west -> east", "car"), Some(1));
        assert_eq!(report.count_for("west -> east", "bus"), Some(0));
        assert_eq!(report.entries[0].entry_lane, Some(1));
        assert_eq!(report.entries[0].lane, None);
    }

    #[test]
    fn test_unclassified_row_only_when_nonzero() {
        let lanes = vec![Lane::neutral(1u64, "", Segment::new((0, 0), (0, 10)))];
        let mut counter =
            Counter::from_lanes(lanes, types(), CounterOptions::default()).expect("counter");
        let report = CountReport::from_counter(&counter, 1, "");
        assert!(report.entries.iter().all(|e| e.type_code.is_some()));

        counter
            .process(&[MotionSegment::new(1u64, 99u32, (-1, 5), (1, 5))])
            .expect("frame");
        let report = CountReport::from_counter(&counter, 1, "");
        assert_eq!(report.unclassified, 1);
        assert_eq!(report.count_for("lane 1", UNCLASSIFIED), Some(1));
    }

    #[test]
    fn test_text_rendering() {
        let text = CountReport::from_counter(&od_counter(), 4, "junction").to_string();
        assert!(text.starts_with("Counter 4 'junction' (origin-destination), 2 frame(s)"));
        assert!(text.contains("Total: 1 counted, 0 unclassified"));
        assert!(text.contains("  west -> east\n"));
    }

    #[test]
    fn test_csv_rendering() {
        let csv = CountReport::from_counter(&od_counter(), 4, "junction")
            .to_csv_string()
            .expect("csv");
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("entry_lane,exit_lane,lane,lane_name,type_code,type_name,count")
        );
        assert_eq!(lines.next(), Some("1,2,,west -> east,2,car,1"));
        assert_eq!(lines.next(), Some("1,2,,west -> east,5,bus,0"));
    }

    #[test]
    fn test_json_rendering() {
        let json = CountReport::from_counter(&od_counter(), 4, "junction")
            .to_json_string()
            .expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["kind"], "origin_destination");
        assert_eq!(value["total"], 1);
        assert_eq!(value["entries"][0]["type_name"], "car");
    }
}
