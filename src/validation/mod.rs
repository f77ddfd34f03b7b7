//! Counter configuration validation.
//!
//! This module checks a [`CounterConfig`] before a counter is built from it:
//! - Structural integrity (unique lane IDs, unique type codes)
//! - Geometric validity (finite, non-degenerate boundaries)
//! - Role composition (no mixing, matches an explicit kind, both sides of an
//!   origin–destination counter present)
//! - Data quality (names, empty dictionaries, disabled eviction)

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::collections::HashMap;

use crate::config::CounterConfig;
use crate::counter::CounterKind;
use crate::model::{LaneId, LaneRole, TypeCode};

/// Validates a counter configuration and returns a report of all issues.
///
/// A configuration with no errors is guaranteed to build with
/// [`CounterConfig::build_counter`]. Whether warnings fail a run is up to
/// the caller.
pub fn validate_config(config: &CounterConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_lanes(config, &mut report);
    validate_roles(config, &mut report);
    validate_types(config, &mut report);

    let od = config.resolved_kind().ok() == Some(CounterKind::OriginDestination);
    if od && config.max_unseen_frames.is_none() {
        report.push(
            IssueCode::EvictionDisabled,
            IssueContext::Config,
            "max_unseen_frames is null: objects whose track is lost while inside are kept forever",
        );
    }

    report
}

/// Lane identity, geometry and naming.
fn validate_lanes(config: &CounterConfig, report: &mut ValidationReport) {
    let mut first_index: HashMap<LaneId, usize> = HashMap::new();
    let mut name_owner: HashMap<&str, LaneId> = HashMap::new();

    for (idx, lane) in config.lanes.iter().enumerate() {
        let context = IssueContext::Lane {
            id: lane.id.as_u64(),
        };

        if let Some(first) = first_index.get(&lane.id) {
            report.push(
                IssueCode::DuplicateLaneId,
                context,
                format!("lane ID {} repeats the lane at index {}", lane.id, first),
            );
        } else {
            first_index.insert(lane.id, idx);
        }

        let boundary = &lane.boundary;
        if !boundary.is_finite() {
            report.push(
                IssueCode::BoundaryNotFinite,
                context,
                format!("boundary {:?} has a non-finite coordinate", boundary),
            );
        } else if boundary.is_degenerate() {
            report.push(
                IssueCode::ZeroLengthBoundary,
                context,
                format!("boundary {:?} has zero length and can never be crossed", boundary),
            );
        }

        if lane.name.is_empty() {
            report.push(IssueCode::EmptyLaneName, context, "lane has no name");
        } else if let Some(owner) = name_owner.get(lane.name.as_str()) {
            report.push(
                IssueCode::DuplicateLaneName,
                context,
                format!("name '{}' is also used by lane {}", lane.name, owner),
            );
        } else {
            name_owner.insert(&lane.name, lane.id);
        }
    }
}

/// Lane roles must fit a single counting strategy.
fn validate_roles(config: &CounterConfig, report: &mut ValidationReport) {
    let count = |role: LaneRole| config.lanes.iter().filter(|l| l.role == role).count();
    let (neutral, entry, exit) = (
        count(LaneRole::Neutral),
        count(LaneRole::Entry),
        count(LaneRole::Exit),
    );

    match config.kind {
        None if neutral > 0 && entry + exit > 0 => {
            report.push(
                IssueCode::MixedLaneRoles,
                IssueContext::Config,
                format!(
                    "{} neutral lane(s) mixed with {} entry and {} exit lane(s)",
                    neutral, entry, exit
                ),
            );
            return;
        }
        Some(kind) => {
            for lane in &config.lanes {
                let fits = match kind {
                    CounterKind::Simple => lane.role == LaneRole::Neutral,
                    CounterKind::OriginDestination => lane.role != LaneRole::Neutral,
                };
                if !fits {
                    report.push(
                        IssueCode::RoleKindMismatch,
                        IssueContext::Lane {
                            id: lane.id.as_u64(),
                        },
                        format!("role {} is not valid for a {} counter", lane.role, kind),
                    );
                }
            }
        }
        None => {}
    }

    if config.resolved_kind().ok() == Some(CounterKind::OriginDestination) {
        if entry == 0 {
            report.push(
                IssueCode::NoEntryLanes,
                IssueContext::Config,
                "no entry lanes: no trip can ever start",
            );
        }
        if exit == 0 {
            report.push(
                IssueCode::NoExitLanes,
                IssueContext::Config,
                "no exit lanes: no trip can ever complete",
            );
        }
    }
}

/// The type dictionary must be non-empty and injective.
fn validate_types(config: &CounterConfig, report: &mut ValidationReport) {
    if config.types.is_empty() {
        report.push(
            IssueCode::EmptyTypeDictionary,
            IssueContext::Config,
            "no object types configured: every crossing will be unclassified",
        );
        return;
    }

    let mut code_owner: HashMap<TypeCode, &str> = HashMap::new();
    for (name, code) in &config.types {
        match code_owner.get(code) {
            Some(owner) => report.push(
                IssueCode::DuplicateTypeCode,
                IssueContext::Type {
                    code: code.as_u32(),
                },
                format!("type code {} is used by both '{}' and '{}'", code, owner, name),
            ),
            None => {
                code_owner.insert(*code, name);
            }
        }
    }
}
