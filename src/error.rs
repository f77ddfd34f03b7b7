use std::path::PathBuf;
use thiserror::Error;

use crate::model::{LaneId, LaneRole, TypeCode};
use crate::validation::ValidationReport;

/// The main error type for lanecount operations.
#[derive(Debug, Error)]
pub enum LaneCountError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Duplicate lane ID {id} (lane IDs must be unique within a counter)")]
    DuplicateLane { id: LaneId },

    #[error("Lane {id} has role {role} which is not valid for a {counter} counter")]
    WrongRole {
        id: LaneId,
        role: LaneRole,
        counter: &'static str,
    },

    #[error("Lane configuration mixes neutral lanes with entry/exit lanes")]
    MixedRoles,

    #[error("Counter was used before initialize() was called")]
    NotInitialized,

    #[error("Lanes cannot be added after initialize() was called")]
    AlreadyInitialized,

    #[error("Duplicate type code {code} (used by both '{first}' and '{second}')")]
    DuplicateTypeCode {
        code: TypeCode,
        first: String,
        second: String,
    },

    #[error("Failed to parse counter config from {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse counter config from {path}: {source}")]
    ConfigYamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to write counter config to {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse frame at {path}:{line}: {source}")]
    FrameParse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write count report as CSV: {source}")]
    ReportCsvWrite {
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write count report as JSON: {source}")]
    ReportJsonWrite {
        #[source]
        source: serde_json::Error,
    },

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },

    #[error("Counter state is unavailable: a previous update panicked")]
    Poisoned,

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
