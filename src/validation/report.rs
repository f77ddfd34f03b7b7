//! Structured validation results.
//!
//! Every issue carries a stable [`IssueCode`] whose severity is fixed: an
//! error means the configuration cannot build a counter, a warning means it
//! can but will likely not count what the operator expects.

use serde::Serialize;
use std::fmt;

/// All issues found in one configuration, in discovery order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an issue of `code` with its built-in severity.
    pub fn push(&mut self, code: IssueCode, context: IssueContext, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            severity: code.severity(),
            code,
            context,
            message: message.into(),
        });
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> + '_ {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> + '_ {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// True if a counter can be built, i.e. there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors().next().is_none()
    }

    /// True if there is nothing to report at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns true if any issue carries `code`.
    pub fn has(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return writeln!(f, "Validation passed: no issues found");
        }

        writeln!(
            f,
            "{} error(s), {} warning(s)",
            self.error_count(),
            self.warning_count()
        )?;

        let width = self
            .issues
            .iter()
            .map(|i| i.code.as_str().len())
            .max()
            .unwrap_or(0);
        for issue in self.errors().chain(self.warnings()) {
            writeln!(
                f,
                "  {:<7} {:<width$}  {}: {}",
                issue.severity.as_str(),
                issue.code.as_str(),
                issue.context,
                issue.message,
                width = width
            )?;
        }
        Ok(())
    }
}

/// One finding.
#[derive(Clone, Debug, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub context: IssueContext,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Stable issue identifiers, serialized in snake_case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    DuplicateLaneId,
    BoundaryNotFinite,
    /// Coincident endpoints: the lane can never be crossed.
    ZeroLengthBoundary,
    EmptyLaneName,
    /// Ambiguous rows in count reports.
    DuplicateLaneName,
    MixedLaneRoles,
    /// A lane role contradicts the configured `kind`.
    RoleKindMismatch,
    NoEntryLanes,
    NoExitLanes,
    DuplicateTypeCode,
    /// Every crossing will be unclassified.
    EmptyTypeDictionary,
    /// Objects whose track is lost while inside are never dropped.
    EvictionDisabled,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuplicateLaneId => "duplicate_lane_id",
            Self::BoundaryNotFinite => "boundary_not_finite",
            Self::ZeroLengthBoundary => "zero_length_boundary",
            Self::EmptyLaneName => "empty_lane_name",
            Self::DuplicateLaneName => "duplicate_lane_name",
            Self::MixedLaneRoles => "mixed_lane_roles",
            Self::RoleKindMismatch => "role_kind_mismatch",
            Self::NoEntryLanes => "no_entry_lanes",
            Self::NoExitLanes => "no_exit_lanes",
            Self::DuplicateTypeCode => "duplicate_type_code",
            Self::EmptyTypeDictionary => "empty_type_dictionary",
            Self::EvictionDisabled => "eviction_disabled",
        }
    }

    /// Errors block [`CounterConfig::build_counter`](crate::config::CounterConfig::build_counter)
    /// or leave a lane inert; everything else is a warning.
    pub fn severity(&self) -> Severity {
        match self {
            Self::DuplicateLaneId
            | Self::BoundaryNotFinite
            | Self::ZeroLengthBoundary
            | Self::MixedLaneRoles
            | Self::RoleKindMismatch
            | Self::DuplicateTypeCode => Severity::Error,
            Self::EmptyLaneName
            | Self::DuplicateLaneName
            | Self::NoEntryLanes
            | Self::NoExitLanes
            | Self::EmptyTypeDictionary
            | Self::EvictionDisabled => Severity::Warning,
        }
    }
}

/// Where an issue was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum IssueContext {
    Config,
    Lane { id: u64 },
    Type { code: u32 },
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config => f.write_str("config"),
            Self::Lane { id } => write!(f, "lane {}", id),
            Self::Type { code } => write!(f, "type {}", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_code() {
        let mut report = ValidationReport::new();
        report.push(IssueCode::EmptyLaneName, IssueContext::Lane { id: 1 }, "empty");
        report.push(IssueCode::DuplicateLaneId, IssueContext::Lane { id: 1 }, "dup");
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(!report.is_ok());
    }

    #[test]
    fn test_display_lists_errors_first() {
        let mut report = ValidationReport::new();
        report.push(IssueCode::EvictionDisabled, IssueContext::Config, "never evicts");
        report.push(IssueCode::MixedLaneRoles, IssueContext::Config, "mixed");
        let text = report.to_string();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("1 error(s), 1 warning(s)"));
        assert!(lines.next().is_some_and(|l| l.contains("mixed_lane_roles")));
        assert!(lines.next().is_some_and(|l| l.contains("eviction_disabled")));
    }

    #[test]
    fn test_serialized_shape() {
        let mut report = ValidationReport::new();
        report.push(IssueCode::DuplicateTypeCode, IssueContext::Type { code: 2 }, "dup");
        let value = serde_json::to_value(&report).expect("serialize");
        assert_eq!(value["issues"][0]["severity"], "error");
        assert_eq!(value["issues"][0]["code"], "duplicate_type_code");
        assert_eq!(value["issues"][0]["context"]["scope"], "type");
        assert_eq!(value["issues"][0]["context"]["code"], 2);
    }
}
