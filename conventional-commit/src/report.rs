//! Lint result types

use serde::Serialize;
use std::fmt;

/// Result of linting one commit message
#[derive(Debug, Serialize)]
pub struct LintReport {
    /// Whether the message passed every error-level rule
    pub valid: bool,
    /// Header that was checked, kept for diagnostics
    pub input: String,
    /// Problems found, in rule order
    pub issues: Vec<LintIssue>,
}

/// Individual rule violation
#[derive(Debug, Clone, Serialize)]
pub struct LintIssue {
    /// Severity level of the issue
    pub severity: Severity,
    /// Rule name as commitlint spells it (`type-enum`, `subject-empty`, ...)
    pub rule: &'static str,
    /// Human-readable description of the issue
    pub message: String,
}

/// Severity level for lint issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Rejects the commit
    Error,
    /// Reported but does not reject the commit
    Warning,
}

impl LintReport {
    /// Builds a report, deriving validity from the issue severities
    pub fn new(input: impl Into<String>, issues: Vec<LintIssue>) -> Self {
        let valid = !issues.iter().any(|i| i.severity == Severity::Error);
        Self {
            valid,
            input: input.into(),
            issues,
        }
    }

    /// Report for a message that matched an ignore pattern
    pub fn ignored(input: impl Into<String>) -> Self {
        Self::new(input, Vec::new())
    }

    /// Returns all error-level issues
    pub fn errors(&self) -> Vec<&LintIssue> {
        self.issues.iter()
            .filter(|issue| issue.severity == Severity::Error)
            .collect()
    }

    /// Returns all warning-level issues
    pub fn warnings(&self) -> Vec<&LintIssue> {
        self.issues.iter()
            .filter(|issue| issue.severity == Severity::Warning)
            .collect()
    }

    /// One-line summary in commitlint's wording
    pub fn summary(&self) -> String {
        let errors = self.errors().len();
        let warnings = self.warnings().len();
        format!(
            "found {} problem{}, {} warning{}",
            errors,
            if errors == 1 { "" } else { "s" },
            warnings,
            if warnings == 1 { "" } else { "s" },
        )
    }
}

impl LintIssue {
    /// Creates a new error-level issue
    pub fn error(rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            rule,
            message: message.into(),
        }
    }

    /// Creates a new warning-level issue
    pub fn warning(rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            rule,
            message: message.into(),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.severity {
            Severity::Error => "x",
            Severity::Warning => "!",
        };
        write!(f, "{}   {} [{}]", marker, self.message, self.rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_report() {
        let report = LintReport::new("feat: add x", Vec::new());

        assert!(report.valid);
        assert!(report.issues.is_empty());
        assert_eq!(report.summary(), "found 0 problems, 0 warnings");
    }

    #[test]
    fn test_errors_and_warnings_filtering() {
        let report = LintReport::new("Bad", vec![
            LintIssue::error("subject-empty", "subject may not be empty"),
            LintIssue::error("type-empty", "type may not be empty"),
            LintIssue::warning("body-leading-blank", "body must have leading blank line"),
        ]);

        assert!(!report.valid);
        assert_eq!(report.errors().len(), 2);
        assert_eq!(report.warnings().len(), 1);
        assert_eq!(report.summary(), "found 2 problems, 1 warning");
    }

    #[test]
    fn test_warnings_alone_stay_valid() {
        let report = LintReport::new("feat: x", vec![
            LintIssue::warning("footer-leading-blank", "footer must have leading blank line"),
        ]);
        assert!(report.valid);
    }

    #[test]
    fn test_issue_display() {
        let issue = LintIssue::error("type-empty", "type may not be empty");
        assert_eq!(issue.to_string(), "x   type may not be empty [type-empty]");
    }
}
