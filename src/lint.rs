//! Native commit message check
//!
//! `commitlint-setup lint --edit <file>` follows the same contract as the
//! commitlint CLI the generated launcher calls, using the rules from the
//! `conventional-commit` crate. It shares the rejection banner with the
//! launcher so both print the same guidance.

use anyhow::Result;
use conventional_commit::{lint_file, LintError};
use std::io::Write;
use std::path::Path;

/// Printed when a message is rejected. Must stay ASCII.
pub const REJECTION_BANNER: &[&str] = &[
    "------------------------------------------------------------",
    " Commit message rejected: use the Conventional Commits format",
    "   <type>(<scope>): <subject>",
    " Allowed types: build, chore, ci, docs, feat, fix, perf,",
    "                refactor, revert, style, test",
    " Examples:",
    "   feat: add login endpoint",
    "   fix(api): handle empty payloads",
    "   docs: update setup instructions",
    "------------------------------------------------------------",
];

pub const EXIT_ACCEPTED: i32 = 0;
pub const EXIT_REJECTED: i32 = 1;
pub const EXIT_MISSING_INPUT: i32 = 2;

/// Lints a commit message file and returns the process exit code.
///
/// # Arguments
/// * `message_file` - File git passes to the `commit-msg` hook
/// * `config` - Optional commitlint config path; must exist when given
/// * `out` - Where the report and banner are written
///
/// # Returns
/// * `Ok(i32)` - 0 accepted, 1 rejected, 2 message file or config missing
/// * `Err` - If the file exists but cannot be read
pub fn run_lint<W: Write>(message_file: &Path, config: Option<&Path>, out: &mut W) -> Result<i32> {
    if !message_file.is_file() {
        writeln!(out, "commit-msg: commit message file not found: {}", message_file.display())?;
        return Ok(EXIT_MISSING_INPUT);
    }

    if let Some(config) = config {
        if !config.is_file() {
            writeln!(out, "commit-msg: commitlint config not found: {}", config.display())?;
            return Ok(EXIT_MISSING_INPUT);
        }
        tracing::debug!(config = %config.display(), "using conventional rules for config");
    }

    let report = match lint_file(message_file) {
        Ok(report) => report,
        Err(LintError::FileNotFound { path }) => {
            writeln!(out, "commit-msg: commit message file not found: {}", path.display())?;
            return Ok(EXIT_MISSING_INPUT);
        }
        Err(e) => return Err(e.into()),
    };

    if report.issues.is_empty() {
        return Ok(EXIT_ACCEPTED);
    }

    writeln!(out, ">   input: {}", report.input)?;
    for issue in &report.issues {
        writeln!(out, "{issue}")?;
    }
    writeln!(out)?;
    writeln!(out, "{}   {}", if report.valid { "!" } else { "x" }, report.summary())?;

    if report.valid {
        return Ok(EXIT_ACCEPTED);
    }

    writeln!(out)?;
    for line in REJECTION_BANNER {
        writeln!(out, "{line}")?;
    }
    Ok(EXIT_REJECTED)
}
