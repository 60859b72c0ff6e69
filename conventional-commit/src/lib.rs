//! Conventional Commit - commit message linting library
//!
//! This library checks commit messages against the conventional-commits rule
//! set shipped by `@commitlint/config-conventional`, so a message can be
//! validated without a JavaScript runtime:
//! - `lint_message()`: Lints message text
//! - `lint_file()`: Lints the file git hands to a `commit-msg` hook
//!
//! # Example Usage
//!
//! ```rust
//! use conventional_commit::lint_message;
//!
//! let report = lint_message("feat: add login endpoint");
//! assert!(report.valid);
//!
//! let report = lint_message("fixed stuff");
//! assert!(!report.valid);
//! for issue in &report.issues {
//!     println!("{}", issue);
//! }
//! ```

pub mod error;
pub mod parsing;
pub mod report;
pub mod rules;

use error::LintResult;
use std::path::Path;

// Re-export key types for convenience
pub use error::LintError;
pub use parsing::{parse_message, ParsedMessage};
pub use report::{LintIssue, LintReport, Severity};
pub use rules::{RuleSet, CONVENTIONAL_TYPES};

/// Lints commit message text with the conventional rule set
///
/// Ignored messages (merges, reverts, `fixup!`) produce a valid, empty report.
pub fn lint_message(text: &str) -> LintReport {
    lint_message_with(&RuleSet::conventional(), text)
}

/// Lints commit message text with a custom rule set
pub fn lint_message_with(rules: &RuleSet, text: &str) -> LintReport {
    lint_parsed(rules, parse_message(text))
}

/// Reads a commit message file and lints it
///
/// # Returns
///
/// * `Ok(LintReport)` - The lint results, valid or not
/// * `Err(LintError)` - If the file is missing or unreadable
pub fn lint_file<P: AsRef<Path>>(path: P) -> LintResult<LintReport> {
    let parsed = parsing::parse_file(path)?;
    Ok(lint_parsed(&RuleSet::conventional(), parsed))
}

fn lint_parsed(rules: &RuleSet, parsed: ParsedMessage) -> LintReport {
    if !parsed.is_empty() && rules.is_ignored(&parsed.header) {
        return LintReport::ignored(parsed.header);
    }

    let issues = rules.check(&parsed);
    LintReport::new(parsed.header, issues)
}
