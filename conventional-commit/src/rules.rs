//! The config-conventional rule set

use crate::parsing::ParsedMessage;
use crate::report::LintIssue;
use once_cell::sync::Lazy;
use regex::Regex;

/// Messages commitlint skips by default (merges, reverts, autosquash markers)
static IGNORE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^((Merge pull request)|(Merge (.*?) of (.*?))|(Merge branch (.*?)))(?:\r?\n)*",
        r"^(Merge tag (.*?))(?:\r?\n)*",
        r"^(R|r)evert (.*)",
        r"^(fixup|squash|amend)!",
        r"^(Merged (.*?)(in|into) (.*))",
        r"^Merge remote-tracking branch(\s*)(.*)",
        r"^Automatic merge(.*)",
        r"^Auto-merged (.*?) into (.*)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("ignore pattern is a valid regex"))
    .collect()
});

/// Commit types accepted by config-conventional
pub const CONVENTIONAL_TYPES: &[&str] = &[
    "build", "chore", "ci", "docs", "feat", "fix", "perf", "refactor", "revert", "style", "test",
];

/// Limits and vocabularies for linting
#[derive(Debug, Clone)]
pub struct RuleSet {
    /// Accepted commit types
    pub types: Vec<String>,
    /// Maximum header length in characters
    pub header_max_length: usize,
    /// Maximum body line length in characters
    pub body_max_line_length: usize,
    /// Maximum footer line length in characters
    pub footer_max_line_length: usize,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::conventional()
    }
}

impl RuleSet {
    /// Rules equivalent to `@commitlint/config-conventional`
    pub fn conventional() -> Self {
        Self {
            types: CONVENTIONAL_TYPES.iter().map(|t| t.to_string()).collect(),
            header_max_length: 100,
            body_max_line_length: 100,
            footer_max_line_length: 100,
        }
    }

    /// Returns true when commitlint would skip this message entirely
    pub fn is_ignored(&self, header: &str) -> bool {
        IGNORE_PATTERNS.iter().any(|p| p.is_match(header))
    }

    /// Applies every rule to a parsed message
    pub fn check(&self, message: &ParsedMessage) -> Vec<LintIssue> {
        let mut issues = Vec::new();

        let header_len = message.header.chars().count();
        if header_len > self.header_max_length {
            issues.push(LintIssue::error(
                "header-max-length",
                format!(
                    "header must not be longer than {} characters, current length is {}",
                    self.header_max_length, header_len
                ),
            ));
        }

        let subject = message.subject.as_deref().unwrap_or("");
        if subject.trim().is_empty() {
            issues.push(LintIssue::error("subject-empty", "subject may not be empty"));
        } else {
            if let Some(case) = forbidden_subject_case(subject) {
                issues.push(LintIssue::error(
                    "subject-case",
                    format!(
                        "subject must not be sentence-case, start-case, pascal-case, upper-case (found {case})"
                    ),
                ));
            }
            if subject.ends_with('.') {
                issues.push(LintIssue::error("subject-full-stop", "subject may not end with full stop"));
            }
        }

        let kind = message.kind.as_deref().unwrap_or("");
        if kind.is_empty() {
            issues.push(LintIssue::error("type-empty", "type may not be empty"));
        } else {
            if kind != kind.to_lowercase() {
                issues.push(LintIssue::error("type-case", "type must be lower-case"));
            }
            if !self.types.iter().any(|t| t == kind) {
                issues.push(LintIssue::error(
                    "type-enum",
                    format!("type must be one of [{}]", self.types.join(", ")),
                ));
            }
        }

        let has_body = !message.body.is_empty() || !message.footer.is_empty();
        if has_body && !message.body_leading_blank {
            issues.push(LintIssue::warning("body-leading-blank", "body must have leading blank line"));
        }

        if let Some(line) = longest_over(&message.body, self.body_max_line_length) {
            issues.push(LintIssue::error(
                "body-max-line-length",
                format!(
                    "body's lines must not be longer than {} characters (found {})",
                    self.body_max_line_length, line
                ),
            ));
        }

        if !message.footer.is_empty() {
            if !message.footer_leading_blank {
                issues.push(LintIssue::warning("footer-leading-blank", "footer must have leading blank line"));
            }
            if let Some(line) = longest_over(&message.footer, self.footer_max_line_length) {
                issues.push(LintIssue::error(
                    "footer-max-line-length",
                    format!(
                        "footer's lines must not be longer than {} characters (found {})",
                        self.footer_max_line_length, line
                    ),
                ));
            }
        }

        issues
    }
}

fn longest_over(lines: &[String], max: usize) -> Option<usize> {
    lines.iter()
        .map(|l| l.chars().count())
        .filter(|len| *len > max)
        .max()
}

/// Names the forbidden case a subject is written in, if any
fn forbidden_subject_case(subject: &str) -> Option<&'static str> {
    let letters: Vec<char> = subject.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.is_empty() {
        return None;
    }

    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return Some("upper-case");
    }

    let words: Vec<&str> = subject.split_whitespace().collect();
    let starts_upper = |w: &str| w.chars().next().is_some_and(|c| c.is_uppercase());

    if words.len() == 1 {
        let word = words[0];
        let has_inner_upper = word.chars().skip(1).any(|c| c.is_uppercase());
        let has_separator = word.contains(['-', '_', '.', '/']);
        if starts_upper(word) && has_inner_upper && !has_separator {
            return Some("pascal-case");
        }
    }

    if words.len() > 1 && words.iter().all(|w| starts_upper(w)) {
        return Some("start-case");
    }

    // Sentence case means the subject is unchanged by upper-casing its first letter
    if subject.chars().next().is_some_and(char::is_uppercase) {
        return Some("sentence-case");
    }

    None
}
