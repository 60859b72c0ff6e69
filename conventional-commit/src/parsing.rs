//! Commit message parsing utilities

use crate::error::{LintError, LintResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Header grammar used by config-conventional: `type(scope)!: subject`
static HEADER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<type>\w*)(?:\((?P<scope>.*)\))?(?P<breaking>!)?: (?P<subject>.*)$")
        .expect("header pattern is a valid regex")
});

/// Footer tokens (`Refs: #12`, `Closes #4`, `BREAKING CHANGE: ...`)
static TRAILER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<token>BREAKING CHANGE|BREAKING-CHANGE|[A-Za-z][\w-]*)(?:: | #)")
        .expect("trailer pattern is a valid regex")
});

/// Line git writes above the diff in `commit --verbose`
const SCISSORS: &str = "# ------------------------ >8 ------------------------";

/// A commit message split into its conventional parts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMessage {
    /// First line of the message
    pub header: String,
    /// Commit type (`feat`, `fix`, ...) when the header matched the grammar
    pub kind: Option<String>,
    /// Optional scope between parentheses
    pub scope: Option<String>,
    /// Whether the header carries the `!` breaking-change marker
    pub breaking: bool,
    /// Subject text after `: `
    pub subject: Option<String>,
    /// Body lines, without the separating blank line
    pub body: Vec<String>,
    /// Footer lines starting at the first trailer
    pub footer: Vec<String>,
    /// Whether a blank line separates the header from what follows
    pub body_leading_blank: bool,
    /// Whether a blank line separates the footer from the body
    pub footer_leading_blank: bool,
}

impl ParsedMessage {
    /// Returns true when the message has no content at all
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.body.is_empty() && self.footer.is_empty()
    }

    /// Returns true when a `BREAKING CHANGE` footer or `!` marker is present
    pub fn is_breaking(&self) -> bool {
        self.breaking
            || self.footer.iter().any(|line| {
                line.starts_with("BREAKING CHANGE") || line.starts_with("BREAKING-CHANGE")
            })
    }
}

/// Reads and parses a commit message file
pub fn parse_file<P: AsRef<Path>>(path: P) -> LintResult<ParsedMessage> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LintError::file_not_found(path),
        _ => LintError::io_error(path, e),
    })?;

    let content = String::from_utf8(bytes).map_err(|_| LintError::invalid_encoding(path))?;
    Ok(parse_message(&content))
}

/// Parses commit message text the way git hands it to a `commit-msg` hook
///
/// Comment lines (`#`) are dropped, everything below the scissors line is
/// ignored, and a leading UTF-8 byte-order mark is tolerated.
pub fn parse_message(text: &str) -> ParsedMessage {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.starts_with(SCISSORS) {
            break;
        }
        if line.starts_with('#') {
            continue;
        }
        lines.push(line.trim_end());
    }

    // Drop surrounding blank lines
    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    let Some((header, rest)) = lines.split_first() else {
        return ParsedMessage::default();
    };

    let mut parsed = ParsedMessage {
        header: header.to_string(),
        body_leading_blank: true,
        footer_leading_blank: true,
        ..Default::default()
    };

    if let Some(caps) = HEADER_PATTERN.captures(header) {
        parsed.kind = caps.name("type").map(|m| m.as_str().to_string());
        parsed.scope = caps
            .name("scope")
            .map(|m| m.as_str().to_string())
            .filter(|s| !s.is_empty());
        parsed.breaking = caps.name("breaking").is_some();
        parsed.subject = caps.name("subject").map(|m| m.as_str().to_string());
    }

    if rest.is_empty() {
        return parsed;
    }
    parsed.body_leading_blank = rest[0].is_empty();

    let footer_start = rest.iter().enumerate().position(|(i, line)| {
        let Some(caps) = TRAILER_PATTERN.captures(line) else {
            return false;
        };
        let token = &caps["token"];
        let paragraph_start = i == 0 || rest[i - 1].is_empty();
        paragraph_start || token.starts_with("BREAKING")
    });

    let (body, footer) = match footer_start {
        Some(i) => {
            parsed.footer_leading_blank = i > 0 && rest[i - 1].is_empty();
            (&rest[..i], &rest[i..])
        }
        None => (rest, &rest[rest.len()..]),
    };

    parsed.body = trim_blank_edges(body);
    parsed.footer = trim_blank_edges(footer);
    parsed
}

fn trim_blank_edges(lines: &[&str]) -> Vec<String> {
    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);
    lines[start..end].iter().map(|l| l.to_string()).collect()
}
