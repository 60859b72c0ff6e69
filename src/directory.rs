//! Base directory input and resolution

use crate::error::SetupError;
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// `$env:NAME`, `%NAME%`, `${NAME}` and `$NAME` references
static ENV_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$env:([A-Za-z_][A-Za-z0-9_]*)|%([^%\s]+)%|\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("environment reference pattern is a valid regex")
});

/// Asks for the base directory and returns the raw line.
///
/// End of input is returned as an empty string so the caller rejects it the
/// same way as a blank answer.
pub fn prompt_directory<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    write!(output, "Folder for commitlint.config.js and .githooks (e.g. %USERPROFILE%\\dev): ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read directory from stdin")?;
    Ok(line)
}

/// Resolves user input to a canonical, existing directory.
///
/// Wrapping quotes are removed, environment references and a leading `~` are
/// expanded through `lookup`, relative paths are taken from `cwd`, and a
/// missing directory is created.
///
/// # Arguments
/// * `input` - The raw line the user typed
/// * `lookup` - Environment variable lookup
/// * `cwd` - Directory relative input is resolved against
///
/// # Returns
/// * `Ok(PathBuf)` - Absolute path of an existing directory
/// * `Err(SetupError)` - Blank input, a file in the way, or an unresolvable path
pub fn resolve_base_directory<F>(input: &str, lookup: F, cwd: &Path) -> Result<PathBuf, SetupError>
where
    F: Fn(&str) -> Option<String>,
{
    let trimmed = strip_wrapping_quotes(input.trim()).trim();
    if trimmed.is_empty() {
        return Err(SetupError::EmptyInput);
    }

    let expanded = expand_home(&expand_env_vars(trimmed, &lookup), &lookup);
    let candidate = if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    };

    if candidate.exists() && !candidate.is_dir() {
        return Err(SetupError::NotADirectory { path: candidate });
    }
    if !candidate.exists() {
        tracing::debug!(path = %candidate.display(), "creating base directory");
        fs::create_dir_all(&candidate).map_err(|e| SetupError::unresolvable(trimmed, e))?;
    }

    let canonical = fs::canonicalize(&candidate).map_err(|e| SetupError::unresolvable(trimmed, e))?;
    Ok(simplify_verbatim(canonical))
}

/// Removes one pair of matching `"` or `'` around the input
fn strip_wrapping_quotes(input: &str) -> &str {
    for quote in ['"', '\''] {
        if input.len() >= 2 && input.starts_with(quote) && input.ends_with(quote) {
            return &input[1..input.len() - 1];
        }
    }
    input
}

/// Expands environment references; unknown names are left as typed.
pub fn expand_env_vars<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENV_REFERENCE
        .replace_all(input, |caps: &Captures| {
            let name = (1..=4)
                .find_map(|i| caps.get(i))
                .map(|m| m.as_str())
                .unwrap_or_default();
            lookup(name).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Expands a leading `~` to the user's home directory
fn expand_home<F>(path: &str, lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => rest,
        _ => return PathBuf::from(path),
    };

    match lookup("USERPROFILE").or_else(|| lookup("HOME")) {
        Some(home) => PathBuf::from(home).join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(path),
    }
}

/// Drops the `\\?\` prefix Windows canonicalization adds to local paths
fn simplify_verbatim(path: PathBuf) -> PathBuf {
    let text = path.to_string_lossy();
    match text.strip_prefix(r"\\?\") {
        Some(rest) if !rest.starts_with("UNC\\") => PathBuf::from(rest),
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_strip_wrapping_quotes() {
        assert_eq!(strip_wrapping_quotes("\"C:\\dev\\my repo\""), "C:\\dev\\my repo");
        assert_eq!(strip_wrapping_quotes("'/tmp/x'"), "/tmp/x");
        assert_eq!(strip_wrapping_quotes("\"unbalanced"), "\"unbalanced");
        assert_eq!(strip_wrapping_quotes("\""), "\"");
    }

    #[test]
    fn test_expand_env_vars() {
        let env = env_of(&[("USERPROFILE", "C:\\Users\\dev"), ("HOME", "/home/dev")]);

        assert_eq!(expand_env_vars("%USERPROFILE%\\code", &env), "C:\\Users\\dev\\code");
        assert_eq!(expand_env_vars("$env:USERPROFILE\\code", &env), "C:\\Users\\dev\\code");
        assert_eq!(expand_env_vars("${HOME}/code", &env), "/home/dev/code");
        assert_eq!(expand_env_vars("$HOME/code", &env), "/home/dev/code");
        assert_eq!(expand_env_vars("%NOPE%\\x", &env), "%NOPE%\\x");
    }

    #[test]
    fn test_expand_home() {
        let env = env_of(&[("HOME", "/home/dev")]);
        assert_eq!(expand_home("~/code", &env), PathBuf::from("/home/dev/code"));
        assert_eq!(expand_home("~", &env), PathBuf::from("/home/dev"));
        assert_eq!(expand_home("~other/code", &env), PathBuf::from("~other/code"));
    }

    #[test]
    fn test_blank_input_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        for input in ["", "   ", "\n", "\"\"", "  ''  "] {
            let result = resolve_base_directory(input, env_of(&[]), temp_dir.path());
            assert!(matches!(result, Err(SetupError::EmptyInput)), "input {input:?}");
        }
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_resolves_existing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let input = format!("\"{}\"\n", temp_dir.path().display());

        let resolved = resolve_base_directory(&input, env_of(&[]), Path::new("/")).unwrap();
        assert_eq!(resolved, fs::canonicalize(temp_dir.path()).unwrap());
        assert!(resolved.is_absolute());
    }

    #[test]
    fn test_resolves_variable_and_relative_path() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_string_lossy().to_string();
        let env = env_of(&[("WORKROOT", root.as_str())]);

        let resolved = resolve_base_directory("$WORKROOT/hooks-home", &env, Path::new("/")).unwrap();
        assert!(resolved.ends_with("hooks-home"));
        assert!(resolved.is_dir());

        let relative = resolve_base_directory("nested", env_of(&[]), temp_dir.path()).unwrap();
        assert!(relative.ends_with("nested"));
        assert!(relative.is_dir());
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let result = resolve_base_directory(&file.to_string_lossy(), env_of(&[]), temp_dir.path());
        assert!(matches!(result, Err(SetupError::NotADirectory { .. })));
    }

    #[test]
    fn test_prompt_reads_one_line() {
        let mut input = Cursor::new("C:\\dev\nignored\n");
        let mut output = Vec::new();

        let line = prompt_directory(&mut input, &mut output).unwrap();
        assert_eq!(line, "C:\\dev\n");
        assert!(String::from_utf8(output).unwrap().contains(".githooks"));

        let mut eof = Cursor::new("");
        assert_eq!(prompt_directory(&mut eof, &mut Vec::new()).unwrap(), "");
    }

    #[test]
    fn test_simplify_verbatim() {
        assert_eq!(simplify_verbatim(PathBuf::from(r"\\?\C:\dev")), PathBuf::from(r"C:\dev"));
        assert_eq!(simplify_verbatim(PathBuf::from(r"\\?\UNC\server\share")), PathBuf::from(r"\\?\UNC\server\share"));
        assert_eq!(simplify_verbatim(PathBuf::from("/home/dev")), PathBuf::from("/home/dev"));
    }
}
