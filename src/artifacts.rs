//! Rendering and writing of the generated hook files
//!
//! Rendering is pure. Writing normalizes line endings per artifact, never
//! emits a byte-order mark, and replaces each file atomically.

use crate::error::SetupError;
use crate::lint::REJECTION_BANNER;
use crate::types::{Artifact, ArtifactSet, LineEnding, Settings};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const CONFIG_FILE: &str = "commitlint.config.js";
pub const LAUNCHER_FILE: &str = "commit-msg.ps1";
pub const WRAPPER_FILE: &str = "commit-msg";

const CONFIG_TEMPLATE: &str = r#"module.exports = {
  extends: ['@commitlint/config-conventional'],
};
"#;

const LAUNCHER_TEMPLATE: &str = r#"# Generated by commitlint-setup. Re-run setup to regenerate.
param(
    [Parameter(Position = 0)]
    [string]$CommitMsgFile
)

$ConfigPath = {config_path}

if ([string]::IsNullOrWhiteSpace($CommitMsgFile) -or -not (Test-Path -LiteralPath $CommitMsgFile -PathType Leaf)) {
    Write-Host "commit-msg: commit message file not found: $CommitMsgFile"
    exit 2
}

if (-not (Test-Path -LiteralPath $ConfigPath -PathType Leaf)) {
    Write-Host "commit-msg: commitlint config not found: $ConfigPath"
    exit 2
}

try {
    & npx --no -- commitlint --edit $CommitMsgFile --config $ConfigPath
    $exitCode = $LASTEXITCODE
} catch {
    Write-Host "commit-msg: could not run commitlint: $($_.Exception.Message)"
    $exitCode = 1
}
if ($null -eq $exitCode) { $exitCode = 1 }

if ($exitCode -ne 0) {
{banner}
}

exit $exitCode
"#;

const WRAPPER_TEMPLATE: &str = r#"#!/bin/sh
# Generated by commitlint-setup. Hands the message file to commit-msg.ps1.
hook_dir=$(dirname "$0")
{shell} -NoProfile -ExecutionPolicy Bypass -File "$hook_dir/commit-msg.ps1" "$1"
exit $?
"#;

/// Static commitlint configuration delegating to config-conventional
pub fn render_config() -> String {
    CONFIG_TEMPLATE.to_string()
}

/// PowerShell launcher with the config path baked in as a literal
pub fn render_launcher(config_path: &Path) -> String {
    let banner = std::iter::once(String::new())
        .chain(REJECTION_BANNER.iter().map(|line| line.to_string()))
        .map(|line| format!("    Write-Host {}", ps_single_quote(&line)))
        .collect::<Vec<_>>()
        .join("\n");

    LAUNCHER_TEMPLATE
        .replace("{config_path}", &ps_single_quote(&config_path.to_string_lossy()))
        .replace("{banner}", &banner)
}

/// POSIX shim that re-invokes the launcher next to it
pub fn render_wrapper(launcher_shell: &str) -> String {
    WRAPPER_TEMPLATE.replace("{shell}", &sh_single_quote(launcher_shell))
}

/// Single-quoted PowerShell string literal.
///
/// PowerShell closes a single-quoted string on U+2018..U+201B as well as `'`,
/// so each of those is doubled.
fn ps_single_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if matches!(c, '\'' | '\u{2018}'..='\u{201B}') {
            quoted.push(c);
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

/// Single-quoted sh word
fn sh_single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Lays out the three artifacts under `base`.
pub fn plan_artifacts(base: &Path, settings: &Settings) -> ArtifactSet {
    let hooks_dir = base.join(&settings.hooks_dir);
    let config_path = base.join(CONFIG_FILE);

    ArtifactSet {
        launcher: Artifact {
            path: hooks_dir.join(LAUNCHER_FILE),
            content: render_launcher(&config_path),
            line_ending: LineEnding::CrLf,
            executable: false,
        },
        config: Artifact {
            path: config_path,
            content: render_config(),
            line_ending: LineEnding::Lf,
            executable: false,
        },
        wrapper: Artifact {
            path: hooks_dir.join(WRAPPER_FILE),
            content: render_wrapper(&settings.launcher_shell),
            line_ending: LineEnding::Lf,
            executable: true,
        },
    }
}

/// Converts any mix of line endings to `ending`, dropping a leading BOM
pub fn encode(content: &str, ending: LineEnding) -> Vec<u8> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let normalized = content.replace("\r\n", "\n");
    let mut text = match ending {
        LineEnding::Lf => normalized,
        LineEnding::CrLf => normalized.replace('\n', "\r\n"),
    };
    if !text.ends_with(ending.as_str()) {
        text.push_str(ending.as_str());
    }
    text.into_bytes()
}

/// Writes every artifact in order, creating the hooks directory first.
///
/// # Returns
/// * `Ok(Vec<PathBuf>)` - Paths written, in order
/// * `Err(SetupError)` - The first write that failed
pub fn write_artifacts(set: &ArtifactSet) -> Result<Vec<PathBuf>, SetupError> {
    let mut written = Vec::new();
    for artifact in set.iter() {
        write_artifact(artifact)?;
        written.push(artifact.path.clone());
    }
    Ok(written)
}

/// Replaces one file with the encoded artifact content
pub fn write_artifact(artifact: &Artifact) -> Result<(), SetupError> {
    let path = &artifact.path;
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| SetupError::artifact_write(parent, e))?;

    let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| SetupError::artifact_write(path, e))?;
    temp_file
        .write_all(&encode(&artifact.content, artifact.line_ending))
        .and_then(|_| temp_file.flush())
        .map_err(|e| SetupError::artifact_write(path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = if artifact.executable { 0o755 } else { 0o644 };
        fs::set_permissions(temp_file.path(), fs::Permissions::from_mode(mode))
            .map_err(|e| SetupError::artifact_write(path, e))?;
    }

    temp_file.persist(path).map_err(|e| SetupError::artifact_write(path, e.error))?;
    tracing::debug!(path = %path.display(), "wrote artifact");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_delegates_to_conventional() {
        let config = render_config();
        assert!(config.contains("extends: ['@commitlint/config-conventional']"));
    }

    #[test]
    fn test_launcher_embeds_config_path() {
        let launcher = render_launcher(Path::new("C:\\Users\\o'neil\\dev\\commitlint.config.js"));

        assert!(launcher.contains("$ConfigPath = 'C:\\Users\\o''neil\\dev\\commitlint.config.js'"));
        assert!(launcher.contains("--edit $CommitMsgFile --config $ConfigPath"));
        assert!(launcher.contains("exit $exitCode"));
        assert!(launcher.is_ascii());
        for line in REJECTION_BANNER {
            assert!(launcher.contains(line), "banner line missing: {line}");
        }
    }

    #[test]
    fn test_launcher_checks_message_file_before_linting() {
        let launcher = render_launcher(Path::new("/x/commitlint.config.js"));
        let check = launcher.find("Test-Path -LiteralPath $CommitMsgFile").unwrap();
        let invoke = launcher.find("& npx").unwrap();
        assert!(check < invoke);
    }

    #[test]
    fn test_wrapper_forwards_first_argument() {
        let wrapper = render_wrapper("powershell.exe");
        assert!(wrapper.starts_with("#!/bin/sh\n"));
        assert!(wrapper.contains("'powershell.exe' -NoProfile -ExecutionPolicy Bypass -File \"$hook_dir/commit-msg.ps1\" \"$1\""));
        assert!(!wrapper.contains('\r'));
    }

    #[test]
    fn test_wrapper_quotes_shell_path() {
        let wrapper = render_wrapper("C:/Program Files/PowerShell/7/pwsh.exe");
        assert!(wrapper.contains("\n'C:/Program Files/PowerShell/7/pwsh.exe' -NoProfile"));

        let wrapper = render_wrapper("/opt/o'neil/pwsh");
        assert!(wrapper.contains(r"'/opt/o'\''neil/pwsh' -NoProfile"));
    }

    #[test]
    fn test_launcher_doubles_typographic_quotes() {
        let launcher = render_launcher(Path::new("C:\\Users\\O\u{2019}Neil\\commitlint.config.js"));
        assert!(launcher.contains("$ConfigPath = 'C:\\Users\\O\u{2019}\u{2019}Neil\\commitlint.config.js'"));

        assert_eq!(ps_single_quote("a\u{2018}b\u{201B}c"), "'a\u{2018}\u{2018}b\u{201B}\u{201B}c'");
        assert_eq!(ps_single_quote("\u{201C}plain\u{201D}"), "'\u{201C}plain\u{201D}'");
    }

    #[test]
    fn test_encode_line_endings() {
        assert_eq!(encode("a\r\nb\n", LineEnding::Lf), b"a\nb\n");
        assert_eq!(encode("a\nb", LineEnding::CrLf), b"a\r\nb\r\n");
        assert_eq!(encode("\u{feff}a\n", LineEnding::Lf), b"a\n");
    }

    #[test]
    fn test_plan_layout() {
        let base = Path::new("/work");
        let set = plan_artifacts(base, &Settings::default());

        assert_eq!(set.config.path, base.join("commitlint.config.js"));
        assert_eq!(set.launcher.path, base.join(".githooks").join("commit-msg.ps1"));
        assert_eq!(set.wrapper.path, base.join(".githooks").join("commit-msg"));
        assert_eq!(set.launcher.line_ending, LineEnding::CrLf);
        assert_eq!(set.wrapper.line_ending, LineEnding::Lf);
        assert!(set.wrapper.executable);
    }

    #[test]
    fn test_write_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let set = plan_artifacts(temp_dir.path(), &Settings::default());

        let written = write_artifacts(&set).unwrap();
        assert_eq!(written.len(), 3);
        let first: Vec<Vec<u8>> = written.iter().map(|p| fs::read(p).unwrap()).collect();

        write_artifacts(&set).unwrap();
        let second: Vec<Vec<u8>> = written.iter().map(|p| fs::read(p).unwrap()).collect();
        assert_eq!(first, second);

        for bytes in &first {
            assert!(!bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
        }
        assert!(first[1].windows(2).any(|w| w == b"\r\n"));
        assert!(!first[2].contains(&b'\r'));
        assert_eq!(fs::read_dir(temp_dir.path().join(".githooks")).unwrap().count(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_wrapper_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let set = plan_artifacts(temp_dir.path(), &Settings::default());
        write_artifacts(&set).unwrap();

        let mode = fs::metadata(&set.wrapper.path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
        let mode = fs::metadata(&set.config.path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_failure_is_reported() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let locked = temp_dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Root ignores directory permissions
        if fs::write(locked.join("probe"), "x").is_ok() {
            return;
        }

        let set = plan_artifacts(&locked, &Settings::default());
        let err = write_artifacts(&set).unwrap_err();
        assert!(matches!(err, SetupError::ArtifactWrite { .. }));
    }
}
