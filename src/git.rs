//! Global hooks path configuration

use crate::error::SetupError;
use crate::runner::{CommandRunner, CommandSpec, SearchPath};
use crate::types::StepOutcome;
use std::path::{Path, PathBuf};

pub const HOOKS_PATH_KEY: &str = "core.hooksPath";

const STEP_HOOKS_PATH: &str = "git hooks path";
const STEP_EXECUTABLE: &str = "executable bit";

/// What to do when `core.hooksPath` already points somewhere else
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingHooksPath {
    Overwrite,
    Keep,
}

/// Git expects forward slashes in config values, on every platform
pub fn to_git_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn normalize(value: &str) -> String {
    let value = value.trim().replace('\\', "/");
    let trimmed = value.trim_end_matches('/');
    if trimmed.is_empty() { value } else { trimmed.to_string() }
}

/// Fails the run when git is not installed
pub fn require_git<R: CommandRunner>(runner: &R, path: &SearchPath) -> Result<PathBuf, SetupError> {
    runner.locate("git", path).ok_or_else(|| SetupError::missing_tool("git"))
}

/// Current global `core.hooksPath`, if set
pub fn read_global_hooks_path<R: CommandRunner>(runner: &mut R, path: &SearchPath) -> Option<String> {
    let spec = CommandSpec::new("git")
        .args(["config", "--global", "--get", HOOKS_PATH_KEY])
        .capture();
    match runner.run(&spec, path) {
        Ok(output) if output.success() => {
            let value = output.stdout.trim().to_string();
            (!value.is_empty()).then_some(value)
        }
        _ => None,
    }
}

/// Points the global hooks path at `hooks_dir`.
///
/// # Returns
/// The step outcome and the previous value when it differed from `hooks_dir`.
pub fn configure_hooks_path<R: CommandRunner>(
    runner: &mut R,
    path: &SearchPath,
    hooks_dir: &Path,
    existing: ExistingHooksPath,
) -> (StepOutcome, Option<String>) {
    let target = to_git_path(hooks_dir);
    let set = CommandSpec::new("git")
        .args(["config", "--global", HOOKS_PATH_KEY, target.as_str()])
        .capture();

    let previous = read_global_hooks_path(runner, path);
    if previous.as_deref().map(normalize) == Some(normalize(&target)) {
        return (StepOutcome::skipped(STEP_HOOKS_PATH, format!("{HOOKS_PATH_KEY} already set to {target}")), None);
    }

    if let Some(old) = &previous {
        tracing::debug!(%old, new = %target, "replacing global hooks path");
        if existing == ExistingHooksPath::Keep {
            return (
                StepOutcome::warning(
                    STEP_HOOKS_PATH,
                    format!("kept existing {HOOKS_PATH_KEY} = {old}; the new hooks are not active"),
                    format!("Run `{}` to activate them", set.display()),
                ),
                previous,
            );
        }
    }

    let outcome = match runner.run(&set, path) {
        Ok(output) if output.success() => {
            StepOutcome::ok(STEP_HOOKS_PATH, format!("{HOOKS_PATH_KEY} = {target}"))
        }
        Ok(output) => StepOutcome::warning(
            STEP_HOOKS_PATH,
            format!("git config failed: {}", output.stderr.trim()),
            format!("Run `{}` manually", set.display()),
        ),
        Err(e) => StepOutcome::warning(
            STEP_HOOKS_PATH,
            format!("git could not be started: {e}"),
            format!("Run `{}` manually", set.display()),
        ),
    };
    (outcome, previous)
}

/// Records the wrapper as executable in the index of the repository at `base_dir`.
///
/// Outside a repository, or when the file is untracked, this quietly does nothing.
pub fn mark_executable<R: CommandRunner>(
    runner: &mut R,
    path: &SearchPath,
    base_dir: &Path,
    wrapper: &Path,
) -> StepOutcome {
    let relative = wrapper.strip_prefix(base_dir).unwrap_or(wrapper);
    let spec = CommandSpec::new("git")
        .args(["update-index", "--chmod=+x"])
        .args([to_git_path(relative)])
        .current_dir(base_dir)
        .capture();

    match runner.run(&spec, path) {
        Ok(output) if output.success() => {
            StepOutcome::ok(STEP_EXECUTABLE, format!("{} marked +x in the index", to_git_path(relative)))
        }
        _ => StepOutcome::skipped(STEP_EXECUTABLE, "not tracked by a repository here"),
    }
}
