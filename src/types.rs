//! Type definitions for commitlint-setup

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Tunable names and commands for the external collaborators.
///
/// Loaded from an optional TOML file; every field falls back to the values
/// used for a Scoop + Node.js LTS setup on Windows.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Hooks directory, relative to the base directory
    pub hooks_dir: String,
    /// Program whose presence means the runtime is installed
    pub runtime_program: String,
    /// Package manager used to install the runtime
    pub package_manager: String,
    /// PowerShell expression that bootstraps the package manager
    pub package_manager_installer: String,
    /// Package manager package providing the runtime
    pub runtime_package: String,
    /// Packages installed globally through npm
    pub linter_packages: Vec<String>,
    /// Shell the POSIX wrapper hands the launcher to
    pub launcher_shell: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hooks_dir: ".githooks".to_string(),
            runtime_program: "node".to_string(),
            package_manager: "scoop".to_string(),
            package_manager_installer: "irm get.scoop.sh | iex".to_string(),
            runtime_package: "nodejs-lts".to_string(),
            linter_packages: vec![
                "@commitlint/cli".to_string(),
                "@commitlint/config-conventional".to_string(),
            ],
            launcher_shell: "powershell.exe".to_string(),
        }
    }
}

/// How a best-effort step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Ok,
    Skipped,
    Warning,
}

/// Outcome of one best-effort step, with text for the final summary.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub step: String,
    pub status: StepStatus,
    pub detail: String,
    pub remediation: Option<String>,
}

impl StepOutcome {
    pub fn ok(step: &str, detail: impl Into<String>) -> Self {
        Self {
            step: step.to_string(),
            status: StepStatus::Ok,
            detail: detail.into(),
            remediation: None,
        }
    }

    pub fn skipped(step: &str, detail: impl Into<String>) -> Self {
        Self {
            step: step.to_string(),
            status: StepStatus::Skipped,
            detail: detail.into(),
            remediation: None,
        }
    }

    pub fn warning(step: &str, detail: impl Into<String>, remediation: impl Into<String>) -> Self {
        Self {
            step: step.to_string(),
            status: StepStatus::Warning,
            detail: detail.into(),
            remediation: Some(remediation.into()),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.status == StepStatus::Warning
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let glyph = match self.status {
            StepStatus::Ok => "✅",
            StepStatus::Skipped => "⏭️ ",
            StepStatus::Warning => "⚠️ ",
        };
        write!(f, "{glyph} {}: {}", self.step, self.detail)
    }
}

/// Everything the dependency stage did, in order.
#[derive(Debug, Clone, Default)]
pub struct ProvisionReport {
    pub steps: Vec<StepOutcome>,
}

impl ProvisionReport {
    pub fn push(&mut self, outcome: StepOutcome) {
        self.steps.push(outcome);
    }

    /// True when every step either succeeded or was not needed
    pub fn is_complete(&self) -> bool {
        !self.steps.iter().any(StepOutcome::is_warning)
    }
}

/// Line ending applied when an artifact is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// A rendered file waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub content: String,
    pub line_ending: LineEnding,
    pub executable: bool,
}

/// The three artifacts setup writes, in dependency order.
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    pub config: Artifact,
    pub launcher: Artifact,
    pub wrapper: Artifact,
}

impl ArtifactSet {
    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        [&self.config, &self.launcher, &self.wrapper].into_iter()
    }
}

/// Final report printed at the end of a run.
#[derive(Debug, Clone)]
pub struct SetupReport {
    pub base_dir: PathBuf,
    pub hooks_dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub provisioning: ProvisionReport,
    pub git: Vec<StepOutcome>,
    pub previous_hooks_path: Option<String>,
}

impl SetupReport {
    pub fn warnings(&self) -> impl Iterator<Item = &StepOutcome> {
        self.provisioning.steps.iter()
            .chain(self.git.iter())
            .filter(|s| s.is_warning())
    }
}
