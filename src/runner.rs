//! External command execution and the session search path
//!
//! Every external program (scoop, npm, git, powershell) goes through
//! [`CommandRunner`], with the search path passed in explicitly. Tests swap in
//! a scripted runner; the real one spawns processes.

use anyhow::{Context, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Executable search path for the current session.
///
/// Provisioning may prepend directories (package manager shims); the value is
/// handed back to the caller instead of being written to the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    entries: Vec<PathBuf>,
}

impl SearchPath {
    /// Reads `PATH` from the process environment
    pub fn from_env() -> Self {
        std::env::var_os("PATH")
            .map(|value| Self::from_os(&value))
            .unwrap_or_default()
    }

    /// Splits a platform `PATH` string
    pub fn from_os(value: &OsStr) -> Self {
        Self {
            entries: std::env::split_paths(value)
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
        }
    }

    pub fn from_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            entries: dirs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn contains(&self, dir: &Path) -> bool {
        self.entries.iter().any(|e| e == dir)
    }

    /// Puts `dir` first, unless it is already present
    pub fn prepend(&mut self, dir: PathBuf) {
        if !self.contains(&dir) {
            self.entries.insert(0, dir);
        }
    }

    /// Joins the entries back into a platform `PATH` string
    pub fn to_os_string(&self) -> Result<OsString> {
        std::env::join_paths(&self.entries).context("Search path contains an invalid entry")
    }

    /// Locates a program, honoring `PATHEXT` on Windows
    pub fn find(&self, program: &str) -> Option<PathBuf> {
        let joined = self.to_os_string().ok()?;
        which::which_in(program, Some(joined), ".").ok()
    }
}

/// One external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Capture stdout/stderr instead of streaming them to the console
    pub capture: bool,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            capture: false,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn capture(mut self) -> Self {
        self.capture = true;
        self
    }

    /// Command line as a user would type it, for remediation hints
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Seam for running external programs.
pub trait CommandRunner {
    /// Runs a command to completion. `Err` means it could not be started.
    fn run(&mut self, spec: &CommandSpec, path: &SearchPath) -> std::io::Result<CommandOutput>;

    /// Locates a program on the search path
    fn locate(&self, program: &str, path: &SearchPath) -> Option<PathBuf> {
        path.find(program)
    }
}

/// Runs commands as real child processes.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, spec: &CommandSpec, path: &SearchPath) -> std::io::Result<CommandOutput> {
        let resolved = path.find(&spec.program)
            .ok_or_else(|| std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found on PATH", spec.program),
            ))?;

        let mut command = if is_batch_script(&resolved) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&resolved);
            c
        } else {
            Command::new(&resolved)
        };
        command.args(&spec.args);

        if let Ok(joined) = path.to_os_string() {
            command.env("PATH", joined);
        }
        if let Some(cwd) = &spec.cwd {
            command.current_dir(cwd);
        }

        tracing::debug!(command = %spec.display(), program = %resolved.display(), "running");

        if spec.capture {
            let output = command.stdin(Stdio::null()).output()?;
            Ok(CommandOutput {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        } else {
            let status = command.status()?;
            Ok(CommandOutput {
                code: status.code(),
                ..Default::default()
            })
        }
    }
}

/// npm and friends ship as `.cmd` shims on Windows
fn is_batch_script(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("cmd") || e.eq_ignore_ascii_case("bat"))
}
