//! The setup pipeline: resolve, provision, write, configure

use crate::artifacts::{plan_artifacts, write_artifacts};
use crate::directory::resolve_base_directory;
use crate::git::{configure_hooks_path, mark_executable, require_git, ExistingHooksPath};
use crate::provision::{ensure_dependencies, shim_dir};
use crate::runner::{CommandRunner, SearchPath};
use crate::types::{ProvisionReport, SetupReport, Settings, StepOutcome};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;

/// Choices made on the command line.
#[derive(Debug, Clone)]
pub struct SetupOptions {
    pub settings: Settings,
    pub skip_deps: bool,
    pub existing_hooks_path: ExistingHooksPath,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            skip_deps: false,
            existing_hooks_path: ExistingHooksPath::Overwrite,
        }
    }
}

/// Snapshot of the process environment the pipeline reads from.
///
/// Captured once so each stage gets it as a value and tests can build one
/// without touching the real environment.
#[derive(Debug, Clone, Default)]
pub struct SessionEnv {
    pub vars: HashMap<String, String>,
    pub search_path: SearchPath,
    pub cwd: PathBuf,
}

impl SessionEnv {
    pub fn capture() -> Result<Self> {
        Ok(Self {
            vars: std::env::vars().collect(),
            search_path: SearchPath::from_env(),
            cwd: std::env::current_dir().context("Failed to read the current directory")?,
        })
    }

    /// Environment lookup; names are case-insensitive on Windows
    pub fn var(&self, name: &str) -> Option<String> {
        if let Some(value) = self.vars.get(name) {
            return Some(value.clone());
        }
        if cfg!(windows) {
            return self.vars.iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.clone());
        }
        None
    }
}

/// Runs the whole setup for the directory the user typed.
///
/// Steps, in order:
/// 1. Resolve the directory (fatal on blank or unresolvable input)
/// 2. Install the runtime and commitlint (warnings only)
/// 3. Require git (fatal)
/// 4. Write the config, launcher and wrapper (fatal on write errors)
/// 5. Point the global hooks path at the hooks directory (warning on failure)
///
/// # Returns
/// * `Ok(SetupReport)` - Files written and the outcome of each best-effort step
/// * `Err` - A fatal [`crate::SetupError`], before or during writing
pub fn run_setup<R: CommandRunner>(
    runner: &mut R,
    options: &SetupOptions,
    session: &SessionEnv,
    raw_input: &str,
) -> Result<SetupReport> {
    let settings = &options.settings;
    let base_dir = resolve_base_directory(raw_input, |name| session.var(name), &session.cwd)?;
    println!("📁 Using {}", base_dir.display());

    let (search_path, provisioning) = if options.skip_deps {
        let mut report = ProvisionReport::default();
        report.push(StepOutcome::skipped("dependencies", "skipped (--skip-deps)"));
        (session.search_path.clone(), report)
    } else {
        println!("\n🔧 Checking prerequisites...");
        let shims = shim_dir(|name| session.var(name));
        ensure_dependencies(runner, settings, session.search_path.clone(), shims.as_deref())
    };

    require_git(runner, &search_path)?;

    println!("\n📝 Writing hook files...");
    let artifacts = plan_artifacts(&base_dir, settings);
    let files = write_artifacts(&artifacts)?;
    for file in &files {
        println!("   {}", file.display());
    }

    println!("\n🔗 Configuring git...");
    let hooks_dir = base_dir.join(&settings.hooks_dir);
    let (hooks_outcome, previous_hooks_path) =
        configure_hooks_path(runner, &search_path, &hooks_dir, options.existing_hooks_path);
    let executable = mark_executable(runner, &search_path, &base_dir, &artifacts.wrapper.path);

    Ok(SetupReport {
        base_dir,
        hooks_dir,
        files,
        provisioning,
        git: vec![hooks_outcome, executable],
        previous_hooks_path,
    })
}

/// Prints the end-of-run summary with remediation for every warning
pub fn print_summary(report: &SetupReport) {
    println!("\n📋 Summary");
    println!("==========");
    for step in report.provisioning.steps.iter().chain(report.git.iter()) {
        println!("{step}");
    }

    if let Some(previous) = &report.previous_hooks_path {
        println!("\nℹ️  core.hooksPath was previously {previous}");
    }

    let warnings: Vec<&StepOutcome> = report.warnings().collect();
    if warnings.is_empty() {
        println!("\n🎉 Setup complete! Commit messages are now checked by commitlint.");
        return;
    }

    eprintln!("\n⚠️  Setup finished with {} warning(s). The hook files were written; to finish:", warnings.len());
    for warning in warnings {
        if let Some(remediation) = &warning.remediation {
            eprintln!("   • {}: {remediation}", warning.step);
        }
    }
}
