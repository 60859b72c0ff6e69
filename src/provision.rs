//! Best-effort installation of the package manager, runtime and linter
//!
//! Nothing in here fails the run. Each step reports a [`StepOutcome`] and the
//! hook files get written regardless, so the user can finish the remaining
//! prerequisites by hand.

use crate::runner::{CommandRunner, CommandSpec, SearchPath};
use crate::types::{ProvisionReport, Settings, StepOutcome};
use std::path::{Path, PathBuf};

const STEP_PACKAGE_MANAGER: &str = "package manager";
const STEP_RUNTIME: &str = "runtime";
const STEP_LINTER: &str = "commitlint";

/// Where the package manager keeps its shims.
///
/// Honors `SCOOP` when set, otherwise `<home>/scoop/shims`.
pub fn shim_dir<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(root) = lookup("SCOOP").filter(|r| !r.is_empty()) {
        return Some(PathBuf::from(root).join("shims"));
    }
    lookup("USERPROFILE")
        .or_else(|| lookup("HOME"))
        .map(|home| PathBuf::from(home).join("scoop").join("shims"))
}

/// Ensures the runtime and linter are installed.
///
/// # Arguments
/// * `runner` - Executes and locates external programs
/// * `settings` - Package names and installer command
/// * `path` - Search path of the current session
/// * `shim_dir` - Package manager shim directory, prepended when it exists
///
/// # Returns
/// The search path later stages should use, and what each step did.
pub fn ensure_dependencies<R: CommandRunner>(
    runner: &mut R,
    settings: &Settings,
    mut path: SearchPath,
    shim_dir: Option<&Path>,
) -> (SearchPath, ProvisionReport) {
    let mut report = ProvisionReport::default();

    println!("📦 Checking for {}...", settings.runtime_program);
    if let Some(found) = runner.locate(&settings.runtime_program, &path) {
        report.push(StepOutcome::skipped(
            STEP_RUNTIME,
            format!("{} already available at {}", settings.runtime_program, found.display()),
        ));
    } else if !install_runtime(runner, settings, &mut path, shim_dir, &mut report) {
        add_shims(&mut path, shim_dir);
        return (path, report);
    }

    add_shims(&mut path, shim_dir);
    report.push(install_linter(runner, settings, &path));
    (path, report)
}

/// Returns false when the stage should stop before the linter step
fn install_runtime<R: CommandRunner>(
    runner: &mut R,
    settings: &Settings,
    path: &mut SearchPath,
    shim_dir: Option<&Path>,
    report: &mut ProvisionReport,
) -> bool {
    let manager = settings.package_manager.as_str();

    if runner.locate(manager, path).is_none() {
        println!("📥 {manager} not found, bootstrapping it...");
        let bootstrap = CommandSpec::new("powershell").args([
            "-NoProfile",
            "-ExecutionPolicy",
            "Bypass",
            "-Command",
            settings.package_manager_installer.as_str(),
        ]);

        let remediation = format!(
            "Install {manager} manually (powershell -Command \"{}\") and re-run setup",
            settings.package_manager_installer
        );
        if let Err(detail) = run_step(runner, &bootstrap, path) {
            report.push(StepOutcome::warning(STEP_PACKAGE_MANAGER, detail, remediation));
            return false;
        }

        add_shims(path, shim_dir);
        if runner.locate(manager, path).is_none() {
            report.push(StepOutcome::warning(
                STEP_PACKAGE_MANAGER,
                format!("{manager} installer finished but {manager} is still not on PATH"),
                remediation,
            ));
            return false;
        }
        report.push(StepOutcome::ok(STEP_PACKAGE_MANAGER, format!("{manager} installed")));
    } else {
        report.push(StepOutcome::skipped(STEP_PACKAGE_MANAGER, format!("{manager} already available")));
    }

    println!("📥 Installing {} with {manager}...", settings.runtime_package);
    let install = CommandSpec::new(manager).args(["install", settings.runtime_package.as_str()]);
    let install_result = run_step(runner, &install, path);

    add_shims(path, shim_dir);
    let runtime = settings.runtime_program.as_str();
    match (install_result, runner.locate(runtime, path)) {
        (_, Some(found)) => {
            report.push(StepOutcome::ok(STEP_RUNTIME, format!("{runtime} available at {}", found.display())));
            true
        }
        (Err(detail), None) => {
            report.push(StepOutcome::warning(
                STEP_RUNTIME,
                detail,
                format!("Run `{}` in a new terminal and re-run setup", install.display()),
            ));
            false
        }
        (Ok(()), None) => {
            report.push(StepOutcome::warning(
                STEP_RUNTIME,
                format!("{runtime} is still not on PATH after installing {}", settings.runtime_package),
                "Open a new terminal so PATH is refreshed, then re-run setup",
            ));
            false
        }
    }
}

fn install_linter<R: CommandRunner>(runner: &mut R, settings: &Settings, path: &SearchPath) -> StepOutcome {
    let install = CommandSpec::new("npm")
        .args(["install", "-g"])
        .args(settings.linter_packages.iter().map(String::as_str));
    let remediation = format!("Run `{}` once npm is on PATH", install.display());

    if runner.locate("npm", path).is_none() {
        return StepOutcome::warning(STEP_LINTER, "npm was not found on PATH", remediation);
    }

    println!("📥 Installing {}...", settings.linter_packages.join(" "));
    match run_step(runner, &install, path) {
        Ok(()) => StepOutcome::ok(STEP_LINTER, format!("installed {}", settings.linter_packages.join(", "))),
        Err(detail) => StepOutcome::warning(STEP_LINTER, detail, remediation),
    }
}

/// Runs one command, folding spawn errors and exit codes into a message
fn run_step<R: CommandRunner>(runner: &mut R, spec: &CommandSpec, path: &SearchPath) -> Result<(), String> {
    match runner.run(spec, path) {
        Ok(output) if output.success() => Ok(()),
        Ok(output) => {
            let code = output.code.map_or_else(|| "a signal".to_string(), |c| c.to_string());
            tracing::warn!(command = %spec.display(), %code, stderr = %output.stderr.trim(), "step failed");
            Err(format!("`{}` exited with {code}", spec.display()))
        }
        Err(e) => {
            tracing::warn!(command = %spec.display(), error = %e, "step could not start");
            Err(format!("`{}` could not be started: {e}", spec.display()))
        }
    }
}

fn add_shims(path: &mut SearchPath, shim_dir: Option<&Path>) {
    if let Some(dir) = shim_dir.filter(|d| d.is_dir()) {
        path.prepend(dir.to_path_buf());
    }
}
