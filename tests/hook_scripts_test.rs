//! Runs the generated wrapper and launcher against stub programs
#![cfg(unix)]

use commitlint_setup::artifacts::{plan_artifacts, write_artifacts};
use commitlint_setup::types::ArtifactSet;
use commitlint_setup::Settings;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_commitlint-setup");

fn write_stub(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn path_with(dir: &Path) -> String {
    let current = std::env::var("PATH").unwrap_or_default();
    format!("{}:{current}", dir.display())
}

fn generate(base: &Path) -> ArtifactSet {
    let set = plan_artifacts(base, &Settings::default());
    write_artifacts(&set).unwrap();
    set
}

/// Test the wrapper forwards the message path unchanged and returns the launcher's status
#[test]
fn test_wrapper_forwards_argument_and_exit_code() {
    let temp_dir = TempDir::new().unwrap();
    let set = generate(temp_dir.path());

    let bin_dir = temp_dir.path().join("bin");
    fs::create_dir(&bin_dir).unwrap();
    let log = temp_dir.path().join("args.log");
    write_stub(&bin_dir, "powershell.exe", "printf '%s\\n' \"$@\" > \"$STUB_LOG\"\nexit 7\n");

    let message = "/work/my repo/.git/COMMIT_EDITMSG";
    let status = Command::new(&set.wrapper.path)
        .arg(message)
        .env("PATH", path_with(&bin_dir))
        .env("STUB_LOG", &log)
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(7));
    let logged = fs::read_to_string(&log).unwrap();
    let args: Vec<&str> = logged.lines().collect();
    let launcher = format!("{}/commit-msg.ps1", set.wrapper.path.parent().unwrap().display());
    assert_eq!(args, vec!["-NoProfile", "-ExecutionPolicy", "Bypass", "-File", launcher.as_str(), message]);
}

/// Test a launcher shell whose path contains a space still runs
#[test]
fn test_wrapper_runs_shell_path_with_space() {
    let temp_dir = TempDir::new().unwrap();
    let shell_dir = temp_dir.path().join("Program Files").join("PowerShell");
    fs::create_dir_all(&shell_dir).unwrap();
    let log = temp_dir.path().join("args.log");
    let shell = write_stub(&shell_dir, "pwsh", "printf '%s\\n' \"$@\" > \"$STUB_LOG\"\nexit 3\n");

    let settings = Settings {
        launcher_shell: shell.to_string_lossy().to_string(),
        ..Settings::default()
    };
    let set = plan_artifacts(temp_dir.path(), &settings);
    write_artifacts(&set).unwrap();

    let output = Command::new(&set.wrapper.path)
        .arg("COMMIT_EDITMSG")
        .env("STUB_LOG", &log)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let logged = fs::read_to_string(&log).unwrap();
    assert_eq!(logged.lines().last(), Some("COMMIT_EDITMSG"));
}

/// Test a successful launcher lets the commit through
#[test]
fn test_wrapper_passes_success_through() {
    let temp_dir = TempDir::new().unwrap();
    let set = generate(temp_dir.path());

    let bin_dir = temp_dir.path().join("bin");
    fs::create_dir(&bin_dir).unwrap();
    write_stub(&bin_dir, "powershell.exe", "exit 0\n");

    let status = Command::new(&set.wrapper.path)
        .arg("COMMIT_EDITMSG")
        .env("PATH", path_with(&bin_dir))
        .status()
        .unwrap();
    assert!(status.success());
}

/// Test the launcher end to end when PowerShell is available, with npx routed to the native check
#[test]
fn test_launcher_accepts_and_rejects() {
    let Ok(pwsh) = which::which("pwsh") else {
        eprintln!("pwsh not found, skipping");
        return;
    };

    let temp_dir = TempDir::new().unwrap();
    let set = generate(temp_dir.path());

    let bin_dir = temp_dir.path().join("bin");
    fs::create_dir(&bin_dir).unwrap();
    write_stub(
        &bin_dir,
        "npx",
        "touch \"$NPX_MARKER\"\nwhile [ \"$#\" -gt 0 ] && [ \"$1\" != \"commitlint\" ]; do shift; done\nshift\nexec \"$LINT_BIN\" lint \"$@\"\n",
    );
    let marker = temp_dir.path().join("npx-called");

    let run = |message: &str| {
        let file = temp_dir.path().join("COMMIT_EDITMSG");
        fs::write(&file, message).unwrap();
        Command::new(&pwsh)
            .args(["-NoProfile", "-File"])
            .arg(&set.launcher.path)
            .arg(&file)
            .env("PATH", path_with(&bin_dir))
            .env("LINT_BIN", BIN)
            .env("NPX_MARKER", &marker)
            .output()
            .unwrap()
    };

    let accepted = run("feat: add login endpoint\n");
    assert_eq!(accepted.status.code(), Some(0));

    let rejected = run("added login\n");
    assert_ne!(rejected.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&rejected.stdout).contains("<type>(<scope>): <subject>"));

    assert!(marker.exists());
    fs::remove_file(&marker).unwrap();

    let missing = Command::new(&pwsh)
        .args(["-NoProfile", "-File"])
        .arg(&set.launcher.path)
        .arg(temp_dir.path().join("absent"))
        .env("PATH", path_with(&bin_dir))
        .env("LINT_BIN", BIN)
        .env("NPX_MARKER", &marker)
        .output()
        .unwrap();
    assert_eq!(missing.status.code(), Some(2));
    assert!(!marker.exists(), "npx must not run without a message file");
    assert!(!String::from_utf8_lossy(&missing.stdout).contains("<type>(<scope>): <subject>"));
}
