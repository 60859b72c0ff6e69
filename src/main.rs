//! commitlint-setup
//!
//! Interactive setup that makes commitlint check every commit message on a
//! Windows developer machine. It asks for a folder, installs scoop, Node.js
//! and commitlint when they are missing, writes `commitlint.config.js` plus a
//! PowerShell `commit-msg` hook with a POSIX wrapper, and points git's global
//! `core.hooksPath` at the generated `.githooks` folder.
//!
//! # Usage
//!
//! - no arguments: Prompt for the folder and run the full setup
//! - `--dir <DIR>`: Use DIR instead of prompting
//! - `--skip-deps`: Only write the hook files and configure git
//! - `lint --edit <FILE>`: Check a commit message without Node.js

use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    match commitlint_setup::run_cli() {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}
