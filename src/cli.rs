//! CLI interface and main entry point

use crate::config::load_settings;
use crate::directory::prompt_directory;
use crate::git::ExistingHooksPath;
use crate::installer::{print_summary, run_setup, SessionEnv, SetupOptions};
use crate::lint::{run_lint, EXIT_MISSING_INPUT, EXIT_REJECTED};
use crate::runner::SystemRunner;
use crate::types::Settings;
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use std::io;
use std::path::{Path, PathBuf};

fn setup_args() -> Vec<Arg> {
    vec![
        Arg::new("dir")
            .long("dir")
            .value_name("DIR")
            .help("Folder for commitlint.config.js and .githooks (skips the prompt)"),
        Arg::new("skip-deps")
            .long("skip-deps")
            .help("Do not check or install scoop, Node.js and commitlint")
            .action(clap::ArgAction::SetTrue),
        Arg::new("keep-hooks-path")
            .long("keep-hooks-path")
            .help("Leave an existing global core.hooksPath untouched")
            .action(clap::ArgAction::SetTrue),
        Arg::new("settings")
            .long("settings")
            .value_name("FILE")
            .value_parser(clap::value_parser!(PathBuf))
            .help("TOML file overriding package names and the launcher shell"),
    ]
}

/// Builds the command-line definition.
pub fn build_cli() -> Command {
    Command::new("commitlint-setup")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Sets up commitlint as a global git commit-msg hook")
        .args_conflicts_with_subcommands(true)
        .args(setup_args())
        .subcommand(
            Command::new("setup")
                .about("Install prerequisites, write the hook files and set core.hooksPath (default)")
                .args(setup_args()),
        )
        .subcommand(
            Command::new("lint")
                .about("Check a commit message file against the conventional-commits rules")
                .arg(
                    Arg::new("edit")
                        .short('e')
                        .long("edit")
                        .value_name("FILE")
                        .value_parser(clap::value_parser!(PathBuf))
                        .required(true)
                        .help("Commit message file, as passed to the commit-msg hook"),
                )
                .arg(
                    Arg::new("config")
                        .short('g')
                        .long("config")
                        .value_name("PATH")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("commitlint config that must exist next to the hooks"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the lint report as JSON")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}

/// Main entry point for commitlint-setup.
///
/// Parses command-line arguments and dispatches to the appropriate mode:
/// - no subcommand or `setup`: Interactive setup
/// - `lint`: Check one commit message file
///
/// # Returns
/// * `Ok(i32)` - Process exit code
/// * `Err` - A fatal setup error
pub fn run_cli() -> Result<i32> {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("lint", sub)) => run_lint_command(sub),
        Some(("setup", sub)) => run_setup_command(sub),
        _ => run_setup_command(&matches),
    }
}

fn run_setup_command(matches: &ArgMatches) -> Result<i32> {
    let settings = match matches.get_one::<PathBuf>("settings") {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };

    let options = SetupOptions {
        settings,
        skip_deps: matches.get_flag("skip-deps"),
        existing_hooks_path: if matches.get_flag("keep-hooks-path") {
            ExistingHooksPath::Keep
        } else {
            ExistingHooksPath::Overwrite
        },
    };

    println!("🚀 commitlint setup");
    println!("===================\n");

    let raw_input = match matches.get_one::<String>("dir") {
        Some(dir) => dir.clone(),
        None => prompt_directory(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    let session = SessionEnv::capture()?;
    let report = run_setup(&mut SystemRunner, &options, &session, &raw_input)?;
    print_summary(&report);
    Ok(0)
}

fn run_lint_command(matches: &ArgMatches) -> Result<i32> {
    let message_file = matches.get_one::<PathBuf>("edit")
        .expect("edit argument is required");
    let config = matches.get_one::<PathBuf>("config").map(PathBuf::as_path);

    if matches.get_flag("json") {
        return lint_as_json(message_file, config);
    }
    run_lint(message_file, config, &mut io::stdout())
}

fn lint_as_json(message_file: &Path, config: Option<&Path>) -> Result<i32> {
    let missing = std::iter::once(message_file)
        .chain(config)
        .find(|path| !path.is_file());
    if let Some(path) = missing {
        eprintln!("commit-msg: file not found: {}", path.display());
        return Ok(EXIT_MISSING_INPUT);
    }
    let report = conventional_commit::lint_file(message_file)
        .with_context(|| format!("Failed to lint {}", message_file.display()))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(if report.valid { 0 } else { EXIT_REJECTED })
}
