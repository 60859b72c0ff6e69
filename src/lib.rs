//! commitlint-setup
//!
//! Library behind the `commitlint-setup` binary: directory resolution,
//! best-effort provisioning, hook file generation and git configuration.

// Public API - main functions and essential types for external users
pub use cli::run_cli;
pub use error::SetupError;
pub use installer::{run_setup, SessionEnv, SetupOptions};
pub use types::{Settings, SetupReport, StepOutcome, StepStatus};

// Modules needed by internal binary and tests
pub mod artifacts;
pub mod cli;
pub mod git;
pub mod lint;
pub mod runner;
pub mod types;

// Private implementation modules
mod config;
mod directory;
mod error;
mod installer;
mod provision;
