use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Probes a build's tooling connection for duplicate dependency models.
#[derive(Debug, Parser)]
#[clap(version, about)]
pub struct CliArgs {
    /// Root directory of the build to probe (defaults to the current directory)
    #[clap(short, long, env = "MODELPROBE_PROJECT")]
    pub project: Option<PathBuf>,
    /// Use this Gradle installation instead of the one on the PATH
    #[clap(long)]
    pub gradle_install: Option<PathBuf>,
    /// Run the build in-process instead of through the daemon
    #[clap(long)]
    pub embedded: bool,
    #[clap(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Connect to the build, fetch every project's model and inspect it (the default)
    Probe,
    /// Inspect a previously captured model dump without connecting to a build
    Inspect {
        /// Path to the TOML model dump
        dump: PathBuf,
    },
}
