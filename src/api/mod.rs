use std::path::{Path, PathBuf};

use crate::cli::command_handlers::{do_inspect, do_probe};

mod builder;

pub use builder::ModelprobeBuilder;

/// Programmatic entry point mirroring the CLI.
pub struct Modelprobe {
    project_dir: PathBuf,
    installation: Option<PathBuf>,
    embedded: bool,
}

impl Modelprobe {
    pub fn builder() -> ModelprobeBuilder {
        ModelprobeBuilder::default()
    }

    pub(crate) fn new(
        project_dir: PathBuf,
        installation: Option<PathBuf>,
        embedded: bool,
    ) -> Modelprobe {
        Modelprobe {
            project_dir,
            installation,
            embedded,
        }
    }

    /// Connects to the build and inspects every project's dependency model.
    pub fn probe(&self) -> anyhow::Result<()> {
        do_probe(&self.project_dir, self.installation.as_deref(), self.embedded)
    }

    /// Inspects a previously captured model dump without connecting to a build.
    pub fn inspect(&self, dump_file: impl AsRef<Path>) -> anyhow::Result<()> {
        do_inspect(dump_file.as_ref())
    }
}
