use std::{env, path::PathBuf};

use crate::Modelprobe;

#[derive(Default)]
pub struct ModelprobeBuilder {
    project_dir: Option<PathBuf>,
    installation: Option<PathBuf>,
    embedded: bool,
}

impl ModelprobeBuilder {
    /// Root directory of the build to probe.
    ///
    /// Defaults to the current directory.
    pub fn project_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_dir = Some(path.into());
        self
    }

    /// Use a specific Gradle installation instead of the one on the PATH.
    pub fn installation(mut self, path: impl Into<PathBuf>) -> Self {
        self.installation = Some(path.into());
        self
    }

    /// Run the build in-process instead of through the daemon.
    pub fn embedded(mut self, embedded: bool) -> Self {
        self.embedded = embedded;
        self
    }

    pub fn try_build(self) -> anyhow::Result<Modelprobe> {
        let Self {
            project_dir,
            installation,
            embedded,
        } = self;

        let project_dir = match project_dir {
            Some(dir) => dir,
            None => env::current_dir()?,
        };

        Ok(Modelprobe::new(project_dir, installation, embedded))
    }
}
