//! Live connection: spawns the tooling client for the selected Gradle
//! installation and materializes the model dump it writes to stdout. Build
//! log output stays on stderr, pass-through.

use std::{
    path::PathBuf,
    process::{Command, Stdio},
};

use log::debug;
use thiserror::Error;

use super::{BuildController, Connection, DumpController};
use crate::model::{dump::ModelDump, ParseError};

// Properties that switch the build into model-only mode, compatible with
// plugin versions that would otherwise refuse the tooling client.
const MODEL_BUILD_ARGS: &[&str] = &[
    "-Dcom.android.build.gradle.overrideVersionCheck=true",
    "-Pandroid.injected.build.model.only=true",
    "-Pandroid.injected.invoked.from.ide=true",
    "-Pandroid.injected.build.model.only.versioned=2",
];

// Heap hint for the spawned build process.
const MODEL_BUILD_JVM_ARGS: &str = "-Dorg.gradle.jvmargs=-Xmx2g";

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("Project directory {0} does not exist")]
    BadProjectDir(String),
    #[error("Failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        source: std::io::Error,
    },
    #[error("Model build failed with {0}")]
    BuildFailed(std::process::ExitStatus),
    #[error("Model dump is not valid UTF-8: {0}")]
    DumpEncoding(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub struct GradleConnector {
    project_dir: PathBuf,
    installation: Option<PathBuf>,
    embedded: bool,
}

impl GradleConnector {
    pub fn new(project_dir: impl Into<PathBuf>) -> GradleConnector {
        GradleConnector {
            project_dir: project_dir.into(),
            installation: None,
            embedded: false,
        }
    }

    /// Use a specific installation instead of the one on the PATH.
    pub fn installation(mut self, dir: Option<PathBuf>) -> Self {
        self.installation = dir;
        self
    }

    /// Run the build in-process instead of through the daemon.
    pub fn embedded(mut self, embedded: bool) -> Self {
        self.embedded = embedded;
        self
    }

    pub fn connect(self) -> Result<ProcessConnection, ConnectorError> {
        if !self.project_dir.is_dir() {
            return Err(ConnectorError::BadProjectDir(
                self.project_dir.display().to_string(),
            ));
        }
        let program = match &self.installation {
            Some(dir) => dir.join("bin").join("gradle"),
            None => PathBuf::from("gradle"),
        };
        debug!(
            "Connected to build in {} via {}",
            self.project_dir.display(),
            program.display()
        );
        Ok(ProcessConnection {
            program,
            project_dir: self.project_dir,
            embedded: self.embedded,
        })
    }
}

/// A connection backed by one tooling client process per build action.
pub struct ProcessConnection {
    program: PathBuf,
    project_dir: PathBuf,
    embedded: bool,
}

impl ProcessConnection {
    fn fetch_dump(&self) -> Result<ModelDump, ConnectorError> {
        let mut command = Command::new(&self.program);
        command
            .arg("--project-dir")
            .arg(&self.project_dir)
            .arg("--quiet")
            .args(MODEL_BUILD_ARGS)
            .arg(MODEL_BUILD_JVM_ARGS)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        if self.embedded {
            command.arg("--no-daemon");
        }

        let output = command.output().map_err(|source| ConnectorError::Launch {
            program: self.program.display().to_string(),
            source,
        })?;
        if !output.status.success() {
            return Err(ConnectorError::BuildFailed(output.status));
        }

        Ok(ModelDump::from_toml(&String::from_utf8(output.stdout)?)?)
    }
}

impl Connection for ProcessConnection {
    fn run<T, F>(&mut self, action: F) -> anyhow::Result<T>
    where
        F: FnOnce(&dyn BuildController) -> anyhow::Result<T>,
    {
        let models = self.fetch_dump()?.hydrate()?;
        let controller = DumpController::new(models);
        action(&controller)
    }
}

impl Drop for ProcessConnection {
    fn drop(&mut self) {
        debug!("Closed connection to build in {}", self.project_dir.display());
    }
}
