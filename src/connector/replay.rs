//! Offline connection: replays a previously captured model dump from disk,
//! so the census can run without a live build.

use std::path::PathBuf;

use log::debug;

use super::{BuildController, Connection, DumpController};
use crate::model::dump::ModelDump;

pub struct ReplayConnection {
    dump_file: PathBuf,
}

impl ReplayConnection {
    pub fn open(dump_file: impl Into<PathBuf>) -> ReplayConnection {
        ReplayConnection {
            dump_file: dump_file.into(),
        }
    }
}

impl Connection for ReplayConnection {
    fn run<T, F>(&mut self, action: F) -> anyhow::Result<T>
    where
        F: FnOnce(&dyn BuildController) -> anyhow::Result<T>,
    {
        debug!("Replaying model dump from {}", self.dump_file.display());
        let models = ModelDump::from_file(&self.dump_file)?.hydrate()?;
        let controller = DumpController::new(models);
        action(&controller)
    }
}
