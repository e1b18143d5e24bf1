use std::{path::Path, time::Instant};

use log::info;

use crate::{
    connector::{process::GradleConnector, replay::ReplayConnection},
    inspect, session,
};

/// Handler for the probe command: one live session against the build.
pub fn do_probe(
    project_dir: &Path,
    installation: Option<&Path>,
    embedded: bool,
) -> anyhow::Result<()> {
    info!("* Fetching model for {}", project_dir.display());
    let timer = Instant::now();

    let connection = GradleConnector::new(project_dir)
        .installation(installation.map(Path::to_path_buf))
        .embedded(embedded)
        .connect()?;
    let models = session::run_session(connection)?;

    let report = inspect::inspect_models(&models);
    println!("{report}");

    info!("total time: {:.3}s", timer.elapsed().as_secs_f64());
    Ok(())
}

/// Handler for the inspect command: aggregate a captured dump offline.
pub fn do_inspect(dump_file: &Path) -> anyhow::Result<()> {
    info!("* Inspecting model dump {}", dump_file.display());

    let models = session::run_session(ReplayConnection::open(dump_file))?;

    let report = inspect::inspect_models(&models);
    println!("{report}");
    Ok(())
}
