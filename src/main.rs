use clap::Parser;

use modelprobe::{
    cli::args::{CliArgs, Command},
    Modelprobe,
};

fn run() -> anyhow::Result<()> {
    let cli_args = CliArgs::parse();

    let mut builder = Modelprobe::builder().embedded(cli_args.embedded);
    if let Some(project) = cli_args.project {
        builder = builder.project_dir(project);
    }
    if let Some(installation) = cli_args.gradle_install {
        builder = builder.installation(installation);
    }
    let modelprobe = builder.try_build()?;

    match cli_args.cmd {
        None | Some(Command::Probe) => modelprobe.probe(),
        Some(Command::Inspect { dump }) => modelprobe.inspect(dump),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
