mod compose;
mod config;
mod console;
mod docker;
mod env;
mod error;
mod preflight;
mod ui;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// Preflight checks and an action menu for the local docker compose stack.
#[derive(Parser, Debug)]
#[command(name = "stackctl", version)]
struct Cli {
    /// Environment file to check, relative to the project root. Skips the prompt.
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Project root holding the compose file. Found by walking up from the
    /// current directory when omitted.
    #[arg(long, value_name = "DIR")]
    project_dir: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let root = match cli.project_dir {
        Some(dir) => dir,
        None => config::find_project_root(&std::env::current_dir()?),
    };
    let cfg = config::Config::new(root, config::resolve_docker_binary(), cli.env_file);
    tracing::debug!("resolved config: {cfg:?}");

    let mut engine = docker::DockerCli::new(cfg.docker_bin.clone(), cfg.root.clone());
    let mut console = console::Console::stdio();
    ui::run(&cfg, &mut engine, &mut console).await
}
