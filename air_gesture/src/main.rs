//! air_gesture: interactive entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gesture_engine::{EngineConfig, Profile};
use tracing::info;
use tracing_subscriber::EnvFilter;

use air_gesture::app::{run, AppConfig, SourceKind};

/// Hand-gesture air canvas, virtual mouse and AR cube
#[derive(Parser, Debug)]
#[command(name = "air_gesture")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Interaction profile: canvas, mouse or cube
    #[arg(short, long)]
    profile: Option<Profile>,

    /// Config file path (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Landmark source
    #[arg(short, long, value_enum, default_value_t = SourceKind::Sim)]
    source: SourceKind,

    /// Frame width override, in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Frame height override, in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Drive the real system cursor in the mouse profile
    #[arg(long)]
    os_pointer: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut engine = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(profile) = cli.profile {
        engine.profile = profile;
    }
    if let Some(w) = cli.width {
        engine.frame.width = w;
    }
    if let Some(h) = cli.height {
        engine.frame.height = h;
    }
    engine.validate().context("invalid configuration")?;

    if cli.print_config {
        print!("{}", engine.to_toml()?);
        return Ok(());
    }

    #[cfg(feature = "leap")]
    info!("LeapMotion support compiled in");
    info!(
        profile = engine.profile.name(),
        width = engine.frame.width,
        height = engine.frame.height,
        "opening window"
    );

    run(AppConfig { engine, source: cli.source, os_pointer: cli.os_pointer })?;
    Ok(())
}
