//! Facecursor CLI: replay recorded face streams through the tracking pipeline.
//!
//! Usage:
//!   facecursor replay <FRAMES>      Drive a session from a recorded stream
//!   facecursor calibrate <FRAMES>   Show the calibration a stream produces
//!   facecursor config               Print or initialize the config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "facecursor",
    about = "Hands-free cursor control from face landmarks",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded frame stream through a tracking session
    Replay {
        /// Path to the frames JSONL file
        frames: PathBuf,

        /// Write cursor actions to this JSONL file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pixels per unit of relative deviation
        #[arg(long)]
        speed: Option<f64>,

        /// Dead-zone multiplier
        #[arg(long)]
        sensitivity: Option<f64>,

        /// Click gesture: smile|blink
        #[arg(long)]
        gesture: Option<String>,

        /// Disable gesture clicks
        #[arg(long)]
        no_click: bool,

        /// Display width (defaults to the recording's header, then config)
        #[arg(long)]
        width: Option<f64>,

        /// Display height (defaults to the recording's header, then config)
        #[arg(long)]
        height: Option<f64>,

        /// Minimum seconds between clicks of the same gesture
        #[arg(long)]
        refractory: Option<f64>,
    },

    /// Calibrate from the start of a recorded frame stream
    Calibrate {
        /// Path to the frames JSONL file
        frames: PathBuf,

        /// Calibration window size
        #[arg(long)]
        window: Option<usize>,
    },

    /// Show or initialize the config file
    Config {
        /// Write the default config if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = facecursor_common::AppConfig::load();
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    facecursor_common::logging::init_logging(&logging)?;
    tracing::debug!(path = %facecursor_common::AppConfig::path().display(), "Config resolved");

    match cli.command {
        Commands::Replay {
            frames,
            output,
            speed,
            sensitivity,
            gesture,
            no_click,
            width,
            height,
            refractory,
        } => {
            let overrides = commands::replay::ReplayOverrides {
                speed,
                sensitivity,
                gesture,
                click_enabled: no_click.then_some(false),
                width,
                height,
                refractory_secs: refractory,
            };
            commands::replay::run(&config, frames, output, overrides).await
        }
        Commands::Calibrate { frames, window } => commands::calibrate::run(&config, frames, window),
        Commands::Config { init } => commands::config::run(config, init),
    }
}
