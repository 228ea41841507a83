//! rastermap CLI - page tiled raster maps from the command line.

mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use rastermap::config::{config_file_path, ConfigFile};
use rastermap::logging::init_logging;

use commands::common::{load_config, MapArgs};
use commands::config::ConfigCommands;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "rastermap")]
#[command(version, about = "Paged raster map cache", long_about = None)]
struct Cli {
    /// Configuration file (default: <config dir>/rastermap/config.ini)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log filter, e.g. debug or rastermap::pager=trace (overrides logging.level)
    #[arg(long, global = true, value_name = "FILTER")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a position to its zone, tile and pixel
    #[command(allow_negative_numbers = true)]
    Locate {
        /// Latitude in degrees
        lat: f64,

        /// Longitude in degrees
        lon: f64,

        #[command(flatten)]
        map: MapArgs,
    },

    /// Fill the tile window around a position and save it as PNG
    #[command(allow_negative_numbers = true)]
    Render {
        /// Latitude in degrees
        lat: f64,

        /// Longitude in degrees
        lon: f64,

        /// Palette slot (0 day, 1 dusk, 2 night)
        #[arg(long)]
        palette: Option<usize>,

        /// Output PNG file
        #[arg(short, long, default_value = "window.png")]
        output: PathBuf,

        #[command(flatten)]
        map: MapArgs,
    },

    /// Move along a straight track and report pager activity
    #[command(allow_negative_numbers = true)]
    Simulate {
        /// Start latitude
        #[arg(long)]
        from_lat: f64,

        /// Start longitude
        #[arg(long)]
        from_lon: f64,

        /// End latitude
        #[arg(long)]
        to_lat: f64,

        /// End longitude
        #[arg(long)]
        to_lon: f64,

        /// Number of steps along the track
        #[arg(long, default_value_t = 100)]
        steps: usize,

        /// Pager updates per step
        #[arg(long, default_value_t = 1)]
        ticks_per_step: usize,

        /// Zoom in one scale at this step
        #[arg(long)]
        zoom_in_at: Option<usize>,

        #[command(flatten)]
        map: MapArgs,
    },

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    // Config commands must work even when the file on disk is invalid.
    let mut config = match &cli.command {
        Commands::Config { .. } => load_config(cli.config.as_deref()).unwrap_or_default(),
        _ => load_config(cli.config.as_deref())?,
    };
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    let _guard = init_logging(&config.logging)?;

    dispatch(cli.command, &config, cli.config)
}

fn dispatch(
    command: Commands,
    config: &ConfigFile,
    config_path: Option<PathBuf>,
) -> Result<(), CliError> {
    match command {
        Commands::Locate { lat, lon, map } => commands::locate::run(config, &map, lat, lon),
        Commands::Render {
            lat,
            lon,
            palette,
            output,
            map,
        } => commands::render::run(config, &map, lat, lon, palette, &output),
        Commands::Simulate {
            from_lat,
            from_lon,
            to_lat,
            to_lon,
            steps,
            ticks_per_step,
            zoom_in_at,
            map,
        } => commands::simulate::run(
            config,
            &map,
            (from_lat, from_lon),
            (to_lat, to_lon),
            steps,
            ticks_per_step,
            zoom_in_at,
        ),
        Commands::Config { command } => {
            let path = config_path.unwrap_or_else(config_file_path);
            commands::config::run(command, &path)
        }
    }
}
