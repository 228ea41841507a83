//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};

use rastermap::config::ConfigFile;
use rastermap::navigator::MapNavigator;
use rastermap::pager::TilePager;
use rastermap::pool::PixelBuffer;
use rastermap::rpf::FrameSynth;
use rastermap::source::{RpfRasterSource, SyntheticFrameStore};
use rastermap::zone::ZoneCatalog;
use tracing::info;

use crate::error::CliError;

/// Navigator over synthetic frames rendered into CPU pixel buffers.
pub type DemoNavigator = MapNavigator<PixelBuffer, SyntheticFrameStore>;

/// Built-in catalog used when neither the command line nor the config file
/// names one: three nested scales over central Europe.
pub const DEMO_CATALOG: &str = r#"{
  "zones": [
    {
      "name": "demo-overview",
      "scale": "1:1M",
      "northwest_lat": 60.0,
      "northwest_lon": 0.0,
      "lat_interval": 0.015625,
      "lon_interval": 0.015625,
      "grid_rows": 2,
      "grid_cols": 2
    },
    {
      "name": "demo-regional",
      "scale": "1:250K",
      "northwest_lat": 54.0,
      "northwest_lon": 6.0,
      "lat_interval": 0.00390625,
      "lon_interval": 0.00390625,
      "grid_rows": 2,
      "grid_cols": 2
    },
    {
      "name": "demo-local",
      "scale": "1:50K",
      "northwest_lat": 51.0,
      "northwest_lon": 9.0,
      "lat_interval": 0.0009765625,
      "lon_interval": 0.0009765625,
      "grid_rows": 2,
      "grid_cols": 2
    }
  ]
}"#;

/// Options shared by commands that navigate the map.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct MapArgs {
    /// Zone catalog JSON (overrides map.catalog)
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Scale label, e.g. 1:250K (overrides map.scale)
    #[arg(long)]
    pub scale: Option<String>,
}

/// Load the config file given on the command line, or the default one.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    match path {
        Some(path) => Ok(ConfigFile::load_from(path)?),
        None => Ok(ConfigFile::load()?),
    }
}

/// Resolve the catalog: CLI first, then config, then the built-in demo.
pub fn load_catalog(cli_path: Option<&Path>, config: &ConfigFile) -> Result<ZoneCatalog, CliError> {
    match cli_path.or(config.map.catalog.as_deref()) {
        Some(path) => Ok(ZoneCatalog::load(path)?),
        None => {
            info!("no catalog configured, using built-in demo catalog");
            Ok(ZoneCatalog::from_json(DEMO_CATALOG)?)
        }
    }
}

/// Resolve the starting scale: CLI first, then config, then the coarsest
/// scale in the catalog.
pub fn resolve_scale(
    cli_scale: Option<&str>,
    config: &ConfigFile,
    catalog: &ZoneCatalog,
) -> Result<String, CliError> {
    if let Some(scale) = cli_scale.or(config.map.scale.as_deref()) {
        return Ok(scale.to_string());
    }
    let ladder = catalog.ladder()?;
    ladder
        .labels()
        .first()
        .cloned()
        .ok_or_else(|| CliError::Navigation("catalog contains no zones".to_string()))
}

/// Build a navigator from config and map arguments.
pub fn build_navigator(config: &ConfigFile, args: &MapArgs) -> Result<DemoNavigator, CliError> {
    let catalog = load_catalog(args.catalog.as_deref(), config)?;
    let scale = resolve_scale(args.scale.as_deref(), config, &catalog)?;

    let source = RpfRasterSource::new(
        SyntheticFrameStore::new(FrameSynth::new()),
        config.to_source_config(),
    );
    let pager = TilePager::new(config.to_pager_config(), source, PixelBuffer::new)
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(MapNavigator::new(catalog, scale, pager)?)
}
