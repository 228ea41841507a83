//! `locate`: resolve a position to zone, tile and pixel.

use rastermap::config::ConfigFile;
use rastermap::coord::TileLocation;
use rastermap::zone::{Zone, ZoneCatalog};

use super::common::{load_catalog, resolve_scale, MapArgs};
use crate::error::CliError;

/// Resolved position at one scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    pub zone: Zone,
    pub location: TileLocation,
}

/// Find the zone of `scale` covering the position and the tile under it.
pub fn locate(catalog: &ZoneCatalog, lat: f64, lon: f64, scale: &str) -> Result<Located, CliError> {
    let zone = catalog.find_zone(lat, lon, scale).ok_or_else(|| {
        CliError::Navigation(format!(
            "no {} zone covers {:.4}, {:.4}",
            scale, lat, lon
        ))
    })?;
    Ok(Located {
        zone: zone.clone(),
        location: zone.to_tile_location(lat, lon),
    })
}

/// Run the locate command.
pub fn run(config: &ConfigFile, args: &MapArgs, lat: f64, lon: f64) -> Result<(), CliError> {
    let catalog = load_catalog(args.catalog.as_deref(), config)?;
    let scale = resolve_scale(args.scale.as_deref(), config, &catalog)?;
    let found = locate(&catalog, lat, lon, &scale)?;

    let tile = found.location.tile;
    println!("Position: {:.4}, {:.4}", lat, lon);
    println!("Scale:    {}", scale);
    println!("Zone:     {}", found.zone.name);
    println!("Tile:     {}", tile);
    println!(
        "Pixel:    ({}, {})",
        found.location.pixel.row, found.location.pixel.col
    );
    if let Some(frame) = tile.to_frame() {
        println!(
            "Frame:    ({}, {}) subframe ({}, {})",
            frame.frame_row, frame.frame_col, frame.subframe_row, frame.subframe_col
        );
    }

    let ladder = catalog.ladder()?;
    let covered: Vec<&str> = ladder
        .labels()
        .iter()
        .map(String::as_str)
        .filter(|s| catalog.find_zone(lat, lon, s).is_some())
        .collect();
    println!("Covered:  {}", covered.join(", "));

    Ok(())
}
