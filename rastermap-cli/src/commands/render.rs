//! `render`: fill the window around a position and write it as one PNG.

use std::path::Path;

use image::{imageops, RgbImage};
use rastermap::config::ConfigFile;
use rastermap::coord::TILE_PIXELS;
use tracing::info;

use super::common::{build_navigator, DemoNavigator, MapArgs};
use crate::error::CliError;

/// Run updates until every valid window tile is resident.
///
/// Returns the number of updates issued (one tile per update).
pub fn fill_window(nav: &mut DemoNavigator) -> usize {
    let mut ticks = 0;
    while !nav.pager().is_complete() && ticks < nav.pager().capacity() {
        if nav.tick().is_none() {
            break;
        }
        ticks += 1;
    }
    ticks
}

/// Compose the resident tiles into a single image, north up.
///
/// Tiles outside the zone stay at the background color.
pub fn compose_window(nav: &DemoNavigator) -> RgbImage {
    let pager = nav.pager();
    let size = pager.window_size() as u32;
    let half = (pager.window_size() / 2) as i32;
    let background = image::Rgb(pager.source().background());
    let mut mosaic = RgbImage::from_pixel(size * TILE_PIXELS, size * TILE_PIXELS, background);

    for (offset, occupant) in pager.resident() {
        let x = (offset.col + half) as i64 * TILE_PIXELS as i64;
        let y = (offset.row + half) as i64 * TILE_PIXELS as i64;
        imageops::replace(&mut mosaic, occupant.handle.resource().image(), x, y);
    }
    mosaic
}

/// Run the render command.
pub fn run(
    config: &ConfigFile,
    args: &MapArgs,
    lat: f64,
    lon: f64,
    palette: Option<usize>,
    output: &Path,
) -> Result<(), CliError> {
    let mut nav = build_navigator(config, args)?;
    if let Some(slot) = palette {
        nav.set_palette_slot(slot);
    }

    if nav.set_position(lat, lon).is_none() {
        return Err(CliError::Navigation(format!(
            "no {} zone covers {:.4}, {:.4}",
            nav.scale(),
            lat,
            lon
        )));
    }
    let ticks = fill_window(&mut nav) + 1;

    let mosaic = compose_window(&nav);
    mosaic.save(output)?;

    let stats = nav.pager().source().stats();
    info!(
        path = %output.display(),
        tiles = nav.pager().occupied_count(),
        updates = ticks,
        "rendered window"
    );
    println!(
        "Wrote {} ({}x{}, {} tiles, {} decoded, {} blank)",
        output.display(),
        mosaic.width(),
        mosaic.height(),
        nav.pager().occupied_count(),
        stats.decodes,
        stats.blank_fills
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn demo_navigator(window: usize) -> DemoNavigator {
        let mut config = ConfigFile::default();
        config.pager.window_size = window;
        build_navigator(&config, &MapArgs::default()).unwrap()
    }

    #[test]
    fn test_fill_window_loads_every_tile() {
        let mut nav = demo_navigator(3);
        nav.set_position(50.0, 10.0);

        assert_eq!(fill_window(&mut nav), 8);
        assert_eq!(nav.pager().occupied_count(), 9);
    }

    #[test]
    fn test_compose_places_center_tile() {
        let mut nav = demo_navigator(3);
        nav.set_position(50.0, 10.0);
        fill_window(&mut nav);

        let mosaic = compose_window(&nav);
        assert_eq!(mosaic.dimensions(), (768, 768));

        let center = nav
            .pager()
            .resident()
            .find(|(offset, _)| offset.row == 0 && offset.col == 0)
            .map(|(_, o)| o.handle.resource().image().clone())
            .unwrap();
        assert_eq!(mosaic.get_pixel(256 + 17, 256 + 40), center.get_pixel(17, 40));
    }

    #[test]
    fn test_run_writes_png() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("window.png");
        let mut config = ConfigFile::default();
        config.pager.window_size = 3;

        run(&config, &MapArgs::default(), 50.0, 10.0, Some(2), &output).unwrap();

        let written = image::open(&output).unwrap();
        assert_eq!(written.width(), 768);
    }

    #[test]
    fn test_run_outside_coverage_fails() {
        let dir = TempDir::new().unwrap();
        let config = ConfigFile::default();
        let result = run(
            &config,
            &MapArgs::default(),
            -30.0,
            10.0,
            None,
            &dir.path().join("none.png"),
        );
        assert!(matches!(result, Err(CliError::Navigation(_))));
    }
}
