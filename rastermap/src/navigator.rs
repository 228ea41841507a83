//! Position- and scale-driven front end for the tile pager.
//!
//! [`MapNavigator`] owns a [`TilePager`] over an [`RpfRasterSource`] and a
//! [`ZoneCatalog`]. Callers report geographic positions; the navigator picks
//! the zone of the current scale covering that position, flushes the pager
//! whenever the zone changes, and forwards the resulting center tile.

use thiserror::Error;
use tracing::{debug, info};

use crate::coord::TileLocation;
use crate::pager::{TilePager, UpdateOutcome};
use crate::pool::TileResource;
use crate::source::{FrameStore, RpfRasterSource};
use crate::zone::{ScaleLadder, Zone, ZoneCatalog, ZoneError, ZoomDirection, ZoomError};

/// Errors from building a navigator.
#[derive(Debug, Error)]
pub enum NavigatorError {
    #[error(transparent)]
    Zone(#[from] ZoneError),

    #[error(transparent)]
    Zoom(#[from] ZoomError),
}

/// Tracks position and scale, and keeps the pager's window on them.
pub struct MapNavigator<R, S> {
    pager: TilePager<R, RpfRasterSource<S>>,
    catalog: ZoneCatalog,
    ladder: ScaleLadder,
    scale: String,
    position: Option<(f64, f64)>,
    location: Option<TileLocation>,
}

impl<R: TileResource, S: FrameStore> MapNavigator<R, S> {
    /// Create a navigator starting at `scale`.
    ///
    /// # Errors
    ///
    /// Fails if a catalog scale label cannot be parsed or `scale` is not one
    /// of the catalog's scales.
    pub fn new(
        catalog: ZoneCatalog,
        scale: impl Into<String>,
        pager: TilePager<R, RpfRasterSource<S>>,
    ) -> Result<Self, NavigatorError> {
        let scale = scale.into();
        let ladder = catalog.ladder()?;
        if ladder.position(&scale).is_none() {
            return Err(ZoomError::UnknownScale(scale).into());
        }
        debug!(scale = %scale, scales = ladder.labels().len(), "navigator created");

        Ok(Self {
            pager,
            catalog,
            ladder,
            scale,
            position: None,
            location: None,
        })
    }

    /// Move to a new position.
    ///
    /// Returns the pager's update outcome, or `None` when no zone of the
    /// current scale covers the position (the window is then empty).
    pub fn set_position(&mut self, lat: f64, lon: f64) -> Option<UpdateOutcome> {
        self.position = Some((lat, lon));

        let zone = self.catalog.find_zone(lat, lon, &self.scale);
        if zone != self.pager.source().zone() {
            let zone = zone.cloned();
            self.pager.flush();
            self.pager.source_mut().set_zone(zone);
        }

        let Some(zone) = self.pager.source().zone() else {
            self.location = None;
            return None;
        };
        let location = zone.to_tile_location(lat, lon);
        self.location = Some(location);
        Some(self.pager.update(location.tile))
    }

    /// Run one pager update without moving.
    pub fn tick(&mut self) -> Option<UpdateOutcome> {
        let location = self.location?;
        Some(self.pager.update(location.tile))
    }

    pub fn zoom_in(&mut self) -> Result<&str, ZoomError> {
        self.zoom(ZoomDirection::In)
    }

    pub fn zoom_out(&mut self) -> Result<&str, ZoomError> {
        self.zoom(ZoomDirection::Out)
    }

    /// Step to the nearest scale in `direction` that covers the current
    /// position (or has any zones, before a position is known).
    ///
    /// On success the window is flushed and rebuilt around the same
    /// position. On failure nothing changes.
    pub fn zoom(&mut self, direction: ZoomDirection) -> Result<&str, ZoomError> {
        let catalog = &self.catalog;
        let position = self.position;
        let target = self
            .ladder
            .step(&self.scale, direction, |label| match position {
                Some((lat, lon)) => catalog.find_zone(lat, lon, label).is_some(),
                None => !catalog.zones(label).is_empty(),
            })?
            .to_string();

        info!(from = %self.scale, to = %target, %direction, "scale changed");
        self.scale = target;
        self.pager.flush();
        self.pager.source_mut().set_zone(None);
        self.location = None;
        if let Some((lat, lon)) = self.position {
            self.set_position(lat, lon);
        }
        Ok(self.scale.as_str())
    }

    /// Select a palette slot and repaint the window. Returns the number of
    /// tiles repainted.
    pub fn set_palette_slot(&mut self, slot: usize) -> usize {
        let previous = self.pager.source_mut().set_palette_slot(slot);
        let repainted = self.pager.repaint();
        info!(previous, slot, repainted, "palette changed");
        repainted
    }

    pub fn scale(&self) -> &str {
        &self.scale
    }

    pub fn position(&self) -> Option<(f64, f64)> {
        self.position
    }

    /// Tile and pixel of the current position in the active zone.
    pub fn location(&self) -> Option<TileLocation> {
        self.location
    }

    pub fn zone(&self) -> Option<&Zone> {
        self.pager.source().zone()
    }

    pub fn catalog(&self) -> &ZoneCatalog {
        &self.catalog
    }

    pub fn ladder(&self) -> &ScaleLadder {
        &self.ladder
    }

    pub fn pager(&self) -> &TilePager<R, RpfRasterSource<S>> {
        &self.pager
    }

    pub fn pager_mut(&mut self) -> &mut TilePager<R, RpfRasterSource<S>> {
        &mut self.pager
    }
}
