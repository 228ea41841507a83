//! Zone catalogs merged from one or more descriptor sources.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ScaleLadder, Zone, ZoneError};

#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    zones: Vec<Zone>,
}

/// Zones grouped by scale label.
///
/// Several catalogs can be merged; zones of the same scale from different
/// sources end up in one collection that is searched in insertion order.
/// Zone names are unique across the whole catalog.
#[derive(Debug, Clone, Default)]
pub struct ZoneCatalog {
    by_scale: BTreeMap<String, Vec<Zone>>,
}

impl ZoneCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from JSON of the form `{"zones": [ ... ]}`.
    pub fn from_json(json: &str) -> Result<Self, ZoneError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for zone in file.zones {
            catalog.insert(zone)?;
        }
        Ok(catalog)
    }

    /// Load a JSON catalog from disk.
    pub fn load(path: &Path) -> Result<Self, ZoneError> {
        let json = std::fs::read_to_string(path).map_err(|source| ZoneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        debug!(path = %path.display(), zones = catalog.zone_count(), "Loaded zone catalog");
        Ok(catalog)
    }

    /// Serialize the catalog back to JSON.
    pub fn to_json(&self) -> Result<String, ZoneError> {
        let file = CatalogFile {
            zones: self.by_scale.values().flatten().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Add a zone after validating its geometry.
    ///
    /// # Errors
    ///
    /// Fails on invalid geometry or if a zone of the same name is present.
    pub fn insert(&mut self, zone: Zone) -> Result<(), ZoneError> {
        zone.validate()?;
        if self.zone_by_name(&zone.name).is_some() {
            return Err(ZoneError::DuplicateZone(zone.name));
        }
        self.by_scale.entry(zone.scale.clone()).or_default().push(zone);
        Ok(())
    }

    /// Merge another catalog into this one.
    ///
    /// Incoming zones whose name is already taken are renamed with a numeric
    /// suffix (`name-2`, `name-3`, ...). Returns the number of renamed zones.
    pub fn merge(&mut self, other: ZoneCatalog) -> usize {
        let mut renamed = 0;
        for zone in other.by_scale.into_values().flatten() {
            let zone = if self.zone_by_name(&zone.name).is_some() {
                renamed += 1;
                self.rename_unique(zone)
            } else {
                zone
            };
            self.by_scale.entry(zone.scale.clone()).or_default().push(zone);
        }
        renamed
    }

    fn rename_unique(&self, mut zone: Zone) -> Zone {
        let original = std::mem::take(&mut zone.name);
        let mut suffix = 2u32;
        zone.name = loop {
            let candidate = format!("{original}-{suffix}");
            if self.zone_by_name(&candidate).is_none() {
                break candidate;
            }
            suffix += 1;
        };
        warn!(from = %original, to = %zone.name, scale = %zone.scale, "duplicate zone name renamed on merge");
        zone
    }

    /// Find the zone of `scale` covering the position.
    pub fn find_zone(&self, lat: f64, lon: f64, scale: &str) -> Option<&Zone> {
        self.by_scale
            .get(scale)?
            .iter()
            .find(|zone| zone.contains(lat, lon))
    }

    /// Find a zone by its name.
    pub fn zone_by_name(&self, name: &str) -> Option<&Zone> {
        self.by_scale.values().flatten().find(|z| z.name == name)
    }

    /// Zones of one scale.
    pub fn zones(&self, scale: &str) -> &[Zone] {
        self.by_scale.get(scale).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All scale labels present.
    pub fn scales(&self) -> impl Iterator<Item = &str> {
        self.by_scale.keys().map(String::as_str)
    }

    /// Scale labels ordered coarse to fine.
    pub fn ladder(&self) -> Result<ScaleLadder, ZoneError> {
        ScaleLadder::from_labels(self.scales())
    }

    /// Total number of zones.
    pub fn zone_count(&self) -> usize {
        self.by_scale.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_scale.is_empty()
    }
}
