//! Addressable configuration keys (`section.key`).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

use super::{ConfigError, ConfigFile};
use crate::pager::PagerConfig;
use crate::zone::parse_scale;

/// A single setting in the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    PagerWindowSize,
    SourceDecodeCacheSize,
    SourcePalette,
    SourceParallelDecode,
    MapCatalog,
    MapScale,
    MapBackground,
    LoggingLevel,
    LoggingFile,
}

impl ConfigKey {
    /// Every key, grouped by section in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::PagerWindowSize,
            ConfigKey::SourceDecodeCacheSize,
            ConfigKey::SourcePalette,
            ConfigKey::SourceParallelDecode,
            ConfigKey::MapCatalog,
            ConfigKey::MapScale,
            ConfigKey::MapBackground,
            ConfigKey::LoggingLevel,
            ConfigKey::LoggingFile,
        ]
    }

    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::PagerWindowSize => "pager",
            ConfigKey::SourceDecodeCacheSize
            | ConfigKey::SourcePalette
            | ConfigKey::SourceParallelDecode => "source",
            ConfigKey::MapCatalog | ConfigKey::MapScale | ConfigKey::MapBackground => "map",
            ConfigKey::LoggingLevel | ConfigKey::LoggingFile => "logging",
        }
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::PagerWindowSize => "window_size",
            ConfigKey::SourceDecodeCacheSize => "decode_cache_size",
            ConfigKey::SourcePalette => "palette",
            ConfigKey::SourceParallelDecode => "parallel_decode",
            ConfigKey::MapCatalog => "catalog",
            ConfigKey::MapScale => "scale",
            ConfigKey::MapBackground => "background",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingFile => "file",
        }
    }

    /// Full name in `section.key` form.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as written to the file; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        let path = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };
        match self {
            ConfigKey::PagerWindowSize => config.pager.window_size.to_string(),
            ConfigKey::SourceDecodeCacheSize => config.source.decode_cache_size.to_string(),
            ConfigKey::SourcePalette => config.source.palette.to_string(),
            ConfigKey::SourceParallelDecode => config.source.parallel_decode.to_string(),
            ConfigKey::MapCatalog => path(&config.map.catalog),
            ConfigKey::MapScale => config.map.scale.clone().unwrap_or_default(),
            ConfigKey::MapBackground => format_color(config.map.background),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingFile => path(&config.logging.file),
        }
    }

    /// Parse and store `value`. An empty value clears optional settings.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        };
        let optional_path = |v: &str| (!v.is_empty()).then(|| PathBuf::from(v));

        match self {
            ConfigKey::PagerWindowSize => {
                let size: usize = value.parse().map_err(|_| invalid("expected a number"))?;
                PagerConfig::new()
                    .with_window_size(size)
                    .validate()
                    .map_err(|e| invalid(&e.to_string()))?;
                config.pager.window_size = size;
            }
            ConfigKey::SourceDecodeCacheSize => {
                config.source.decode_cache_size =
                    value.parse().map_err(|_| invalid("expected a number"))?;
            }
            ConfigKey::SourcePalette => {
                config.source.palette = value.parse().map_err(|_| invalid("expected a number"))?;
            }
            ConfigKey::SourceParallelDecode => {
                config.source.parallel_decode =
                    parse_bool(value).ok_or_else(|| invalid("expected true or false"))?;
            }
            ConfigKey::MapCatalog => config.map.catalog = optional_path(value),
            ConfigKey::MapScale => {
                if value.is_empty() {
                    config.map.scale = None;
                } else {
                    parse_scale(value).map_err(|e| invalid(&e.to_string()))?;
                    config.map.scale = Some(value.to_string());
                }
            }
            ConfigKey::MapBackground => {
                config.map.background =
                    parse_color(value).ok_or_else(|| invalid("expected a hex color like 1a2b3c"))?;
            }
            ConfigKey::LoggingLevel => {
                EnvFilter::try_new(value).map_err(|e| invalid(&e.to_string()))?;
                config.logging.level = value.to_string();
            }
            ConfigKey::LoggingFile => config.logging.file = optional_path(value),
        }
        Ok(())
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Parse `rrggbb` (optionally prefixed with `#`).
pub fn parse_color(value: &str) -> Option<[u8; 3]> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

pub fn format_color(color: [u8; 3]) -> String {
    format!("{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}
