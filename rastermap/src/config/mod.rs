//! INI configuration file.
//!
//! Settings live in `<config dir>/rastermap/config.ini`:
//!
//! ```ini
//! [pager]
//! window_size = 5
//!
//! [source]
//! decode_cache_size = 9
//! palette = 0
//! parallel_decode = true
//!
//! [map]
//! catalog = /data/maps/catalog.json
//! scale = 1:250K
//! background = 000000
//!
//! [logging]
//! level = info
//! file = /tmp/rastermap.log
//! ```
//!
//! Missing keys keep their defaults. Every value is validated on load with
//! the same rules [`ConfigKey::set`] applies.

mod keys;

pub use keys::{format_color, parse_color, ConfigKey};

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use crate::pager::{PagerConfig, DEFAULT_WINDOW_SIZE};
use crate::source::{SourceConfig, DEFAULT_DECODE_BUFFERS};

/// Errors from reading, writing or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// `[pager]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerSettings {
    pub window_size: usize,
}

/// `[source]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSettings {
    pub decode_cache_size: usize,
    pub palette: usize,
    pub parallel_decode: bool,
}

/// `[map]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSettings {
    pub catalog: Option<PathBuf>,
    pub scale: Option<String>,
    pub background: [u8; 3],
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `rastermap::pager=debug`
    pub level: String,
    pub file: Option<PathBuf>,
}

/// The whole configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub pager: PagerSettings,
    pub source: SourceSettings,
    pub map: MapSettings,
    pub logging: LoggingSettings,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            pager: PagerSettings {
                window_size: DEFAULT_WINDOW_SIZE,
            },
            source: SourceSettings {
                decode_cache_size: DEFAULT_DECODE_BUFFERS,
                palette: 0,
                parallel_decode: true,
            },
            map: MapSettings {
                catalog: None,
                scale: None,
                background: [0, 0, 0],
            },
            logging: LoggingSettings {
                level: "info".to_string(),
                file: None,
            },
        }
    }
}

/// Default location of the configuration file.
///
/// Falls back to the current directory when the platform has no config
/// directory.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rastermap")
        .join("config.ini")
}

impl ConfigFile {
    /// Load from the default location; a missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_file_path();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load and validate a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let ini = Ini::load_from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut config = Self::default();
        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                key.set(&mut config, value)?;
            }
        }
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Write every set value, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }
        ini.write_to_file(path).map_err(io_error)?;
        debug!(path = %path.display(), "saved config file");
        Ok(())
    }

    pub fn to_pager_config(&self) -> PagerConfig {
        PagerConfig::new().with_window_size(self.pager.window_size)
    }

    pub fn to_source_config(&self) -> SourceConfig {
        SourceConfig::new()
            .with_decode_buffers(self.source.decode_cache_size)
            .with_palette_slot(self.source.palette)
            .with_background(self.map.background)
            .with_parallel_decode(self.source.parallel_decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.ini");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.pager.window_size, 5);
        assert_eq!(config.source.decode_cache_size, 9);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.to_pager_config(), PagerConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "[pager]\nwindow_size = 3\n\n[map]\nscale = 1:1M\nbackground = #102030\n",
        );

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.pager.window_size, 3);
        assert_eq!(config.map.scale.as_deref(), Some("1:1M"));
        assert_eq!(config.map.background, [0x10, 0x20, 0x30]);
        assert_eq!(config.source, ConfigFile::default().source);

        let source = config.to_source_config();
        assert_eq!(source.background, [0x10, 0x20, 0x30]);
        assert_eq!(source.decode_buffers, 9);
    }

    #[test]
    fn test_load_rejects_even_window() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "[pager]\nwindow_size = 4\n");

        let err = ConfigFile::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "pager.window_size"));
    }

    #[test]
    fn test_load_rejects_bad_number() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "[source]\ndecode_cache_size = lots\n");
        assert!(matches!(
            ConfigFile::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = ConfigFile::load_from(&dir.path().join("absent.ini")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.pager.window_size = 7;
        config.source.palette = 2;
        config.map.catalog = Some(PathBuf::from("/maps/catalog.json"));
        config.logging.file = Some(PathBuf::from("/tmp/rastermap.log"));
        config.save_to(&path).unwrap();

        let reloaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }
}
