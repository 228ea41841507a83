//! CLI error type.

use std::fmt;

use rastermap::config::ConfigError;
use rastermap::logging::LoggingError;
use rastermap::navigator::NavigatorError;
use rastermap::zone::ZoneError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded, saved or validated
    Config(String),
    /// Zone catalog could not be loaded
    Catalog(ZoneError),
    /// Position or scale could not be resolved
    Navigation(String),
    /// Rendered image could not be written
    Render(String),
    /// Logging could not be initialized
    Logging(LoggingError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Catalog(e) => write!(f, "Catalog error: {}", e),
            CliError::Navigation(msg) => write!(f, "Navigation error: {}", msg),
            CliError::Render(msg) => write!(f, "Render error: {}", msg),
            CliError::Logging(e) => write!(f, "Logging error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Catalog(e) => Some(e),
            CliError::Logging(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<ZoneError> for CliError {
    fn from(e: ZoneError) -> Self {
        CliError::Catalog(e)
    }
}

impl From<NavigatorError> for CliError {
    fn from(e: NavigatorError) -> Self {
        CliError::Navigation(e.to_string())
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<image::ImageError> for CliError {
    fn from(e: image::ImageError) -> Self {
        CliError::Render(e.to_string())
    }
}
