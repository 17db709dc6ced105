//! Error types for the library layer.

use std::fmt;
use std::path::PathBuf;

/// Errors produced by the library layer, wrapping browser errors and adding
/// file output, configuration, and input validation failures.
#[derive(Debug)]
pub enum ScrapeError {
    /// An error from the browser session.
    Browser(scrapethissite_browser::Error),
    /// Reading or writing a file failed.
    Io(std::io::Error),
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
    /// A configuration file or value could not be used.
    Config(String),
    /// User-provided input failed validation.
    InvalidInput(String),
    /// A scraped cell held text that could not be interpreted.
    Parse(String),
    /// The expected output file does not exist.
    OutputMissing(PathBuf),
    /// The output file exists but has no content.
    OutputEmpty(PathBuf),
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Browser(e) => write!(f, "Browser error: {}", e),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::Parse(msg) => write!(f, "Parse error: {}", msg),
            Self::OutputMissing(path) => write!(f, "'{}' file does not exist", path.display()),
            Self::OutputEmpty(path) => write!(f, "'{}' file is empty", path.display()),
        }
    }
}

impl std::error::Error for ScrapeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Browser(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<scrapethissite_browser::Error> for ScrapeError {
    fn from(e: scrapethissite_browser::Error) -> Self {
        Self::Browser(e)
    }
}

impl From<std::io::Error> for ScrapeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ScrapeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}

impl From<toml::de::Error> for ScrapeError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}
