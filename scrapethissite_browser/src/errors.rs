//! Error types for browser sessions.

use std::time::Duration;

/// Errors that can occur while driving a browser session.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The WebDriver session could not be created.
    #[error("Failed to start browser session: {0}")]
    Session(String),
    /// A WebDriver command was rejected or failed in transit.
    #[error("Browser command failed: {0}")]
    Command(String),
    /// No element matched the locator.
    #[error("No element found for {locator}")]
    NotFound { locator: String },
    /// A polling wait ran out of time before its condition held.
    #[error("Timed out after {waited:?} waiting for {what}")]
    Timeout {
        what: String,
        waited: Duration,
        last_error: Option<String>,
    },
    /// Fetching a page over HTTP failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("Request for {url} failed with status {status}")]
    HttpStatus { status: u16, url: String },
    /// The locator could not be compiled.
    #[error("Invalid locator: {0}")]
    InvalidLocator(String),
    /// A URL could not be resolved or no page is loaded.
    #[error("Navigation failed: {0}")]
    Navigation(String),
}

impl From<fantoccini::error::CmdError> for Error {
    fn from(e: fantoccini::error::CmdError) -> Self {
        if e.is_no_such_element() {
            Self::NotFound {
                locator: e.to_string(),
            }
        } else {
            Self::Command(e.to_string())
        }
    }
}

impl From<fantoccini::error::NewSessionError> for Error {
    fn from(e: fantoccini::error::NewSessionError) -> Self {
        Self::Session(e.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Self::Navigation(e.to_string())
    }
}

impl Error {
    /// True when the error means "nothing matched", as opposed to a broken session.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True for failures a polling wait should ride out: missing elements and
    /// rejected commands (stale handles, elements not yet interactable).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Command(_))
    }
}
