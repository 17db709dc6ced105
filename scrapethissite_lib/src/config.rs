//! Run configuration: defaults, optional TOML file, then environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use scrapethissite_browser::{BrowserKind, SessionOptions, WaitOptions};
use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;
use crate::validation;

pub const ENV_BASE_URL: &str = "SCRAPETHISSITE_BASE_URL";
pub const ENV_WEBDRIVER_URL: &str = "SCRAPETHISSITE_WEBDRIVER_URL";
pub const ENV_OUTPUT_DIR: &str = "SCRAPETHISSITE_OUTPUT_DIR";
pub const ENV_POLL_TIMEOUT_MS: &str = "SCRAPETHISSITE_POLL_TIMEOUT_MS";
pub const ENV_POLL_INTERVAL_MS: &str = "SCRAPETHISSITE_POLL_INTERVAL_MS";
pub const ENV_HEADLESS: &str = "SCRAPETHISSITE_HEADLESS";

/// Everything a scraping run needs besides the job parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrapeConfig {
    /// Site root, without trailing slash.
    pub base_url: String,
    pub webdriver_url: String,
    pub browser: BrowserKind,
    pub headless: bool,
    pub browser_args: Vec<String>,
    pub implicit_wait_ms: u64,
    pub page_load_timeout_ms: u64,
    pub poll_timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub output_dir: PathBuf,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        let session = SessionOptions::default();
        Self {
            base_url: "https://www.scrapethissite.com".to_string(),
            webdriver_url: session.webdriver_url,
            browser: session.browser,
            headless: session.headless,
            browser_args: session.args,
            implicit_wait_ms: 5_000,
            page_load_timeout_ms: 10_000,
            poll_timeout_ms: 10_000,
            poll_interval_ms: 250,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl ScrapeConfig {
    /// Parses a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ScrapeError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, ScrapeError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScrapeError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Applies `SCRAPETHISSITE_*` environment variables.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any variable source. Unparseable numbers are ignored.
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(url) = lookup(ENV_WEBDRIVER_URL) {
            self.webdriver_url = url;
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(ms) = parse_var(&lookup, ENV_POLL_TIMEOUT_MS) {
            self.poll_timeout_ms = ms;
        }
        if let Some(ms) = parse_var(&lookup, ENV_POLL_INTERVAL_MS) {
            self.poll_interval_ms = ms;
        }
        if let Some(flag) = lookup(ENV_HEADLESS) {
            self.headless = matches!(flag.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }
    }

    /// Checks URLs and timing values.
    pub fn validate(&self) -> Result<(), ScrapeError> {
        validation::validate_url(&self.base_url)?;
        validation::validate_url(&self.webdriver_url)?;
        if self.poll_interval_ms == 0 {
            return Err(ScrapeError::Config("poll_interval_ms must be > 0".into()));
        }
        if self.poll_interval_ms > self.poll_timeout_ms {
            return Err(ScrapeError::Config(
                "poll_interval_ms must not exceed poll_timeout_ms".into(),
            ));
        }
        if self.page_load_timeout_ms == 0 {
            return Err(ScrapeError::Config("page_load_timeout_ms must be > 0".into()));
        }
        Ok(())
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            webdriver_url: self.webdriver_url.clone(),
            browser: self.browser,
            headless: self.headless,
            args: self.browser_args.clone(),
            implicit_wait: self.implicit_wait(),
        }
    }

    /// Bound and interval for element-visibility polling.
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions::new(
            Duration::from_millis(self.poll_timeout_ms),
            Duration::from_millis(self.poll_interval_ms),
        )
    }

    pub fn implicit_wait(&self) -> Duration {
        Duration::from_millis(self.implicit_wait_ms)
    }

    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_millis(self.page_load_timeout_ms)
    }

    /// Landing page listing the sandbox exercises.
    pub fn pages_url(&self) -> String {
        format!("{}/pages", self.root())
    }

    /// One page of the paginated hockey teams table (1-indexed).
    pub fn hockey_page_url(&self, page: u32) -> String {
        format!("{}/pages/forms/?page_num={}", self.root(), page)
    }

    fn root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

fn parse_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a whole number", key, raw);
            None
        }
    }
}
