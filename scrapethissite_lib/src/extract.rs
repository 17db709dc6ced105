//! Shared pieces of the extraction procedures.

use scrapethissite_browser::{Element, Locator};

use crate::error::ScrapeError;

/// Records gathered by an extraction plus every failure it rode past.
#[derive(Debug)]
pub struct Extraction<T> {
    pub records: Vec<T>,
    pub failures: Vec<ExtractFailure>,
}

impl<T> Default for Extraction<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> Extraction<T> {
    /// True when every page or category was read without error.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn fail(&mut self, scope: impl Into<String>, error: &ScrapeError) {
        let scope = scope.into();
        tracing::warn!("An error occurred while scraping {}: {}", scope, error);
        self.failures.push(ExtractFailure {
            scope,
            message: error.to_string(),
        });
    }
}

/// A page or category that could not be read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractFailure {
    /// What was being read, e.g. `page 3` or `year 2012`.
    pub scope: String,
    pub message: String,
}

/// Text of the first descendant of `row` matching `css`.
pub(crate) async fn cell_text<E: Element>(row: &E, css: &str) -> Result<String, ScrapeError> {
    let cell = row.find(&Locator::css(css)).await?;
    Ok(cell.text().await?)
}

/// Current time as Unix epoch seconds.
pub(crate) fn capture_time() -> i64 {
    chrono::Utc::now().timestamp()
}
