use url::Url;

use crate::error::ScrapeError;

pub const MAX_PAGES: u32 = 100;
pub const MAX_TOP_N: usize = 50;
pub const MAX_FILE_NAME_LENGTH: usize = 128;

/// Validate the number of hockey pages to walk (1..=100).
pub fn validate_page_count(pages: u32) -> Result<u32, ScrapeError> {
    if !(1..=MAX_PAGES).contains(&pages) {
        return Err(ScrapeError::InvalidInput(format!(
            "pages must be between 1 and {}",
            MAX_PAGES
        )));
    }
    Ok(pages)
}

/// Validate a win-percentage threshold given in percent (0..=100).
pub fn validate_threshold(percent: f64) -> Result<f64, ScrapeError> {
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err(ScrapeError::InvalidInput(format!(
            "threshold must be a percentage between 0 and 100, got {}",
            percent
        )));
    }
    Ok(percent)
}

/// Validate how many films to keep per year (1..=50).
pub fn validate_top_n(top_n: usize) -> Result<usize, ScrapeError> {
    if !(1..=MAX_TOP_N).contains(&top_n) {
        return Err(ScrapeError::InvalidInput(format!(
            "top must be between 1 and {}",
            MAX_TOP_N
        )));
    }
    Ok(top_n)
}

/// Validate an output file name: a bare `.json` name with no directory parts.
pub fn validate_file_name(name: &str) -> Result<&str, ScrapeError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ScrapeError::InvalidInput("file name is empty".to_string()));
    }
    if trimmed.len() > MAX_FILE_NAME_LENGTH {
        return Err(ScrapeError::InvalidInput(format!(
            "file name exceeds maximum length of {} bytes",
            MAX_FILE_NAME_LENGTH
        )));
    }
    if trimmed.contains(|c: char| c == '/' || c == '\\') || trimmed == "." || trimmed == ".." {
        return Err(ScrapeError::InvalidInput(format!(
            "file name '{}' must not contain path separators",
            name
        )));
    }
    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err(ScrapeError::InvalidInput(
            "file name contains control characters".to_string(),
        ));
    }
    if !trimmed.ends_with(".json") || trimmed == ".json" {
        return Err(ScrapeError::InvalidInput(format!(
            "file name '{}' must end in .json",
            name
        )));
    }
    Ok(trimmed)
}

/// Validate an absolute http(s) URL.
pub fn validate_url(input: &str) -> Result<Url, ScrapeError> {
    let url = Url::parse(input.trim())
        .map_err(|e| ScrapeError::InvalidInput(format!("invalid URL '{}': {}", input, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ScrapeError::InvalidInput(format!(
            "unsupported URL scheme '{}' in '{}'",
            other, input
        ))),
    }
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
