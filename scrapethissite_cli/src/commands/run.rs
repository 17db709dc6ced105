use anyhow::Result;
use scrapethissite_lib::{Job, ScrapeConfig};

use super::{execute, finish, Backend};
use crate::output::OutputFormat;

/// Runs both jobs with their default parameters.
pub async fn run(backend: Backend, config: &ScrapeConfig, format: &OutputFormat) -> Result<()> {
    let reports = execute(backend, config, &Job::defaults()).await?;
    finish(&reports, format)
}
