//! CLI subcommand implementations.

pub mod hockey;
pub mod oscars;
pub mod run;

use anyhow::{bail, Result};
use scrapethissite_lib::scrapethissite_browser::{StaticDriver, WebDriverSession};
use scrapethissite_lib::{run_jobs, Job, JobReport, ScrapeConfig};

use crate::output::{print_records, print_summary, OutputFormat};

/// Which browser backend drives the jobs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Backend {
    WebDriver,
    Static,
}

/// Opens a session on the chosen backend and runs `jobs` to completion.
async fn execute(backend: Backend, config: &ScrapeConfig, jobs: &[Job]) -> Result<Vec<JobReport>> {
    let reports = match backend {
        Backend::Static => {
            tracing::info!("Using static HTML backend");
            run_jobs(StaticDriver::http(config.page_load_timeout())?, config, jobs).await
        }
        Backend::WebDriver => {
            let driver = WebDriverSession::connect(&config.session_options()).await?;
            run_jobs(driver, config, jobs).await
        }
    };
    Ok(reports)
}

/// Prints records and the summary; errors when any output check failed.
fn finish(reports: &[JobReport], format: &OutputFormat) -> Result<()> {
    for report in reports {
        print_records(&report.records, format)?;
    }
    print_summary(reports);

    let failed: Vec<&str> = reports.iter().filter(|r| !r.passed()).map(|r| r.id).collect();
    if !failed.is_empty() {
        bail!("output verification failed for {}", failed.join(", "));
    }
    Ok(())
}
