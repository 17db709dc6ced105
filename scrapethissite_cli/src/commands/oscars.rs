use anyhow::Result;
use clap::Args;
use scrapethissite_lib::runner::{DEFAULT_TOP_N, OSCAR_FILE_NAME};
use scrapethissite_lib::validation;
use scrapethissite_lib::{Job, ScrapeConfig};

use super::{execute, finish, Backend};
use crate::output::OutputFormat;

#[derive(Args)]
pub struct OscarsArgs {
    /// Films to keep per year, in page order
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    /// Output file name inside the output directory
    #[arg(long, default_value = OSCAR_FILE_NAME)]
    pub file: String,
}

pub fn build_job(args: &OscarsArgs) -> Result<Job> {
    Ok(Job::OscarWinners {
        top_n: validation::validate_top_n(args.top)?,
        file_name: validation::validate_file_name(&args.file)?.to_string(),
    })
}

pub async fn run(
    args: &OscarsArgs,
    backend: Backend,
    config: &ScrapeConfig,
    format: &OutputFormat,
) -> Result<()> {
    let job = build_job(args)?;
    let reports = execute(backend, config, &[job]).await?;
    finish(&reports, format)
}
