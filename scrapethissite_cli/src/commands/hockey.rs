use anyhow::Result;
use clap::Args;
use scrapethissite_lib::runner::{DEFAULT_HOCKEY_PAGES, DEFAULT_HOCKEY_THRESHOLD, HOCKEY_FILE_NAME};
use scrapethissite_lib::validation;
use scrapethissite_lib::{Comparison, HockeyQuery, Job, ScrapeConfig, WinPercentageFilter};

use super::{execute, finish, Backend};
use crate::output::OutputFormat;

#[derive(Args)]
pub struct HockeyArgs {
    /// Number of result pages to walk, starting at page 1
    #[arg(long, default_value_t = DEFAULT_HOCKEY_PAGES)]
    pub pages: u32,

    /// Comparison against the threshold: <, <=, =, >=, > (or lt, le, eq, ge, gt)
    #[arg(long, default_value = "<")]
    pub op: String,

    /// Win percentage threshold, 0-100 (40 means 0.40)
    #[arg(long, default_value_t = DEFAULT_HOCKEY_THRESHOLD)]
    pub threshold: f64,

    /// Output file name inside the output directory
    #[arg(long, default_value = HOCKEY_FILE_NAME)]
    pub file: String,
}

pub fn build_job(args: &HockeyArgs) -> Result<Job> {
    let pages = validation::validate_page_count(args.pages)?;
    let comparison: Comparison = args.op.parse()?;
    let threshold = validation::validate_threshold(args.threshold)?;
    let file_name = validation::validate_file_name(&args.file)?;

    Ok(Job::HockeyTeams {
        query: HockeyQuery {
            pages,
            filter: WinPercentageFilter::new(comparison, threshold),
        },
        file_name: file_name.to_string(),
    })
}

pub async fn run(
    args: &HockeyArgs,
    backend: Backend,
    config: &ScrapeConfig,
    format: &OutputFormat,
) -> Result<()> {
    let job = build_job(args)?;
    let reports = execute(backend, config, &[job]).await?;
    finish(&reports, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(op: &str, threshold: f64) -> HockeyArgs {
        HockeyArgs {
            pages: 4,
            op: op.to_string(),
            threshold,
            file: HOCKEY_FILE_NAME.to_string(),
        }
    }

    #[test]
    fn test_build_job_defaults() {
        let job = build_job(&args("<", 40.0)).unwrap();
        assert_eq!(job, Job::hockey_teams());
    }

    #[test]
    fn test_build_job_accepts_word_operator() {
        match build_job(&args("ge", 55.5)).unwrap() {
            Job::HockeyTeams { query, .. } => {
                assert_eq!(query.filter.comparison, Comparison::Ge);
                assert_eq!(query.filter.threshold_percent, 55.5);
            }
            other => panic!("unexpected job {:?}", other),
        }
    }

    #[test]
    fn test_build_job_rejects_bad_input() {
        assert!(build_job(&args("~", 40.0)).is_err());
        assert!(build_job(&args("<", -1.0)).is_err());
        let mut bad = args("<", 40.0);
        bad.pages = 0;
        assert!(build_job(&bad).is_err());
        let mut bad = args("<", 40.0);
        bad.file = "teams.csv".into();
        assert!(build_job(&bad).is_err());
    }
}
