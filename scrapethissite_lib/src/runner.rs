//! Named jobs and the runner that owns the browser session.

use std::path::PathBuf;

use scrapethissite_browser::wait::{click_when_visible, navigate};
use scrapethissite_browser::{Driver, Locator};

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::export::{verify_output, write_json};
use crate::extract::ExtractFailure;
use crate::filter::{Comparison, WinPercentageFilter};
use crate::hockey::{scrape_hockey_teams, HockeyQuery, HOCKEY_LINK_TEXT};
use crate::oscars::{scrape_top_films, OSCAR_LINK_TEXT};
use crate::types::{HockeyTeamRecord, OscarFilmRecord};
use crate::validation;

pub const HOCKEY_FILE_NAME: &str = "hockey-team-data.json";
pub const OSCAR_FILE_NAME: &str = "oscar-winner-data.json";
pub const DEFAULT_HOCKEY_PAGES: u32 = 4;
pub const DEFAULT_HOCKEY_THRESHOLD: f64 = 40.0;
pub const DEFAULT_TOP_N: usize = 5;

/// One extraction plus its JSON output.
#[derive(Clone, Debug, PartialEq)]
pub enum Job {
    HockeyTeams {
        query: HockeyQuery,
        file_name: String,
    },
    OscarWinners {
        top_n: usize,
        file_name: String,
    },
}

impl Job {
    /// `TC001`: first four pages, win percentage below 40%.
    pub fn hockey_teams() -> Self {
        Self::HockeyTeams {
            query: HockeyQuery {
                pages: DEFAULT_HOCKEY_PAGES,
                filter: WinPercentageFilter::new(Comparison::Lt, DEFAULT_HOCKEY_THRESHOLD),
            },
            file_name: HOCKEY_FILE_NAME.to_string(),
        }
    }

    /// `TC002`: top five films of every year.
    pub fn oscar_winners() -> Self {
        Self::OscarWinners {
            top_n: DEFAULT_TOP_N,
            file_name: OSCAR_FILE_NAME.to_string(),
        }
    }

    /// Both jobs with their default parameters, in run order.
    pub fn defaults() -> Vec<Self> {
        vec![Self::hockey_teams(), Self::oscar_winners()]
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::HockeyTeams { .. } => "TC001",
            Self::OscarWinners { .. } => "TC002",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::HockeyTeams { .. } => "hockey-teams",
            Self::OscarWinners { .. } => "oscar-winners",
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            Self::HockeyTeams { file_name, .. } | Self::OscarWinners { file_name, .. } => file_name,
        }
    }

    /// Text of the landing-page link that opens this job's exercise.
    pub fn link_text(&self) -> &'static str {
        match self {
            Self::HockeyTeams { .. } => HOCKEY_LINK_TEXT,
            Self::OscarWinners { .. } => OSCAR_LINK_TEXT,
        }
    }

    /// Checks the job parameters and the output file name.
    pub fn validate(&self) -> Result<(), ScrapeError> {
        match self {
            Self::HockeyTeams { query, .. } => {
                validation::validate_page_count(query.pages)?;
                validation::validate_threshold(query.filter.threshold_percent)?;
            }
            Self::OscarWinners { top_n, .. } => {
                validation::validate_top_n(*top_n)?;
            }
        }
        validation::validate_file_name(self.file_name())?;
        Ok(())
    }
}

/// Records produced by a job.
#[derive(Clone, Debug, PartialEq)]
pub enum JobRecords {
    Hockey(Vec<HockeyTeamRecord>),
    Oscars(Vec<OscarFilmRecord>),
}

impl JobRecords {
    pub fn len(&self) -> usize {
        match self {
            Self::Hockey(records) => records.len(),
            Self::Oscars(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of one job.
#[derive(Debug)]
pub struct JobReport {
    pub id: &'static str,
    pub description: &'static str,
    pub records: JobRecords,
    pub failures: Vec<ExtractFailure>,
    pub output: PathBuf,
    /// Output file size in bytes, or why the output check failed.
    pub verified: Result<u64, ScrapeError>,
}

impl JobReport {
    /// True when the output file exists and is not empty.
    pub fn passed(&self) -> bool {
        self.verified.is_ok()
    }
}

/// Runs `jobs` in order on `driver`, then quits the browser session.
///
/// The session is released even when a job fails; a failure to quit is
/// logged and does not change the reports.
pub async fn run_jobs<D: Driver>(driver: D, config: &ScrapeConfig, jobs: &[Job]) -> Vec<JobReport> {
    let mut reports = Vec::with_capacity(jobs.len());
    for job in jobs {
        reports.push(run_job(&driver, config, job).await);
    }

    if let Err(e) = driver.quit().await {
        tracing::warn!("Failed to close the browser session: {}", e);
    }
    reports
}

/// Opens the landing page, follows the job's link, extracts, writes, and verifies.
pub async fn run_job<D: Driver>(driver: &D, config: &ScrapeConfig, job: &Job) -> JobReport {
    tracing::info!(job = job.id(), step = "start", "Start {}", job.description());
    let output = config.output_dir.join(job.file_name().trim());

    if let Err(e) = job.validate() {
        tracing::error!(job = job.id(), "Invalid job parameters: {}", e);
        return JobReport {
            id: job.id(),
            description: job.description(),
            records: empty_records(job),
            failures: Vec::new(),
            output,
            verified: Err(e),
        };
    }

    open_exercise(driver, config, job.link_text()).await;

    let (records, failures, written) = match job {
        Job::HockeyTeams { query, file_name } => {
            let extraction = scrape_hockey_teams(driver, config, query).await;
            let written = write_json(&extraction.records, &config.output_dir, file_name);
            (JobRecords::Hockey(extraction.records), extraction.failures, written)
        }
        Job::OscarWinners { top_n, file_name } => {
            let extraction = scrape_top_films(driver, config, *top_n).await;
            let written = write_json(&extraction.records, &config.output_dir, file_name);
            (JobRecords::Oscars(extraction.records), extraction.failures, written)
        }
    };

    let (output, verified) = match written {
        Ok(path) => {
            let verified = verify_output(&path);
            (path, verified)
        }
        Err(e) => (output, Err(e)),
    };
    match &verified {
        Ok(bytes) => tracing::info!(
            job = job.id(),
            step = "verify",
            "Wrote {} records ({} bytes) to {}",
            records.len(),
            bytes,
            output.display()
        ),
        Err(e) => tracing::error!(job = job.id(), step = "verify", "Output check failed: {}", e),
    }
    tracing::info!(job = job.id(), step = "end", "End {}", job.description());

    JobReport {
        id: job.id(),
        description: job.description(),
        records,
        failures,
        output,
        verified,
    }
}

/// Landing-page navigation failures are logged; the extraction that follows
/// navigates on its own or reports what it could not find.
async fn open_exercise<D: Driver>(driver: &D, config: &ScrapeConfig, link_text: &str) {
    if let Err(e) = navigate(driver, &config.pages_url(), config.page_load_timeout()).await {
        tracing::warn!("Could not open {}: {}", config.pages_url(), e);
        return;
    }
    let link = Locator::link_containing(link_text);
    if let Err(e) = click_when_visible(driver, &link, config.wait_options()).await {
        tracing::warn!("Could not follow {}: {}", link, e);
    }
}

fn empty_records(job: &Job) -> JobRecords {
    match job {
        Job::HockeyTeams { .. } => JobRecords::Hockey(Vec::new()),
        Job::OscarWinners { .. } => JobRecords::Oscars(Vec::new()),
    }
}
