//! Library layer for the scrapethissite sandbox scraper.
//!
//! Holds the record types, the win-percentage filter, the hockey and Oscar
//! extraction procedures, JSON export with output verification, and the job
//! runner that owns the browser session.

pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod filter;
pub mod hockey;
pub mod oscars;
pub mod runner;
pub mod types;
pub mod validation;

pub use scrapethissite_browser;

pub use config::ScrapeConfig;
pub use error::ScrapeError;
pub use export::{read_json, verify_output, write_json};
pub use extract::{ExtractFailure, Extraction};
pub use filter::{Comparison, WinPercentageFilter};
pub use hockey::{scrape_hockey_teams, HockeyQuery};
pub use oscars::scrape_top_films;
pub use runner::{run_job, run_jobs, Job, JobRecords, JobReport};
pub use types::{HockeyTeamRecord, OscarFilmRecord};
