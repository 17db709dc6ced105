use scrapethissite_lib::scrapethissite_browser::{Driver, StaticDriver};
use scrapethissite_lib::{
    read_json, run_jobs, Comparison, HockeyQuery, HockeyTeamRecord, Job, JobRecords,
    OscarFilmRecord, ScrapeConfig, ScrapeError, WinPercentageFilter,
};

const BASE: &str = "https://example.test";

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn config(output_dir: &std::path::Path) -> ScrapeConfig {
    ScrapeConfig {
        base_url: BASE.to_string(),
        page_load_timeout_ms: 1_000,
        poll_timeout_ms: 300,
        poll_interval_ms: 50,
        output_dir: output_dir.to_path_buf(),
        ..ScrapeConfig::default()
    }
}

fn site(config: &ScrapeConfig) -> StaticDriver {
    let films = format!("{BASE}/pages/ajax-javascript/");
    StaticDriver::from_pages([
        (config.pages_url(), load_fixture("landing.html")),
        (format!("{BASE}/pages/forms/"), load_fixture("hockey_page_1.html")),
        (config.hockey_page_url(1), load_fixture("hockey_page_1.html")),
        (config.hockey_page_url(2), load_fixture("hockey_page_2.html")),
        (films.clone(), load_fixture("oscars_landing.html")),
        (format!("{films}#2015"), load_fixture("oscars_2015.html")),
        (format!("{films}#2014"), load_fixture("oscars_2014.html")),
    ])
}

fn two_page_hockey_job() -> Job {
    Job::HockeyTeams {
        query: HockeyQuery {
            pages: 2,
            filter: WinPercentageFilter::new(Comparison::Lt, 40.0),
        },
        file_name: "hockey-team-data.json".to_string(),
    }
}

#[tokio::test]
async fn writes_and_verifies_both_outputs() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config(&tmp.path().join("output"));
    let driver = site(&config);

    let jobs = [two_page_hockey_job(), Job::oscar_winners()];
    let reports = run_jobs(driver, &config, &jobs).await;

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.passed()));

    let hockey = &reports[0];
    assert_eq!(hockey.id, "TC001");
    assert_eq!(hockey.output, tmp.path().join("output/hockey-team-data.json"));
    let written: Vec<HockeyTeamRecord> = read_json(&hockey.output).unwrap();
    match &hockey.records {
        JobRecords::Hockey(records) => assert_eq!(&written, records),
        other => panic!("unexpected records {:?}", other),
    }
    assert_eq!(written.len(), 2);

    let films = &reports[1];
    assert_eq!(films.id, "TC002");
    let written: Vec<OscarFilmRecord> = read_json(&films.output).unwrap();
    assert_eq!(written.len(), 8);
    assert_eq!(films.failures.len(), 1);
    assert_eq!(films.failures[0].scope, "year 2013");
}

#[tokio::test]
async fn browser_session_is_closed_after_the_run() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config(tmp.path());
    let driver = site(&config);
    let probe = driver.clone();

    run_jobs(driver, &config, &[two_page_hockey_job()]).await;

    assert!(probe.current_url().await.is_err());
}

#[tokio::test]
async fn missing_landing_page_does_not_stop_the_job() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config(tmp.path());
    let driver = StaticDriver::from_pages([
        (config.hockey_page_url(1), load_fixture("hockey_page_1.html")),
        (config.hockey_page_url(2), load_fixture("hockey_page_2.html")),
    ]);

    let reports = run_jobs(driver, &config, &[two_page_hockey_job()]).await;

    assert!(reports[0].passed());
    assert_eq!(reports[0].records.len(), 2);
}

#[tokio::test]
async fn empty_extraction_still_writes_a_file() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config(tmp.path());
    let driver = StaticDriver::from_pages([(config.pages_url(), load_fixture("landing.html"))]);

    let reports = run_jobs(driver, &config, &[Job::hockey_teams()]).await;

    let report = &reports[0];
    assert!(report.records.is_empty());
    assert_eq!(report.failures.len(), 4);
    assert!(report.passed());
    let written: Vec<HockeyTeamRecord> = read_json(&report.output).unwrap();
    assert!(written.is_empty());
}

#[tokio::test]
async fn unwritable_output_fails_verification() {
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("blocked");
    std::fs::write(&blocker, "not a directory").unwrap();
    let config = config(&blocker.join("output"));
    let driver = site(&config);

    let reports = run_jobs(driver, &config, &[two_page_hockey_job()]).await;

    assert!(!reports[0].passed());
    assert!(matches!(reports[0].verified, Err(ScrapeError::Io(_))));
    assert_eq!(reports[0].records.len(), 2);
}

#[tokio::test]
async fn invalid_job_is_reported_without_scraping() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config(tmp.path());
    let driver = site(&config);
    let job = Job::OscarWinners {
        top_n: 0,
        file_name: "oscar-winner-data.json".to_string(),
    };

    let reports = run_jobs(driver, &config, &[job]).await;

    assert!(matches!(
        reports[0].verified,
        Err(ScrapeError::InvalidInput(_))
    ));
    assert!(!tmp.path().join("oscar-winner-data.json").exists());
}

#[tokio::test]
async fn reported_output_is_the_file_written() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config(tmp.path());
    let driver = site(&config);
    let job = Job::HockeyTeams {
        query: HockeyQuery {
            pages: 1,
            filter: WinPercentageFilter::new(Comparison::Lt, 40.0),
        },
        file_name: " teams.json ".to_string(),
    };

    let reports = run_jobs(driver, &config, &[job]).await;

    let report = &reports[0];
    assert!(report.passed());
    assert_eq!(report.output, tmp.path().join("teams.json"));
    assert!(report.output.is_file());
}
