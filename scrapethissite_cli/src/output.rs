use anyhow::Result;
use scrapethissite_lib::{HockeyTeamRecord, JobRecords, JobReport, OscarFilmRecord};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    pub fn from_flag(flag: &str) -> Self {
        match flag {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "markdown" | "md" => OutputFormat::Markdown,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
struct HockeyRow {
    #[tabled(rename = "Team")]
    #[serde(rename = "Team")]
    team_name: String,
    #[tabled(rename = "Year")]
    #[serde(rename = "Year")]
    year: String,
    #[tabled(rename = "Win %")]
    #[serde(rename = "Win %")]
    win_percentage: String,
}

#[derive(Tabled, Serialize)]
struct FilmRow {
    #[tabled(rename = "Year")]
    #[serde(rename = "Year")]
    year: String,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Nominations")]
    #[serde(rename = "Nominations")]
    nominations: String,
    #[tabled(rename = "Awards")]
    #[serde(rename = "Awards")]
    awards: String,
    #[tabled(rename = "Best Picture")]
    #[serde(rename = "Best Picture")]
    best_picture: String,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Job")]
    id: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Records")]
    records: usize,
    #[tabled(rename = "Failures")]
    failures: usize,
    #[tabled(rename = "Output")]
    output: String,
    #[tabled(rename = "Status")]
    status: String,
}

// -- Row builders --

fn build_hockey_rows(teams: &[HockeyTeamRecord]) -> Vec<HockeyRow> {
    teams
        .iter()
        .map(|t| HockeyRow {
            team_name: t.team_name.clone(),
            year: t.year.clone(),
            win_percentage: t.win_percentage.clone(),
        })
        .collect()
}

fn build_film_rows(films: &[OscarFilmRecord]) -> Vec<FilmRow> {
    films
        .iter()
        .map(|f| FilmRow {
            year: f.year.clone(),
            title: f.title.clone(),
            nominations: f.nomination_count.clone(),
            awards: f.award_count.clone(),
            best_picture: if f.is_winner { "yes" } else { "" }.to_string(),
        })
        .collect()
}

fn build_summary_rows(reports: &[JobReport]) -> Vec<SummaryRow> {
    reports
        .iter()
        .map(|r| SummaryRow {
            id: r.id.to_string(),
            description: r.description.to_string(),
            records: r.records.len(),
            failures: r.failures.len(),
            output: r.output.display().to_string(),
            status: match &r.verified {
                Ok(bytes) => format!("ok ({} bytes)", bytes),
                Err(e) => format!("FAILED: {}", e),
            },
        })
        .collect()
}

// -- Record output --

/// Echoes a job's records to stdout in the chosen format.
pub fn print_records(records: &JobRecords, format: &OutputFormat) -> Result<()> {
    match (records, format) {
        (JobRecords::Hockey(teams), OutputFormat::Json) => print_json(teams),
        (JobRecords::Oscars(films), OutputFormat::Json) => print_json(films),
        (JobRecords::Hockey(teams), OutputFormat::Csv) => print_csv(build_hockey_rows(teams))?,
        (JobRecords::Oscars(films), OutputFormat::Csv) => print_csv(build_film_rows(films))?,
        (JobRecords::Hockey(teams), OutputFormat::Table) => {
            println!("{}", Table::new(build_hockey_rows(teams)))
        }
        (JobRecords::Oscars(films), OutputFormat::Table) => {
            println!("{}", Table::new(build_film_rows(films)))
        }
        (JobRecords::Hockey(teams), OutputFormat::Markdown) => {
            print_markdown(build_hockey_rows(teams))
        }
        (JobRecords::Oscars(films), OutputFormat::Markdown) => {
            print_markdown(build_film_rows(films))
        }
    }
    Ok(())
}

fn print_markdown<R: Tabled>(rows: Vec<R>) {
    let mut table = Table::new(rows);
    table.with(Style::markdown());
    println!("{}", table);
}

fn print_csv<R: Serialize>(rows: Vec<R>) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- Run summary --

/// Per-job outcome, printed to stderr so stdout stays machine-readable.
pub fn print_summary(reports: &[JobReport]) {
    let mut table = Table::new(build_summary_rows(reports));
    table.with(Style::rounded());
    eprintln!("{}", table);

    for report in reports {
        for failure in &report.failures {
            eprintln!("  {} {}: {}", report.id, failure.scope, failure.message);
        }
    }
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
