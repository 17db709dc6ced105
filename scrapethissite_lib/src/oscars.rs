//! Oscar winning films: top-N rows for every year, rendered client-side.

use std::time::Duration;

use scrapethissite_browser::wait::wait_for_visible;
use scrapethissite_browser::{Driver, Element, Locator, WaitOptions};

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::extract::{capture_time, cell_text, Extraction};
use crate::types::OscarFilmRecord;

/// Text of the landing-page link that opens the films exercise.
pub const OSCAR_LINK_TEXT: &str = "Oscar Winning Films";

const YEAR_LINK: &str = "a.year-link";
const ANY_TABLE: &str = "table";
const TABLE: &str = "table.table";
const FILM_ROW: &str = "tr.film";
const TITLE_CELL: &str = "td.film-title";
const NOMINATIONS_CELL: &str = "td.film-nominations";
const AWARDS_CELL: &str = "td.film-awards";
const WINNER_MARKER: &str = "td.film-best-picture i";

/// Implicit wait while polling, so absent elements fail fast.
const POLLING_IMPLICIT_WAIT: Duration = Duration::from_millis(1);

/// Clicks every year link on the current page and keeps the first `top_n` films of each.
///
/// Years that fail (click, wait timeout, missing table) are recorded in
/// [`Extraction::failures`]. The driver's implicit wait is restored to the
/// configured value before returning.
pub async fn scrape_top_films<D: Driver>(
    driver: &D,
    config: &ScrapeConfig,
    top_n: usize,
) -> Extraction<OscarFilmRecord> {
    tracing::info!("Getting data with top {} oscars", top_n);
    let mut extraction = Extraction::default();

    let years = match driver.find_all(&Locator::css(YEAR_LINK)).await {
        Ok(years) => years,
        Err(e) => {
            extraction.fail("year links", &ScrapeError::from(e));
            return extraction;
        }
    };
    if years.is_empty() {
        tracing::warn!("No year links found on {:?}", driver.current_url().await.ok());
    }

    if let Err(e) = driver.set_implicit_wait(POLLING_IMPLICIT_WAIT).await {
        tracing::warn!("Could not lower implicit wait: {}", e);
    }

    for (i, link) in years.iter().enumerate() {
        let year = match link.text().await {
            Ok(year) => year,
            Err(e) => {
                extraction.fail(format!("year link #{}", i + 1), &ScrapeError::from(e));
                continue;
            }
        };
        match scrape_year(driver, link, &year, config.wait_options(), top_n).await {
            Ok(records) => {
                tracing::debug!("Year {}: {} films", year, records.len());
                extraction.records.extend(records);
            }
            Err(e) => extraction.fail(format!("year {}", year), &e),
        }
    }

    if let Err(e) = driver.set_implicit_wait(config.implicit_wait()).await {
        tracing::warn!("Could not restore implicit wait: {}", e);
    }

    tracing::info!(
        "Collected {} films across {} years",
        extraction.records.len(),
        years.len()
    );
    extraction
}

async fn scrape_year<D: Driver>(
    driver: &D,
    link: &D::Element,
    year: &str,
    wait: WaitOptions,
    top_n: usize,
) -> Result<Vec<OscarFilmRecord>, ScrapeError> {
    link.click().await?;
    wait_for_visible(driver, &Locator::css(ANY_TABLE), wait).await?;

    let table = driver.find(&Locator::css(TABLE)).await?;
    let rows = table.find_all(&Locator::css(FILM_ROW)).await?;

    let mut records = Vec::with_capacity(top_n.min(rows.len()));
    for (i, row) in rows.iter().take(top_n).enumerate() {
        match read_film(row, year).await {
            Ok(record) => records.push(record),
            Err(e) => tracing::debug!("Skipping film {} of {}: {}", i + 1, year, e),
        }
    }
    Ok(records)
}

async fn read_film<E: Element>(row: &E, year: &str) -> Result<OscarFilmRecord, ScrapeError> {
    Ok(OscarFilmRecord {
        capture_time: capture_time(),
        year: year.to_string(),
        title: cell_text(row, TITLE_CELL).await?,
        nomination_count: cell_text(row, NOMINATIONS_CELL).await?,
        award_count: cell_text(row, AWARDS_CELL).await?,
        is_winner: is_winner(row).await,
    })
}

/// The Best Picture marker is an icon inside the last cell; absence means `false`.
async fn is_winner<E: Element>(row: &E) -> bool {
    match row.find(&Locator::css(WINNER_MARKER)).await {
        Ok(marker) => marker.is_displayed().await.unwrap_or(false),
        Err(_) => false,
    }
}
