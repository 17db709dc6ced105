//! Hockey teams: filtered extraction across the paginated results table.

use scrapethissite_browser::wait::navigate;
use scrapethissite_browser::{Driver, Element, Locator};

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::extract::{capture_time, cell_text, Extraction};
use crate::filter::{parse_fraction, WinPercentageFilter};
use crate::types::HockeyTeamRecord;

/// Text of the landing-page link that opens the hockey exercise.
pub const HOCKEY_LINK_TEXT: &str = "Hockey Teams";

const TABLE: &str = "table.table";
const ROW: &str = "tr.team";
const NAME_CELL: &str = "td.name";
const YEAR_CELL: &str = "td.year";
const PCT_CELL: &str = "td.pct";

/// Which pages to walk and which rows to keep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HockeyQuery {
    pub pages: u32,
    pub filter: WinPercentageFilter,
}

/// Walks pages `1..=query.pages` and collects the rows passing the filter.
///
/// A page that fails to load is recorded in [`Extraction::failures`] and the
/// walk moves on to the next page.
pub async fn scrape_hockey_teams<D: Driver>(
    driver: &D,
    config: &ScrapeConfig,
    query: &HockeyQuery,
) -> Extraction<HockeyTeamRecord> {
    tracing::info!("Getting data with win percentage {}", query.filter);
    let mut extraction = Extraction::default();

    for page in 1..=query.pages {
        let url = config.hockey_page_url(page);
        match scrape_page(driver, &url, config, &query.filter).await {
            Ok(records) => {
                tracing::debug!("Page {}: {} matching rows", page, records.len());
                extraction.records.extend(records);
            }
            Err(e) => extraction.fail(format!("page {}", page), &e),
        }
    }

    tracing::info!(
        "Collected {} hockey rows from {} pages",
        extraction.records.len(),
        query.pages
    );
    extraction
}

async fn scrape_page<D: Driver>(
    driver: &D,
    url: &str,
    config: &ScrapeConfig,
    filter: &WinPercentageFilter,
) -> Result<Vec<HockeyTeamRecord>, ScrapeError> {
    navigate(driver, url, config.page_load_timeout()).await?;
    let table = driver.find(&Locator::css(TABLE)).await?;
    let rows = table.find_all(&Locator::css(ROW)).await?;

    let mut records = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        match read_row(row, filter).await {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e) => tracing::debug!("Skipping row {} of {}: {}", i + 1, url, e),
        }
    }
    Ok(records)
}

async fn read_row<E: Element>(
    row: &E,
    filter: &WinPercentageFilter,
) -> Result<Option<HockeyTeamRecord>, ScrapeError> {
    let win_percentage = cell_text(row, PCT_CELL).await?;
    let fraction = parse_fraction(&win_percentage).ok_or_else(|| {
        ScrapeError::Parse(format!("unreadable win percentage '{}'", win_percentage))
    })?;
    if !filter.matches(fraction) {
        return Ok(None);
    }

    Ok(Some(HockeyTeamRecord {
        capture_time: capture_time(),
        team_name: cell_text(row, NAME_CELL).await?,
        year: cell_text(row, YEAR_CELL).await?,
        win_percentage,
    }))
}
