//! Record types written to the JSON output files.

use serde::{Deserialize, Serialize};

/// One hockey team season row that passed the win-percentage filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HockeyTeamRecord {
    /// Unix epoch seconds at which the row was read.
    pub capture_time: i64,
    pub team_name: String,
    pub year: String,
    /// Win percentage as shown on the page, e.g. `0.388`.
    pub win_percentage: String,
}

/// One of the top films listed for an awards year.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OscarFilmRecord {
    /// Unix epoch seconds at which the row was read.
    pub capture_time: i64,
    pub year: String,
    pub title: String,
    pub nomination_count: String,
    pub award_count: String,
    /// Whether the film won Best Picture that year.
    pub is_winner: bool,
}
