//! Race results transformations
//!
//! Orders a race classification and marks the drivers matching a search term.

use serde::Serialize;

use crate::ergast::{Race, RaceResult, RaceResults};

/// Where a finishing position sits in the classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionTier {
    Winner,
    Second,
    Third,
    Points,
    Unplaced,
}

pub fn position_tier(position: u32) -> PositionTier {
    match position {
        1 => PositionTier::Winner,
        2 => PositionTier::Second,
        3 => PositionTier::Third,
        4..=10 => PositionTier::Points,
        _ => PositionTier::Unplaced,
    }
}

/// `Finished` and lapped finishers (`+1 Lap`, `+2 Laps`) count as classified
pub fn is_classified_finish(status: &str) -> bool {
    status == "Finished" || status.contains("Lap")
}

/// Case-insensitive match of `term` against the driver's full name or id
///
/// An empty term highlights nobody.
pub fn is_driver_highlighted(result: &RaceResult, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return false;
    }

    result.driver.full_name().to_lowercase().contains(&term)
        || result.driver.driver_id.to_lowercase().contains(&term)
}

/// Sort results by finishing position
pub fn sort_by_position(mut results: Vec<RaceResult>) -> Vec<RaceResult> {
    results.sort_by_key(|result| result.position);
    results
}

/// Single row of the results output
#[derive(Debug, Clone, Serialize)]
pub struct DriverRow {
    pub position: u32,
    pub position_text: String,
    pub tier: PositionTier,
    pub driver_id: String,
    pub code: Option<String>,
    pub name: String,
    pub nationality: String,
    pub constructor: String,
    pub points: f64,
    pub grid: u32,
    pub laps: u32,
    pub status: String,
    pub classified: bool,
    pub time: Option<String>,
    pub fastest_lap: Option<String>,
    pub highlighted: bool,
}

/// Race results output with highlighted drivers
#[derive(Debug, Clone, Serialize)]
pub struct ResultsOutput {
    pub race: Race,
    pub highlight: Option<String>,
    pub highlighted_count: usize,
    pub drivers: Vec<DriverRow>,
}

/// Build results output ordered by position
pub fn build_results_output(results: RaceResults, highlight: &str) -> ResultsOutput {
    let drivers: Vec<DriverRow> = sort_by_position(results.results)
        .into_iter()
        .map(|result| {
            let highlighted = is_driver_highlighted(&result, highlight);
            DriverRow {
                position: result.position,
                tier: position_tier(result.position),
                classified: is_classified_finish(&result.status),
                name: result.driver.full_name(),
                fastest_lap: result
                    .fastest_lap
                    .map(|lap| format!("{} (Lap {})", lap.time, lap.lap)),
                position_text: result.position_text,
                driver_id: result.driver.driver_id,
                code: result.driver.code,
                nationality: result.driver.nationality,
                constructor: result.constructor.name,
                points: result.points,
                grid: result.grid,
                laps: result.laps,
                status: result.status,
                time: result.time,
                highlighted,
            }
        })
        .collect();

    let highlight = highlight.trim();

    ResultsOutput {
        race: results.race,
        highlight: (!highlight.is_empty()).then(|| highlight.to_string()),
        highlighted_count: drivers.iter().filter(|d| d.highlighted).count(),
        drivers,
    }
}
