//! Decode boundary for the Ergast F1 API
//!
//! The API wraps every collection in an `MRData` envelope and sends most
//! numbers as strings. The `Wire*` structs mirror that shape and never leave
//! this module; callers only see [`Page`], [`Season`], [`Race`] and
//! [`RaceResults`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::listing::Listable;

/// Error type for decode operations
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DecodeError {
    #[error("Invalid JSON payload: {0}")]
    Json(String),

    #[error("Invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Json(err.to_string())
    }
}

/// One page of a remote collection together with the collection size
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Season {
    pub year: u16,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub locality: String,
    pub country: String,
    pub lat: Option<String>,
    pub long: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Circuit {
    pub circuit_id: String,
    pub circuit_name: String,
    pub url: String,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Race {
    pub season: u16,
    pub round: u32,
    pub race_name: String,
    pub circuit: Circuit,
    pub date: String,
    pub time: Option<String>,
    pub url: String,
}

impl Race {
    /// Race date as "March 2, 2024", or the raw value when it is not a date
    pub fn formatted_date(&self) -> String {
        format_race_date(&self.date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Driver {
    pub driver_id: String,
    pub permanent_number: Option<String>,
    pub code: Option<String>,
    pub given_name: String,
    pub family_name: String,
    pub date_of_birth: Option<String>,
    pub nationality: String,
    pub url: String,
}

impl Driver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constructor {
    pub constructor_id: String,
    pub name: String,
    pub nationality: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FastestLap {
    pub rank: Option<u32>,
    pub lap: u32,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceResult {
    pub number: String,
    pub position: u32,
    pub position_text: String,
    pub points: f64,
    pub driver: Driver,
    pub constructor: Constructor,
    pub grid: u32,
    pub laps: u32,
    pub status: String,
    pub time: Option<String>,
    pub fastest_lap: Option<FastestLap>,
}

/// A single race with its classification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceResults {
    pub race: Race,
    pub results: Vec<RaceResult>,
}

impl Listable for Race {
    fn scope_key(&self) -> String {
        self.season.to_string()
    }

    fn ordering_key(&self) -> u32 {
        self.round
    }
}

impl Listable for Season {
    fn scope_key(&self) -> String {
        "season".to_string()
    }

    fn ordering_key(&self) -> u32 {
        u32::from(self.year)
    }
}

/// Identifier used for race pins, e.g. `2024-5`
pub fn race_id(season: u16, round: u32) -> String {
    format!("{season}-{round}")
}

/// Format an ISO date (`2024-03-02`) as `March 2, 2024`
///
/// Falls back to the input when it cannot be parsed.
pub fn format_race_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%B %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct WireEnvelope<T> {
    #[serde(rename = "MRData")]
    mr_data: T,
}

#[derive(Debug, Deserialize)]
struct WireSeasonsData {
    total: String,
    #[serde(rename = "SeasonTable")]
    season_table: WireSeasonTable,
}

#[derive(Debug, Deserialize)]
struct WireSeasonTable {
    #[serde(rename = "Seasons", default)]
    seasons: Vec<WireSeason>,
}

#[derive(Debug, Deserialize)]
struct WireSeason {
    season: String,
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct WireRacesData {
    total: String,
    #[serde(rename = "RaceTable")]
    race_table: WireRaceTable,
}

#[derive(Debug, Deserialize)]
struct WireRaceTable {
    #[serde(rename = "Races", default)]
    races: Vec<WireRace>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRace {
    season: String,
    round: String,
    #[serde(default)]
    url: String,
    race_name: String,
    #[serde(rename = "Circuit")]
    circuit: WireCircuit,
    date: String,
    time: Option<String>,
    #[serde(rename = "Results", default)]
    results: Vec<WireResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCircuit {
    circuit_id: String,
    #[serde(default)]
    url: String,
    circuit_name: String,
    #[serde(rename = "Location")]
    location: WireLocation,
}

#[derive(Debug, Deserialize)]
struct WireLocation {
    lat: Option<String>,
    long: Option<String>,
    locality: String,
    country: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResult {
    number: String,
    position: String,
    position_text: String,
    points: String,
    #[serde(rename = "Driver")]
    driver: WireDriver,
    #[serde(rename = "Constructor")]
    constructor: WireConstructor,
    grid: String,
    laps: String,
    status: String,
    #[serde(rename = "Time")]
    time: Option<WireTime>,
    #[serde(rename = "FastestLap")]
    fastest_lap: Option<WireFastestLap>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDriver {
    driver_id: String,
    permanent_number: Option<String>,
    code: Option<String>,
    #[serde(default)]
    url: String,
    given_name: String,
    family_name: String,
    date_of_birth: Option<String>,
    #[serde(default)]
    nationality: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireConstructor {
    constructor_id: String,
    #[serde(default)]
    url: String,
    name: String,
    #[serde(default)]
    nationality: String,
}

#[derive(Debug, Deserialize)]
struct WireTime {
    time: String,
}

#[derive(Debug, Deserialize)]
struct WireFastestLap {
    rank: Option<String>,
    lap: String,
    #[serde(rename = "Time")]
    time: WireTime,
}

fn parse_number<T: FromStr>(field: &'static str, value: &str) -> Result<T, DecodeError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| DecodeError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

impl WireRace {
    fn into_race(self) -> Result<(Race, Vec<WireResult>), DecodeError> {
        let race = Race {
            season: parse_number("season", &self.season)?,
            round: parse_number("round", &self.round)?,
            race_name: self.race_name,
            circuit: Circuit {
                circuit_id: self.circuit.circuit_id,
                circuit_name: self.circuit.circuit_name,
                url: self.circuit.url,
                location: Location {
                    locality: self.circuit.location.locality,
                    country: self.circuit.location.country,
                    lat: self.circuit.location.lat,
                    long: self.circuit.location.long,
                },
            },
            date: self.date,
            time: self.time,
            url: self.url,
        };
        Ok((race, self.results))
    }
}

impl WireResult {
    fn into_result(self) -> Result<RaceResult, DecodeError> {
        let fastest_lap = match self.fastest_lap {
            Some(lap) => Some(FastestLap {
                rank: lap
                    .rank
                    .as_deref()
                    .map(|rank| parse_number("fastest lap rank", rank))
                    .transpose()?,
                lap: parse_number("fastest lap", &lap.lap)?,
                time: lap.time.time,
            }),
            None => None,
        };

        Ok(RaceResult {
            number: self.number,
            position: parse_number("position", &self.position)?,
            position_text: self.position_text,
            points: parse_number("points", &self.points)?,
            driver: Driver {
                driver_id: self.driver.driver_id,
                permanent_number: self.driver.permanent_number,
                code: self.driver.code,
                given_name: self.driver.given_name,
                family_name: self.driver.family_name,
                date_of_birth: self.driver.date_of_birth,
                nationality: self.driver.nationality,
                url: self.driver.url,
            },
            constructor: Constructor {
                constructor_id: self.constructor.constructor_id,
                name: self.constructor.name,
                nationality: self.constructor.nationality,
                url: self.constructor.url,
            },
            grid: parse_number("grid", &self.grid)?,
            laps: parse_number("laps", &self.laps)?,
            status: self.status,
            time: self.time.map(|t| t.time),
            fastest_lap,
        })
    }
}

/// Decode a `seasons.json` response body
pub fn decode_seasons(body: &str) -> Result<Page<Season>, DecodeError> {
    let envelope: WireEnvelope<WireSeasonsData> = serde_json::from_str(body)?;
    let data = envelope.mr_data;

    let items = data
        .season_table
        .seasons
        .into_iter()
        .map(|season| {
            Ok(Season {
                year: parse_number("season", &season.season)?,
                url: season.url,
            })
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    Ok(Page {
        items,
        total: parse_number("total", &data.total)?,
    })
}

/// Decode a `{season}/races.json` response body
pub fn decode_races(body: &str) -> Result<Page<Race>, DecodeError> {
    let envelope: WireEnvelope<WireRacesData> = serde_json::from_str(body)?;
    let data = envelope.mr_data;

    let items = data
        .race_table
        .races
        .into_iter()
        .map(|race| race.into_race().map(|(race, _)| race))
        .collect::<Result<Vec<_>, DecodeError>>()?;

    Ok(Page {
        items,
        total: parse_number("total", &data.total)?,
    })
}

/// Decode a `{season}/{round}/results.json` response body
///
/// Returns `Ok(None)` when the API knows no race for that season and round.
pub fn decode_race_results(body: &str) -> Result<Option<RaceResults>, DecodeError> {
    let envelope: WireEnvelope<WireRacesData> = serde_json::from_str(body)?;

    let Some(wire_race) = envelope.mr_data.race_table.races.into_iter().next() else {
        return Ok(None);
    };

    let (race, wire_results) = wire_race.into_race()?;
    let results = wire_results
        .into_iter()
        .map(WireResult::into_result)
        .collect::<Result<Vec<_>, DecodeError>>()?;

    Ok(Some(RaceResults { race, results }))
}
