use crate::prelude::*;
use pitwall_core::ergast::{
    decode_race_results, decode_races, decode_seasons, Page, Race, RaceResults, Season,
};
use std::time::Duration;

/// Maintained mirror of the Ergast F1 API
pub const DEFAULT_BASE_URL: &str = "https://api.jolpi.ca/ergast/f1";

/// Limit used to fetch a whole season in one request
pub const ALL_RACES_LIMIT: usize = 1000;

/// Rows requested for a race classification; the API defaults to 30
pub const RESULTS_LIMIT: usize = 100;

/// Ergast API configuration from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct ErgastConfig {
    pub base_url: String,
}

impl ErgastConfig {
    /// Uses PITWALL_BASE_URL with default fallback
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("PITWALL_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        }
    }

    /// Apply CLI overrides to the configuration
    pub fn with_overrides(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        self
    }
}

/// HTTP client for the listing endpoints
#[derive(Debug, Clone)]
pub struct ErgastClient {
    client: reqwest::Client,
    base_url: String,
}

impl ErgastClient {
    pub fn new(config: &ErgastConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pitwall/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn seasons_url(&self, offset: usize, limit: usize) -> String {
        format!("{}/seasons.json?limit={limit}&offset={offset}", self.base_url)
    }

    pub fn races_url(&self, season: u16, offset: usize, limit: usize) -> String {
        format!("{}/{season}/races.json?limit={limit}&offset={offset}", self.base_url)
    }

    pub fn results_url(&self, season: u16, round: u32) -> String {
        format!(
            "{}/{season}/{round}/results.json?limit={RESULTS_LIMIT}",
            self.base_url
        )
    }

    async fn get_body(&self, url: &str) -> std::result::Result<String, String> {
        log::debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        response.text().await.map_err(|e| e.to_string())
    }

    pub async fn fetch_seasons(&self, offset: usize, limit: usize) -> Result<Page<Season>, Error> {
        let fail = |cause: String| Error::Fetch(format!("Failed to fetch seasons: {cause}"));

        let body = self
            .get_body(&self.seasons_url(offset, limit))
            .await
            .map_err(fail)?;

        decode_seasons(&body).map_err(|e| fail(e.to_string()))
    }

    pub async fn fetch_races(
        &self,
        season: u16,
        offset: usize,
        limit: usize,
    ) -> Result<Page<Race>, Error> {
        let fail = |cause: String| {
            Error::Fetch(format!("Failed to fetch races for season {season}: {cause}"))
        };

        let body = self
            .get_body(&self.races_url(season, offset, limit))
            .await
            .map_err(fail)?;

        decode_races(&body).map_err(|e| fail(e.to_string()))
    }

    pub async fn fetch_race_results(&self, season: u16, round: u32) -> Result<RaceResults, Error> {
        let fail = |cause: String| {
            Error::Fetch(format!(
                "Failed to fetch results for round {round} of the {season} season: {cause}"
            ))
        };

        let body = self
            .get_body(&self.results_url(season, round))
            .await
            .map_err(fail)?;

        decode_race_results(&body)
            .map_err(|e| fail(e.to_string()))?
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "No results found for round {round} of the {season} season"
                ))
            })
    }
}
