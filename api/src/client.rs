use crate::Scoreboard;
use crate::espn::HeaderResponse;
use crate::feed::{self, FeedError};
use log::debug;
use reqwest::{Client, Url};
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const ESPN_SITE: &str = "https://site.api.espn.com";
const HEADER_PATH: &str = "/apis/v2/scoreboard/header";

/// Scores client backed by ESPN's public scoreboard header endpoint.
#[derive(Debug, Clone)]
pub struct ScoresApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for ScoresApi {
    fn default() -> Self {
        Self::with_base_url(ESPN_SITE)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error for {1}: {0}")]
    Network(#[source] reqwest::Error, String),
    #[error("API error for {1}: {0}")]
    Api(#[source] reqwest::Error, String),
    #[error("Parse error for {1}: {0}")]
    Parsing(#[source] reqwest::Error, String),
    #[error("Invalid request URL {1}: {0}")]
    InvalidUrl(String, String),
    #[error("Malformed feed from {1}: {0}")]
    MalformedFeed(#[source] FeedError, String),
}

impl ScoresApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at another host, e.g. a local mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("sports-status/0.1 (terminal scoreboard)")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Whole-feed fetch: every sport and league ESPN currently headlines.
    pub async fn fetch_scoreboard(&self) -> ApiResult<Scoreboard> {
        let url = format!("{}{HEADER_PATH}", self.base_url);
        self.get_scoreboard(&url, &[]).await
    }

    /// Fetch a single league, e.g. `("football", "nfl")`.
    pub async fn fetch_league(&self, sport: &str, league: &str) -> ApiResult<Scoreboard> {
        let url = format!("{}{HEADER_PATH}", self.base_url);
        self.get_scoreboard(&url, &[("sport", sport), ("league", league)])
            .await
    }

    /// One request per `(sport, league)` pair, merged in pair order.
    /// Any failing request fails the whole batch so callers keep their old data.
    pub async fn fetch_leagues(&self, pairs: &[(String, String)]) -> ApiResult<Scoreboard> {
        let mut merged = Scoreboard::default();
        for (sport, league) in pairs {
            let board = self.fetch_league(sport, league).await?;
            debug!("fetched {sport}/{league}: {} events", board.event_count());
            merged.append(board);
        }
        Ok(merged)
    }

    async fn get_scoreboard(&self, url: &str, query: &[(&str, &str)]) -> ApiResult<Scoreboard> {
        let request_url = match query {
            [] => url.to_owned(),
            pairs => Url::parse_with_params(url, pairs)
                .map(String::from)
                .map_err(|e| ApiError::InvalidUrl(e.to_string(), url.to_owned()))?,
        };
        let url = request_url.as_str();

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        let raw = response
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.to_owned()))?
            .json::<HeaderResponse>()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))?;

        feed::build(raw).map_err(|e| ApiError::MalformedFeed(e, url.to_owned()))
    }
}
