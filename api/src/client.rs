use crate::espn::{CdnResponse, EspnCompetitor, EspnEvent, EspnStatus, ScoreboardResponse};
use crate::scoreboard::{ScoreboardCache, ScoreboardIndex};
use crate::{GameResult, GameStatus, TeamCode, TeamScore};
use futures_util::future::join_all;
use log::{debug, warn};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

const ESPN_SITE_V2: &str = "https://site.api.espn.com/apis/site/v2/sports/football/nfl";
const ESPN_CDN: &str = "https://cdn.espn.com/core/nfl";
const REGULAR_SEASON: u8 = 2;

/// NFL scoreboard client backed by ESPN's public endpoints.
#[derive(Debug, Clone)]
pub struct EspnApi {
    client: Client,
    timeout: Duration,
    site_base: String,
    cdn_base: String,
}

impl Default for EspnApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("atspool/0.1 (pool grader)")
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
            site_base: ESPN_SITE_V2.to_owned(),
            cdn_base: ESPN_CDN.to_owned(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error for {1}: {0}")]
    Network(#[source] reqwest::Error, String),
    #[error("API error for {1}: {0}")]
    Api(#[source] reqwest::Error, String),
    #[error("Parse error for {1}: {0}")]
    Parsing(#[source] reqwest::Error, String),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// What ESPN considers the current season and week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrentWeek {
    pub season: Option<u16>,
    pub week: Option<u8>,
}

impl EspnApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at other hosts (mirrors, test servers).
    pub fn with_base_urls(site_base: impl Into<String>, cdn_base: impl Into<String>) -> Self {
        Self {
            site_base: site_base.into(),
            cdn_base: cdn_base.into(),
            ..Self::default()
        }
    }

    /// Regular-season games for one week.
    ///
    /// Tries the site API first, then the CDN wrapper. A week neither source
    /// can supply comes back empty rather than as an error.
    pub async fn fetch_scoreboard(&self, season: u16, week: u8) -> Vec<GameResult> {
        let query = format!("dates={season}&seasontype={REGULAR_SEASON}&week={week}");

        let primary = format!("{}/scoreboard?{query}", self.site_base);
        let mut raw = match self.get::<ScoreboardResponse>(&primary).await {
            Ok(raw) => Some(raw),
            Err(e) => {
                debug!("{e}");
                None
            }
        }
        .filter(|r| r.events.is_some());

        if raw.is_none() {
            let fallback = format!("{}/scoreboard?xhr=1&{query}", self.cdn_base);
            raw = match self.get::<CdnResponse>(&fallback).await {
                Ok(cdn) => Some(cdn.into_scoreboard()),
                Err(e) => {
                    debug!("{e}");
                    None
                }
            }
            .filter(|r| r.events.is_some());
        }

        let Some(events) = raw.and_then(|r| r.events) else {
            warn!("no scoreboard for {season} week {week}; treating it as empty");
            return Vec::new();
        };
        debug!("{season} week {week}: {} events", events.len());
        events.iter().map(map_event).collect()
    }

    pub async fn fetch_index(&self, season: u16, week: u8) -> ScoreboardIndex {
        ScoreboardIndex::build(self.fetch_scoreboard(season, week).await)
    }

    /// Load every week in `weeks` that `cache` does not hold yet, concurrently.
    pub async fn warm(
        &self,
        cache: &mut ScoreboardCache,
        season: u16,
        weeks: impl IntoIterator<Item = u8>,
    ) {
        let mut missing: Vec<u8> = weeks
            .into_iter()
            .filter(|&w| !cache.contains(season, w))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        if missing.is_empty() {
            return;
        }

        debug!("fetching {season} weeks {missing:?}");
        let fetched = join_all(
            missing
                .into_iter()
                .map(|week| async move { (week, self.fetch_index(season, week).await) }),
        )
        .await;
        for (week, index) in fetched {
            debug!(
                "{season} week {week}: {} games, {} matchups",
                index.games().len(),
                index.matchups()
            );
            cache.insert(season, week, index);
        }
    }

    /// Current season/week according to ESPN, same source order as
    /// `fetch_scoreboard`.
    pub async fn fetch_current(&self) -> ApiResult<CurrentWeek> {
        let primary = format!("{}/scoreboard", self.site_base);
        let err = match self.get::<ScoreboardResponse>(&primary).await {
            Ok(raw) if raw.season_year().is_some() => return Ok(current_of(&raw)),
            Ok(_) => ApiError::NotFound(format!("no season info at {primary}")),
            Err(e) => e,
        };
        debug!("{err}");

        let fallback = format!("{}/scoreboard?xhr=1", self.cdn_base);
        let raw = self.get::<CdnResponse>(&fallback).await?.into_scoreboard();
        if raw.season_year().is_none() {
            return Err(ApiError::NotFound(format!("no season info at {fallback}")));
        }
        Ok(current_of(&raw))
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: ESPN wire types → clean domain types
// ---------------------------------------------------------------------------

fn current_of(raw: &ScoreboardResponse) -> CurrentWeek {
    CurrentWeek { season: raw.season_year(), week: raw.week_number() }
}

fn map_event(event: &EspnEvent) -> GameResult {
    let competition = event.competitions.as_ref().and_then(|c| c.first());

    let state = competition
        .and_then(|c| c.status.as_ref())
        .and_then(state_of)
        .or_else(|| event.status.as_ref().and_then(state_of))
        .unwrap_or("pre");

    let competitors = competition
        .and_then(|c| c.competitors.as_deref())
        .unwrap_or_default();
    let side = |which: &str| {
        competitors
            .iter()
            .find(|c| c.home_away.as_deref() == Some(which))
            .map(map_competitor)
            .unwrap_or_default()
    };

    GameResult {
        status: parse_state(state),
        home: side("home"),
        away: side("away"),
    }
}

fn state_of(status: &EspnStatus) -> Option<&str> {
    status.status_type.as_ref()?.state.as_deref()
}

fn parse_state(state: &str) -> GameStatus {
    match state {
        "in" => GameStatus::InProgress,
        "post" => GameStatus::Final,
        _ => GameStatus::Scheduled,
    }
}

fn map_competitor(c: &EspnCompetitor) -> TeamScore {
    let abbrev = c
        .team
        .as_ref()
        .and_then(|t| t.abbreviation.as_deref())
        .unwrap_or_default();
    TeamScore {
        team: TeamCode::new(abbrev),
        score: parse_score(c.score.as_ref()),
    }
}

fn parse_score(score: Option<&serde_json::Value>) -> u16 {
    let parsed = match score {
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|v| u16::try_from(v).ok()),
        _ => None,
    };
    parsed.unwrap_or(0)
}
