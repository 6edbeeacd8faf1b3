/// ESPN NFL scoreboard wire types — serde shapes for deserializing ESPN responses.
/// These map to our clean domain types in client.rs.
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Scoreboard  (site v2 API, and the CDN wrapper around it)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScoreboardResponse {
    pub events: Option<Vec<EspnEvent>>,
    pub leagues: Option<Vec<EspnLeague>>,
    pub season: Option<EspnSeason>,
    pub week: Option<EspnWeek>,
}

impl ScoreboardResponse {
    /// `leagues[0].season.year`, else the top-level `season.year`.
    pub fn season_year(&self) -> Option<u16> {
        self.leagues
            .as_ref()
            .and_then(|l| l.first())
            .and_then(|l| l.season.as_ref())
            .and_then(|s| s.year)
            .or_else(|| self.season.as_ref().and_then(|s| s.year))
    }

    pub fn week_number(&self) -> Option<u8> {
        self.week.as_ref().and_then(|w| w.number)
    }
}

/// `cdn.espn.com/core/nfl/scoreboard?xhr=1` nests the scoreboard under
/// `scoreboard`, though some responses inline it.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CdnResponse {
    pub scoreboard: Option<ScoreboardResponse>,
    #[serde(flatten)]
    pub inline: ScoreboardResponse,
}

impl CdnResponse {
    pub fn into_scoreboard(self) -> ScoreboardResponse {
        self.scoreboard.unwrap_or(self.inline)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnLeague {
    pub season: Option<EspnSeason>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnSeason {
    pub year: Option<u16>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnWeek {
    pub number: Option<u8>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnEvent {
    pub status: Option<EspnStatus>,
    pub competitions: Option<Vec<EspnCompetition>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnStatus {
    #[serde(rename = "type")]
    pub status_type: Option<EspnStatusType>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnStatusType {
    pub state: Option<String>, // "pre" | "in" | "post"
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnCompetition {
    pub status: Option<EspnStatus>,
    pub competitors: Option<Vec<EspnCompetitor>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct EspnCompetitor {
    #[serde(rename = "homeAway")]
    pub home_away: Option<String>, // "home" | "away"
    pub team: Option<EspnTeam>,
    /// Usually a string ("24"), occasionally a bare number.
    pub score: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnTeam {
    pub abbreviation: Option<String>,
}
