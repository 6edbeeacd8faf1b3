pub mod aliases;
pub mod client;
pub mod espn;
pub mod grading;
pub mod matcher;
pub mod parser;
pub mod picks;
pub mod scoreboard;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// First regular-season week the scoreboard feed knows about.
pub const FIRST_WEEK: u8 = 1;
/// Last week searched; covers the regular season plus the playoff weeks.
pub const LAST_WEEK: u8 = 22;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of ESPN wire format
// ---------------------------------------------------------------------------

/// Canonical team abbreviation, e.g. `KC`. Always trimmed and upper-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TeamCode(String);

impl TeamCode {
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Upstream feeds occasionally omit the abbreviation.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for TeamCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for TeamCode {
    fn from(code: String) -> Self {
        Self::new(&code)
    }
}

impl From<TeamCode> for String {
    fn from(code: TeamCode) -> Self {
        code.0
    }
}

impl fmt::Display for TeamCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PickError {
    #[error("pick {pick} is neither the favorite {favorite} nor the underdog {underdog}")]
    PickNotInGame {
        pick: TeamCode,
        favorite: TeamCode,
        underdog: TeamCode,
    },
    #[error("spread {0} is not a finite number")]
    InvalidSpread(f64),
    #[error("{0} cannot play itself")]
    SameTeam(TeamCode),
}

/// One ATS pick. The favorite always lays `spread` points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PickEntryRecord", into = "PickEntryRecord")]
pub struct PickEntry {
    favorite: TeamCode,
    underdog: TeamCode,
    spread: f64,
    pick: TeamCode,
}

impl PickEntry {
    /// The spread is stored as a magnitude; its sign is ignored.
    pub fn new(
        favorite: TeamCode,
        underdog: TeamCode,
        spread: f64,
        pick: TeamCode,
    ) -> Result<Self, PickError> {
        if !spread.is_finite() {
            return Err(PickError::InvalidSpread(spread));
        }
        if favorite == underdog {
            return Err(PickError::SameTeam(favorite));
        }
        if pick != favorite && pick != underdog {
            return Err(PickError::PickNotInGame { pick, favorite, underdog });
        }
        Ok(Self { favorite, underdog, spread: spread.abs(), pick })
    }

    pub fn favorite(&self) -> &TeamCode {
        &self.favorite
    }

    pub fn underdog(&self) -> &TeamCode {
        &self.underdog
    }

    pub fn spread(&self) -> f64 {
        self.spread
    }

    pub fn pick(&self) -> &TeamCode {
        &self.pick
    }

    pub fn picked_favorite(&self) -> bool {
        self.pick == self.favorite
    }

    pub fn involves(&self, team: &TeamCode) -> bool {
        self.favorite == *team || self.underdog == *team
    }
}

/// On-disk shape of a pick, as stored in `picks/{season}.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PickEntryRecord {
    fav: TeamCode,
    dog: TeamCode,
    spread: f64,
    pick: TeamCode,
}

impl TryFrom<PickEntryRecord> for PickEntry {
    type Error = PickError;

    fn try_from(r: PickEntryRecord) -> Result<Self, Self::Error> {
        PickEntry::new(r.fav, r.dog, r.spread, r.pick)
    }
}

impl From<PickEntry> for PickEntryRecord {
    fn from(e: PickEntry) -> Self {
        Self { fav: e.favorite, dog: e.underdog, spread: e.spread, pick: e.pick }
    }
}

/// A week of picks plus the survivor/marginator side games.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSlate {
    #[serde(default)]
    pub entries: Vec<PickEntry>,
    #[serde(default)]
    pub survivor: Option<TeamCode>,
    #[serde(default)]
    pub marginator: Option<TeamCode>,
    #[serde(default)]
    pub total_points: Option<f64>,
}

impl WeekSlate {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Scheduled,
    InProgress,
    Final,
}

impl GameStatus {
    pub fn label(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "Pre",
            GameStatus::InProgress => "Live",
            GameStatus::Final => "Final",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScore {
    pub team: TeamCode,
    pub score: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub status: GameStatus,
    pub home: TeamScore,
    pub away: TeamScore,
}

impl GameResult {
    pub fn completed(&self) -> bool {
        self.status == GameStatus::Final
    }

    pub fn in_progress(&self) -> bool {
        self.status == GameStatus::InProgress
    }

    /// Points for `team` if it plays in this game.
    pub fn score_of(&self, team: &TeamCode) -> Option<u16> {
        if self.home.team == *team {
            Some(self.home.score)
        } else if self.away.team == *team {
            Some(self.away.score)
        } else {
            None
        }
    }

    /// `AWAY 17 @ HOME 24`
    pub fn scoreline(&self) -> String {
        format!(
            "{} {} @ {} {}",
            self.away.team, self.away.score, self.home.team, self.home.score
        )
    }
}
