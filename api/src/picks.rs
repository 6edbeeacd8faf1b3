//! The `picks/{season}.json` document: every saved week of a season.
use crate::WeekSlate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonPicks {
    #[serde(default)]
    pub season: Option<u16>,
    /// Keyed by week number; JSON object keys are the numbers as strings.
    #[serde(default)]
    pub weeks: BTreeMap<u8, WeekSlate>,
}

impl SeasonPicks {
    pub fn new(season: u16) -> Self {
        Self { season: Some(season), weeks: BTreeMap::new() }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Saved slate for `week`, or an empty one.
    pub fn week(&self, week: u8) -> WeekSlate {
        self.weeks.get(&week).cloned().unwrap_or_default()
    }

    pub fn set_week(&mut self, week: u8, slate: WeekSlate) -> Option<WeekSlate> {
        self.weeks.insert(week, slate)
    }

    /// Weeks with at least one entry, ascending.
    pub fn weeks_with_picks(&self) -> Vec<u8> {
        self.weeks
            .iter()
            .filter(|(_, slate)| !slate.is_empty())
            .map(|(&week, _)| week)
            .collect()
    }

    pub fn latest_week(&self) -> Option<u8> {
        self.weeks_with_picks().last().copied()
    }

    /// Explicit override, else the latest week with picks, else week 1.
    pub fn default_week(&self, requested: Option<u8>) -> u8 {
        requested.or_else(|| self.latest_week()).unwrap_or(crate::FIRST_WEEK)
    }
}
