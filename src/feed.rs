use crate::settings::Settings;
use ats_api::client::EspnApi;
use ats_api::grading::{self, WeekReport};
use ats_api::matcher::{self, MatchConfig};
use ats_api::scoreboard::ScoreboardCache;
use ats_api::{FIRST_WEEK, LAST_WEEK, WeekSlate};
use log::debug;

/// ESPN client plus the scoreboard cache it fills. Weeks are fetched before
/// grading so the synchronous matcher only ever reads from the cache.
pub struct ScoreFeed {
    api: EspnApi,
    cache: ScoreboardCache,
}

impl ScoreFeed {
    pub fn new(api: EspnApi) -> Self {
        Self { api, cache: ScoreboardCache::new() }
    }

    pub async fn grade_week(
        &mut self,
        slate: &WeekSlate,
        season: u16,
        week: u8,
        settings: &Settings,
    ) -> WeekReport {
        if !slate.is_empty() {
            self.api
                .warm(&mut self.cache, season, matcher::nearby_weeks(week))
                .await;
            if settings.match_config.exhaustive_fallback && self.has_unmatched(slate, season, week) {
                debug!("some picks are not near week {week}; loading the whole season");
                self.api
                    .warm(&mut self.cache, season, FIRST_WEEK..=LAST_WEEK)
                    .await;
            }
        }

        let cache = &self.cache;
        grading::grade_week(
            slate,
            season,
            week,
            settings.match_config,
            &settings.grader,
            |s, w| cache.get_or_empty(s, w),
        )
    }

    /// Forget every week `last` may still read changing scores from, so the
    /// next grading run refetches them.
    pub fn invalidate_stale(&mut self, last: &WeekReport) {
        for week in stale_weeks(last) {
            if self.cache.invalidate(last.season, week) {
                debug!("dropped cached scoreboard for {} week {week}", last.season);
            }
        }
        debug!("{} scoreboards still cached", self.cache.len());
    }

    fn has_unmatched(&self, slate: &WeekSlate, season: u16, week: u8) -> bool {
        let nearby_only = MatchConfig { exhaustive_fallback: false };
        slate.entries.iter().any(|entry| {
            matcher::locate(entry, season, week, nearby_only, |s, w| {
                self.cache.get_or_empty(s, w)
            })
            .is_none()
        })
    }
}

/// The nearby weeks, where unmatched games may still show up, plus every week
/// holding a matched game that has not gone final.
fn stale_weeks(report: &WeekReport) -> Vec<u8> {
    let mut weeks = matcher::nearby_weeks(report.week).to_vec();
    weeks.extend(
        report
            .entries
            .iter()
            .filter(|e| e.game.as_ref().is_some_and(|g| !g.completed()))
            .filter_map(|e| e.week),
    );
    weeks.sort_unstable();
    weeks.dedup();
    weeks
}
