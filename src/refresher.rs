use crate::feed::ScoreFeed;
use crate::settings::Settings;
use ats_api::WeekSlate;
use ats_api::grading::WeekReport;
use chrono::Local;
use std::time::Duration;
use tokio::time::interval;

/// Periodic re-grade of one pool week. Each pass first drops the cached
/// scoreboards the previous report could still see change, so live games move
/// wherever the matcher found them while finished far-off weeks stay cached.
pub struct PeriodicRefresher<'a> {
    feed: ScoreFeed,
    settings: &'a Settings,
    every: Duration,
}

impl<'a> PeriodicRefresher<'a> {
    pub fn new(feed: ScoreFeed, settings: &'a Settings, every: Duration) -> Self {
        Self { feed, settings, every }
    }

    /// Runs until Ctrl-C, handing each fresh report to `show`.
    pub async fn run<F>(mut self, slate: &WeekSlate, season: u16, week: u8, mut show: F)
    where
        F: FnMut(&WeekReport, &str),
    {
        let mut ticker = interval(self.every);
        let mut last: Option<WeekReport> = None;
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = tokio::signal::ctrl_c() => break,
            }

            if let Some(previous) = &last {
                self.feed.invalidate_stale(previous);
            }
            let report = self.feed.grade_week(slate, season, week, self.settings).await;
            let stamp = format!("Last updated {}", Local::now().format("%H:%M:%S"));
            show(&report, &stamp);
            last = Some(report);
        }
    }
}
