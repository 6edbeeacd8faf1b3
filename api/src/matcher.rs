//! Finds the scoreboard game behind a pick, even when the feed files it under
//! a neighbouring week.
use crate::scoreboard::ScoreboardIndex;
use crate::{FIRST_WEEK, GameResult, LAST_WEEK, PickEntry};
use std::sync::Arc;

/// Offsets tried around the pool week, in priority order.
const NEARBY_OFFSETS: [i32; 5] = [0, 1, -1, 2, -2];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    /// Sweep every week of the season when the nearby weeks find nothing.
    pub exhaustive_fallback: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self { exhaustive_fallback: true }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    pub game: Arc<GameResult>,
    pub week: u8,
}

pub fn clamp_week(week: i32) -> u8 {
    week.clamp(i32::from(FIRST_WEEK), i32::from(LAST_WEEK)) as u8
}

/// `[w, w+1, w-1, w+2, w-2]`, each clamped into the season.
pub fn nearby_weeks(pool_week: u8) -> [u8; 5] {
    NEARBY_OFFSETS.map(|d| clamp_week(i32::from(pool_week) + d))
}

/// Every week `locate` may consult, in order, without repeats. Skipping a
/// repeat never changes the answer: a week that missed once misses again.
pub fn search_order(pool_week: u8, config: MatchConfig) -> Vec<u8> {
    let mut order: Vec<u8> = Vec::with_capacity(usize::from(LAST_WEEK));
    let sweep = config
        .exhaustive_fallback
        .then_some(FIRST_WEEK..=LAST_WEEK)
        .into_iter()
        .flatten();
    for week in nearby_weeks(pool_week).into_iter().chain(sweep) {
        if !order.contains(&week) {
            order.push(week);
        }
    }
    order
}

/// First week in `search_order` whose index holds the favorite/underdog pair.
/// `None` is the normal answer for games the feed does not list yet.
pub fn locate<F>(
    entry: &PickEntry,
    season: u16,
    pool_week: u8,
    config: MatchConfig,
    mut fetch_index: F,
) -> Option<Located>
where
    F: FnMut(u16, u8) -> Arc<ScoreboardIndex>,
{
    let found = search_order(pool_week, config).into_iter().find_map(|week| {
        fetch_index(season, week)
            .find(entry.favorite(), entry.underdog())
            .map(|game| Located { game, week })
    });

    match &found {
        Some(hit) => log::debug!(
            "{} vs {}: found in week {} (pool week {pool_week})",
            entry.favorite(),
            entry.underdog(),
            hit.week
        ),
        None => log::debug!(
            "{} vs {}: no game in season {season}",
            entry.favorite(),
            entry.underdog()
        ),
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameStatus;
    use crate::scoreboard::tests::game;
    use std::collections::HashMap;

    fn entry(fav: &str, dog: &str) -> PickEntry {
        PickEntry::new(fav.into(), dog.into(), 3.5, fav.into()).unwrap()
    }

    /// Fake feed: week -> index, recording every week asked for.
    struct Feed {
        weeks: HashMap<u8, Arc<ScoreboardIndex>>,
        asked: Vec<u8>,
    }

    impl Feed {
        fn new(weeks: Vec<(u8, Vec<GameResult>)>) -> Self {
            Self {
                weeks: weeks
                    .into_iter()
                    .map(|(w, games)| (w, Arc::new(ScoreboardIndex::build(games))))
                    .collect(),
                asked: Vec::new(),
            }
        }

        fn fetch(&mut self, _season: u16, week: u8) -> Arc<ScoreboardIndex> {
            self.asked.push(week);
            self.weeks.get(&week).cloned().unwrap_or_default()
        }
    }

    #[test]
    fn nearby_weeks_priority_order() {
        assert_eq!(nearby_weeks(5), [5, 6, 4, 7, 3]);
    }

    #[test]
    fn nearby_weeks_clamp_at_season_edges() {
        assert_eq!(nearby_weeks(1), [1, 2, 1, 3, 1]);
        assert_eq!(nearby_weeks(22), [22, 22, 21, 22, 20]);
        assert_eq!(clamp_week(-4), 1);
        assert_eq!(clamp_week(40), 22);
    }

    #[test]
    fn search_order_without_fallback_is_deduplicated_nearby() {
        let config = MatchConfig { exhaustive_fallback: false };
        assert_eq!(search_order(1, config), vec![1, 2, 3]);
        assert_eq!(search_order(10, config), vec![10, 11, 9, 12, 8]);
    }

    #[test]
    fn search_order_with_fallback_covers_season_once() {
        let order = search_order(5, MatchConfig::default());
        assert_eq!(&order[..5], &[5, 6, 4, 7, 3]);
        assert_eq!(order.len(), usize::from(LAST_WEEK));
        assert_eq!(&order[5..8], &[1, 2, 8]);
    }

    #[test]
    fn match_in_following_week_reports_that_week() {
        let mut feed = Feed::new(vec![
            (5, vec![game(GameStatus::Final, ("DAL", 20), ("NYG", 10))]),
            (6, vec![game(GameStatus::Final, ("BUF", 17), ("KC", 24))]),
        ]);
        let hit = locate(&entry("KC", "BUF"), 2025, 5, MatchConfig::default(), |s, w| {
            feed.fetch(s, w)
        })
        .expect("game in week 6");
        assert_eq!(hit.week, 6);
        assert_eq!(hit.game.home.team.as_str(), "BUF");
        assert_eq!(feed.asked, vec![5, 6]);
    }

    #[test]
    fn nominal_week_wins_over_neighbours() {
        let mut feed = Feed::new(vec![
            (4, vec![game(GameStatus::Final, ("KC", 3), ("BUF", 0))]),
            (5, vec![game(GameStatus::Scheduled, ("KC", 0), ("BUF", 0))]),
        ]);
        let hit = locate(&entry("KC", "BUF"), 2025, 5, MatchConfig::default(), |s, w| {
            feed.fetch(s, w)
        })
        .unwrap();
        assert_eq!(hit.week, 5);
    }

    #[test]
    fn nearby_result_takes_precedence_over_sweep() {
        let mut feed = Feed::new(vec![
            (1, vec![game(GameStatus::Final, ("KC", 3), ("BUF", 0))]),
            (7, vec![game(GameStatus::Final, ("KC", 30), ("BUF", 0))]),
        ]);
        let hit = locate(&entry("KC", "BUF"), 2025, 5, MatchConfig::default(), |s, w| {
            feed.fetch(s, w)
        })
        .unwrap();
        assert_eq!(hit.week, 7);
    }

    #[test]
    fn sweep_finds_distant_week_only_when_enabled() {
        let weeks = || vec![(15, vec![game(GameStatus::Final, ("KC", 21), ("BUF", 20))])];

        let mut feed = Feed::new(weeks());
        let hit = locate(&entry("KC", "BUF"), 2025, 5, MatchConfig::default(), |s, w| {
            feed.fetch(s, w)
        });
        assert_eq!(hit.map(|h| h.week), Some(15));

        let mut feed = Feed::new(weeks());
        let config = MatchConfig { exhaustive_fallback: false };
        let hit = locate(&entry("KC", "BUF"), 2025, 5, config, |s, w| feed.fetch(s, w));
        assert!(hit.is_none());
        assert_eq!(feed.asked, vec![5, 6, 4, 7, 3]);
    }

    #[test]
    fn unmatched_entry_returns_none_after_full_sweep() {
        let mut feed = Feed::new(vec![(5, vec![game(GameStatus::Final, ("DAL", 1), ("NYG", 0))])]);
        let hit = locate(&entry("KC", "BUF"), 2025, 5, MatchConfig::default(), |s, w| {
            feed.fetch(s, w)
        });
        assert!(hit.is_none());
        assert_eq!(feed.asked.len(), usize::from(LAST_WEEK));
    }
}
