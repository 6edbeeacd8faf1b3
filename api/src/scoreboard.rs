use crate::{GameResult, TeamCode};
use std::collections::HashMap;
use std::sync::Arc;

/// Order-independent key for a matchup: `PairKey::new(a, b) == PairKey::new(b, a)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey(TeamCode, TeamCode);

impl PairKey {
    pub fn new(a: &TeamCode, b: &TeamCode) -> Self {
        if a <= b {
            Self(a.clone(), b.clone())
        } else {
            Self(b.clone(), a.clone())
        }
    }
}

/// One week's games, looked up by team pair.
#[derive(Debug, Clone, Default)]
pub struct ScoreboardIndex {
    games: Vec<Arc<GameResult>>,
    by_pair: HashMap<PairKey, Arc<GameResult>>,
}

impl ScoreboardIndex {
    /// Games without both team codes stay in `games()` but are never matched.
    /// If a pair appears twice the later game wins.
    pub fn build(raw: impl IntoIterator<Item = GameResult>) -> Self {
        let mut index = Self::default();
        for game in raw {
            let game = Arc::new(game);
            if !game.home.team.is_empty() && !game.away.team.is_empty() {
                index
                    .by_pair
                    .insert(PairKey::new(&game.home.team, &game.away.team), game.clone());
            }
            index.games.push(game);
        }
        index
    }

    pub fn find(&self, a: &TeamCode, b: &TeamCode) -> Option<Arc<GameResult>> {
        self.by_pair.get(&PairKey::new(a, b)).cloned()
    }

    pub fn games(&self) -> &[Arc<GameResult>] {
        &self.games
    }

    /// Number of games reachable by pair lookup.
    pub fn matchups(&self) -> usize {
        self.by_pair.len()
    }

    /// No games at all, matchable or not.
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

/// Caller-owned memo of built indices keyed by `(season, week)`.
#[derive(Debug, Clone, Default)]
pub struct ScoreboardCache {
    indices: HashMap<(u16, u8), Arc<ScoreboardIndex>>,
}

impl ScoreboardCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, season: u16, week: u8) -> Option<Arc<ScoreboardIndex>> {
        self.indices.get(&(season, week)).cloned()
    }

    /// Cached index, or an empty one when the week was never loaded.
    pub fn get_or_empty(&self, season: u16, week: u8) -> Arc<ScoreboardIndex> {
        self.get(season, week).unwrap_or_default()
    }

    pub fn get_or_build<F>(&mut self, season: u16, week: u8, load: F) -> Arc<ScoreboardIndex>
    where
        F: FnOnce() -> Vec<GameResult>,
    {
        self.indices
            .entry((season, week))
            .or_insert_with(|| {
                log::debug!("building scoreboard index for {season} week {week}");
                Arc::new(ScoreboardIndex::build(load()))
            })
            .clone()
    }

    pub fn insert(&mut self, season: u16, week: u8, index: ScoreboardIndex) -> Arc<ScoreboardIndex> {
        let index = Arc::new(index);
        self.indices.insert((season, week), index.clone());
        index
    }

    pub fn contains(&self, season: u16, week: u8) -> bool {
        self.indices.contains_key(&(season, week))
    }

    /// Drop one week so the next request refetches it.
    pub fn invalidate(&mut self, season: u16, week: u8) -> bool {
        self.indices.remove(&(season, week)).is_some()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{GameStatus, TeamScore};

    pub(crate) fn game(status: GameStatus, home: (&str, u16), away: (&str, u16)) -> GameResult {
        GameResult {
            status,
            home: TeamScore { team: home.0.into(), score: home.1 },
            away: TeamScore { team: away.0.into(), score: away.1 },
        }
    }

    #[test]
    fn pair_key_ignores_order() {
        let (kc, buf) = (TeamCode::new("KC"), TeamCode::new("BUF"));
        assert_eq!(PairKey::new(&kc, &buf), PairKey::new(&buf, &kc));
    }

    #[test]
    fn find_is_symmetric() {
        let index = ScoreboardIndex::build(vec![
            game(GameStatus::Final, ("KC", 24), ("BUF", 17)),
            game(GameStatus::Scheduled, ("DAL", 0), ("PHI", 0)),
        ]);
        let (kc, buf) = (TeamCode::new("KC"), TeamCode::new("BUF"));
        let ab = index.find(&kc, &buf).expect("game should be indexed");
        let ba = index.find(&buf, &kc).expect("game should be indexed");
        assert!(Arc::ptr_eq(&ab, &ba));
        assert_eq!(ab.home.score, 24);
        assert_eq!(index.matchups(), 2);
        assert!(index.find(&kc, &TeamCode::new("PHI")).is_none());
    }

    #[test]
    fn games_missing_a_team_code_are_not_indexed() {
        let index = ScoreboardIndex::build(vec![
            game(GameStatus::Scheduled, ("", 0), ("BUF", 0)),
            game(GameStatus::Scheduled, ("KC", 0), ("", 0)),
        ]);
        assert_eq!(index.games().len(), 2);
        assert!(!index.is_empty());
        assert_eq!(index.matchups(), 0);
        assert!(index.find(&TeamCode::new("BUF"), &TeamCode::default()).is_none());
    }

    #[test]
    fn empty_payload_builds_empty_index() {
        let index = ScoreboardIndex::build(Vec::new());
        assert!(index.is_empty());
        assert!(index.games().is_empty());
    }

    #[test]
    fn later_duplicate_pair_wins() {
        let index = ScoreboardIndex::build(vec![
            game(GameStatus::Final, ("KC", 10), ("BUF", 3)),
            game(GameStatus::InProgress, ("BUF", 7), ("KC", 0)),
        ]);
        let found = index.find(&"KC".into(), &"BUF".into()).unwrap();
        assert_eq!(found.status, GameStatus::InProgress);
    }

    #[test]
    fn cache_builds_each_week_once() {
        let mut cache = ScoreboardCache::new();
        let mut loads = 0;
        for _ in 0..3 {
            cache.get_or_build(2025, 5, || {
                loads += 1;
                vec![game(GameStatus::Final, ("KC", 24), ("BUF", 17))]
            });
        }
        assert_eq!(loads, 1);
        assert!(cache.contains(2025, 5));
        assert!(!cache.contains(2024, 5));
        assert_eq!(cache.get_or_empty(2025, 6).matchups(), 0);
    }

    #[test]
    fn invalidate_forces_rebuild() {
        let mut cache = ScoreboardCache::new();
        cache.insert(2025, 5, ScoreboardIndex::default());
        assert!(cache.invalidate(2025, 5));
        assert!(!cache.invalidate(2025, 5));
        let index = cache.get_or_build(2025, 5, || {
            vec![game(GameStatus::Final, ("KC", 24), ("BUF", 17))]
        });
        assert_eq!(index.matchups(), 1);
        assert_eq!(cache.len(), 1);
        assert!(!cache.is_empty());
    }
}
