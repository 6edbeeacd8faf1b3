//! Against-the-spread grading for single picks and whole weeks.
use crate::matcher::{self, Located, MatchConfig};
use crate::scoreboard::ScoreboardIndex;
use crate::{GameResult, GameStatus, PickEntry, WeekSlate};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Incorrect,
    Push,
    /// Game is live; never graded provisionally.
    Pending,
}

/// `result` is `None` while there is nothing to grade: no game found, or the
/// game has not kicked off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Grade {
    pub result: Option<Outcome>,
    /// Picked team's points minus the opponent's, set once the game is final.
    pub pick_margin: Option<i32>,
}

/// How a final margin is compared with the spread for a push.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PushPolicy {
    /// Push only on exact equality. Integer scores and half-point spreads are
    /// exact in `f64`, so no tolerance is needed.
    #[default]
    Exact,
    /// Push when `|margin - spread| < eps`.
    Epsilon(f64),
}

impl PushPolicy {
    fn is_push(&self, margin: f64, spread: f64) -> bool {
        match *self {
            PushPolicy::Exact => margin == spread,
            PushPolicy::Epsilon(eps) => (margin - spread).abs() < eps,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Grader {
    pub push: PushPolicy,
}

impl Grader {
    pub fn new(push: PushPolicy) -> Self {
        Self { push }
    }

    pub fn grade(&self, entry: &PickEntry, game: Option<&GameResult>) -> Grade {
        let Some(game) = game else {
            return Grade::default();
        };

        let (fav_score, dog_score) = if game.home.team == *entry.favorite() {
            (game.home.score, game.away.score)
        } else {
            (game.away.score, game.home.score)
        };
        let margin = i32::from(fav_score) - i32::from(dog_score);
        let spread = entry.spread();
        let push = self.push.is_push(f64::from(margin), spread);
        let covered = if entry.picked_favorite() {
            f64::from(margin) > spread
        } else {
            f64::from(margin) < spread
        };

        let result = match game.status {
            GameStatus::Final if push => Some(Outcome::Push),
            GameStatus::Final if covered => Some(Outcome::Correct),
            GameStatus::Final => Some(Outcome::Incorrect),
            GameStatus::InProgress => Some(Outcome::Pending),
            GameStatus::Scheduled => None,
        };
        let pick_margin = game
            .completed()
            .then(|| if entry.picked_favorite() { margin } else { -margin });

        Grade { result, pick_margin }
    }
}

/// Grade with the default (exact) push rule.
pub fn grade(entry: &PickEntry, game: Option<&GameResult>) -> Grade {
    Grader::default().grade(entry, game)
}

// ---------------------------------------------------------------------------
// Week-level results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradedEntry {
    /// 1-based position in the slate.
    pub index: usize,
    pub entry: PickEntry,
    /// Week the game was actually found under.
    pub week: Option<u8>,
    pub game: Option<GameResult>,
    pub grade: Grade,
    /// Entry involves the survivor team.
    pub survivor: bool,
    /// Entry involves the marginator team.
    pub marginator: bool,
}

impl GradedEntry {
    pub fn status_label(&self) -> &'static str {
        self.game.as_ref().map_or("No match", |g| g.status.label())
    }

    pub fn result_label(&self) -> &'static str {
        match (self.grade.result, &self.game) {
            (Some(Outcome::Correct), _) => "Correct",
            (Some(Outcome::Incorrect), _) => "Incorrect",
            (Some(Outcome::Push), _) => "Push",
            (Some(Outcome::Pending), _) => "Live",
            (None, Some(_)) => "Pre",
            (None, None) => "No match",
        }
    }

    fn is_final(&self) -> bool {
        self.game.as_ref().is_some_and(GameResult::completed)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub correct: usize,
    pub incorrect: usize,
    pub push: usize,
    pub pending: usize,
    /// Game found but not started.
    pub not_started: usize,
    pub unmatched: usize,
}

impl Summary {
    fn record(&mut self, graded: &GradedEntry) {
        match (graded.grade.result, &graded.game) {
            (Some(Outcome::Correct), _) => self.correct += 1,
            (Some(Outcome::Incorrect), _) => self.incorrect += 1,
            (Some(Outcome::Push), _) => self.push += 1,
            (Some(Outcome::Pending), _) => self.pending += 1,
            (None, Some(_)) => self.not_started += 1,
            (None, None) => self.unmatched += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurvivorStatus {
    #[default]
    Unresolved,
    Pass,
    Push,
    Fail,
}

impl fmt::Display for SurvivorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SurvivorStatus::Unresolved => "—",
            SurvivorStatus::Pass => "PASS",
            SurvivorStatus::Push => "PUSH",
            SurvivorStatus::Fail => "FAIL",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekReport {
    pub season: u16,
    pub week: u8,
    pub entries: Vec<GradedEntry>,
    pub summary: Summary,
    pub survivor: SurvivorStatus,
    /// Final pick margin of the marginator entry.
    pub marginator: Option<i32>,
}

impl WeekReport {
    pub fn marginator_label(&self) -> String {
        self.marginator
            .map_or_else(|| "—".to_owned(), |m| format!("Final margin: {m}"))
    }
}

/// Locate and grade every entry of `slate`, keeping slate order. When several
/// final entries involve the survivor (or marginator) team, the last one counts.
pub fn grade_week<F>(
    slate: &WeekSlate,
    season: u16,
    week: u8,
    config: MatchConfig,
    grader: &Grader,
    mut fetch_index: F,
) -> WeekReport
where
    F: FnMut(u16, u8) -> Arc<ScoreboardIndex>,
{
    let mut report = WeekReport {
        season,
        week,
        entries: Vec::with_capacity(slate.entries.len()),
        summary: Summary::default(),
        survivor: SurvivorStatus::Unresolved,
        marginator: None,
    };

    for (i, entry) in slate.entries.iter().enumerate() {
        let located = matcher::locate(entry, season, week, config, &mut fetch_index);
        let (game, found_week) = match located {
            Some(Located { game, week }) => (Some(GameResult::clone(&game)), Some(week)),
            None => (None, None),
        };
        let grade = grader.grade(entry, game.as_ref());
        let graded = GradedEntry {
            index: i + 1,
            entry: entry.clone(),
            week: found_week,
            game,
            grade,
            survivor: slate.survivor.as_ref().is_some_and(|s| entry.involves(s)),
            marginator: slate.marginator.as_ref().is_some_and(|m| entry.involves(m)),
        };

        report.summary.record(&graded);
        if graded.survivor && graded.is_final() {
            report.survivor = match graded.grade.result {
                Some(Outcome::Correct) => SurvivorStatus::Pass,
                Some(Outcome::Push) => SurvivorStatus::Push,
                _ => SurvivorStatus::Fail,
            };
        }
        if slate.marginator.as_ref() == Some(entry.pick()) && graded.is_final() {
            report.marginator = graded.grade.pick_margin;
        }
        report.entries.push(graded);
    }

    report
}
