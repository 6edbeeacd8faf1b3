//! Parser for pasted pick sheets.
//!
//! Expected layout, one token per line:
//!
//! ```text
//! KC          <- favorite
//! -3.5        <- spread
//! BUF         <- underdog
//! KC          <- pick
//! ...         (repeated per game)
//! SURVIVOR
//! DET
//! MARGINATOR
//! PHI
//! TOTAL POINTS
//! 47
//! ```
//!
//! Column headings may appear anywhere and are ignored. Bad blocks are skipped
//! and reported; parsing itself never fails.
use crate::aliases::TeamAliasTable;
use crate::{PickEntry, PickError, TeamCode, WeekSlate};
use std::fmt;
use thiserror::Error;

pub const DEFAULT_HEADER_NOISE: &[&str] = &[
    "FAVORITE",
    "FAVORITES",
    "FAV",
    "SPREAD",
    "LINE",
    "UNDERDOG",
    "UNDERDOGS",
    "DOG",
    "PICK",
    "PICKS",
    "YOUR PICK",
    "SELECTION",
];

const SURVIVOR_KEY: &str = "SURVIVOR";
const MARGINATOR_KEY: &str = "MARGINATOR";
const TOTAL_POINTS_KEY: &str = "TOTAL POINTS";

const BLOCK_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Favorite,
    Underdog,
    Pick,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Favorite => "favorite",
            Role::Underdog => "underdog",
            Role::Pick => "pick",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("game {block} (starting at \"{start}\"): unknown {role} team \"{token}\"")]
    UnknownTeam {
        block: usize,
        start: String,
        role: Role,
        token: String,
    },
    #[error("game {block} (starting at \"{start}\"): invalid spread \"{token}\"")]
    InvalidSpread {
        block: usize,
        start: String,
        token: String,
    },
    #[error(
        "game {block} (starting at \"{start}\"): pick \"{pick}\" is neither \"{favorite}\" nor \"{underdog}\""
    )]
    PickNotInGame {
        block: usize,
        start: String,
        favorite: String,
        underdog: String,
        pick: String,
    },
    #[error("game {block} (starting at \"{start}\"): {team} is both favorite and underdog")]
    SameTeam {
        block: usize,
        start: String,
        team: TeamCode,
    },
    #[error("unknown {key} team \"{token}\"")]
    UnknownFooterTeam { key: &'static str, token: String },
    #[error("invalid total points \"{token}\"")]
    InvalidTotalPoints { token: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseWarning {
    #[error("game {block} ({favorite}): spread {spread} is not a half-point line")]
    NotHalfPoint {
        block: usize,
        favorite: TeamCode,
        spread: f64,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSlate {
    pub slate: WeekSlate,
    pub errors: Vec<ParseError>,
    pub warnings: Vec<ParseWarning>,
}

impl ParsedSlate {
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

pub struct PickParser<'a> {
    aliases: &'a TeamAliasTable,
    header_noise: Vec<String>,
}

impl<'a> PickParser<'a> {
    pub fn new(aliases: &'a TeamAliasTable) -> Self {
        Self::with_header_noise(aliases, DEFAULT_HEADER_NOISE.iter().copied())
    }

    pub fn with_header_noise<S: AsRef<str>>(
        aliases: &'a TeamAliasTable,
        noise: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            aliases,
            header_noise: noise
                .into_iter()
                .map(|s| s.as_ref().trim().to_uppercase())
                .collect(),
        }
    }

    pub fn parse(&self, text: &str) -> ParsedSlate {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !self.is_header_noise(l))
            .collect();

        let mut out = ParsedSlate::default();
        let mut i = 0;
        let mut block = 0;

        while i < lines.len() && !is_footer_key(lines[i]) {
            // A trailing partial block is dropped without comment.
            let Some(&[fav, spread, dog, pick]) = lines.get(i..i + BLOCK_LEN) else {
                break;
            };
            block += 1;
            i += BLOCK_LEN;
            match self.parse_block(block, [fav, spread, dog, pick]) {
                Ok((entry, warning)) => {
                    out.slate.entries.push(entry);
                    out.warnings.extend(warning);
                }
                Err(e) => {
                    log::debug!("skipping pick block: {e}");
                    out.errors.push(e);
                }
            }
        }

        while let Some(&[key, value]) = lines.get(i..i + 2) {
            i += 2;
            match key.to_uppercase().as_str() {
                SURVIVOR_KEY => {
                    out.slate.survivor = self.resolve_footer(SURVIVOR_KEY, value, &mut out.errors)
                }
                MARGINATOR_KEY => {
                    out.slate.marginator =
                        self.resolve_footer(MARGINATOR_KEY, value, &mut out.errors)
                }
                TOTAL_POINTS_KEY => {
                    out.slate.total_points = parse_number(value);
                    if out.slate.total_points.is_none() {
                        out.errors.push(ParseError::InvalidTotalPoints { token: value.to_owned() });
                    }
                }
                _ => {}
            }
        }

        out
    }

    fn parse_block(
        &self,
        block: usize,
        [fav_tok, spread_tok, dog_tok, pick_tok]: [&str; BLOCK_LEN],
    ) -> Result<(PickEntry, Option<ParseWarning>), ParseError> {
        let start = fav_tok.to_owned();
        let team = |role: Role, token: &str| {
            self.aliases.resolve(token).ok_or_else(|| ParseError::UnknownTeam {
                block,
                start: start.clone(),
                role,
                token: token.to_owned(),
            })
        };

        let favorite = team(Role::Favorite, fav_tok)?;
        let spread = parse_number(spread_tok)
            .map(f64::abs)
            .ok_or_else(|| ParseError::InvalidSpread {
                block,
                start: start.clone(),
                token: spread_tok.to_owned(),
            })?;
        let underdog = team(Role::Underdog, dog_tok)?;
        let pick = team(Role::Pick, pick_tok)?;

        let entry = PickEntry::new(favorite, underdog, spread, pick).map_err(|e| match e {
            PickError::SameTeam(team) => ParseError::SameTeam { block, start: start.clone(), team },
            PickError::InvalidSpread(_) => ParseError::InvalidSpread {
                block,
                start: start.clone(),
                token: spread_tok.to_owned(),
            },
            PickError::PickNotInGame { .. } => ParseError::PickNotInGame {
                block,
                start: start.clone(),
                favorite: fav_tok.to_owned(),
                underdog: dog_tok.to_owned(),
                pick: pick_tok.to_owned(),
            },
        })?;

        let warning = (!is_half_point(spread)).then(|| ParseWarning::NotHalfPoint {
            block,
            favorite: entry.favorite().clone(),
            spread,
        });
        Ok((entry, warning))
    }

    fn resolve_footer(
        &self,
        key: &'static str,
        value: &str,
        errors: &mut Vec<ParseError>,
    ) -> Option<TeamCode> {
        let team = self.aliases.resolve(value);
        if team.is_none() {
            errors.push(ParseError::UnknownFooterTeam { key, token: value.to_owned() });
        }
        team
    }

    fn is_header_noise(&self, line: &str) -> bool {
        let upper = line.to_uppercase();
        self.header_noise.iter().any(|n| *n == upper)
    }
}

fn is_footer_key(line: &str) -> bool {
    matches!(
        line.to_uppercase().as_str(),
        SURVIVOR_KEY | MARGINATOR_KEY | TOTAL_POINTS_KEY
    )
}

/// Keeps only digits, `.` and `-` before parsing, so labels like `"(-7.5)"`
/// or `"47 pts"` still read as numbers.
pub fn parse_number(token: &str) -> Option<f64> {
    let cleaned: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn is_half_point(spread: f64) -> bool {
    (spread.fract() - 0.5).abs() < 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ParsedSlate {
        let table = TeamAliasTable::nfl();
        PickParser::new(&table).parse(text)
    }

    #[test]
    fn parses_blocks_in_order() {
        let out = parse("KC\n-3.5\nBUF\nBUF\nPhiladelphia\n6.5\nCowboys\nEagles\n");
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        let entries = &out.slate.entries;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].favorite().as_str(), "KC");
        assert_eq!(entries[0].underdog().as_str(), "BUF");
        assert_eq!(entries[0].spread(), 3.5);
        assert_eq!(entries[0].pick().as_str(), "BUF");
        assert_eq!(entries[1].favorite().as_str(), "PHI");
        assert_eq!(entries[1].pick().as_str(), "PHI");
    }

    #[test]
    fn empty_input_yields_empty_result() {
        let out = parse("");
        assert!(out.slate.is_empty());
        assert!(out.errors.is_empty());
        assert!(out.warnings.is_empty());
        assert_eq!(parse("   \n\n  \t\n"), ParsedSlate::default());
    }

    #[test]
    fn header_noise_is_dropped_anywhere() {
        let text = "Favorite\nSpread\nUnderdog\nPick\nKC\nspread\n-3.5\nBUF\nKC\nPICK\n";
        let out = parse(text);
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        assert_eq!(out.slate.entries.len(), 1);
        assert_eq!(out.slate.entries[0].pick().as_str(), "KC");
    }

    #[test]
    fn unknown_team_skips_only_that_block() {
        let out = parse("Yankees\n-3.5\nBUF\nBUF\nDET\n-2.5\nGB\nGB\n");
        assert_eq!(out.slate.entries.len(), 1);
        assert_eq!(out.slate.entries[0].favorite().as_str(), "DET");
        assert_eq!(out.errors.len(), 1);
        assert!(matches!(
            &out.errors[0],
            ParseError::UnknownTeam { block: 1, role: Role::Favorite, token, .. } if token == "Yankees"
        ));
        assert!(out.error_messages()[0].contains("Yankees"));
    }

    #[test]
    fn invalid_spread_is_rejected() {
        let out = parse("KC\nPK\nBUF\nKC\n");
        assert!(out.slate.is_empty());
        assert!(matches!(&out.errors[0], ParseError::InvalidSpread { token, .. } if token == "PK"));
    }

    #[test]
    fn pick_must_be_one_of_the_two_teams() {
        let out = parse("KC\n-3.5\nBUF\nDAL\n");
        assert!(out.slate.is_empty());
        match &out.errors[0] {
            ParseError::PickNotInGame { start, pick, .. } => {
                assert_eq!(start, "KC");
                assert_eq!(pick, "DAL");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn team_listed_on_both_sides_is_rejected() {
        let out = parse("Chiefs\n3.5\nKC\nKC\nNE\n-2.5\nNYJ\nNYJ\n");
        assert_eq!(out.slate.entries.len(), 1);
        assert_eq!(out.slate.entries[0].favorite().as_str(), "NE");
        assert_eq!(
            out.errors,
            vec![ParseError::SameTeam { block: 1, start: "Chiefs".into(), team: "KC".into() }]
        );
        assert!(out.error_messages()[0].contains("both favorite and underdog"));
    }

    #[test]
    fn spread_noise_is_stripped() {
        let out = parse("KC\n(-7.5)\nBUF\nKC\n");
        assert_eq!(out.slate.entries[0].spread(), 7.5);
        assert_eq!(parse_number("+3.5"), Some(3.5));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("-"), None);
    }

    #[test]
    fn whole_number_spread_is_accepted_with_warning() {
        let out = parse("KC\n-7\nBUF\nKC\n");
        assert_eq!(out.slate.entries.len(), 1);
        assert!(out.errors.is_empty());
        assert_eq!(
            out.warnings,
            vec![ParseWarning::NotHalfPoint { block: 1, favorite: TeamCode::new("KC"), spread: 7.0 }]
        );
    }

    #[test]
    fn partial_trailing_block_is_silently_dropped() {
        let out = parse("KC\n-3.5\nBUF\nKC\nDET\n-2.5\nGB\n");
        assert_eq!(out.slate.entries.len(), 1);
        assert!(out.errors.is_empty());
    }

    #[test]
    fn footer_fields_are_read() {
        let text = "KC\n-3.5\nBUF\nKC\nsurvivor\nLions\nMarginator\nKC\nTotal Points\n47 pts\n";
        let out = parse(text);
        assert!(out.errors.is_empty(), "{:?}", out.errors);
        assert_eq!(out.slate.entries.len(), 1);
        assert_eq!(out.slate.survivor, Some(TeamCode::new("DET")));
        assert_eq!(out.slate.marginator, Some(TeamCode::new("KC")));
        assert_eq!(out.slate.total_points, Some(47.0));
    }

    #[test]
    fn bad_footer_values_are_reported() {
        let out = parse("SURVIVOR\nNowhere\nTOTAL POINTS\nlots\nNOTES\nwhatever\nMARGINATOR\n");
        assert_eq!(out.slate.survivor, None);
        assert_eq!(out.slate.total_points, None);
        assert_eq!(out.slate.marginator, None);
        assert_eq!(out.errors.len(), 2);
    }

    #[test]
    fn custom_header_noise() {
        let table = TeamAliasTable::nfl();
        let parser = PickParser::with_header_noise(&table, ["week 5"]);
        let out = parser.parse("Week 5\nKC\n-3.5\nBUF\nKC\n");
        assert_eq!(out.slate.entries.len(), 1);
    }

    #[test]
    fn arbitrary_text_never_panics() {
        let junk = "💥\n\u{0}\n-\n.\n--..--\nSURVIVOR\n\n\nTOTAL POINTS\n-.-\n";
        let out = parse(junk);
        assert!(out.slate.entries.is_empty());
    }
}
