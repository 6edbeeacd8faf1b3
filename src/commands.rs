use crate::feed::ScoreFeed;
use crate::refresher::PeriodicRefresher;
use crate::report;
use crate::settings::Settings;
use crate::store;
use anyhow::Context;
use ats_api::WeekSlate;
use ats_api::client::{CurrentWeek, EspnApi};
use ats_api::grading::WeekReport;
use ats_api::parser::{ParsedSlate, PickParser};
use chrono::{Datelike, Local};
use log::{debug, info, warn};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// JSON view of a parse: the slate plus rendered problems.
#[derive(Serialize)]
struct ParseOutput<'a> {
    slate: &'a WeekSlate,
    errors: Vec<String>,
    warnings: Vec<String>,
}

pub fn parse(settings: &Settings, input: &Path, json: bool) -> anyhow::Result<()> {
    let parsed = parse_input(settings, input)?;
    if json {
        let out = ParseOutput {
            slate: &parsed.slate,
            errors: parsed.error_messages(),
            warnings: parsed.warnings.iter().map(ToString::to_string).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", report::render_slate(&parsed));
        print_errors(&parsed);
    }
    Ok(())
}

pub fn import(
    settings: &Settings,
    season: Option<u16>,
    week: u8,
    input: &Path,
) -> anyhow::Result<()> {
    let season = season.unwrap_or_else(calendar_season);
    let parsed = parse_input(settings, input)?;
    print_errors(&parsed);
    for warning in &parsed.warnings {
        eprintln!("warning: {warning}");
    }
    if parsed.slate.is_empty() {
        anyhow::bail!("nothing to save: no complete pick blocks found");
    }

    let mut picks = store::load_season(&settings.picks_dir, season)?;
    if picks.set_week(week, parsed.slate).is_some() {
        info!("replacing saved picks for {season} week {week}");
    }
    let path = store::save_season(&settings.picks_dir, season, &picks)?;
    println!(
        "Saved {} picks for {season} week {week} to {}",
        picks.week(week).entries.len(),
        path.display()
    );
    Ok(())
}

pub async fn grade(
    settings: &Settings,
    season: Option<u16>,
    week: Option<u8>,
    json: bool,
    watch: Option<u64>,
) -> anyhow::Result<()> {
    let api = EspnApi::new();
    let season = match season {
        Some(season) => season,
        None => current_season(&api).await,
    };
    let picks = store::load_season(&settings.picks_dir, season)?;
    let week = picks.default_week(week);
    let slate = picks.week(week);
    debug!("grading {season} week {week}: {} entries", slate.entries.len());

    let mut feed = ScoreFeed::new(api);
    let show = |report: &WeekReport| -> anyhow::Result<String> {
        Ok(if json {
            serde_json::to_string_pretty(report)?
        } else {
            report::render_week(report)
        })
    };

    let Some(secs) = watch else {
        let report = feed.grade_week(&slate, season, week, settings).await;
        println!("{}", show(&report)?);
        return Ok(());
    };

    let refresher = PeriodicRefresher::new(feed, settings, Duration::from_secs(secs));
    refresher
        .run(&slate, season, week, |report, stamp| match show(report) {
            Ok(text) => println!("{text}\n{stamp}\n"),
            Err(e) => warn!("could not render report: {e}"),
        })
        .await;
    Ok(())
}

pub fn weeks(settings: &Settings, season: Option<u16>) -> anyhow::Result<()> {
    let season = season.unwrap_or_else(calendar_season);
    let picks = store::load_season(&settings.picks_dir, season)?;
    let weeks = picks.weeks_with_picks();
    if weeks.is_empty() {
        println!("No saved picks for {season}.");
        return Ok(());
    }
    for week in weeks {
        let slate = picks.week(week);
        println!("Week {week:>2}: {} picks", slate.entries.len());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_input(settings: &Settings, input: &Path) -> anyhow::Result<ParsedSlate> {
    let text = read_input(input)?;
    Ok(PickParser::new(&settings.aliases).parse(&text))
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading picks from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))
}

fn print_errors(parsed: &ParsedSlate) {
    for message in parsed.error_messages() {
        eprintln!("error: {message}");
    }
}

async fn current_season(api: &EspnApi) -> u16 {
    match api.fetch_current().await {
        Ok(CurrentWeek { season: Some(season), .. }) => season,
        Ok(_) => calendar_season(),
        Err(e) => {
            warn!("could not ask ESPN for the current season: {e}");
            calendar_season()
        }
    }
}

/// NFL seasons are named for the year they kick off; January and February
/// games still belong to the previous year's season.
fn calendar_season() -> u16 {
    season_for(Local::now().date_naive())
}

fn season_for(date: chrono::NaiveDate) -> u16 {
    let year = if date.month() < 3 { date.year() - 1 } else { date.year() };
    u16::try_from(year).unwrap_or_default()
}
