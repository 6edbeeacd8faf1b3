use ats_api::grading::{GradedEntry, WeekReport};
use ats_api::parser::ParsedSlate;
use ats_api::{PickEntry, WeekSlate};

const GRADE_HEADERS: [&str; 7] = [
    "Game",
    "Spread",
    "Your Pick",
    "Score",
    "Status",
    "ATS Result",
    "Notes",
];
const SLATE_HEADERS: [&str; 5] = ["#", "Favorite", "Spread", "Underdog", "Pick"];

pub fn render_week(report: &WeekReport) -> String {
    let mut out = format!("Season {} · Week {}\n\n", report.season, report.week);

    if report.entries.is_empty() {
        out.push_str(&format!("No picks saved for week {}.\n", report.week));
    } else {
        let rows: Vec<Vec<String>> = report
            .entries
            .iter()
            .map(|e| grade_row(e, report.week))
            .collect();
        out.push_str(&render_table(&GRADE_HEADERS, &rows));
    }

    let s = &report.summary;
    out.push_str(&format!(
        "\nCorrect: {}  Incorrect: {}  Push: {}  In Progress: {}  Not Started: {}  No Match: {}\n",
        s.correct, s.incorrect, s.push, s.pending, s.not_started, s.unmatched
    ));
    out.push_str(&format!("Survivor: {}\n", report.survivor));
    out.push_str(&format!("Marginator: {}\n", report.marginator_label()));
    out
}

fn grade_row(graded: &GradedEntry, pool_week: u8) -> Vec<String> {
    let e = &graded.entry;
    let mut notes = Vec::new();
    if graded.survivor {
        notes.push("Survivor".to_owned());
    }
    if graded.marginator {
        notes.push(match graded.grade.pick_margin {
            Some(m) => format!("Margin {m}"),
            None => "Margin —".to_owned(),
        });
    }
    if let Some(week) = graded.week.filter(|&w| w != pool_week) {
        notes.push(format!("Wk {week}"));
    }

    vec![
        format!("{} (-{}) vs {}", e.favorite(), e.spread(), e.underdog()),
        format!("-{}", e.spread()),
        e.pick().to_string(),
        graded
            .game
            .as_ref()
            .map_or_else(|| "—".to_owned(), |g| g.scoreline()),
        graded.status_label().to_owned(),
        graded.result_label().to_owned(),
        notes.join(" "),
    ]
}

pub fn render_slate(parsed: &ParsedSlate) -> String {
    let mut out = render_entries(&parsed.slate);
    for warning in &parsed.warnings {
        out.push_str(&format!("warning: {warning}\n"));
    }
    out
}

fn render_entries(slate: &WeekSlate) -> String {
    let rows: Vec<Vec<String>> = slate
        .entries
        .iter()
        .enumerate()
        .map(|(i, e)| slate_row(i + 1, e))
        .collect();

    let mut out = if rows.is_empty() {
        "No picks found.\n".to_owned()
    } else {
        render_table(&SLATE_HEADERS, &rows)
    };
    let team = |t: &Option<ats_api::TeamCode>| t.as_ref().map_or("—".to_owned(), |t| t.to_string());
    out.push_str(&format!("\nSurvivor: {}\n", team(&slate.survivor)));
    out.push_str(&format!("Marginator: {}\n", team(&slate.marginator)));
    out.push_str(&format!(
        "Total points: {}\n",
        slate.total_points.map_or("—".to_owned(), |p| p.to_string())
    ));
    out
}

fn slate_row(n: usize, e: &PickEntry) -> Vec<String> {
    vec![
        n.to_string(),
        e.favorite().to_string(),
        format!("-{}", e.spread()),
        e.underdog().to_string(),
        e.pick().to_string(),
    ]
}

/// Left-aligned columns sized to their widest cell.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect();
        format!("{}\n", padded.join(" │ ").trim_end())
    };

    let mut out = line(headers.to_vec());
    let rule: Vec<String> = widths.iter().map(|&w| "─".repeat(w)).collect();
    out.push_str(&format!("{}\n", rule.join("─┼─")));
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}
