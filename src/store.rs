use anyhow::Context;
use ats_api::picks::SeasonPicks;
use log::debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub fn season_path(dir: &Path, season: u16) -> PathBuf {
    dir.join(format!("{season}.json"))
}

/// A missing file is an empty season; a malformed one is an error so that a
/// later save cannot overwrite it.
pub fn load_season(dir: &Path, season: u16) -> anyhow::Result<SeasonPicks> {
    let path = season_path(dir, season);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("{} does not exist yet", path.display());
            return Ok(SeasonPicks::new(season));
        }
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };

    let mut picks = SeasonPicks::from_json(&content)
        .with_context(|| format!("invalid picks file {}", path.display()))?;
    picks.season.get_or_insert(season);
    Ok(picks)
}

pub fn save_season(dir: &Path, season: u16, picks: &SeasonPicks) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = season_path(dir, season);
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, picks.to_json()?).with_context(|| format!("writing {}", tmp.display()))?;
    std::fs::rename(&tmp, &path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ats_api::{PickEntry, WeekSlate};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("atspool-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn missing_file_is_empty_season() {
        let dir = scratch_dir("missing");
        let picks = load_season(&dir, 2031).unwrap();
        assert_eq!(picks.season, Some(2031));
        assert!(picks.weeks.is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = scratch_dir("roundtrip");
        let mut picks = SeasonPicks::new(2025);
        picks.set_week(
            2,
            WeekSlate {
                entries: vec![PickEntry::new("KC".into(), "BUF".into(), 3.5, "KC".into()).unwrap()],
                ..WeekSlate::default()
            },
        );
        let path = save_season(&dir, 2025, &picks).unwrap();
        assert!(path.ends_with("2025.json"));
        assert_eq!(load_season(&dir, 2025).unwrap(), picks);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = scratch_dir("malformed");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(season_path(&dir, 2025), "{ not json").unwrap();
        assert!(load_season(&dir, 2025).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
