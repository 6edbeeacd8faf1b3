use crate::cli::ConfigArgs;
use anyhow::Context;
use ats_api::aliases::TeamAliasTable;
use ats_api::grading::{Grader, PushPolicy};
use ats_api::matcher::MatchConfig;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Settings {
    pub picks_dir: PathBuf,
    pub aliases: TeamAliasTable,
    pub match_config: MatchConfig,
    pub grader: Grader,
}

impl Settings {
    pub fn load(args: &ConfigArgs) -> anyhow::Result<Self> {
        let aliases = match &args.aliases {
            Some(path) => TeamAliasTable::load(path)
                .with_context(|| format!("loading team aliases from {}", path.display()))?,
            None => TeamAliasTable::nfl(),
        };

        let push = match args.push_epsilon {
            Some(eps) if eps.is_finite() && eps > 0.0 => PushPolicy::Epsilon(eps),
            Some(eps) => anyhow::bail!("push epsilon must be a positive number, got {eps}"),
            None => PushPolicy::Exact,
        };

        Ok(Self {
            picks_dir: args.picks_dir.clone(),
            aliases,
            match_config: MatchConfig { exhaustive_fallback: !args.no_sweep },
            grader: Grader::new(push),
        })
    }
}

/// `-v` beats `RUST_LOG`; with neither only warnings are shown.
pub fn log_level(verbose: u8) -> Option<LevelFilter> {
    match verbose {
        0 => None,
        1 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ConfigArgs {
        ConfigArgs {
            picks_dir: PathBuf::from("picks"),
            aliases: None,
            no_sweep: false,
            push_epsilon: None,
        }
    }

    #[test]
    fn defaults_use_builtin_table_and_exact_push() {
        let settings = Settings::load(&args()).unwrap();
        assert_eq!(settings.aliases.len(), 32);
        assert_eq!(settings.grader.push, PushPolicy::Exact);
        assert!(settings.match_config.exhaustive_fallback);
    }

    #[test]
    fn flags_switch_policies() {
        let settings = Settings::load(&ConfigArgs {
            no_sweep: true,
            push_epsilon: Some(1e-9),
            ..args()
        })
        .unwrap();
        assert!(!settings.match_config.exhaustive_fallback);
        assert_eq!(settings.grader.push, PushPolicy::Epsilon(1e-9));
    }

    #[test]
    fn non_positive_epsilon_is_rejected() {
        assert!(Settings::load(&ConfigArgs { push_epsilon: Some(0.0), ..args() }).is_err());
    }

    #[test]
    fn missing_alias_file_is_an_error() {
        let missing = ConfigArgs {
            aliases: Some(PathBuf::from("/nonexistent/aliases.json")),
            ..args()
        };
        assert!(Settings::load(&missing).is_err());
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(log_level(0), None);
        assert_eq!(log_level(1), Some(LevelFilter::Debug));
        assert_eq!(log_level(5), Some(LevelFilter::Trace));
    }
}
