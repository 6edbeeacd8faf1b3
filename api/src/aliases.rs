//! Team alias table: maps free-text team tokens onto canonical codes.
use crate::TeamCode;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

const NFL_ALIASES_JSON: &str = include_str!("../data/nfl_aliases.json");

#[derive(Debug, Error)]
pub enum AliasError {
    #[error("could not read alias table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid alias table: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
struct AliasRecord {
    code: String,
    #[serde(default)]
    aliases: Vec<String>,
}

/// Read-only after construction. Entries keep their file order; when two
/// teams claim the same alias the earlier entry wins.
#[derive(Debug, Clone, Default)]
pub struct TeamAliasTable {
    codes: Vec<TeamCode>,
    lookup: HashMap<String, TeamCode>,
}

impl TeamAliasTable {
    /// Built-in table of the 32 NFL franchises keyed by ESPN abbreviation.
    pub fn nfl() -> Self {
        // The embedded table is covered by tests; an empty table is the only
        // sane fallback if it were ever corrupted.
        Self::from_json(NFL_ALIASES_JSON).unwrap_or_else(|e| {
            log::error!("embedded NFL alias table is invalid: {e}");
            Self::default()
        })
    }

    pub fn from_json(json: &str) -> Result<Self, AliasError> {
        let records: Vec<AliasRecord> = serde_json::from_str(json)?;
        Ok(Self::from_entries(
            records.into_iter().map(|r| (r.code, r.aliases)),
        ))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AliasError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| AliasError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_entries<C, A, S>(entries: impl IntoIterator<Item = (C, A)>) -> Self
    where
        C: AsRef<str>,
        A: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::default();
        for (code, aliases) in entries {
            let code = TeamCode::new(code.as_ref());
            let mut normalized: Vec<String> = vec![code.as_str().to_owned()];
            normalized.extend(aliases.into_iter().map(|a| normalize(a.as_ref())));
            normalized.retain(|a| !a.is_empty());
            normalized.dedup();

            for alias in &normalized {
                table
                    .lookup
                    .entry(alias.clone())
                    .or_insert_with(|| code.clone());
            }
            table.codes.push(code);
        }
        table
    }

    /// Canonical code for `token`, or `None` when no team claims it.
    pub fn resolve(&self, token: &str) -> Option<TeamCode> {
        self.lookup.get(&normalize(token)).cloned()
    }

    pub fn codes(&self) -> impl Iterator<Item = &TeamCode> {
        self.codes.iter()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

fn normalize(token: &str) -> String {
    token.trim().to_uppercase()
}
