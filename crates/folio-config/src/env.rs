//! Environment variable fallbacks and `${VAR}` references.
//!
//! Environment variables fill fields that no config file set: a value that
//! still comes from the embedded defaults, or no value at all. A file always
//! wins over the environment.

use std::collections::HashMap;

use tracing::debug;

use crate::merge::{ConfigLayer, FieldSources};

/// Environment variables consulted as fallbacks, with the field each fills.
pub const ENV_FALLBACKS: &[(&str, &str, &str)] = &[
    ("FOLIO_MEDIA_SECRET", "media", "secret"),
    ("FOLIO_MEDIA_BASE_URL", "media", "base_url"),
    ("FOLIO_LOG_LEVEL", "logging", "level"),
    ("FOLIO_LOG_FORMAT", "logging", "format"),
];

/// Snapshot the process environment.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Apply [`ENV_FALLBACKS`] to fields not set by any file.
///
/// Returns the number of fields filled from the environment.
pub fn apply_env_fallbacks(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String>,
) -> usize {
    let mut applied = 0usize;

    for &(var, section, key) in ENV_FALLBACKS {
        let Some(value) = env_vars.get(var).filter(|v| !v.is_empty()) else {
            continue;
        };

        let path = format!("{section}.{key}");
        let set_by_file = sources
            .get(&path)
            .is_some_and(|layer| *layer != ConfigLayer::Defaults);
        if set_by_file {
            continue;
        }

        let Some(table) = merged.as_table_mut() else {
            continue;
        };
        let section_table = table
            .entry(section)
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
        if let Some(section_table) = section_table.as_table_mut() {
            section_table.insert(key.to_owned(), toml::Value::String(value.clone()));
            sources.insert(path, ConfigLayer::Environment(var.to_owned()));
            debug!(var, "applied environment fallback");
            applied = applied.saturating_add(1);
        }
    }

    applied
}

/// Replace `${VAR}` references in every string value.
///
/// Unknown variables resolve to an empty string.
pub fn resolve_env_references(val: &mut toml::Value, env_vars: &HashMap<String, String>) {
    match val {
        toml::Value::String(s) => {
            if s.contains("${") {
                *s = substitute(s, env_vars);
            }
        },
        toml::Value::Array(items) => {
            for item in items {
                resolve_env_references(item, env_vars);
            }
        },
        toml::Value::Table(table) => {
            for (_, child) in table.iter_mut() {
                resolve_env_references(child, env_vars);
            }
        },
        _ => {},
    }
}

fn substitute(input: &str, env_vars: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        let (before, after) = rest.split_at(start);
        out.push_str(before);
        let after = &after[2..];

        let Some(end) = after.find('}') else {
            // Unterminated reference: keep it verbatim.
            out.push_str("${");
            out.push_str(after);
            return out;
        };

        let name = &after[..end];
        if let Some(value) = env_vars.get(name) {
            out.push_str(value);
        }
        rest = &after[end.saturating_add(1)..];
    }

    out.push_str(rest);
    out
}
