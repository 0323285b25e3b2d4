//! `--auto-gen-config`: a `.rubocop_todo.yml` that silences every offense of
//! the current run, one entry per reporting cop.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_yml::{Mapping, Value};

use crate::config::{CONFIG_FILE_NAME, ResolvedConfig};
use crate::cop::Cop;
use crate::cop::enforced_style::{ConfigSuggestion, StyleTally};
use crate::cop::registry::CopRegistry;
use crate::diagnostic::Diagnostic;

pub const TODO_FILE_NAME: &str = ".rubocop_todo.yml";

/// One cop's section of the todo file.
#[derive(Debug, Clone, PartialEq)]
pub struct TodoEntry {
    pub cop_name: &'static str,
    pub offense_count: usize,
    pub autocorrectable: bool,
    pub supported_styles: &'static [&'static str],
    pub suggestion: ConfigSuggestion,
}

/// Work out an entry for every cop that reported something. Cops with
/// styles get the suggestion their tally supports; the rest are disabled.
pub fn build_entries(
    registry: &CopRegistry,
    config: &ResolvedConfig,
    diagnostics: &[Diagnostic],
    tallies: &[StyleTally],
) -> Vec<TodoEntry> {
    let mut entries: Vec<TodoEntry> = registry
        .cops()
        .iter()
        .enumerate()
        .filter_map(|(i, cop)| {
            let offense_count = diagnostics
                .iter()
                .filter(|d| d.cop_name == cop.name())
                .count();
            if offense_count == 0 {
                return None;
            }
            Some(TodoEntry {
                cop_name: cop.name(),
                offense_count,
                autocorrectable: cop.supports_autocorrect(),
                supported_styles: cop.supported_styles(),
                suggestion: suggestion_for(&**cop, config, tallies.get(i)),
            })
        })
        .collect();
    entries.sort_by_key(|e| e.cop_name);
    entries
}

fn suggestion_for(
    cop: &dyn Cop,
    config: &ResolvedConfig,
    tally: Option<&StyleTally>,
) -> ConfigSuggestion {
    let supported = cop.supported_styles();
    let Some(tally) = tally.filter(|_| !supported.is_empty()) else {
        return ConfigSuggestion::Disable;
    };
    let cop_config = config.cop_config(cop.name());
    let configured = cop_config
        .string_option("EnforcedStyle")
        .ok()
        .flatten()
        .or_else(|| supported.first().copied())
        .unwrap_or_default();
    tally
        .config_to_allow_offenses(supported, configured)
        .unwrap_or(ConfigSuggestion::Disable)
}

/// Render the todo file.
pub fn render(entries: &[TodoEntry]) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "# This configuration was generated by")?;
    writeln!(out, "# `defparens --auto-gen-config`")?;
    writeln!(out, "# using defparens version {}.", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "# Remove entries one by one as the offenses are fixed.")?;

    for entry in entries {
        writeln!(out)?;
        writeln!(out, "# Offense count: {}", entry.offense_count)?;
        if entry.autocorrectable {
            writeln!(out, "# This cop supports safe autocorrection (--autocorrect).")?;
        }
        if !entry.supported_styles.is_empty() {
            writeln!(out, "# Configuration parameters: EnforcedStyle.")?;
            writeln!(
                out,
                "# SupportedStyles: {}",
                entry.supported_styles.join(", ")
            )?;
        }

        let mut settings = Mapping::new();
        settings.insert(
            Value::String(entry.suggestion.key().to_string()),
            entry.suggestion.value(),
        );
        let mut section = Mapping::new();
        section.insert(
            Value::String(entry.cop_name.to_string()),
            Value::Mapping(settings),
        );
        let yaml = serde_yml::to_string(&Value::Mapping(section))
            .with_context(|| format!("failed to render todo entry for {}", entry.cop_name))?;
        out.push_str(yaml.trim_start_matches("---\n"));
    }
    Ok(out)
}

/// Write the todo file into `dir` and make the config there inherit it.
/// Returns the path written.
pub fn write_todo(dir: &Path, contents: &str) -> Result<PathBuf> {
    let todo_path = dir.join(TODO_FILE_NAME);
    std::fs::write(&todo_path, contents)
        .with_context(|| format!("failed to write {}", todo_path.display()))?;

    let config_path = dir.join(CONFIG_FILE_NAME);
    let existing = if config_path.exists() {
        std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?
    } else {
        String::new()
    };
    if existing.contains(TODO_FILE_NAME) {
        return Ok(todo_path);
    }
    if existing.lines().any(|l| l.starts_with("inherit_from:")) {
        eprintln!(
            "warning: {} already has inherit_from; add {TODO_FILE_NAME} to it by hand",
            config_path.display()
        );
        return Ok(todo_path);
    }
    let updated = format!("inherit_from: {TODO_FILE_NAME}\n\n{existing}");
    std::fs::write(&config_path, updated)
        .with_context(|| format!("failed to update {}", config_path.display()))?;
    Ok(todo_path)
}
