use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;

use crate::config::ResolvedConfig;

/// Ruby sources found under directories, filtered by extension.
const RUBY_EXTENSIONS: &[&str] = &["rb", "rake", "gemspec", "ru"];

/// Discover Ruby files from the given paths, respecting .gitignore
/// and AllCops.Exclude patterns. Files named explicitly are always kept.
pub fn discover_files(paths: &[PathBuf], config: &ResolvedConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            files.extend(walk_directory(path, config)?);
        } else {
            anyhow::bail!("path does not exist: {}", path.display());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn walk_directory(dir: &Path, config: &ResolvedConfig) -> Result<Vec<PathBuf>> {
    let mut builder = WalkBuilder::new(dir);
    builder.hidden(true).git_ignore(true).git_global(true);

    let global_excludes = config.global_excludes();
    if !global_excludes.is_empty() {
        let root = config.config_dir().unwrap_or(dir);
        let mut overrides = OverrideBuilder::new(root);
        for pattern in global_excludes {
            // A leading `!` turns an override glob into an ignore rule.
            overrides
                .add(&format!("!{pattern}"))
                .with_context(|| format!("invalid exclude pattern: {pattern}"))?;
        }
        let overrides = overrides.build().context("failed to build overrides")?;
        builder.overrides(overrides);
    }

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry.context("error walking directory")?;
        let path = entry.path();
        let is_ruby = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| RUBY_EXTENSIONS.contains(&ext));
        if is_ruby && path.is_file() {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}
