use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde_yml::{Mapping, Value};

use crate::cop::CopConfig;
use crate::cop::registry::CopRegistry;
use crate::diagnostic::Severity;

pub const CONFIG_FILE_NAME: &str = ".rubocop.yml";

/// Resolved configuration from `.rubocop.yml`.
///
/// A single file is read: `AllCops.Exclude` plus per-cop `Enabled`,
/// `Severity`, `Exclude`, `Include` and free-form options. There is no
/// `inherit_from` resolution.
#[derive(Debug, Default)]
pub struct ResolvedConfig {
    /// Per-cop configs keyed by cop name (e.g. "Style/MethodDefParentheses")
    cop_configs: HashMap<String, CopConfig>,
    global_excludes: Vec<String>,
    /// Directory holding the loaded file; patterns are relative to it.
    config_dir: Option<PathBuf>,
}

/// Load config from `path`, or from the nearest `.rubocop.yml` at or above
/// `target_dir` (the current directory when `None`). No file at all yields
/// the built-in defaults; an explicit path that doesn't exist is an error.
pub fn load_config(path: Option<&Path>, target_dir: Option<&Path>) -> Result<ResolvedConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("configuration file not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => match find_config_upwards(target_dir)? {
            Some(p) => p,
            None => return Ok(ResolvedConfig::default()),
        },
    };

    let raw = load_yaml(&config_path, 0)?;
    let mut config =
        from_value(&raw).with_context(|| format!("failed to load {}", config_path.display()))?;
    config.config_dir = config_path
        .parent()
        .map(|dir| dir.to_path_buf())
        .filter(|dir| !dir.as_os_str().is_empty())
        .or_else(|| std::env::current_dir().ok());
    Ok(config)
}

const MAX_INHERIT_DEPTH: usize = 8;

/// Read a config file with its `inherit_from` chain merged in. Inherited
/// files come first; keys of the including file win, per cop and per option.
fn load_yaml(path: &Path, depth: usize) -> Result<Value> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let raw: Value = serde_yml::from_str(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let mut own = match raw {
        Value::Mapping(map) => map,
        other => return Ok(other),
    };
    let inherited = own.remove("inherit_from");

    let dir = path.parent().unwrap_or(Path::new("."));
    let mut merged = Mapping::new();
    for name in inherited.as_ref().map(string_or_list).unwrap_or_default() {
        if depth >= MAX_INHERIT_DEPTH {
            anyhow::bail!("inherit_from nested too deeply at {}", path.display());
        }
        let inherited_path = dir.join(&name);
        if let Value::Mapping(base) = load_yaml(&inherited_path, depth + 1)
            .with_context(|| format!("inherited by {}", path.display()))?
        {
            merge_mappings(&mut merged, base);
        }
    }
    merge_mappings(&mut merged, own);
    Ok(Value::Mapping(merged))
}

fn merge_mappings(base: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Mapping(existing)), Value::Mapping(inner)) => {
                for (k, v) in inner {
                    existing.insert(k, v);
                }
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn string_or_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        other => value_to_string_list(other).unwrap_or_default(),
    }
}

fn find_config_upwards(start: Option<&Path>) -> Result<Option<PathBuf>> {
    let start = match start {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().context("failed to resolve current directory")?,
    };
    let start = start.canonicalize().unwrap_or(start);
    Ok(start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file()))
}

/// Parse the contents of a single `.rubocop.yml`, ignoring `inherit_from`.
pub fn parse_config(contents: &str) -> Result<ResolvedConfig> {
    let raw: Value = serde_yml::from_str(contents).context("invalid YAML")?;
    from_value(&raw)
}

fn from_value(raw: &Value) -> Result<ResolvedConfig> {
    let mut cop_configs = HashMap::new();
    let mut global_excludes = Vec::new();

    if let Value::Mapping(map) = raw {
        for (key, value) in map {
            let Some(key_str) = key.as_str() else {
                continue;
            };

            if key_str == "AllCops" {
                if let Some(excludes) = extract_string_list(value, "Exclude") {
                    global_excludes = excludes;
                }
                continue;
            }

            // Cop names contain "/" (e.g. "Style/MethodDefParentheses")
            if key_str.contains('/') {
                let cop_config = parse_cop_config(value)
                    .with_context(|| format!("invalid configuration for {key_str}"))?;
                cop_configs.insert(key_str.to_string(), cop_config);
            }
        }
    }

    Ok(ResolvedConfig {
        cop_configs,
        global_excludes,
        config_dir: None,
    })
}

impl ResolvedConfig {
    /// Check if a cop is enabled (ignoring Include/Exclude).
    pub fn is_cop_enabled(&self, name: &str) -> bool {
        self.cop_configs.get(name).is_none_or(|config| config.enabled)
    }

    /// Get the resolved config for a specific cop.
    pub fn cop_config(&self, name: &str) -> CopConfig {
        self.cop_configs.get(name).cloned().unwrap_or_default()
    }

    /// Global exclude patterns from AllCops.Exclude.
    pub fn global_excludes(&self) -> &[String] {
        &self.global_excludes
    }

    pub fn config_dir(&self) -> Option<&Path> {
        self.config_dir.as_deref()
    }

    /// Let every registered cop reject its options before any file is read.
    pub fn validate(&self, registry: &CopRegistry) -> Result<()> {
        for cop in registry.cops() {
            if !self.is_cop_enabled(cop.name()) {
                continue;
            }
            cop.validate_config(&self.cop_config(cop.name()))?;
        }
        Ok(())
    }

    /// Per-cop configs in registry order.
    pub fn cop_configs_for(&self, registry: &CopRegistry) -> Vec<CopConfig> {
        registry
            .cops()
            .iter()
            .map(|cop| self.cop_config(cop.name()))
            .collect()
    }

    /// Compile AllCops.Exclude and per-cop Include/Exclude patterns.
    pub fn build_cop_filters(&self, registry: &CopRegistry) -> Result<CopFilterSet> {
        let filters = registry
            .cops()
            .iter()
            .map(|cop| {
                let config = self.cop_config(cop.name());
                Ok(CopFilter {
                    enabled: config.enabled,
                    include: build_glob_set(&config.include)
                        .with_context(|| format!("invalid Include pattern for {}", cop.name()))?,
                    exclude: build_glob_set(&config.exclude)
                        .with_context(|| format!("invalid Exclude pattern for {}", cop.name()))?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(CopFilterSet {
            filters,
            base_dir: self.config_dir.clone(),
        })
    }
}

/// Compiled file filter for one cop.
#[derive(Debug)]
struct CopFilter {
    enabled: bool,
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl CopFilter {
    fn is_match(&self, candidates: &[&Path]) -> bool {
        if !self.enabled {
            return false;
        }
        let included = self
            .include
            .as_ref()
            .is_none_or(|set| candidates.iter().any(|p| set.is_match(p)));
        let excluded = self
            .exclude
            .as_ref()
            .is_some_and(|set| candidates.iter().any(|p| set.is_match(p)));
        included && !excluded
    }
}

/// File filters for every registered cop, indexed like the registry.
#[derive(Debug)]
pub struct CopFilterSet {
    filters: Vec<CopFilter>,
    base_dir: Option<PathBuf>,
}

impl CopFilterSet {
    /// The cop at `index` is enabled and its Include/Exclude patterns admit `path`.
    pub fn is_cop_match(&self, index: usize, path: &Path) -> bool {
        let relative = self.relative(path);
        self.filters[index].is_match(&[path, relative])
    }

    /// `path` relative to the config directory, or unchanged.
    fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        let stripped = self
            .base_dir
            .as_deref()
            .and_then(|base| path.strip_prefix(base).ok());
        stripped
            .or_else(|| path.strip_prefix("./").ok())
            .unwrap_or(path)
    }
}

fn build_glob_set(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).with_context(|| format!("bad glob `{pattern}`"))?);
    }
    Ok(Some(builder.build()?))
}

fn parse_cop_config(value: &Value) -> Result<CopConfig> {
    let mut config = CopConfig::default();

    let Value::Mapping(map) = value else {
        return Ok(config);
    };
    for (k, v) in map {
        let Some(key) = k.as_str() else {
            continue;
        };
        match key {
            "Enabled" => {
                if let Some(b) = v.as_bool() {
                    config.enabled = b;
                }
            }
            "Severity" => {
                let name = v.as_str().context("Severity must be a string")?;
                config.severity = Some(name.parse::<Severity>().map_err(anyhow::Error::msg)?);
            }
            "Exclude" => {
                if let Some(list) = value_to_string_list(v) {
                    config.exclude = list;
                }
            }
            "Include" => {
                if let Some(list) = value_to_string_list(v) {
                    config.include = list;
                }
            }
            _ => {
                config.options.insert(key.to_string(), v.clone());
            }
        }
    }

    Ok(config)
}

fn extract_string_list(value: &Value, key: &str) -> Option<Vec<String>> {
    value_to_string_list(value.get(key)?)
}

fn value_to_string_list(value: &Value) -> Option<Vec<String>> {
    value.as_sequence().map(|seq| {
        seq.iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect()
    })
}
