use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use rayon::prelude::*;
use ruby_prism::Visit;

use crate::cli::{Args, AutocorrectMode};
use crate::config::{CopFilterSet, ResolvedConfig};
use crate::cop::CopConfig;
use crate::cop::enforced_style::StyleTally;
use crate::cop::registry::CopRegistry;
use crate::cop::walker::{CopWalker, WalkerCop};
use crate::correction::{Correction, CorrectionSet};
use crate::diagnostic::Diagnostic;
use crate::parse::source::SourceFile;

/// Upper bound on autocorrect passes over one file.
pub const MAX_ITERATIONS: usize = 200;

/// A file that could not be linted.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: anyhow::Error,
}

pub struct LintResult {
    pub diagnostics: Vec<Diagnostic>,
    pub file_count: usize,
    pub corrected_count: usize,
    pub failures: Vec<FileFailure>,
    /// Indexed like the registry; filled only for `--auto-gen-config`.
    pub style_tallies: Vec<StyleTally>,
    /// Autocorrected source in `--stdin` mode.
    pub corrected_source: Option<Vec<u8>>,
}

/// Everything the per-file pipeline needs, computed once per run.
struct LintContext<'a> {
    registry: &'a CopRegistry,
    cop_configs: Vec<CopConfig>,
    filters: CopFilterSet,
    mode: AutocorrectMode,
    detect_styles: bool,
    debug: bool,
}

impl<'a> LintContext<'a> {
    fn new(config: &ResolvedConfig, registry: &'a CopRegistry, args: &Args) -> Result<Self> {
        Ok(Self {
            registry,
            cop_configs: config.cop_configs_for(registry),
            filters: config.build_cop_filters(registry)?,
            mode: args.autocorrect_mode(),
            detect_styles: args.auto_gen_config,
            debug: args.debug,
        })
    }
}

/// What linting one file produced.
struct FileOutcome {
    diagnostics: Vec<Diagnostic>,
    corrected_bytes: Option<Vec<u8>>,
    corrected_count: usize,
    tallies: Vec<(usize, StyleTally)>,
}

/// Lint a single SourceFile (already loaded into memory). Used for --stdin mode.
pub fn lint_source(
    source: &SourceFile,
    config: &ResolvedConfig,
    registry: &CopRegistry,
    args: &Args,
) -> Result<LintResult> {
    let ctx = LintContext::new(config, registry, args)?;
    let mut style_tallies = vec![StyleTally::default(); registry.cops().len()];

    let (diagnostics, corrected_count, corrected_source, failures) =
        match lint_source_inner(source, &ctx) {
            Ok(outcome) => {
                merge_tallies(&mut style_tallies, outcome.tallies);
                (
                    outcome.diagnostics,
                    outcome.corrected_count,
                    outcome.corrected_bytes,
                    Vec::new(),
                )
            }
            Err(error) => (
                Vec::new(),
                0,
                None,
                vec![FileFailure {
                    path: source.path.clone(),
                    error,
                }],
            ),
        };

    let mut sorted = diagnostics;
    sorted.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    Ok(LintResult {
        diagnostics: sorted,
        file_count: 1,
        corrected_count,
        failures,
        style_tallies,
        corrected_source,
    })
}

pub fn run_linter(
    files: &[PathBuf],
    config: &ResolvedConfig,
    registry: &CopRegistry,
    args: &Args,
) -> Result<LintResult> {
    let wall_start = std::time::Instant::now();
    let ctx = LintContext::new(config, registry, args)?;
    let found_offense = AtomicBool::new(false);

    let outcomes: Vec<(&PathBuf, Result<FileOutcome>)> = files
        .par_iter()
        .filter_map(|path| {
            // --fail-fast: skip remaining files once an offense is found
            if args.fail_fast && found_offense.load(Ordering::Relaxed) {
                return None;
            }
            let result = lint_file(path, &ctx);
            if args.fail_fast && result.as_ref().is_ok_and(|o| !o.diagnostics.is_empty()) {
                found_offense.store(true, Ordering::Relaxed);
            }
            Some((path, result))
        })
        .collect();

    let mut diagnostics = Vec::new();
    let mut failures = Vec::new();
    let mut corrected_count = 0;
    let mut style_tallies = vec![StyleTally::default(); registry.cops().len()];
    for (path, outcome) in outcomes {
        match outcome {
            Ok(o) => {
                diagnostics.extend(o.diagnostics);
                corrected_count += o.corrected_count;
                merge_tallies(&mut style_tallies, o.tallies);
            }
            Err(error) => failures.push(FileFailure {
                path: path.clone(),
                error,
            }),
        }
    }
    diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    failures.sort_by(|a, b| a.path.cmp(&b.path));

    if args.debug {
        eprintln!(
            "debug: linted {} files in {:.0?} ({} failed)",
            files.len(),
            wall_start.elapsed(),
            failures.len()
        );
    }

    Ok(LintResult {
        diagnostics,
        file_count: files.len(),
        corrected_count,
        failures,
        style_tallies,
        corrected_source: None,
    })
}

fn merge_tallies(into: &mut [StyleTally], tallies: Vec<(usize, StyleTally)>) {
    for (index, tally) in tallies {
        into[index].merge(tally);
    }
}

fn lint_file(path: &Path, ctx: &LintContext<'_>) -> Result<FileOutcome> {
    let source = SourceFile::from_path(path)?;
    let outcome = lint_source_inner(&source, ctx)?;

    if let Some(bytes) = &outcome.corrected_bytes {
        std::fs::write(path, bytes)
            .with_context(|| format!("failed to write corrected file {}", path.display()))?;
        if ctx.debug {
            eprintln!(
                "debug: {}: {} offenses corrected",
                path.display(),
                outcome.corrected_count
            );
        }
    }
    Ok(outcome)
}

/// Validate that corrected bytes are still valid Ruby by re-parsing with Prism.
/// Returns `None` (discarding corrections) if parse errors are found.
fn validate_corrected_bytes(
    original_bytes: &[u8],
    current_bytes: Vec<u8>,
    path: &Path,
) -> Option<Vec<u8>> {
    if current_bytes == original_bytes {
        return None;
    }
    if crate::parse::has_syntax_errors(&current_bytes) {
        eprintln!(
            "warning: autocorrect produced invalid syntax for {}, skipping corrections",
            path.display()
        );
        return None;
    }
    Some(current_bytes)
}

/// Lint `source`, iterating autocorrect passes until no cop has anything
/// left to change.
fn lint_source_inner(source: &SourceFile, ctx: &LintContext<'_>) -> Result<FileOutcome> {
    if ctx.mode == AutocorrectMode::Off {
        let (diagnostics, _, tallies) = lint_source_once(source, ctx, AutocorrectMode::Off);
        return Ok(FileOutcome {
            diagnostics,
            corrected_bytes: None,
            corrected_count: 0,
            tallies,
        });
    }

    let original_bytes = source.as_bytes();
    let mut current_bytes = original_bytes.to_vec();
    let path = source.path.clone();
    let mut corrected_diags: Vec<Diagnostic> = Vec::new();
    let mut first_tallies: Option<Vec<(usize, StyleTally)>> = None;

    for _iteration in 0..MAX_ITERATIONS {
        let iter_source = SourceFile::from_vec(path.clone(), current_bytes.clone());
        let (diags, corrections, tallies) = lint_source_once(&iter_source, ctx, ctx.mode);
        if first_tallies.is_none() {
            first_tallies = Some(tallies);
        }

        if corrections.is_empty() {
            if ctx.debug {
                for d in diags.iter().filter(|d| !d.correctable) {
                    eprintln!("debug: {d}: no safe autocorrection");
                }
            }
            let changed = current_bytes != original_bytes;
            let corrected_bytes = validate_corrected_bytes(original_bytes, current_bytes, &path);
            let all_diags = if changed && corrected_bytes.is_none() {
                // Rejected output: report the original offenses, uncorrected.
                lint_source_once(source, ctx, AutocorrectMode::Off).0
            } else {
                // Earlier passes contribute what they corrected, this pass
                // what is left.
                let mut all = corrected_diags;
                all.extend(diags);
                all
            };
            let corrected_count = all_diags.iter().filter(|d| d.corrected).count();
            return Ok(FileOutcome {
                diagnostics: all_diags,
                corrected_bytes,
                corrected_count,
                tallies: first_tallies.unwrap_or_default(),
            });
        }

        corrected_diags.extend(diags.into_iter().filter(|d| d.corrected));

        let correction_set = CorrectionSet::from_vec(corrections);
        if ctx.debug && correction_set.dropped() > 0 {
            eprintln!(
                "debug: {}: {} overlapping corrections deferred",
                path.display(),
                correction_set.dropped()
            );
        }
        let new_bytes = correction_set.apply(&current_bytes);

        if new_bytes == current_bytes {
            anyhow::bail!(
                "autocorrect made no progress on {} although corrections were produced",
                path.display()
            );
        }

        current_bytes = new_bytes;
    }

    anyhow::bail!(
        "autocorrect did not converge on {} after {MAX_ITERATIONS} passes",
        path.display()
    )
}

/// Run all enabled cops once on a source file.
fn lint_source_once(
    source: &SourceFile,
    ctx: &LintContext<'_>,
    mode: AutocorrectMode,
) -> (Vec<Diagnostic>, Vec<Correction>, Vec<(usize, StyleTally)>) {
    // Parse on this thread (ParseResult is !Send)
    let parse_result = crate::parse::parse_source(source.as_bytes());

    // Error-recovered trees yield unreliable ranges; leave such files alone.
    if parse_result.errors().count() > 0 {
        if ctx.debug {
            eprintln!("debug: {}: syntax errors, skipping cops", source.path_str());
        }
        return (Vec::new(), Vec::new(), Vec::new());
    }

    let cops: Vec<WalkerCop<'_>> = ctx
        .registry
        .cops()
        .iter()
        .enumerate()
        .filter(|&(i, _)| ctx.filters.is_cop_match(i, &source.path))
        .map(|(i, cop)| {
            let config = &ctx.cop_configs[i];
            WalkerCop {
                cop: &**cop,
                config,
                index: i,
                correct: cop.supports_autocorrect() && config.should_autocorrect(mode),
            }
        })
        .collect();
    if cops.is_empty() {
        return (Vec::new(), Vec::new(), Vec::new());
    }

    let mut walker = CopWalker::new(cops, source, &parse_result);
    if ctx.detect_styles {
        walker = walker.with_style_detection();
    }
    walker.visit(&parse_result.node());
    walker.into_results()
}
