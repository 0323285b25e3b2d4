//! End-to-end tests for the defparens pipeline.
//!
//! These write real files into a temp directory, load configuration the way
//! the binary does, and drive `run_linter` / `run` directly.

use std::fs;
use std::path::{Path, PathBuf};

use defparens::cli::Args;
use defparens::config::load_config;
use defparens::cop::registry::CopRegistry;
use defparens::fs::discover_files;
use defparens::linter::run_linter;

const COP: &str = "Style/MethodDefParentheses";

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn default_args() -> Args {
    Args {
        format: "text".to_string(),
        fail_level: "convention".to_string(),
        ..Args::default()
    }
}

fn style_config(dir: &Path, style: &str) -> PathBuf {
    write_file(
        dir,
        ".rubocop.yml",
        &format!("{COP}:\n  EnforcedStyle: {style}\n"),
    )
}

// ---------- Detection ----------

#[test]
fn default_style_reports_missing_parentheses() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(
        dir.path(),
        "widget.rb",
        "class Widget\n  def resize width, height\n  end\n\n  def self.build(name)\n  end\nend\n",
    );
    let config = load_config(None, Some(dir.path())).unwrap();
    let registry = CopRegistry::default_registry();

    let result = run_linter(&[file], &config, &registry, &default_args()).unwrap();

    assert_eq!(result.file_count, 1);
    assert_eq!(result.diagnostics.len(), 1);
    let d = &result.diagnostics[0];
    assert_eq!(d.cop_name, COP);
    assert_eq!(
        d.message,
        "Use `def resize` with parentheses (EnforcedStyle: require_parentheses)."
    );
    assert!(d.correctable);
    assert_eq!((d.location.line, d.location.column), (2, 13));
}

#[test]
fn singleton_offense_points_at_qualified_name() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(dir.path(), "a.rb", "class A\n  def self.build name\n  end\nend\n");
    let config = load_config(None, Some(dir.path())).unwrap();
    let registry = CopRegistry::default_registry();

    let result = run_linter(&[file], &config, &registry, &default_args()).unwrap();

    assert_eq!(result.diagnostics.len(), 1);
    let d = &result.diagnostics[0];
    assert_eq!((d.location.line, d.location.column), (2, 6));
    assert_eq!(
        d.message,
        "Use `def self.build` with parentheses (EnforcedStyle: require_parentheses)."
    );
}

#[test]
fn no_parentheses_style_reports_empty_parens() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = style_config(dir.path(), "require_no_parentheses");
    let file = write_file(dir.path(), "a.rb", "def func()\nend\n\ndef other a\nend\n");
    let config = load_config(Some(&config_path), None).unwrap();
    let registry = CopRegistry::default_registry();

    let result = run_linter(&[file], &config, &registry, &default_args()).unwrap();

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(
        result.diagnostics[0].message,
        "Use `def func` without parentheses (EnforcedStyle: require_no_parentheses)."
    );
    assert_eq!(result.diagnostics[0].location.column, 8);
}

#[test]
fn multiline_style_keeps_multiline_parentheses() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = style_config(dir.path(), "require_no_parentheses_except_multiline");
    let file = write_file(
        dir.path(),
        "a.rb",
        "def long(first,\n         second)\nend\n\ndef short(a)\nend\n",
    );
    let config = load_config(Some(&config_path), None).unwrap();
    let registry = CopRegistry::default_registry();

    let result = run_linter(&[file], &config, &registry, &default_args()).unwrap();

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].location.line, 5);
}

#[test]
fn forced_parentheses_are_never_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = style_config(dir.path(), "require_no_parentheses");
    let file = write_file(
        dir.path(),
        "a.rb",
        "def double(x) = x * 2\n\ndef forward(...)\n  target(...)\nend\n",
    );
    let config = load_config(Some(&config_path), None).unwrap();
    let registry = CopRegistry::default_registry();

    let result = run_linter(&[file], &config, &registry, &default_args()).unwrap();
    assert!(result.diagnostics.is_empty());
}

// ---------- Configuration ----------

#[test]
fn unknown_style_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = style_config(dir.path(), "require_braces");
    let config = load_config(Some(&config_path), None).unwrap();
    let registry = CopRegistry::default_registry();

    let err = config.validate(&registry).unwrap_err();
    let text = format!("{err:#}");
    assert!(text.contains(COP));
    assert!(text.contains("require_braces"));
}

#[test]
fn run_exits_2_on_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = style_config(dir.path(), "require_braces");
    write_file(dir.path(), "a.rb", "def a x\nend\n");

    let args = Args {
        paths: vec![dir.path().to_path_buf()],
        config: Some(config_path),
        format: "quiet".to_string(),
        ..default_args()
    };
    assert_eq!(defparens::run(args).unwrap(), 2);
}

#[test]
fn excluded_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        ".rubocop.yml",
        &format!("AllCops:\n  Exclude:\n    - 'vendor/**'\n{COP}:\n  Exclude:\n    - 'spec/**'\n"),
    );
    write_file(dir.path(), "vendor/gem.rb", "def a x\nend\n");
    write_file(dir.path(), "spec/a_spec.rb", "def a x\nend\n");
    write_file(dir.path(), "lib/a.rb", "def a x\nend\n");

    let config = load_config(None, Some(dir.path())).unwrap();
    let registry = CopRegistry::default_registry();
    let files = discover_files(&[dir.path().to_path_buf()], &config).unwrap();
    assert_eq!(files.len(), 2);

    let result = run_linter(&files, &config, &registry, &default_args()).unwrap();
    assert_eq!(result.diagnostics.len(), 1);
    assert!(result.diagnostics[0].path.ends_with("lib/a.rb"));
}

#[test]
fn severity_override_and_fail_level() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.rb", "def a x\nend\n");

    let base = Args {
        paths: vec![dir.path().to_path_buf()],
        format: "quiet".to_string(),
        ..default_args()
    };
    let warning_gate = Args {
        fail_level: "warning".to_string(),
        ..base
    };
    assert_eq!(defparens::run(warning_gate).unwrap(), 0);

    write_file(dir.path(), ".rubocop.yml", &format!("{COP}:\n  Severity: error\n"));
    let args = Args {
        paths: vec![dir.path().to_path_buf()],
        format: "quiet".to_string(),
        fail_level: "warning".to_string(),
        ..default_args()
    };
    assert_eq!(defparens::run(args).unwrap(), 1);
}

// ---------- Autocorrect ----------

#[test]
fn autocorrect_rewrites_files() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(
        dir.path(),
        "a.rb",
        "def func a, b\nend\n\ndef self.test param; end\n\ndef test one,\ntwo\nend\n",
    );
    let config = load_config(None, Some(dir.path())).unwrap();
    let registry = CopRegistry::default_registry();
    let args = Args {
        autocorrect: true,
        ..default_args()
    };

    let result = run_linter(&[file.clone()], &config, &registry, &args).unwrap();

    assert_eq!(result.corrected_count, 3);
    assert!(result.diagnostics.iter().all(|d| d.corrected));
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "def func(a, b)\nend\n\ndef self.test(param); end\n\ndef test(one,\ntwo)\nend\n"
    );

    let rerun = run_linter(&[file], &config, &registry, &default_args()).unwrap();
    assert!(rerun.diagnostics.is_empty());
}

#[test]
fn autocorrect_removes_parentheses() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = style_config(dir.path(), "require_no_parentheses");
    let file = write_file(
        dir.path(),
        "a.rb",
        "def func()\nend\n\ndef test(param); end\n\ndef self.test(a, b); end\n",
    );
    let config = load_config(Some(&config_path), None).unwrap();
    let registry = CopRegistry::default_registry();
    let args = Args {
        autocorrect_all: true,
        ..default_args()
    };

    let result = run_linter(&[file.clone()], &config, &registry, &args).unwrap();

    assert_eq!(result.corrected_count, 3);
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "def func\nend\n\ndef test param; end\n\ndef self.test a, b; end\n"
    );
}

#[test]
fn hazardous_definitions_are_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = style_config(dir.path(), "require_no_parentheses");
    let original = "def func(\n  a, b\n)\nend\n";
    let file = write_file(dir.path(), "a.rb", original);
    let config = load_config(Some(&config_path), None).unwrap();
    let registry = CopRegistry::default_registry();
    let args = Args {
        autocorrect: true,
        ..default_args()
    };

    let result = run_linter(&[file.clone()], &config, &registry, &args).unwrap();

    assert_eq!(result.diagnostics.len(), 1);
    assert!(!result.diagnostics[0].corrected);
    assert!(!result.diagnostics[0].correctable);
    assert_eq!(result.corrected_count, 0);
    assert_eq!(fs::read_to_string(&file).unwrap(), original);
}

// ---------- Failures ----------

#[test]
fn unreadable_file_is_a_per_file_failure() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_file(dir.path(), "good.rb", "def a(x)\nend\n");
    let missing = dir.path().join("gone.rb");
    let config = load_config(None, Some(dir.path())).unwrap();
    let registry = CopRegistry::default_registry();

    let result = run_linter(&[good, missing.clone()], &config, &registry, &default_args()).unwrap();

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].path, missing);
    assert_eq!(defparens::exit_code(&result, defparens::diagnostic::Severity::Convention), 2);
}

// ---------- --auto-gen-config ----------

#[test]
fn auto_gen_config_writes_todo_that_silences_offenses() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), ".rubocop.yml", "AllCops:\n  Exclude:\n    - 'tmp/**'\n");
    write_file(dir.path(), "a.rb", "def func a, b\nend\n\ndef other c\nend\n");

    let args = Args {
        paths: vec![dir.path().to_path_buf()],
        format: "quiet".to_string(),
        auto_gen_config: true,
        ..default_args()
    };
    assert_eq!(defparens::run(args).unwrap(), 1);

    let todo = fs::read_to_string(dir.path().join(".rubocop_todo.yml")).unwrap();
    assert!(todo.contains("# Offense count: 2"));
    assert!(todo.contains("EnforcedStyle: require_no_parentheses"));
    let main = fs::read_to_string(dir.path().join(".rubocop.yml")).unwrap();
    assert!(main.starts_with("inherit_from: .rubocop_todo.yml"));

    let args = Args {
        paths: vec![dir.path().to_path_buf()],
        format: "quiet".to_string(),
        ..default_args()
    };
    assert_eq!(defparens::run(args).unwrap(), 0);
}

#[test]
fn auto_gen_config_disables_on_conflicting_styles() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), ".rubocop.yml", "");
    write_file(dir.path(), "a.rb", "def func(a, b)\nend\n");
    write_file(dir.path(), "b.rb", "def func a, b\nend\n");

    let args = Args {
        paths: vec![dir.path().to_path_buf()],
        format: "quiet".to_string(),
        auto_gen_config: true,
        ..default_args()
    };
    assert_eq!(defparens::run(args).unwrap(), 1);

    let todo = fs::read_to_string(dir.path().join(".rubocop_todo.yml")).unwrap();
    assert!(todo.contains("# Offense count: 1"));
    assert!(todo.contains("Enabled: false"));
}
