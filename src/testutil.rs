use ruby_prism::Visit;

use crate::cop::enforced_style::StyleTally;
use crate::cop::walker::{CopWalker, WalkerCop};
use crate::cop::{Cop, CopConfig};
use crate::correction::{Correction, CorrectionSet};
use crate::diagnostic::Diagnostic;
use crate::parse::source::SourceFile;

/// An offense a fixture expects, taken from a caret annotation.
#[derive(Debug, Clone)]
pub struct ExpectedOffense {
    pub line: usize,
    pub column: usize,
    pub cop_name: String,
    pub message: String,
}

/// Parse `   ^^^ Department/Cop: message`. The column is the offset of the
/// first caret. Carets must open the line and the cop name must contain a
/// `/`, so `a ^ b` or `/^x/` are left alone.
fn try_parse_annotation(line: &str) -> Option<(usize, String, String)> {
    let trimmed = line.trim_start();
    let rest = trimmed.trim_start_matches('^');
    if rest.len() == trimmed.len() {
        return None;
    }
    let (cop_name, message) = rest.strip_prefix(' ')?.trim_end().split_once(": ")?;
    if !cop_name.contains('/') || cop_name.contains(' ') {
        return None;
    }
    Some((
        line.len() - trimmed.len(),
        cop_name.to_string(),
        message.to_string(),
    ))
}

/// Split fixture content into clean source and expected offenses.
///
/// An annotation refers to the closest source line above it; line numbers
/// are 1-based and count only source lines.
///
/// # Panics
///
/// If an annotation precedes every source line.
pub fn parse_fixture(raw: &[u8]) -> (Vec<u8>, Vec<ExpectedOffense>) {
    let text = std::str::from_utf8(raw).expect("fixture must be valid UTF-8");

    let mut source_lines: Vec<&str> = Vec::new();
    let mut expected: Vec<ExpectedOffense> = Vec::new();

    for (raw_idx, element) in text.split('\n').enumerate() {
        match try_parse_annotation(element) {
            Some((column, cop_name, message)) => {
                assert!(
                    !source_lines.is_empty(),
                    "annotation on raw line {} has no source line above it: {element:?}",
                    raw_idx + 1,
                );
                expected.push(ExpectedOffense {
                    line: source_lines.len(),
                    column,
                    cop_name,
                    message,
                });
            }
            None => source_lines.push(element),
        }
    }

    (source_lines.join("\n").into_bytes(), expected)
}

/// Walk `source` with a single cop and return what it reported.
fn walk_cop(
    cop: &dyn Cop,
    source: &SourceFile,
    config: &CopConfig,
    correct: bool,
) -> (Vec<Diagnostic>, Vec<Correction>, StyleTally) {
    let parse_result = crate::parse::parse_source(source.as_bytes());
    assert_eq!(
        parse_result.errors().count(),
        0,
        "test source must parse: {:?}",
        String::from_utf8_lossy(source.as_bytes()),
    );
    let cops = vec![WalkerCop {
        cop,
        config,
        index: 0,
        correct,
    }];
    let mut walker = CopWalker::new(cops, source, &parse_result).with_style_detection();
    walker.visit(&parse_result.node());
    let (diagnostics, corrections, tallies) = walker.into_results();
    let tally = tallies.into_iter().next().map(|(_, t)| t).unwrap_or_default();
    (diagnostics, corrections, tally)
}

/// Run a cop on raw source bytes and return the diagnostics.
///
/// Use this for custom assertions where the standard `assert_cop_offenses`
/// helpers don't fit (e.g., checking severity or the corrected flag).
pub fn run_cop(cop: &dyn Cop, source_bytes: &[u8]) -> Vec<Diagnostic> {
    run_cop_with_config(cop, source_bytes, CopConfig::default())
}

/// Run a cop on raw source bytes with a specific config and return diagnostics.
pub fn run_cop_with_config(
    cop: &dyn Cop,
    source_bytes: &[u8],
    config: CopConfig,
) -> Vec<Diagnostic> {
    let source = SourceFile::from_bytes("test.rb", source_bytes.to_vec());
    walk_cop(cop, &source, &config, false).0
}

/// Run a cop with autocorrect enabled until its edits stop changing the
/// source. Returns the first pass's diagnostics and the final bytes.
pub fn run_cop_autocorrect_with_config(
    cop: &dyn Cop,
    source_bytes: &[u8],
    config: CopConfig,
) -> (Vec<Diagnostic>, Vec<u8>) {
    let mut current = source_bytes.to_vec();
    let mut first_pass: Option<Vec<Diagnostic>> = None;
    for _ in 0..10 {
        let source = SourceFile::from_bytes("test.rb", current.clone());
        let (diagnostics, corrections, _) = walk_cop(cop, &source, &config, true);
        if first_pass.is_none() {
            first_pass = Some(diagnostics);
        }
        if corrections.is_empty() {
            return (first_pass.unwrap_or_default(), current);
        }
        current = CorrectionSet::from_vec(corrections).apply(&current);
    }
    panic!(
        "autocorrect did not converge: {:?}",
        String::from_utf8_lossy(&current)
    );
}

/// Style tally a cop collects over `source_bytes`, as `--auto-gen-config` sees it.
pub fn style_tally_with_config(cop: &dyn Cop, source_bytes: &[u8], config: CopConfig) -> StyleTally {
    let source = SourceFile::from_bytes("test.rb", source_bytes.to_vec());
    walk_cop(cop, &source, &config, false).2
}

/// Run a cop on fixture bytes (with annotations) and assert offenses match.
pub fn assert_cop_offenses(cop: &dyn Cop, fixture_bytes: &[u8]) {
    assert_cop_offenses_with_config(cop, fixture_bytes, CopConfig::default());
}

/// Run a cop on fixture bytes with a specific config and assert offenses match.
///
/// Both expected and actual diagnostics are sorted by (line, column) before
/// comparison, so annotation order in the fixture doesn't need to match the
/// cop's emission order.
pub fn assert_cop_offenses_with_config(cop: &dyn Cop, fixture_bytes: &[u8], config: CopConfig) {
    let (clean_source, mut expected) = parse_fixture(fixture_bytes);
    let mut diagnostics = run_cop_with_config(cop, &clean_source, config);

    expected.sort_by_key(|e| (e.line, e.column));
    diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    assert_eq!(
        diagnostics.len(),
        expected.len(),
        "Expected {} offense(s) but got {}.\nExpected:\n{}\nActual:\n{}",
        expected.len(),
        diagnostics.len(),
        format_expected(&expected),
        format_diagnostics(&diagnostics),
    );

    for (i, (diag, exp)) in diagnostics.iter().zip(expected.iter()).enumerate() {
        assert_eq!(
            (diag.location.line, diag.location.column),
            (exp.line, exp.column),
            "Offense #{}: position mismatch\n  expected: {}:{} {}: {}\n  actual:   {d}",
            i + 1,
            exp.line,
            exp.column,
            exp.cop_name,
            exp.message,
            d = diag,
        );
        assert_eq!(
            diag.cop_name, exp.cop_name,
            "Offense #{}: cop name mismatch",
            i + 1,
        );
        assert_eq!(
            diag.message, exp.message,
            "Offense #{}: message mismatch for {}",
            i + 1,
            exp.cop_name,
        );
    }
}

/// Assert a cop produces no offenses on the given source bytes.
pub fn assert_cop_no_offenses(cop: &dyn Cop, source_bytes: &[u8]) {
    assert_cop_no_offenses_with_config(cop, source_bytes, CopConfig::default());
}

/// Assert a cop produces no offenses on the given source bytes with a specific config.
pub fn assert_cop_no_offenses_with_config(cop: &dyn Cop, source_bytes: &[u8], config: CopConfig) {
    let diagnostics = run_cop_with_config(cop, source_bytes, config);

    assert!(
        diagnostics.is_empty(),
        "Expected no offenses but got {}:\n{}",
        diagnostics.len(),
        format_diagnostics(&diagnostics),
    );
}

fn format_expected(expected: &[ExpectedOffense]) -> String {
    expected
        .iter()
        .map(|e| format!("  {}:{} {}: {}", e.line, e.column, e.cop_name, e.message))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format!("  {d}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotation_column_and_parts() {
        let (column, cop, message) =
            try_parse_annotation("        ^^^^ Style/MethodDefParentheses: Use `def a` without parentheses.")
                .unwrap();
        assert_eq!(column, 8);
        assert_eq!(cop, "Style/MethodDefParentheses");
        assert_eq!(message, "Use `def a` without parentheses.");
        assert_eq!(try_parse_annotation("^ A/B: m").unwrap().0, 0);
    }

    #[test]
    fn rejects_non_annotations() {
        for line in [
            "def foo a",
            "",
            "x ^ y",
            "/^foo/",
            "^^^ no slash here",
            "^^^Style/Foo: msg",
            "^^^ Style/Foo msg",
            "^^^ Style/Foo:msg",
        ] {
            assert!(try_parse_annotation(line).is_none(), "{line:?}");
        }
    }

    #[test]
    fn parse_fixture_strips_annotations() {
        let raw = b"def a x\n      ^ A/B: m1\n    ^^ C/D: m2\nend\n";
        let (clean, expected) = parse_fixture(raw);
        assert_eq!(clean, b"def a x\nend\n");
        assert_eq!(expected.len(), 2);
        assert_eq!((expected[0].line, expected[0].column), (1, 6));
        assert_eq!((expected[1].line, expected[1].column), (1, 4));
        assert_eq!(expected[1].cop_name, "C/D");
    }

    #[test]
    fn parse_fixture_keeps_blank_lines_and_missing_newline() {
        let (clean, expected) = parse_fixture(b"\n^ A/B: m\nx = 1");
        assert_eq!(clean, b"\nx = 1");
        assert_eq!(expected[0].line, 1);
    }

    #[test]
    #[should_panic(expected = "has no source line above it")]
    fn parse_fixture_annotation_first_panics() {
        parse_fixture(b"^^^ A/B: m\nx = 1\n");
    }

    // ---- run_cop helper tests ----

    use crate::cop::style::method_def_parentheses::MethodDefParentheses;

    #[test]
    fn run_cop_returns_diagnostics() {
        let diags = run_cop(&MethodDefParentheses, b"def foo a\nend\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].location.line, 1);
        assert_eq!(diags[0].location.column, 8);
        assert_eq!(diags[0].cop_name, "Style/MethodDefParentheses");
    }

    #[test]
    fn run_cop_with_config_applies_config() {
        let config = CopConfig::with_option("EnforcedStyle", "require_no_parentheses");
        let diags = run_cop_with_config(&MethodDefParentheses, b"def foo a\nend\ndef bar(b)\nend\n", config);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].location.line, 3);
    }

    #[test]
    fn run_cop_no_offenses_returns_empty() {
        assert!(run_cop(&MethodDefParentheses, b"def foo(a)\nend\n").is_empty());
    }

    #[test]
    fn autocorrect_helper_applies_edits() {
        let (diags, fixed) =
            run_cop_autocorrect_with_config(&MethodDefParentheses, b"def foo a\nend\n", CopConfig::default());
        assert_eq!(diags.len(), 1);
        assert_eq!(fixed, b"def foo(a)\nend\n");
    }

    // ---- assert helper tests ----

    #[test]
    fn assert_cop_offenses_works() {
        let fixture = b"def foo a, b\n        ^^^^ Style/MethodDefParentheses: Use `def foo` with parentheses (EnforcedStyle: require_parentheses).\nend\n";
        assert_cop_offenses(&MethodDefParentheses, fixture);
    }

    #[test]
    fn assert_cop_no_offenses_works() {
        assert_cop_no_offenses(&MethodDefParentheses, b"def foo(a, b)\nend\n");
    }
}
