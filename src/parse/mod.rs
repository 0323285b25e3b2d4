pub mod range;
pub mod source;

/// Parse Ruby source bytes using Prism.
///
/// `ParseResult` is `!Send + !Sync`, so parse on the thread that will walk
/// the tree.
pub fn parse_source(source: &[u8]) -> ruby_prism::ParseResult<'_> {
    ruby_prism::parse(source)
}

/// True when Prism reported any syntax error for `source`.
pub fn has_syntax_errors(source: &[u8]) -> bool {
    parse_source(source).errors().count() > 0
}
