use super::classify::MethodDefNode;
use super::policy::{EnforcedStyle, evaluate};
use crate::cop::enforced_style::{ConfigSuggestion, StyleSample, StyleSet, StyleTally};

/// Every style under which `node` would not be reported.
pub fn accepted_styles(node: &MethodDefNode) -> StyleSet {
    EnforcedStyle::ALL
        .into_iter()
        .filter(|&style| evaluate(node, style).is_compliant())
        .fold(StyleSet::EMPTY, |set, style| set.with(style.index()))
}

pub fn sample(node: &MethodDefNode, configured: EnforcedStyle) -> StyleSample {
    let accepted = accepted_styles(node);
    StyleSample {
        accepted,
        offense: !accepted.contains(configured.index()),
    }
}

/// The `.rubocop_todo.yml` entry that would have allowed the offenses in
/// `tally`: another style when all inspected definitions agree on one,
/// otherwise `Enabled: false`.
pub fn config_to_allow_offenses(
    configured: EnforcedStyle,
    tally: &StyleTally,
) -> Option<ConfigSuggestion> {
    tally.config_to_allow_offenses(&EnforcedStyle::NAMES, configured.as_str())
}
