//! Bookkeeping for cops with an `EnforcedStyle` option.
//!
//! Each inspected node reports the set of supported styles that would have
//! accepted it. Intersecting those sets over a whole run tells
//! `--auto-gen-config` which single style (if any) the existing code already
//! follows, or that the cop has to be disabled.

use std::fmt;

/// Bitset over indices into a cop's `supported_styles()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleSet(u32);

impl StyleSet {
    pub const EMPTY: StyleSet = StyleSet(0);

    /// Every style of a cop supporting `count` styles.
    pub fn all(count: usize) -> Self {
        debug_assert!(count <= 32);
        StyleSet(((1u64 << count) - 1) as u32)
    }

    pub fn of(indices: &[usize]) -> Self {
        indices
            .iter()
            .fold(StyleSet::EMPTY, |set, &i| set.with(i))
    }

    pub fn with(self, index: usize) -> Self {
        StyleSet(self.0 | (1 << index))
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0 & (1 << index) != 0
    }

    pub fn intersect(self, other: StyleSet) -> Self {
        StyleSet(self.0 & other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Member indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..32).filter(move |&i| self.contains(i))
    }
}

/// What one node says about the configured style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleSample {
    /// Styles that would accept the node.
    pub accepted: StyleSet,
    /// The node was reported under the configured style.
    pub offense: bool,
}

/// Running intersection of `StyleSample`s for one cop.
///
/// Tallies built on separate workers merge into the same result regardless
/// of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleTally {
    accepted: Option<StyleSet>,
    offenses: usize,
}

impl StyleTally {
    pub fn record(&mut self, sample: StyleSample) {
        self.accepted = Some(match self.accepted {
            Some(acc) => acc.intersect(sample.accepted),
            None => sample.accepted,
        });
        if sample.offense {
            self.offenses += 1;
        }
    }

    pub fn merge(&mut self, other: StyleTally) {
        self.accepted = match (self.accepted, other.accepted) {
            (Some(a), Some(b)) => Some(a.intersect(b)),
            (a, b) => a.or(b),
        };
        self.offenses += other.offenses;
    }

    pub fn offenses(&self) -> usize {
        self.offenses
    }

    /// Config change that would have allowed every recorded offense, or
    /// `None` when there was nothing to allow.
    ///
    /// Styles are tried in declaration order, skipping the configured one.
    pub fn config_to_allow_offenses(
        &self,
        supported: &[&'static str],
        configured: &str,
    ) -> Option<ConfigSuggestion> {
        if self.offenses == 0 {
            return None;
        }
        let accepted = self.accepted.unwrap_or(StyleSet::EMPTY);
        accepted
            .indices()
            .filter_map(|i| supported.get(i).copied())
            .find(|&style| style != configured)
            .map(ConfigSuggestion::EnforcedStyle)
            .or(Some(ConfigSuggestion::Disable))
    }
}

/// A config key/value that would make a cop accept the observed code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSuggestion {
    EnforcedStyle(&'static str),
    Disable,
}

impl ConfigSuggestion {
    pub fn key(&self) -> &'static str {
        match self {
            ConfigSuggestion::EnforcedStyle(_) => "EnforcedStyle",
            ConfigSuggestion::Disable => "Enabled",
        }
    }

    pub fn value(&self) -> serde_yml::Value {
        match self {
            ConfigSuggestion::EnforcedStyle(style) => serde_yml::Value::String(style.to_string()),
            ConfigSuggestion::Disable => serde_yml::Value::Bool(false),
        }
    }
}

impl fmt::Display for ConfigSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSuggestion::EnforcedStyle(style) => write!(f, "EnforcedStyle: {style}"),
            ConfigSuggestion::Disable => write!(f, "Enabled: false"),
        }
    }
}
