use std::collections::BTreeMap;

use crate::env::Snapshot;
use crate::rules::{Matcher, all_equal, any_set, key_set};

/// A vendor-presence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvRule {
    /// The variable is set to a non-empty value.
    Present(String),
    /// The variable's value (or "" when absent) contains `substring`.
    /// An empty substring degrades to a presence check.
    Contains { key: String, substring: String },
    /// At least one of the listed variables is set.
    AnyPresent(Vec<String>),
    /// Every variable equals its expected value.
    AllEqual(BTreeMap<String, String>),
    /// Matches nothing. Produced by an empty rule object.
    Never,
}

impl EnvRule {
    pub fn present(key: impl Into<String>) -> Self {
        Self::Present(key.into())
    }

    pub fn contains(key: impl Into<String>, substring: impl Into<String>) -> Self {
        Self::Contains {
            key: key.into(),
            substring: substring.into(),
        }
    }

    pub fn any_present<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyPresent(keys.into_iter().map(Into::into).collect())
    }

    pub fn all_equal<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::AllEqual(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Matcher for EnvRule {
    fn matches(&self, snapshot: &Snapshot) -> bool {
        match self {
            EnvRule::Present(key) => key_set(key, snapshot),
            EnvRule::Contains { key, substring } if substring.is_empty() => key_set(key, snapshot),
            EnvRule::Contains { key, substring } => {
                !key.is_empty() && snapshot.value(key).contains(substring.as_str())
            }
            EnvRule::AnyPresent(keys) => any_set(keys, snapshot),
            EnvRule::AllEqual(pairs) => all_equal(pairs, snapshot),
            EnvRule::Never => false,
        }
    }
}

/// An ordered list of [`EnvRule`]s that must all match.
///
/// The empty list matches every snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvRules(pub Vec<EnvRule>);

impl EnvRules {
    pub fn new(rules: Vec<EnvRule>) -> Self {
        Self(rules)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EnvRule> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<EnvRule> for EnvRules {
    fn from(rule: EnvRule) -> Self {
        Self(vec![rule])
    }
}

impl From<Vec<EnvRule>> for EnvRules {
    fn from(rules: Vec<EnvRule>) -> Self {
        Self(rules)
    }
}

impl Matcher for EnvRules {
    fn matches(&self, snapshot: &Snapshot) -> bool {
        self.0.iter().all(|rule| rule.matches(snapshot))
    }
}
