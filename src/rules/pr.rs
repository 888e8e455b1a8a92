use std::collections::BTreeMap;

use crate::env::Snapshot;
use crate::rules::{Matcher, all_equal, any_set, key_set};

/// A pull-request rule, evaluated only for a vendor already detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrRule {
    /// The variable is set to a non-empty value.
    Present(String),
    /// The variable's value is exactly one of `values`.
    ValueIn { key: String, values: Vec<String> },
    /// The variable exists (possibly empty) and differs from `value`.
    NotEqual { key: String, value: String },
    /// At least one of the listed variables is set.
    AnyPresent(Vec<String>),
    /// Every variable equals its expected value.
    AllEqual(BTreeMap<String, String>),
    /// Matches nothing.
    Never,
}

impl PrRule {
    pub fn present(key: impl Into<String>) -> Self {
        Self::Present(key.into())
    }

    pub fn value_in<I, S>(key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ValueIn {
            key: key.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn not_equal(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::NotEqual {
            key: key.into(),
            value: value.into(),
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

impl Matcher for PrRule {
    fn matches(&self, snapshot: &Snapshot) -> bool {
        match self {
            PrRule::Present(key) => key_set(key, snapshot),
            PrRule::ValueIn { key, .. } | PrRule::NotEqual { key, .. } if key.is_empty() => false,
            PrRule::ValueIn { key, values } => {
                let actual = snapshot.value(key);
                values.iter().any(|v| v == actual)
            }
            PrRule::NotEqual { key, value } => snapshot.get(key).is_some_and(|v| v != value),
            PrRule::AnyPresent(keys) => any_set(keys, snapshot),
            PrRule::AllEqual(pairs) => all_equal(pairs, snapshot),
            PrRule::Never => false,
        }
    }
}
