//! Match rules: predicates over an environment [`Snapshot`].
//!
//! Two rule families share a JSON shape but not their semantics.
//! [`EnvRule`] decides whether a vendor's signature variables are present;
//! [`PrRule`] decides whether a detected vendor is building a pull request.
//! The `any` field is the sharpest difference: for env rules it lists keys of
//! which one must be set, for PR rules (next to `env`) it lists accepted values.

/// Vendor-presence rules and conjunctive rule lists.
pub mod env;
/// Pull-request rules.
pub mod pr;
/// JSON grammar for both rule families.
pub mod repr;

pub use env::{EnvRule, EnvRules};
pub use pr::PrRule;

use std::collections::BTreeMap;

use crate::env::Snapshot;

/// A predicate evaluated against an environment snapshot.
///
/// Evaluation is total: missing data means "no match", never an error.
pub trait Matcher: Send + Sync {
    /// Return true when the snapshot satisfies this rule.
    fn matches(&self, snapshot: &Snapshot) -> bool;
}

/// True when `key` names a variable set to a non-empty value.
///
/// An empty key names nothing and never matches.
fn key_set(key: &str, snapshot: &Snapshot) -> bool {
    !key.is_empty() && snapshot.is_set(key)
}

/// True when at least one of `keys` has a non-empty value.
fn any_set(keys: &[String], snapshot: &Snapshot) -> bool {
    keys.iter().any(|k| snapshot.is_set(k))
}

/// True when every pair holds exactly; an absent key compares as "".
///
/// An empty map never matches.
fn all_equal(pairs: &BTreeMap<String, String>, snapshot: &Snapshot) -> bool {
    !pairs.is_empty() && pairs.iter().all(|(k, v)| snapshot.value(k) == v)
}
