use std::collections::BTreeSet;

use serde::Serialize;

/// Result of a detection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Info {
    #[serde(rename = "isCI")]
    pub is_ci: bool,
    #[serde(rename = "isPR")]
    pub is_pr: bool,
    /// Constant of the last matching vendor, or "".
    pub id: String,
    /// Display name of the last matching vendor, or "".
    pub name: String,
    /// Constants of every vendor whose env rules matched.
    pub vendors: BTreeSet<String>,
}

impl Info {
    /// True when the vendor with this constant matched.
    pub fn is_vendor(&self, constant: &str) -> bool {
        self.vendors.contains(constant)
    }
}
