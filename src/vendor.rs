//! Vendor records and the built-in vendor table.

use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rules::{EnvRules, PrRule};

/// Embedded built-in vendor table.
const BUILTIN_VENDORS: &str = include_str!("../vendors.json");

static BUILTIN: LazyLock<Vec<Vendor>> = LazyLock::new(|| {
    parse_table(BUILTIN_VENDORS, "built-in vendor table").expect("embedded vendor table must parse")
});

/// A CI vendor: identity plus the rules that recognise it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    /// Display name, e.g. "GitHub Actions".
    pub name: String,
    /// Stable identifier, e.g. "GITHUB_ACTIONS".
    pub constant: String,
    /// Signature rules; all must match for the vendor to be detected.
    pub env: EnvRules,
    /// Pull-request rule, if the vendor exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr: Option<PrRule>,
}

impl Vendor {
    pub fn new(name: impl Into<String>, constant: impl Into<String>, env: impl Into<EnvRules>) -> Self {
        Self {
            name: name.into(),
            constant: constant.into(),
            env: env.into(),
            pr: None,
        }
    }

    pub fn with_pr(mut self, pr: PrRule) -> Self {
        self.pr = Some(pr);
        self
    }
}

/// The built-in vendor table, parsed once on first use.
pub fn builtin() -> &'static [Vendor] {
    &BUILTIN
}

/// Parse a JSON array of vendor records.
///
/// `source_name` labels the input in error messages.
pub fn parse_table(text: &str, source_name: &str) -> Result<Vec<Vendor>> {
    serde_json::from_str(text).map_err(|error| Error::Parse {
        source_name: source_name.to_string(),
        error,
    })
}

/// Read and parse a vendor table file.
pub fn load_table(path: &Path) -> Result<Vec<Vendor>> {
    let text = std::fs::read_to_string(path).map_err(|error| Error::Io {
        path: path.to_path_buf(),
        error,
    })?;
    let vendors = parse_table(&text, &path.display().to_string())?;
    log::debug!("loaded {} vendors from {}", vendors.len(), path.display());
    Ok(vendors)
}
