use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vendor::{self, Vendor};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub vendors: VendorsConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    /// One of off, error, warn, info, debug, trace.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Extra log destination. Empty disables file logging.
    #[serde(default)]
    pub log_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: String::new(),
        }
    }
}

fn default_log_level() -> String {
    "warn".into()
}

/// Which vendors make up the detection table, and in what order.
#[derive(Debug, Deserialize, Serialize)]
pub struct VendorsConfig {
    #[serde(default = "default_true")]
    pub builtin: bool,
    /// JSON vendor tables appended after the built-in table.
    #[serde(default)]
    pub files: Vec<String>,
    /// Vendor constants removed from the final table.
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl Default for VendorsConfig {
    fn default() -> Self {
        Self {
            builtin: true,
            files: Vec::new(),
            disabled: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    vendors: VendorsOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    log_level: Option<String>,
    log_file: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct VendorsOverlay {
    #[serde(default)]
    replace: bool,
    builtin: Option<bool>,
    #[serde(default)]
    files: Vec<String>,
    #[serde(default)]
    disabled: Vec<String>,
    #[serde(default)]
    remove_files: Vec<String>,
    #[serde(default)]
    remove_disabled: Vec<String>,
}

// ── Merge logic ──

/// Merge a user list into a default list.
/// In replace mode: user list replaces default entirely.
/// In merge mode: remove items first, then extend with additions (deduped).
fn merge_list(base: &mut Vec<String>, add: Vec<String>, remove: &[String], replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(item));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// `$HOME/.config/ciinfo/config.toml`, if `HOME` is set.
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(Path::new(&home).join(".config/ciinfo/config.toml"))
    }

    /// Embedded defaults merged with the user overlay at [`Config::default_path`].
    ///
    /// A missing overlay is normal. An unreadable or malformed one is reported
    /// on stderr and skipped; logging is not configured yet at this point.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        let Some(path) = Self::default_path() else {
            return config;
        };
        if !path.exists() {
            return config;
        }
        match read_overlay(&path) {
            Ok(overlay) => config.apply_overlay(overlay),
            Err(e) => eprintln!("ciinfo: {e}"),
        }
        config
    }

    /// Embedded defaults merged with an explicitly chosen overlay file.
    pub fn load_file(path: &Path) -> Result<Self> {
        let mut config = Self::default_config();
        config.apply_overlay(read_overlay(path)?);
        Ok(config)
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let s = overlay.settings;
        if let Some(v) = s.log_level {
            self.settings.log_level = v;
        }
        if let Some(v) = s.log_file {
            self.settings.log_file = v;
        }

        let v = overlay.vendors;
        if let Some(b) = v.builtin {
            self.vendors.builtin = b;
        }
        merge_list(&mut self.vendors.files, v.files, &v.remove_files, v.replace);
        merge_list(
            &mut self.vendors.disabled,
            v.disabled,
            &v.remove_disabled,
            v.replace,
        );
    }

    /// Build the effective vendor table.
    ///
    /// Built-in vendors (when enabled) come first, then each file in order,
    /// then disabled constants are dropped. `~` in file paths is expanded.
    pub fn vendor_table(&self) -> Result<Vec<Vendor>> {
        let mut table: Vec<Vendor> = if self.vendors.builtin {
            vendor::builtin().to_vec()
        } else {
            Vec::new()
        };

        for file in &self.vendors.files {
            let path = shellexpand::tilde(file);
            table.extend(vendor::load_table(Path::new(path.as_ref()))?);
        }

        if !self.vendors.disabled.is_empty() {
            table.retain(|v| {
                let keep = !self.vendors.disabled.contains(&v.constant);
                if !keep {
                    log::debug!("vendor {} disabled by config", v.constant);
                }
                keep
            });
        }

        Ok(table)
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}

fn read_overlay(path: &Path) -> Result<ConfigOverlay> {
    let content = std::fs::read_to_string(path).map_err(|error| Error::Io {
        path: path.to_path_buf(),
        error,
    })?;
    toml::from_str(&content).map_err(|error| Error::Config {
        path: path.to_path_buf(),
        error,
    })
}
