pub mod info;

pub use info::Info;

use crate::env::Snapshot;
use crate::rules::Matcher;
use crate::vendor::Vendor;

/// Generic variables that signal CI when no vendor matched.
pub const FALLBACK_KEYS: &[&str] = &[
    "BUILD_ID",
    "BUILD_NUMBER",
    "CI",
    "CI_APP_ID",
    "CI_BUILD_ID",
    "CI_BUILD_NUMBER",
    "CI_NAME",
    "CONTINUOUS_INTEGRATION",
    "RUN_ID",
];

/// `CI=false` or `CI=0` disables detection entirely.
fn ci_opted_out(snapshot: &Snapshot) -> bool {
    matches!(snapshot.value("CI"), "false" | "0")
}

fn has_fallback_key(snapshot: &Snapshot) -> bool {
    FALLBACK_KEYS.iter().any(|k| snapshot.is_set(k))
}

/// Evaluate a vendor table against a snapshot.
///
/// Every vendor whose env rules match is recorded. Identity and PR status are
/// overwritten by each match, so the last matching vendor in table order wins.
/// A matching vendor without a PR rule leaves `is_pr` as it was.
pub fn detect(snapshot: &Snapshot, vendors: &[Vendor]) -> Info {
    if ci_opted_out(snapshot) {
        log::debug!("CI explicitly disabled");
        return Info::default();
    }

    let mut info = Info::default();

    for vendor in vendors {
        if !vendor.env.matches(snapshot) {
            continue;
        }

        log::debug!("matched vendor {} ({})", vendor.name, vendor.constant);
        info.vendors.insert(vendor.constant.clone());
        info.is_ci = true;
        info.name.clone_from(&vendor.name);
        info.id.clone_from(&vendor.constant);

        if let Some(pr) = &vendor.pr {
            info.is_pr = pr.matches(snapshot);
            log::debug!("{} pull request: {}", vendor.constant, info.is_pr);
        }
    }

    if !info.is_ci {
        info.is_ci = has_fallback_key(snapshot);
        if info.is_ci {
            log::debug!("no vendor matched; generic CI variable present");
        }
    }

    info
}
