use std::fs::OpenOptions;
use std::str::FromStr;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::eval::Info;

/// Resolve the effective level: the configured one, raised by `-v` flags.
///
/// An unknown level name falls back to `warn`.
pub fn level_for(settings: &Settings, verbosity: u8) -> LevelFilter {
    let configured = LevelFilter::from_str(&settings.log_level).unwrap_or(LevelFilter::Warn);
    let requested = match verbosity {
        0 => LevelFilter::Off,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    configured.max(requested)
}

/// Install the process logger: stderr, plus the configured log file if any.
///
/// The log file is best-effort. If it cannot be opened, logging continues on
/// stderr and a warning is emitted there.
pub fn init(settings: &Settings, verbosity: u8) -> Result<()> {
    let level = level_for(settings, verbosity);
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ));

    let mut file_error = None;
    if !settings.log_file.is_empty() {
        let path = shellexpand::tilde(&settings.log_file).into_owned();
        let path = std::path::Path::new(&path);
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => loggers.push(WriteLogger::new(level, config, file)),
            Err(e) => file_error = Some(format!("{}: {e}", path.display())),
        }
    }

    CombinedLogger::init(loggers).map_err(|e| Error::Logger(e.to_string()))?;

    if let Some(e) = file_error {
        log::warn!("log file disabled: {e}");
    }
    Ok(())
}

/// Record a detection result at info level, one line per result.
pub fn log_detection(info: &Info) {
    if !info.is_ci {
        log::info!("not running in CI");
        return;
    }
    let vendors: Vec<&str> = info.vendors.iter().map(String::as_str).collect();
    log::info!(
        "ci={} pr={} id={} name={} vendors=[{}]",
        info.is_ci,
        info.is_pr,
        if info.id.is_empty() { "-" } else { info.id.as_str() },
        if info.name.is_empty() { "-" } else { info.name.as_str() },
        vendors.join(","),
    );
}
