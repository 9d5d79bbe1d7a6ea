use chrono::Local;
use colored::{ColoredString, Colorize};
use log::{debug, Level, LevelFilter};
use std::{str::FromStr, sync::Once};

const RUST_LOG_ENV: &str = "RUST_LOG";
const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

/// Transport crates chatter at `debug`, keep them at `warn` unless asked for `trace`.
const QUIET_TARGETS: &[&str] = &["jsonrpsee_core", "jsonrpsee_client_transport", "soketto"];

fn color_from_level(level: Level) -> ColoredString {
    match level {
        Level::Error => "ERROR".red(),
        Level::Warn => "WARN".yellow(),
        Level::Info => "INFO".green(),
        Level::Debug => "DEBUG".blue(),
        Level::Trace => "TRACE".white(),
    }
}

fn parse_log_level(raw: &str) -> Result<LevelFilter, String> {
    LevelFilter::from_str(raw.trim())
        .map_err(|_| format!("Invalid log level set with `{RUST_LOG_ENV}`, got: {raw}"))
}

fn dispatch(log_level: LevelFilter) -> fern::Dispatch {
    let dependency_level = if log_level == LevelFilter::Trace {
        LevelFilter::Trace
    } else {
        log_level.min(LevelFilter::Warn)
    };
    QUIET_TARGETS.iter().fold(
        fern::Dispatch::new()
            .format(|out, message, record| {
                let time = Local::now().format("%H:%M:%S%.3f");
                let color = color_from_level(record.level());
                out.finish(format_args!("{time} {color} [{}] > {message}", record.target()));
            })
            .level(log_level),
        |dispatch, target| dispatch.level_for(*target, dependency_level),
    )
}

pub(crate) fn init_logging_with_level(log_level: LevelFilter) {
    if let Err(e) = dispatch(log_level).chain(std::io::stderr()).apply() {
        eprintln!("Failed to initialize logging with level `{log_level}`: {e}");
        return;
    }
    debug!("Logging initialized with level: {log_level}");
}

static INIT: Once = Once::new();

fn init_logging_inner() {
    let log_level = match std::env::var(RUST_LOG_ENV) {
        Ok(raw) => parse_log_level(&raw).unwrap_or_else(|e| {
            eprintln!("{e}, falling back to `{DEFAULT_LEVEL}`");
            DEFAULT_LEVEL
        }),
        Err(_) => DEFAULT_LEVEL,
    };
    init_logging_with_level(log_level);
}

/// Installs the logger once, at the level given by `RUST_LOG` (default `info`).
pub fn init_logging() {
    INIT.call_once(init_logging_inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_log_level() {
        let error = parse_log_level("foobar").unwrap_err();
        assert!(error.contains("RUST_LOG"));
        assert!(error.contains("foobar"));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        assert_eq!(parse_log_level("DEBUG").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_log_level(" warn ").unwrap(), LevelFilter::Warn);
    }

    #[test]
    fn test_color_from_level() {
        assert_eq!(
            color_from_level(Level::Error).to_string(),
            "ERROR".red().to_string()
        );
        assert_eq!(
            color_from_level(Level::Warn).to_string(),
            "WARN".yellow().to_string()
        );
        assert_eq!(
            color_from_level(Level::Info).to_string(),
            "INFO".green().to_string()
        );
        assert_eq!(
            color_from_level(Level::Debug).to_string(),
            "DEBUG".blue().to_string()
        );
        assert_eq!(
            color_from_level(Level::Trace).to_string(),
            "TRACE".white().to_string()
        );
    }
}
