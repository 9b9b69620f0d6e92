// ABOUTME: Logging configuration and structured logging setup for the workout recorder
// ABOUTME: Env-driven level, format and per-fix trace filtering on a stderr subscriber
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging configuration

use anyhow::Result;
use std::env;
use std::io;
use tracing::info;
use tracing_subscriber::{
    filter::{Directive, LevelFilter},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};
use workout_core::constants::{env_config, service_names};

/// Targets that emit one event per location fix or watchdog poll
const PER_FIX_TARGETS: [&str; 2] = [
    "workout_recorder::recording::recorder",
    "workout_recorder::recording::watchdog",
];

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level or `RUST_LOG`-style directive list
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread ids and names
    pub include_thread: bool,
    /// Keep per-fix and per-poll trace events; otherwise those targets are
    /// capped at debug
    pub trace_fixes: bool,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One `JSON` object per event
    Json,
    /// Multi-field human-readable lines
    Pretty,
    /// Single-line output without targets
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
            trace_fixes: false,
        }
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name).is_ok_and(|value| {
        let value = value.trim().to_ascii_lowercase();
        matches!(value.as_str(), "1" | "true" | "yes")
    })
}

impl LoggingConfig {
    /// Create logging configuration from `RUST_LOG` and the `WORKOUT_LOG_*`
    /// variables
    #[must_use]
    pub fn from_env() -> Self {
        let format = match env::var(env_config::LOG_FORMAT).as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };

        Self {
            level: env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
            format,
            include_location: env_flag(env_config::LOG_LOCATION),
            include_thread: env_flag(env_config::LOG_THREADS),
            trace_fixes: env_flag(env_config::LOG_FIXES),
        }
    }

    /// Extra directives layered over the base level.
    ///
    /// Empty when `level` is a directive list rather than a single level.
    #[must_use]
    pub fn directives(&self) -> Vec<Directive> {
        let Ok(level) = self.level.trim().parse::<LevelFilter>() else {
            return Vec::new();
        };
        let mut directives = vec![format!("workout_recorder={level}")];
        if !self.trace_fixes && level > LevelFilter::DEBUG {
            for target in PER_FIX_TARGETS {
                directives.push(format!("{target}=debug"));
            }
        }
        directives
            .iter()
            .filter_map(|directive| directive.parse().ok())
            .collect()
    }

    fn env_filter(&self) -> EnvFilter {
        let base = EnvFilter::try_new(&self.level)
            .unwrap_or_else(|_| EnvFilter::new("info"));
        self.directives()
            .into_iter()
            .fold(base, EnvFilter::add_directive)
    }

    /// Initialize the global tracing subscriber
    ///
    /// Output goes to stderr so that tools can print results on stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());

        match self.format {
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_writer(io::stderr);

                registry.with(json_layer).try_init()?;
            }
            LogFormat::Pretty => {
                let pretty_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_writer(io::stderr);

                registry.with(pretty_layer).try_init()?;
            }
            LogFormat::Compact => {
                let compact_layer = fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_thread_ids(self.include_thread)
                    .with_writer(io::stderr);

                registry.with(compact_layer).try_init()?;
            }
        }

        info!(
            service = service_names::WORKOUT_RECORDER,
            version = env!("CARGO_PKG_VERSION"),
            log.level = %self.level,
            log.format = ?self.format,
            log.trace_fixes = self.trace_fixes,
            "Recorder logging ready"
        );

        Ok(())
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(config: &LoggingConfig) -> Vec<String> {
        config
            .directives()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(!config.trace_fixes);
    }

    #[test]
    fn test_trace_level_caps_per_fix_targets() {
        let config = LoggingConfig {
            level: "trace".into(),
            ..LoggingConfig::default()
        };
        let directives = rendered(&config);
        assert!(directives.contains(&"workout_recorder=trace".to_owned()));
        assert!(directives.contains(&"workout_recorder::recording::recorder=debug".to_owned()));
        assert!(directives.contains(&"workout_recorder::recording::watchdog=debug".to_owned()));
    }

    #[test]
    fn test_fix_tracing_and_quiet_levels_add_no_cap() {
        let tracing_fixes = LoggingConfig {
            level: "trace".into(),
            trace_fixes: true,
            ..LoggingConfig::default()
        };
        assert_eq!(rendered(&tracing_fixes), vec!["workout_recorder=trace"]);

        let quiet = LoggingConfig::default();
        assert_eq!(rendered(&quiet), vec!["workout_recorder=info"]);
    }

    #[test]
    fn test_directive_list_is_left_alone() {
        let config = LoggingConfig {
            level: "warn,workout_recorder::replay=debug".into(),
            ..LoggingConfig::default()
        };
        assert!(config.directives().is_empty());
    }
}
