//! CLI argument definitions for the Newsdesk terminal assistant.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use newsdesk_core::NewsdeskConfig;
use std::path::PathBuf;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "NEWSDESK_CONFIG";

/// Environment variable holding the log level.
pub const LOG_ENV: &str = "NEWSDESK_LOG";

/// Newsdesk: a conversational news assistant for the terminal.
#[derive(Parser, Debug)]
#[command(name = "newsdesk", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Speak assistant replies from the start.
    #[arg(long = "voice")]
    pub voice: bool,

    /// Skip the pause before contacting a source.
    #[arg(long = "no-delay")]
    pub no_delay: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > NEWSDESK_CONFIG env var > ~/.newsdesk/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var(CONFIG_ENV) {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > NEWSDESK_LOG env var > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.resolve_log_level_from(config_level, |key| std::env::var(key).ok())
    }

    fn resolve_log_level_from<F>(&self, config_level: &str, lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ref level) = self.log_level {
            return level.clone();
        }
        match lookup(LOG_ENV) {
            Some(level) if !level.trim().is_empty() => level,
            _ => config_level.to_string(),
        }
    }

    /// Apply flag overrides to a loaded configuration.
    pub fn apply(&self, config: &mut NewsdeskConfig) {
        if self.voice {
            config.voice.enabled = true;
        }
        if self.no_delay {
            config.assistant.processing_delay_min_ms = 0;
            config.assistant.processing_delay_max_ms = 0;
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".newsdesk").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".newsdesk").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args =
            CliArgs::try_parse_from(["newsdesk", "-c", "/tmp/nd.toml", "--voice", "--no-delay"])
                .unwrap();
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/nd.toml"));
        assert!(args.voice);
        assert!(args.no_delay);
    }

    #[test]
    fn test_apply_overrides() {
        let args = CliArgs::try_parse_from(["newsdesk", "--voice", "--no-delay"]).unwrap();
        let mut config = NewsdeskConfig::default();
        args.apply(&mut config);
        assert!(config.voice.enabled);
        assert_eq!(config.assistant.processing_delay_min_ms, 0);
        assert_eq!(config.assistant.processing_delay_max_ms, 0);
    }

    #[test]
    fn test_apply_without_flags_keeps_config() {
        let args = CliArgs::try_parse_from(["newsdesk"]).unwrap();
        let mut config = NewsdeskConfig::default();
        args.apply(&mut config);
        assert!(!config.voice.enabled);
        assert_eq!(config.assistant.processing_delay_min_ms, 1000);
    }

    #[test]
    fn test_log_level_priority() {
        let flag = CliArgs::try_parse_from(["newsdesk", "-l", "debug"]).unwrap();
        assert_eq!(
            flag.resolve_log_level_from("info", |_| Some("warn".to_string())),
            "debug"
        );

        let none = CliArgs::try_parse_from(["newsdesk"]).unwrap();
        assert_eq!(
            none.resolve_log_level_from("info", |_| Some("warn".to_string())),
            "warn"
        );
        assert_eq!(none.resolve_log_level_from("info", |_| None), "info");
        assert_eq!(
            none.resolve_log_level_from("error", |_| Some("  ".to_string())),
            "error"
        );
    }
}
