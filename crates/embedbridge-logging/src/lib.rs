//! Console logger for the embedding bridge.
//!
//! The bridge only emits through the `log` facade; hosts that want the lines call
//! [`init_console_logger`] once, typically on the first entry-point call. Output goes to
//! logcat on Android and to stderr elsewhere.

use std::str::FromStr;

use log::LevelFilter;

pub const ENV_LOG: &str = "EMBEDBRIDGE_LOG";
pub const ENV_LOG_COLORS: &str = "EMBEDBRIDGE_LOG_COLORS";
pub const ENV_LOG_MODULE: &str = "EMBEDBRIDGE_LOG_MODULE";
pub const ENV_LOG_TAG: &str = "EMBEDBRIDGE_LOG_TAG";

pub const DEFAULT_TAG: &str = "embedbridge";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLoggerConfig {
    pub level: LevelFilter,
    /// stderr only.
    pub colors: bool,
    /// stderr only.
    pub include_target: bool,
    /// logcat tag.
    pub tag: String,
}

impl ConsoleLoggerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let level = lookup(ENV_LOG)
            .and_then(|v| LevelFilter::from_str(v.trim()).ok())
            .unwrap_or(LevelFilter::Info);
        let colors = lookup(ENV_LOG_COLORS).map(|v| v != "0").unwrap_or(true);
        let include_target = lookup(ENV_LOG_MODULE).map(|v| v != "0").unwrap_or(true);
        let tag = lookup(ENV_LOG_TAG)
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_TAG.to_owned());

        Self {
            level,
            colors,
            include_target,
            tag,
        }
    }

    /// Replace the level with a textual filter (`"warn"`, `"debug"`, ...). Unparsable text
    /// keeps the current level.
    pub fn with_level_str(mut self, level: &str) -> Self {
        if let Ok(level) = LevelFilter::from_str(level.trim()) {
            self.level = level;
        }
        self
    }

    #[inline]
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }
}

impl Default for ConsoleLoggerConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(not(target_os = "android"))]
fn install(config: &ConsoleLoggerConfig) -> Result<(), log::SetLoggerError> {
    use env_logger::{Builder, WriteStyle};
    use std::io::Write;

    let mut builder = Builder::new();
    builder.filter_level(config.level);
    builder.write_style(if config.colors {
        WriteStyle::Auto
    } else {
        WriteStyle::Never
    });

    let include_target = config.include_target;
    builder.format(move |buf, record| {
        let style = buf.default_level_style(record.level());
        if include_target {
            writeln!(
                buf,
                "[{style}{:<5}{style:#}] {:<25} {}",
                record.level(),
                record.target(),
                record.args()
            )
        } else {
            writeln!(buf, "[{style}{:<5}{style:#}] {}", record.level(), record.args())
        }
    });
    builder.try_init()
}

#[cfg(target_os = "android")]
fn install(config: &ConsoleLoggerConfig) -> Result<(), log::SetLoggerError> {
    let logcat = android_logger::Config::default()
        .with_max_level(config.level)
        .with_tag(config.tag.as_str());
    log::set_boxed_logger(Box::new(android_logger::AndroidLogger::new(logcat)))?;
    log::set_max_level(config.level);
    Ok(())
}

/// Install the platform logger as the process-wide `log` backend.
///
/// Returns `false` when a logger is already installed (ours from an earlier call, or the
/// host's own); the existing one stays in place.
pub fn init_console_logger(config: &ConsoleLoggerConfig) -> bool {
    match install(config) {
        Ok(()) => {
            log::debug!(target: "embedbridge", "logger installed at {}", config.level);
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let cfg = ConsoleLoggerConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg.level, LevelFilter::Info);
        assert!(cfg.colors);
        assert!(cfg.include_target);
        assert_eq!(cfg.tag, DEFAULT_TAG);
    }

    #[test]
    fn variables_override_defaults() {
        let cfg = ConsoleLoggerConfig::from_lookup(lookup(&[
            (ENV_LOG, "debug"),
            (ENV_LOG_COLORS, "0"),
            (ENV_LOG_MODULE, "0"),
            (ENV_LOG_TAG, " rfvp_jni "),
        ]));
        assert_eq!(cfg.level, LevelFilter::Debug);
        assert!(!cfg.colors);
        assert!(!cfg.include_target);
        assert_eq!(cfg.tag, "rfvp_jni");
    }

    #[test]
    fn blank_tag_keeps_default_and_level_can_be_forced() {
        let cfg = ConsoleLoggerConfig::from_lookup(lookup(&[(ENV_LOG_TAG, "  ")]))
            .with_level(LevelFilter::Error);
        assert_eq!(cfg.tag, DEFAULT_TAG);
        assert_eq!(cfg.level, LevelFilter::Error);
    }

    #[test]
    fn unparsable_level_falls_back() {
        let cfg = ConsoleLoggerConfig::from_lookup(lookup(&[(ENV_LOG, "loud")]));
        assert_eq!(cfg.level, LevelFilter::Info);
        assert_eq!(cfg.clone().with_level_str("nonsense"), cfg);
        assert_eq!(cfg.with_level_str(" WARN ").level, LevelFilter::Warn);
    }

    #[test]
    fn second_install_is_not_an_error() {
        let cfg = ConsoleLoggerConfig::from_lookup(lookup(&[(ENV_LOG, "off")]));
        init_console_logger(&cfg);
        assert!(!init_console_logger(&cfg));
    }

    #[cfg(target_os = "android")]
    #[test]
    fn logcat_backend_uses_configured_level() {
        let cfg = ConsoleLoggerConfig::from_lookup(lookup(&[(ENV_LOG, "warn")]));
        if init_console_logger(&cfg) {
            assert_eq!(log::max_level(), LevelFilter::Warn);
        }
    }
}
