use std::sync::OnceLock;

use embedbridge_core::{Bridge, BridgeConfig, ConfigLoader, ConfigPaths, DynamicBinding, LOG_TARGET};
use embedbridge_logging::{init_console_logger, ConsoleLoggerConfig};

use crate::window::AndroidWindow;

pub type AndroidBridge = Bridge<DynamicBinding, AndroidWindow>;

static BRIDGE: OnceLock<AndroidBridge> = OnceLock::new();

/// Process bridge, built on the first JNI call. The engine library itself is opened lazily by
/// the first operation that needs it.
pub fn bridge() -> &'static AndroidBridge {
    BRIDGE.get_or_init(|| {
        let (config, loaded) = match ConfigLoader::load(&ConfigPaths::default()) {
            Ok((config, report)) => (config, Ok(report)),
            Err(e) => (BridgeConfig::default(), Err(e)),
        };

        init_console_logger(&ConsoleLoggerConfig::from_env().with_level_str(&config.log_level));

        match loaded {
            Ok(report) => report.log(),
            Err(e) => log::error!(target: LOG_TARGET, "config: {e}; using defaults"),
        }
        let binding = DynamicBinding::from_config(&config);
        log::info!(
            target: LOG_TARGET,
            "android bridge: library={} prefix={}",
            binding.library().to_string_lossy(),
            binding.entry_points().prefix
        );

        Bridge::new(binding)
    })
}
