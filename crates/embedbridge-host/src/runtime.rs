use std::sync::OnceLock;

use embedbridge_core::{
    Bridge, BridgeConfig, ConfigLoader, ConfigPaths, DynamicBinding, ViewRef, LOG_TARGET,
};
use embedbridge_logging::{init_console_logger, ConsoleLoggerConfig};

pub type HostBridge = Bridge<DynamicBinding, ViewRef>;

static BRIDGE: OnceLock<HostBridge> = OnceLock::new();

/// Process bridge, built on the first exported call.
pub fn bridge() -> &'static HostBridge {
    BRIDGE.get_or_init(|| {
        let (config, loaded) = match ConfigLoader::load(&ConfigPaths::default()) {
            Ok((config, report)) => (config, Ok(report)),
            Err(e) => (BridgeConfig::default(), Err(e)),
        };

        // Hosts embedding us may already run their own `log` backend; keep theirs.
        if !init_console_logger(&ConsoleLoggerConfig::from_env().with_level_str(&config.log_level)) {
            log::debug!(target: LOG_TARGET, "host logger already installed");
        }

        match loaded {
            Ok(report) => report.log(),
            Err(e) => log::error!(target: LOG_TARGET, "config: {e}; using defaults"),
        }

        let binding = DynamicBinding::from_config(&config);
        let eps = binding.entry_points();
        log::info!(
            target: LOG_TARGET,
            "host bridge: library={} prefix={} pump={}",
            binding.library().to_string_lossy(),
            eps.prefix,
            eps.pump_prefix.as_deref().unwrap_or("-")
        );

        Bridge::new(binding)
    })
}
