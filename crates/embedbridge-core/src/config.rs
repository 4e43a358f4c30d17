use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::{EntryPoints, Slot};
use crate::error::{BridgeError, BridgeResult};
use crate::LOG_TARGET;

pub const ENV_LIBRARY: &str = "EMBEDBRIDGE_LIBRARY";
pub const ENV_ENTRY_PREFIX: &str = "EMBEDBRIDGE_ENTRY_PREFIX";
pub const ENV_PUMP_PREFIX: &str = "EMBEDBRIDGE_PUMP_PREFIX";
pub const ENV_LOG: &str = "EMBEDBRIDGE_LOG";

/// Normalized bridge configuration. Every field has a concrete per-platform default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// File name or path of the engine binary.
    pub library: String,
    /// Prefix of the surface-hosted entry points (`<prefix>_create`, ...).
    pub entry_prefix: String,
    /// Prefix of the pump-mode entry points; `None` disables pump resolution.
    pub pump_prefix: Option<String>,
    pub log_level: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            library: default_library(),
            entry_prefix: default_entry_prefix().to_owned(),
            pump_prefix: default_pump_prefix().map(str::to_owned),
            log_level: "info".to_owned(),
        }
    }
}

impl BridgeConfig {
    pub fn entry_points(&self) -> EntryPoints {
        let eps = EntryPoints::with_prefix(self.entry_prefix.clone())
            .with_optional(view_only_slots().iter().copied());
        match &self.pump_prefix {
            Some(p) => eps.with_pump_prefix(p.clone()),
            None => eps,
        }
    }
}

/// `librfvp.so`, `librfvp.dylib` or `rfvp.dll`.
fn default_library() -> String {
    libloading::library_filename("rfvp")
        .to_string_lossy()
        .into_owned()
}

fn default_entry_prefix() -> &'static str {
    if cfg!(target_os = "android") {
        "rfvp_android"
    } else if cfg!(target_os = "ios") {
        "rfvp_ios"
    } else {
        "rfvp_host"
    }
}

/// The view-hosted iOS engine draws into its view for its whole life and takes no touch input
/// through the bridge.
fn view_only_slots() -> &'static [Slot] {
    if cfg!(target_os = "ios") {
        &[Slot::SetSurface, Slot::Touch]
    } else {
        &[]
    }
}

fn default_pump_prefix() -> Option<&'static str> {
    if cfg!(any(target_os = "macos", target_os = "windows", target_os = "linux")) {
        Some("rfvp_pump")
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Layered loading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub file: Option<PathBuf>,
    pub root_dir: Option<PathBuf>,
}

impl Default for ConfigPaths {
    #[inline]
    fn default() -> Self {
        Self {
            file: Some(PathBuf::from("embedbridge.json")),
            root_dir: None,
        }
    }
}

impl ConfigPaths {
    /// No file layer at all.
    #[inline]
    pub fn none() -> Self {
        Self {
            file: None,
            root_dir: None,
        }
    }

    #[inline]
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    #[inline]
    pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(root_dir.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideSource {
    File,
    Env,
    Programmatic,
}

#[derive(Debug, Clone)]
pub struct ConfigOverride {
    pub key: &'static str,
    pub source: OverrideSource,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolvedFrom {
    Absolute,
    Cwd,
    ExeDir,
    RootDir,
    #[default]
    NotProvided,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigLoadReport {
    /// The file actually read, when one was found.
    pub file: Option<PathBuf>,
    pub resolved_from: ResolvedFrom,
    pub overrides: Vec<ConfigOverride>,
}

impl ConfigLoadReport {
    #[inline]
    pub fn is_defaults(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Emit the effective layering: one info line for the file, one debug line per override.
    pub fn log(&self) {
        match &self.file {
            Some(path) => log::info!(
                target: LOG_TARGET,
                "config: loaded {} (resolved from {:?})",
                path.display(),
                self.resolved_from
            ),
            None => log::debug!(target: LOG_TARGET, "config: no file, using defaults"),
        }
        for o in &self.overrides {
            log::debug!(
                target: LOG_TARGET,
                "config: {} {:?}: '{}' -> '{}'",
                o.key,
                o.source,
                o.from,
                o.to
            );
        }
    }
}

/// Override layer. For `pump_prefix`, an empty string disables pump mode.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub library: Option<String>,
    pub entry_prefix: Option<String>,
    pub pump_prefix: Option<String>,
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            library: lookup(ENV_LIBRARY),
            entry_prefix: lookup(ENV_ENTRY_PREFIX),
            pump_prefix: lookup(ENV_PUMP_PREFIX),
            log_level: lookup(ENV_LOG),
        }
    }
}

#[derive(Deserialize)]
struct FileJson {
    library: Option<String>,
    entry_prefix: Option<String>,
    pump_prefix: Option<String>,
    logging: Option<LoggingJson>,
}

#[derive(Deserialize)]
struct LoggingJson {
    level: Option<String>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// defaults -> file -> env.
    pub fn load(paths: &ConfigPaths) -> BridgeResult<(BridgeConfig, ConfigLoadReport)> {
        Self::load_layers(paths, &ConfigOverrides::from_env(), &ConfigOverrides::empty())
    }

    pub fn load_layers(
        paths: &ConfigPaths,
        env: &ConfigOverrides,
        programmatic: &ConfigOverrides,
    ) -> BridgeResult<(BridgeConfig, ConfigLoadReport)> {
        let mut cfg = BridgeConfig::default();
        let mut report = ConfigLoadReport::default();

        if let Some(raw) = paths.file.as_deref() {
            // Missing file is not an error.
            if let Some((resolved, from)) = resolve_file(paths, raw) {
                let data = fs::read_to_string(&resolved).map_err(|e| BridgeError::Config {
                    path: resolved.clone(),
                    message: format!("read failed: {e}"),
                })?;
                let parsed: FileJson =
                    serde_json::from_str(&data).map_err(|e| BridgeError::Config {
                        path: resolved.clone(),
                        message: format!("parse failed (json): {e}"),
                    })?;

                apply_file(&mut cfg, &mut report, parsed);
                report.file = Some(resolved);
                report.resolved_from = from;
            }
        }

        apply_overrides(&mut cfg, &mut report, OverrideSource::Env, env);
        apply_overrides(&mut cfg, &mut report, OverrideSource::Programmatic, programmatic);

        Ok((cfg, report))
    }
}

fn apply_file(cfg: &mut BridgeConfig, report: &mut ConfigLoadReport, src: FileJson) {
    let source = OverrideSource::File;
    if let Some(v) = src.library {
        apply_string(report, source, "library", &mut cfg.library, v);
    }
    if let Some(v) = src.entry_prefix {
        apply_string(report, source, "entry_prefix", &mut cfg.entry_prefix, v);
    }
    if let Some(v) = src.pump_prefix {
        apply_pump_prefix(report, source, &mut cfg.pump_prefix, v);
    }
    if let Some(level) = src.logging.and_then(|l| l.level) {
        apply_string(report, source, "log_level", &mut cfg.log_level, level);
    }
}

fn apply_overrides(
    cfg: &mut BridgeConfig,
    report: &mut ConfigLoadReport,
    source: OverrideSource,
    ov: &ConfigOverrides,
) {
    if let Some(v) = ov.library.clone() {
        apply_string(report, source, "library", &mut cfg.library, v);
    }
    if let Some(v) = ov.entry_prefix.clone() {
        apply_string(report, source, "entry_prefix", &mut cfg.entry_prefix, v);
    }
    if let Some(v) = ov.pump_prefix.clone() {
        apply_pump_prefix(report, source, &mut cfg.pump_prefix, v);
    }
    if let Some(v) = ov.log_level.clone() {
        apply_string(report, source, "log_level", &mut cfg.log_level, v);
    }
}

fn apply_string(
    report: &mut ConfigLoadReport,
    source: OverrideSource,
    key: &'static str,
    slot: &mut String,
    to: String,
) {
    if *slot == to {
        return;
    }
    let from = std::mem::replace(slot, to.clone());
    report.overrides.push(ConfigOverride {
        key,
        source,
        from,
        to,
    });
}

fn apply_pump_prefix(
    report: &mut ConfigLoadReport,
    source: OverrideSource,
    slot: &mut Option<String>,
    to: String,
) {
    let to = if to.trim().is_empty() { None } else { Some(to) };
    if *slot == to {
        return;
    }
    let fmt = |v: &Option<String>| v.clone().unwrap_or_else(|| "<disabled>".to_owned());
    report.overrides.push(ConfigOverride {
        key: "pump_prefix",
        source,
        from: fmt(slot),
        to: fmt(&to),
    });
    *slot = to;
}

fn resolve_file(paths: &ConfigPaths, raw: &Path) -> Option<(PathBuf, ResolvedFrom)> {
    if raw.is_absolute() {
        return raw
            .is_file()
            .then(|| (raw.to_path_buf(), ResolvedFrom::Absolute));
    }

    if let Ok(cwd) = std::env::current_dir() {
        let p = cwd.join(raw);
        if p.is_file() {
            return Some((p, ResolvedFrom::Cwd));
        }
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let p = dir.join(raw);
            if p.is_file() {
                return Some((p, ResolvedFrom::ExeDir));
            }
        }
    }

    if let Some(root) = paths.root_dir.as_deref() {
        let p = root.join(raw);
        if p.is_file() {
            return Some((p, ResolvedFrom::RootDir));
        }
    }

    None
}
