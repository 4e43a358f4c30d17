#![forbid(unsafe_op_in_unsafe_fn)]

use libloading::Library;
use std::ffi::{OsStr, OsString};
use std::sync::OnceLock;

use crate::api::{EngineApi, EntryPoints, PumpApi, Slot};
use crate::binding::EngineBinding;
use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::LOG_TARGET;

struct Resolved {
    api: EngineApi,
    // Keeps the engine mapped for as long as `api` can be read.
    lib: Option<Library>,
}

/// Resolves the engine's exported entry points from a shared library at runtime.
///
/// The library is opened by name on the first `ensure_resolved`. A missing library leaves every
/// slot unbound; a later appearance of the file is not retried.
pub struct DynamicBinding {
    library: OsString,
    entry_points: EntryPoints,
    resolved: OnceLock<Resolved>,
}

impl DynamicBinding {
    #[inline]
    pub fn new(library: impl Into<OsString>, entry_points: EntryPoints) -> Self {
        Self {
            library: library.into(),
            entry_points,
            resolved: OnceLock::new(),
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(&config.library, config.entry_points())
    }

    #[inline]
    pub fn library(&self) -> &OsStr {
        &self.library
    }

    #[inline]
    pub fn entry_points(&self) -> &EntryPoints {
        &self.entry_points
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// `true` once resolution ran and the library was found.
    #[inline]
    pub fn is_library_loaded(&self) -> bool {
        self.resolved.get().is_some_and(|r| r.lib.is_some())
    }
}

impl EngineBinding for DynamicBinding {
    fn ensure_resolved(&self) -> &EngineApi {
        &self
            .resolved
            .get_or_init(|| resolve(&self.library, &self.entry_points))
            .api
    }
}

fn resolve(library: &OsStr, eps: &EntryPoints) -> Resolved {
    let lib = match open_library(library) {
        Ok(lib) => lib,
        Err(e) => {
            log::error!(target: LOG_TARGET, "resolve: {e}");
            return Resolved {
                api: EngineApi::unbound(),
                lib: None,
            };
        }
    };

    // SAFETY: the symbol types below are the engine's documented C ABI; the library handle is
    // stored next to the table and outlives every read of it.
    let api = unsafe {
        EngineApi {
            create: load_logged(&lib, eps, Slot::Create),
            step: load_logged(&lib, eps, Slot::Step),
            resize: load_logged(&lib, eps, Slot::Resize),
            set_surface: load_logged(&lib, eps, Slot::SetSurface),
            touch: load_logged(&lib, eps, Slot::Touch),
            destroy: load_logged(&lib, eps, Slot::Destroy),
            init_context: load_logged(&lib, eps, Slot::InitContext),
            pump: PumpApi {
                create: load_logged(&lib, eps, Slot::PumpCreate),
                step: load_logged(&lib, eps, Slot::PumpStep),
                destroy: load_logged(&lib, eps, Slot::PumpDestroy),
            },
        }
    };

    let missing = api.missing_required(eps);
    if missing.is_empty() {
        log::info!(
            target: LOG_TARGET,
            "{}_* symbols resolved from '{}'",
            eps.prefix,
            library.to_string_lossy()
        );
    } else {
        log::error!(
            target: LOG_TARGET,
            "missing {} {}_* symbol(s) {:?}; check that '{}' exports them",
            missing.len(),
            eps.prefix,
            missing.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            library.to_string_lossy()
        );
    }

    if !api.is_bound(Slot::InitContext) {
        log::warn!(
            target: LOG_TARGET,
            "{}_init_context is missing; native context handoff disabled",
            eps.prefix
        );
    }

    Resolved {
        api,
        lib: Some(lib),
    }
}

fn open_library(library: &OsStr) -> BridgeResult<Library> {
    // SAFETY: loading runs the engine library's initializers; it is the collaborator we were
    // configured to host.
    unsafe { Library::new(library) }.map_err(|e| BridgeError::LibraryNotFound {
        library: library.to_string_lossy().into_owned(),
        message: e.to_string(),
    })
}

/// # Safety
/// `T` must be the function pointer type the exported `symbol` actually has.
unsafe fn load_symbol<T: Copy>(lib: &Library, symbol: &str) -> BridgeResult<T> {
    let mut name = Vec::with_capacity(symbol.len() + 1);
    name.extend_from_slice(symbol.as_bytes());
    name.push(0);

    // SAFETY: forwarded to the caller.
    let sym = unsafe { lib.get::<T>(&name) }.map_err(|e| BridgeError::SymbolMissing {
        symbol: symbol.to_owned(),
        message: e.to_string(),
    })?;
    Ok(*sym)
}

/// Loads one slot, logging absence at the level its importance warrants.
///
/// # Safety
/// See [`load_symbol`].
unsafe fn load_logged<T: Copy>(lib: &Library, eps: &EntryPoints, slot: Slot) -> Option<T> {
    let symbol = eps.symbol(slot)?;

    // SAFETY: forwarded to the caller.
    match unsafe { load_symbol::<T>(lib, &symbol) } {
        Ok(f) => Some(f),
        Err(e) => {
            if eps.is_required(slot) {
                log::error!(target: LOG_TARGET, "dlsym failed: {e}");
            } else {
                log::warn!(target: LOG_TARGET, "dlsym failed: {e}");
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_library_leaves_every_slot_unbound_and_is_not_retried() {
        let binding = DynamicBinding::new(
            "libembedbridge_no_such_engine.so",
            EntryPoints::with_prefix("rfvp_android").with_pump_prefix("rfvp_pump"),
        );
        assert!(!binding.is_resolved());

        let first = binding.ensure_resolved() as *const EngineApi;
        assert!(binding.is_resolved());
        assert!(!binding.is_library_loaded());

        let api = binding.ensure_resolved();
        assert!(std::ptr::eq(first, api));
        assert!(!api.is_complete());
        assert!(!api.is_bound(Slot::InitContext));
        assert!(!api.is_bound(Slot::PumpCreate));
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    #[test]
    fn library_without_engine_symbols_resolves_to_unbound_slots() {
        let binding = DynamicBinding::new("libc.so.6", EntryPoints::with_prefix("rfvp_android"));
        let api = binding.ensure_resolved();
        assert!(binding.is_library_loaded());
        assert_eq!(api.missing_mandatory().len(), Slot::MANDATORY.len());
        assert_eq!(api.missing_required(binding.entry_points()), Slot::MANDATORY.to_vec());
    }

    #[test]
    fn from_config_carries_library_and_prefixes() {
        let config = BridgeConfig {
            library: "librfvp_test.so".to_owned(),
            entry_prefix: "rfvp_ios".to_owned(),
            pump_prefix: None,
            log_level: "info".to_owned(),
        };
        let binding = DynamicBinding::from_config(&config);
        assert_eq!(binding.library(), OsStr::new("librfvp_test.so"));
        assert_eq!(binding.entry_points().prefix, "rfvp_ios");
        assert_eq!(binding.entry_points().symbol(Slot::PumpCreate), None);
        assert!(!binding.is_resolved());
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    #[test]
    fn load_symbol_reports_symbol_name() {
        let lib = open_library(OsStr::new("libc.so.6")).unwrap();
        let err = unsafe { load_symbol::<unsafe extern "C" fn()>(&lib, "rfvp_android_create") }
            .err()
            .unwrap();
        assert!(matches!(err, BridgeError::SymbolMissing { ref symbol, .. } if symbol == "rfvp_android_create"));

        let strlen = unsafe {
            load_symbol::<unsafe extern "C" fn(*const std::ffi::c_char) -> usize>(&lib, "strlen")
        }
        .unwrap();
        assert_eq!(unsafe { strlen(c"engine".as_ptr()) }, 6);
    }
}
