#![forbid(unsafe_op_in_unsafe_fn)]

use std::ffi::{c_char, CString};

use crate::api::{EngineApi, Slot};
use crate::binding::EngineBinding;
use crate::context::{ContextRegistrar, ContextSource};
use crate::error::{BridgeError, BridgeResult};
use crate::handle::{EngineHandle, STEP_INVALID_HANDLE, STEP_STOP};
use crate::surface::{window_ptr, NativeWindow, SurfaceSource};
use crate::table::ResourceTable;
use crate::LOG_TARGET;

/// Process-scoped bridge context: the engine binding, the context registrar and the
/// per-instance window table, passed to every entry-point shim.
///
/// Shims never panic or propagate errors to the UI shell. Each failure degrades to the
/// operation's "unavailable" result (null handle, non-zero status, or no-op) plus a log line.
/// Calls for one handle must be serialized by the caller.
pub struct Bridge<B, W> {
    binding: B,
    context: ContextRegistrar,
    surfaces: ResourceTable<W>,
}

impl<B: EngineBinding, W: NativeWindow> Bridge<B, W> {
    #[inline]
    pub fn new(binding: B) -> Self {
        Self {
            binding,
            context: ContextRegistrar::new(),
            surfaces: ResourceTable::new(),
        }
    }

    #[inline]
    pub fn binding(&self) -> &B {
        &self.binding
    }

    /// Resolved API table; resolves on first use.
    #[inline]
    pub fn api(&self) -> &EngineApi {
        self.binding.ensure_resolved()
    }

    #[inline]
    pub fn context(&self) -> &ContextRegistrar {
        &self.context
    }

    #[inline]
    pub fn tracked_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    #[inline]
    pub fn is_tracked(&self, handle: EngineHandle) -> bool {
        self.surfaces.contains(handle)
    }

    #[inline]
    pub fn surfaces(&self) -> &ResourceTable<W> {
        &self.surfaces
    }

    /// One-time handoff of the host environment. Safe to call repeatedly and before any
    /// instance exists; must precede the first `create` that depends on it.
    pub fn register_context<S: ContextSource>(&self, app: Option<&S>) -> BridgeResult<()> {
        let api = self.binding.ensure_resolved();
        self.context.register(api, app).inspect_err(|e| report("register_context", e))
    }

    // -----------------------------------------------------------------------------------------
    // Surface-hosted instances
    // -----------------------------------------------------------------------------------------

    /// Create an engine instance rendering into `surface`.
    ///
    /// Returns [`EngineHandle::NONE`] on any failure; no table entry is left behind and the
    /// acquired window reference is released.
    pub fn create<S: SurfaceSource<Window = W>>(
        &self,
        surface: Option<&S>,
        width_px: u32,
        height_px: u32,
        scale: f64,
        game_root: Option<&str>,
        locale: Option<&str>,
    ) -> EngineHandle {
        self.try_create(surface, width_px, height_px, scale, game_root, locale)
            .unwrap_or_else(|e| {
                report("create", &e);
                EngineHandle::NONE
            })
    }

    fn try_create<S: SurfaceSource<Window = W>>(
        &self,
        surface: Option<&S>,
        width_px: u32,
        height_px: u32,
        scale: f64,
        game_root: Option<&str>,
        locale: Option<&str>,
    ) -> BridgeResult<EngineHandle> {
        let api = self.binding.ensure_resolved();
        let create = api.create.ok_or(BridgeError::unavailable(Slot::Create))?;
        let surface = surface.ok_or(BridgeError::null("surface"))?;

        // Owned from here on: every early return below releases it.
        let window = surface.acquire_window()?;
        let window_raw = window_ptr(window.raw_window_handle())?;

        let game_root = optional_cstring(game_root, "game_root")?;
        let locale = optional_cstring(locale, "locale")?;

        // SAFETY: `window_raw` is kept alive by `window`; the strings outlive the call.
        let raw = unsafe {
            create(
                window_raw,
                width_px,
                height_px,
                scale,
                opt_ptr(&game_root),
                opt_ptr(&locale),
            )
        };

        let handle = EngineHandle::from_ptr(raw);
        if handle.is_none() {
            return Err(BridgeError::EngineRejected { op: "create" });
        }

        if self.surfaces.install(handle, window) {
            log::warn!(
                target: LOG_TARGET,
                "create: engine reused live handle {handle}; stale surface released"
            );
        }
        Ok(handle)
    }

    /// Advance one frame. 0 = continue, non-zero = stop; unreachable engines report stop.
    pub fn step(&self, handle: EngineHandle, dt_ms: u32) -> i32 {
        let Some(step) = self.binding.ensure_resolved().step else {
            return STEP_STOP;
        };
        if handle.is_none() {
            return STEP_STOP;
        }
        // SAFETY: `handle` came from this engine's create and has not been destroyed.
        unsafe { step(handle.as_ptr(), dt_ms) }
    }

    pub fn resize(&self, handle: EngineHandle, width_px: u32, height_px: u32) {
        let Some(resize) = self.binding.ensure_resolved().resize else {
            return;
        };
        if handle.is_none() {
            return;
        }
        // SAFETY: see `step`.
        unsafe { resize(handle.as_ptr(), width_px, height_px) }
    }

    /// Rebind `handle` to a new surface. A null surface keeps the current one.
    pub fn set_surface<S: SurfaceSource<Window = W>>(
        &self,
        handle: EngineHandle,
        surface: Option<&S>,
        width_px: u32,
        height_px: u32,
    ) {
        if let Err(e) = self.try_set_surface(handle, surface, width_px, height_px) {
            report("set_surface", &e);
        }
    }

    fn try_set_surface<S: SurfaceSource<Window = W>>(
        &self,
        handle: EngineHandle,
        surface: Option<&S>,
        width_px: u32,
        height_px: u32,
    ) -> BridgeResult<()> {
        let api = self.binding.ensure_resolved();
        let set_surface = api
            .set_surface
            .ok_or(BridgeError::unavailable(Slot::SetSurface))?;
        if handle.is_none() {
            return Ok(());
        }
        let Some(surface) = surface else {
            log::warn!(target: LOG_TARGET, "set_surface: surface is null (ignored)");
            return Ok(());
        };

        let window = surface.acquire_window()?;
        let window_raw = window_ptr(window.raw_window_handle())?;

        // The previous window stays tracked (and valid) until the engine has switched over.
        // SAFETY: see `step`; `window_raw` is kept alive by `window`.
        unsafe { set_surface(handle.as_ptr(), window_raw, width_px, height_px) };

        self.surfaces.install(handle, window);
        Ok(())
    }

    /// Forward a touch event; `phase` is passed through unchanged.
    pub fn touch(&self, handle: EngineHandle, phase: i32, x: f64, y: f64) {
        let Some(touch) = self.binding.ensure_resolved().touch else {
            return;
        };
        if handle.is_none() {
            return;
        }
        // SAFETY: see `step`.
        unsafe { touch(handle.as_ptr(), phase, x, y) }
    }

    /// Tear down `handle`: engine first, while its window is still valid, then the table entry.
    pub fn destroy(&self, handle: EngineHandle) {
        let Some(destroy) = self.binding.ensure_resolved().destroy else {
            return;
        };
        if handle.is_none() {
            return;
        }
        // SAFETY: see `step`. The handle is dead after this call.
        unsafe { destroy(handle.as_ptr()) };
        self.surfaces.remove(handle);
    }

    // -----------------------------------------------------------------------------------------
    // Pump mode: the engine owns its window, the host runloop drives it
    // -----------------------------------------------------------------------------------------

    /// Both strings are required and must be non-empty in this mode.
    pub fn pump_create(&self, game_root: Option<&str>, locale: Option<&str>) -> EngineHandle {
        self.try_pump_create(game_root, locale).unwrap_or_else(|e| {
            report("pump_create", &e);
            EngineHandle::NONE
        })
    }

    fn try_pump_create(
        &self,
        game_root: Option<&str>,
        locale: Option<&str>,
    ) -> BridgeResult<EngineHandle> {
        let api = self.binding.ensure_resolved();
        let create = api
            .pump
            .create
            .ok_or(BridgeError::unavailable(Slot::PumpCreate))?;

        let game_root = required_cstring(game_root, "game_root")?;
        let locale = required_cstring(locale, "locale")?;

        // SAFETY: both strings outlive the call.
        let raw = unsafe { create(game_root.as_ptr(), locale.as_ptr()) };
        let handle = EngineHandle::from_ptr(raw);
        if handle.is_none() {
            return Err(BridgeError::EngineRejected { op: "pump_create" });
        }
        Ok(handle)
    }

    /// Pump host events for up to `timeout_ms` (at least 1 ms).
    pub fn pump_step(&self, handle: EngineHandle, timeout_ms: u32) -> i32 {
        let Some(step) = self.binding.ensure_resolved().pump.step else {
            return STEP_STOP;
        };
        if handle.is_none() {
            return STEP_INVALID_HANDLE;
        }
        // SAFETY: `handle` came from pump_create and has not been destroyed.
        unsafe { step(handle.as_ptr(), timeout_ms.max(1)) }
    }

    pub fn pump_destroy(&self, handle: EngineHandle) {
        let Some(destroy) = self.binding.ensure_resolved().pump.destroy else {
            return;
        };
        if handle.is_none() {
            return;
        }
        // SAFETY: see `pump_step`.
        unsafe { destroy(handle.as_ptr()) }
    }
}

fn report(op: &str, err: &BridgeError) {
    match err {
        // Already logged once by the resolver.
        BridgeError::Unavailable { .. } => log::debug!(target: LOG_TARGET, "{op}: {err}"),
        _ => log::error!(target: LOG_TARGET, "{op}: {err}"),
    }
}

/// Absent stays absent (null pointer), never an empty string.
fn optional_cstring(s: Option<&str>, what: &'static str) -> BridgeResult<Option<CString>> {
    s.map(|s| CString::new(s).map_err(|_| BridgeError::InvalidString { what }))
        .transpose()
}

fn required_cstring(s: Option<&str>, what: &'static str) -> BridgeResult<CString> {
    match s {
        Some(s) if !s.is_empty() => {
            CString::new(s).map_err(|_| BridgeError::InvalidString { what })
        }
        _ => Err(BridgeError::null(what)),
    }
}

#[inline]
fn opt_ptr(s: &Option<CString>) -> *const c_char {
    s.as_ref().map_or(std::ptr::null(), |s| s.as_ptr())
}
