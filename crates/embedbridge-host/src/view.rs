//! View-hosted exports. The host's `UIView*`/`NSView*` is the surface and the host drives
//! frames itself.

use std::ffi::{c_char, c_void};

use embedbridge_core::{EngineHandle, ViewRef};

use crate::ffi::opt_str;
use crate::runtime::bridge;

/// Host view pointer as a surface: `UIView*` on iOS, `NSView*` on macOS.
#[inline]
fn host_view(view: *mut c_void) -> Option<ViewRef> {
    if cfg!(target_os = "ios") {
        ViewRef::ui_kit(view)
    } else {
        ViewRef::app_kit(view)
    }
}

/// Create an engine instance rendering into `view`. Returns NULL on failure.
///
/// # Safety
/// `view` is null or a live `UIView*`/`NSView*` that outlives the instance. Both strings are
/// null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn embedbridge_view_create(
    view: *mut c_void,
    width_px: u32,
    height_px: u32,
    scale: f64,
    game_root_utf8: *const c_char,
    nls_utf8: *const c_char,
) -> *mut c_void {
    // SAFETY: forwarded from the caller.
    let game_root = unsafe { opt_str(game_root_utf8, "view_create(game_root)") };
    let nls = unsafe { opt_str(nls_utf8, "view_create(nls)") };
    let view = host_view(view);

    bridge()
        .create(view.as_ref(), width_px, height_px, scale, game_root, nls)
        .as_ptr()
}

/// Advance one frame. Returns 0 to continue, non-zero when the engine wants to stop or is
/// unavailable.
#[no_mangle]
pub extern "C" fn embedbridge_view_step(handle: *mut c_void, dt_ms: u32) -> i32 {
    bridge().step(EngineHandle::from_ptr(handle), dt_ms)
}

#[no_mangle]
pub extern "C" fn embedbridge_view_resize(handle: *mut c_void, width_px: u32, height_px: u32) {
    bridge().resize(EngineHandle::from_ptr(handle), width_px, height_px);
}

/// Rebind to another view. A null `view` keeps the current one.
///
/// # Safety
/// Same contract for `view` as [`embedbridge_view_create`].
#[no_mangle]
pub unsafe extern "C" fn embedbridge_view_set_surface(
    handle: *mut c_void,
    view: *mut c_void,
    width_px: u32,
    height_px: u32,
) {
    let view = host_view(view);
    bridge().set_surface(EngineHandle::from_ptr(handle), view.as_ref(), width_px, height_px);
}

/// `phase`: 0 began, 1 moved, 2 ended, 3 cancelled. Forwarded unchanged.
#[no_mangle]
pub extern "C" fn embedbridge_view_touch(handle: *mut c_void, phase: i32, x: f64, y: f64) {
    bridge().touch(EngineHandle::from_ptr(handle), phase, x, y);
}

#[no_mangle]
pub extern "C" fn embedbridge_view_destroy(handle: *mut c_void) {
    bridge().destroy(EngineHandle::from_ptr(handle));
}
