use std::ffi::{c_char, c_void, CStr};

use embedbridge_core::{EngineHandle, LOG_TARGET};

use crate::runtime::bridge;

/// Null stays absent. Non-UTF-8 text is logged and treated as absent.
///
/// # Safety
/// `p` is null or points to a NUL-terminated string valid for `'a`.
pub(crate) unsafe fn opt_str<'a>(p: *const c_char, what: &str) -> Option<&'a str> {
    if p.is_null() {
        return None;
    }
    // SAFETY: forwarded from the caller.
    match unsafe { CStr::from_ptr(p) }.to_str() {
        Ok(s) => Some(s),
        Err(e) => {
            log::warn!(target: LOG_TARGET, "{what}: not UTF-8: {e}");
            None
        }
    }
}

// ---------------------------------------------------------------------------------------------
// Pump mode
// ---------------------------------------------------------------------------------------------

/// Create a pump-driven instance. Both strings are required. Returns NULL on failure.
///
/// # Safety
/// Both strings are null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn embedbridge_pump_create(
    game_root_utf8: *const c_char,
    nls_utf8: *const c_char,
) -> *mut c_void {
    // SAFETY: forwarded from the caller.
    let game_root = unsafe { opt_str(game_root_utf8, "pump_create(game_root)") };
    let nls = unsafe { opt_str(nls_utf8, "pump_create(nls)") };

    bridge().pump_create(game_root, nls).as_ptr()
}

/// Pump events for up to `timeout_ms` (at least 1).
///
/// 0 continue, 1 exit requested (or engine unavailable), 2 invalid handle.
#[no_mangle]
pub extern "C" fn embedbridge_pump_step(handle: *mut c_void, timeout_ms: u32) -> i32 {
    bridge().pump_step(EngineHandle::from_ptr(handle), timeout_ms)
}

#[no_mangle]
pub extern "C" fn embedbridge_pump_destroy(handle: *mut c_void) {
    bridge().pump_destroy(EngineHandle::from_ptr(handle));
}
