use std::ffi::c_void;
use std::ptr::NonNull;

use raw_window_handle::{AppKitWindowHandle, RawWindowHandle, UiKitWindowHandle};

use crate::error::{BridgeError, BridgeResult};

/// Owned reference to a platform drawable (`ANativeWindow*`, a view, ...).
///
/// Acquired from a [`SurfaceSource`]; dropping it releases the platform reference exactly once.
/// Must be `Send`: the resource table that owns it is shared across threads.
pub trait NativeWindow: Send {
    fn raw_window_handle(&self) -> RawWindowHandle;
}

/// Platform surface object the UI shell hands to `create` / `set_surface`.
pub trait SurfaceSource {
    type Window: NativeWindow;

    /// Produce a new owned window reference. Failure is a resource-acquisition failure.
    fn acquire_window(&self) -> BridgeResult<Self::Window>;
}

/// Primitive pointer the engine ABI takes for a window handle.
pub fn window_ptr(handle: RawWindowHandle) -> BridgeResult<*mut c_void> {
    let ptr = match handle {
        RawWindowHandle::AndroidNdk(h) => h.a_native_window.as_ptr(),
        RawWindowHandle::UiKit(h) => h.ui_view.as_ptr(),
        RawWindowHandle::AppKit(h) => h.ns_view.as_ptr(),
        RawWindowHandle::Win32(h) => h.hwnd.get() as *mut c_void,
        RawWindowHandle::Wayland(h) => h.surface.as_ptr(),
        other => {
            return Err(BridgeError::UnsupportedWindowHandle {
                kind: handle_kind(&other),
            })
        }
    };
    Ok(ptr)
}

fn handle_kind(handle: &RawWindowHandle) -> &'static str {
    match handle {
        RawWindowHandle::Xlib(_) => "Xlib",
        RawWindowHandle::Xcb(_) => "Xcb",
        RawWindowHandle::Web(_) => "Web",
        RawWindowHandle::Orbital(_) => "Orbital",
        RawWindowHandle::Haiku(_) => "Haiku",
        RawWindowHandle::Drm(_) => "Drm",
        RawWindowHandle::Gbm(_) => "Gbm",
        RawWindowHandle::WinRt(_) => "WinRt",
        _ => "unknown",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewKind {
    UiKit,
    AppKit,
}

/// Borrowed platform view (`UIView*` / `NSView*`) used as the surface in view-hosted mode.
///
/// The host keeps the view alive for the lifetime of the engine instance, so acquiring and
/// releasing a `ViewRef` does not touch any reference count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRef {
    view: NonNull<c_void>,
    kind: ViewKind,
}

// The pointer is only handed back to the engine on the thread that drives it.
unsafe impl Send for ViewRef {}

impl ViewRef {
    #[inline]
    pub fn ui_kit(view: *mut c_void) -> Option<Self> {
        NonNull::new(view).map(|view| Self {
            view,
            kind: ViewKind::UiKit,
        })
    }

    #[inline]
    pub fn app_kit(view: *mut c_void) -> Option<Self> {
        NonNull::new(view).map(|view| Self {
            view,
            kind: ViewKind::AppKit,
        })
    }

    #[inline]
    pub fn as_ptr(&self) -> *mut c_void {
        self.view.as_ptr()
    }
}

impl NativeWindow for ViewRef {
    fn raw_window_handle(&self) -> RawWindowHandle {
        match self.kind {
            ViewKind::UiKit => RawWindowHandle::UiKit(UiKitWindowHandle::new(self.view)),
            ViewKind::AppKit => RawWindowHandle::AppKit(AppKitWindowHandle::new(self.view)),
        }
    }
}

impl SurfaceSource for ViewRef {
    type Window = ViewRef;

    #[inline]
    fn acquire_window(&self) -> BridgeResult<ViewRef> {
        Ok(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raw_window_handle::{AndroidNdkWindowHandle, XlibWindowHandle};

    #[test]
    fn window_ptr_extracts_native_pointer() {
        let p = NonNull::new(0x1000 as *mut c_void).unwrap();
        let h = RawWindowHandle::AndroidNdk(AndroidNdkWindowHandle::new(p));
        assert_eq!(window_ptr(h).unwrap(), p.as_ptr());

        let view = ViewRef::ui_kit(0x2000 as *mut c_void).unwrap();
        assert_eq!(window_ptr(view.raw_window_handle()).unwrap(), view.as_ptr());
    }

    #[test]
    fn unsupported_handle_is_an_acquisition_error() {
        let h = RawWindowHandle::Xlib(XlibWindowHandle::new(42));
        let err = window_ptr(h).unwrap_err();
        assert!(matches!(err, BridgeError::UnsupportedWindowHandle { kind: "Xlib" }));
    }

    #[test]
    fn null_view_is_rejected() {
        assert!(ViewRef::app_kit(std::ptr::null_mut()).is_none());
    }
}
