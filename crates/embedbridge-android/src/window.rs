use std::ptr::NonNull;

use embedbridge_core::raw_window_handle::{AndroidNdkWindowHandle, RawWindowHandle};
use embedbridge_core::{BridgeError, BridgeResult, NativeWindow, SurfaceSource};
use jni::objects::JObject;
use jni::JNIEnv;

/// Owned `ANativeWindow` reference; dropping it releases the reference.
#[derive(Debug)]
pub struct AndroidWindow(NonNull<ndk_sys::ANativeWindow>);

// ANativeWindow is internally reference counted and may be released from any thread.
unsafe impl Send for AndroidWindow {}

impl NativeWindow for AndroidWindow {
    #[inline]
    fn raw_window_handle(&self) -> RawWindowHandle {
        RawWindowHandle::AndroidNdk(AndroidNdkWindowHandle::new(self.0.cast()))
    }
}

impl Drop for AndroidWindow {
    fn drop(&mut self) {
        // SAFETY: we hold exactly one reference, obtained from ANativeWindow_fromSurface.
        unsafe { ndk_sys::ANativeWindow_release(self.0.as_ptr()) };
    }
}

/// A non-null `android.view.Surface` borrowed for the duration of one JNI call.
pub struct JniSurface {
    env: *mut jni::sys::JNIEnv,
    surface: jni::sys::jobject,
}

impl JniSurface {
    /// `None` for a null Java reference.
    pub fn new(env: &JNIEnv<'_>, surface: &JObject<'_>) -> Option<Self> {
        if surface.is_null() {
            return None;
        }
        Some(Self {
            env: env.get_raw(),
            surface: surface.as_raw(),
        })
    }
}

impl SurfaceSource for JniSurface {
    type Window = AndroidWindow;

    fn acquire_window(&self) -> BridgeResult<AndroidWindow> {
        // SAFETY: `env` is the JNIEnv of the calling thread and `surface` a live local ref;
        // both outlive this call.
        let raw = unsafe {
            ndk_sys::ANativeWindow_fromSurface(
                self.env as *mut ndk_sys::JNIEnv,
                self.surface as ndk_sys::jobject,
            )
        };
        NonNull::new(raw)
            .map(AndroidWindow)
            .ok_or(BridgeError::WindowAcquireFailed)
    }
}
