//! JNI surface of the embedding bridge for the Android launcher (`com.rfvp.launcher.NativeRfvp`).
//!
//! Built as `libembedbridge_android.so`, loaded by the launcher next to the engine library.
//! Everything here is Android-only; on other targets the crate is empty.

#![cfg(target_os = "android")]
#![forbid(unsafe_op_in_unsafe_fn)]

mod context;
mod exports;
mod runtime;
mod window;

pub use context::{AppContext, AppGlobal};
pub use runtime::{bridge, AndroidBridge};
pub use window::{AndroidWindow, JniSurface};
