#![forbid(unsafe_op_in_unsafe_fn)]

//! C ABI of the embedding bridge for hosts without a JVM.
//!
//! Two variants, both declared in `include/embedbridge.h`:
//! - view-hosted, iOS and macOS only: the host passes its `UIView*` or `NSView*` as the surface
//!   and drives frames itself (`embedbridge_view_*`);
//! - pump mode: the engine owns its window and the host runloop calls
//!   `embedbridge_pump_step` (`embedbridge_pump_*`).

mod ffi;
mod runtime;
#[cfg(any(target_os = "ios", target_os = "macos"))]
mod view;

pub use ffi::*;
#[cfg(any(target_os = "ios", target_os = "macos"))]
pub use view::*;
pub use runtime::{bridge, HostBridge};
