#![forbid(unsafe_op_in_unsafe_fn)]

//! Embedding bridge between platform UI shells and an opaque engine library.
//!
//! The engine is reachable only through a handful of C entry points (create, step, resize,
//! set_surface, touch, destroy, and an optional init_context). This crate resolves them once
//! per process, hands the host's execution environment to the engine, and owns the platform
//! window reference each live engine instance renders into.

pub mod api;
pub mod binding;
pub mod bridge;
pub mod config;
pub mod context;
pub mod error;
pub mod handle;
pub mod surface;
pub mod table;

/// `log` target used by every diagnostic of the bridge.
pub const LOG_TARGET: &str = "embedbridge";

pub use api::{EngineApi, EntryPoints, PumpApi, Slot};
pub use binding::{DynamicBinding, EngineBinding, StaticBinding};
pub use bridge::Bridge;
pub use config::{BridgeConfig, ConfigLoadReport, ConfigLoader, ConfigOverrides, ConfigPaths};
pub use context::{ContextRegistrar, ContextSource, DurableRef, EnvHandle, NativeContext};
pub use error::{BridgeError, BridgeResult};
pub use handle::{EngineHandle, TouchPhase, STEP_CONTINUE, STEP_INVALID_HANDLE, STEP_STOP};
pub use surface::{window_ptr, NativeWindow, SurfaceSource, ViewRef};
pub use table::ResourceTable;

pub use raw_window_handle;
