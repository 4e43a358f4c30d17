//! One-time handoff of the host's process-wide execution environment to the engine.
//!
//! On Android the engine's audio backends attach threads to the JVM, so they need the `JavaVM*`
//! and a GlobalRef to the application `Context` before the first instance is created.

use std::ffi::c_void;
use std::ptr::NonNull;
use std::sync::OnceLock;

use crate::api::{EngineApi, Slot};
use crate::error::{BridgeError, BridgeResult};
use crate::LOG_TARGET;

/// Execution-environment handle (`JavaVM*` on Android). Process-wide and never freed.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvHandle(NonNull<c_void>);

unsafe impl Send for EnvHandle {}
unsafe impl Sync for EnvHandle {}

impl EnvHandle {
    #[inline]
    pub fn new(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    #[inline]
    pub fn as_ptr(self) -> *mut c_void {
        self.0.as_ptr()
    }
}

/// Reference to the host application object that stays valid across threads for the rest of
/// the process (a JNI GlobalRef on Android).
pub trait DurableRef: Send + Sync + 'static {
    fn as_ptr(&self) -> *mut c_void;
}

/// Platform application object offered for registration.
pub trait ContextSource {
    type Durable: DurableRef;

    fn env_handle(&self) -> BridgeResult<EnvHandle>;

    fn acquire_durable(&self) -> BridgeResult<Self::Durable>;
}

/// Registered pair. Lives until process exit.
pub struct NativeContext {
    env: EnvHandle,
    app: &'static dyn DurableRef,
}

impl NativeContext {
    #[inline]
    pub fn env(&self) -> EnvHandle {
        self.env
    }

    #[inline]
    pub fn app_ptr(&self) -> *mut c_void {
        self.app.as_ptr()
    }
}

/// Gate around the engine's `init_context` entry point.
///
/// Preconditions are checked on every call; the acquisition and handoff run at most once, and
/// every later call observes that first outcome.
pub struct ContextRegistrar {
    outcome: OnceLock<Result<NativeContext, BridgeError>>,
}

impl ContextRegistrar {
    #[inline]
    pub const fn new() -> Self {
        Self {
            outcome: OnceLock::new(),
        }
    }

    pub fn register<S: ContextSource>(
        &self,
        api: &EngineApi,
        source: Option<&S>,
    ) -> BridgeResult<()> {
        let init = api
            .init_context
            .ok_or(BridgeError::unavailable(Slot::InitContext))?;
        let source = source.ok_or(BridgeError::null("app context"))?;

        let outcome = self.outcome.get_or_init(|| {
            let env = source.env_handle()?;
            let durable = source.acquire_durable()?;

            // The durable reference is handed to the engine and must never be released.
            let app: &'static dyn DurableRef = Box::leak(Box::new(durable));

            // SAFETY: both pointers are valid for the rest of the process.
            unsafe { init(env.as_ptr(), app.as_ptr()) };
            log::info!(target: LOG_TARGET, "register_context: native context initialized");

            Ok(NativeContext { env, app })
        });

        match outcome {
            Ok(_) => Ok(()),
            Err(e) => Err(e.clone()),
        }
    }

    #[inline]
    pub fn is_registered(&self) -> bool {
        matches!(self.outcome.get(), Some(Ok(_)))
    }

    #[inline]
    pub fn context(&self) -> Option<&NativeContext> {
        self.outcome.get().and_then(|o| o.as_ref().ok())
    }
}

impl Default for ContextRegistrar {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
