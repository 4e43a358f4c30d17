#![forbid(unsafe_op_in_unsafe_fn)]

mod dynamic;

pub use dynamic::DynamicBinding;

use std::sync::OnceLock;

use crate::api::EngineApi;

/// Source of the engine's entry points.
///
/// `ensure_resolved` is idempotent and safe from any thread: the resolution work runs at most
/// once per binding, concurrent first callers all observe the same table, and the outcome is
/// never retried.
pub trait EngineBinding: Send + Sync {
    fn ensure_resolved(&self) -> &EngineApi;
}

/// Engine linked into the same binary (or a test double).
///
/// The constructor closure runs on the first `ensure_resolved` only.
pub struct StaticBinding {
    init: Box<dyn Fn() -> EngineApi + Send + Sync>,
    api: OnceLock<EngineApi>,
}

impl StaticBinding {
    #[inline]
    pub fn new(init: impl Fn() -> EngineApi + Send + Sync + 'static) -> Self {
        Self {
            init: Box::new(init),
            api: OnceLock::new(),
        }
    }

    #[inline]
    pub fn from_api(api: EngineApi) -> Self {
        Self::new(move || api)
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.api.get().is_some()
    }
}

impl EngineBinding for StaticBinding {
    #[inline]
    fn ensure_resolved(&self) -> &EngineApi {
        self.api.get_or_init(|| (self.init)())
    }
}

impl<B: EngineBinding + ?Sized> EngineBinding for &B {
    #[inline]
    fn ensure_resolved(&self) -> &EngineApi {
        (**self).ensure_resolved()
    }
}

impl<B: EngineBinding + ?Sized> EngineBinding for Box<B> {
    #[inline]
    fn ensure_resolved(&self) -> &EngineApi {
        (**self).ensure_resolved()
    }
}
