use std::path::PathBuf;

use thiserror::Error;

use crate::api::Slot;

#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    /// The engine binary could not be opened.
    #[error("engine library '{library}' not found: {message}")]
    LibraryNotFound { library: String, message: String },

    #[error("symbol '{symbol}' not found: {message}")]
    SymbolMissing { symbol: String, message: String },

    /// The slot this operation forwards to is unbound.
    #[error("{slot} is unavailable (symbol missing)")]
    Unavailable { slot: Slot },

    #[error("{what} is null")]
    NullArgument { what: &'static str },

    #[error("{what} is not a valid C string (interior NUL)")]
    InvalidString { what: &'static str },

    /// The platform refused to produce a native window from the surface object.
    #[error("native window acquisition failed")]
    WindowAcquireFailed,

    #[error("window handle kind {kind} is not supported by the engine ABI")]
    UnsupportedWindowHandle { kind: &'static str },

    #[error("durable context reference acquisition failed: {0}")]
    ContextAcquireFailed(String),

    /// The engine returned its failure sentinel.
    #[error("{op} rejected by engine")]
    EngineRejected { op: &'static str },

    #[error("config {path:?}: {message}")]
    Config { path: PathBuf, message: String },
}

impl BridgeError {
    #[inline]
    pub fn null(what: &'static str) -> Self {
        Self::NullArgument { what }
    }

    #[inline]
    pub fn unavailable(slot: Slot) -> Self {
        Self::Unavailable { slot }
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;
