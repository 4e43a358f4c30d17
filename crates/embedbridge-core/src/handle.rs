use std::ffi::c_void;
use std::fmt;

/// Opaque identity of one live engine instance.
///
/// Minted by the engine's create entry point. The bridge never dereferences it; it is only
/// compared against [`EngineHandle::NONE`] and used as a table key.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EngineHandle(usize);

impl EngineHandle {
    /// Reserved "no engine instance" value. The engine never returns it for a live instance.
    pub const NONE: Self = Self(0);

    #[inline]
    pub const fn from_raw(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn from_ptr(ptr: *mut c_void) -> Self {
        Self(ptr as usize)
    }

    /// Widening conversion used by JNI (`jlong`) callers.
    #[inline]
    pub fn from_i64(value: i64) -> Self {
        Self(value as usize)
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn to_raw(self) -> usize {
        self.0
    }

    #[inline]
    pub fn to_i64(self) -> i64 {
        self.0 as i64
    }

    #[inline]
    pub fn as_ptr(self) -> *mut c_void {
        self.0 as *mut c_void
    }
}

impl fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EngineHandle({:#x})", self.0)
    }
}

impl fmt::Display for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// `step` result: keep stepping.
pub const STEP_CONTINUE: i32 = 0;
/// `step` result when the engine asked to stop, or when no engine is reachable.
pub const STEP_STOP: i32 = 1;
/// `pump_step` result for the null handle.
pub const STEP_INVALID_HANDLE: i32 = 2;

/// Single-finger touch phase as the engine ABI encodes it.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    Began = 0,
    Moved = 1,
    Ended = 2,
    Cancelled = 3,
}

impl From<TouchPhase> for i32 {
    #[inline]
    fn from(phase: TouchPhase) -> Self {
        phase as i32
    }
}

impl TryFrom<i32> for TouchPhase {
    type Error = i32;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Began),
            1 => Ok(Self::Moved),
            2 => Ok(Self::Ended),
            3 => Ok(Self::Cancelled),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_zero_and_survives_jlong_round_trip() {
        assert!(EngineHandle::NONE.is_none());
        assert!(EngineHandle::from_i64(0).is_none());
        assert!(EngineHandle::from_ptr(std::ptr::null_mut()).is_none());

        let h = EngineHandle::from_raw(0x7f00_1000);
        assert!(!h.is_none());
        assert_eq!(EngineHandle::from_i64(h.to_i64()), h);
        assert_eq!(EngineHandle::from_ptr(h.as_ptr()), h);
    }

    #[test]
    fn touch_phase_matches_abi_encoding() {
        assert_eq!(i32::from(TouchPhase::Began), 0);
        assert_eq!(i32::from(TouchPhase::Cancelled), 3);
        assert_eq!(TouchPhase::try_from(1), Ok(TouchPhase::Moved));
        assert_eq!(TouchPhase::try_from(7), Err(7));
    }
}
