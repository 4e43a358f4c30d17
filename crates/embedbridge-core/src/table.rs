use parking_lot::Mutex;
use std::collections::HashMap;

use crate::handle::EngineHandle;
use crate::surface::NativeWindow;

/// Engine handle → current window reference.
///
/// Keeps each instance's window alive while the engine renders into it. The lock covers the
/// map update (including the release of a superseded window) and is never held across an
/// engine call.
pub struct ResourceTable<W> {
    windows: Mutex<HashMap<EngineHandle, W>>,
}

impl<W: NativeWindow> ResourceTable<W> {
    #[inline]
    pub fn new() -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Store `window` for `handle`, releasing the previous reference first.
    ///
    /// Returns `true` when an existing entry was superseded.
    pub fn install(&self, handle: EngineHandle, window: W) -> bool {
        let mut g = self.windows.lock();
        let replaced = g.remove(&handle).map(drop).is_some();
        g.insert(handle, window);
        replaced
    }

    /// Release and erase the entry for `handle`. No-op when absent.
    pub fn remove(&self, handle: EngineHandle) -> bool {
        self.windows.lock().remove(&handle).map(drop).is_some()
    }

    #[inline]
    pub fn contains(&self, handle: EngineHandle) -> bool {
        self.windows.lock().contains_key(&handle)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.windows.lock().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs `f` on the window tracked for `handle` while holding the lock.
    pub fn with_window<R>(&self, handle: EngineHandle, f: impl FnOnce(&W) -> R) -> Option<R> {
        self.windows.lock().get(&handle).map(f)
    }
}

impl<W: NativeWindow> Default for ResourceTable<W> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
